//! Contact number input rules.

pub const CONTACT_DIGITS: usize = 10;

pub const CONTACT_ERROR: &str = "Contact number must be exactly 10 digits";

/// Keep digits only, at most ten of them.
pub fn sanitize_contact(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit())
        .take(CONTACT_DIGITS)
        .collect()
}

/// Inline error, shown only for a partial number (1 to 9 digits).
pub fn contact_error(value: &str) -> Option<&'static str> {
    let digits = value.chars().filter(|c| c.is_ascii_digit()).count();
    (digits > 0 && digits < CONTACT_DIGITS).then_some(CONTACT_ERROR)
}

/// A required contact is complete; an optional one may also be empty.
pub fn contact_is_valid(value: &str, required: bool) -> bool {
    let digits = sanitize_contact(value).len();
    digits == CONTACT_DIGITS || (!required && digits == 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keystroke_sequence() {
        let first = sanitize_contact("12345");
        assert_eq!(first, "12345");
        assert_eq!(contact_error(&first), Some(CONTACT_ERROR));

        let second = sanitize_contact(&format!("{}678901", first));
        assert_eq!(second, "1234567890");
        assert_eq!(contact_error(&second), None);
    }

    #[test]
    fn test_non_digits_stripped() {
        assert_eq!(sanitize_contact("+91 (98) 765-43"), "919876543");
        assert_eq!(sanitize_contact("abc"), "");
    }

    #[test]
    fn test_empty_has_no_error() {
        assert_eq!(contact_error(""), None);
    }

    #[test]
    fn test_validity() {
        assert!(contact_is_valid("9876543210", true));
        assert!(!contact_is_valid("", true));
        assert!(contact_is_valid("", false));
        assert!(!contact_is_valid("98765", false));
    }
}
