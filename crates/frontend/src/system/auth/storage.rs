use contracts::system::auth::Role;
use web_sys::window;

pub const AUTH_TOKEN_KEY: &str = "authToken";
pub const ROLE_KEY: &str = "role";
pub const EMPLOYEE_ID_KEY: &str = "employeeId";

fn get_local_storage() -> Option<web_sys::Storage> {
    window()?.local_storage().ok()?
}

fn get_item(key: &str) -> Option<String> {
    get_local_storage()?.get_item(key).ok()?
}

/// What the login flow left in localStorage.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StoredSession {
    pub token: Option<String>,
    pub role_hint: Role,
    pub employee_id: Option<i64>,
}

impl StoredSession {
    pub fn from_values(token: Option<String>, role: Option<String>, employee_id: Option<String>) -> Self {
        Self {
            token: token.filter(|t| !t.trim().is_empty()),
            role_hint: role.as_deref().map(Role::from_authority).unwrap_or_default(),
            employee_id: employee_id.and_then(|id| id.trim().parse().ok()),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

/// Read the stored session. Called once at startup and again on `storage`
/// events from other tabs.
pub fn load_session() -> StoredSession {
    StoredSession::from_values(
        get_item(AUTH_TOKEN_KEY),
        get_item(ROLE_KEY),
        get_item(EMPLOYEE_ID_KEY),
    )
}

/// Whether a storage key belongs to the session.
pub fn is_session_key(key: &str) -> bool {
    matches!(key, AUTH_TOKEN_KEY | ROLE_KEY | EMPLOYEE_ID_KEY)
}

/// Clear all session keys
pub fn clear_session() {
    if let Some(storage) = get_local_storage() {
        let _ = storage.remove_item(AUTH_TOKEN_KEY);
        let _ = storage.remove_item(ROLE_KEY);
        let _ = storage.remove_item(EMPLOYEE_ID_KEY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_from_values() {
        let session = StoredSession::from_values(
            Some("abc".into()),
            Some("ROLE_MANAGER".into()),
            Some(" 12 ".into()),
        );
        assert!(session.is_authenticated());
        assert_eq!(session.role_hint, Role::Manager);
        assert_eq!(session.employee_id, Some(12));
    }

    #[test]
    fn test_blank_or_garbage_values_ignored() {
        let session = StoredSession::from_values(Some("  ".into()), None, Some("x".into()));
        assert!(!session.is_authenticated());
        assert_eq!(session.role_hint, Role::Unknown);
        assert_eq!(session.employee_id, None);
    }

    #[test]
    fn test_session_keys() {
        assert!(is_session_key("authToken"));
        assert!(!is_session_key("customers.list.state.v1"));
    }
}
