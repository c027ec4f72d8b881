//! Coalescing accessors for loosely shaped JSON rows.
//!
//! The backend names the same field differently across endpoints and omits
//! optional ones. Each accessor takes a list of candidate keys and returns the
//! first usable value, or a safe default.

use serde_json::Value;

/// Follow a path of object keys.
pub fn nested<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |v, key| v.get(*key))
}

fn first<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| value.get(*k))
        .find(|v| !v.is_null())
}

pub fn opt_str(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().filter_map(|k| value.get(*k)).find_map(|v| match v {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

pub fn str_field(value: &Value, keys: &[&str]) -> String {
    opt_str(value, keys).unwrap_or_default()
}

pub fn opt_i64(value: &Value, keys: &[&str]) -> Option<i64> {
    keys.iter().filter_map(|k| value.get(*k)).find_map(|v| match v {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

pub fn i64_field(value: &Value, keys: &[&str]) -> i64 {
    opt_i64(value, keys).unwrap_or(0)
}

pub fn opt_f64(value: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter().filter_map(|k| value.get(*k)).find_map(|v| match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

pub fn f64_field(value: &Value, keys: &[&str]) -> f64 {
    opt_f64(value, keys).unwrap_or(0.0)
}

pub fn bool_field(value: &Value, keys: &[&str]) -> bool {
    match first(value, keys) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
        Some(Value::Number(n)) => n.as_i64().is_some_and(|n| n != 0),
        _ => false,
    }
}

/// "First Last", skipping empty parts.
pub fn full_name(first: &str, last: &str) -> String {
    [first.trim(), last.trim()]
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coalesces_alternate_keys() {
        let row = json!({"id": null, "storeId": 42, "name": "  ", "storeName": "Acme"});
        assert_eq!(i64_field(&row, &["id", "storeId"]), 42);
        assert_eq!(str_field(&row, &["name", "storeName"]), "Acme");
    }

    #[test]
    fn test_missing_fields_default() {
        let row = json!({});
        assert_eq!(str_field(&row, &["city"]), "");
        assert_eq!(i64_field(&row, &["id"]), 0);
        assert_eq!(f64_field(&row, &["outstandingPayment"]), 0.0);
        assert!(!bool_field(&row, &["active"]));
    }

    #[test]
    fn test_numeric_strings_accepted() {
        let row = json!({"monthlySale": "1250.5", "intent": "7", "pincode": 411001});
        assert_eq!(f64_field(&row, &["monthlySale"]), 1250.5);
        assert_eq!(i64_field(&row, &["intent"]), 7);
        assert_eq!(str_field(&row, &["pincode"]), "411001");
    }

    #[test]
    fn test_nested_path() {
        let row = json!({"employee": {"team": {"id": 6}}});
        let team = nested(&row, &["employee", "team"]).unwrap();
        assert_eq!(i64_field(team, &["id"]), 6);
        assert!(nested(&row, &["employee", "missing"]).is_none());
    }

    #[test]
    fn test_full_name() {
        assert_eq!(full_name("Asha", "Patil"), "Asha Patil");
        assert_eq!(full_name("", "Patil"), "Patil");
        assert_eq!(full_name(" ", " "), "");
    }
}
