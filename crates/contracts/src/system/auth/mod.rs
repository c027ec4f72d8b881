use serde::{Deserialize, Serialize};

/// Permission tier of the acting user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Manager,
    FieldOfficer,
    #[default]
    Unknown,
}

impl Role {
    /// Maps an authority string from the backend to a role.
    ///
    /// The backend is inconsistent: `ROLE_ADMIN`, `ADMIN`, `Field Officer` and
    /// `FIELD_OFFICER` all occur.
    pub fn from_authority(authority: &str) -> Self {
        let normalized = authority
            .trim()
            .trim_start_matches("ROLE_")
            .to_uppercase()
            .replace([' ', '-'], "_");

        match normalized.as_str() {
            "ADMIN" => Role::Admin,
            "MANAGER" | "OFFICE_MANAGER" => Role::Manager,
            "FIELD_OFFICER" => Role::FieldOfficer,
            _ => Role::Unknown,
        }
    }

    /// Manager and field-officer listings are scoped to a team.
    pub fn requires_team(&self) -> bool {
        matches!(self, Role::Manager | Role::FieldOfficer)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Manager => "MANAGER",
            Role::FieldOfficer => "FIELD_OFFICER",
            Role::Unknown => "UNKNOWN",
        }
    }
}

/// Authority entry; the profile endpoint returns either Spring-style objects
/// or plain strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Authority {
    Object { authority: String },
    Plain(String),
}

impl Authority {
    pub fn as_str(&self) -> &str {
        match self {
            Authority::Object { authority } => authority,
            Authority::Plain(s) => s,
        }
    }
}

/// Profile of the authenticated user (`GET /user/me`).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub employee_id: Option<i64>,
    #[serde(default)]
    pub authorities: Vec<Authority>,
}

impl CurrentUser {
    /// Role derived from the first authority only.
    pub fn role(&self) -> Role {
        self.authorities
            .first()
            .map(|a| Role::from_authority(a.as_str()))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_authority_variants() {
        assert_eq!(Role::from_authority("ROLE_ADMIN"), Role::Admin);
        assert_eq!(Role::from_authority("MANAGER"), Role::Manager);
        assert_eq!(Role::from_authority("Field Officer"), Role::FieldOfficer);
        assert_eq!(Role::from_authority("ROLE_FIELD_OFFICER"), Role::FieldOfficer);
        assert_eq!(Role::from_authority("AUDITOR"), Role::Unknown);
    }

    #[test]
    fn test_current_user_uses_first_authority() {
        let json = r#"{
            "username": "asha",
            "employeeId": 41,
            "authorities": [{"authority": "ROLE_MANAGER"}, "ADMIN"]
        }"#;
        let user: CurrentUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.employee_id, Some(41));
        assert_eq!(user.role(), Role::Manager);
    }

    #[test]
    fn test_current_user_without_authorities_is_unknown() {
        let user: CurrentUser = serde_json::from_str("{}").unwrap();
        assert_eq!(user.role(), Role::Unknown);
        assert!(!user.role().requires_team());
    }
}
