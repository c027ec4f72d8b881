use serde::{Deserialize, Serialize};

/// Payload for `POST /employee/add` and `PUT /employee/update`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeUpsert {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub primary_contact: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_contact: Option<String>,
    pub role: String,
    pub department_name: String,
    pub address_line1: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub date_of_joining: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Roles an employee can be created with.
pub const EMPLOYEE_ROLES: &[&str] = &["Field Officer", "Manager", "Admin"];
