use contracts::domain::a002_employee::aggregate::EmployeeUpsert;
use gloo_net::http::Method;
use serde_json::Value;

use super::source::{normalize_employee, EmployeeRow};
use crate::shared::api_utils::{ApiClient, ApiError, QueryParams};

/// Create a new employee
pub async fn create_employee(client: &ApiClient, dto: &EmployeeUpsert) -> Result<(), ApiError> {
    client
        .send_body(Method::POST, "/employee/add", &QueryParams::new(), dto)
        .await
}

/// Update an existing employee
pub async fn update_employee(client: &ApiClient, id: i64, dto: &EmployeeUpsert) -> Result<(), ApiError> {
    client
        .send_body(Method::PUT, "/employee/update", &QueryParams::new().with("id", id), dto)
        .await
}

/// Delete an employee
pub async fn delete_employee(client: &ApiClient, id: i64) -> Result<(), ApiError> {
    client
        .send_empty(Method::DELETE, "/employee/delete", &QueryParams::new().with("id", id))
        .await
}

/// Field officers, used as assignees for stores and tasks
pub async fn fetch_field_officers(client: &ApiClient) -> Result<Vec<EmployeeRow>, ApiError> {
    let body: Vec<Value> = client
        .get_json("/employee/getFieldOfficer", &QueryParams::new())
        .await?;
    Ok(body.iter().map(normalize_employee).collect())
}
