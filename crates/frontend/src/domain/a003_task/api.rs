use contracts::domain::a003_task::aggregate::{TaskStatus, TaskUpsert};
use gloo_net::http::Method;

use crate::shared::api_utils::{ApiClient, ApiError, QueryParams};

fn by_task_id(id: i64) -> QueryParams {
    QueryParams::new().with("taskId", id)
}

pub async fn create_task(client: &ApiClient, dto: &TaskUpsert) -> Result<(), ApiError> {
    client
        .send_body(Method::POST, "/task/create", &QueryParams::new(), dto)
        .await
}

pub async fn update_task(client: &ApiClient, id: i64, dto: &TaskUpsert) -> Result<(), ApiError> {
    client
        .send_body(Method::PUT, "/task/updateTask", &by_task_id(id), dto)
        .await
}

/// Move a task to another workflow status
pub async fn update_task_status(
    client: &ApiClient,
    id: i64,
    status: TaskStatus,
) -> Result<(), ApiError> {
    let query = by_task_id(id).with("status", status.as_str());
    client
        .send_empty(Method::PUT, "/task/updateTaskStatus", &query)
        .await
}

pub async fn delete_task(client: &ApiClient, id: i64) -> Result<(), ApiError> {
    client
        .send_empty(Method::DELETE, "/task/deleteById", &by_task_id(id))
        .await
}
