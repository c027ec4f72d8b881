use async_trait::async_trait;
use contracts::domain::a004_team::aggregate::Team;
use contracts::system::auth::CurrentUser;

use crate::shared::api_utils::{ApiClient, ApiError, QueryParams};

/// Lookups needed to resolve the acting user's role and team.
#[async_trait(?Send)]
pub trait DirectoryApi {
    async fn current_user(&self) -> Result<CurrentUser, ApiError>;

    async fn teams_for_employee(&self, employee_id: i64) -> Result<Vec<Team>, ApiError>;
}

/// REST implementation backed by the authenticated client.
pub struct HttpDirectory {
    client: ApiClient,
}

impl HttpDirectory {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait(?Send)]
impl DirectoryApi for HttpDirectory {
    /// Get the profile of the authenticated user
    async fn current_user(&self) -> Result<CurrentUser, ApiError> {
        self.client.get_json("/user/me", &QueryParams::new()).await
    }

    /// Teams the employee belongs to; usually zero or one
    async fn teams_for_employee(&self, employee_id: i64) -> Result<Vec<Team>, ApiError> {
        self.client
            .get_json(
                "/employee/team/getbyEmployee",
                &QueryParams::new().with("id", employee_id),
            )
            .await
    }
}
