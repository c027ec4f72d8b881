//! Role and team resolution.
//!
//! Resolution always ends in [`RoleState::Resolved`]: a failed profile call
//! falls back to the stored role hint and a missing team falls back to the
//! configured sentinel team, so list fetches are never blocked.

use contracts::system::auth::Role;

use super::api::DirectoryApi;
use super::storage::StoredSession;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleContext {
    pub role: Role,
    pub team_id: Option<i64>,
    pub employee_id: Option<i64>,
}

impl RoleContext {
    pub fn new(role: Role, team_id: Option<i64>, employee_id: Option<i64>) -> Self {
        Self {
            role,
            team_id,
            employee_id,
        }
    }

    /// Team id when the role's listings are team-scoped.
    pub fn team_scope(&self) -> Option<i64> {
        if self.role.requires_team() {
            self.team_id
        } else {
            None
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RoleState {
    #[default]
    Pending,
    Resolved(RoleContext),
}

impl RoleState {
    pub fn is_determined(&self) -> bool {
        matches!(self, RoleState::Resolved(_))
    }

    pub fn context(&self) -> Option<&RoleContext> {
        match self {
            RoleState::Resolved(context) => Some(context),
            RoleState::Pending => None,
        }
    }

    pub fn role(&self) -> Role {
        self.context().map(|c| c.role).unwrap_or_default()
    }
}

pub async fn resolve_role<A: DirectoryApi + ?Sized>(
    api: &A,
    session: &StoredSession,
    fallback_team_id: i64,
) -> RoleContext {
    let (role, employee_id) = match api.current_user().await {
        Ok(user) => {
            let role = user.role();
            log::info!("Signed in as {} ({})", user.username, role.as_str());
            (role, user.employee_id.or(session.employee_id))
        }
        Err(e) => {
            log::warn!(
                "Profile lookup failed, using stored role {}: {}",
                session.role_hint.as_str(),
                e
            );
            (session.role_hint, session.employee_id)
        }
    };

    if !role.requires_team() {
        return RoleContext::new(role, None, employee_id);
    }

    let team_id = match employee_id {
        Some(id) => match api.teams_for_employee(id).await {
            Ok(teams) => teams.first().map(|t| t.id),
            Err(e) => {
                log::warn!("Team lookup for employee {} failed: {}", id, e);
                None
            }
        },
        None => None,
    };

    let team_id = team_id.unwrap_or_else(|| {
        log::warn!("No team found, using fallback team {}", fallback_team_id);
        fallback_team_id
    });
    RoleContext::new(role, Some(team_id), employee_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::api_utils::ApiError;
    use crate::shared::list_view::orchestrator::team_plan;
    use crate::shared::list_view::state::{ListViewState, SortDirection, SortState};
    use async_trait::async_trait;
    use contracts::domain::a004_team::aggregate::Team;
    use contracts::system::auth::{Authority, CurrentUser};
    use std::cell::Cell;

    struct FakeDirectory {
        user: Result<CurrentUser, ApiError>,
        teams: Result<Vec<Team>, ApiError>,
        team_calls: Cell<usize>,
    }

    impl FakeDirectory {
        fn new(user: Result<CurrentUser, ApiError>, teams: Result<Vec<Team>, ApiError>) -> Self {
            Self {
                user,
                teams,
                team_calls: Cell::new(0),
            }
        }
    }

    #[async_trait(?Send)]
    impl DirectoryApi for FakeDirectory {
        async fn current_user(&self) -> Result<CurrentUser, ApiError> {
            self.user.clone()
        }

        async fn teams_for_employee(&self, _employee_id: i64) -> Result<Vec<Team>, ApiError> {
            self.team_calls.set(self.team_calls.get() + 1);
            self.teams.clone()
        }
    }

    fn user(authority: &str, employee_id: Option<i64>) -> CurrentUser {
        CurrentUser {
            username: "asha".into(),
            employee_id,
            authorities: vec![Authority::Plain(authority.into())],
        }
    }

    fn session() -> StoredSession {
        StoredSession::from_values(Some("t".into()), Some("ADMIN".into()), Some("5".into()))
    }

    #[tokio::test]
    async fn test_admin_skips_team_lookup() {
        let api = FakeDirectory::new(Ok(user("ROLE_ADMIN", Some(1))), Ok(vec![]));
        let context = resolve_role(&api, &session(), 6).await;
        assert_eq!(context, RoleContext::new(Role::Admin, None, Some(1)));
        assert_eq!(api.team_calls.get(), 0);
    }

    #[tokio::test]
    async fn test_manager_takes_first_team() {
        let teams = vec![
            Team { id: 11, team_name: None },
            Team { id: 12, team_name: None },
        ];
        let api = FakeDirectory::new(Ok(user("MANAGER", Some(3))), Ok(teams));
        let context = resolve_role(&api, &session(), 6).await;
        assert_eq!(context.team_id, Some(11));
    }

    #[tokio::test]
    async fn test_empty_team_falls_back_and_fetch_uses_sentinel() {
        let api = FakeDirectory::new(Ok(user("ROLE_MANAGER", Some(3))), Ok(vec![]));
        let state = RoleState::Resolved(resolve_role(&api, &session(), 6).await);
        assert!(state.is_determined());

        let context = state.context().unwrap();
        let list = ListViewState::new(&["storeName"], 10, SortState::new("storeName", SortDirection::Asc));
        let plan = team_plan(context, &list, Default::default()).unwrap();
        assert_eq!(plan.query().to_query_string(), "teamId=6&page=0&size=10");
    }

    #[tokio::test]
    async fn test_team_lookup_failure_falls_back() {
        let api = FakeDirectory::new(
            Ok(user("Field Officer", None)),
            Err(ApiError::Status { status: 404 }),
        );
        let context = resolve_role(&api, &session(), 6).await;
        assert_eq!(context.role, Role::FieldOfficer);
        assert_eq!(context.employee_id, Some(5));
        assert_eq!(context.team_id, Some(6));
    }

    #[tokio::test]
    async fn test_profile_failure_uses_stored_hint() {
        let api = FakeDirectory::new(Err(ApiError::Network("offline".into())), Ok(vec![]));
        let context = resolve_role(&api, &session(), 6).await;
        assert_eq!(context, RoleContext::new(Role::Admin, None, Some(5)));
    }

    #[test]
    fn test_team_scope_only_for_team_roles() {
        assert_eq!(RoleContext::new(Role::Admin, Some(2), None).team_scope(), None);
        assert_eq!(RoleContext::new(Role::Manager, Some(2), None).team_scope(), Some(2));
        assert_eq!(RoleState::Pending.role(), Role::Unknown);
    }
}
