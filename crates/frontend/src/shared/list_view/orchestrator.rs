//! Role-aware fetch planning and outcome application.
//!
//! A page provides a [`ListSource`]. The [`FetchDriver`] decides when a fetch
//! may fire, tags it with a generation and drops any response that is no
//! longer the latest.

use async_trait::async_trait;
use contracts::shared::page::PageResponse;

use super::state::{ListViewState, SortState};
use crate::config::FeatureFlags;
use crate::shared::api_utils::{ApiClient, ApiError, QueryParams};
use crate::system::auth::role::{RoleContext, RoleState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageWindow {
    pub page: usize,
    pub size: usize,
}

impl PageWindow {
    pub fn of(state: &ListViewState) -> Self {
        Self {
            page: state.page.index,
            size: state.page.size,
        }
    }

    fn push_into(&self, query: &mut QueryParams) {
        query.push("page", self.page).push("size", self.size);
    }
}

/// One listing request, decided from role and committed state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchPlan {
    /// Manager and field officer listings. User filters are not sent.
    TeamScoped {
        team_id: i64,
        window: PageWindow,
        scope: QueryParams,
    },
    /// Admin (and unknown role) listings with every non-empty filter.
    /// `sort.column` is already the backend sort key.
    Filtered {
        params: QueryParams,
        sort: SortState,
        window: PageWindow,
    },
    /// Admin store listing narrowed to one assigned employee.
    EmployeeScoped { employee_id: i64, window: PageWindow },
}

impl FetchPlan {
    pub fn window(&self) -> PageWindow {
        match self {
            FetchPlan::TeamScoped { window, .. }
            | FetchPlan::Filtered { window, .. }
            | FetchPlan::EmployeeScoped { window, .. } => *window,
        }
    }

    /// Query parameters in wire order.
    pub fn query(&self) -> QueryParams {
        let mut query = QueryParams::new();
        match self {
            FetchPlan::TeamScoped {
                team_id,
                window,
                scope,
            } => {
                query.push("teamId", team_id);
                for (k, v) in scope.iter() {
                    query.push(k, v);
                }
                window.push_into(&mut query);
            }
            FetchPlan::Filtered {
                params,
                sort,
                window,
            } => {
                for (k, v) in params.iter() {
                    query.push(k, v);
                }
                window.push_into(&mut query);
                query
                    .push("sortBy", &sort.column)
                    .push("sortOrder", sort.direction.as_str());
            }
            FetchPlan::EmployeeScoped {
                employee_id,
                window,
            } => {
                query.push("id", employee_id);
                window.push_into(&mut query);
            }
        }
        query
    }
}

/// Team-scoped plan when the role is bound to a team, otherwise `None` so the
/// caller builds its filtered plan.
pub fn team_plan(role: &RoleContext, state: &ListViewState, scope: QueryParams) -> Option<FetchPlan> {
    role.team_scope().map(|team_id| FetchPlan::TeamScoped {
        team_id,
        window: PageWindow::of(state),
        scope,
    })
}

/// A normalized page of rows.
#[derive(Debug, Clone, PartialEq)]
pub struct ListPage<R> {
    pub rows: Vec<R>,
    pub total_pages: usize,
    pub total_elements: u64,
}

impl<R> ListPage<R> {
    pub fn from_response<T>(response: PageResponse<T>, map: impl Fn(T) -> R) -> Self {
        Self {
            total_pages: response.total_pages,
            total_elements: response.total_elements,
            rows: response.content.into_iter().map(map).collect(),
        }
    }

    /// Slice an in-memory set into the requested window.
    pub fn slice(all: Vec<R>, window: PageWindow) -> Self {
        let total_elements = all.len() as u64;
        let total_pages = all.len().div_ceil(window.size.max(1));
        let rows = all
            .into_iter()
            .skip(window.page.saturating_mul(window.size))
            .take(window.size)
            .collect();
        Self {
            rows,
            total_pages,
            total_elements,
        }
    }
}

/// Per-page data source injected into the list controller.
#[async_trait(?Send)]
pub trait ListSource {
    type Row: Clone + 'static;

    fn plan(&self, role: &RoleContext, state: &ListViewState, flags: FeatureFlags) -> FetchPlan;

    /// `client` carries the session token current when the request is issued.
    async fn fetch(&self, client: &ApiClient, plan: &FetchPlan) -> Result<ListPage<Self::Row>, ApiError>;

    /// Drop anything cached between fetches.
    fn invalidate(&self) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Default)]
pub struct FetchDriver {
    generation: u64,
    last_plan: Option<FetchPlan>,
}

impl FetchDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next request to issue, if any. Nothing fires before
    /// hydration, before the role is known, or while a team-bound role has no
    /// team. A plan identical to the last issued one is skipped, unless the
    /// role went back to pending in between (new session).
    pub fn poll<S: ListSource + ?Sized>(
        &mut self,
        hydrated: bool,
        role: &RoleState,
        state: &ListViewState,
        source: &S,
        flags: FeatureFlags,
    ) -> Option<(Ticket, FetchPlan)> {
        if !hydrated {
            return None;
        }
        let RoleState::Resolved(context) = role else {
            // Responses still in flight belong to the previous session
            if self.last_plan.take().is_some() {
                self.generation += 1;
            }
            return None;
        };
        if context.role.requires_team() && context.team_id.is_none() {
            log::debug!("Waiting for team id before fetching");
            return None;
        }

        let plan = source.plan(context, state, flags);
        if self.last_plan.as_ref() == Some(&plan) {
            return None;
        }
        self.generation += 1;
        self.last_plan = Some(plan.clone());
        log::debug!("Fetch #{}: {:?}", self.generation, plan);
        Some((Ticket(self.generation), plan))
    }

    /// Forget the last plan so the next poll fetches again.
    pub fn invalidate(&mut self) {
        self.last_plan = None;
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.generation
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListResult<R> {
    pub rows: Vec<R>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<R> Default for ListResult<R> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            loading: false,
            error: None,
        }
    }
}

impl<R> ListResult<R> {
    pub fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }
}

/// Apply a response. Returns `false` when the ticket is stale and nothing
/// changed.
pub fn apply_outcome<R>(
    driver: &FetchDriver,
    ticket: Ticket,
    outcome: Result<ListPage<R>, ApiError>,
    result: &mut ListResult<R>,
    state: &mut ListViewState,
) -> bool {
    if !driver.is_current(ticket) {
        log::debug!("Dropping stale response #{}", ticket.0);
        return false;
    }
    match outcome {
        Ok(page) => {
            result.rows = page.rows;
            result.error = None;
            state.apply_totals(page.total_pages, page.total_elements);
        }
        Err(e) => {
            log::error!("List fetch failed: {}", e);
            result.rows.clear();
            result.error = Some(e.to_string());
        }
    }
    result.loading = false;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::list_view::state::{FilterMode, SortDirection};
    use contracts::system::auth::Role;
    use std::cell::RefCell;

    struct FakeSource {
        calls: RefCell<Vec<FetchPlan>>,
    }

    impl FakeSource {
        fn new() -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    #[async_trait(?Send)]
    impl ListSource for FakeSource {
        type Row = String;

        fn plan(&self, role: &RoleContext, state: &ListViewState, _flags: FeatureFlags) -> FetchPlan {
            team_plan(role, state, QueryParams::new()).unwrap_or_else(|| {
                let mut params = QueryParams::new();
                params.push_non_empty("name", state.committed.get("name"));
                FetchPlan::Filtered {
                    params,
                    sort: state.sort.clone(),
                    window: PageWindow::of(state),
                }
            })
        }

        async fn fetch(&self, _client: &ApiClient, plan: &FetchPlan) -> Result<ListPage<String>, ApiError> {
            self.calls.borrow_mut().push(plan.clone());
            Ok(ListPage {
                rows: vec!["a".into(), "b".into()],
                total_pages: 1,
                total_elements: 2,
            })
        }
    }

    fn state() -> ListViewState {
        ListViewState::new(&["name"], 10, SortState::new("name", SortDirection::Asc))
    }

    fn admin() -> RoleState {
        RoleState::Resolved(RoleContext::new(Role::Admin, None, Some(1)))
    }

    #[test]
    fn test_no_fetch_before_hydration_or_role() {
        let source = FakeSource::new();
        let mut driver = FetchDriver::new();
        let flags = FeatureFlags::default();

        assert!(driver.poll(false, &admin(), &state(), &source, flags).is_none());
        assert!(driver.poll(true, &RoleState::Pending, &state(), &source, flags).is_none());
        assert!(!driver.is_current(first));
        assert!(driver.poll(true, &admin(), &state(), &source, flags).is_some());
    }

    #[test]
    fn test_hydrated_page_size_used_by_first_fetch() {
        let source = FakeSource::new();
        let mut driver = FetchDriver::new();
        let flags = FeatureFlags::default();

        let transient = state();
        assert!(driver.poll(false, &admin(), &transient, &source, flags).is_none());

        let mut restored = state();
        restored.page.size = 25;
        let (_, plan) = driver.poll(true, &admin(), &restored, &source, flags).unwrap();
        assert_eq!(plan.window().size, 25);
    }

    #[test]
    fn test_manager_waits_for_team_then_fetches_once() {
        let source = FakeSource::new();
        let mut driver = FetchDriver::new();
        let flags = FeatureFlags::default();

        let waiting = RoleState::Resolved(RoleContext::new(Role::Manager, None, Some(4)));
        assert!(driver.poll(true, &waiting, &state(), &source, flags).is_none());

        let ready = RoleState::Resolved(RoleContext::new(Role::Manager, Some(3), Some(4)));
        let (_, plan) = driver.poll(true, &ready, &state(), &source, flags).unwrap();
        assert!(matches!(plan, FetchPlan::TeamScoped { team_id: 3, .. }));
        assert!(driver.poll(true, &ready, &state(), &source, flags).is_none());
    }

    #[test]
    fn test_identical_plan_deduplicated_until_invalidated() {
        let source = FakeSource::new();
        let mut driver = FetchDriver::new();
        let flags = FeatureFlags::default();

        assert!(driver.poll(true, &admin(), &state(), &source, flags).is_some());
        assert!(driver.poll(true, &admin(), &state(), &source, flags).is_none());
        driver.invalidate();
        assert!(driver.poll(true, &admin(), &state(), &source, flags).is_some());
    }

    #[test]
    fn test_session_change_reissues_same_plan() {
        let source = FakeSource::new();
        let mut driver = FetchDriver::new();
        let flags = FeatureFlags::default();
        let other_admin = RoleState::Resolved(RoleContext::new(Role::Admin, None, Some(2)));

        let (first, first_plan) = driver.poll(true, &admin(), &state(), &source, flags).unwrap();
        assert!(driver.poll(true, &RoleState::Pending, &state(), &source, flags).is_none());
        assert!(!driver.is_current(first));

        let (second, second_plan) = driver.poll(true, &other_admin, &state(), &source, flags).unwrap();
        assert_eq!(first_plan, second_plan);
        assert!(driver.is_current(second));
    }

    #[test]
    fn test_team_plan_ignores_filters() {
        let mut st = state();
        st.set_filter("name", "Acme", FilterMode::Direct);
        let role = RoleContext::new(Role::FieldOfficer, Some(6), Some(9));
        let plan = team_plan(&role, &st, QueryParams::new()).unwrap();
        assert_eq!(plan.query().to_query_string(), "teamId=6&page=0&size=10");
    }

    #[tokio::test]
    async fn test_stale_response_dropped() {
        let source = FakeSource::new();
        let mut driver = FetchDriver::new();
        let flags = FeatureFlags::default();
        let mut st = state();
        let mut result = ListResult::default();

        let (first, first_plan) = driver.poll(true, &admin(), &st, &source, flags).unwrap();
        st.set_filter("name", "Acme", FilterMode::Direct);
        let (second, second_plan) = driver.poll(true, &admin(), &st, &source, flags).unwrap();
        result.begin();

        let late = source.fetch(&ApiClient::new("http://crm.test", None), &second_plan).await;
        assert!(apply_outcome(&driver, second, late, &mut result, &mut st));
        let early = Err(ApiError::Status { status: 500 });
        assert!(!apply_outcome(&driver, first, early, &mut result, &mut st));

        assert_eq!(result.rows.len(), 2);
        assert_eq!(result.error, None);
        assert!(!result.loading);
        assert_eq!(source.calls.borrow().len(), 1);
        assert_ne!(first_plan, second_plan);
    }

    #[test]
    fn test_success_clamps_page() {
        let source = FakeSource::new();
        let mut driver = FetchDriver::new();
        let mut st = state();
        st.set_page(7);
        let mut result = ListResult::default();
        let (ticket, _) = driver
            .poll(true, &admin(), &st, &source, FeatureFlags::default())
            .unwrap();

        let page = ListPage {
            rows: vec!["x".to_string()],
            total_pages: 3,
            total_elements: 21,
        };
        apply_outcome(&driver, ticket, Ok(page), &mut result, &mut st);
        assert_eq!(st.page.index, 2);
        assert_eq!(st.page.total_pages, 3);

        let (ticket, _) = driver
            .poll(true, &admin(), &st, &source, FeatureFlags::default())
            .unwrap();
        let empty = ListPage::<String> {
            rows: vec![],
            total_pages: 0,
            total_elements: 0,
        };
        apply_outcome(&driver, ticket, Ok(empty), &mut result, &mut st);
        assert_eq!(st.page.index, 0);
        assert_eq!(st.page.total_pages, 1);
    }

    #[test]
    fn test_failure_clears_rows_and_keeps_pagination() {
        let source = FakeSource::new();
        let mut driver = FetchDriver::new();
        let mut st = state();
        st.apply_totals(5, 50);
        st.set_page(3);
        let mut result = ListResult {
            rows: vec!["old".to_string()],
            loading: true,
            error: None,
        };
        let (ticket, _) = driver
            .poll(true, &admin(), &st, &source, FeatureFlags::default())
            .unwrap();

        apply_outcome(&driver, ticket, Err(ApiError::Status { status: 502 }), &mut result, &mut st);
        assert!(result.rows.is_empty());
        assert_eq!(result.error.as_deref(), Some("Request failed: 502"));
        assert!(!result.loading);
        assert_eq!(st.page.index, 3);
        assert_eq!(st.page.total_pages, 5);
    }

    #[test]
    fn test_slice_in_memory() {
        let all: Vec<u32> = (1..=23).collect();
        let page = ListPage::slice(all, PageWindow { page: 2, size: 10 });
        assert_eq!(page.rows, vec![21, 22, 23]);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_elements, 23);
    }

    #[test]
    fn test_slice_far_past_the_end_is_empty() {
        let all: Vec<u32> = (1..=5).collect();
        let page = ListPage::slice(all, PageWindow { page: usize::MAX / 2, size: 10 });
        assert!(page.rows.is_empty());
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.total_elements, 5);
    }
}
