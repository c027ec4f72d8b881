//! Requirements listing.
//!
//! The task endpoints only accept a date range, so the whole range is fetched
//! once and cached. Type, status and search filters, sorting and paging are
//! applied here, and changing any of them does not hit the network again.

use async_trait::async_trait;
use contracts::domain::a003_task::aggregate::{TaskStatus, TaskType, TaskUpsert, TASK_PRIORITIES};
use contracts::shared::page::Listing;
use serde_json::Value;
use std::cell::RefCell;
use std::cmp::Ordering;

use crate::config::FeatureFlags;
use crate::shared::api_utils::{ApiClient, ApiError, QueryParams};
use crate::shared::date_utils::format_date;
use crate::shared::list_utils::{cmp_text, contains_text, filter_list, sort_list, Searchable, Sortable};
use crate::shared::list_view::normalize::{full_name, i64_field, nested, opt_i64, opt_str, str_field};
use crate::shared::list_view::orchestrator::{team_plan, FetchPlan, ListPage, ListSource, PageWindow};
use crate::shared::list_view::persistence::PersistenceSpec;
use crate::shared::list_view::state::{ListViewState, SortDirection, SortState};
use crate::system::auth::role::RoleContext;

pub const STORAGE_KEY: &str = "requirements.filters.v1";

pub const F_START_DATE: &str = "startDate";
pub const F_END_DATE: &str = "endDate";
pub const F_TASK_TYPE: &str = "taskType";
pub const F_STATUS: &str = "status";
pub const F_SEARCH: &str = "search";
pub const FILTER_FIELDS: &[&str] = &[F_START_DATE, F_END_DATE, F_TASK_TYPE, F_STATUS, F_SEARCH];

pub const FILTER_LABELS: &[(&str, &str)] = &[
    (F_START_DATE, "From"),
    (F_END_DATE, "To"),
    (F_TASK_TYPE, "Type"),
    (F_STATUS, "Status"),
    (F_SEARCH, "Search"),
];

pub const SORT_COLUMNS: &[&str] = &["dueDate", "taskTitle", "status", "priority", "assignedTo"];

pub const COLUMNS: &[(&str, &str)] = &[
    ("taskTitle", "Title"),
    ("store", "Store"),
    ("taskType", "Type"),
    ("status", "Status"),
    ("priority", "Priority"),
    ("assignedTo", "Assigned to"),
    ("dueDate", "Due date"),
];

pub const COLUMN_IDS: &[&str] = &[
    "taskTitle",
    "store",
    "taskType",
    "status",
    "priority",
    "assignedTo",
    "dueDate",
];

pub const PERSISTENCE: PersistenceSpec = PersistenceSpec {
    key: STORAGE_KEY,
    sort_columns: SORT_COLUMNS,
    columns: COLUMN_IDS,
};

pub fn default_state(page_size: usize) -> ListViewState {
    ListViewState::new(
        FILTER_FIELDS,
        page_size,
        SortState::new("dueDate", SortDirection::Asc),
    )
    .with_columns(COLUMN_IDS)
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TaskRow {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub assignment_date: String,
    pub status: String,
    pub priority: String,
    pub task_type: String,
    pub store_id: i64,
    pub store_name: String,
    pub assigned_to_id: i64,
    pub assigned_to_name: String,
    pub assigned_by_id: Option<i64>,
}

impl TaskRow {
    pub fn cell(&self, column: &str) -> String {
        match column {
            "taskTitle" => self.title.clone(),
            "store" => self.store_name.clone(),
            "taskType" => self.task_type.clone(),
            "status" => self.status.clone(),
            "priority" => self.priority.clone(),
            "assignedTo" => self.assigned_to_name.clone(),
            "dueDate" => format_date(&self.due_date),
            _ => String::new(),
        }
    }

    pub fn to_upsert(&self) -> TaskUpsert {
        TaskUpsert {
            task_title: self.title.clone(),
            task_description: self.description.clone(),
            due_date: self.due_date.clone(),
            assignment_date: self.assignment_date.clone(),
            status: TaskStatus::parse(&self.status).unwrap_or_default(),
            priority: self.priority.clone(),
            task_type: TaskType::parse(&self.task_type).unwrap_or_default(),
            store_id: self.store_id,
            assigned_to_id: self.assigned_to_id,
            assigned_by_id: self.assigned_by_id,
        }
    }
}

fn priority_rank(priority: &str) -> usize {
    TASK_PRIORITIES
        .iter()
        .position(|p| p.eq_ignore_ascii_case(priority))
        .unwrap_or(TASK_PRIORITIES.len())
}

impl Sortable for TaskRow {
    fn compare_by_field(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "taskTitle" => cmp_text(&self.title, &other.title),
            "status" => cmp_text(&self.status, &other.status),
            "priority" => priority_rank(&self.priority).cmp(&priority_rank(&other.priority)),
            "assignedTo" => cmp_text(&self.assigned_to_name, &other.assigned_to_name),
            // ISO dates compare lexically
            _ => self.due_date.cmp(&other.due_date),
        }
    }
}

impl Searchable for TaskRow {
    fn matches_filter(&self, filter: &str) -> bool {
        contains_text(&self.title, filter)
            || contains_text(&self.description, filter)
            || contains_text(&self.store_name, filter)
            || contains_text(&self.assigned_to_name, filter)
    }
}

pub fn normalize_task(v: &Value) -> TaskRow {
    let store = nested(v, &["store"]);
    let assignee = nested(v, &["assignedTo"]).filter(|a| a.is_object());

    let assigned_to_name = opt_str(v, &["assignedToName", "employeeName"])
        .or_else(|| {
            assignee.map(|a| full_name(&str_field(a, &["firstName"]), &str_field(a, &["lastName"])))
        })
        .unwrap_or_default();

    TaskRow {
        id: i64_field(v, &["id", "taskId"]),
        title: str_field(v, &["taskTitle", "title"]),
        description: str_field(v, &["taskDescription", "description"]),
        due_date: str_field(v, &["dueDate"]),
        assignment_date: str_field(v, &["assignmentDate"]),
        status: str_field(v, &["status"]),
        priority: str_field(v, &["priority"]),
        task_type: str_field(v, &["taskType", "type"]),
        store_id: opt_i64(v, &["storeId"])
            .or_else(|| store.and_then(|s| opt_i64(s, &["storeId", "id"])))
            .unwrap_or(0),
        store_name: opt_str(v, &["storeName"])
            .or_else(|| store.and_then(|s| opt_str(s, &["storeName"])))
            .unwrap_or_default(),
        assigned_to_id: opt_i64(v, &["assignedToId"])
            .or_else(|| assignee.and_then(|a| opt_i64(a, &["id", "employeeId"])))
            .unwrap_or(0),
        assigned_to_name,
        assigned_by_id: opt_i64(v, &["assignedById"])
            .or_else(|| nested(v, &["assignedBy"]).and_then(|a| opt_i64(a, &["id", "employeeId"]))),
    }
}

/// Filters and sort as carried by the plan. The team plan has no sort slot,
/// so its scope carries `sortBy`/`sortOrder` alongside the filters.
fn scope(state: &ListViewState, default_range: &(String, String), with_sort: bool) -> QueryParams {
    let filters = &state.committed;
    let start = Some(filters.get(F_START_DATE)).filter(|s| !s.is_empty());
    let end = Some(filters.get(F_END_DATE)).filter(|s| !s.is_empty());

    let mut scope = QueryParams::new();
    scope
        .push(F_START_DATE, start.unwrap_or(default_range.0.as_str()))
        .push(F_END_DATE, end.unwrap_or(default_range.1.as_str()))
        .push_non_empty(F_TASK_TYPE, filters.get(F_TASK_TYPE))
        .push_non_empty(F_STATUS, filters.get(F_STATUS))
        .push_non_empty(F_SEARCH, filters.get(F_SEARCH));
    if with_sort {
        scope
            .push("sortBy", &state.sort.column)
            .push("sortOrder", state.sort.direction.as_str());
    }
    scope
}

pub fn plan_tasks(role: &RoleContext, state: &ListViewState, default_range: &(String, String)) -> FetchPlan {
    if let Some(plan) = team_plan(role, state, scope(state, default_range, true)) {
        return plan;
    }
    FetchPlan::Filtered {
        params: scope(state, default_range, false),
        sort: state.sort.clone(),
        window: PageWindow::of(state),
    }
}

struct TaskView {
    team_id: Option<i64>,
    params: QueryParams,
    sort: SortState,
}

fn view_of(plan: &FetchPlan) -> TaskView {
    match plan {
        FetchPlan::TeamScoped { team_id, scope, .. } => TaskView {
            team_id: Some(*team_id),
            params: scope.clone(),
            sort: SortState::new(
                scope.get("sortBy").unwrap_or("dueDate"),
                scope
                    .get("sortOrder")
                    .and_then(SortDirection::parse)
                    .unwrap_or(SortDirection::Asc),
            ),
        },
        FetchPlan::Filtered { params, sort, .. } => TaskView {
            team_id: None,
            params: params.clone(),
            sort: sort.clone(),
        },
        FetchPlan::EmployeeScoped { .. } => TaskView {
            team_id: None,
            params: QueryParams::new(),
            sort: SortState::new("dueDate", SortDirection::Asc),
        },
    }
}

/// Endpoint and wire query. Only the date range (and team) reach the backend.
pub fn request(plan: &FetchPlan) -> (&'static str, QueryParams) {
    let view = view_of(plan);
    let mut query = QueryParams::new();
    if let Some(team_id) = view.team_id {
        query.push("teamId", team_id);
    }
    query
        .push("start", view.params.get(F_START_DATE).unwrap_or(""))
        .push("end", view.params.get(F_END_DATE).unwrap_or(""));
    let path = if view.team_id.is_some() {
        "/task/getByTeamAndDate"
    } else {
        "/task/getByDate"
    };
    (path, query)
}

pub fn rows_from_json(body: Value) -> Result<Vec<TaskRow>, ApiError> {
    let listing: Listing<Value> =
        serde_json::from_value(body).map_err(|e| ApiError::Parse(e.to_string()))?;
    let items = match listing {
        Listing::All(items) => items,
        Listing::Page(page) => page.content,
    };
    Ok(items.iter().map(normalize_task).collect())
}

/// Apply type, status and search filters, sort, then cut the plan's window.
pub fn page_of(plan: &FetchPlan, rows: Vec<TaskRow>) -> ListPage<TaskRow> {
    let view = view_of(plan);
    let task_type = view.params.get(F_TASK_TYPE).unwrap_or("");
    let status = view.params.get(F_STATUS).unwrap_or("");

    let rows: Vec<TaskRow> = rows
        .into_iter()
        .filter(|r| task_type.is_empty() || r.task_type.eq_ignore_ascii_case(task_type))
        .filter(|r| status.is_empty() || r.status.eq_ignore_ascii_case(status))
        .collect();
    let mut rows = filter_list(rows, view.params.get(F_SEARCH).unwrap_or(""));
    sort_list(&mut rows, &view.sort.column, view.sort.direction.is_ascending());
    ListPage::slice(rows, plan.window())
}

pub struct TaskSource {
    default_range: (String, String),
    cache: RefCell<Option<(String, Vec<TaskRow>)>>,
}

impl TaskSource {
    /// `default_range` applies while the date filters are empty.
    pub fn new(default_range: (String, String)) -> Self {
        Self {
            default_range,
            cache: RefCell::new(None),
        }
    }

    fn cached(&self, key: &str) -> Option<Vec<TaskRow>> {
        self.cache
            .borrow()
            .as_ref()
            .filter(|(k, _)| k == key)
            .map(|(_, rows)| rows.clone())
    }
}

#[async_trait(?Send)]
impl ListSource for TaskSource {
    type Row = TaskRow;

    fn plan(&self, role: &RoleContext, state: &ListViewState, _flags: FeatureFlags) -> FetchPlan {
        plan_tasks(role, state, &self.default_range)
    }

    async fn fetch(&self, client: &ApiClient, plan: &FetchPlan) -> Result<ListPage<TaskRow>, ApiError> {
        let (path, query) = request(plan);
        let key = format!("{}?{}", path, query.to_query_string());

        let rows = match self.cached(&key) {
            Some(rows) => rows,
            None => {
                let body: Value = client.get_json(path, &query).await?;
                let rows = rows_from_json(body)?;
                log::debug!("Loaded {} tasks for {}", rows.len(), key);
                *self.cache.borrow_mut() = Some((key, rows.clone()));
                rows
            }
        };
        Ok(page_of(plan, rows))
    }

    fn invalidate(&self) {
        self.cache.borrow_mut().take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::list_view::state::FilterMode;
    use contracts::system::auth::Role;
    use serde_json::json;

    fn range() -> (String, String) {
        ("2026-10-01".into(), "2026-10-31".into())
    }

    fn admin() -> RoleContext {
        RoleContext::new(Role::Admin, None, None)
    }

    fn rows() -> Vec<TaskRow> {
        rows_from_json(json!([
            {"id": 1, "taskTitle": "Restock shelf", "taskType": "requirement", "status": "Assigned", "priority": "high", "dueDate": "2026-10-20"},
            {"id": 2, "taskTitle": "Broken fridge", "taskType": "complaint", "status": "Completed", "priority": "low", "dueDate": "2026-10-05"},
            {"id": 3, "taskTitle": "New display", "taskType": "requirement", "status": "Work In Progress", "priority": "medium", "dueDate": "2026-10-12"}
        ]))
        .unwrap()
    }

    #[test]
    fn test_empty_dates_use_default_range() {
        let plan = plan_tasks(&admin(), &default_state(10), &range());
        let (path, query) = request(&plan);
        assert_eq!(path, "/task/getByDate");
        assert_eq!(query.to_query_string(), "start=2026-10-01&end=2026-10-31");
    }

    #[test]
    fn test_team_request_sends_only_team_and_dates() {
        let mut state = default_state(10);
        state.set_filter(F_START_DATE, "2026-09-01", FilterMode::Direct);
        state.set_filter(F_STATUS, "Completed", FilterMode::Direct);
        let role = RoleContext::new(Role::FieldOfficer, Some(6), Some(3));
        let plan = plan_tasks(&role, &state, &range());
        let (path, query) = request(&plan);
        assert_eq!(path, "/task/getByTeamAndDate");
        assert_eq!(query.to_query_string(), "teamId=6&start=2026-09-01&end=2026-10-31");
    }

    #[test]
    fn test_sort_change_keeps_request_but_changes_plan() {
        let mut state = default_state(10);
        let before = plan_tasks(&admin(), &state, &range());
        state.set_sort("priority");
        let after = plan_tasks(&admin(), &state, &range());
        assert_ne!(before, after);
        assert_eq!(request(&before), request(&after));
    }

    #[test]
    fn test_in_memory_filter_sort_and_page() {
        let mut state = default_state(1);
        state.set_filter(F_TASK_TYPE, "requirement", FilterMode::Direct);
        let plan = plan_tasks(&admin(), &state, &range());
        let page = page_of(&plan, rows());
        assert_eq!(page.total_elements, 2);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.rows[0].id, 3);

        state.set_sort("priority");
        state.set_sort("priority");
        let plan = plan_tasks(&admin(), &state, &range());
        let page = page_of(&plan, rows());
        assert_eq!(page.rows[0].priority, "high");
    }

    #[test]
    fn test_team_plan_sorts_from_scope() {
        let mut state = default_state(10);
        state.set_sort("taskTitle");
        let role = RoleContext::new(Role::Manager, Some(4), None);
        let plan = plan_tasks(&role, &state, &range());
        let titles: Vec<_> = page_of(&plan, rows()).rows.into_iter().map(|r| r.title).collect();
        assert_eq!(titles, vec!["Broken fridge", "New display", "Restock shelf"]);
    }

    #[test]
    fn test_status_and_search_filters() {
        let mut state = default_state(10);
        state.set_filter(F_STATUS, "work in progress", FilterMode::Direct);
        let plan = plan_tasks(&admin(), &state, &range());
        assert_eq!(page_of(&plan, rows()).rows.len(), 1);

        state.clear_all();
        state.set_filter(F_SEARCH, "fridge", FilterMode::Direct);
        let plan = plan_tasks(&admin(), &state, &range());
        assert_eq!(page_of(&plan, rows()).rows[0].id, 2);
    }

    #[test]
    fn test_normalize_nested_shapes() {
        let row = normalize_task(&json!({
            "taskId": "7",
            "title": "Signage",
            "store": {"id": 12, "storeName": "Acme"},
            "assignedTo": {"id": 4, "firstName": "Ravi", "lastName": "K"},
            "assignedBy": {"id": 1}
        }));
        assert_eq!(row.id, 7);
        assert_eq!(row.store_id, 12);
        assert_eq!(row.store_name, "Acme");
        assert_eq!(row.assigned_to_id, 4);
        assert_eq!(row.assigned_to_name, "Ravi K");
        assert_eq!(row.assigned_by_id, Some(1));
        assert_eq!(row.to_upsert().status, TaskStatus::Assigned);
        assert_eq!(row.cell("store"), "Acme");
    }

    #[test]
    fn test_page_envelope_accepted() {
        let body = json!({"content": [{"id": 1}], "totalPages": 1, "totalElements": 1});
        assert_eq!(rows_from_json(body).unwrap().len(), 1);
        assert!(matches!(rows_from_json(json!("nope")), Err(ApiError::Parse(_))));
    }
}
