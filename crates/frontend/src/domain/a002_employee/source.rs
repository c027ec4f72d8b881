//! Employee listing. The inactive and field-officer endpoints return bare
//! arrays, which are searched, sorted and paged here.

use async_trait::async_trait;
use contracts::domain::a002_employee::aggregate::EmployeeUpsert;
use contracts::shared::page::Listing;
use serde_json::Value;
use std::cmp::Ordering;

use crate::config::FeatureFlags;
use crate::shared::api_utils::{ApiClient, ApiError, QueryParams};
use crate::shared::list_utils::{cmp_text, contains_text, filter_list, sort_list, Searchable, Sortable};
use crate::shared::list_view::normalize::{bool_field, full_name, i64_field, opt_str, str_field};
use crate::shared::list_view::orchestrator::{team_plan, FetchPlan, ListPage, ListSource, PageWindow};
use crate::shared::list_view::persistence::PersistenceSpec;
use crate::shared::list_view::state::{ListViewState, SortDirection, SortState};
use crate::system::auth::role::RoleContext;

pub const STORAGE_KEY: &str = "employees.list.state.v1";

pub const F_SEARCH: &str = "search";
pub const F_STATUS: &str = "status";
pub const FILTER_FIELDS: &[&str] = &[F_SEARCH, F_STATUS];

pub const FILTER_LABELS: &[(&str, &str)] = &[(F_SEARCH, "Search"), (F_STATUS, "Status")];

pub const STATUS_ALL: &str = "all";
pub const STATUS_INACTIVE: &str = "inactive";
pub const STATUS_FIELD_OFFICERS: &str = "fieldOfficers";

pub const STATUS_OPTIONS: &[(&str, &str)] = &[
    (STATUS_ALL, "All"),
    (STATUS_INACTIVE, "Inactive"),
    (STATUS_FIELD_OFFICERS, "Field officers"),
];

pub const SORT_COLUMNS: &[&str] = &["firstName", "lastName", "role", "city"];

pub const COLUMNS: &[(&str, &str)] = &[
    ("name", "Name"),
    ("email", "Email"),
    ("primaryContact", "Contact"),
    ("role", "Role"),
    ("department", "Department"),
    ("city", "City"),
    ("status", "Status"),
];

pub const COLUMN_IDS: &[&str] = &[
    "name",
    "email",
    "primaryContact",
    "role",
    "department",
    "city",
    "status",
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
        SortState::new("firstName", SortDirection::Asc),
    )
    .with_columns(COLUMN_IDS)
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct EmployeeRow {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub primary_contact: String,
    pub secondary_contact: String,
    pub role: String,
    pub department: String,
    pub address_line1: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub date_of_joining: String,
    pub user_name: String,
    pub active: bool,
}

impl EmployeeRow {
    pub fn name(&self) -> String {
        full_name(&self.first_name, &self.last_name)
    }

    pub fn cell(&self, column: &str) -> String {
        match column {
            "name" => self.name(),
            "email" => self.email.clone(),
            "primaryContact" => self.primary_contact.clone(),
            "role" => self.role.clone(),
            "department" => self.department.clone(),
            "city" => self.city.clone(),
            "status" => {
                let label = if self.active { "Active" } else { "Inactive" };
                label.to_string()
            }
            _ => String::new(),
        }
    }

    pub fn to_upsert(&self) -> EmployeeUpsert {
        EmployeeUpsert {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            primary_contact: self.primary_contact.clone(),
            secondary_contact: Some(self.secondary_contact.clone()).filter(|s| !s.is_empty()),
            role: self.role.clone(),
            department_name: self.department.clone(),
            address_line1: self.address_line1.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            country: self.country.clone(),
            date_of_joining: self.date_of_joining.clone(),
            user_name: Some(self.user_name.clone()).filter(|s| !s.is_empty()),
            password: None,
        }
    }
}

impl Sortable for EmployeeRow {
    fn compare_by_field(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "lastName" => cmp_text(&self.last_name, &other.last_name),
            "role" => cmp_text(&self.role, &other.role),
            "city" => cmp_text(&self.city, &other.city),
            _ => cmp_text(&self.first_name, &other.first_name),
        }
    }
}

impl Searchable for EmployeeRow {
    fn matches_filter(&self, filter: &str) -> bool {
        contains_text(&self.name(), filter)
            || contains_text(&self.email, filter)
            || contains_text(&self.primary_contact, filter)
            || contains_text(&self.role, filter)
    }
}

pub fn normalize_employee(v: &Value) -> EmployeeRow {
    let active = if v.get("active").is_some() || v.get("isActive").is_some() {
        bool_field(v, &["active", "isActive"])
    } else {
        !opt_str(v, &["status"]).is_some_and(|s| s.eq_ignore_ascii_case("inactive"))
    };

    EmployeeRow {
        id: i64_field(v, &["employeeId", "id"]),
        first_name: str_field(v, &["firstName"]),
        last_name: str_field(v, &["lastName"]),
        email: str_field(v, &["email"]),
        primary_contact: str_field(v, &["primaryContact", "phone"]),
        secondary_contact: str_field(v, &["secondaryContact"]),
        role: str_field(v, &["role", "roleName"]),
        department: str_field(v, &["departmentName", "department"]),
        address_line1: str_field(v, &["addressLine1"]),
        city: str_field(v, &["city"]),
        state: str_field(v, &["state"]),
        country: str_field(v, &["country"]),
        date_of_joining: str_field(v, &["dateOfJoining"]),
        user_name: str_field(v, &["userName", "username"]),
        active,
    }
}

pub fn plan_employees(role: &RoleContext, state: &ListViewState, _flags: FeatureFlags) -> FetchPlan {
    if let Some(plan) = team_plan(role, state, QueryParams::new()) {
        return plan;
    }
    let mut params = QueryParams::new();
    let status = state.committed.get(F_STATUS);
    if !status.is_empty() && status != STATUS_ALL {
        params.push(F_STATUS, status);
    }
    params.push_non_empty(F_SEARCH, state.committed.get(F_SEARCH));
    FetchPlan::Filtered {
        params,
        sort: state.sort.clone(),
        window: PageWindow::of(state),
    }
}

/// Endpoint and wire query for a plan.
pub fn request(plan: &FetchPlan) -> (&'static str, QueryParams) {
    match plan {
        FetchPlan::Filtered { params, .. } => match params.get(F_STATUS) {
            Some(STATUS_INACTIVE) => ("/employee/getAllInactive", QueryParams::new()),
            Some(STATUS_FIELD_OFFICERS) => ("/employee/getFieldOfficer", QueryParams::new()),
            _ => ("/employee/getAllPaginated", plan.query()),
        },
        _ => ("/employee/getByTeam", plan.query()),
    }
}

/// Normalize either response shape. Bare arrays are searched, sorted and
/// sliced to the plan's window.
pub fn page_from_json(plan: &FetchPlan, body: Value) -> Result<ListPage<EmployeeRow>, ApiError> {
    let listing: Listing<Value> =
        serde_json::from_value(body).map_err(|e| ApiError::Parse(e.to_string()))?;

    match listing {
        Listing::Page(page) => Ok(ListPage::from_response(page, |v| normalize_employee(&v))),
        Listing::All(items) => {
            let mut rows: Vec<EmployeeRow> = items.iter().map(normalize_employee).collect();
            if let FetchPlan::Filtered { params, sort, .. } = plan {
                if params.get(F_STATUS) == Some(STATUS_INACTIVE) {
                    rows.iter_mut().for_each(|r| r.active = false);
                }
                rows = filter_list(rows, params.get(F_SEARCH).unwrap_or(""));
                sort_list(&mut rows, &sort.column, sort.direction.is_ascending());
            }
            Ok(ListPage::slice(rows, plan.window()))
        }
    }
}

pub struct EmployeeSource;

#[async_trait(?Send)]
impl ListSource for EmployeeSource {
    type Row = EmployeeRow;

    fn plan(&self, role: &RoleContext, state: &ListViewState, flags: FeatureFlags) -> FetchPlan {
        plan_employees(role, state, flags)
    }

    async fn fetch(&self, client: &ApiClient, plan: &FetchPlan) -> Result<ListPage<EmployeeRow>, ApiError> {
        let (path, query) = request(plan);
        let body: Value = client.get_json(path, &query).await?;
        page_from_json(plan, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::list_view::state::FilterMode;
    use contracts::system::auth::Role;
    use serde_json::json;

    fn admin() -> RoleContext {
        RoleContext::new(Role::Admin, None, None)
    }

    #[test]
    fn test_paginated_request() {
        let mut state = default_state(10);
        state.set_filter(F_SEARCH, "ravi", FilterMode::Direct);
        state.set_page(1);
        let plan = plan_employees(&admin(), &state, FeatureFlags::default());
        let (path, query) = request(&plan);
        assert_eq!(path, "/employee/getAllPaginated");
        assert_eq!(
            query.to_query_string(),
            "search=ravi&page=1&size=10&sortBy=firstName&sortOrder=asc"
        );
    }

    #[test]
    fn test_status_selects_array_endpoints() {
        let mut state = default_state(10);
        state.set_filter(F_STATUS, STATUS_INACTIVE, FilterMode::Direct);
        let plan = plan_employees(&admin(), &state, FeatureFlags::default());
        assert_eq!(request(&plan).0, "/employee/getAllInactive");

        state.set_filter(F_STATUS, STATUS_FIELD_OFFICERS, FilterMode::Direct);
        let plan = plan_employees(&admin(), &state, FeatureFlags::default());
        assert_eq!(request(&plan).0, "/employee/getFieldOfficer");

        state.set_filter(F_STATUS, STATUS_ALL, FilterMode::Direct);
        let plan = plan_employees(&admin(), &state, FeatureFlags::default());
        assert_eq!(request(&plan).0, "/employee/getAllPaginated");
    }

    #[test]
    fn test_manager_uses_team_endpoint() {
        let role = RoleContext::new(Role::Manager, Some(6), Some(2));
        let plan = plan_employees(&role, &default_state(10), FeatureFlags::default());
        let (path, query) = request(&plan);
        assert_eq!(path, "/employee/getByTeam");
        assert_eq!(query.to_query_string(), "teamId=6&page=0&size=10");
    }

    #[test]
    fn test_array_response_searched_sorted_and_sliced() {
        let mut state = default_state(2);
        state.set_filter(F_STATUS, STATUS_INACTIVE, FilterMode::Direct);
        state.set_filter(F_SEARCH, "a", FilterMode::Direct);
        state.set_sort("firstName");
        state.set_sort("firstName");
        let plan = plan_employees(&admin(), &state, FeatureFlags::default());

        let body = json!([
            {"id": 1, "firstName": "Asha"},
            {"id": 2, "firstName": "Bala"},
            {"id": 3, "firstName": "Charu"},
            {"id": 4, "firstName": "Dev"}
        ]);
        let page = page_from_json(&plan, body).unwrap();
        assert_eq!(page.total_elements, 3);
        assert_eq!(page.total_pages, 2);
        let names: Vec<_> = page.rows.iter().map(|r| r.first_name.as_str()).collect();
        assert_eq!(names, vec!["Charu", "Bala"]);
        assert!(page.rows.iter().all(|r| !r.active));
    }

    #[test]
    fn test_normalize_defaults_active() {
        let row = normalize_employee(&json!({"employeeId": "9", "firstName": "Ravi", "lastName": "K"}));
        assert_eq!(row.id, 9);
        assert_eq!(row.name(), "Ravi K");
        assert!(row.active);
        assert_eq!(row.cell("status"), "Active");
        assert!(!normalize_employee(&json!({"status": "INACTIVE"})).active);
    }
}
