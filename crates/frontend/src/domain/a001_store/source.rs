//! Customer (store) listing: columns, endpoint selection and row mapping.

use async_trait::async_trait;
use contracts::domain::a001_store::aggregate::StoreUpsert;
use contracts::shared::page::Listing;
use serde_json::Value;

use crate::config::FeatureFlags;
use crate::shared::api_utils::{ApiClient, ApiError, QueryParams};
use crate::shared::list_view::normalize::{
    f64_field, full_name, i64_field, nested, opt_f64, opt_i64, opt_str, str_field,
};
use crate::shared::list_view::orchestrator::{team_plan, FetchPlan, ListPage, ListSource, PageWindow};
use crate::shared::list_view::persistence::PersistenceSpec;
use crate::shared::list_view::state::{ListViewState, SortDirection, SortState};
use crate::system::auth::role::RoleContext;

pub const STORAGE_KEY: &str = "customers.list.state.v1";

pub const F_STORE_NAME: &str = "storeName";
pub const F_PRIMARY_CONTACT: &str = "primaryContact";
pub const F_OWNER_NAME: &str = "ownerName";
pub const F_CITY: &str = "city";
pub const F_STATE: &str = "state";
pub const F_CLIENT_TYPE: &str = "clientType";
pub const F_ASSIGNED_EMPLOYEE: &str = "assignedEmployee";

pub const FILTER_FIELDS: &[&str] = &[
    F_STORE_NAME,
    F_PRIMARY_CONTACT,
    F_OWNER_NAME,
    F_CITY,
    F_STATE,
    F_CLIENT_TYPE,
    F_ASSIGNED_EMPLOYEE,
];

pub const FILTER_LABELS: &[(&str, &str)] = &[
    (F_STORE_NAME, "Store"),
    (F_PRIMARY_CONTACT, "Contact"),
    (F_OWNER_NAME, "Owner"),
    (F_CITY, "City"),
    (F_STATE, "State"),
    (F_CLIENT_TYPE, "Client type"),
    (F_ASSIGNED_EMPLOYEE, "Employee"),
];

/// Sortable UI columns and their backend sort keys.
pub const SORT_KEYS: &[(&str, &str)] = &[
    ("storeName", "storeName"),
    ("ownerName", "ownerFirstName"),
    ("city", "city"),
    ("state", "state"),
    ("clientType", "clientType"),
    ("outstandingPayment", "outstandingPayment"),
];

pub const SORT_COLUMNS: &[&str] = &[
    "storeName",
    "ownerName",
    "city",
    "state",
    "clientType",
    "outstandingPayment",
];

/// Toggleable table columns with header labels.
pub const COLUMNS: &[(&str, &str)] = &[
    ("storeName", "Store"),
    ("ownerName", "Owner"),
    ("primaryContact", "Contact"),
    ("city", "City"),
    ("state", "State"),
    ("clientType", "Client type"),
    ("outstandingPayment", "Outstanding"),
    ("assignedEmployee", "Assigned to"),
];

pub const COLUMN_IDS: &[&str] = &[
    "storeName",
    "ownerName",
    "primaryContact",
    "city",
    "state",
    "clientType",
    "outstandingPayment",
    "assignedEmployee",
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
        SortState::new("storeName", SortDirection::Asc),
    )
    .with_columns(COLUMN_IDS)
}

pub fn backend_sort_key(column: &str) -> &str {
    SORT_KEYS
        .iter()
        .find(|(ui, _)| *ui == column)
        .map(|(_, key)| *key)
        .unwrap_or(column)
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StoreRow {
    pub id: i64,
    pub store_name: String,
    pub owner_first_name: String,
    pub owner_last_name: String,
    pub primary_contact: String,
    pub secondary_contact: String,
    pub email: String,
    pub address_line1: String,
    pub address_line2: String,
    pub city: String,
    pub state: String,
    pub district: String,
    pub pincode: String,
    pub client_type: String,
    pub industry: String,
    pub outstanding_payment: f64,
    pub monthly_sale: Option<f64>,
    pub intent: Option<i64>,
    pub assigned_employee: String,
}

impl StoreRow {
    pub fn owner_name(&self) -> String {
        full_name(&self.owner_first_name, &self.owner_last_name)
    }

    pub fn address(&self) -> String {
        [
            self.address_line1.as_str(),
            self.address_line2.as_str(),
            self.district.as_str(),
            self.city.as_str(),
            self.state.as_str(),
            self.pincode.as_str(),
        ]
        .iter()
        .filter(|p| !p.trim().is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(", ")
    }

    /// Text shown in a table cell or card line for a column id.
    pub fn cell(&self, column: &str) -> String {
        match column {
            "storeName" => self.store_name.clone(),
            "ownerName" => self.owner_name(),
            "primaryContact" => self.primary_contact.clone(),
            "city" => self.city.clone(),
            "state" => self.state.clone(),
            "clientType" => self.client_type.clone(),
            "outstandingPayment" => format!("{:.2}", self.outstanding_payment),
            "assignedEmployee" => self.assigned_employee.clone(),
            _ => String::new(),
        }
    }

    /// Form payload prefilled from this row
    pub fn to_upsert(&self) -> StoreUpsert {
        StoreUpsert {
            store_name: self.store_name.clone(),
            client_first_name: self.owner_first_name.clone(),
            client_last_name: self.owner_last_name.clone(),
            primary_contact: self.primary_contact.clone(),
            secondary_contact: Some(self.secondary_contact.clone()).filter(|s| !s.is_empty()),
            email: self.email.clone(),
            address_line1: self.address_line1.clone(),
            address_line2: self.address_line2.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            district: self.district.clone(),
            pincode: self.pincode.clone(),
            client_type: self.client_type.clone(),
            industry: self.industry.clone(),
            monthly_sale: self.monthly_sale,
            intent: self.intent.map(|i| i as i32),
        }
    }
}

fn assigned_employee_name(v: &Value) -> String {
    if let Some(name) = opt_str(v, &["employeeName", "assignedEmployeeName", "assignedTo"]) {
        return name;
    }
    nested(v, &["employee"])
        .map(|e| full_name(&str_field(e, &["firstName"]), &str_field(e, &["lastName"])))
        .unwrap_or_default()
}

pub fn normalize_store(v: &Value) -> StoreRow {
    StoreRow {
        id: i64_field(v, &["storeId", "id"]),
        store_name: str_field(v, &["storeName", "name"]),
        owner_first_name: str_field(v, &["clientFirstName", "ownerFirstName"]),
        owner_last_name: str_field(v, &["clientLastName", "ownerLastName"]),
        primary_contact: str_field(v, &["primaryContact", "phone"]),
        secondary_contact: str_field(v, &["secondaryContact"]),
        email: str_field(v, &["email"]),
        address_line1: str_field(v, &["addressLine1"]),
        address_line2: str_field(v, &["addressLine2"]),
        city: str_field(v, &["city"]),
        state: str_field(v, &["state"]),
        district: str_field(v, &["district"]),
        pincode: str_field(v, &["pincode", "pinCode"]),
        client_type: str_field(v, &["clientType"]),
        industry: str_field(v, &["industry"]),
        outstanding_payment: f64_field(v, &["outstandingPayment", "outstanding"]),
        monthly_sale: opt_f64(v, &["monthlySale"]),
        intent: opt_i64(v, &["intent", "intentLevel"]),
        assigned_employee: assigned_employee_name(v),
    }
}

pub fn page_from_json(body: Value) -> Result<ListPage<StoreRow>, ApiError> {
    let listing: Listing<Value> =
        serde_json::from_value(body).map_err(|e| ApiError::Parse(e.to_string()))?;
    Ok(ListPage::from_response(listing.into_page(), |v| normalize_store(&v)))
}

/// Listing request for the customers page.
pub fn plan_stores(role: &RoleContext, state: &ListViewState, flags: FeatureFlags) -> FetchPlan {
    if let Some(plan) = team_plan(role, state, QueryParams::new()) {
        return plan;
    }

    let window = PageWindow::of(state);
    let assigned = state.committed.get(F_ASSIGNED_EMPLOYEE).trim().parse::<i64>().ok();

    if role.is_admin() && flags.employee_scoped_store_filter {
        if let Some(employee_id) = assigned {
            return FetchPlan::EmployeeScoped {
                employee_id,
                window,
            };
        }
    }

    let mut params = QueryParams::new();
    for (field, value) in state.committed.active() {
        if field == F_ASSIGNED_EMPLOYEE {
            continue;
        }
        params.push_non_empty(field, value);
    }
    if let Some(employee_id) = assigned {
        params.push("employeeId", employee_id);
    }

    FetchPlan::Filtered {
        params,
        sort: SortState::new(backend_sort_key(&state.sort.column), state.sort.direction),
        window,
    }
}

pub fn endpoint(plan: &FetchPlan) -> &'static str {
    match plan {
        FetchPlan::TeamScoped { .. } => "/store/getByTeam",
        FetchPlan::Filtered { .. } => "/store/filteredValues",
        FetchPlan::EmployeeScoped { .. } => "/store/getByEmployeeWithPagination",
    }
}

pub struct StoreSource;

#[async_trait(?Send)]
impl ListSource for StoreSource {
    type Row = StoreRow;

    fn plan(&self, role: &RoleContext, state: &ListViewState, flags: FeatureFlags) -> FetchPlan {
        plan_stores(role, state, flags)
    }

    async fn fetch(&self, client: &ApiClient, plan: &FetchPlan) -> Result<ListPage<StoreRow>, ApiError> {
        let body: Value = client.get_json(endpoint(plan), &plan.query()).await?;
        page_from_json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::list_view::state::FilterMode;
    use contracts::system::auth::Role;
    use serde_json::json;

    fn admin() -> RoleContext {
        RoleContext::new(Role::Admin, None, Some(1))
    }

    fn flags(on: bool) -> FeatureFlags {
        FeatureFlags {
            employee_scoped_store_filter: on,
        }
    }

    #[test]
    fn test_admin_filtered_request() {
        let mut state = default_state(10);
        state.set_filter(F_STORE_NAME, "Acme", FilterMode::Direct);

        let plan = plan_stores(&admin(), &state, flags(true));
        assert_eq!(endpoint(&plan), "/store/filteredValues");
        assert_eq!(
            plan.query().to_query_string(),
            "storeName=Acme&page=0&size=10&sortBy=storeName&sortOrder=asc"
        );

        let body = json!({
            "content": [{"storeId": 1, "storeName": "Acme"}, {"storeId": 2, "storeName": "Acme Two"}],
            "totalPages": 1,
            "totalElements": 2
        });
        let page = page_from_json(body).unwrap();
        assert_eq!(page.rows.len(), 2);
        state.apply_totals(page.total_pages, page.total_elements);
        assert_eq!(state.page.display_page(), 1);
        assert_eq!(state.page.total_pages, 1);
    }

    #[test]
    fn test_owner_sort_uses_backend_key() {
        let mut state = default_state(10);
        state.set_sort("ownerName");
        state.set_sort("ownerName");
        let query = plan_stores(&admin(), &state, flags(true)).query();
        assert_eq!(query.get("sortBy"), Some("ownerFirstName"));
        assert_eq!(query.get("sortOrder"), Some("desc"));
    }

    #[test]
    fn test_assigned_employee_uses_employee_endpoint_when_enabled() {
        let mut state = default_state(10);
        state.set_filter(F_CITY, "Pune", FilterMode::Direct);
        state.set_filter(F_ASSIGNED_EMPLOYEE, "42", FilterMode::Direct);

        let plan = plan_stores(&admin(), &state, flags(true));
        assert_eq!(endpoint(&plan), "/store/getByEmployeeWithPagination");
        assert_eq!(plan.query().to_query_string(), "id=42&page=0&size=10");

        let plan = plan_stores(&admin(), &state, flags(false));
        assert_eq!(endpoint(&plan), "/store/filteredValues");
        assert_eq!(plan.query().get("city"), Some("Pune"));
        assert_eq!(plan.query().get("employeeId"), Some("42"));
    }

    #[test]
    fn test_field_officer_uses_team_listing() {
        let mut state = default_state(25);
        state.set_filter(F_STORE_NAME, "Acme", FilterMode::Direct);
        let role = RoleContext::new(Role::FieldOfficer, Some(6), Some(8));

        let plan = plan_stores(&role, &state, flags(true));
        assert_eq!(endpoint(&plan), "/store/getByTeam");
        assert_eq!(plan.query().to_query_string(), "teamId=6&page=0&size=25");
    }

    #[test]
    fn test_bare_array_and_missing_fields() {
        let body = json!([{"id": 5, "clientFirstName": "Ravi", "employee": {"firstName": "Asha", "lastName": "P"}}]);
        let page = page_from_json(body).unwrap();
        assert_eq!(page.total_pages, 1);
        let row = &page.rows[0];
        assert_eq!(row.id, 5);
        assert_eq!(row.store_name, "");
        assert_eq!(row.owner_name(), "Ravi");
        assert_eq!(row.outstanding_payment, 0.0);
        assert_eq!(row.assigned_employee, "Asha P");
        assert_eq!(row.cell("outstandingPayment"), "0.00");
        assert_eq!(row.cell("ownerName"), "Ravi");
    }

    #[test]
    fn test_unexpected_body_is_parse_error() {
        assert!(matches!(page_from_json(json!("oops")), Err(ApiError::Parse(_))));
    }
}
