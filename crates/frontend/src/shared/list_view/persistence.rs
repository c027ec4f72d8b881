//! Session persistence of list state.
//!
//! The stored blob is read back as an untyped JSON value and every field is
//! checked on its own, so one corrupted field never discards the rest.

use serde::Serialize;
use serde_json::{json, Map, Value};
use std::cell::RefCell;
use std::collections::HashMap;

use super::state::{ListViewState, SortDirection, MAX_PAGE_INDEX, MAX_PAGE_SIZE};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StorageError {
    #[error("storage is not available")]
    Unavailable,
    #[error("storage rejected key {key}: {reason}")]
    Rejected { key: String, reason: String },
    #[error("failed to serialize state: {0}")]
    Serialize(String),
}

/// Key/value storage the adapter reads and writes.
pub trait StateStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Browser `sessionStorage`; cleared by the browser when the tab closes.
#[derive(Clone, Copy, Debug, Default)]
pub struct SessionStore;

impl SessionStore {
    fn storage() -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .and_then(|w| w.session_storage().ok().flatten())
            .ok_or(StorageError::Unavailable)
    }
}

impl StateStore for SessionStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Self::storage()?
            .get_item(key)
            .map_err(|e| StorageError::Rejected {
                key: key.to_string(),
                reason: format!("{:?}", e),
            })
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|e| StorageError::Rejected {
                key: key.to_string(),
                reason: format!("{:?}", e),
            })
    }
}

/// In-memory store, used where no browser storage exists.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
    reject_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(self, key: &str, value: &str) -> Self {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self
    }

    /// Simulates a private-mode browser that refuses writes.
    pub fn rejecting_writes(mut self) -> Self {
        self.reject_writes = true;
        self
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }
}

impl StateStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.get(key))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.reject_writes {
            return Err(StorageError::Rejected {
                key: key.to_string(),
                reason: "QuotaExceededError".to_string(),
            });
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// What a page persists and which stored values it accepts.
#[derive(Clone, Copy, Debug)]
pub struct PersistenceSpec {
    pub key: &'static str,
    pub sort_columns: &'static [&'static str],
    pub columns: &'static [&'static str],
}

/// URL query overrides (`q`, `page`, `size`). `page` is 1-based in the URL and
/// held 0-based here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOverrides {
    pub search: Option<String>,
    pub page: Option<usize>,
    pub size: Option<usize>,
}

#[derive(Serialize)]
struct UrlState<'a> {
    #[serde(skip_serializing_if = "str::is_empty")]
    q: &'a str,
    page: usize,
    size: usize,
}

impl QueryOverrides {
    pub fn parse(search: &str) -> Self {
        let params: HashMap<String, String> =
            serde_qs::from_str(search.trim_start_matches('?')).unwrap_or_default();

        let search = params.get("q").cloned();
        let page = params
            .get("page")
            .and_then(|p| p.parse::<usize>().ok())
            .filter(|p| (1..=MAX_PAGE_INDEX + 1).contains(p))
            .map(|p| p - 1);
        let size = params
            .get("size")
            .and_then(|s| s.parse::<usize>().ok())
            .filter(|s| (1..=MAX_PAGE_SIZE).contains(s));

        Self { search, page, size }
    }

    pub fn is_empty(&self) -> bool {
        self.search.is_none() && self.page.is_none() && self.size.is_none()
    }

    /// Query string mirroring the committed search, page and size.
    pub fn query_string(state: &ListViewState, search_field: &str) -> String {
        let url_state = UrlState {
            q: state.committed.get(search_field),
            page: state.page.display_page(),
            size: state.page.size,
        };
        serde_qs::to_string(&url_state).unwrap_or_default()
    }
}

pub struct PersistenceAdapter<S: StateStore> {
    spec: PersistenceSpec,
    store: S,
}

impl<S: StateStore> PersistenceAdapter<S> {
    pub fn new(spec: PersistenceSpec, store: S) -> Self {
        Self { spec, store }
    }

    pub fn spec(&self) -> &PersistenceSpec {
        &self.spec
    }

    /// Restore state for a fresh mount. Query overrides win over storage;
    /// anything missing or malformed keeps its default.
    pub fn hydrate(
        &self,
        defaults: ListViewState,
        query: Option<(&QueryOverrides, &str)>,
    ) -> ListViewState {
        let stored = match self.store.read(self.spec.key) {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("List state not restored ({}): {}", self.spec.key, e);
                None
            }
        };

        let mut state = match stored.as_deref().map(serde_json::from_str::<Value>) {
            Some(Ok(value)) => restore(defaults, &value, &self.spec),
            Some(Err(e)) => {
                log::warn!("Discarding malformed list state ({}): {}", self.spec.key, e);
                defaults
            }
            None => defaults,
        };

        if let Some((overrides, search_field)) = query {
            apply_overrides(&mut state, overrides, search_field);
        }
        state
    }

    /// Write the current state. Failures are logged and swallowed.
    pub fn persist(&self, state: &ListViewState) {
        let result = serde_json::to_string(&snapshot(state))
            .map_err(|e| StorageError::Serialize(e.to_string()))
            .and_then(|raw| self.store.write(self.spec.key, &raw));
        if let Err(e) = result {
            log::warn!("List state not saved ({}): {}", self.spec.key, e);
        }
    }
}

pub fn snapshot(state: &ListViewState) -> Value {
    let filters: Map<String, Value> = state
        .committed
        .field_names()
        .map(|f| (f.to_string(), Value::String(state.committed.get(f).to_string())))
        .collect();

    json!({
        "filters": filters,
        "page": state.page.index,
        "pageSize": state.page.size,
        "sort": {
            "column": state.sort.column,
            "direction": state.sort.direction.as_str(),
        },
        "selectedColumns": state.extras.selected_columns,
        "expandedIds": state.extras.expanded_ids,
        "selectedEmployeeId": state.extras.selected_employee_id,
    })
}

pub fn restore(mut state: ListViewState, value: &Value, spec: &PersistenceSpec) -> ListViewState {
    let Some(obj) = value.as_object() else {
        log::warn!("Stored list state ({}) is not an object", spec.key);
        return state;
    };

    if let Some(filters) = obj.get("filters").and_then(Value::as_object) {
        let fields: Vec<&'static str> = state.committed.field_names().collect();
        for field in fields {
            if let Some(v) = filters.get(field).and_then(Value::as_str) {
                state.committed.set(field, v);
                state.draft.set(field, v);
            }
        }
    }

    match obj.get("page").and_then(Value::as_u64) {
        Some(page) if page <= MAX_PAGE_INDEX as u64 => state.page.index = page as usize,
        Some(_) => log::warn!("Ignoring out-of-range stored page ({})", spec.key),
        None => {}
    }

    match obj.get("pageSize").and_then(Value::as_u64) {
        Some(size) if size > 0 && size <= MAX_PAGE_SIZE as u64 => state.page.size = size as usize,
        Some(_) | None if obj.contains_key("pageSize") => {
            log::warn!("Ignoring invalid stored page size ({})", spec.key);
        }
        _ => {}
    }

    if let Some(sort) = obj.get("sort").and_then(Value::as_object) {
        if let Some(column) = sort
            .get("column")
            .and_then(Value::as_str)
            .filter(|c| spec.sort_columns.contains(c))
        {
            state.sort.column = column.to_string();
        }
        if let Some(direction) = sort
            .get("direction")
            .and_then(Value::as_str)
            .and_then(SortDirection::parse)
        {
            state.sort.direction = direction;
        }
    }

    if let Some(columns) = obj.get("selectedColumns").and_then(Value::as_array) {
        let names: Option<Vec<&str>> = columns.iter().map(Value::as_str).collect();
        if let Some(names) = names {
            state.extras.selected_columns = names
                .into_iter()
                .filter(|n| spec.columns.contains(n))
                .map(str::to_string)
                .collect();
        }
    }

    if let Some(ids) = obj.get("expandedIds").and_then(Value::as_array) {
        state.extras.expanded_ids = ids
            .iter()
            .filter_map(|id| match id {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect();
    }

    if let Some(id) = obj.get("selectedEmployeeId").and_then(Value::as_i64) {
        state.extras.selected_employee_id = Some(id);
    }

    state
}

fn apply_overrides(state: &mut ListViewState, overrides: &QueryOverrides, search_field: &str) {
    if let Some(search) = &overrides.search {
        state.committed.set(search_field, search.as_str());
        state.draft.set(search_field, search.as_str());
    }
    if let Some(size) = overrides.size {
        state.page.size = size;
    }
    if let Some(page) = overrides.page {
        state.page.index = page;
    }
}

/// Mirror the state into the address bar without adding a history entry.
pub fn replace_url_query(query: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let new_url = format!("?{}", query);
    let current = window.location().search().unwrap_or_default();
    if current == new_url {
        return;
    }
    if let Ok(history) = window.history() {
        let _ = history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(&new_url));
    }
}

/// Current `location.search`, or empty outside a browser.
pub fn current_url_query() -> String {
    web_sys::window()
        .and_then(|w| w.location().search().ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::list_view::state::{FilterMode, SortState};

    const FIELDS: &[&str] = &["search", "status"];
    const SPEC: PersistenceSpec = PersistenceSpec {
        key: "employees.list.state.v1",
        sort_columns: &["firstName", "lastName", "city"],
        columns: &["name", "email", "role", "city"],
    };

    fn defaults() -> ListViewState {
        ListViewState::new(FIELDS, 10, SortState::new("firstName", SortDirection::Asc))
            .with_columns(&["name", "email"])
    }

    #[test]
    fn test_round_trip_through_store() {
        let adapter = PersistenceAdapter::new(SPEC, MemoryStore::new());
        let mut st = defaults();
        st.set_filter("search", "ravi", FilterMode::Direct);
        st.set_page_size(25);
        st.set_page(2);
        st.set_sort("city");
        st.set_sort("city");
        st.toggle_column("city");
        st.extras.selected_employee_id = Some(17);
        adapter.persist(&st);

        let restored = adapter.hydrate(defaults(), None);
        assert_eq!(restored.committed.get("search"), "ravi");
        assert_eq!(restored.draft.get("search"), "ravi");
        assert_eq!(restored.page.size, 25);
        assert_eq!(restored.page.index, 2);
        assert_eq!(restored.sort, SortState::new("city", SortDirection::Desc));
        assert!(restored.is_column_visible("city"));
        assert_eq!(restored.extras.selected_employee_id, Some(17));
    }

    #[test]
    fn test_corrupted_fields_fall_back_individually() {
        let blob = r#"{
            "filters": {"search": "asha", "status": 3},
            "page": 1,
            "pageSize": "not-a-number",
            "sort": {"column": "dropTable", "direction": "desc"},
            "selectedColumns": "name,email"
        }"#;
        let adapter = PersistenceAdapter::new(SPEC, MemoryStore::new().with_entry(SPEC.key, blob));
        let restored = adapter.hydrate(defaults(), None);

        assert_eq!(restored.page.size, 10);
        assert_eq!(restored.extras.selected_columns, vec!["name", "email"]);
        assert_eq!(restored.sort.column, "firstName");
        assert_eq!(restored.sort.direction, SortDirection::Desc);
        assert_eq!(restored.committed.get("search"), "asha");
        assert_eq!(restored.committed.get("status"), "");
        assert_eq!(restored.page.index, 1);
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let adapter = PersistenceAdapter::new(
            SPEC,
            MemoryStore::new().with_entry(SPEC.key, r#"{"pageSize": 0}"#),
        );
        assert_eq!(adapter.hydrate(defaults(), None).page.size, 10);
    }

    #[test]
    fn test_huge_page_values_rejected() {
        let blob = r#"{"filters": {"status": "inactive"}, "page": 4000000000000000000, "pageSize": 99999999999}"#;
        let adapter = PersistenceAdapter::new(SPEC, MemoryStore::new().with_entry(SPEC.key, blob));
        let restored = adapter.hydrate(defaults(), None);

        assert_eq!(restored.committed.get("status"), "inactive");
        assert_eq!(restored.page.index, 0);
        assert_eq!(restored.page.size, 10);
    }

    #[test]
    fn test_unknown_columns_dropped() {
        let adapter = PersistenceAdapter::new(
            SPEC,
            MemoryStore::new().with_entry(SPEC.key, r#"{"selectedColumns": ["role", "salary"]}"#),
        );
        assert_eq!(adapter.hydrate(defaults(), None).extras.selected_columns, vec!["role"]);
    }

    #[test]
    fn test_malformed_json_yields_defaults() {
        for blob in ["{not json", "[1,2,3]", "null"] {
            let adapter =
                PersistenceAdapter::new(SPEC, MemoryStore::new().with_entry(SPEC.key, blob));
            assert_eq!(adapter.hydrate(defaults(), None), defaults());
        }
    }

    #[test]
    fn test_rejected_write_is_swallowed() {
        let adapter = PersistenceAdapter::new(SPEC, MemoryStore::new().rejecting_writes());
        adapter.persist(&defaults());
        assert_eq!(adapter.hydrate(defaults(), None), defaults());
    }

    #[test]
    fn test_query_overrides_take_precedence() {
        let blob = r#"{"filters": {"search": "stored"}, "page": 4, "pageSize": 50}"#;
        let adapter = PersistenceAdapter::new(SPEC, MemoryStore::new().with_entry(SPEC.key, blob));
        let overrides = QueryOverrides::parse("?q=from-url&page=2");
        let restored = adapter.hydrate(defaults(), Some((&overrides, "search")));

        assert_eq!(restored.committed.get("search"), "from-url");
        assert_eq!(restored.page.index, 1);
        assert_eq!(restored.page.size, 50);
    }

    #[test]
    fn test_query_parse_rejects_bad_numbers() {
        let overrides = QueryOverrides::parse("page=0&size=-5");
        assert_eq!(overrides.page, None);
        assert_eq!(overrides.size, None);
        assert!(QueryOverrides::parse("").is_empty());

        let overrides = QueryOverrides::parse("page=18446744073709551615&size=5000");
        assert_eq!(overrides.page, None);
        assert_eq!(overrides.size, None);
        assert_eq!(QueryOverrides::parse("page=3&size=25").page, Some(2));
    }

    #[test]
    fn test_query_string_is_one_based() {
        let mut st = defaults();
        st.set_filter("search", "ravi", FilterMode::Direct);
        st.set_page(2);
        assert_eq!(QueryOverrides::query_string(&st, "search"), "q=ravi&page=3&size=10");

        st.clear_all();
        assert_eq!(QueryOverrides::query_string(&st, "search"), "page=1&size=10");
    }
}
