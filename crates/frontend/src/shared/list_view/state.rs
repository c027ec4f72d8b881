//! Filter, pagination and sort state of a list page.
//!
//! Page indices are 0-based. Only the UI (`display_page`) and the employees
//! URL add one.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const FIRST_PAGE: usize = 0;
/// Largest page index or size accepted from storage or the URL.
pub const MAX_PAGE_INDEX: usize = 100_000;
pub const MAX_PAGE_SIZE: usize = 1_000;

/// Filter values in the order the page declares its fields. An empty string
/// means the filter is unset.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FilterSet {
    fields: Vec<(&'static str, String)>,
}

impl FilterSet {
    pub fn new(fields: &[&'static str]) -> Self {
        Self {
            fields: fields.iter().map(|f| (*f, String::new())).collect(),
        }
    }

    pub fn get(&self, field: &str) -> &str {
        self.fields
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| v.as_str())
            .unwrap_or("")
    }

    /// Returns false for a field the page does not declare.
    pub fn set(&mut self, field: &str, value: impl Into<String>) -> bool {
        match self.fields.iter_mut().find(|(f, _)| *f == field) {
            Some((_, slot)) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        for (_, value) in self.fields.iter_mut() {
            value.clear();
        }
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(f, _)| *f)
    }

    /// Non-empty filters, in declaration order.
    pub fn active(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.fields
            .iter()
            .filter(|(_, v)| !v.trim().is_empty())
            .map(|(f, v)| (*f, v.as_str()))
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }

    pub fn is_ascending(&self) -> bool {
        *self == SortDirection::Asc
    }

    fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortState {
    pub column: String,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(column: &str, direction: SortDirection) -> Self {
        Self {
            column: column.to_string(),
            direction,
        }
    }

    /// Same column flips direction; a new column starts ascending.
    pub fn select(&mut self, column: &str) {
        if self.column == column {
            self.direction = self.direction.flipped();
        } else {
            self.column = column.to_string();
            self.direction = SortDirection::Asc;
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PageState {
    pub index: usize,
    pub size: usize,
    pub total_pages: usize,
    pub total_elements: u64,
}

impl PageState {
    pub fn new(size: usize) -> Self {
        Self {
            index: FIRST_PAGE,
            size: size.max(1),
            total_pages: 1,
            total_elements: 0,
        }
    }

    /// 1-based page number for display.
    pub fn display_page(&self) -> usize {
        self.index + 1
    }

    pub fn has_next(&self) -> bool {
        self.index + 1 < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.index > FIRST_PAGE
    }

    /// Records fetch totals and pulls the index back inside the last page.
    pub fn apply_totals(&mut self, total_pages: usize, total_elements: u64) {
        self.total_pages = total_pages.max(1);
        self.total_elements = total_elements;
        if self.index >= self.total_pages {
            self.index = self.total_pages - 1;
        }
    }
}

/// Page-specific UI extras that are persisted alongside the list state.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ViewExtras {
    pub selected_columns: Vec<String>,
    pub expanded_ids: BTreeSet<String>,
    pub selected_employee_id: Option<i64>,
}

/// Where a filter edit lands. Narrow viewports edit a draft that is applied
/// from the filter sheet; wide viewports write straight to the committed set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterMode {
    Draft,
    Direct,
}

/// Inputs that determine which request the list needs. Anything outside this
/// key (draft edits, expanded cards, column choice) never triggers a fetch.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FetchKey {
    pub committed: FilterSet,
    pub page_index: usize,
    pub page_size: usize,
    pub sort: SortState,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ListViewState {
    pub draft: FilterSet,
    pub committed: FilterSet,
    pub page: PageState,
    pub sort: SortState,
    pub extras: ViewExtras,
    pub filter_sheet_open: bool,
}

impl ListViewState {
    pub fn new(filter_fields: &[&'static str], page_size: usize, sort: SortState) -> Self {
        Self {
            draft: FilterSet::new(filter_fields),
            committed: FilterSet::new(filter_fields),
            page: PageState::new(page_size),
            sort,
            extras: ViewExtras::default(),
            filter_sheet_open: false,
        }
    }

    pub fn with_columns(mut self, columns: &[&str]) -> Self {
        self.extras.selected_columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    fn reset_page(&mut self) {
        self.page.index = FIRST_PAGE;
    }

    pub fn set_filter(&mut self, field: &str, value: &str, mode: FilterMode) {
        match mode {
            FilterMode::Draft => {
                self.draft.set(field, value);
            }
            FilterMode::Direct => {
                self.committed.set(field, value);
                self.draft.set(field, value);
            }
        }
        self.reset_page();
    }

    pub fn clear_filter(&mut self, field: &str) {
        self.draft.set(field, "");
        self.committed.set(field, "");
        self.reset_page();
    }

    pub fn clear_all(&mut self) {
        self.draft.clear();
        self.committed.clear();
        self.reset_page();
    }

    pub fn apply_draft(&mut self) {
        self.committed = self.draft.clone();
        self.filter_sheet_open = false;
        self.reset_page();
    }

    pub fn set_sort(&mut self, column: &str) {
        self.sort.select(column);
    }

    pub fn set_page(&mut self, index: usize) {
        self.page.index = index;
    }

    pub fn set_page_size(&mut self, size: usize) {
        if size == 0 {
            return;
        }
        self.page.size = size;
        self.reset_page();
    }

    pub fn apply_totals(&mut self, total_pages: usize, total_elements: u64) {
        self.page.apply_totals(total_pages, total_elements);
    }

    pub fn toggle_column(&mut self, column: &str) {
        let columns = &mut self.extras.selected_columns;
        if let Some(pos) = columns.iter().position(|c| c == column) {
            columns.remove(pos);
        } else {
            columns.push(column.to_string());
        }
    }

    pub fn is_column_visible(&self, column: &str) -> bool {
        self.extras.selected_columns.iter().any(|c| c == column)
    }

    pub fn toggle_expanded(&mut self, id: &str) {
        if !self.extras.expanded_ids.remove(id) {
            self.extras.expanded_ids.insert(id.to_string());
        }
    }

    pub fn fetch_key(&self) -> FetchKey {
        FetchKey {
            committed: self.committed.clone(),
            page_index: self.page.index,
            page_size: self.page.size,
            sort: self.sort.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIELDS: &[&str] = &["storeName", "city", "clientType"];

    fn state() -> ListViewState {
        ListViewState::new(FIELDS, 10, SortState::new("storeName", SortDirection::Asc))
    }

    #[test]
    fn test_set_filter_resets_page_in_both_modes() {
        for mode in [FilterMode::Draft, FilterMode::Direct] {
            let mut st = state();
            st.set_page(7);
            st.set_filter("city", "Pune", mode);
            assert_eq!(st.page.index, FIRST_PAGE);
        }
    }

    #[test]
    fn test_draft_edit_does_not_touch_committed() {
        let mut st = state();
        st.set_filter("city", "Pune", FilterMode::Draft);
        assert_eq!(st.draft.get("city"), "Pune");
        assert_eq!(st.committed.get("city"), "");

        st.filter_sheet_open = true;
        st.apply_draft();
        assert_eq!(st.committed.get("city"), "Pune");
        assert!(!st.filter_sheet_open);
    }

    #[test]
    fn test_direct_edit_mirrors_into_draft() {
        let mut st = state();
        st.set_filter("storeName", "Acme", FilterMode::Direct);
        assert_eq!(st.committed.get("storeName"), "Acme");
        assert_eq!(st.draft.get("storeName"), "Acme");
    }

    #[test]
    fn test_unknown_field_is_ignored() {
        let mut st = state();
        st.set_filter("nonsense", "x", FilterMode::Direct);
        assert_eq!(st.committed.active_count(), 0);
        assert!(!st.committed.field_names().any(|f| f == "nonsense"));
        assert_eq!(st.committed.get("nonsense"), "");
    }

    #[test]
    fn test_clear_filter_and_clear_all() {
        let mut st = state();
        st.set_filter("city", "Pune", FilterMode::Direct);
        st.set_filter("clientType", "Retailer", FilterMode::Direct);
        st.set_page(3);
        st.clear_filter("city");
        assert_eq!(st.committed.get("city"), "");
        assert_eq!(st.draft.get("city"), "");
        assert_eq!(st.committed.get("clientType"), "Retailer");
        assert_eq!(st.page.index, FIRST_PAGE);

        st.set_filter("city", "Nagpur", FilterMode::Draft);
        st.set_page(2);
        st.clear_all();
        assert_eq!(st.committed.active_count(), 0);
        assert_eq!(st.draft.active_count(), 0);
        assert_eq!(st.page.index, FIRST_PAGE);
    }

    #[test]
    fn test_sort_toggle_alternates_on_same_column() {
        let mut st = state();
        st.set_sort("city");
        assert_eq!(st.sort.direction, SortDirection::Asc);
        st.set_sort("city");
        assert_eq!(st.sort.direction, SortDirection::Desc);
        st.set_sort("city");
        assert_eq!(st.sort.direction, SortDirection::Asc);
    }

    #[test]
    fn test_sort_new_column_resets_to_ascending() {
        let mut st = state();
        st.set_sort("storeName");
        assert_eq!(st.sort.direction, SortDirection::Desc);
        st.set_sort("city");
        assert_eq!(st.sort.column, "city");
        assert_eq!(st.sort.direction, SortDirection::Asc);
    }

    #[test]
    fn test_page_size_resets_page_and_rejects_zero() {
        let mut st = state();
        st.set_page(4);
        st.set_page_size(0);
        assert_eq!(st.page.size, 10);
        assert_eq!(st.page.index, 4);
        st.set_page_size(25);
        assert_eq!(st.page.size, 25);
        assert_eq!(st.page.index, FIRST_PAGE);
    }

    #[test]
    fn test_totals_clamp_page_index() {
        let mut st = state();
        st.set_page(9);
        st.apply_totals(3, 25);
        assert_eq!(st.page.index, 2);
        assert_eq!(st.page.display_page(), 3);

        st.apply_totals(0, 0);
        assert_eq!(st.page.total_pages, 1);
        assert_eq!(st.page.index, FIRST_PAGE);
    }

    #[test]
    fn test_totals_keep_index_inside_range() {
        let mut st = state();
        st.set_page(1);
        st.apply_totals(5, 48);
        assert_eq!(st.page.index, 1);
        assert!(st.page.has_next());
        assert!(st.page.has_previous());
    }

    #[test]
    fn test_fetch_key_ignores_draft_and_extras() {
        let mut st = state();
        let key = st.fetch_key();
        st.set_filter("city", "Pune", FilterMode::Draft);
        st.toggle_column("city");
        st.toggle_expanded("12");
        assert_eq!(st.fetch_key(), key);
    }

    #[test]
    fn test_toggle_column_and_expanded() {
        let mut st = state().with_columns(&["storeName", "city"]);
        st.toggle_column("city");
        assert!(!st.is_column_visible("city"));
        st.toggle_column("city");
        assert!(st.is_column_visible("city"));

        st.toggle_expanded("5");
        assert!(st.extras.expanded_ids.contains("5"));
        st.toggle_expanded("5");
        assert!(st.extras.expanded_ids.is_empty());
    }
}
