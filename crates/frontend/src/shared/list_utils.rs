/// List helpers: in-memory search and sort, sort indicators, debounced search input
use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use std::cmp::Ordering;

use crate::shared::list_view::state::SortState;

/// Rows that can be matched against a free-text query
pub trait Searchable {
    fn matches_filter(&self, filter: &str) -> bool;
}

/// Rows that can be ordered by a named column
pub trait Sortable {
    fn compare_by_field(&self, other: &Self, field: &str) -> Ordering;
}

/// Case-insensitive string comparison
pub fn cmp_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Case-insensitive substring test; a blank needle matches everything
pub fn contains_text(haystack: &str, needle: &str) -> bool {
    let needle = needle.trim();
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

pub fn sort_list<T: Sortable>(items: &mut [T], field: &str, ascending: bool) {
    items.sort_by(|a, b| {
        let cmp = a.compare_by_field(b, field);
        if ascending {
            cmp
        } else {
            cmp.reverse()
        }
    });
}

pub fn filter_list<T: Searchable>(items: Vec<T>, filter: &str) -> Vec<T> {
    if filter.trim().is_empty() {
        return items;
    }
    items
        .into_iter()
        .filter(|item| item.matches_filter(filter))
        .collect()
}

/// Sort indicator for a column header
pub fn get_sort_indicator(sort: &SortState, field: &str) -> &'static str {
    if sort.column == field {
        if sort.direction.is_ascending() {
            " ▲"
        } else {
            " ▼"
        }
    } else {
        " ⇅"
    }
}

const SEARCH_DEBOUNCE_MS: u32 = 300;

/// Search box that reports its value after the user pauses typing
#[component]
pub fn SearchInput(
    #[prop(into)] value: Signal<String>,
    #[prop(into)] on_change: Callback<String>,
    #[prop(optional, into)] placeholder: String,
) -> impl IntoView {
    let placeholder = if placeholder.is_empty() {
        "Search...".to_string()
    } else {
        placeholder
    };

    let (input_value, set_input_value) = signal(value.get_untracked());

    // Dropping the previous timeout cancels it
    let pending = StoredValue::new_local(None::<Timeout>);

    let handle_input_change = move |new_value: String| {
        set_input_value.set(new_value.clone());
        let timeout = Timeout::new(SEARCH_DEBOUNCE_MS, move || on_change.run(new_value));
        pending.set_value(Some(timeout));
    };

    // Follow external resets (clear all)
    Effect::new(move |_| {
        let external = value.get();
        if external != input_value.get_untracked() {
            set_input_value.set(external);
        }
    });

    let clear_filter = move |_| {
        pending.set_value(None);
        set_input_value.set(String::new());
        on_change.run(String::new());
    };

    view! {
        <div class="search-input">
            <input
                type="text"
                placeholder=placeholder
                class=move || {
                    if value.get().trim().is_empty() { "search-input__field" } else { "search-input__field search-input__field--active" }
                }
                prop:value=move || input_value.get()
                on:input=move |ev| handle_input_change(event_target_value(&ev))
            />
            <Show when=move || !input_value.get().is_empty()>
                <button class="search-input__clear" on:click=clear_filter title="Clear">
                    {crate::shared::icons::icon("x")}
                </button>
            </Show>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::list_view::state::SortDirection;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        name: &'static str,
        amount: f64,
    }

    impl Sortable for Row {
        fn compare_by_field(&self, other: &Self, field: &str) -> Ordering {
            match field {
                "amount" => self.amount.partial_cmp(&other.amount).unwrap_or(Ordering::Equal),
                _ => cmp_text(self.name, other.name),
            }
        }
    }

    impl Searchable for Row {
        fn matches_filter(&self, filter: &str) -> bool {
            contains_text(self.name, filter)
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { name: "beta", amount: 2.0 },
            Row { name: "Alpha", amount: 3.0 },
            Row { name: "gamma", amount: 1.0 },
        ]
    }

    #[test]
    fn test_sort_list_both_directions() {
        let mut items = rows();
        sort_list(&mut items, "name", true);
        assert_eq!(items[0].name, "Alpha");
        sort_list(&mut items, "amount", false);
        assert_eq!(items[0].name, "Alpha");
        assert_eq!(items[2].name, "gamma");
    }

    #[test]
    fn test_filter_list() {
        assert_eq!(filter_list(rows(), "AM").len(), 1);
        assert_eq!(filter_list(rows(), " ").len(), 3);
    }

    #[test]
    fn test_sort_indicator() {
        let sort = SortState::new("city", SortDirection::Desc);
        assert_eq!(get_sort_indicator(&sort, "city"), " ▼");
        assert_eq!(get_sort_indicator(&sort, "state"), " ⇅");
    }
}
