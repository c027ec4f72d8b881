//! View pieces every list page shares: responsive filters, active filter
//! chips, sortable headers and the list footer.

use leptos::prelude::*;
use thaw::*;

use super::controller::ListController;
use crate::shared::components::column_picker::ColumnPicker;
use crate::shared::components::filter_panel::{FilterPanel, FilterSheet, FilterTag};
use crate::shared::components::pagination_controls::PaginationControls;
use crate::shared::icons::icon;
use crate::shared::list_utils::get_sort_indicator;

/// Display label of a filter field, falling back to the field name.
pub fn field_label(labels: &[(&str, &'static str)], field: &str) -> String {
    labels
        .iter()
        .find(|(f, _)| *f == field)
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| field.to_string())
}

/// Chips for every committed filter. Removing one clears it everywhere.
#[component]
pub fn ActiveFilterTags<R: Send + Sync + 'static>(
    ctl: ListController<R>,
    labels: &'static [(&'static str, &'static str)],
) -> impl IntoView {
    let active = move || {
        ctl.state.with(|s| {
            s.committed
                .active()
                .map(|(field, value)| (field, value.to_string()))
                .collect::<Vec<_>>()
        })
    };

    view! {
        <For
            each=active
            key=|(field, value)| format!("{}={}", field, value)
            children=move |(field, value)| {
                view! {
                    <FilterTag
                        label=format!("{}: {}", field_label(labels, field), value)
                        on_remove=Callback::new(move |_| ctl.clear_filter(field))
                    />
                }
            }
        />
    }
}

/// Collapsible panel on wide viewports; a "Filters" button and bottom sheet
/// editing the draft on narrow ones.
#[component]
pub fn ListFilters<R: Send + Sync + 'static>(
    ctl: ListController<R>,
    labels: &'static [(&'static str, &'static str)],
    children: ChildrenFn,
) -> impl IntoView {
    let expanded = RwSignal::new(true);
    let active_count = Signal::derive(move || ctl.state.with(|s| s.committed.active_count()));
    let sheet_open = Signal::derive(move || ctl.state.with(|s| s.filter_sheet_open));
    let clear_all = Callback::new(move |_| ctl.clear_all());
    let fields = StoredValue::new(children);

    view! {
        <Show
            when=move || ctl.narrow.get()
            fallback=move || {
                view! {
                    <FilterPanel
                        is_expanded=expanded
                        active_filters_count=active_count
                        on_clear_all=clear_all
                        filter_tags=move || view! { <ActiveFilterTags ctl=ctl labels=labels /> }
                    >
                        {fields.with_value(|f| f())}
                    </FilterPanel>
                }
            }
        >
            <div class="filter-bar filter-bar--narrow">
                <Button appearance=ButtonAppearance::Secondary on_click=move |_| ctl.set_filter_sheet(true)>
                    {icon("filter")}
                    " Filters"
                    <Show when=move || { active_count.get() > 0 }>
                        <span class="badge badge--primary">{move || active_count.get()}</span>
                    </Show>
                </Button>
                <div class="filter-tags">
                    <ActiveFilterTags ctl=ctl labels=labels />
                </div>
            </div>
            <FilterSheet
                open=sheet_open
                on_apply=Callback::new(move |_| ctl.apply_draft())
                on_clear_all=clear_all
                on_close=Callback::new(move |_| ctl.set_filter_sheet(false))
            >
                {fields.with_value(|f| f())}
            </FilterSheet>
        </Show>
    }
}

/// Clickable table header that toggles the sort.
#[component]
pub fn SortHeader<R: Send + Sync + 'static>(
    ctl: ListController<R>,
    column: &'static str,
    label: &'static str,
) -> impl IntoView {
    view! {
        <th
            class="table__header-cell table__header-cell--sortable"
            on:click=move |_| ctl.set_sort(column)
            title="Sort"
        >
            {move || format!("{}{}", label, ctl.state.with(|s| get_sort_indicator(&s.sort, column)))}
        </th>
    }
}

/// Plain header for columns the backend cannot sort by.
#[component]
pub fn PlainHeader(label: &'static str) -> impl IntoView {
    view! { <th class="table__header-cell">{label}</th> }
}

/// Column picker wired to the persisted column selection.
#[component]
pub fn ListColumnPicker<R: Send + Sync + 'static>(
    ctl: ListController<R>,
    columns: &'static [(&'static str, &'static str)],
) -> impl IntoView {
    view! {
        <ColumnPicker
            columns=columns
            selected=Signal::derive(move || ctl.state.with(|s| s.extras.selected_columns.clone()))
            on_toggle=Callback::new(move |column: &'static str| ctl.toggle_column(column))
        />
    }
}

/// Pagination wired to the controller state.
#[component]
pub fn ListPagination<R: Send + Sync + 'static>(ctl: ListController<R>) -> impl IntoView {
    view! {
        <PaginationControls
            current_page=Signal::derive(move || ctl.state.with(|s| s.page.index))
            total_pages=Signal::derive(move || ctl.state.with(|s| s.page.total_pages))
            total_count=Signal::derive(move || ctl.state.with(|s| s.page.total_elements))
            page_size=Signal::derive(move || ctl.state.with(|s| s.page.size))
            on_page_change=Callback::new(move |page| ctl.set_page(page))
            on_page_size_change=Callback::new(move |size| ctl.set_page_size(size))
        />
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_label_falls_back_to_name() {
        let labels = &[("storeName", "Store")];
        assert_eq!(field_label(labels, "storeName"), "Store");
        assert_eq!(field_label(labels, "city"), "city");
    }
}
