use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::config::config;
use crate::domain::a002_employee::api::delete_employee;
use crate::domain::a002_employee::source::{
    default_state, EmployeeRow, EmployeeSource, COLUMNS, FILTER_LABELS, F_SEARCH, F_STATUS,
    PERSISTENCE, SORT_COLUMNS, STATUS_OPTIONS,
};
use crate::domain::a002_employee::ui::form::EmployeeForm;
use crate::shared::components::filter_panel::FilterSelect;
use crate::shared::components::list_status::{EmptyState, ErrorBanner, SkeletonCards, SkeletonRows};
use crate::shared::date_utils::format_date;
use crate::shared::icons::icon;
use crate::shared::list_utils::SearchInput;
use crate::shared::list_view::controller::use_list_controller;
use crate::shared::list_view::widgets::{
    ListColumnPicker, ListFilters, ListPagination, PlainHeader, SortHeader,
};
use crate::shared::modal_frame::confirm;
use crate::shared::page_frame::{PageFrame, PAGE_CAT_LIST};
use crate::system::auth::context::use_auth;

#[component]
#[allow(non_snake_case)]
pub fn EmployeeList() -> impl IntoView {
    let auth = use_auth();
    // Search, page and size are mirrored to ?q=&page=&size=
    let ctl = use_list_controller(
        EmployeeSource,
        default_state(config().list.default_page_size),
        PERSISTENCE,
        Some(F_SEARCH),
    );

    let editing = RwSignal::new(None::<Option<EmployeeRow>>);
    let action_error = RwSignal::new(None::<String>);

    let selected_id = Signal::derive(move || ctl.state.with(|s| s.extras.selected_employee_id));
    let selected = Signal::derive(move || {
        let id = selected_id.get()?;
        ctl.result.with(|r| r.rows.iter().find(|e| e.id == id).cloned())
    });

    let remove = move |row: EmployeeRow| {
        if !confirm(&format!("Delete employee '{}'?", row.name())) {
            return;
        }
        let client = auth.client();
        spawn_local(async move {
            match delete_employee(&client, row.id).await {
                Ok(()) => {
                    log::info!("Employee {} deleted", row.id);
                    if ctl.state.with_untracked(|s| s.extras.selected_employee_id) == Some(row.id) {
                        ctl.select_employee(None);
                    }
                    ctl.refresh();
                }
                Err(e) => {
                    log::error!("Failed to delete employee {}: {}", row.id, e);
                    action_error.try_set(Some(format!("Failed to delete employee: {}", e)));
                }
            }
        });
    };

    let on_saved = Callback::new(move |_| {
        editing.set(None);
        ctl.refresh();
    });
    let on_close = Callback::new(move |_| editing.set(None));

    let status_options = Signal::derive(|| {
        STATUS_OPTIONS
            .iter()
            .map(|(v, label)| (v.to_string(), label.to_string()))
            .collect::<Vec<_>>()
    });

    let rows = move || ctl.result.with(|r| r.rows.clone());
    let loading = move || ctl.result.with(|r| r.loading);
    let is_empty = move || ctl.result.with(|r| !r.loading && r.error.is_none() && r.rows.is_empty());

    let table = move || {
        let columns: Vec<(&'static str, &'static str)> = ctl.state.with(|s| {
            COLUMNS.iter().copied().filter(|(id, _)| s.is_column_visible(id)).collect()
        });
        let column_count = columns.len() + 1;
        view! {
            <div class="table">
                <table class="table__data table--striped">
                    <thead class="table__head">
                        <tr>
                            {columns
                                .iter()
                                .map(|&(id, label)| {
                                    // "name" sorts by first name
                                    let sort_key = if id == "name" { "firstName" } else { id };
                                    if SORT_COLUMNS.contains(&sort_key) {
                                        view! { <SortHeader ctl=ctl column=sort_key label=label /> }.into_any()
                                    } else {
                                        view! { <PlainHeader label=label /> }.into_any()
                                    }
                                })
                                .collect_view()}
                            <PlainHeader label="" />
                        </tr>
                    </thead>
                    <tbody>
                        <Show when=loading fallback=move || {
                            let columns = columns.clone();
                            rows()
                                .into_iter()
                                .map(|row| {
                                    let id = row.id;
                                    let cells = columns
                                        .iter()
                                        .map(|&(col, _)| view! { <td class="table__cell">{row.cell(col)}</td> })
                                        .collect_view();
                                    let for_edit = row.clone();
                                    let for_delete = row.clone();
                                    view! {
                                        <tr
                                            class=move || {
                                                if selected_id.get() == Some(id) { "table__row table__row--selected" } else { "table__row" }
                                            }
                                            on:click=move |_| ctl.select_employee(Some(id))
                                        >
                                            {cells}
                                            <td class="table__cell table__cell--actions" on:click=|ev| ev.stop_propagation()>
                                                <button class="button button--ghost" on:click=move |_| editing.set(Some(Some(for_edit.clone())))>
                                                    "Edit"
                                                </button>
                                                <button class="button button--ghost" title="Delete" on:click=move |_| remove(for_delete.clone())>
                                                    {icon("trash")}
                                                </button>
                                            </td>
                                        </tr>
                                    }
                                })
                                .collect_view()
                        }>
                            <SkeletonRows columns=column_count />
                        </Show>
                    </tbody>
                </table>
            </div>
        }
    };

    let cards = move || {
        view! {
            <div class="card-list">
                <Show when=loading fallback=move || {
                    rows()
                        .into_iter()
                        .map(|row| {
                            let id = row.id;
                            let for_edit = row.clone();
                            let for_delete = row.clone();
                            view! {
                                <div
                                    class=move || if selected_id.get() == Some(id) { "card card--selected" } else { "card" }
                                    on:click=move |_| ctl.select_employee(Some(id))
                                >
                                    <div class="card__title">{row.name()}</div>
                                    <div class="card__subtitle">{row.role.clone()} " · " {row.city.clone()}</div>
                                    <div>{row.primary_contact.clone()}</div>
                                    <div class="card__actions" on:click=|ev| ev.stop_propagation()>
                                        <button class="button button--ghost" on:click=move |_| editing.set(Some(Some(for_edit.clone())))>
                                            "Edit"
                                        </button>
                                        <button class="button button--ghost" on:click=move |_| remove(for_delete.clone())>
                                            {icon("trash")}
                                        </button>
                                    </div>
                                </div>
                            }
                        })
                        .collect_view()
                }>
                    <SkeletonCards />
                </Show>
            </div>
        }
    };

    view! {
        <PageFrame
            page_id="a002_employee--list"
            category=PAGE_CAT_LIST
            title="Employees"
            actions=move || view! {
                <Button appearance=ButtonAppearance::Primary on_click=move |_| editing.set(Some(None))>
                    {icon("plus")} " New employee"
                </Button>
            }
        >
            <ListFilters ctl=ctl labels=FILTER_LABELS>
                <div class="filter-grid">
                    <SearchInput
                        value=ctl.filter_value(F_SEARCH)
                        on_change=Callback::new(move |v: String| ctl.set_filter(F_SEARCH, &v))
                        placeholder="Name, email or phone"
                    />
                    <FilterSelect
                        label="Status"
                        options=status_options
                        value=ctl.filter_value(F_STATUS)
                        on_change=Callback::new(move |v: String| ctl.set_filter(F_STATUS, &v))
                    />
                </div>
            </ListFilters>

            <div class="list-toolbar">
                <ListColumnPicker ctl=ctl columns=COLUMNS />
                <ListPagination ctl=ctl />
            </div>

            <ErrorBanner error=action_error />
            <ErrorBanner error=Signal::derive(move || ctl.result.with(|r| r.error.clone())) />

            <div class="list-with-detail">
                <div class="list-with-detail__list">
                    {move || if ctl.narrow.get() { cards().into_any() } else { table().into_any() }}
                    <Show when=is_empty>
                        <EmptyState message="No employees found" />
                    </Show>
                </div>
                {move || selected.get().map(|e| view! {
                    <aside class="list-with-detail__panel">
                        <div class="detail-summary__header">
                            <h3>{e.name()}</h3>
                            <button class="button button--ghost" on:click=move |_| ctl.select_employee(None) title="Close">
                                {icon("x")}
                            </button>
                        </div>
                        <div><span class="detail-summary__label">"Email"</span>{e.email.clone()}</div>
                        <div><span class="detail-summary__label">"Contact"</span>{e.primary_contact.clone()}</div>
                        <div><span class="detail-summary__label">"Role"</span>{e.role.clone()}</div>
                        <div><span class="detail-summary__label">"Department"</span>{e.department.clone()}</div>
                        <div><span class="detail-summary__label">"City"</span>{e.city.clone()}</div>
                        <div><span class="detail-summary__label">"Joined"</span>{format_date(&e.date_of_joining)}</div>
                        <div><span class="detail-summary__label">"Username"</span>{e.user_name.clone()}</div>
                    </aside>
                })}
            </div>

            {move || editing.get().map(|row| view! { <EmployeeForm row=row on_saved=on_saved on_close=on_close /> })}
        </PageFrame>
    }
}
