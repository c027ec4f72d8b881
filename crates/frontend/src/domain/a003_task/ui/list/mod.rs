use contracts::domain::a003_task::aggregate::{TaskStatus, TaskType};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::config::config;
use crate::domain::a002_employee::api::fetch_field_officers;
use crate::domain::a003_task::api::{delete_task, update_task_status};
use crate::domain::a003_task::source::{
    default_state, TaskRow, TaskSource, COLUMNS, FILTER_LABELS, F_END_DATE, F_SEARCH,
    F_START_DATE, F_STATUS, F_TASK_TYPE, PERSISTENCE, SORT_COLUMNS,
};
use crate::domain::a003_task::ui::form::TaskForm;
use crate::shared::components::filter_panel::FilterSelect;
use crate::shared::components::list_status::{EmptyState, ErrorBanner, SkeletonCards, SkeletonRows};
use crate::shared::date_utils::{month_range, today};
use crate::shared::icons::icon;
use crate::shared::list_utils::SearchInput;
use crate::shared::list_view::controller::{use_list_controller, ListController};
use crate::shared::list_view::widgets::{
    ListColumnPicker, ListFilters, ListPagination, PlainHeader, SortHeader,
};
use crate::shared::modal_frame::confirm;
use crate::shared::page_frame::{PageFrame, PAGE_CAT_LIST};
use crate::system::auth::context::use_auth;

fn type_options() -> Vec<(String, String)> {
    vec![
        (TaskType::Requirement.as_str().to_string(), "Requirement".to_string()),
        (TaskType::Complaint.as_str().to_string(), "Complaint".to_string()),
    ]
}

fn status_options() -> Vec<(String, String)> {
    TaskStatus::ALL
        .iter()
        .map(|s| (s.as_str().to_string(), s.as_str().to_string()))
        .collect()
}

#[component]
fn DateFilter(ctl: ListController<TaskRow>, field: &'static str, label: &'static str) -> impl IntoView {
    let value = ctl.filter_value(field);
    view! {
        <label class="filter-field">
            <span class="filter-field__label">{label}</span>
            <input
                type="date"
                class="filter-field__input"
                prop:value=move || value.get()
                on:change=move |ev| ctl.set_filter(field, &event_target_value(&ev))
            />
        </label>
    }
}

/// Inline status switcher for one task.
#[component]
fn StatusSelect(row: TaskRow, on_change: Callback<(i64, TaskStatus)>) -> impl IntoView {
    let id = row.id;
    let current = row.status.clone();
    view! {
        <select
            class="status-select"
            on:click=|ev| ev.stop_propagation()
            on:change=move |ev| {
                if let Some(status) = TaskStatus::parse(&event_target_value(&ev)) {
                    on_change.run((id, status));
                }
            }
        >
            {TaskStatus::ALL
                .iter()
                .map(|s| {
                    let selected = s.as_str().eq_ignore_ascii_case(&current);
                    view! { <option value=s.as_str() selected=selected>{s.as_str()}</option> }
                })
                .collect_view()}
        </select>
    }
}

#[component]
#[allow(non_snake_case)]
pub fn TaskList() -> impl IntoView {
    let auth = use_auth();
    let ctl = use_list_controller(
        TaskSource::new(month_range(today())),
        default_state(config().list.default_page_size),
        PERSISTENCE,
        None,
    );

    let editing = RwSignal::new(None::<Option<TaskRow>>);
    let action_error = RwSignal::new(None::<String>);

    let assignees = RwSignal::new(Vec::<(String, String)>::new());
    {
        let client = auth.client();
        spawn_local(async move {
            match fetch_field_officers(&client).await {
                Ok(rows) => {
                    assignees.try_set(rows.into_iter().map(|e| (e.id.to_string(), e.name())).collect());
                }
                Err(e) => log::warn!("Failed to load assignees: {}", e),
            }
        });
    }

    let change_status = Callback::new(move |(id, status): (i64, TaskStatus)| {
        let client = auth.client();
        spawn_local(async move {
            match update_task_status(&client, id, status).await {
                Ok(()) => {
                    log::info!("Task {} moved to {}", id, status.as_str());
                    ctl.refresh();
                }
                Err(e) => {
                    log::error!("Failed to update task {}: {}", id, e);
                    action_error.try_set(Some(format!("Failed to update status: {}", e)));
                }
            }
        });
    });

    let remove = move |row: TaskRow| {
        if !confirm(&format!("Delete task '{}'?", row.title)) {
            return;
        }
        let client = auth.client();
        spawn_local(async move {
            match delete_task(&client, row.id).await {
                Ok(()) => ctl.refresh(),
                Err(e) => {
                    log::error!("Failed to delete task {}: {}", row.id, e);
                    action_error.try_set(Some(format!("Failed to delete task: {}", e)));
                }
            }
        });
    };

    let on_saved = Callback::new(move |_| {
        editing.set(None);
        ctl.refresh();
    });
    let on_close = Callback::new(move |_| editing.set(None));

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
                                    if SORT_COLUMNS.contains(&id) {
                                        view! { <SortHeader ctl=ctl column=id label=label /> }.into_any()
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
                                    let cells = columns
                                        .iter()
                                        .map(|&(col, _)| {
                                            if col == "status" {
                                                view! {
                                                    <td class="table__cell">
                                                        <StatusSelect row=row.clone() on_change=change_status />
                                                    </td>
                                                }
                                                .into_any()
                                            } else {
                                                view! { <td class="table__cell">{row.cell(col)}</td> }.into_any()
                                            }
                                        })
                                        .collect_view();
                                    let for_edit = row.clone();
                                    let for_delete = row.clone();
                                    view! {
                                        <tr class="table__row">
                                            {cells}
                                            <td class="table__cell table__cell--actions">
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
                            let id = row.id.to_string();
                            let toggle_id = id.clone();
                            let expanded = Signal::derive(move || ctl.state.with(|s| s.extras.expanded_ids.contains(&id)));
                            let details = row.clone();
                            let for_status = row.clone();
                            let for_edit = row.clone();
                            let for_delete = row.clone();
                            view! {
                                <div class="card">
                                    <div class="card__header" on:click=move |_| ctl.toggle_expanded(&toggle_id)>
                                        <div>
                                            <div class="card__title">{row.title.clone()}</div>
                                            <div class="card__subtitle">{row.store_name.clone()} " · " {row.cell("dueDate")}</div>
                                        </div>
                                        <span class=move || if expanded.get() { "card__chevron card__chevron--open" } else { "card__chevron" }>
                                            {icon("chevron-down")}
                                        </span>
                                    </div>
                                    <Show when=move || expanded.get()>
                                        <div class="card__body">
                                            <div>{details.description.clone()}</div>
                                            <div>"Type: " {details.task_type.clone()}</div>
                                            <div>"Priority: " {details.priority.clone()}</div>
                                            <div>"Assigned to: " {details.assigned_to_name.clone()}</div>
                                        </div>
                                    </Show>
                                    <div class="card__actions">
                                        <StatusSelect row=for_status on_change=change_status />
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
            page_id="a003_task--list"
            category=PAGE_CAT_LIST
            title="Requirements"
            actions=move || view! {
                <Button appearance=ButtonAppearance::Primary on_click=move |_| editing.set(Some(None))>
                    {icon("plus")} " New task"
                </Button>
            }
        >
            <ListFilters ctl=ctl labels=FILTER_LABELS>
                <div class="filter-grid">
                    <DateFilter ctl=ctl field=F_START_DATE label="From" />
                    <DateFilter ctl=ctl field=F_END_DATE label="To" />
                    <FilterSelect
                        label="Type"
                        options=Signal::derive(type_options)
                        value=ctl.filter_value(F_TASK_TYPE)
                        on_change=Callback::new(move |v: String| ctl.set_filter(F_TASK_TYPE, &v))
                    />
                    <FilterSelect
                        label="Status"
                        options=Signal::derive(status_options)
                        value=ctl.filter_value(F_STATUS)
                        on_change=Callback::new(move |v: String| ctl.set_filter(F_STATUS, &v))
                    />
                    <SearchInput
                        value=ctl.filter_value(F_SEARCH)
                        on_change=Callback::new(move |v: String| ctl.set_filter(F_SEARCH, &v))
                        placeholder="Title, store or assignee"
                    />
                </div>
            </ListFilters>

            <div class="list-toolbar">
                <ListColumnPicker ctl=ctl columns=COLUMNS />
                <ListPagination ctl=ctl />
            </div>

            <ErrorBanner error=action_error />
            <ErrorBanner error=Signal::derive(move || ctl.result.with(|r| r.error.clone())) />

            {move || if ctl.narrow.get() { cards().into_any() } else { table().into_any() }}

            <Show when=is_empty>
                <EmptyState message="No tasks in this period" />
            </Show>

            {move || editing.get().map(|row| view! {
                <TaskForm row=row assignees=assignees on_saved=on_saved on_close=on_close />
            })}
        </PageFrame>
    }
}
