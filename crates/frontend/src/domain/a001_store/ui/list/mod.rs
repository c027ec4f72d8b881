use contracts::domain::a001_store::aggregate::CLIENT_TYPES;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::config::config;
use crate::domain::a001_store::api::{delete_store, export_stores, EXPORT_FILENAME};
use crate::domain::a001_store::source::{
    default_state, StoreRow, StoreSource, COLUMNS, FILTER_LABELS, F_ASSIGNED_EMPLOYEE, F_CITY,
    F_CLIENT_TYPE, F_OWNER_NAME, F_PRIMARY_CONTACT, F_STATE, F_STORE_NAME, PERSISTENCE, SORT_COLUMNS,
};
use crate::domain::a001_store::ui::details::StoreDetailPanel;
use crate::domain::a001_store::ui::form::StoreForm;
use crate::domain::a002_employee::api::fetch_field_officers;
use crate::shared::components::filter_panel::{same_label_options, FilterSelect};
use crate::shared::components::list_status::{EmptyState, ErrorBanner, SkeletonCards, SkeletonRows};
use crate::shared::export::download_csv;
use crate::shared::icons::icon;
use crate::shared::list_utils::SearchInput;
use crate::shared::list_view::controller::{use_list_controller, ListController};
use crate::shared::list_view::widgets::{
    ListColumnPicker, ListFilters, ListPagination, PlainHeader, SortHeader,
};
use crate::shared::modal_frame::confirm;
use crate::shared::page_frame::{PageFrame, PAGE_CAT_LIST};
use crate::system::auth::context::use_auth;

#[derive(Clone)]
enum StoreModal {
    Create,
    Edit(StoreRow),
    Details(StoreRow),
}

fn visible_columns(ctl: ListController<StoreRow>) -> Vec<(&'static str, &'static str)> {
    ctl.state.with(|s| {
        COLUMNS
            .iter()
            .copied()
            .filter(|(id, _)| s.is_column_visible(id))
            .collect()
    })
}

#[component]
fn TextFilter(
    ctl: ListController<StoreRow>,
    field: &'static str,
    #[prop(into)] placeholder: String,
) -> impl IntoView {
    view! {
        <SearchInput
            value=ctl.filter_value(field)
            on_change=Callback::new(move |v: String| ctl.set_filter(field, &v))
            placeholder=placeholder
        />
    }
}

#[component]
#[allow(non_snake_case)]
pub fn StoreList() -> impl IntoView {
    let auth = use_auth();
    let ctl = use_list_controller(
        StoreSource,
        default_state(config().list.default_page_size),
        PERSISTENCE,
        None,
    );
    let is_admin = Signal::derive(move || {
        auth.role_state().with(|r| r.context().is_some_and(|c| c.is_admin()))
    });

    let modal = RwSignal::new(None::<StoreModal>);
    let action_error = RwSignal::new(None::<String>);
    let exporting = RwSignal::new(false);

    // Assigned-employee options, admins only
    let officers = RwSignal::new(Vec::<(String, String)>::new());
    Effect::new(move |loaded: Option<bool>| {
        if loaded == Some(true) || !is_admin.get() {
            return loaded.unwrap_or(false);
        }
        let client = auth.client();
        spawn_local(async move {
            match fetch_field_officers(&client).await {
                Ok(rows) => {
                    let options = rows.into_iter().map(|e| (e.id.to_string(), e.name())).collect();
                    officers.try_set(options);
                }
                Err(e) => log::warn!("Failed to load field officers: {}", e),
            }
        });
        true
    });

    let export = move |_| {
        exporting.set(true);
        let client = auth.client();
        spawn_local(async move {
            let result = export_stores(&client)
                .await
                .map_err(|e| e.to_string())
                .and_then(|bytes| download_csv(&bytes, EXPORT_FILENAME));
            exporting.try_set(false);
            if let Err(e) = result {
                log::error!("Export failed: {}", e);
                action_error.try_set(Some(format!("Export failed: {}", e)));
            }
        });
    };

    let remove = move |row: StoreRow| {
        if !confirm(&format!("Delete customer '{}'?", row.store_name)) {
            return;
        }
        let client = auth.client();
        spawn_local(async move {
            match delete_store(&client, row.id).await {
                Ok(()) => {
                    log::info!("Store {} deleted", row.id);
                    ctl.refresh();
                }
                Err(e) => {
                    log::error!("Failed to delete store {}: {}", row.id, e);
                    action_error.try_set(Some(format!("Failed to delete customer: {}", e)));
                }
            }
        });
    };

    let on_saved = Callback::new(move |_| {
        modal.set(None);
        ctl.refresh();
    });
    let on_close = Callback::new(move |_| modal.set(None));

    let filter_fields = move || {
        view! {
            <div class="filter-grid">
                <TextFilter ctl=ctl field=F_STORE_NAME placeholder="Store name" />
                <TextFilter ctl=ctl field=F_OWNER_NAME placeholder="Owner" />
                <TextFilter ctl=ctl field=F_PRIMARY_CONTACT placeholder="Contact" />
                <TextFilter ctl=ctl field=F_CITY placeholder="City" />
                <TextFilter ctl=ctl field=F_STATE placeholder="State" />
                <FilterSelect
                    label="Client type"
                    options=Signal::derive(|| same_label_options(CLIENT_TYPES))
                    value=ctl.filter_value(F_CLIENT_TYPE)
                    on_change=Callback::new(move |v: String| ctl.set_filter(F_CLIENT_TYPE, &v))
                />
                <Show when=move || is_admin.get()>
                    <FilterSelect
                        label="Assigned employee"
                        options=officers
                        value=ctl.filter_value(F_ASSIGNED_EMPLOYEE)
                        on_change=Callback::new(move |v: String| ctl.set_filter(F_ASSIGNED_EMPLOYEE, &v))
                    />
                </Show>
            </div>
        }
    };

    let rows = move || ctl.result.with(|r| r.rows.clone());
    let loading = move || ctl.result.with(|r| r.loading);
    let is_empty = move || ctl.result.with(|r| !r.loading && r.error.is_none() && r.rows.is_empty());

    let table = move || {
        let columns = visible_columns(ctl);
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
                                        .map(|&(id, _)| view! { <td class="table__cell">{row.cell(id)}</td> })
                                        .collect_view();
                                    let for_details = row.clone();
                                    let for_edit = row.clone();
                                    let for_delete = row.clone();
                                    view! {
                                        <tr
                                            class="table__row"
                                            on:click=move |_| modal.set(Some(StoreModal::Details(for_details.clone())))
                                        >
                                            {cells}
                                            <td class="table__cell table__cell--actions" on:click=|ev| ev.stop_propagation()>
                                                <button class="button button--ghost" on:click=move |_| modal.set(Some(StoreModal::Edit(for_edit.clone())))>
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
                            let for_details = row.clone();
                            let for_edit = row.clone();
                            let for_delete = row.clone();
                            let details = row.clone();
                            view! {
                                <div class="card">
                                    <div class="card__header" on:click=move |_| ctl.toggle_expanded(&toggle_id)>
                                        <div>
                                            <div class="card__title">{row.store_name.clone()}</div>
                                            <div class="card__subtitle">{row.owner_name()} " · " {row.city.clone()}</div>
                                        </div>
                                        <span class=move || if expanded.get() { "card__chevron card__chevron--open" } else { "card__chevron" }>
                                            {icon("chevron-down")}
                                        </span>
                                    </div>
                                    <Show when=move || expanded.get()>
                                        <div class="card__body">
                                            <div>"Contact: " {details.primary_contact.clone()}</div>
                                            <div>"Client type: " {details.client_type.clone()}</div>
                                            <div>"Outstanding: " {details.cell("outstandingPayment")}</div>
                                            <div>"Assigned to: " {details.assigned_employee.clone()}</div>
                                        </div>
                                    </Show>
                                    <div class="card__actions">
                                        <button class="button button--ghost" on:click=move |_| modal.set(Some(StoreModal::Details(for_details.clone())))>
                                            "Details"
                                        </button>
                                        <button class="button button--ghost" on:click=move |_| modal.set(Some(StoreModal::Edit(for_edit.clone())))>
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
            page_id="a001_store--list"
            category=PAGE_CAT_LIST
            title="Customers"
            actions=move || view! {
                <Button appearance=ButtonAppearance::Primary on_click=move |_| modal.set(Some(StoreModal::Create))>
                    {icon("plus")} " New customer"
                </Button>
                <Button
                    appearance=ButtonAppearance::Secondary
                    disabled=Signal::derive(move || exporting.get())
                    on_click=export
                >
                    {icon("download")}
                    {move || if exporting.get() { " Exporting..." } else { " Export CSV" }}
                </Button>
            }
        >
            <ListFilters ctl=ctl labels=FILTER_LABELS>
                {filter_fields()}
            </ListFilters>

            <div class="list-toolbar">
                <ListColumnPicker ctl=ctl columns=COLUMNS />
                <ListPagination ctl=ctl />
            </div>

            <ErrorBanner error=action_error />
            <ErrorBanner error=Signal::derive(move || ctl.result.with(|r| r.error.clone())) />

            {move || if ctl.narrow.get() { cards().into_any() } else { table().into_any() }}

            <Show when=is_empty>
                <EmptyState message="No customers match the current filters" />
            </Show>

            {move || modal.get().map(|m| match m {
                StoreModal::Create => view! { <StoreForm row=None on_saved=on_saved on_close=on_close /> }.into_any(),
                StoreModal::Edit(row) => view! { <StoreForm row=Some(row) on_saved=on_saved on_close=on_close /> }.into_any(),
                StoreModal::Details(row) => view! { <StoreDetailPanel row=row on_close=on_close /> }.into_any(),
            })}
        </PageFrame>
    }
}
