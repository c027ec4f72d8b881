//! Store detail panel: visits, notes, brand pros/cons and change history.

use contracts::domain::a005_visit::aggregate::Visit;
use contracts::domain::a006_note::aggregate::{CreateNote, Note};
use contracts::domain::a007_brand_pros_cons::aggregate::{BrandProsCons, CreateBrandProsCons};
use contracts::projections::p900_intent_audit::dto::IntentAudit;
use contracts::projections::p901_monthly_sale::dto::MonthlySaleChange;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::future::Future;
use thaw::*;

use crate::domain::a001_store::api;
use crate::domain::a001_store::source::StoreRow;
use crate::shared::api_utils::ApiError;
use crate::shared::date_utils::{format_date, format_datetime};
use crate::shared::icons::icon;
use crate::shared::modal_frame::ModalFrame;
use crate::system::auth::context::use_auth;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Tab {
    Visits,
    Notes,
    Brands,
    History,
}

impl Tab {
    const ALL: [Tab; 4] = [Tab::Visits, Tab::Notes, Tab::Brands, Tab::History];

    fn label(&self) -> &'static str {
        match self {
            Tab::Visits => "Visits",
            Tab::Notes => "Notes",
            Tab::Brands => "Brands",
            Tab::History => "History",
        }
    }
}

/// One pro or con per line; blank lines dropped.
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

fn optional_number<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

fn load_into<T, Fut>(target: RwSignal<Vec<T>>, error: RwSignal<Option<String>>, what: &'static str, fut: Fut)
where
    T: Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<T>, ApiError>> + 'static,
{
    spawn_local(async move {
        match fut.await {
            Ok(items) => {
                target.try_set(items);
            }
            Err(e) => {
                log::warn!("Failed to load {}: {}", what, e);
                error.try_set(Some(format!("Failed to load {}: {}", what, e)));
            }
        }
    });
}

#[component]
pub fn StoreDetailPanel(row: StoreRow, on_close: Callback<()>) -> impl IntoView {
    let auth = use_auth();
    let store_id = row.id;
    let tab = RwSignal::new(Tab::Visits);
    let error = RwSignal::new(None::<String>);

    let visits = RwSignal::new(Vec::<Visit>::new());
    let notes = RwSignal::new(Vec::<Note>::new());
    let brands = RwSignal::new(Vec::<BrandProsCons>::new());
    let intent_history = RwSignal::new(Vec::<IntentAudit>::new());
    let sale_history = RwSignal::new(Vec::<MonthlySaleChange>::new());

    let load_notes = move || {
        let client = auth.client();
        load_into(notes, error, "notes", async move { api::fetch_notes(&client, store_id).await });
    };
    let load_brands = move || {
        let client = auth.client();
        load_into(brands, error, "brands", async move { api::fetch_brands(&client, store_id).await });
    };

    {
        let client = auth.client();
        load_into(visits, error, "visits", async move { api::fetch_visits(&client, store_id).await });
        let client = auth.client();
        load_into(intent_history, error, "intent history", async move {
            api::fetch_intent_history(&client, store_id).await
        });
        let client = auth.client();
        load_into(sale_history, error, "monthly sale history", async move {
            api::fetch_monthly_sale_history(&client, store_id).await
        });
        load_notes();
        load_brands();
    }

    // Notes
    let note_text = RwSignal::new(String::new());
    let add_note = move |_| {
        let content = note_text.get_untracked().trim().to_string();
        if content.is_empty() {
            return;
        }
        let dto = CreateNote {
            content,
            store_id,
            employee_id: auth.role_context().and_then(|c| c.employee_id),
        };
        let client = auth.client();
        spawn_local(async move {
            match api::create_note(&client, &dto).await {
                Ok(()) => {
                    note_text.try_set(String::new());
                    load_notes();
                }
                Err(e) => {
                    error.try_set(Some(format!("Failed to add note: {}", e)));
                }
            }
        });
    };
    let remove_note = move |note_id: i64| {
        let client = auth.client();
        spawn_local(async move {
            match api::delete_note(&client, note_id).await {
                Ok(()) => load_notes(),
                Err(e) => {
                    error.try_set(Some(format!("Failed to delete note: {}", e)));
                }
            }
        });
    };

    // Brands
    let brand_name = RwSignal::new(String::new());
    let brand_pros = RwSignal::new(String::new());
    let brand_cons = RwSignal::new(String::new());
    let add_brand = move |_| {
        let name = brand_name.get_untracked().trim().to_string();
        if name.is_empty() {
            return;
        }
        let dto = CreateBrandProsCons {
            store_id,
            brand_name: name,
            pros: split_lines(&brand_pros.get_untracked()),
            cons: split_lines(&brand_cons.get_untracked()),
        };
        let client = auth.client();
        spawn_local(async move {
            match api::create_brand(&client, &dto).await {
                Ok(()) => {
                    brand_name.try_set(String::new());
                    brand_pros.try_set(String::new());
                    brand_cons.try_set(String::new());
                    load_brands();
                }
                Err(e) => {
                    error.try_set(Some(format!("Failed to add brand: {}", e)));
                }
            }
        });
    };
    let remove_brand = move |brand_id: i64| {
        let client = auth.client();
        spawn_local(async move {
            match api::delete_brand(&client, brand_id).await {
                Ok(()) => load_brands(),
                Err(e) => {
                    error.try_set(Some(format!("Failed to delete brand: {}", e)));
                }
            }
        });
    };

    let title = row.store_name.clone();

    view! {
        <ModalFrame title=title on_close=on_close modal_class="store-detail-modal">
            <div class="detail-summary">
                <div><span class="detail-summary__label">"Owner"</span>{row.owner_name()}</div>
                <div><span class="detail-summary__label">"Contact"</span>{row.primary_contact.clone()}</div>
                <div><span class="detail-summary__label">"Address"</span>{row.address()}</div>
                <div><span class="detail-summary__label">"Client type"</span>{row.client_type.clone()}</div>
                <div>
                    <span class="detail-summary__label">"Outstanding"</span>
                    {format!("{:.2}", row.outstanding_payment)}
                </div>
                <div><span class="detail-summary__label">"Monthly sale"</span>{optional_number(row.monthly_sale)}</div>
                <div><span class="detail-summary__label">"Intent"</span>{optional_number(row.intent)}</div>
                <div><span class="detail-summary__label">"Assigned to"</span>{row.assigned_employee.clone()}</div>
            </div>

            {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

            <div class="tabs">
                {Tab::ALL
                    .into_iter()
                    .map(|t| {
                        view! {
                            <button
                                class=move || if tab.get() == t { "tabs__item tabs__item--active" } else { "tabs__item" }
                                on:click=move |_| tab.set(t)
                            >
                                {t.label()}
                            </button>
                        }
                    })
                    .collect_view()}
            </div>

            <div class="tabs__content">
                {move || match tab.get() {
                    Tab::Visits => view! {
                        <table class="table__data">
                            <thead class="table__head">
                                <tr>
                                    <th class="table__header-cell">"Date"</th>
                                    <th class="table__header-cell">"Purpose"</th>
                                    <th class="table__header-cell">"Outcome"</th>
                                    <th class="table__header-cell">"Employee"</th>
                                </tr>
                            </thead>
                            <tbody>
                                <For
                                    each=move || visits.get()
                                    key=|v| v.id
                                    children=|v| view! {
                                        <tr class="table__row">
                                            <td class="table__cell">{format_date(&v.visit_date)}</td>
                                            <td class="table__cell">{v.purpose}</td>
                                            <td class="table__cell">{v.outcome.unwrap_or_default()}</td>
                                            <td class="table__cell">{v.employee_name}</td>
                                        </tr>
                                    }
                                />
                            </tbody>
                        </table>
                    }.into_any(),
                    Tab::Notes => view! {
                        <div class="notes">
                            <div class="notes__composer">
                                <textarea
                                    class="form__textarea"
                                    rows="3"
                                    placeholder="Add a note"
                                    prop:value=move || note_text.get()
                                    on:input=move |ev| note_text.set(event_target_value(&ev))
                                />
                                <Button appearance=ButtonAppearance::Primary on_click=add_note>"Add note"</Button>
                            </div>
                            <For
                                each=move || notes.get()
                                key=|n| n.id
                                children=move |n| {
                                    let id = n.id;
                                    view! {
                                        <div class="notes__item">
                                            <div class="notes__meta">
                                                {n.employee_name} " · " {format_datetime(&n.created_date)}
                                            </div>
                                            <div class="notes__content">{n.content}</div>
                                            <button class="button button--ghost" on:click=move |_| remove_note(id) title="Delete note">
                                                {icon("trash")}
                                            </button>
                                        </div>
                                    }
                                }
                            />
                        </div>
                    }.into_any(),
                    Tab::Brands => view! {
                        <div class="brands">
                            <div class="brands__composer">
                                <input
                                    class="form__input"
                                    placeholder="Brand"
                                    prop:value=move || brand_name.get()
                                    on:input=move |ev| brand_name.set(event_target_value(&ev))
                                />
                                <textarea
                                    class="form__textarea"
                                    rows="3"
                                    placeholder="Pros, one per line"
                                    prop:value=move || brand_pros.get()
                                    on:input=move |ev| brand_pros.set(event_target_value(&ev))
                                />
                                <textarea
                                    class="form__textarea"
                                    rows="3"
                                    placeholder="Cons, one per line"
                                    prop:value=move || brand_cons.get()
                                    on:input=move |ev| brand_cons.set(event_target_value(&ev))
                                />
                                <Button appearance=ButtonAppearance::Primary on_click=add_brand>"Add brand"</Button>
                            </div>
                            <For
                                each=move || brands.get()
                                key=|b| b.id
                                children=move |b| {
                                    let id = b.id;
                                    view! {
                                        <div class="brands__item">
                                            <div class="brands__name">{b.brand_name}</div>
                                            <ul class="brands__pros">
                                                {b.pros.into_iter().map(|p| view! { <li>{p}</li> }).collect_view()}
                                            </ul>
                                            <ul class="brands__cons">
                                                {b.cons.into_iter().map(|c| view! { <li>{c}</li> }).collect_view()}
                                            </ul>
                                            <button class="button button--ghost" on:click=move |_| remove_brand(id) title="Delete brand">
                                                {icon("trash")}
                                            </button>
                                        </div>
                                    }
                                }
                            />
                        </div>
                    }.into_any(),
                    Tab::History => view! {
                        <div class="history">
                            <h3>"Intent"</h3>
                            <For
                                each=move || intent_history.get()
                                key=|h| h.id
                                children=|h| view! {
                                    <div class="history__item">
                                        {format!(
                                            "{} → {}",
                                            optional_number(h.old_intent_level),
                                            optional_number(h.new_intent_level),
                                        )}
                                        <span class="history__meta">{h.changed_by} " · " {format_datetime(&h.changed_at)}</span>
                                    </div>
                                }
                            />
                            <h3>"Monthly sale"</h3>
                            <For
                                each=move || sale_history.get()
                                key=|h| h.id
                                children=|h| view! {
                                    <div class="history__item">
                                        {format!(
                                            "{} → {}",
                                            optional_number(h.old_monthly_sale),
                                            optional_number(h.new_monthly_sale),
                                        )}
                                        <span class="history__meta">{h.changed_by} " · " {format_datetime(&h.changed_at)}</span>
                                    </div>
                                }
                            />
                        </div>
                    }.into_any(),
                }}
            </div>
        </ModalFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_lines_drops_blanks() {
        assert_eq!(split_lines("Good margin\n\n  Fast delivery \n"), vec!["Good margin", "Fast delivery"]);
        assert!(split_lines("  \n").is_empty());
    }

    #[test]
    fn test_optional_number() {
        assert_eq!(optional_number(Some(7)), "7");
        assert_eq!(optional_number::<f64>(None), "-");
    }
}
