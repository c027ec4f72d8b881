//! Reactive wiring of the list view: hydration, persistence, URL sync and
//! fetching, shared by every list page.

use leptos::prelude::*;
use leptos::task::spawn_local;
use std::rc::Rc;

use super::orchestrator::{apply_outcome, FetchDriver, ListResult, ListSource};
use super::persistence::{
    current_url_query, replace_url_query, PersistenceAdapter, PersistenceSpec, QueryOverrides,
    SessionStore,
};
use super::state::{FilterMode, ListViewState};
use crate::config::config;
use crate::system::auth::context::use_auth;

/// Viewport width below which cards and the filter sheet are used.
pub const NARROW_BREAKPOINT_PX: f64 = 768.0;

pub struct ListController<R: Send + Sync + 'static> {
    pub state: RwSignal<ListViewState>,
    pub result: RwSignal<ListResult<R>>,
    pub hydrated: RwSignal<bool>,
    pub narrow: Signal<bool>,
    driver: StoredValue<FetchDriver>,
    reset_source: StoredValue<Box<dyn Fn()>, LocalStorage>,
    refresh_tick: RwSignal<u64>,
}

impl<R: Send + Sync + 'static> Clone for ListController<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: Send + Sync + 'static> Copy for ListController<R> {}

impl<R: Send + Sync + 'static> ListController<R> {
    fn filter_mode(&self) -> FilterMode {
        if self.narrow.get_untracked() {
            FilterMode::Draft
        } else {
            FilterMode::Direct
        }
    }

    pub fn set_filter(&self, field: &str, value: &str) {
        let mode = self.filter_mode();
        self.state.update(|s| s.set_filter(field, value, mode));
    }

    pub fn clear_filter(&self, field: &str) {
        self.state.update(|s| s.clear_filter(field));
    }

    pub fn clear_all(&self) {
        self.state.update(|s| s.clear_all());
    }

    pub fn apply_draft(&self) {
        self.state.update(|s| s.apply_draft());
    }

    pub fn set_filter_sheet(&self, open: bool) {
        self.state.update(|s| s.filter_sheet_open = open);
    }

    pub fn set_sort(&self, column: &str) {
        self.state.update(|s| s.set_sort(column));
    }

    pub fn set_page(&self, index: usize) {
        self.state.update(|s| s.set_page(index));
    }

    pub fn set_page_size(&self, size: usize) {
        self.state.update(|s| s.set_page_size(size));
    }

    pub fn toggle_column(&self, column: &str) {
        self.state.update(|s| s.toggle_column(column));
    }

    pub fn toggle_expanded(&self, id: &str) {
        self.state.update(|s| s.toggle_expanded(id));
    }

    pub fn select_employee(&self, id: Option<i64>) {
        self.state.update(|s| s.extras.selected_employee_id = id);
    }

    /// Fetch again with unchanged parameters, e.g. after a mutation.
    pub fn refresh(&self) {
        self.reset_source.with_value(|reset| reset());
        self.driver.update_value(|d| d.invalidate());
        self.refresh_tick.update(|t| *t += 1);
    }

    /// Draft value on narrow viewports, committed value otherwise.
    pub fn filter_value(&self, field: &'static str) -> Signal<String> {
        let state = self.state;
        let narrow = self.narrow;
        Signal::derive(move || {
            state.with(|s| {
                if narrow.get() {
                    s.draft.get(field).to_string()
                } else {
                    s.committed.get(field).to_string()
                }
            })
        })
    }
}

/// Build the controller for a page. `url_search_field` enables the `q`,
/// `page` and `size` query parameters with that filter as `q`.
pub fn use_list_controller<S>(
    source: S,
    defaults: ListViewState,
    spec: PersistenceSpec,
    url_search_field: Option<&'static str>,
) -> ListController<S::Row>
where
    S: ListSource + 'static,
    S::Row: Send + Sync,
{
    let auth = use_auth();
    let role = auth.role_state();
    let flags = config().features;

    let state = RwSignal::new(defaults.clone());
    let result = RwSignal::new(ListResult::<S::Row>::default());
    let hydrated = RwSignal::new(false);
    let refresh_tick = RwSignal::new(0u64);
    let driver = StoredValue::new(FetchDriver::new());
    let source = StoredValue::new_local(Rc::new(source));
    let narrow = use_narrow_viewport();
    let reset_source = StoredValue::new_local(Box::new(move || {
        source.with_value(|src| src.invalidate());
    }) as Box<dyn Fn()>);

    let adapter = Rc::new(PersistenceAdapter::new(spec, SessionStore));

    // Hydrate once, before anything may fetch
    {
        let adapter = Rc::clone(&adapter);
        Effect::new(move |done: Option<()>| {
            if done.is_some() {
                return;
            }
            let overrides = url_search_field.map(|_| QueryOverrides::parse(&current_url_query()));
            let query = overrides
                .as_ref()
                .zip(url_search_field)
                .filter(|(o, _)| !o.is_empty());
            let restored = adapter.hydrate(defaults.clone(), query);
            state.set(restored);
            hydrated.set(true);
            log::debug!("List state hydrated ({})", adapter.spec().key);
        });
    }

    // Persist and mirror to the URL on every change after hydration
    Effect::new(move |_| {
        let current = state.get();
        if !hydrated.get() {
            return;
        }
        adapter.persist(&current);
        if let Some(field) = url_search_field {
            replace_url_query(&QueryOverrides::query_string(&current, field));
        }
    });

    let fetch_key = Memo::new(move |_| state.with(|s| s.fetch_key()));

    Effect::new(move |_| {
        fetch_key.track();
        refresh_tick.track();
        let is_hydrated = hydrated.get();
        let role_state = role.get();

        // Session changed or signed out: nothing fetched so far belongs to
        // the next session.
        if !role_state.is_determined() {
            source.with_value(|src| src.invalidate());
            if result.with_untracked(|r| !r.rows.is_empty() || r.loading) {
                result.set(ListResult::default());
            }
        }

        let polled = driver
            .try_update_value(|d| {
                state.with_untracked(|s| {
                    source.with_value(|src| d.poll(is_hydrated, &role_state, s, src.as_ref(), flags))
                })
            })
            .flatten();

        let Some((ticket, plan)) = polled else {
            return;
        };
        result.update(|r| r.begin());

        let src = source.get_value();
        let client = auth.client();
        spawn_local(async move {
            let outcome = src.fetch(&client, &plan).await;
            driver.try_with_value(|d| {
                state.try_update(|s| {
                    result.try_update(|r| apply_outcome(d, ticket, outcome, r, s));
                });
            });
        });
    });

    ListController {
        state,
        result,
        hydrated,
        narrow,
        driver,
        reset_source,
        refresh_tick,
    }
}

fn viewport_is_narrow() -> bool {
    web_sys::window()
        .and_then(|w| w.inner_width().ok())
        .and_then(|w| w.as_f64())
        .is_some_and(|w| w < NARROW_BREAKPOINT_PX)
}

/// Tracks whether the viewport is below the card/table breakpoint.
pub fn use_narrow_viewport() -> Signal<bool> {
    let narrow = RwSignal::new(viewport_is_narrow());
    let handle = window_event_listener(leptos::ev::resize, move |_| {
        let now = viewport_is_narrow();
        if narrow.get_untracked() != now {
            narrow.set(now);
        }
    });
    on_cleanup(move || handle.remove());
    narrow.into()
}
