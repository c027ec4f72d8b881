use leptos::prelude::*;
use wasm_bindgen::JsValue;

use crate::domain::a001_store::ui::list::StoreList;
use crate::domain::a002_employee::ui::list::EmployeeList;
use crate::domain::a003_task::ui::list::TaskList;
use crate::shared::icons::icon;
use crate::system::auth::context::use_auth;
use crate::system::auth::guard::RequireAuth;

/// Top-level pages, one per path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppPage {
    Customers,
    Employees,
    Requirements,
}

impl AppPage {
    pub const ALL: [AppPage; 3] = [AppPage::Customers, AppPage::Employees, AppPage::Requirements];

    pub fn path(&self) -> &'static str {
        match self {
            AppPage::Customers => "/customers",
            AppPage::Employees => "/employees",
            AppPage::Requirements => "/requirements",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            AppPage::Customers => "Customers",
            AppPage::Employees => "Employees",
            AppPage::Requirements => "Requirements",
        }
    }

    fn icon_key(&self) -> &'static str {
        match self {
            AppPage::Customers => "customers",
            AppPage::Employees => "employees",
            AppPage::Requirements => "requirements",
        }
    }

    /// Unknown paths, including `/`, land on the customer list.
    pub fn from_path(path: &str) -> Self {
        let trimmed = path.trim_end_matches('/');
        Self::ALL
            .into_iter()
            .find(|p| p.path() == trimmed)
            .unwrap_or(AppPage::Customers)
    }
}

fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_default()
}

fn push_path(path: &str) {
    if current_path() == path {
        return;
    }
    if let Some(history) = web_sys::window().and_then(|w| w.history().ok()) {
        let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
    }
}

fn replace_path(path: &str) {
    if let Some(history) = web_sys::window().and_then(|w| w.history().ok()) {
        let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
    }
}

#[component]
fn Navbar(page: RwSignal<AppPage>) -> impl IntoView {
    let auth = use_auth();
    view! {
        <nav class="main-nav-bar">
            <ul>
                {AppPage::ALL
                    .into_iter()
                    .map(|target| {
                        view! {
                            <li
                                class=move || if page.get() == target { "main-nav-bar__item main-nav-bar__item--active" } else { "main-nav-bar__item" }
                                on:click=move |_| {
                                    push_path(target.path());
                                    page.set(target);
                                }
                            >
                                {icon(target.icon_key())}
                                <span>{target.title()}</span>
                            </li>
                        }
                    })
                    .collect_view()}
            </ul>
            <button class="button button--ghost main-nav-bar__logout" on:click=move |_| auth.logout()>
                "Sign out"
            </button>
        </nav>
    }
}

#[component]
pub fn AppRoutes() -> impl IntoView {
    let initial = AppPage::from_path(&current_path());
    if current_path() != initial.path() {
        replace_path(initial.path());
    }
    let page = RwSignal::new(initial);

    // Back/forward buttons
    let handle = window_event_listener(leptos::ev::popstate, move |_| {
        let next = AppPage::from_path(&current_path());
        if page.get_untracked() != next {
            page.set(next);
        }
    });
    on_cleanup(move || handle.remove());

    view! {
        <div class="app-layout">
            <Navbar page=page />
            <main class="app-main">
                <RequireAuth>
                    {move || match page.get() {
                        AppPage::Customers => view! { <StoreList /> }.into_any(),
                        AppPage::Employees => view! { <EmployeeList /> }.into_any(),
                        AppPage::Requirements => view! { <TaskList /> }.into_any(),
                    }}
                </RequireAuth>
            </main>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_paths_map_to_pages() {
        assert_eq!(AppPage::from_path("/employees"), AppPage::Employees);
        assert_eq!(AppPage::from_path("/requirements/"), AppPage::Requirements);
    }

    #[test]
    fn root_and_unknown_paths_fall_back_to_customers() {
        assert_eq!(AppPage::from_path("/"), AppPage::Customers);
        assert_eq!(AppPage::from_path(""), AppPage::Customers);
        assert_eq!(AppPage::from_path("/reports"), AppPage::Customers);
    }
}
