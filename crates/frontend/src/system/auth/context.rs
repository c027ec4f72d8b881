use leptos::prelude::*;
use leptos::task::spawn_local;

use super::api::HttpDirectory;
use super::role::{resolve_role, RoleContext, RoleState};
use super::storage::{self, StoredSession};
use crate::config::config;
use crate::shared::api_utils::ApiClient;

/// Session and resolved role, read once at startup and shared through
/// context. Pages never read the token from storage themselves.
#[derive(Clone, Copy)]
pub struct AuthContext {
    session: RwSignal<StoredSession>,
    role: RwSignal<RoleState>,
}

impl AuthContext {
    pub fn is_authenticated(&self) -> bool {
        self.session.with(|s| s.is_authenticated())
    }

    pub fn role_state(&self) -> Signal<RoleState> {
        self.role.into()
    }

    pub fn role_context(&self) -> Option<RoleContext> {
        self.role.with(|r| r.context().cloned())
    }

    /// REST client carrying the current bearer token.
    pub fn client(&self) -> ApiClient {
        ApiClient::with_token(self.session.with_untracked(|s| s.token.clone()))
    }

    pub fn logout(&self) {
        log::info!("Signing out");
        storage::clear_session();
        self.session.set(StoredSession::default());
        self.role.set(RoleState::Pending);
    }
}

/// Auth context provider component
#[component]
pub fn AuthProvider(children: ChildrenFn) -> impl IntoView {
    let session = RwSignal::new(storage::load_session());
    let role = RwSignal::new(RoleState::Pending);

    // Re-resolve the role whenever the token changes
    Effect::new(move |_| {
        let current = session.get();
        role.set(RoleState::Pending);
        let Some(token) = current.token.clone() else {
            return;
        };
        spawn_local(async move {
            let directory = HttpDirectory::new(ApiClient::with_token(Some(token.clone())));
            let context = resolve_role(&directory, &current, config().auth.fallback_team_id).await;
            if session.with_untracked(|s| s.token.as_deref() == Some(token.as_str())) {
                role.set(RoleState::Resolved(context));
            }
        });
    });

    // Logout or login in another tab
    let handle = window_event_listener(leptos::ev::storage, move |ev: web_sys::StorageEvent| {
        let relevant = ev.key().map(|k| storage::is_session_key(&k)).unwrap_or(true);
        if !relevant {
            return;
        }
        let next = storage::load_session();
        if session.with_untracked(|s| *s != next) {
            log::info!("Session changed in another tab");
            session.set(next);
        }
    });
    on_cleanup(move || handle.remove());

    provide_context(AuthContext { session, role });

    children()
}

/// Hook to access the auth context
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthProvider not found in component tree")
}
