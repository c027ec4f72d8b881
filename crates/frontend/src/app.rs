use crate::routes::routes::AppRoutes;
use crate::system::auth::context::AuthProvider;
use leptos::prelude::*;

#[component]
pub fn App() -> impl IntoView {
    // Session and role are provided to every page through context.
    view! {
        <AuthProvider>
            <AppRoutes />
        </AuthProvider>
    }
}
