use leptos::prelude::*;

#[component]
pub fn ErrorBanner(#[prop(into)] error: Signal<Option<String>>) -> impl IntoView {
    move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })
}

/// Placeholder rows while a page is loading
#[component]
pub fn SkeletonRows(#[prop(default = 5)] rows: usize, columns: usize) -> impl IntoView {
    (0..rows)
        .map(|_| {
            view! {
                <tr class="skeleton-row">
                    {(0..columns.max(1))
                        .map(|_| view! { <td><div class="skeleton-bar"></div></td> })
                        .collect_view()}
                </tr>
            }
        })
        .collect_view()
}

#[component]
pub fn SkeletonCards(#[prop(default = 3)] cards: usize) -> impl IntoView {
    (0..cards)
        .map(|_| view! { <div class="card card--skeleton"><div class="skeleton-bar"></div></div> })
        .collect_view()
}

#[component]
pub fn EmptyState(#[prop(into)] message: String) -> impl IntoView {
    view! { <div class="empty-state">{message}</div> }
}
