//! PageFrame: standard root wrapper for every routed page.
//!
//! The root element carries `id="{entity}--{category}"` (for example
//! `a001_store--list`) and `data-page-category`, so a DOM id found in the
//! inspector leads straight to the `domain/{entity}` directory.

use leptos::prelude::*;

/// Record list with filters and pagination.
pub const PAGE_CAT_LIST: &str = "list";

/// Single record detail or form.
pub const PAGE_CAT_DETAIL: &str = "detail";

/// Validate that a page id matches the `{entity}--{category}` format.
pub fn is_valid_page_id(id: &str) -> bool {
    matches!(id.split_once("--"), Some((entity, category)) if !entity.is_empty() && !category.is_empty())
}

#[component]
pub fn PageFrame(
    page_id: &'static str,
    category: &'static str,
    #[prop(into)] title: String,
    /// Header actions (buttons) shown to the right of the title.
    #[prop(optional, into)]
    actions: Option<ViewFn>,
    children: Children,
) -> impl IntoView {
    debug_assert!(is_valid_page_id(page_id), "bad page id {page_id}");
    let class = if category == PAGE_CAT_DETAIL {
        "page page--detail"
    } else {
        "page"
    };

    view! {
        <div id=page_id class=class data-page-category=category>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">{title}</h1>
                </div>
                <div class="page__header-right">{actions.map(|a| a.run())}</div>
            </div>
            <div class="page__content">{children()}</div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_id_format() {
        assert!(is_valid_page_id("a001_store--list"));
        assert!(!is_valid_page_id("a001_store"));
        assert!(!is_valid_page_id("--list"));
    }
}
