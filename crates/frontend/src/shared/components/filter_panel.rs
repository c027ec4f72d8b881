use crate::shared::icons::icon;
use leptos::prelude::*;
use thaw::*;

/// Collapsible filter bar for wide viewports. Inputs inside it write straight
/// to the committed filters.
#[component]
pub fn FilterPanel(
    #[prop(into)] is_expanded: RwSignal<bool>,
    #[prop(into)] active_filters_count: Signal<usize>,
    on_clear_all: Callback<()>,
    /// Active filter chips shown under the inputs.
    #[prop(optional, into)]
    filter_tags: Option<ViewFn>,
    children: ChildrenFn,
) -> impl IntoView {
    view! {
        <div class="filter-panel">
            <div class="filter-panel-header">
                <div
                    class="filter-panel-header__left"
                    on:click=move |_| is_expanded.update(|e| *e = !*e)
                >
                    <span class=move || {
                        if is_expanded.get() {
                            "filter-panel__chevron filter-panel__chevron--expanded"
                        } else {
                            "filter-panel__chevron"
                        }
                    }>{icon("chevron-down")}</span>
                    {icon("filter")}
                    <span class="filter-panel__title">"Filters"</span>
                    <Show when=move || { active_filters_count.get() > 0 }>
                        <span class="badge badge--primary">{move || active_filters_count.get()}</span>
                    </Show>
                </div>
                <div class="filter-panel-header__right">
                    <Button
                        appearance=ButtonAppearance::Subtle
                        on_click=move |_| on_clear_all.run(())
                        disabled=Signal::derive(move || active_filters_count.get() == 0)
                    >
                        "Clear all"
                    </Button>
                </div>
            </div>

            <Show when=move || is_expanded.get()>
                <div class="filter-panel-content">
                    {children()}
                    {filter_tags.as_ref().map(|tags| view! { <div class="filter-tags">{tags.run()}</div> })}
                </div>
            </Show>
        </div>
    }
}

/// Bottom sheet for narrow viewports. Inputs edit the draft; nothing is
/// fetched until Apply.
#[component]
pub fn FilterSheet(
    #[prop(into)] open: Signal<bool>,
    on_apply: Callback<()>,
    on_clear_all: Callback<()>,
    on_close: Callback<()>,
    children: ChildrenFn,
) -> impl IntoView {
    view! {
        <Show when=move || open.get()>
            <div class="filter-sheet-overlay" on:click=move |_| on_close.run(())>
                <div class="filter-sheet" on:click=|ev| ev.stop_propagation()>
                    <div class="filter-sheet__header">
                        <span class="filter-panel__title">"Filters"</span>
                        <Button appearance=ButtonAppearance::Subtle on_click=move |_| on_close.run(())>
                            {icon("x")}
                        </Button>
                    </div>
                    <div class="filter-sheet__body">{children()}</div>
                    <div class="filter-sheet__actions">
                        <Button appearance=ButtonAppearance::Secondary on_click=move |_| on_clear_all.run(())>
                            "Clear all"
                        </Button>
                        <Button appearance=ButtonAppearance::Primary on_click=move |_| on_apply.run(())>
                            "Apply"
                        </Button>
                    </div>
                </div>
            </div>
        </Show>
    }
}

/// Active filter chip
#[component]
pub fn FilterTag(#[prop(into)] label: String, on_remove: Callback<()>) -> impl IntoView {
    view! {
        <div class="filter-tag">
            <span>{label}</span>
            <span
                class="filter-tag__remove"
                on:click=move |e| {
                    e.stop_propagation();
                    on_remove.run(());
                }
            >
                {icon("x")}
            </span>
        </div>
    }
}

/// Labelled select used inside filter panels. An empty value means "any".
#[component]
pub fn FilterSelect(
    #[prop(into)] label: String,
    #[prop(into)] options: Signal<Vec<(String, String)>>,
    #[prop(into)] value: Signal<String>,
    on_change: Callback<String>,
) -> impl IntoView {
    view! {
        <label class="filter-field">
            <span class="filter-field__label">{label}</span>
            <select
                class="filter-field__select"
                prop:value=move || value.get()
                on:change=move |ev| on_change.run(event_target_value(&ev))
            >
                <option value="">"Any"</option>
                <For
                    each=move || options.get()
                    key=|(v, _)| v.clone()
                    children=move |(v, text)| {
                        let selected_value = v.clone();
                        view! {
                            <option value=v selected=move || value.get() == selected_value>{text}</option>
                        }
                    }
                />
            </select>
        </label>
    }
}

/// Static option list where value and label are the same
pub fn same_label_options(values: &[&str]) -> Vec<(String, String)> {
    values.iter().map(|v| (v.to_string(), v.to_string())).collect()
}
