use crate::shared::icons::icon;
use leptos::prelude::*;

/// Toggleable column visibility menu. `columns` pairs a column id with its
/// header label.
#[component]
pub fn ColumnPicker(
    columns: &'static [(&'static str, &'static str)],
    #[prop(into)] selected: Signal<Vec<String>>,
    on_toggle: Callback<&'static str>,
) -> impl IntoView {
    let open = RwSignal::new(false);

    view! {
        <div class="column-picker">
            <button class="column-picker__trigger" on:click=move |_| open.update(|o| *o = !*o) title="Columns">
                {icon("columns")}
                " Columns"
            </button>
            <Show when=move || open.get()>
                <div class="column-picker__menu">
                    {columns
                        .iter()
                        .map(|&(id, label)| {
                            view! {
                                <label class="column-picker__item">
                                    <input
                                        type="checkbox"
                                        prop:checked=move || selected.with(|s| s.iter().any(|c| c == id))
                                        on:change=move |_| on_toggle.run(id)
                                    />
                                    {label}
                                </label>
                            }
                        })
                        .collect_view()}
                </div>
            </Show>
        </div>
    }
}
