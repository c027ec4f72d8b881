use leptos::prelude::*;

use crate::shared::validation::{contact_error, sanitize_contact};

/// Ten-digit phone input. Non-digits are dropped as they are typed.
#[component]
pub fn ContactInput(
    #[prop(into)] label: String,
    value: RwSignal<String>,
    #[prop(optional)] required: bool,
) -> impl IntoView {
    let error = move || contact_error(&value.get());

    view! {
        <div class="form__group">
            <label class="form__label">
                {label}
                {required.then_some(" *")}
            </label>
            <input
                type="tel"
                inputmode="numeric"
                class=move || {
                    if error().is_some() { "form__input form__input--invalid" } else { "form__input" }
                }
                maxlength="10"
                prop:value=move || value.get()
                on:input=move |ev| {
                    let clean = sanitize_contact(&event_target_value(&ev));
                    value.set(clean);
                }
            />
            {move || error().map(|e| view! { <span class="form__error">{e}</span> })}
        </div>
    }
}
