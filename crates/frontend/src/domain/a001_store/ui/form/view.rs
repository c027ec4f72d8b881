use contracts::domain::a001_store::aggregate::{StoreUpsert, CLIENT_TYPES};
use leptos::prelude::*;
use thaw::*;

use super::view_model::StoreFormViewModel;
use crate::domain::a001_store::source::StoreRow;
use crate::shared::components::contact_input::ContactInput;
use crate::shared::components::filter_panel::same_label_options;
use crate::shared::components::form_field::{SelectField, TextField};
use crate::shared::modal_frame::ModalFrame;
use crate::system::auth::context::use_auth;

fn bind(
    vm: StoreFormViewModel,
    get: fn(&StoreUpsert) -> String,
    set: fn(&mut StoreUpsert, String),
) -> (Signal<String>, Callback<String>) {
    (
        Signal::derive(move || vm.form.with(get)),
        Callback::new(move |v| vm.form.update(|f| set(f, v))),
    )
}

/// Create or edit a store. `row` is `None` for a new store.
#[component]
pub fn StoreForm(row: Option<StoreRow>, on_saved: Callback<()>, on_close: Callback<()>) -> impl IntoView {
    let auth = use_auth();
    let vm = StoreFormViewModel::new(row.as_ref());
    let title = if vm.is_edit_mode() { "Edit customer" } else { "New customer" };

    let (name, set_name) = bind(vm, |f| f.store_name.clone(), |f, v| f.store_name = v);
    let (first, set_first) = bind(vm, |f| f.client_first_name.clone(), |f, v| f.client_first_name = v);
    let (last, set_last) = bind(vm, |f| f.client_last_name.clone(), |f, v| f.client_last_name = v);
    let (email, set_email) = bind(vm, |f| f.email.clone(), |f, v| f.email = v);
    let (line1, set_line1) = bind(vm, |f| f.address_line1.clone(), |f, v| f.address_line1 = v);
    let (line2, set_line2) = bind(vm, |f| f.address_line2.clone(), |f, v| f.address_line2 = v);
    let (city, set_city) = bind(vm, |f| f.city.clone(), |f, v| f.city = v);
    let (district, set_district) = bind(vm, |f| f.district.clone(), |f, v| f.district = v);
    let (state, set_state) = bind(vm, |f| f.state.clone(), |f, v| f.state = v);
    let (pincode, set_pincode) = bind(vm, |f| f.pincode.clone(), |f, v| f.pincode = v);
    let (client_type, set_client_type) = bind(vm, |f| f.client_type.clone(), |f, v| f.client_type = v);
    let (industry, set_industry) = bind(vm, |f| f.industry.clone(), |f, v| f.industry = v);

    let submit_enabled = vm.submit_enabled();

    view! {
        <ModalFrame title=title.to_string() on_close=on_close modal_class="store-form-modal">
            {move || vm.error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

            <div class="form form--grid">
                <TextField label="Store name" value=name on_input=set_name required=true />
                <TextField label="Owner first name" value=first on_input=set_first />
                <TextField label="Owner last name" value=last on_input=set_last />
                <ContactInput label="Primary contact" value=vm.primary_contact required=true />
                <ContactInput label="Secondary contact" value=vm.secondary_contact />
                <TextField label="Email" value=email on_input=set_email input_type="email" />
                <TextField label="Address line 1" value=line1 on_input=set_line1 />
                <TextField label="Address line 2" value=line2 on_input=set_line2 />
                <TextField label="City" value=city on_input=set_city />
                <TextField label="District" value=district on_input=set_district />
                <TextField label="State" value=state on_input=set_state />
                <TextField label="Pincode" value=pincode on_input=set_pincode />
                <SelectField
                    label="Client type"
                    options=same_label_options(CLIENT_TYPES)
                    value=client_type
                    on_change=set_client_type
                    empty_label="Select..."
                />
                <TextField label="Industry" value=industry on_input=set_industry />
                <TextField
                    label="Monthly sale"
                    value=vm.monthly_sale
                    on_input=Callback::new(move |v| vm.monthly_sale.set(v))
                    input_type="number"
                />
                <TextField
                    label="Intent (0-10)"
                    value=vm.intent
                    on_input=Callback::new(move |v| vm.intent.set(v))
                    input_type="number"
                />
            </div>

            <div class="form__actions">
                <Button appearance=ButtonAppearance::Secondary on_click=move |_| on_close.run(())>
                    "Cancel"
                </Button>
                <Button
                    appearance=ButtonAppearance::Primary
                    disabled=Signal::derive(move || !submit_enabled.get())
                    on_click=move |_| vm.save(auth.client(), on_saved)
                >
                    {move || if vm.saving.get() { "Saving..." } else { "Save" }}
                </Button>
            </div>
        </ModalFrame>
    }
}
