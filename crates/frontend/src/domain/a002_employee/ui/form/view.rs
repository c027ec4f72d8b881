use contracts::domain::a002_employee::aggregate::{EmployeeUpsert, EMPLOYEE_ROLES};
use leptos::prelude::*;
use thaw::*;

use super::view_model::EmployeeFormViewModel;
use crate::domain::a002_employee::source::EmployeeRow;
use crate::shared::components::contact_input::ContactInput;
use crate::shared::components::filter_panel::same_label_options;
use crate::shared::components::form_field::{SelectField, TextField};
use crate::shared::modal_frame::ModalFrame;
use crate::system::auth::context::use_auth;

fn bind(
    vm: EmployeeFormViewModel,
    get: fn(&EmployeeUpsert) -> String,
    set: fn(&mut EmployeeUpsert, String),
) -> (Signal<String>, Callback<String>) {
    (
        Signal::derive(move || vm.form.with(get)),
        Callback::new(move |v| vm.form.update(|f| set(f, v))),
    )
}

#[component]
pub fn EmployeeForm(row: Option<EmployeeRow>, on_saved: Callback<()>, on_close: Callback<()>) -> impl IntoView {
    let auth = use_auth();
    let vm = EmployeeFormViewModel::new(row.as_ref());
    let title = if vm.is_edit_mode() { "Edit employee" } else { "New employee" };

    let (first, set_first) = bind(vm, |f| f.first_name.clone(), |f, v| f.first_name = v);
    let (last, set_last) = bind(vm, |f| f.last_name.clone(), |f, v| f.last_name = v);
    let (email, set_email) = bind(vm, |f| f.email.clone(), |f, v| f.email = v);
    let (role, set_role) = bind(vm, |f| f.role.clone(), |f, v| f.role = v);
    let (department, set_department) =
        bind(vm, |f| f.department_name.clone(), |f, v| f.department_name = v);
    let (line1, set_line1) = bind(vm, |f| f.address_line1.clone(), |f, v| f.address_line1 = v);
    let (city, set_city) = bind(vm, |f| f.city.clone(), |f, v| f.city = v);
    let (state, set_state) = bind(vm, |f| f.state.clone(), |f, v| f.state = v);
    let (country, set_country) = bind(vm, |f| f.country.clone(), |f, v| f.country = v);
    let (joined, set_joined) = bind(vm, |f| f.date_of_joining.clone(), |f, v| f.date_of_joining = v);
    let (user_name, set_user_name) = bind(
        vm,
        |f| f.user_name.clone().unwrap_or_default(),
        |f, v| f.user_name = Some(v).filter(|s| !s.is_empty()),
    );
    let (password, set_password) = bind(
        vm,
        |f| f.password.clone().unwrap_or_default(),
        |f, v| f.password = Some(v).filter(|s| !s.is_empty()),
    );

    let submit_enabled = vm.submit_enabled();

    view! {
        <ModalFrame title=title.to_string() on_close=on_close modal_class="employee-form-modal">
            {move || vm.error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

            <div class="form form--grid">
                <TextField label="First name" value=first on_input=set_first required=true />
                <TextField label="Last name" value=last on_input=set_last />
                <TextField label="Email" value=email on_input=set_email input_type="email" />
                <ContactInput label="Primary contact" value=vm.primary_contact required=true />
                <ContactInput label="Secondary contact" value=vm.secondary_contact />
                <SelectField
                    label="Role"
                    options=same_label_options(EMPLOYEE_ROLES)
                    value=role
                    on_change=set_role
                    empty_label="Select..."
                />
                <TextField label="Department" value=department on_input=set_department />
                <TextField label="Address" value=line1 on_input=set_line1 />
                <TextField label="City" value=city on_input=set_city />
                <TextField label="State" value=state on_input=set_state />
                <TextField label="Country" value=country on_input=set_country />
                <TextField label="Date of joining" value=joined on_input=set_joined input_type="date" />
                <TextField label="Username" value=user_name on_input=set_user_name required=!vm.is_edit_mode() />
                <Show when=move || !vm.is_edit_mode()>
                    <TextField label="Password" value=password on_input=set_password input_type="password" required=true />
                </Show>
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
