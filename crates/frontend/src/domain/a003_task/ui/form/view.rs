use contracts::domain::a003_task::aggregate::{TaskStatus, TaskType, TaskUpsert, TASK_PRIORITIES};
use leptos::prelude::*;
use thaw::*;

use super::view_model::TaskFormViewModel;
use crate::domain::a003_task::source::TaskRow;
use crate::shared::components::filter_panel::same_label_options;
use crate::shared::components::form_field::{SelectField, TextField};
use crate::shared::modal_frame::ModalFrame;
use crate::system::auth::context::use_auth;

fn bind(
    vm: TaskFormViewModel,
    get: fn(&TaskUpsert) -> String,
    set: fn(&mut TaskUpsert, String),
) -> (Signal<String>, Callback<String>) {
    (
        Signal::derive(move || vm.form.with(get)),
        Callback::new(move |v| vm.form.update(|f| set(f, v))),
    )
}

fn id_text(id: i64) -> String {
    if id > 0 {
        id.to_string()
    } else {
        String::new()
    }
}

/// Create or edit a requirement or complaint. `assignees` pairs employee ids
/// with display names.
#[component]
pub fn TaskForm(
    row: Option<TaskRow>,
    #[prop(into)] assignees: Signal<Vec<(String, String)>>,
    on_saved: Callback<()>,
    on_close: Callback<()>,
) -> impl IntoView {
    let auth = use_auth();
    let assigned_by = auth.role_context().and_then(|c| c.employee_id);
    let vm = TaskFormViewModel::new(row.as_ref(), assigned_by);
    let title = if vm.is_edit_mode() { "Edit task" } else { "New task" };

    let (task_title, set_title) = bind(vm, |f| f.task_title.clone(), |f, v| f.task_title = v);
    let (description, set_description) =
        bind(vm, |f| f.task_description.clone(), |f, v| f.task_description = v);
    let (due, set_due) = bind(vm, |f| f.due_date.clone(), |f, v| f.due_date = v);
    let (assigned_on, set_assigned_on) =
        bind(vm, |f| f.assignment_date.clone(), |f, v| f.assignment_date = v);
    let (priority, set_priority) = bind(vm, |f| f.priority.clone(), |f, v| f.priority = v);
    let (task_type, set_task_type) = bind(
        vm,
        |f| f.task_type.as_str().to_string(),
        |f, v| f.task_type = TaskType::parse(&v).unwrap_or_default(),
    );
    let (status, set_status) = bind(
        vm,
        |f| f.status.as_str().to_string(),
        |f, v| f.status = TaskStatus::parse(&v).unwrap_or_default(),
    );
    let (store, set_store) = bind(
        vm,
        |f| id_text(f.store_id),
        |f, v| f.store_id = v.trim().parse().unwrap_or(0),
    );
    let (assignee, set_assignee) = bind(
        vm,
        |f| id_text(f.assigned_to_id),
        |f, v| f.assigned_to_id = v.parse().unwrap_or(0),
    );

    let type_options = vec![
        (TaskType::Requirement.as_str().to_string(), "Requirement".to_string()),
        (TaskType::Complaint.as_str().to_string(), "Complaint".to_string()),
    ];
    let status_options = TaskStatus::ALL
        .iter()
        .map(|s| (s.as_str().to_string(), s.as_str().to_string()))
        .collect::<Vec<_>>();
    let submit_enabled = vm.submit_enabled();

    view! {
        <ModalFrame title=title.to_string() on_close=on_close modal_class="task-form-modal">
            {move || vm.error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

            <div class="form form--grid">
                <TextField label="Title" value=task_title on_input=set_title required=true />
                <div class="form__group form__group--wide">
                    <label class="form__label">"Description"</label>
                    <textarea
                        class="form__textarea"
                        rows="3"
                        prop:value=move || description.get()
                        on:input=move |ev| set_description.run(event_target_value(&ev))
                    />
                </div>
                <SelectField label="Type" options=type_options value=task_type on_change=set_task_type />
                <SelectField label="Status" options=status_options value=status on_change=set_status />
                <SelectField
                    label="Priority"
                    options=same_label_options(TASK_PRIORITIES)
                    value=priority
                    on_change=set_priority
                />
                <TextField label="Store ID" value=store on_input=set_store input_type="number" required=true />
                <div class="form__group">
                    <label class="form__label">"Assigned to *"</label>
                    <select
                        class="form__select"
                        prop:value=move || assignee.get()
                        on:change=move |ev| set_assignee.run(event_target_value(&ev))
                    >
                        <option value="">"Select..."</option>
                        <For
                            each=move || assignees.get()
                            key=|(id, _)| id.clone()
                            children=move |(id, name)| {
                                let current = id.clone();
                                view! { <option value=id selected=move || assignee.get() == current>{name}</option> }
                            }
                        />
                    </select>
                </div>
                <TextField label="Assigned on" value=assigned_on on_input=set_assigned_on input_type="date" />
                <TextField label="Due date" value=due on_input=set_due input_type="date" required=true />
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
