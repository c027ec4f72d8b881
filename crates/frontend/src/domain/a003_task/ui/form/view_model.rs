use contracts::domain::a003_task::aggregate::TaskUpsert;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::domain::a003_task::api::{create_task, update_task};
use crate::domain::a003_task::source::TaskRow;
use crate::shared::api_utils::ApiClient;
use crate::shared::date_utils::today;

/// Missing pieces that keep the form from being submitted.
pub fn missing_fields(dto: &TaskUpsert) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if dto.task_title.trim().is_empty() {
        missing.push("title");
    }
    if dto.due_date.is_empty() {
        missing.push("due date");
    }
    if dto.store_id <= 0 {
        missing.push("store");
    }
    if dto.assigned_to_id <= 0 {
        missing.push("assignee");
    }
    missing
}

#[derive(Clone, Copy)]
pub struct TaskFormViewModel {
    pub form: RwSignal<TaskUpsert>,
    pub error: RwSignal<Option<String>>,
    pub saving: RwSignal<bool>,
    editing_id: Option<i64>,
}

impl TaskFormViewModel {
    /// `assigned_by` is the signed-in employee, recorded on new tasks.
    pub fn new(row: Option<&TaskRow>, assigned_by: Option<i64>) -> Self {
        let dto = match row {
            Some(row) => row.to_upsert(),
            None => TaskUpsert {
                assignment_date: today().format("%Y-%m-%d").to_string(),
                priority: "medium".to_string(),
                assigned_by_id: assigned_by,
                ..Default::default()
            },
        };
        Self {
            form: RwSignal::new(dto),
            error: RwSignal::new(None),
            saving: RwSignal::new(false),
            editing_id: row.map(|r| r.id),
        }
    }

    pub fn is_edit_mode(&self) -> bool {
        self.editing_id.is_some()
    }

    pub fn submit_enabled(&self) -> Signal<bool> {
        let vm = *self;
        Signal::derive(move || !vm.saving.get() && vm.form.with(|f| missing_fields(f).is_empty()))
    }

    pub fn save(&self, client: ApiClient, on_saved: Callback<()>) {
        let dto = self.form.get_untracked();
        let missing = missing_fields(&dto);
        if !missing.is_empty() {
            self.error.set(Some(format!("Missing: {}", missing.join(", "))));
            return;
        }

        let vm = *self;
        vm.saving.set(true);
        vm.error.set(None);
        spawn_local(async move {
            let result = match vm.editing_id {
                Some(id) => update_task(&client, id, &dto).await,
                None => create_task(&client, &dto).await,
            };
            vm.saving.try_set(false);
            match result {
                Ok(()) => {
                    log::info!("Task '{}' saved", dto.task_title);
                    on_saved.run(());
                }
                Err(e) => {
                    log::error!("Failed to save task: {}", e);
                    vm.error.try_set(Some(format!("Failed to save task: {}", e)));
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_listed_in_order() {
        let dto = TaskUpsert::default();
        assert_eq!(missing_fields(&dto), vec!["title", "due date", "store", "assignee"]);

        let dto = TaskUpsert {
            task_title: "Restock".into(),
            due_date: "2026-10-20".into(),
            store_id: 4,
            assigned_to_id: 9,
            ..Default::default()
        };
        assert!(missing_fields(&dto).is_empty());
    }
}
