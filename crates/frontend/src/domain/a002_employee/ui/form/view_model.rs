use contracts::domain::a002_employee::aggregate::EmployeeUpsert;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::domain::a002_employee::api::{create_employee, update_employee};
use crate::domain::a002_employee::source::EmployeeRow;
use crate::shared::api_utils::ApiClient;
use crate::shared::validation::contact_is_valid;

/// First name, role and a full primary contact are required. A new employee
/// also needs login credentials.
pub fn can_submit(dto: &EmployeeUpsert, creating: bool) -> bool {
    let has_login = dto.user_name.as_deref().is_some_and(|u| !u.trim().is_empty())
        && dto.password.as_deref().is_some_and(|p| !p.is_empty());
    !dto.first_name.trim().is_empty()
        && !dto.role.trim().is_empty()
        && contact_is_valid(&dto.primary_contact, true)
        && contact_is_valid(dto.secondary_contact.as_deref().unwrap_or(""), false)
        && (!creating || has_login)
}

#[derive(Clone, Copy)]
pub struct EmployeeFormViewModel {
    pub form: RwSignal<EmployeeUpsert>,
    pub primary_contact: RwSignal<String>,
    pub secondary_contact: RwSignal<String>,
    pub error: RwSignal<Option<String>>,
    pub saving: RwSignal<bool>,
    editing_id: Option<i64>,
}

impl EmployeeFormViewModel {
    pub fn new(row: Option<&EmployeeRow>) -> Self {
        let dto = row.map(EmployeeRow::to_upsert).unwrap_or_default();
        Self {
            primary_contact: RwSignal::new(dto.primary_contact.clone()),
            secondary_contact: RwSignal::new(dto.secondary_contact.clone().unwrap_or_default()),
            form: RwSignal::new(dto),
            error: RwSignal::new(None),
            saving: RwSignal::new(false),
            editing_id: row.map(|r| r.id),
        }
    }

    pub fn is_edit_mode(&self) -> bool {
        self.editing_id.is_some()
    }

    fn current(&self, tracked: bool) -> EmployeeUpsert {
        let (mut dto, primary, secondary) = if tracked {
            (self.form.get(), self.primary_contact.get(), self.secondary_contact.get())
        } else {
            (
                self.form.get_untracked(),
                self.primary_contact.get_untracked(),
                self.secondary_contact.get_untracked(),
            )
        };
        dto.primary_contact = primary;
        dto.secondary_contact = Some(secondary).filter(|s| !s.is_empty());
        dto
    }

    pub fn submit_enabled(&self) -> Signal<bool> {
        let vm = *self;
        Signal::derive(move || !vm.saving.get() && can_submit(&vm.current(true), !vm.is_edit_mode()))
    }

    pub fn save(&self, client: ApiClient, on_saved: Callback<()>) {
        let mut dto = self.current(false);
        if !can_submit(&dto, !self.is_edit_mode()) {
            self.error.set(Some("Fill in the required fields".into()));
            return;
        }
        if self.is_edit_mode() {
            dto.password = None;
        }

        let vm = *self;
        vm.saving.set(true);
        vm.error.set(None);
        spawn_local(async move {
            let result = match vm.editing_id {
                Some(id) => update_employee(&client, id, &dto).await,
                None => create_employee(&client, &dto).await,
            };
            vm.saving.try_set(false);
            match result {
                Ok(()) => {
                    log::info!("Employee '{} {}' saved", dto.first_name, dto.last_name);
                    on_saved.run(());
                }
                Err(e) => {
                    log::error!("Failed to save employee: {}", e);
                    vm.error.try_set(Some(format!("Failed to save employee: {}", e)));
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> EmployeeUpsert {
        EmployeeUpsert {
            first_name: "Ravi".into(),
            role: "Field Officer".into(),
            primary_contact: "9876543210".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_edit_does_not_need_credentials() {
        assert!(can_submit(&filled(), false));
        assert!(!can_submit(&filled(), true));
    }

    #[test]
    fn test_create_needs_username_and_password() {
        let mut dto = filled();
        dto.user_name = Some("ravi".into());
        assert!(!can_submit(&dto, true));
        dto.password = Some("secret".into());
        assert!(can_submit(&dto, true));
    }

    #[test]
    fn test_partial_contact_blocks_submit() {
        let mut dto = filled();
        dto.primary_contact = "98765".into();
        assert!(!can_submit(&dto, false));
    }
}
