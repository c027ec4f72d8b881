use contracts::domain::a001_store::aggregate::StoreUpsert;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::domain::a001_store::api::{create_store, update_store};
use crate::domain::a001_store::source::StoreRow;
use crate::shared::api_utils::ApiClient;
use crate::shared::validation::contact_is_valid;

/// Store name present and both contact numbers acceptable.
pub fn can_submit(dto: &StoreUpsert) -> bool {
    !dto.store_name.trim().is_empty()
        && contact_is_valid(&dto.primary_contact, true)
        && contact_is_valid(dto.secondary_contact.as_deref().unwrap_or(""), false)
}

/// Parse an optional numeric field; blank means "not set".
pub fn parse_optional<T: std::str::FromStr>(raw: &str) -> Result<Option<T>, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse()
        .map(Some)
        .map_err(|_| format!("'{}' is not a number", raw))
}

#[derive(Clone, Copy)]
pub struct StoreFormViewModel {
    pub form: RwSignal<StoreUpsert>,
    pub primary_contact: RwSignal<String>,
    pub secondary_contact: RwSignal<String>,
    pub monthly_sale: RwSignal<String>,
    pub intent: RwSignal<String>,
    pub error: RwSignal<Option<String>>,
    pub saving: RwSignal<bool>,
    editing_id: Option<i64>,
}

impl StoreFormViewModel {
    pub fn new(row: Option<&StoreRow>) -> Self {
        let dto = row.map(StoreRow::to_upsert).unwrap_or_default();
        Self {
            primary_contact: RwSignal::new(dto.primary_contact.clone()),
            secondary_contact: RwSignal::new(dto.secondary_contact.clone().unwrap_or_default()),
            monthly_sale: RwSignal::new(dto.monthly_sale.map(|v| v.to_string()).unwrap_or_default()),
            intent: RwSignal::new(dto.intent.map(|v| v.to_string()).unwrap_or_default()),
            form: RwSignal::new(dto),
            error: RwSignal::new(None),
            saving: RwSignal::new(false),
            editing_id: row.map(|r| r.id),
        }
    }

    pub fn is_edit_mode(&self) -> bool {
        self.editing_id.is_some()
    }

    fn collect(&self) -> Result<StoreUpsert, String> {
        let mut dto = self.form.get_untracked();
        dto.primary_contact = self.primary_contact.get_untracked();
        dto.secondary_contact = Some(self.secondary_contact.get_untracked()).filter(|s| !s.is_empty());
        dto.monthly_sale = parse_optional(&self.monthly_sale.get_untracked())?;
        dto.intent = parse_optional(&self.intent.get_untracked())?;
        Ok(dto)
    }

    pub fn submit_enabled(&self) -> Signal<bool> {
        let vm = *self;
        Signal::derive(move || {
            let mut dto = vm.form.get();
            dto.primary_contact = vm.primary_contact.get();
            dto.secondary_contact = Some(vm.secondary_contact.get()).filter(|s| !s.is_empty());
            !vm.saving.get() && can_submit(&dto)
        })
    }

    pub fn save(&self, client: ApiClient, on_saved: Callback<()>) {
        let dto = match self.collect() {
            Ok(dto) if can_submit(&dto) => dto,
            Ok(_) => {
                self.error.set(Some("Fill in the store name and a valid contact number".into()));
                return;
            }
            Err(e) => {
                self.error.set(Some(e));
                return;
            }
        };

        let vm = *self;
        vm.saving.set(true);
        vm.error.set(None);
        spawn_local(async move {
            let result = match vm.editing_id {
                Some(id) => update_store(&client, id, &dto).await,
                None => create_store(&client, &dto).await,
            };
            vm.saving.try_set(false);
            match result {
                Ok(()) => {
                    log::info!("Store '{}' saved", dto.store_name);
                    on_saved.run(());
                }
                Err(e) => {
                    log::error!("Failed to save store: {}", e);
                    vm.error.try_set(Some(format!("Failed to save store: {}", e)));
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_requires_name_and_full_contact() {
        let mut dto = StoreUpsert {
            store_name: "Acme".into(),
            primary_contact: "98765".into(),
            ..Default::default()
        };
        assert!(!can_submit(&dto));

        dto.primary_contact = "9876543210".into();
        assert!(can_submit(&dto));

        dto.secondary_contact = Some("12".into());
        assert!(!can_submit(&dto));

        dto.secondary_contact = None;
        dto.store_name = "  ".into();
        assert!(!can_submit(&dto));
    }

    #[test]
    fn test_parse_optional_numbers() {
        assert_eq!(parse_optional::<f64>(" "), Ok(None));
        assert_eq!(parse_optional::<f64>("1250.5"), Ok(Some(1250.5)));
        assert_eq!(parse_optional::<i32>("7"), Ok(Some(7)));
        assert!(parse_optional::<i32>("seven").is_err());
    }
}
