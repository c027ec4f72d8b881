use serde::{Deserialize, Serialize};

/// Client category of a store.
pub const CLIENT_TYPES: &[&str] = &["Retailer", "Wholesaler", "Distributor", "Dealer", "Other"];

/// Payload for `POST /store/create` and `PUT /store/edit`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoreUpsert {
    pub store_name: String,
    pub client_first_name: String,
    pub client_last_name: String,
    pub primary_contact: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_contact: Option<String>,
    pub email: String,
    pub address_line1: String,
    pub address_line2: String,
    pub city: String,
    pub state: String,
    pub district: String,
    pub pincode: String,
    pub client_type: String,
    pub industry: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_sale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<i32>,
}

/// Response of `POST /store/create`; only the id is used.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct StoreCreated {
    #[serde(default, alias = "id")]
    pub store_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_serializes_camel_case_and_skips_empty_optionals() {
        let dto = StoreUpsert {
            store_name: "Acme".into(),
            primary_contact: "9876543210".into(),
            ..Default::default()
        };
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["storeName"], "Acme");
        assert_eq!(json["primaryContact"], "9876543210");
        assert!(json.get("secondaryContact").is_none());
        assert!(json.get("monthlySale").is_none());
    }
}
