use serde::{Deserialize, Serialize};

/// One change of a store's declared monthly sale.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct MonthlySaleChange {
    pub id: i64,
    pub store_id: i64,
    pub old_monthly_sale: Option<f64>,
    pub new_monthly_sale: Option<f64>,
    pub changed_by: String,
    pub changed_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_are_coalesced() {
        let row: MonthlySaleChange =
            serde_json::from_str(r#"{"storeId": 3, "newMonthlySale": 1200.5}"#).unwrap();
        assert_eq!(row.store_id, 3);
        assert_eq!(row.old_monthly_sale, None);
        assert_eq!(row.new_monthly_sale, Some(1200.5));
        assert_eq!(row.changed_by, "");
    }
}
