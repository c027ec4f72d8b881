use serde::{Deserialize, Serialize};

/// Field visit to a store.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Visit {
    pub id: i64,
    pub visit_date: String,
    pub purpose: String,
    pub outcome: Option<String>,
    pub employee_name: String,
    pub check_in_time: Option<String>,
    pub check_out_time: Option<String>,
}
