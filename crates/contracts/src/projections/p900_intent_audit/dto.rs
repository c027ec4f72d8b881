use serde::{Deserialize, Serialize};

/// One change of a store's intent level.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct IntentAudit {
    pub id: i64,
    pub store_id: i64,
    pub old_intent_level: Option<i32>,
    pub new_intent_level: Option<i32>,
    pub changed_by: String,
    pub changed_at: String,
}
