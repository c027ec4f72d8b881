use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Note {
    pub id: i64,
    pub content: String,
    pub created_date: String,
    pub employee_name: String,
    pub store_id: i64,
}

/// Payload for `POST /notes/create`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateNote {
    pub content: String,
    pub store_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<i64>,
}
