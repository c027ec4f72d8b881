use serde::{Deserialize, Serialize};

/// Competitor brand observations recorded for a store.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct BrandProsCons {
    pub id: i64,
    pub brand_name: String,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
}

/// Payload for `POST /brand/create`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateBrandProsCons {
    pub store_id: i64,
    pub brand_name: String,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
}
