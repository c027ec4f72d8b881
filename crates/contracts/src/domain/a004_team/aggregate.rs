use serde::{Deserialize, Serialize};

/// Team membership record (`GET /employee/team/getbyEmployee`).
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    #[serde(alias = "teamId")]
    pub id: i64,
    #[serde(default)]
    pub team_name: Option<String>,
}
