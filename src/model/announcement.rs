use serde::{Deserialize, Serialize};

use super::PersonRef;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default = "all_audience")]
    pub target_audience: String,
    #[serde(default)]
    pub is_important: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<PersonRef>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementDraft {
    pub title: String,
    pub content: String,
    pub target_audience: String,
    pub is_important: bool,
}

fn all_audience() -> String {
    "all".to_string()
}
