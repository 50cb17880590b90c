use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::flexible_date;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holiday {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    #[serde(with = "flexible_date")]
    pub date: NaiveDate,
    #[serde(rename = "type", default = "government")]
    pub holiday_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub recurring: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct HolidayDraft {
    pub name: String,
    #[serde(with = "flexible_date")]
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub holiday_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub recurring: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct YearQuery {
    pub year: i32,
}

fn government() -> String {
    "government".to_string()
}
