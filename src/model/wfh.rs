use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{PersonRef, RequestStatus, flexible_date};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WfhRequest {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee: Option<PersonRef>,
    #[serde(with = "flexible_date")]
    pub date: NaiveDate,
    #[serde(default)]
    pub reason: String,
    pub status: RequestStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<PersonRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateWfh {
    #[serde(with = "flexible_date")]
    pub date: NaiveDate,
    pub reason: String,
}
