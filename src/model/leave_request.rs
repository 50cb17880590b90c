use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::{PersonRef, RequestStatus, flexible_date};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LeaveType {
    Annual,
    Sick,
    Casual,
    Unpaid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leave {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee: Option<PersonRef>,
    #[serde(with = "flexible_date")]
    pub start_date: NaiveDate,
    #[serde(with = "flexible_date")]
    pub end_date: NaiveDate,
    #[serde(rename = "type")]
    pub leave_type: String,
    #[serde(default)]
    pub reason: String,
    pub status: RequestStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<PersonRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLeave {
    #[serde(with = "flexible_date")]
    pub start_date: NaiveDate,
    #[serde(with = "flexible_date")]
    pub end_date: NaiveDate,
    #[serde(rename = "type")]
    pub leave_type: LeaveType,
    pub reason: String,
}

/// Body of the `PUT .../{id}/status` calls shared by leaves and WFH.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub status: RequestStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

impl StatusUpdate {
    pub fn approve() -> Self {
        Self { status: RequestStatus::Approved, rejection_reason: None }
    }

    pub fn reject(reason: impl Into<String>) -> Self {
        Self {
            status: RequestStatus::Rejected,
            rejection_reason: Some(reason.into()),
        }
    }
}
