use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::flexible_date;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PunchType {
    In,
    Out,
}

/// A single punch. Never edited once the backend has stored it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PunchEvent {
    #[serde(rename = "type")]
    pub kind: PunchType,
    pub time: DateTime<Utc>,
}

impl PunchEvent {
    pub fn punch_in(time: DateTime<Utc>) -> Self {
        Self { kind: PunchType::In, time }
    }

    pub fn punch_out(time: DateTime<Utc>) -> Self {
        Self { kind: PunchType::Out, time }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Partial,
    #[serde(other)]
    Unknown,
}

/// One employee, one calendar day.
///
/// `punches` is the current wire shape. `punch_in`/`punch_out` are the older
/// flat shape some records still carry; read them through
/// [`crate::attendance::ledger::punches`] rather than directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyAttendanceRecord {
    #[serde(rename = "_id", alias = "id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(with = "flexible_date")]
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub punches: Option<Vec<PunchEvent>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub punch_in: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub punch_out: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AttendanceStatus>,
}

impl DailyAttendanceRecord {
    pub fn new(date: NaiveDate, punches: Vec<PunchEvent>) -> Self {
        Self {
            id: None,
            date,
            punches: Some(punches),
            punch_in: None,
            punch_out: None,
            status: None,
        }
    }

    pub fn with_status(mut self, status: AttendanceStatus) -> Self {
        self.status = Some(status);
        self
    }
}

/// Body of `POST /attendance/manual`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManualPunchRequest {
    #[serde(with = "flexible_date")]
    pub date: NaiveDate,
    pub punches: Vec<PunchEvent>,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct MonthQuery {
    pub month: u32,
    pub year: i32,
}
