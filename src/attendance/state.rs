use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::model::attendance::{DailyAttendanceRecord, PunchEvent, PunchType};
use crate::utils::time::elapsed_since;

use super::ledger;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PunchState {
    NoPunch,
    /// Open segment since the last "in".
    PunchedIn { since: DateTime<Utc> },
    /// Closed for now; punching in again is allowed.
    PunchedOut { at: DateTime<Utc> },
}

impl PunchState {
    pub fn from_ledger(punches: &[PunchEvent]) -> Self {
        match punches.last() {
            None => PunchState::NoPunch,
            Some(PunchEvent { kind: PunchType::In, time }) => PunchState::PunchedIn { since: *time },
            Some(PunchEvent { kind: PunchType::Out, time }) => PunchState::PunchedOut { at: *time },
        }
    }

    pub fn can_punch_in(&self) -> bool {
        !self.can_punch_out()
    }

    pub fn can_punch_out(&self) -> bool {
        matches!(self, PunchState::PunchedIn { .. })
    }

    pub fn open_since(&self) -> Option<DateTime<Utc>> {
        match self {
            PunchState::PunchedIn { since } => Some(*since),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PunchState::NoPunch => "Not punched in",
            PunchState::PunchedIn { .. } => "Punched in",
            PunchState::PunchedOut { .. } => "Punched out",
        }
    }
}

pub fn can_punch_in(punches: &[PunchEvent]) -> bool {
    PunchState::from_ledger(punches).can_punch_in()
}

pub fn can_punch_out(punches: &[PunchEvent]) -> bool {
    PunchState::from_ledger(punches).can_punch_out()
}

/// Sum of closed in/out pairs plus the open segment up to `now`.
/// Stray events that break the in/out alternation are skipped.
pub fn total_worked(punches: &[PunchEvent], now: DateTime<Utc>) -> Duration {
    let mut total = Duration::zero();
    let mut open: Option<DateTime<Utc>> = None;

    for punch in punches {
        match (punch.kind, open) {
            (PunchType::In, None) => open = Some(punch.time),
            (PunchType::Out, Some(since)) => {
                total += elapsed_since(since, punch.time);
                open = None;
            }
            _ => {}
        }
    }

    if let Some(since) = open {
        total += elapsed_since(since, now);
    }
    total
}

/// Everything a display needs about today, derived in one place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceSnapshot {
    pub punches: Vec<PunchEvent>,
    pub state: PunchState,
    pub can_punch_in: bool,
    pub can_punch_out: bool,
    pub status: String,
}

impl AttendanceSnapshot {
    pub fn derive(record: Option<&DailyAttendanceRecord>) -> Self {
        let punches = ledger::punches(record);
        let state = PunchState::from_ledger(&punches);

        let status = match record {
            None => "Not Recorded".to_string(),
            Some(r) => match r.status {
                Some(status) => status.to_string(),
                None => state.label().to_string(),
            },
        };

        Self {
            can_punch_in: state.can_punch_in(),
            can_punch_out: state.can_punch_out(),
            punches,
            state,
            status,
        }
    }

    /// Time since the open "in"; zero when nothing is open.
    pub fn elapsed(&self, now: DateTime<Utc>) -> Duration {
        self.state
            .open_since()
            .map(|since| elapsed_since(since, now))
            .unwrap_or_else(Duration::zero)
    }

    pub fn worked_today(&self, now: DateTime<Utc>) -> Duration {
        total_worked(&self.punches, now)
    }
}
