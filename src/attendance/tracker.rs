use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Datelike, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::api::{self, ApiClient};
use crate::error::{PortalError, Result};
use crate::model::attendance::{DailyAttendanceRecord, ManualPunchRequest, PunchEvent, PunchType};
use crate::utils::time::Clock;

use super::state::AttendanceSnapshot;
use super::ticker::ElapsedTicker;

/// Today's attendance, as one screen sees it.
///
/// The record held here is always the last one the server returned. Every
/// change goes through [`AttendanceTracker::apply`], which re-derives the
/// snapshot and restarts or stops the ticker. Dropping the tracker stops the
/// ticker with it.
pub struct AttendanceTracker {
    client: ApiClient,
    clock: Arc<dyn Clock>,
    today: Option<DailyAttendanceRecord>,
    snapshot: AttendanceSnapshot,
    ticker: ElapsedTicker,
}

impl AttendanceTracker {
    pub fn new(client: ApiClient, clock: Arc<dyn Clock>, tick: StdDuration) -> Self {
        Self {
            ticker: ElapsedTicker::new(tick, Arc::clone(&clock)),
            client,
            clock,
            today: None,
            snapshot: AttendanceSnapshot::derive(None),
        }
    }

    /// Fetches this month's records and picks out today's.
    pub async fn load(&mut self) -> Result<&AttendanceSnapshot> {
        let today = self.clock.today();
        let records = api::attendance::my_attendance(&self.client, today.month(), today.year()).await?;
        let record = records.into_iter().find(|r| r.date == today);
        self.apply(record);
        Ok(&self.snapshot)
    }

    pub async fn punch_in(&mut self) -> Result<&AttendanceSnapshot> {
        if !self.snapshot.can_punch_in {
            return Err(PortalError::validation("Already punched in"));
        }
        let record = api::attendance::punch_in(&self.client).await?;
        info!(date = %record.date, "punched in");
        self.apply(Some(record));
        Ok(&self.snapshot)
    }

    pub async fn punch_out(&mut self) -> Result<&AttendanceSnapshot> {
        if !self.snapshot.can_punch_out {
            return Err(PortalError::validation("Cannot punch out without punch in"));
        }
        let record = api::attendance::punch_out(&self.client).await?;
        info!(date = %record.date, "punched out");
        self.apply(Some(record));
        Ok(&self.snapshot)
    }

    /// Submits a correction for a past day. The corrected record is returned
    /// to the caller; today's snapshot and ticker are left as they are.
    pub async fn manual_punch(&self, request: &ManualPunchRequest) -> Result<DailyAttendanceRecord> {
        validate_manual(request, self.clock.today())?;
        let record = api::attendance::manual_punch(&self.client, request).await?;
        info!(date = %record.date, punches = request.punches.len(), "manual punch recorded");
        Ok(record)
    }

    /// Replaces today's record with server truth.
    pub fn apply(&mut self, record: Option<DailyAttendanceRecord>) {
        if let Some(r) = &record {
            if r.date != self.clock.today() {
                warn!(date = %r.date, "server returned a record for another day");
            }
        }

        self.snapshot = AttendanceSnapshot::derive(record.as_ref());
        self.today = record;

        match self.snapshot.state.open_since() {
            Some(since) => self.ticker.start(since),
            None => self.ticker.stop(),
        }
    }

    pub fn snapshot(&self) -> &AttendanceSnapshot {
        &self.snapshot
    }

    pub fn today(&self) -> Option<&DailyAttendanceRecord> {
        self.today.as_ref()
    }

    /// Latest value published by the ticker; zero while idle.
    pub fn elapsed(&self) -> Duration {
        self.ticker.elapsed()
    }

    pub fn worked_today(&self) -> Duration {
        self.snapshot.worked_today(self.clock.now())
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.is_running()
    }

    pub fn watch_elapsed(&self) -> watch::Receiver<Duration> {
        self.ticker.subscribe()
    }
}

/// Client-side mirror of the backend's manual punch rules.
pub fn validate_manual(request: &ManualPunchRequest, today: NaiveDate) -> Result<()> {
    if request.date >= today {
        return Err(PortalError::validation("Manual punch only allowed for previous days"));
    }
    if request.reason.trim().is_empty() {
        return Err(PortalError::validation("A reason is required for manual punches"));
    }
    if request.punches.is_empty() {
        return Err(PortalError::validation("At least one punch is required"));
    }

    let mut expected = PunchType::In;
    for pair in request.punches.windows(2) {
        if pair[1].time < pair[0].time {
            return Err(PortalError::validation("Punch times must be in chronological order"));
        }
    }
    for punch in &request.punches {
        if punch.kind != expected {
            return Err(PortalError::validation(
                "Punches must alternate in and out, starting with in",
            ));
        }
        expected = match expected {
            PunchType::In => PunchType::Out,
            PunchType::Out => PunchType::In,
        };
    }
    Ok(())
}

/// Builds a manual punch from a date and local wall-clock times, the way the
/// correction form collects them.
pub fn manual_from_times(
    date: NaiveDate,
    punch_in: NaiveTime,
    punch_out: Option<NaiveTime>,
    reason: impl Into<String>,
) -> Result<ManualPunchRequest> {
    let to_utc = |time: NaiveTime| {
        Local
            .from_local_datetime(&date.and_time(time))
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or_else(|| PortalError::validation(format!("{time} does not exist on {date}")))
    };

    let mut punches = vec![PunchEvent::punch_in(to_utc(punch_in)?)];
    if let Some(out) = punch_out {
        punches.push(PunchEvent::punch_out(to_utc(out)?));
    }

    Ok(ManualPunchRequest {
        date,
        punches,
        reason: reason.into(),
    })
}
