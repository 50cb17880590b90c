use crate::model::attendance::{DailyAttendanceRecord, PunchEvent};

/// Today's punches in server order.
///
/// A missing record is simply "nothing yet". Records still carrying the flat
/// `punchIn`/`punchOut` fields are folded into the same event list, in-then-out.
pub fn punches(record: Option<&DailyAttendanceRecord>) -> Vec<PunchEvent> {
    let Some(record) = record else {
        return Vec::new();
    };

    match &record.punches {
        Some(events) if !events.is_empty() => events.clone(),
        _ => {
            let mut events = Vec::with_capacity(2);
            if let Some(at) = record.punch_in {
                events.push(PunchEvent::punch_in(at));
            }
            if let Some(at) = record.punch_out {
                events.push(PunchEvent::punch_out(at));
            }
            events
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::attendance::PunchType;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn flat(
        punch_in: Option<chrono::DateTime<Utc>>,
        punch_out: Option<chrono::DateTime<Utc>>,
    ) -> DailyAttendanceRecord {
        DailyAttendanceRecord {
            id: Some("legacy".into()),
            date: day(),
            punches: None,
            punch_in,
            punch_out,
            status: None,
        }
    }

    #[test]
    fn no_record_means_no_punches() {
        assert!(punches(None).is_empty());
    }

    #[test]
    fn record_without_any_punch_fields_is_empty() {
        assert!(punches(Some(&flat(None, None))).is_empty());
    }

    #[test]
    fn legacy_open_punch_becomes_single_in() {
        let t1 = Utc.with_ymd_and_hms(2026, 10, 16, 3, 0, 0).unwrap();
        let events = punches(Some(&flat(Some(t1), None)));
        assert_eq!(events, vec![PunchEvent::punch_in(t1)]);
    }

    #[test]
    fn legacy_closed_pair_becomes_in_then_out() {
        let t1 = Utc.with_ymd_and_hms(2026, 10, 16, 3, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2026, 10, 16, 11, 0, 0).unwrap();
        let events = punches(Some(&flat(Some(t1), Some(t2))));
        assert_eq!(events, vec![PunchEvent::punch_in(t1), PunchEvent::punch_out(t2)]);
    }

    #[test]
    fn punch_array_wins_over_flat_fields() {
        let t1 = Utc.with_ymd_and_hms(2026, 10, 16, 3, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2026, 10, 16, 4, 0, 0).unwrap();
        let mut record = flat(Some(t1), None);
        record.punches = Some(vec![PunchEvent::punch_in(t1), PunchEvent::punch_out(t2)]);

        let events = punches(Some(&record));
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].kind, PunchType::Out);
    }

    #[test]
    fn order_is_kept_as_sent() {
        // out-of-order times are the backend's problem, not re-sorted here
        let late = Utc.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap();
        let early = Utc.with_ymd_and_hms(2026, 10, 16, 8, 0, 0).unwrap();
        let record =
            DailyAttendanceRecord::new(day(), vec![PunchEvent::punch_in(late), PunchEvent::punch_out(early)]);
        assert_eq!(punches(Some(&record))[0].time, late);
    }
}
