use tracing::instrument;

use super::client::ApiClient;
use crate::error::Result;
use crate::model::attendance::{DailyAttendanceRecord, ManualPunchRequest, MonthQuery};

/// `GET /attendance/my-attendance?month&year`
#[instrument(name = "attendance_my_records", skip(client))]
pub async fn my_attendance(client: &ApiClient, month: u32, year: i32) -> Result<Vec<DailyAttendanceRecord>> {
    client
        .get_with("/attendance/my-attendance", &MonthQuery { month, year })
        .await
}

/// `POST /attendance/punch-in`, returns today's record with the new punch.
#[instrument(name = "attendance_punch_in", skip(client))]
pub async fn punch_in(client: &ApiClient) -> Result<DailyAttendanceRecord> {
    client.post_empty("/attendance/punch-in").await
}

/// `POST /attendance/punch-out`, returns today's record with the new punch.
#[instrument(name = "attendance_punch_out", skip(client))]
pub async fn punch_out(client: &ApiClient) -> Result<DailyAttendanceRecord> {
    client.post_empty("/attendance/punch-out").await
}

/// `POST /attendance/manual`. Callers are expected to have run the
/// past-day/reason checks already; the backend repeats them.
#[instrument(name = "attendance_manual", skip(client, request), fields(date = %request.date))]
pub async fn manual_punch(client: &ApiClient, request: &ManualPunchRequest) -> Result<DailyAttendanceRecord> {
    client.post("/attendance/manual", request).await
}
