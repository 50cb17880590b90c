use tracing::instrument;

use super::client::ApiClient;
use crate::error::Result;
use crate::model::holiday::{Holiday, HolidayDraft, YearQuery};

#[instrument(name = "holiday_list", skip(client))]
pub async fn list(client: &ApiClient, year: i32) -> Result<Vec<Holiday>> {
    client.get_with("/holidays", &YearQuery { year }).await
}

#[instrument(name = "holiday_create", skip(client, draft), fields(date = %draft.date))]
pub async fn create(client: &ApiClient, draft: &HolidayDraft) -> Result<Holiday> {
    client.post("/holidays", draft).await
}

#[instrument(name = "holiday_delete", skip(client))]
pub async fn delete(client: &ApiClient, id: &str) -> Result<()> {
    client.delete(&format!("/holidays/{id}")).await
}

/// Seeds the government holidays for `year` on the backend.
#[instrument(name = "holiday_initialize", skip(client))]
pub async fn initialize(client: &ApiClient, year: i32) -> Result<()> {
    let _: serde_json::Value = client.post("/holidays/initialize", &YearQuery { year }).await?;
    Ok(())
}
