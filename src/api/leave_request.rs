use tracing::instrument;

use super::client::ApiClient;
use crate::error::{PortalError, Result};
use crate::model::leave_request::{CreateLeave, Leave, StatusUpdate};

#[instrument(name = "leave_mine", skip(client))]
pub async fn my_leaves(client: &ApiClient) -> Result<Vec<Leave>> {
    client.get("/leaves/my-leaves").await
}

/// Every employee's leaves. Admin only on the backend.
#[instrument(name = "leave_list", skip(client))]
pub async fn list(client: &ApiClient) -> Result<Vec<Leave>> {
    client.get("/leaves").await
}

#[instrument(name = "leave_create", skip(client, leave))]
pub async fn create(client: &ApiClient, leave: &CreateLeave) -> Result<Leave> {
    if leave.start_date > leave.end_date {
        return Err(PortalError::validation("Start date cannot be after end date"));
    }
    if leave.reason.trim().is_empty() {
        return Err(PortalError::validation("A reason is required"));
    }
    client.post("/leaves", leave).await
}

#[instrument(name = "leave_set_status", skip(client, update), fields(status = %update.status))]
pub async fn set_status(client: &ApiClient, id: &str, update: &StatusUpdate) -> Result<Leave> {
    client.put(&format!("/leaves/{id}/status"), update).await
}
