use tracing::instrument;

use super::client::ApiClient;
use crate::error::{PortalError, Result};
use crate::model::leave_request::StatusUpdate;
use crate::model::wfh::{CreateWfh, WfhRequest};

#[instrument(name = "wfh_mine", skip(client))]
pub async fn my_requests(client: &ApiClient) -> Result<Vec<WfhRequest>> {
    client.get("/wfh/my-requests").await
}

#[instrument(name = "wfh_list", skip(client))]
pub async fn list(client: &ApiClient) -> Result<Vec<WfhRequest>> {
    client.get("/wfh").await
}

#[instrument(name = "wfh_create", skip(client, request))]
pub async fn create(client: &ApiClient, request: &CreateWfh) -> Result<WfhRequest> {
    if request.reason.trim().is_empty() {
        return Err(PortalError::validation("A reason is required"));
    }
    client.post("/wfh", request).await
}

#[instrument(name = "wfh_set_status", skip(client, update), fields(status = %update.status))]
pub async fn set_status(client: &ApiClient, id: &str, update: &StatusUpdate) -> Result<WfhRequest> {
    client.put(&format!("/wfh/{id}/status"), update).await
}
