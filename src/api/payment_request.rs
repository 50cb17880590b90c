use tracing::instrument;

use super::client::ApiClient;
use crate::error::{PortalError, Result};
use crate::model::RequestStatus;
use crate::model::payment_request::{CreatePaymentRequest, PaymentRequest, PaymentStatusUpdate};

#[instrument(name = "payment_mine", skip(client))]
pub async fn my_requests(client: &ApiClient) -> Result<Vec<PaymentRequest>> {
    client.get("/payment-Request/my-requests").await
}

#[instrument(name = "payment_list", skip(client))]
pub async fn list(client: &ApiClient) -> Result<Vec<PaymentRequest>> {
    client.get("/payment-Request/all").await
}

#[instrument(name = "payment_create", skip(client, request))]
pub async fn create(client: &ApiClient, request: &CreatePaymentRequest) -> Result<PaymentRequest> {
    request.validate().map_err(PortalError::Validation)?;
    client.post("/payment-Request", request).await
}

#[instrument(name = "payment_set_status", skip(client))]
pub async fn set_status(client: &ApiClient, id: &str, status: RequestStatus) -> Result<PaymentRequest> {
    client
        .patch(&format!("/payment-Request/{id}/status"), &PaymentStatusUpdate { status })
        .await
}

#[instrument(name = "payment_delete", skip(client))]
pub async fn delete(client: &ApiClient, id: &str) -> Result<()> {
    client.delete(&format!("/payment-Request/{id}")).await
}
