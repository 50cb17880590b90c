use tracing::{info, instrument, warn};

use super::client::ApiClient;
use crate::auth::session::CurrentUser;
use crate::error::{PortalError, Result};
use crate::model::user::{LoginRequest, LoginResponse};

#[instrument(name = "auth_login", skip(client, password))]
pub async fn login(client: &ApiClient, email: &str, password: &str) -> Result<CurrentUser> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(PortalError::validation("Email and password are required"));
    }

    let response: LoginResponse = client
        .post("/auth/login", &LoginRequest { email: email.trim(), password })
        .await?;

    let user = client.session().establish(response.token)?;
    info!(user_id = %user.id, "login successful");
    Ok(user)
}

/// Tells the backend, then drops the local session whatever it answered.
#[instrument(name = "auth_logout", skip(client))]
pub async fn logout(client: &ApiClient) -> Result<()> {
    if let Err(e) = client.post_empty::<serde_json::Value>("/auth/logout").await {
        warn!(error = %e, "logout request failed, clearing session anyway");
    }
    client.session().clear()
}
