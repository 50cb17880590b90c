use tracing::instrument;

use super::client::ApiClient;
use crate::error::Result;
use crate::model::role::Role;
use crate::model::user::{CountResponse, UserProfile};

#[instrument(name = "users_me", skip(client))]
pub async fn me(client: &ApiClient) -> Result<UserProfile> {
    client.get("/users/me").await
}

#[instrument(name = "users_update_profile", skip(client, profile))]
pub async fn update_profile(client: &ApiClient, profile: &UserProfile) -> Result<UserProfile> {
    client.put("/users/profile", profile).await
}

#[instrument(name = "users_count", skip(client))]
pub async fn count(client: &ApiClient, role: Role) -> Result<u64> {
    let response: CountResponse = client.get_with("/users/count", &[("role", role.to_string())]).await?;
    Ok(response.count)
}
