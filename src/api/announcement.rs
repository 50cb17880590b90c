use tracing::instrument;

use super::client::ApiClient;
use crate::error::{PortalError, Result};
use crate::model::announcement::{Announcement, AnnouncementDraft};

#[instrument(name = "announcement_list", skip(client))]
pub async fn list(client: &ApiClient) -> Result<Vec<Announcement>> {
    client.get("/announcements").await
}

fn check(draft: &AnnouncementDraft) -> Result<()> {
    if draft.title.trim().is_empty() || draft.content.trim().is_empty() {
        return Err(PortalError::validation("Title and content are required"));
    }
    Ok(())
}

#[instrument(name = "announcement_create", skip(client, draft))]
pub async fn create(client: &ApiClient, draft: &AnnouncementDraft) -> Result<Announcement> {
    check(draft)?;
    client.post("/announcements", draft).await
}

#[instrument(name = "announcement_update", skip(client, draft))]
pub async fn update(client: &ApiClient, id: &str, draft: &AnnouncementDraft) -> Result<Announcement> {
    check(draft)?;
    client.put(&format!("/announcements/{id}"), draft).await
}

#[instrument(name = "announcement_delete", skip(client))]
pub async fn delete(client: &ApiClient, id: &str) -> Result<()> {
    client.delete(&format!("/announcements/{id}")).await
}
