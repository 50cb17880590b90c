use std::sync::Arc;

use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::auth::session::Session;
use crate::config::Config;
use crate::error::{PortalError, Result};

/// JSON client for the portal backend.
///
/// Attaches the session's bearer token to every request. A 401 to a request
/// that carried the token clears the session right here, so individual calls
/// never deal with expiry.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: Arc<Session>,
}

impl ApiClient {
    pub fn new(config: &Config, session: Arc<Session>) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(PortalError::Network)?;

        Ok(Self {
            http,
            base_url: config.api_base_url.clone(),
            session,
        })
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .http
            .request(method, self.url(path))
            .header(ACCEPT, "application/json");

        match self.session.bearer_token() {
            Some(token) => builder.header(AUTHORIZATION, format!("Bearer {token}")),
            None => builder,
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(path, self.request(Method::GET, path)).await
    }

    pub async fn get_with<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.send(path, self.request(Method::GET, path).query(query)).await
    }

    /// POST with no body.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(path, self.request(Method::POST, path)).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(path, self.request(Method::POST, path).json(body)).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(path, self.request(Method::PUT, path).json(body)).await
    }

    pub async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(path, self.request(Method::PATCH, path).json(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        let _: Value = self.send(path, self.request(Method::DELETE, path)).await?;
        Ok(())
    }

    async fn send<T: DeserializeOwned>(&self, path: &str, builder: RequestBuilder) -> Result<T> {
        let request = builder.build()?;
        let sent_token = request.headers().contains_key(AUTHORIZATION);

        let response = self.http.execute(request).await.map_err(|e| {
            warn!(error = %e, path, "request did not complete");
            PortalError::from(e)
        })?;

        let status = response.status();
        debug!(path, status = status.as_u16(), "response received");

        // without a token a 401 is a plain rejection (bad credentials), not expiry
        if status == StatusCode::UNAUTHORIZED && sent_token {
            if let Err(e) = self.session.clear() {
                error!(error = %e, "failed to clear session after 401");
            }
            return Err(PortalError::Unauthorized);
        }

        let bytes = response.bytes().await?;

        if !status.is_success() {
            return Err(PortalError::Api {
                status: status.as_u16(),
                message: error_message(status, &bytes),
            });
        }

        // 204 and empty bodies decode as JSON null
        let body: &[u8] = if bytes.is_empty() { b"null" } else { &bytes[..] };
        serde_json::from_slice(body).map_err(|e| {
            error!(error = %e, path, "unexpected response body");
            PortalError::from(e)
        })
    }
}

/// Pulls the human message out of an error body: `message`, then `error`,
/// then the bare status reason.
fn error_message(status: StatusCode, body: &[u8]) -> String {
    serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|v| {
            ["message", "error"]
                .iter()
                .find_map(|key| v.get(*key).and_then(Value::as_str).map(str::to_string))
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        })
}
