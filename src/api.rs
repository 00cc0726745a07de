//! HTTP transport for the credential vault API.
//!
//! [`CredentialApi`] is the seam the dashboard talks through; [`HttpApi`] is
//! the reqwest implementation used by the binary.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use reqwest::{Method, Url};
use tracing::{debug, warn};

use crate::config::Settings;
use crate::error::DashboardError;
use crate::models::{ApiErrorBody, CredentialEntry, EntryFields, EntryId, ListResponse};

pub const LOAD_FAILED: &str = "Failed to load passwords";
pub const SAVE_FAILED: &str = "Failed to save password";
pub const DELETE_FAILED: &str = "Failed to delete password";

#[async_trait]
pub trait CredentialApi: Send + Sync {
    async fn list(&self) -> Result<Vec<CredentialEntry>, DashboardError>;
    async fn create(&self, fields: &EntryFields) -> Result<(), DashboardError>;
    async fn update(&self, id: &EntryId, fields: &EntryFields) -> Result<(), DashboardError>;
    async fn delete(&self, id: &EntryId) -> Result<(), DashboardError>;
    /// Ends the server session. Callers treat failure as non-fatal.
    async fn logout(&self, path: &str) -> Result<(), DashboardError>;
}

#[derive(Debug, Clone)]
pub struct HttpApi {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpApi {
    pub fn new(settings: &Settings) -> Result<Self, DashboardError> {
        let mut headers = HeaderMap::new();
        if let Some(cookie) = settings.session_cookie.as_deref() {
            let mut value = HeaderValue::from_str(cookie)
                .map_err(|e| DashboardError::server(format!("invalid session cookie: {e}")))?;
            value.set_sensitive(true);
            headers.insert(COOKIE, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(settings.timeout)
            .build()
            .map_err(|e| DashboardError::server(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: settings.base_url.clone(),
        })
    }

    /// Joins path segments onto the base URL, percent-encoding each one.
    fn url(&self, segments: &[&str]) -> Result<Url, DashboardError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| DashboardError::server("base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<&EntryFields>,
        fallback: &str,
    ) -> Result<reqwest::Response, DashboardError> {
        debug!(%method, path = url.path(), "sending request");
        let mut request = self.client.request(method.clone(), url);
        if let Some(fields) = body {
            request = request.json(fields);
        }
        let response = request.send().await.map_err(|e| {
            warn!(%method, error = %e, "request failed before a response arrived");
            DashboardError::server(fallback)
        })?;

        let status = response.status();
        debug!(%method, status = %status, "response received");
        if status.is_success() {
            Ok(response)
        } else {
            Err(error_from_response(response, fallback).await)
        }
    }
}

/// Uses the server's `error` field when the body carries one.
async fn error_from_response(response: reqwest::Response, fallback: &str) -> DashboardError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&body)
        .ok()
        .and_then(|b| b.error)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string());
    warn!(status = %status, %message, "server rejected request");
    DashboardError::server(message)
}

#[async_trait]
impl CredentialApi for HttpApi {
    async fn list(&self) -> Result<Vec<CredentialEntry>, DashboardError> {
        let url = self.url(&["api", "passwords"])?;
        let response = self.send(Method::GET, url, None, LOAD_FAILED).await?;
        let parsed: ListResponse = response.json().await.map_err(|e| {
            warn!(error = %e, "list response was not valid JSON");
            DashboardError::server(LOAD_FAILED)
        })?;
        Ok(parsed.passwords)
    }

    async fn create(&self, fields: &EntryFields) -> Result<(), DashboardError> {
        let url = self.url(&["api", "passwords"])?;
        self.send(Method::POST, url, Some(fields), SAVE_FAILED).await?;
        Ok(())
    }

    async fn update(&self, id: &EntryId, fields: &EntryFields) -> Result<(), DashboardError> {
        let url = self.url(&["api", "passwords", id.as_str()])?;
        self.send(Method::PUT, url, Some(fields), SAVE_FAILED).await?;
        Ok(())
    }

    async fn delete(&self, id: &EntryId) -> Result<(), DashboardError> {
        let url = self.url(&["api", "passwords", id.as_str()])?;
        self.send(Method::DELETE, url, None, DELETE_FAILED).await?;
        Ok(())
    }

    async fn logout(&self, path: &str) -> Result<(), DashboardError> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let url = self.url(&segments)?;
        self.send(Method::GET, url, None, "Logout failed").await?;
        Ok(())
    }
}
