//! HTTP clients for the external collaborators.
//!
//! This crate provides the production implementations of the traits in
//! `catalog::service`:
//! - `YouTubeCatalog`: the YouTube Data API v3 (search, videos, channels, playlistItems)
//! - `GeminiSuggester`: the Generative Language API, used for keyword expansion
//!
//! Transport failures, non-success statuses and malformed bodies all surface
//! as `catalog::ServiceError`. Nothing here retries.

use std::time::Duration;

use catalog::ServiceError;
use thiserror::Error;
use tracing::{debug, error};

pub mod gemini;
pub mod youtube;

pub use gemini::GeminiSuggester;
pub use youtube::YouTubeCatalog;

/// Errors that can occur while constructing a client
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Missing API key for {0}")]
    MissingApiKey(&'static str),

    #[error("Invalid base URL for {service}: {url}")]
    InvalidBaseUrl { service: &'static str, url: String },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Build the shared HTTP client with a per-request timeout.
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client, ClientError> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("outlier-scout/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// Trim a base URL and reject anything that is not http(s).
pub(crate) fn normalize_base_url(service: &'static str, url: &str) -> Result<String, ClientError> {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Ok(trimmed.to_string())
    } else {
        Err(ClientError::InvalidBaseUrl {
            service,
            url: url.to_string(),
        })
    }
}

/// Reject blank API keys before any request is made.
pub(crate) fn require_key(service: &'static str, key: &str) -> Result<String, ClientError> {
    let key = key.trim();
    if key.is_empty() {
        Err(ClientError::MissingApiKey(service))
    } else {
        Ok(key.to_string())
    }
}

/// Send a request and return the body of a successful response.
///
/// Transport errors become `Unavailable`, non-2xx statuses become `Rejected`.
/// Error text never includes the request URL, which carries the API key.
pub(crate) async fn fetch_body(
    service: &'static str,
    request: reqwest::RequestBuilder,
) -> catalog::Result<String> {
    let response = request.send().await.map_err(|e| {
        let e = e.without_url();
        error!("{} request failed: {}", service, e);
        ServiceError::Unavailable {
            service,
            reason: e.to_string(),
        }
    })?;

    let status = response.status();
    let body = response.text().await.map_err(|e| ServiceError::Unavailable {
        service,
        reason: format!("failed to read response body: {}", e.without_url()),
    })?;

    if !status.is_success() {
        error!("{} returned {}: {}", service, status, body);
        return Err(ServiceError::Rejected {
            service,
            status: status.as_u16(),
            body,
        });
    }

    debug!("{} returned {} bytes", service, body.len());
    Ok(body)
}
