//! Error types for collaborator calls.
//!
//! Every failure of the catalog or the suggestion service is expressed as a
//! `ServiceError`. Missing fields inside an otherwise valid payload are not
//! errors; the parser drops those items instead.

use thiserror::Error;

/// Collaborator name used for video catalog failures
pub const CATALOG_SERVICE: &str = "catalog";

/// Collaborator name used for text suggestion failures
pub const SUGGESTION_SERVICE: &str = "suggestion service";

/// Errors that can occur when talking to an external collaborator
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Network, DNS, TLS or timeout failure; no response was received
    #[error("{service} is unavailable: {reason}")]
    Unavailable { service: &'static str, reason: String },

    /// The service answered with a non-success status (auth, quota, bad request)
    #[error("{service} rejected the request with status {status}: {body}")]
    Rejected {
        service: &'static str,
        status: u16,
        body: String,
    },

    /// The response body was not the expected document shape
    #[error("Invalid response from {service}: {reason}")]
    InvalidResponse { service: &'static str, reason: String },
}

impl ServiceError {
    /// Name of the collaborator that failed.
    pub fn service(&self) -> &'static str {
        match self {
            ServiceError::Unavailable { service, .. }
            | ServiceError::Rejected { service, .. }
            | ServiceError::InvalidResponse { service, .. } => service,
        }
    }
}

/// Convenience type alias for Results of collaborator calls
pub type Result<T> = std::result::Result<T, ServiceError>;
