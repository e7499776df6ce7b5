//! Error types for the CloudHealth client.
//!
//! # Design
//! `NotFound` and `Conflict` get dedicated variants because callers routinely
//! branch on "the account does not exist" and "the name is already taken".
//! All other non-2xx responses land in `HttpError` with the raw status code
//! and body for debugging.

use thiserror::Error;

/// Errors returned by `CloudHealthClient`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404: the requested AWS account does not exist.
    #[error("aws account not found")]
    NotFound,

    /// The server returned 422, usually a duplicate account name.
    #[error("aws account rejected by server: {body}")]
    Conflict { body: String },

    /// The server returned a status the operation does not expect.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The request never produced a response (DNS, connect, TLS, I/O).
    #[error("transport failed: {0}")]
    Transport(#[from] ureq::Error),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    #[error("invalid base url `{url}`: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// Creating an account requires a non-empty name.
    #[error("aws account name is required")]
    MissingName,

    /// Updating an account requires the server-assigned id.
    #[error("aws account has no id assigned")]
    UnassignedId,

    #[error("configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// Returns true if this is a "not found" error (404)
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound)
    }

    /// Returns true if the server refused the payload (422)
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, ApiError::Conflict { .. })
    }

    /// HTTP status behind this error, when there was a response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NotFound => Some(404),
            ApiError::Conflict { .. } => Some(422),
            ApiError::HttpError { status, .. } => Some(*status),
            _ => None,
        }
    }
}
