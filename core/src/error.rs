//! Error types for the to-do backend client.
//!
//! # Design
//! `NotFound` and `Unauthorized` get dedicated variants because they call for
//! different reactions: the first means the task is gone, the second means
//! the session must be re-established. Every other non-2xx response lands in
//! `HttpError` with the raw status code and body for debugging. GraphQL
//! errors are mapped onto the same variants by their `extensions.code`.

use thiserror::Error;

/// Errors returned by the wire clients, transports and backends.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The requested task does not exist (HTTP 404 or a null GraphQL result).
    #[error("resource not found")]
    NotFound,

    /// The bearer token is missing, expired, or the credentials are wrong.
    #[error("not authorized")]
    Unauthorized,

    /// The backend rejected the payload (HTTP 400/422 or `BAD_USER_INPUT`).
    #[error("validation failed: {0}")]
    Validation(String),

    /// The server returned a non-2xx status without a dedicated variant.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The GraphQL envelope carried errors without a recognized code.
    #[error("GraphQL error: {0}")]
    Graphql(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The round-trip never produced a response.
    #[error("transport failed: {0}")]
    Transport(String),
}

/// Coarse classification of an [`ApiError`] by the reaction it calls for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Network failure or a 5xx; repeating the request may succeed.
    Transient,
    /// The user must log in again.
    Authorization,
    /// The request itself is wrong; repeating it cannot succeed.
    Validation,
    Other,
}

impl ApiError {
    pub fn class(&self) -> ErrorClass {
        match self {
            ApiError::Transport(_) => ErrorClass::Transient,
            ApiError::HttpError { status, .. } if *status >= 500 => ErrorClass::Transient,
            ApiError::Unauthorized => ErrorClass::Authorization,
            ApiError::HttpError { status: 403, .. } => ErrorClass::Authorization,
            ApiError::Validation(_) | ApiError::SerializationError(_) => ErrorClass::Validation,
            ApiError::NotFound
            | ApiError::HttpError { .. }
            | ApiError::Graphql(_)
            | ApiError::DeserializationError(_) => ErrorClass::Other,
        }
    }
}

/// Errors raised while loading [`crate::config::ClientConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}
