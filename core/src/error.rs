//! Error types for the API client.
//!
//! # Design
//! `Status` is the only variant the error dispatcher interprets: it means the
//! exchange completed and the server answered with a non-2xx status, and it
//! carries that response. Every other variant (transport, serialization,
//! configuration) passes through status-based handling untouched.

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::http::decode_body;

/// Errors returned by `ApiClient` calls.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The client cannot resolve its base URL or default request options,
    /// either directly or through a parent.
    #[error("client configuration error: {0}")]
    Configuration(String),

    /// The call completed with a non-2xx status.
    #[error(transparent)]
    Status(#[from] StatusError),

    /// The call did not complete (connection refused, timeout, ...).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The request options or body could not be serialized.
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The response body could not be decoded into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(#[source] serde_json::Error),
}

impl ClientError {
    /// Status code of a non-2xx response, `None` for every other error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status(err) => Some(err.status),
            _ => None,
        }
    }

    pub fn as_status(&self) -> Option<&StatusError> {
        match self {
            ClientError::Status(err) => Some(err),
            _ => None,
        }
    }

    pub(crate) fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        ClientError::Transport(Box::new(err))
    }
}

/// A completed exchange whose status was outside 200..300.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("request failed with status code {status}")]
pub struct StatusError {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    /// Raw response body.
    pub body: String,
}

impl StatusError {
    /// Decode the error body, e.g. into the endpoint's `Error` type.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        decode_body(&self.body)
    }
}
