//! HTTP transport types described as plain data.
//!
//! # Design
//! The dispatcher builds a `TransportRequest` and hands it to a
//! [`Transport`](crate::Transport), which performs the I/O and answers with
//! an `HttpResponse`. Keeping both sides as owned data keeps the dispatcher
//! deterministic and lets tests substitute the transport entirely.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::endpoint::Method;
use crate::error::ClientError;
use crate::options::TransportConfig;

/// An outbound request, fully resolved and ready for a transport.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub method: Method,
    /// Absolute URL without the query string.
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    /// Serialized JSON body, if any.
    pub body: Option<String>,
    /// Transport overrides. `base_url` is always `None` here.
    pub config: TransportConfig,
}

impl TransportRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// A completed HTTP exchange, whatever its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Decode the body as JSON. An empty body decodes as `null`, so unit and
    /// `Option` responses work for bodiless replies.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        decode_body(&self.body)
    }

    pub fn into_envelope<T: DeserializeOwned>(self) -> Result<ResponseEnvelope<T>, ClientError> {
        let body = self.json()?;
        Ok(ResponseEnvelope {
            status: self.status,
            headers: self.headers,
            body,
        })
    }
}

/// Status, headers and decoded body of a successful call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseEnvelope<T> {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: T,
}

impl<T> ResponseEnvelope<T> {
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

pub(crate) fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T, ClientError> {
    if body.trim().is_empty() {
        return serde_json::from_value(serde_json::Value::Null).map_err(ClientError::Deserialization);
    }
    serde_json::from_str(body).map_err(ClientError::Deserialization)
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}
