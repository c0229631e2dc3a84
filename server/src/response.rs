//! Typed response writer.

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use typed_route_core::{Endpoint, StatusCoded};

enum Payload<E: Endpoint> {
    Body(E::Response),
    Error(E::Error),
    Empty,
}

/// A response for endpoint `E`: its `Response` body, its `Error` body, or
/// nothing, plus a status and extra headers.
pub struct TypedResponse<E: Endpoint> {
    status: StatusCode,
    headers: Vec<(String, String)>,
    payload: Payload<E>,
}

impl<E: Endpoint> TypedResponse<E> {
    /// `200 OK` with `body`.
    pub fn ok(body: E::Response) -> Self {
        Self {
            status: StatusCode::OK,
            headers: Vec::new(),
            payload: Payload::Body(body),
        }
    }

    /// A bodiless response, e.g. `204 No Content`.
    pub fn empty(status: u16) -> Self {
        Self {
            status: StatusCode::OK,
            headers: Vec::new(),
            payload: Payload::Empty,
        }
        .status(status)
    }

    /// Set the status. Codes outside 100..=999 become `500`.
    #[must_use]
    pub fn status(mut self, status: u16) -> Self {
        self.status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        self
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }
}

/// Answer with `error`, using the status the error body carries.
pub fn send_error<E>(error: E::Error) -> TypedResponse<E>
where
    E: Endpoint,
    E::Error: StatusCoded,
{
    let status = error.status();
    TypedResponse {
        status: StatusCode::OK,
        headers: Vec::new(),
        payload: Payload::Error(error),
    }
    .status(status)
}

impl<E: Endpoint> IntoResponse for TypedResponse<E> {
    fn into_response(self) -> Response {
        let mut response = match self.payload {
            Payload::Body(body) => Json(body).into_response(),
            Payload::Error(error) => Json(error).into_response(),
            Payload::Empty => ().into_response(),
        };
        if response.status().is_server_error() {
            // Serialization failed; keep axum's answer.
            return response;
        }
        *response.status_mut() = self.status;
        for (name, value) in self.headers {
            match (HeaderName::try_from(name.as_str()), HeaderValue::try_from(value.as_str())) {
                (Ok(name), Ok(value)) => {
                    response.headers_mut().insert(name, value);
                }
                _ => tracing::warn!(%name, "dropping invalid response header"),
            }
        }
        response
    }
}
