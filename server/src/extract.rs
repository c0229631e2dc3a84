//! Typed request extractor.
//!
//! # Design
//! The extractor rebuilds the request-options object a client would have
//! sent (`params`, `query`, `headers` and, when present, `body`) and
//! deserializes it as the endpoint's `Request` type. Path, query and header
//! values arrive as text and are parsed into whatever scalar the request
//! type declares. Headers are keyed by their lowercase names and repeated
//! headers are joined with `", "`.

use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::rejection::PathRejection;
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{Map, Value};
use typed_route_core::{Endpoint, ErrorBody};

use crate::facet::from_facets;

/// Extracts `E::Request` from path parameters, query, headers and JSON body.
///
/// Rejects with `400` and an [`ErrorBody`] when the request does not fit the
/// endpoint's request type.
pub struct TypedRequest<E: Endpoint>(pub E::Request);

impl<E, S> FromRequest<S> for TypedRequest<E>
where
    E: Endpoint,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let (mut parts, body) = req.into_parts();

        let params = path_params(&mut parts, state).await?;
        let Query(query) = Query::<Vec<(String, String)>>::from_request_parts(&mut parts, state)
            .await
            .map_err(|err| reject(format!("invalid query string: {err}")))?;
        let headers = header_map(&parts);

        let bytes = Bytes::from_request(Request::from_parts(parts, body), state)
            .await
            .map_err(IntoResponse::into_response)?;

        let mut facets = Map::new();
        facets.insert("params".to_string(), Value::Object(params));
        facets.insert("query".to_string(), Value::Object(query_map(query)));
        facets.insert("headers".to_string(), Value::Object(headers));
        let body = if bytes.is_empty() {
            None
        } else {
            let body: Value = serde_json::from_slice(&bytes)
                .map_err(|err| reject(format!("invalid JSON body: {err}")))?;
            Some(body)
        };

        from_facets(facets, body)
            .map(TypedRequest)
            .map_err(|err| reject(format!("request does not match {}: {err}", E::ROUTE)))
    }
}

async fn path_params<S: Send + Sync>(
    parts: &mut Parts,
    state: &S,
) -> Result<Map<String, Value>, Response> {
    let params = match Path::<HashMap<String, String>>::from_request_parts(parts, state).await {
        Ok(Path(params)) => params,
        // Routes without placeholders have no params to extract.
        Err(PathRejection::MissingPathParams(_)) => HashMap::new(),
        Err(err) => return Err(reject(format!("invalid path parameters: {err}"))),
    };
    Ok(params
        .into_iter()
        .map(|(name, value)| (name, Value::String(value)))
        .collect())
}

fn query_map(pairs: Vec<(String, String)>) -> Map<String, Value> {
    let mut query = Map::new();
    for (name, value) in pairs {
        match query.get_mut(&name) {
            Some(Value::Array(values)) => values.push(Value::String(value)),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, Value::String(value)]);
            }
            None => {
                query.insert(name, Value::String(value));
            }
        }
    }
    query
}

fn header_map(parts: &Parts) -> Map<String, Value> {
    let mut headers = Map::new();
    for (name, value) in &parts.headers {
        let Ok(value) = value.to_str() else {
            tracing::debug!(header = %name, "skipping non-UTF-8 header value");
            continue;
        };
        match headers.get_mut(name.as_str()) {
            Some(Value::String(existing)) => {
                existing.push_str(", ");
                existing.push_str(value);
            }
            _ => {
                headers.insert(name.as_str().to_string(), Value::String(value.to_string()));
            }
        }
    }
    headers
}

fn reject(msg: String) -> Response {
    tracing::debug!(%msg, "rejecting request");
    let status = StatusCode::BAD_REQUEST;
    (status, Json(ErrorBody::new(status.as_u16(), msg))).into_response()
}
