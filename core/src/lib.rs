//! Typed route contracts shared by API clients and servers.
//!
//! # Overview
//! A [`Route`] names an HTTP endpoint (method + `:name` path template) and an
//! [`Endpoint`] binds it to request, response and error types. The same
//! endpoint type drives the client side here and the server side in
//! `typed-route-axum`, so both ends agree on shapes by construction.
//!
//! # Design
//! - `ApiClient` merges its default [`RequestOptions`] under the per-call
//!   options, templates the path, and issues exactly one call through a
//!   [`Transport`]. Only 2xx responses are successes.
//! - Clients compose: a child holds an `Arc` to its parent and falls back to
//!   it for base URL and default options.
//! - Non-2xx responses surface as [`ClientError::Status`] and can be routed
//!   by status code through [`ErrorHandlers`].
//! - The request and response types in `http` are plain data, so transports
//!   are easy to swap and the dispatcher is easy to test.

pub mod client;
pub mod endpoint;
pub mod error;
pub mod handler;
pub mod http;
pub mod merge;
pub mod options;
pub mod transport;
pub mod url;

pub use client::{ApiClient, ApiClientBuilder, ClientConfig, DefaultOptionsSource, RouteRequest};
pub use endpoint::{EmptyRequest, Endpoint, ErrorBody, Method, Route, StatusCoded};
pub use error::{ClientError, StatusError};
pub use handler::ErrorHandlers;
pub use http::{HttpResponse, ResponseEnvelope, TransportRequest};
pub use merge::Merge;
pub use options::{RequestOptions, TransportConfig};
pub use transport::{Transport, UreqTransport};
pub use url::{join_url, replace_url_params, unresolved_placeholders};
