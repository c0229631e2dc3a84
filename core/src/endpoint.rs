//! Route descriptors and per-endpoint contracts.
//!
//! # Design
//! A `Route` is a `const` pair of method and path template, so it can be
//! declared once next to the endpoint it describes and shared by reference.
//! `Endpoint` ties that route to the request, response and error types. The
//! request type serializes to the request-options shape
//! (`{ params, query, body, headers }`), which is what lets the server side
//! deserialize the very same type from an incoming request.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// HTTP method for a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A static `{method, path}` pair identifying an HTTP endpoint.
///
/// The path is slash-delimited and may contain `:name` placeholders, e.g.
/// `/dog/:_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Route {
    pub method: Method,
    pub path: &'static str,
}

impl Route {
    pub const fn new(method: Method, path: &'static str) -> Self {
        Self { method, path }
    }

    pub const fn get(path: &'static str) -> Self {
        Self::new(Method::Get, path)
    }

    pub const fn post(path: &'static str) -> Self {
        Self::new(Method::Post, path)
    }

    pub const fn put(path: &'static str) -> Self {
        Self::new(Method::Put, path)
    }

    pub const fn patch(path: &'static str) -> Self {
        Self::new(Method::Patch, path)
    }

    pub const fn delete(path: &'static str) -> Self {
        Self::new(Method::Delete, path)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

/// Contract for a single endpoint: its route plus the shapes exchanged on it.
///
/// `Request` must serialize to an object with any of the optional keys
/// `params`, `query`, `body` and `headers`. Fields the client supplies
/// through its default options can be `Option`s that are left `None` at the
/// call site.
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use typed_route_core::{Endpoint, ErrorBody, Route};
///
/// #[derive(Serialize, Deserialize)]
/// struct GetDogParams { _id: String }
///
/// #[derive(Serialize, Deserialize)]
/// struct GetDogRequest { params: GetDogParams }
///
/// #[derive(Serialize, Deserialize)]
/// struct Dog { name: String }
///
/// struct GetDog;
///
/// impl Endpoint for GetDog {
///     type Request = GetDogRequest;
///     type Response = Dog;
///     type Error = ErrorBody;
///     const ROUTE: Route = Route::get("/dog/:_id");
/// }
/// ```
pub trait Endpoint: Send + Sync + 'static {
    type Request: Serialize + DeserializeOwned + Send + Sync;
    type Response: Serialize + DeserializeOwned + Send;
    type Error: Serialize + DeserializeOwned + Send;

    const ROUTE: Route;
}

/// Request type for endpoints that take no parameters, query, body or
/// headers of their own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptyRequest {}

/// An error body that knows which HTTP status it is sent with.
pub trait StatusCoded {
    fn status(&self) -> u16;
}

/// The conventional error body: `{"status": 404, "msg": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub status: u16,
    pub msg: String,
}

impl ErrorBody {
    pub fn new(status: u16, msg: impl Into<String>) -> Self {
        Self {
            status,
            msg: msg.into(),
        }
    }
}

impl StatusCoded for ErrorBody {
    fn status(&self) -> u16 {
        self.status
    }
}

impl fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.status, self.msg)
    }
}
