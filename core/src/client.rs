//! API client: default options, parent chaining and request dispatch.
//!
//! # Design
//! `ApiClient` carries no mutable state. A client may own a base URL and a
//! source of default request options; anything it lacks is looked up on its
//! parent (an `Arc<ApiClient>`), so a tree of clients shares one root
//! configuration without copying it. Each call merges the defaults under
//! the call's options, templates the route path, and sends exactly one
//! request through the client's [`Transport`].

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::endpoint::{Endpoint, Route};
use crate::error::{ClientError, StatusError};
use crate::http::{HttpResponse, ResponseEnvelope, TransportRequest};
use crate::merge::Merge;
use crate::options::RequestOptions;
use crate::transport::{Transport, UreqTransport};
use crate::url::{join_url, param_to_string, replace_url_params, unresolved_placeholders};

/// Where a client gets its default request options from.
///
/// Implement this to compute defaults per call, e.g. to attach a freshly
/// fetched header or transport override.
#[async_trait]
pub trait DefaultOptionsSource: Send + Sync {
    async fn default_options(&self) -> Result<RequestOptions, ClientError>;
}

#[async_trait]
impl DefaultOptionsSource for RequestOptions {
    async fn default_options(&self) -> Result<RequestOptions, ClientError> {
        Ok(self.clone())
    }
}

/// Serializable client configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub defaults: Option<RequestOptions>,
}

pub struct ApiClient {
    base_url: Option<String>,
    defaults: Option<Arc<dyn DefaultOptionsSource>>,
    parent: Option<Arc<ApiClient>>,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("has_defaults", &self.defaults.is_some())
            .field("parent", &self.parent)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Root client for `base_url` with empty default options.
    pub fn new(base_url: &str) -> Self {
        Self::builder()
            .base_url(base_url)
            .default_options(RequestOptions::default())
            .build()
    }

    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    pub fn from_config(config: ClientConfig) -> Self {
        let mut builder = Self::builder();
        if let Some(base_url) = config.base_url {
            builder = builder.base_url(base_url);
        }
        if let Some(defaults) = config.defaults {
            builder = builder.default_options(defaults);
        }
        builder.build()
    }

    /// Builder for a client that delegates to this one for anything it does
    /// not configure itself. The transport is inherited.
    pub fn child(self: &Arc<Self>) -> ApiClientBuilder {
        Self::builder().parent(Arc::clone(self))
    }

    pub fn parent(&self) -> Option<&Arc<ApiClient>> {
        self.parent.as_ref()
    }

    /// The nearest non-empty base URL, starting with this client.
    pub fn base_url(&self) -> Option<&str> {
        let mut client = self;
        loop {
            if let Some(url) = client.base_url.as_deref().filter(|url| !url.is_empty()) {
                return Some(url);
            }
            client = client.parent.as_deref()?;
        }
    }

    /// Default options of the nearest client that has a source for them.
    pub async fn default_options(&self) -> Result<RequestOptions, ClientError> {
        let mut client = self;
        loop {
            if let Some(source) = &client.defaults {
                return source.default_options().await;
            }
            client = client.parent.as_deref().ok_or_else(|| {
                ClientError::Configuration(
                    "client has no default request options and no parent to delegate to".to_string(),
                )
            })?;
        }
    }

    /// Resolve defaults, merge, and build the request without sending it.
    pub async fn prepare(
        &self,
        route: &Route,
        options: &RequestOptions,
    ) -> Result<TransportRequest, ClientError> {
        let defaults = self.default_options().await?;
        let merged = defaults.merge(options);

        let base_url = self.base_url().ok_or_else(|| {
            ClientError::Configuration(format!("no base URL configured for {route}"))
        })?;
        let path = replace_url_params(route.path, &merged.params);
        let unresolved = unresolved_placeholders(&path);
        if !unresolved.is_empty() {
            tracing::warn!(%route, ?unresolved, "path placeholders left unresolved");
        }

        let mut headers = flatten_headers(&merged.headers);
        let body = match merged.body.filter(|body| !body.is_null()) {
            Some(body) => {
                if !headers
                    .iter()
                    .any(|(name, _)| name.eq_ignore_ascii_case("content-type"))
                {
                    headers.push(("content-type".to_string(), "application/json".to_string()));
                }
                Some(serde_json::to_string(&body).map_err(ClientError::Serialization)?)
            }
            None => None,
        };

        let mut config = merged.transport.unwrap_or_default();
        if let Some(ignored) = config.base_url.take() {
            tracing::debug!(%route, %ignored, "dropping base_url transport override");
        }

        Ok(TransportRequest {
            method: route.method,
            url: join_url(base_url, &path),
            query: flatten_query(&merged.query),
            headers,
            body,
            config,
        })
    }

    /// Send one request for `route`. Only 2xx responses are returned as
    /// `Ok`; anything else is a [`ClientError::Status`].
    pub async fn dispatch(
        &self,
        route: &Route,
        options: &RequestOptions,
    ) -> Result<HttpResponse, ClientError> {
        let request = self.prepare(route, options).await?;
        tracing::debug!(method = %request.method, url = %request.url, "dispatching request");

        let response = self.transport.send(request).await?;
        if !response.is_success() {
            tracing::debug!(%route, status = response.status, "request failed");
            return Err(StatusError {
                status: response.status,
                headers: response.headers,
                body: response.body,
            }
            .into());
        }
        tracing::debug!(%route, status = response.status, "request completed");
        Ok(response)
    }

    /// Call endpoint `E` and return the decoded response body.
    pub async fn call<E: Endpoint>(&self, request: &E::Request) -> Result<E::Response, ClientError> {
        let options = RequestOptions::from_request(request)?;
        self.dispatch(&E::ROUTE, &options).await?.json()
    }

    /// Call endpoint `E` and return status, headers and decoded body.
    pub async fn call_full<E: Endpoint>(
        &self,
        request: &E::Request,
    ) -> Result<ResponseEnvelope<E::Response>, ClientError> {
        let options = RequestOptions::from_request(request)?;
        self.dispatch(&E::ROUTE, &options).await?.into_envelope()
    }

    /// A reusable callable for endpoint `E` bound to this client.
    pub fn route<E: Endpoint>(self: &Arc<Self>) -> RouteRequest<E> {
        RouteRequest::new(Arc::clone(self))
    }
}

#[derive(Default)]
pub struct ApiClientBuilder {
    base_url: Option<String>,
    defaults: Option<Arc<dyn DefaultOptionsSource>>,
    parent: Option<Arc<ApiClient>>,
    transport: Option<Arc<dyn Transport>>,
}

impl ApiClientBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn default_options(mut self, options: RequestOptions) -> Self {
        self.defaults = Some(Arc::new(options));
        self
    }

    pub fn default_options_source(mut self, source: impl DefaultOptionsSource + 'static) -> Self {
        self.defaults = Some(Arc::new(source));
        self
    }

    pub fn parent(mut self, parent: Arc<ApiClient>) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    pub fn shared_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn build(self) -> ApiClient {
        let transport = match (self.transport, &self.parent) {
            (Some(transport), _) => transport,
            (None, Some(parent)) => Arc::clone(&parent.transport),
            (None, None) => Arc::new(UreqTransport::new()),
        };
        ApiClient {
            base_url: self.base_url,
            defaults: self.defaults,
            parent: self.parent,
            transport,
        }
    }
}

/// Callable for a single endpoint, bound to a shared client.
pub struct RouteRequest<E> {
    client: Arc<ApiClient>,
    _endpoint: PhantomData<fn() -> E>,
}

impl<E> Clone for RouteRequest<E> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            _endpoint: PhantomData,
        }
    }
}

impl<E> fmt::Debug for RouteRequest<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteRequest").field("client", &self.client).finish()
    }
}

impl<E: Endpoint> RouteRequest<E> {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            _endpoint: PhantomData,
        }
    }

    pub fn route(&self) -> Route {
        E::ROUTE
    }

    pub async fn send(&self, request: &E::Request) -> Result<E::Response, ClientError> {
        self.client.call::<E>(request).await
    }

    pub async fn send_full(
        &self,
        request: &E::Request,
    ) -> Result<ResponseEnvelope<E::Response>, ClientError> {
        self.client.call_full::<E>(request).await
    }
}

fn flatten_query(query: &Map<String, Value>) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (name, value) in query {
        match value {
            Value::Null => {}
            Value::Array(items) => pairs.extend(
                items
                    .iter()
                    .filter(|item| !item.is_null())
                    .map(|item| (name.clone(), param_to_string(item))),
            ),
            other => pairs.push((name.clone(), param_to_string(other))),
        }
    }
    pairs
}

fn flatten_headers(headers: &Map<String, Value>) -> Vec<(String, String)> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            let value = match value {
                Value::Null => return None,
                Value::Array(items) => items
                    .iter()
                    .map(param_to_string)
                    .collect::<Vec<_>>()
                    .join(", "),
                other => param_to_string(other),
            };
            Some((name.clone(), value))
        })
        .collect()
}
