//! Transports execute one `TransportRequest` and report the response.
//!
//! # Design
//! A transport never judges the status code: non-2xx responses come back as
//! data and the dispatcher decides what counts as success. `UreqTransport`
//! runs ureq's blocking call on tokio's blocking pool so dispatch stays an
//! ordinary future.

use async_trait::async_trait;
use ureq::typestate::{WithBody, WithoutBody};
use ureq::{Agent, Body, RequestBuilder};

use crate::endpoint::Method;
use crate::error::ClientError;
use crate::http::{HttpResponse, TransportRequest};

#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform exactly one HTTP exchange.
    async fn send(&self, request: TransportRequest) -> Result<HttpResponse, ClientError>;
}

/// Default transport backed by a `ureq` agent.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        Self {
            agent: default_agent(),
        }
    }

    /// Use a preconfigured agent. Its settings apply to every request; a
    /// per-call timeout only overrides the timeout. Agents that report
    /// status codes as errors still work; the status is recovered without
    /// the body.
    pub fn with_agent(agent: Agent) -> Self {
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for UreqTransport {
    async fn send(&self, request: TransportRequest) -> Result<HttpResponse, ClientError> {
        let agent = self.agent.clone();
        tokio::task::spawn_blocking(move || execute(&agent, &request))
            .await
            .map_err(ClientError::transport)?
    }
}

fn default_agent() -> Agent {
    Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent()
}

fn execute(agent: &Agent, request: &TransportRequest) -> Result<HttpResponse, ClientError> {
    let url = request.url.as_str();
    let body = request.body.as_deref();
    let result = match request.method {
        Method::Get => without_body(decorate(agent.get(url), request), body),
        Method::Delete => without_body(decorate(agent.delete(url), request), body),
        Method::Head => without_body(decorate(agent.head(url), request), body),
        Method::Options => without_body(decorate(agent.options(url), request), body),
        Method::Post => with_body(decorate(agent.post(url), request), body),
        Method::Put => with_body(decorate(agent.put(url), request), body),
        Method::Patch => with_body(decorate(agent.patch(url), request), body),
    };

    match result {
        Ok(response) => into_response(response),
        Err(ureq::Error::StatusCode(status)) => Ok(HttpResponse {
            status,
            headers: Vec::new(),
            body: String::new(),
        }),
        Err(err) => Err(ClientError::transport(err)),
    }
}

fn decorate<B>(mut builder: RequestBuilder<B>, request: &TransportRequest) -> RequestBuilder<B> {
    for (name, value) in &request.query {
        builder = builder.query(name, value);
    }
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    if let Some(timeout) = request.config.timeout() {
        builder = builder.config().timeout_global(Some(timeout)).build();
    }
    builder
}

fn with_body(
    builder: RequestBuilder<WithBody>,
    body: Option<&str>,
) -> Result<ureq::http::Response<Body>, ureq::Error> {
    match body {
        Some(body) => builder.send(body.as_bytes()),
        None => builder.send_empty(),
    }
}

fn without_body(
    builder: RequestBuilder<WithoutBody>,
    body: Option<&str>,
) -> Result<ureq::http::Response<Body>, ureq::Error> {
    match body {
        Some(body) => builder.force_send_body().send(body.as_bytes()),
        None => builder.call(),
    }
}

fn into_response(mut response: ureq::http::Response<Body>) -> Result<HttpResponse, ClientError> {
    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_string(), value.to_string()))
        })
        .collect();
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(ClientError::transport)?;
    Ok(HttpResponse {
        status,
        headers,
        body,
    })
}
