//! Route registration from endpoint contracts.
//!
//! [`TypedRouter::typed_route`] covers the common case. To put middleware in
//! front of a single route, build its [`MethodRouter`] with
//! [`typed_method_router`], apply `.layer(..)`, and register it with
//! [`TypedRouter::typed_service`]:
//!
//! ```ignore
//! let app = Router::new()
//!     .typed_service::<CreateDog>(
//!         typed_method_router::<CreateDog, _, _, _>(create_dog)
//!             .layer(middleware::from_fn(require_auth)),
//!     )
//!     .typed_route::<GetDogs, _, _>(list_dogs);
//! ```

use axum::handler::Handler;
use axum::routing::{on, MethodFilter, MethodRouter};
use axum::Router;
use typed_route_core::{Endpoint, Method};

/// Register handlers under the route their endpoint declares.
pub trait TypedRouter<S> {
    /// Add `handler` for `E::ROUTE`. Several endpoints may share a path as
    /// long as their methods differ.
    #[must_use]
    fn typed_route<E, H, T>(self, handler: H) -> Self
    where
        E: Endpoint,
        H: Handler<T, S>,
        T: 'static;

    /// Add a prepared method router, typically one with route-level layers,
    /// under the path of `E::ROUTE`.
    #[must_use]
    fn typed_service<E: Endpoint>(self, method_router: MethodRouter<S>) -> Self;
}

impl<S> TypedRouter<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn typed_route<E, H, T>(self, handler: H) -> Self
    where
        E: Endpoint,
        H: Handler<T, S>,
        T: 'static,
    {
        self.typed_service::<E>(typed_method_router::<E, H, T, S>(handler))
    }

    fn typed_service<E: Endpoint>(self, method_router: MethodRouter<S>) -> Self {
        let path = axum_path(E::ROUTE.path);
        tracing::debug!(route = %E::ROUTE, %path, "registering route");
        self.route(&path, method_router)
    }
}

/// Method router answering only `E::ROUTE`'s method with `handler`.
pub fn typed_method_router<E, H, T, S>(handler: H) -> MethodRouter<S>
where
    E: Endpoint,
    H: Handler<T, S>,
    T: 'static,
    S: Clone + Send + Sync + 'static,
{
    on(method_filter(E::ROUTE.method), handler)
}

/// Convert a `:name` path template into axum's `{name}` syntax.
pub fn axum_path(template: &str) -> String {
    template
        .split('/')
        .map(|segment| match segment.strip_prefix(':') {
            Some(name) if !name.is_empty() => format!("{{{name}}}"),
            _ => segment.to_string(),
        })
        .collect::<Vec<_>>()
        .join("/")
}

pub fn method_filter(method: Method) -> MethodFilter {
    match method {
        Method::Get => MethodFilter::GET,
        Method::Post => MethodFilter::POST,
        Method::Put => MethodFilter::PUT,
        Method::Patch => MethodFilter::PATCH,
        Method::Delete => MethodFilter::DELETE,
        Method::Head => MethodFilter::HEAD,
        Method::Options => MethodFilter::OPTIONS,
    }
}
