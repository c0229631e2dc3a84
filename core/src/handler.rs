//! Status-code keyed error dispatch.
//!
//! Handlers return any `R`. Make `R` a future (for example a boxed one) to
//! handle errors asynchronously, or a `Result` to let a handler fail:
//!
//! ```
//! use typed_route_core::{ClientError, ErrorHandlers, StatusError};
//!
//! let handlers = ErrorHandlers::new()
//!     .on(404, |_err| "not found")
//!     .on(500, |_err| "server error");
//!
//! let err = ClientError::from(StatusError { status: 404, headers: vec![], body: String::new() });
//! assert_eq!(handlers.handle(err).unwrap(), "not found");
//! ```

use std::collections::HashMap;
use std::fmt;

use crate::error::ClientError;

type Handler<'a, R> = Box<dyn Fn(ClientError) -> R + Send + Sync + 'a>;

/// At most one handler per HTTP status code.
pub struct ErrorHandlers<'a, R> {
    handlers: HashMap<u16, Handler<'a, R>>,
}

impl<R> fmt::Debug for ErrorHandlers<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut statuses: Vec<_> = self.handlers.keys().collect();
        statuses.sort_unstable();
        f.debug_struct("ErrorHandlers").field("statuses", &statuses).finish()
    }
}

impl<R> Default for ErrorHandlers<'_, R> {
    fn default() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }
}

impl<'a, R> ErrorHandlers<'a, R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the handler for `status`, replacing any earlier one.
    #[must_use]
    pub fn on<F>(mut self, status: u16, handler: F) -> Self
    where
        F: Fn(ClientError) -> R + Send + Sync + 'a,
    {
        if self.handlers.insert(status, Box::new(handler)).is_some() {
            tracing::debug!(status, "replacing error handler");
        }
        self
    }

    pub fn contains(&self, status: u16) -> bool {
        self.handlers.contains_key(&status)
    }

    /// Route `err` to the handler registered for its status.
    ///
    /// Errors without a response status, and statuses with no handler, are
    /// returned unchanged as `Err`.
    pub fn handle(&self, err: ClientError) -> Result<R, ClientError> {
        let Some(handler) = err.status().and_then(|status| self.handlers.get(&status)) else {
            return Err(err);
        };
        Ok(handler(err))
    }
}
