//! Deep merge of default and per-call request options.
//!
//! Objects merge key by key, arrays and scalars from the overlay replace the
//! base, and an absent overlay (`None`, or JSON `null`) keeps the base. Both
//! inputs are borrowed; the result is always a new value.

use serde_json::{Map, Value};

use crate::options::{RequestOptions, TransportConfig};

pub trait Merge {
    /// Merge `overlay` on top of `self`; values from `overlay` win.
    #[must_use]
    fn merge(&self, overlay: &Self) -> Self;
}

impl Merge for Value {
    fn merge(&self, overlay: &Self) -> Self {
        match (self, overlay) {
            (_, Value::Null) => self.clone(),
            (Value::Object(base), Value::Object(over)) => Value::Object(base.merge(over)),
            (_, over) => over.clone(),
        }
    }
}

impl Merge for Map<String, Value> {
    fn merge(&self, overlay: &Self) -> Self {
        let mut merged = self.clone();
        for (key, value) in overlay {
            let next = match self.get(key) {
                Some(base) => base.merge(value),
                None => value.clone(),
            };
            merged.insert(key.clone(), next);
        }
        merged
    }
}

impl<T: Merge + Clone> Merge for Option<T> {
    fn merge(&self, overlay: &Self) -> Self {
        match (self, overlay) {
            (Some(base), Some(over)) => Some(base.merge(over)),
            (None, over) => over.clone(),
            (base, None) => base.clone(),
        }
    }
}

impl Merge for TransportConfig {
    fn merge(&self, overlay: &Self) -> Self {
        TransportConfig {
            base_url: overlay.base_url.clone().or_else(|| self.base_url.clone()),
            timeout_ms: overlay.timeout_ms.or(self.timeout_ms),
            extra: self.extra.merge(&overlay.extra),
        }
    }
}

impl Merge for RequestOptions {
    fn merge(&self, overlay: &Self) -> Self {
        RequestOptions {
            params: self.params.merge(&overlay.params),
            query: self.query.merge(&overlay.query),
            body: self.body.merge(&overlay.body),
            headers: self.headers.merge(&overlay.headers),
            transport: self.transport.merge(&overlay.transport),
        }
    }
}
