//! The transport seam between the protocol client and an HTTP library.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::TransportResult;

/// A parameter mapping sent to the gateway.
pub type Params = Map<String, Value>;

/// Performs single HTTP exchanges against the gateway.
///
/// Both verbs share one contract:
///
/// | Outcome | Return |
/// |---------|--------|
/// | 2xx with a JSON body | `Ok(Some(value))` |
/// | 2xx with a body that is not JSON | `Ok(None)` |
/// | non-2xx status, I/O failure, timeout | `Err(TransportError)` |
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Issues a POST with `payload` as the JSON body.
    ///
    /// `None` sends no body at all.
    async fn http_post(&self, url: &str, payload: Option<&Value>) -> TransportResult<Option<Value>>;

    /// Issues a GET with `params` encoded as the query string.
    async fn http_get(&self, url: &str, params: Option<&Params>) -> TransportResult<Option<Value>>;
}

/// A shared, type-erased [`Fetcher`].
pub type BoxedFetcher = Arc<dyn Fetcher>;
