//! # CQHTTP Core
//!
//! Shared vocabulary for the CQHTTP client crates.
//!
//! - [`TransportError`] / [`ActionError`]: the error taxonomy
//! - [`Fetcher`]: the seam implemented by `cqhttp-transport`
//! - [`HttpClientConfig`] / [`SessionMode`]: client configuration
//!
//! ```text
//! ┌─────────────────────┐
//! │  cqhttp-protocol    │  (one method per bot action)
//! ├─────────────────────┤
//! │  cqhttp-core        │  <- This crate (errors, Fetcher trait, config)
//! ├─────────────────────┤
//! │  cqhttp-transport   │  (reqwest-backed Fetcher)
//! └─────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod transport;

pub use config::{DEFAULT_TIMEOUT, HttpClientConfig, SessionMode, endpoint_url};
pub use error::{ActionError, ActionResult, FailureKind, TransportError, TransportResult};
pub use transport::{BoxedFetcher, Fetcher, Params};
