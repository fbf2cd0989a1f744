//! # CQHTTP Transport
//!
//! HTTP transport for the CQHTTP client, built on `reqwest`.
//!
//! [`Fetch`] implements the [`cqhttp_core::Fetcher`] seam: one request in,
//! decoded JSON (or a decode miss, or a transport error) out.
//!
//! ```rust,ignore
//! use cqhttp_core::{Fetcher, HttpClientConfig};
//! use cqhttp_transport::Fetch;
//!
//! let fetch = Fetch::new(&HttpClientConfig::new("http://127.0.0.1:5700"))?;
//! let reply = fetch.http_post("http://127.0.0.1:5700/get_login_info", None).await?;
//! ```

pub mod fetch;

pub use fetch::Fetch;
