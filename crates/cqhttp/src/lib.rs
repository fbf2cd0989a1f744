//! # CQHTTP
//!
//! A typed async client for bot gateways speaking the CQHTTP (OneBot v11)
//! HTTP API.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐     ┌─────────────────┐     ┌──────────────┐     ┌─────────┐
//! │   Runtime    │────▶│ CqhttpProtocol  │────▶│  Fetcher     │────▶│ Gateway │
//! │ config + log │     │ one fn / action │     │ (reqwest)    │     │  HTTP   │
//! └──────────────┘     └─────────────────┘     └──────────────┘     └─────────┘
//! ```
//!
//! - **Runtime**: loads configuration, sets up logging, builds the client
//! - **Protocol**: typed methods, envelope handling, message chains
//! - **Transport**: one POST/GET per call, with timeout and optional pooling
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cqhttp::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = bootstrap(ConfigLoader::new())?;
//!     let chain = vec![Segment::at(10001), Segment::text(" welcome!")];
//!     let sent = client.send_group_message(123456, chain, None).await?;
//!     info!(message_id = sent.message_id, "sent");
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `toml-config` *(default)*: TOML configuration files
//! - `yaml-config`: YAML configuration files
//! - `json-log`: JSON log output

pub use cqhttp_core as core;
pub use cqhttp_protocol as protocol;
pub use cqhttp_runtime as runtime;
pub use cqhttp_transport as transport;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use cqhttp::prelude::*;
/// ```
pub mod prelude {
    // Entry points
    pub use cqhttp_protocol::CqhttpProtocol;
    pub use cqhttp_runtime::{ConfigLoader, bootstrap};

    // Outbound content
    pub use cqhttp_protocol::model::{ForwardEntry, ForwardNode, MessageContent, Segment};

    // Results and configuration
    pub use cqhttp_core::{ActionError, ActionResult, FailureKind, HttpClientConfig, SessionMode};

    // Logging macros
    pub use cqhttp_runtime::prelude::*;
}
