//! # CQHTTP Protocol
//!
//! Typed client for the CQHTTP (OneBot v11 over HTTP) bot gateway.
//!
//! - [`CqhttpProtocol`]: one async method per gateway action
//! - [`model`]: entities returned by actions, message segments and the
//!   response envelope
//!
//! Every action returns an [`ActionResult`](cqhttp_core::ActionResult), so a
//! caller can tell a transport failure from a gateway rejection, an
//! undecodable body or a local argument error.
//!
//! ```rust,ignore
//! use cqhttp_protocol::{CqhttpProtocol, model::Segment};
//!
//! let chain = vec![Segment::at(10001), Segment::text(" welcome!")];
//! client.send_group_message(123, chain, None).await?;
//! ```

pub mod model;
pub mod protocol;

pub use protocol::{CqhttpProtocol, DEFAULT_MUTE_DURATION, GROUP_REQUEST_SUB_TYPES, PERMANENT_TITLE};
