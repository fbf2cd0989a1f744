//! Configuration for the CQHTTP client.
//!
//! Sources are layered with figment: built-in defaults, then a config file,
//! then `CQHTTP_*` environment variables.

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, Profile, load_config};
pub use schema::{ClientConfig, CqhttpConfig, LogFormat, LogLevel, LogOutput, LoggingConfig};
pub use validation::validate_config;
