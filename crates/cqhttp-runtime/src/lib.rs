//! CQHTTP Runtime - configuration, logging and bootstrap for the client.
//!
//! This crate provides:
//! - Layered configuration loading ([`ConfigLoader`])
//! - Logging initialization ([`LoggingBuilder`])
//! - [`bootstrap`], which turns a loader into a ready [`CqhttpProtocol`]
//!
//! ```ignore
//! use cqhttp_runtime::{ConfigLoader, bootstrap};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = bootstrap(ConfigLoader::new())?;
//!     let bot = client.get_login_info().await?;
//!     tracing::info!(user_id = bot.user_id, "Logged in");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;

use tracing::info;

use cqhttp_protocol::CqhttpProtocol;

// Re-exports
pub use config::{
    ClientConfig, ConfigError, ConfigLoader, ConfigResult, CqhttpConfig, LoggingConfig,
    validate_config,
};
pub use error::{RuntimeError, RuntimeResult};
pub use logging::LoggingBuilder;

// Re-export tracing for use by other crates
pub use tracing;
pub use tracing_subscriber;

/// Loads and validates configuration, initializes logging and builds the
/// client.
///
/// Logging is left untouched if a subscriber is already installed.
pub fn bootstrap(loader: ConfigLoader) -> RuntimeResult<CqhttpProtocol> {
    let config = loader.load()?;
    validate_config(&config)?;
    logging::init_from_config(&config.logging);

    let client = CqhttpProtocol::new(&config.client.to_http_config())?;
    info!(
        base_url = %config.client.base_url,
        timeout_ms = config.client.timeout_ms,
        session = ?config.client.session,
        "CQHTTP client ready"
    );
    Ok(client)
}

/// Prelude module for convenient imports.
pub mod prelude {
    pub use tracing::{Level, debug, error, info, instrument, span, trace, warn};
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_bootstrap_uses_configured_url() {
        Jail::expect_with(|jail| {
            jail.set_env("CQHTTP_CLIENT__BASE_URL", "http://10.1.2.3:5700");
            jail.set_env("CQHTTP_LOGGING__OUTPUT", "stderr");
            let client = bootstrap(ConfigLoader::new().search_path(jail.directory())).unwrap();
            assert_eq!(client.base_url(), "http://10.1.2.3:5700");
            Ok(())
        });
    }

    #[test]
    fn test_bootstrap_rejects_invalid_config() {
        Jail::expect_with(|jail| {
            jail.set_env("CQHTTP_CLIENT__BASE_URL", "http://10.1.2.3:5700/");
            let err = bootstrap(ConfigLoader::new().search_path(jail.directory())).unwrap_err();
            assert!(matches!(
                err,
                RuntimeError::Config(ConfigError::InvalidUrl { .. })
            ));
            Ok(())
        });
    }
}
