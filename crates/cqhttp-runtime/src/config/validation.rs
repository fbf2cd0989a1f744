//! Configuration validation utilities.

use super::error::{ConfigError, ConfigResult};
use super::schema::{ClientConfig, CqhttpConfig, LogOutput, LoggingConfig};

/// Validates the entire configuration.
pub fn validate_config(config: &CqhttpConfig) -> ConfigResult<()> {
    validate_client_config(&config.client)?;
    validate_logging_config(&config.logging)?;
    Ok(())
}

fn validate_client_config(client: &ClientConfig) -> ConfigResult<()> {
    let url = client.base_url.trim();
    if url.is_empty() {
        return Err(ConfigError::missing_field("client.base_url"));
    }

    let Some(rest) = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"))
    else {
        return Err(ConfigError::invalid_url(
            url,
            "URL must start with http:// or https://",
        ));
    };
    if rest.is_empty() {
        return Err(ConfigError::invalid_url(url, "URL has no host"));
    }

    // Endpoints are joined with "/", so a trailing slash would double it.
    if url.ends_with('/') {
        return Err(ConfigError::invalid_url(
            url,
            "URL must not end with a trailing slash",
        ));
    }

    if client.timeout_ms == 0 {
        return Err(ConfigError::validation("Timeout must be greater than 0"));
    }

    Ok(())
}

fn validate_logging_config(logging: &LoggingConfig) -> ConfigResult<()> {
    if logging.output == LogOutput::File && logging.file_path.is_none() {
        return Err(ConfigError::missing_field("logging.file_path"));
    }
    if logging.filters.keys().any(|module| module.trim().is_empty()) {
        return Err(ConfigError::validation("Log filter module name is empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_url(url: &str) -> CqhttpConfig {
        let mut config = CqhttpConfig::default();
        config.client.base_url = url.to_string();
        config
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&CqhttpConfig::default()).is_ok());
        assert!(validate_config(&with_url("https://bot.example.com/onebot")).is_ok());
    }

    #[test]
    fn test_bad_urls() {
        assert!(matches!(
            validate_config(&with_url("")),
            Err(ConfigError::MissingField { .. })
        ));
        for url in ["127.0.0.1:5700", "ws://127.0.0.1:5700", "http://", "http://host:5700/"] {
            assert!(
                matches!(validate_config(&with_url(url)), Err(ConfigError::InvalidUrl { .. })),
                "{url} should be rejected"
            );
        }
    }

    #[test]
    fn test_zero_timeout() {
        let mut config = CqhttpConfig::default();
        config.client.timeout_ms = 0;
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn test_file_output_needs_path() {
        let mut config = CqhttpConfig::default();
        config.logging.output = LogOutput::File;
        assert!(validate_config(&config).is_err());

        config.logging.file_path = Some("logs/cqhttp.log".into());
        assert!(validate_config(&config).is_ok());
    }
}
