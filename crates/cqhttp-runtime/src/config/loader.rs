//! Configuration loader using figment.
//!
//! # Configuration Priority (lowest to highest)
//!
//! 1. Built-in defaults
//! 2. Programmatic layers added with [`ConfigLoader::merge`]
//! 3. Profile-specific config file (`cqhttp.{profile}.toml`)
//! 4. Main config file (`cqhttp.toml` or `config.toml`)
//! 5. Environment variables (`CQHTTP_*`)
//!
//! # Feature Flags
//!
//! - `toml-config` *(default)*: `cqhttp.toml`, `config.toml`
//! - `yaml-config`: `cqhttp.yaml`, `cqhttp.yml`, `config.yaml`, `config.yml`
//!
//! # Environment Variable Mapping
//!
//! The `CQHTTP_` prefix is stripped and `__` separates nested keys:
//!
//! - `CQHTTP_CLIENT__BASE_URL=http://10.0.0.2:5700` → `client.base_url`
//! - `CQHTTP_CLIENT__SESSION=pooled` → `client.session`
//! - `CQHTTP_LOGGING__LEVEL=debug` → `logging.level`
//!
//! ```rust,ignore
//! use cqhttp_runtime::config::ConfigLoader;
//!
//! let config = ConfigLoader::new().file("./deploy/cqhttp.toml").load()?;
//! ```

use std::path::{Path, PathBuf};

use figment::Figment;
#[cfg(any(feature = "yaml-config", feature = "toml-config"))]
use figment::providers::Format;
#[cfg(feature = "toml-config")]
use figment::providers::Toml;
#[cfg(feature = "yaml-config")]
use figment::providers::Yaml;
use figment::providers::{Env, Serialized};
use tracing::{debug, info, warn};

use super::error::{ConfigError, ConfigResult};
use super::schema::CqhttpConfig;

/// Prefix of environment variables read by the loader.
pub const ENV_PREFIX: &str = "CQHTTP_";

#[cfg(feature = "toml-config")]
const TOML_NAMES: &[&str] = &["cqhttp.toml", "config.toml"];
#[cfg(feature = "yaml-config")]
const YAML_NAMES: &[&str] = &["cqhttp.yaml", "cqhttp.yml", "config.yaml", "config.yml"];

/// Configuration profile for environment-specific files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Profile {
    #[default]
    Development,
    Production,
    Custom(String),
}

impl Profile {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Custom(name) => name,
        }
    }

    /// Parses a profile name; `prod`/`dev` are accepted as short forms.
    pub fn parse(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "development" | "dev" => Self::Development,
            other => Self::Custom(other.to_string()),
        }
    }

    /// Reads `CQHTTP_PROFILE`, defaulting to development.
    pub fn from_env() -> Self {
        std::env::var("CQHTTP_PROFILE")
            .map(|p| Self::parse(&p))
            .unwrap_or_default()
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Layered configuration loader.
pub struct ConfigLoader {
    overrides: Figment,
    profile: Profile,
    search_paths: Vec<PathBuf>,
    load_env: bool,
    config_file: Option<PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            overrides: Figment::new(),
            profile: Profile::from_env(),
            search_paths: Vec::new(),
            load_env: true,
            config_file: None,
        }
    }

    pub fn profile(mut self, profile: impl AsRef<str>) -> Self {
        self.profile = Profile::parse(profile.as_ref());
        self
    }

    /// Adds a directory to search for config files.
    ///
    /// Without explicit search paths the current directory and
    /// `{user config dir}/cqhttp` are searched.
    pub fn search_path(mut self, path: impl AsRef<Path>) -> Self {
        self.search_paths.push(path.as_ref().to_path_buf());
        self
    }

    /// Loads exactly this file instead of searching.
    pub fn file(mut self, path: impl AsRef<Path>) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn without_env(mut self) -> Self {
        self.load_env = false;
        self
    }

    /// Layers a programmatic configuration over the defaults.
    ///
    /// Files and environment variables still take precedence.
    pub fn merge(mut self, config: CqhttpConfig) -> Self {
        self.overrides = self.overrides.merge(Serialized::defaults(config));
        self
    }

    /// Loads and returns the configuration.
    pub fn load(self) -> ConfigResult<CqhttpConfig> {
        let profile = self.profile.clone();
        let config: CqhttpConfig = self.build_figment()?.extract()?;

        debug!(
            profile = %profile,
            base_url = %config.client.base_url,
            logging_level = %config.logging.level,
            "Configuration loaded"
        );
        Ok(config)
    }

    fn build_figment(mut self) -> ConfigResult<Figment> {
        let overrides = std::mem::take(&mut self.overrides);
        let mut figment = Figment::from(Serialized::defaults(CqhttpConfig::default())).merge(overrides);

        figment = match self.config_file.take() {
            Some(path) if path.exists() => {
                info!(path = %path.display(), "Loading configuration file");
                merge_file(figment, &path)?
            }
            Some(path) => return Err(ConfigError::FileNotFound(path)),
            None => self.search_files(figment),
        };

        if self.load_env {
            figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
        }
        Ok(figment)
    }

    fn resolve_search_paths(&self) -> Vec<PathBuf> {
        if !self.search_paths.is_empty() {
            return self.search_paths.clone();
        }
        let mut paths = Vec::new();
        if let Ok(cwd) = std::env::current_dir() {
            paths.push(cwd);
        }
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("cqhttp"));
        }
        paths
    }

    /// Merges the first base file found among `names`, preceded by its
    /// profile-specific sibling if one exists.
    #[cfg(any(feature = "toml-config", feature = "yaml-config"))]
    fn merge_first(
        &self,
        mut figment: Figment,
        search_paths: &[PathBuf],
        names: &[&str],
        merge: impl Fn(Figment, &Path) -> Figment,
    ) -> (Figment, bool) {
        for dir in search_paths {
            for name in names {
                let Some((stem, ext)) = name.rsplit_once('.') else {
                    continue;
                };
                let profiled = dir.join(format!("{stem}.{}.{ext}", self.profile));
                if profiled.exists() {
                    debug!(path = %profiled.display(), "Loading profile-specific config");
                    figment = merge(figment, &profiled);
                }
                let base = dir.join(name);
                if base.exists() {
                    info!(path = %base.display(), "Loading configuration file");
                    return (merge(figment, &base), true);
                }
            }
        }
        (figment, false)
    }

    #[cfg_attr(
        not(any(feature = "toml-config", feature = "yaml-config")),
        allow(unused_mut, unused_variables)
    )]
    fn search_files(&self, mut figment: Figment) -> Figment {
        let search_paths = self.resolve_search_paths();
        let mut found = false;

        #[cfg(feature = "toml-config")]
        {
            let (f, ok) = self.merge_first(figment, &search_paths, TOML_NAMES, |fig, path| {
                fig.merge(Toml::file(path))
            });
            figment = f;
            found |= ok;
        }

        #[cfg(feature = "yaml-config")]
        {
            let (f, ok) = self.merge_first(figment, &search_paths, YAML_NAMES, |fig, path| {
                fig.merge(Yaml::file(path))
            });
            figment = f;
            found |= ok;
        }

        if !found {
            warn!("No configuration file found, using defaults");
        }
        figment
    }
}

/// Merges one file, dispatching on its extension.
fn merge_file(figment: Figment, path: &Path) -> ConfigResult<Figment> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    match ext {
        #[cfg(feature = "toml-config")]
        "toml" => Ok(figment.merge(Toml::file(path))),
        #[cfg(feature = "yaml-config")]
        "yaml" | "yml" => Ok(figment.merge(Yaml::file(path))),
        _ => Err(ConfigError::UnsupportedFormat(ext.to_string())),
    }
}

/// Loads configuration from the default locations.
pub fn load_config() -> ConfigResult<CqhttpConfig> {
    ConfigLoader::new().load()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{LogFormat, LogLevel, LogOutput};
    use cqhttp_core::SessionMode;
    use figment::Jail;

    #[test]
    fn test_defaults_without_sources() {
        Jail::expect_with(|jail| {
            let config = ConfigLoader::new()
                .search_path(jail.directory())
                .without_env()
                .load()
                .unwrap();
            assert_eq!(config, CqhttpConfig::default());
            Ok(())
        });
    }

    #[test]
    #[cfg(feature = "toml-config")]
    fn test_file_then_env() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "cqhttp.toml",
                r#"
                [client]
                base_url = "http://10.0.0.2:5700"
                session = "pooled"

                [logging]
                level = "debug"
                format = "pretty"

                [logging.filters]
                cqhttp_transport = "trace"
                "#,
            )?;
            jail.set_env("CQHTTP_CLIENT__TIMEOUT_MS", "5000");
            jail.set_env("CQHTTP_LOGGING__OUTPUT", "stderr");

            let config = ConfigLoader::new()
                .search_path(jail.directory())
                .load()
                .unwrap();
            assert_eq!(config.client.base_url, "http://10.0.0.2:5700");
            assert_eq!(config.client.session, SessionMode::Pooled);
            assert_eq!(config.client.timeout_ms, 5000);
            assert_eq!(config.logging.level, LogLevel::Debug);
            assert_eq!(config.logging.format, LogFormat::Pretty);
            assert_eq!(config.logging.output, LogOutput::Stderr);
            assert_eq!(config.logging.filters["cqhttp_transport"], LogLevel::Trace);
            Ok(())
        });
    }

    #[test]
    #[cfg(feature = "toml-config")]
    fn test_profile_file_is_overridden_by_base() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "cqhttp.production.toml",
                "[client]\nbase_url = \"http://prod:5700\"\ntimeout_ms = 1000\n",
            )?;
            jail.create_file("cqhttp.toml", "[client]\ntimeout_ms = 2000\n")?;

            let config = ConfigLoader::new()
                .profile("prod")
                .search_path(jail.directory())
                .without_env()
                .load()
                .unwrap();
            assert_eq!(config.client.base_url, "http://prod:5700");
            assert_eq!(config.client.timeout_ms, 2000);
            Ok(())
        });
    }

    #[test]
    fn test_merge_layer_below_env() {
        Jail::expect_with(|jail| {
            jail.set_env("CQHTTP_CLIENT__BASE_URL", "http://env:5700");
            let mut layer = CqhttpConfig::default();
            layer.client.base_url = "http://merged:5700".into();
            layer.client.timeout_ms = 1234;

            let config = ConfigLoader::new()
                .search_path(jail.directory())
                .merge(layer)
                .load()
                .unwrap();
            assert_eq!(config.client.base_url, "http://env:5700");
            assert_eq!(config.client.timeout_ms, 1234);
            Ok(())
        });
    }

    #[test]
    fn test_missing_explicit_file() {
        Jail::expect_with(|jail| {
            let err = ConfigLoader::new()
                .file(jail.directory().join("absent.toml"))
                .load()
                .unwrap_err();
            assert!(matches!(err, ConfigError::FileNotFound(_)));
            Ok(())
        });
    }

    #[test]
    fn test_bad_value_is_extract_error() {
        Jail::expect_with(|jail| {
            jail.set_env("CQHTTP_CLIENT__SESSION", "sometimes");
            let err = ConfigLoader::new()
                .search_path(jail.directory())
                .load()
                .unwrap_err();
            assert!(matches!(err, ConfigError::Extract(_)));
            Ok(())
        });
    }

    #[test]
    fn test_profile_parse() {
        assert_eq!(Profile::parse("PROD"), Profile::Production);
        assert_eq!(Profile::parse("dev"), Profile::Development);
        assert_eq!(Profile::parse("staging").as_str(), "staging");
    }
}
