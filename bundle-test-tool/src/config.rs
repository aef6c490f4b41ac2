//! CLI configuration management
//!
//! Handles loading and saving `bundle_test_tool` configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding the service URL
pub const ENV_SERVER: &str = "BUNDLE_TOOL_SERVER";
/// Environment variable overriding the output format
pub const ENV_FORMAT: &str = "BUNDLE_TOOL_FORMAT";
/// Environment variable overriding verbose logging
pub const ENV_VERBOSE: &str = "BUNDLE_TOOL_VERBOSE";
/// Environment variable overriding the request timeout
pub const ENV_TIMEOUT: &str = "BUNDLE_TOOL_TIMEOUT";

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CliConfig {
    /// Bundle manager service URL
    pub server_url: String,

    /// Default output format
    pub output_format: String,

    /// Enable verbose logging by default
    pub verbose: bool,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8620".to_string(),
            output_format: "text".to_string(),
            verbose: false,
            timeout: 10,
        }
    }
}

impl CliConfig {
    /// Load configuration from file or create default
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).context("Failed to read CLI config file")?;
        toml::from_str(&content).context("Failed to parse CLI config file")
    }

    /// Save configuration to the default file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize CLI config")?;
        std::fs::write(path, content).context("Failed to write CLI config file")?;

        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = match std::env::var("XDG_CONFIG_HOME") {
            Ok(xdg_config) if !xdg_config.is_empty() => PathBuf::from(xdg_config),
            _ => dirs::config_dir()
                .ok_or_else(|| anyhow::anyhow!("Cannot determine config directory"))?,
        };

        Ok(config_dir.join("bundle_test_tool").join("config.toml"))
    }

    /// Set one key, validating its value.
    ///
    /// Keys are `server_url`, `output_format`, `verbose` and `timeout`.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "server_url" => {
                ConfigBuilder::validate_url(value)?;
                self.server_url = value.to_string();
            }
            "output_format" => {
                ConfigBuilder::validate_output_format(value)?;
                self.output_format = value.to_string();
            }
            "verbose" => {
                self.verbose = parse_bool(value)
                    .ok_or_else(|| anyhow::anyhow!("Invalid verbose value '{}'", value))?;
            }
            "timeout" => {
                let timeout: u64 = value
                    .parse()
                    .with_context(|| format!("Invalid timeout '{}'", value))?;
                ConfigBuilder::validate_timeout(timeout)?;
                self.timeout = timeout;
            }
            _ => {
                return Err(anyhow::anyhow!(
                    "Unknown config key '{}'. Valid keys: server_url, output_format, verbose, timeout",
                    key
                ))
            }
        }
        Ok(())
    }

    /// Create a new builder for constructing configuration
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// Builder for CLI configuration with validation and priority chain support
///
/// Priority chain (lowest to highest):
/// 1. Defaults
/// 2. Config file
/// 3. Environment variables
/// 4. CLI arguments
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    server_url: Option<String>,
    output_format: Option<String>,
    verbose: Option<bool>,
    timeout: Option<u64>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set server URL (with validation)
    pub fn with_server_url(mut self, url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        Self::validate_url(&url)?;
        self.server_url = Some(url);
        Ok(self)
    }

    /// Set output format (with validation)
    pub fn with_output_format(mut self, format: impl Into<String>) -> Result<Self> {
        let format = format.into();
        Self::validate_output_format(&format)?;
        self.output_format = Some(format);
        Ok(self)
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }

    /// Set timeout (with validation)
    pub fn with_timeout(mut self, timeout: u64) -> Result<Self> {
        Self::validate_timeout(timeout)?;
        self.timeout = Some(timeout);
        Ok(self)
    }

    /// Fill unset values from the config file
    pub fn with_config_file(self, load_file: bool) -> Result<Self> {
        if !load_file {
            return Ok(self);
        }

        match CliConfig::load() {
            Ok(config) => Ok(self.merge(config)),
            Err(_) => Ok(self),
        }
    }

    /// Fill unset values from a given config file
    pub fn with_config_path(self, path: &Path) -> Result<Self> {
        let config = CliConfig::load_from(path)?;
        Ok(self.merge(config))
    }

    fn merge(self, config: CliConfig) -> Self {
        Self {
            server_url: self.server_url.or(Some(config.server_url)),
            output_format: self.output_format.or(Some(config.output_format)),
            verbose: self.verbose.or(Some(config.verbose)),
            timeout: self.timeout.or(Some(config.timeout)),
        }
    }

    /// Apply environment variable overrides to values not already set
    pub fn with_env_overrides(mut self) -> Self {
        if self.server_url.is_none() {
            if let Ok(server_url) = std::env::var(ENV_SERVER) {
                if Self::validate_url(&server_url).is_ok() {
                    self.server_url = Some(server_url);
                }
            }
        }

        if self.output_format.is_none() {
            if let Ok(format) = std::env::var(ENV_FORMAT) {
                if Self::validate_output_format(&format).is_ok() {
                    self.output_format = Some(format);
                }
            }
        }

        if self.verbose.is_none() {
            if let Ok(verbose) = std::env::var(ENV_VERBOSE) {
                self.verbose = parse_bool(&verbose);
            }
        }

        if self.timeout.is_none() {
            if let Ok(timeout) = std::env::var(ENV_TIMEOUT) {
                if let Ok(timeout) = timeout.parse() {
                    if Self::validate_timeout(timeout).is_ok() {
                        self.timeout = Some(timeout);
                    }
                }
            }
        }

        self
    }

    /// Build the final configuration with validation
    pub fn build(self) -> Result<CliConfig> {
        let defaults = CliConfig::default();

        let server_url = self.server_url.unwrap_or(defaults.server_url);
        let output_format = self.output_format.unwrap_or(defaults.output_format);
        let timeout = self.timeout.unwrap_or(defaults.timeout);

        Self::validate_url(&server_url)?;
        Self::validate_output_format(&output_format)?;
        Self::validate_timeout(timeout)?;

        Ok(CliConfig {
            server_url,
            output_format,
            verbose: self.verbose.unwrap_or(defaults.verbose),
            timeout,
        })
    }

    fn validate_url(url: &str) -> Result<()> {
        if url.is_empty() {
            return Err(anyhow::anyhow!("Server URL cannot be empty"));
        }

        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(anyhow::anyhow!("Server URL must start with http:// or https://"));
        }

        Ok(())
    }

    fn validate_output_format(format: &str) -> Result<()> {
        match format {
            "text" | "json" => Ok(()),
            _ => Err(anyhow::anyhow!(
                "Invalid output format '{}'. Must be 'text' or 'json'",
                format
            )),
        }
    }

    fn validate_timeout(timeout: u64) -> Result<()> {
        if timeout == 0 {
            return Err(anyhow::anyhow!("Timeout must be greater than 0"));
        }

        if timeout > 300 {
            return Err(anyhow::anyhow!("Timeout must be less than or equal to 300 seconds"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for var in [ENV_SERVER, ENV_FORMAT, ENV_VERBOSE, ENV_TIMEOUT] {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert_eq!(config.server_url, "http://127.0.0.1:8620");
        assert_eq!(config.output_format, "text");
        assert!(!config.verbose);
        assert_eq!(config.timeout, 10);
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        assert_eq!(CliConfig::load_from(&path).unwrap(), CliConfig::default());

        let mut config = CliConfig::default();
        config.set("server_url", "http://10.0.0.2:8620").unwrap();
        config.set("timeout", "30").unwrap();
        config.save_to(&path).unwrap();

        let loaded = CliConfig::load_from(&path).unwrap();
        assert_eq!(loaded.server_url, "http://10.0.0.2:8620");
        assert_eq!(loaded.timeout, 30);
    }

    #[test]
    fn test_set_rejects_invalid_values() {
        let mut config = CliConfig::default();
        assert!(config.set("server_url", "ftp://example.com").is_err());
        assert!(config.set("output_format", "table").is_err());
        assert!(config.set("verbose", "maybe").is_err());
        assert!(config.set("timeout", "0").is_err());
        assert!(config.set("colour", "red").is_err());
        assert_eq!(config, CliConfig::default());

        config.set("verbose", "yes").unwrap();
        assert!(config.verbose);
    }

    #[test]
    fn test_builder_with_defaults() {
        let config = ConfigBuilder::new().build().unwrap();
        assert_eq!(config, CliConfig::default());
    }

    #[test]
    fn test_builder_with_custom_values() {
        let config = ConfigBuilder::new()
            .with_server_url("http://example.com:8080")
            .unwrap()
            .with_output_format("json")
            .unwrap()
            .with_verbose(true)
            .with_timeout(30)
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(config.server_url, "http://example.com:8080");
        assert_eq!(config.output_format, "json");
        assert!(config.verbose);
        assert_eq!(config.timeout, 30);
    }

    #[test]
    fn test_builder_validation() {
        assert!(ConfigBuilder::new().with_server_url("").is_err());
        assert!(ConfigBuilder::new()
            .with_server_url("ftp://example.com")
            .is_err());
        assert!(ConfigBuilder::new()
            .with_server_url("https://example.com")
            .is_ok());

        assert!(ConfigBuilder::new().with_output_format("xml").is_err());
        assert!(ConfigBuilder::new().with_output_format("text").is_ok());

        assert!(ConfigBuilder::new().with_timeout(0).is_err());
        assert!(ConfigBuilder::new().with_timeout(301).is_err());
        assert!(ConfigBuilder::new().with_timeout(300).is_ok());
    }

    #[test]
    fn test_builder_file_fills_unset_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file_config = CliConfig::default();
        file_config.server_url = "http://file.example.com".to_string();
        file_config.timeout = 42;
        file_config.save_to(&path).unwrap();

        let config = ConfigBuilder::new()
            .with_timeout(5)
            .unwrap()
            .with_config_path(&path)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(config.server_url, "http://file.example.com");
        assert_eq!(config.timeout, 5);
    }

    #[test]
    #[serial]
    fn test_builder_with_env_overrides() {
        clear_env();
        std::env::set_var(ENV_SERVER, "http://env.example.com:9000");
        std::env::set_var(ENV_FORMAT, "json");
        std::env::set_var(ENV_VERBOSE, "true");
        std::env::set_var(ENV_TIMEOUT, "25");

        let config = ConfigBuilder::new().with_env_overrides().build().unwrap();

        assert_eq!(config.server_url, "http://env.example.com:9000");
        assert_eq!(config.output_format, "json");
        assert!(config.verbose);
        assert_eq!(config.timeout, 25);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_builder_priority_chain() {
        clear_env();
        std::env::set_var(ENV_SERVER, "http://env.example.com:9000");
        std::env::set_var(ENV_TIMEOUT, "25");

        let config = ConfigBuilder::new()
            .with_server_url("http://cli.example.com:7000")
            .unwrap()
            .with_env_overrides()
            .build()
            .unwrap();

        assert_eq!(config.server_url, "http://cli.example.com:7000");
        assert_eq!(config.timeout, 25);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_builder_invalid_env_values_ignored() {
        clear_env();
        std::env::set_var(ENV_TIMEOUT, "invalid");
        std::env::set_var(ENV_FORMAT, "xml");

        let config = ConfigBuilder::new().with_env_overrides().build().unwrap();

        assert_eq!(config.timeout, 10);
        assert_eq!(config.output_format, "text");

        clear_env();
    }
}
