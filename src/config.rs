//! Configuration for annex-remote
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{AnnexError, Result};

/// Main configuration for a special remote session
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Protocol Configuration
    // -------------------------------------------------------------------------
    /// Protocol version announced as `VERSION <n>` when the session starts
    pub protocol_version: u32,

    /// Extensions this remote supports, sent in reply to `EXTENSIONS`
    pub extensions: Vec<String>,

    // -------------------------------------------------------------------------
    // Logging Configuration
    // -------------------------------------------------------------------------
    /// Filter directive used when `RUST_LOG` is not set
    pub log_filter: String,

    /// Log destination. Stdout carries the protocol, so the default is stderr.
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            protocol_version: crate::PROTOCOL_VERSION,
            extensions: vec!["INFO".to_string()],
            log_filter: "warn".to_string(),
            log_file: None,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check that every field can be expressed on the wire
    pub fn validate(&self) -> Result<()> {
        if self.protocol_version == 0 {
            return Err(AnnexError::Config(
                "protocol version must be at least 1".to_string(),
            ));
        }

        if let Some(bad) = self
            .extensions
            .iter()
            .find(|ext| ext.is_empty() || ext.contains(char::is_whitespace))
        {
            return Err(AnnexError::Config(format!(
                "invalid extension name: {:?}",
                bad
            )));
        }

        if self.log_filter.trim().is_empty() {
            return Err(AnnexError::Config("log filter is empty".to_string()));
        }

        Ok(())
    }

    /// Whether this remote advertises the given extension
    pub fn supports_extension(&self, name: &str) -> bool {
        self.extensions.iter().any(|ext| ext == name)
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the announced protocol version
    pub fn protocol_version(mut self, version: u32) -> Self {
        self.config.protocol_version = version;
        self
    }

    /// Replace the list of supported extensions
    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Set the fallback log filter
    pub fn log_filter(mut self, filter: impl Into<String>) -> Self {
        self.config.log_filter = filter.into();
        self
    }

    /// Send logs to a file instead of stderr
    pub fn log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.log_file = Some(path.into());
        self
    }

    /// Build and validate the config
    pub fn build(self) -> Result<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}
