//! Configuration Management
//!
//! Handles persistent configuration storage for cio. Values are resolved
//! in order: command-line flag, environment, config file, built-in default.
//! Flags and environment are merged by clap before they reach [`Overrides`].

use crate::format::OutputFormat;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_ENDPOINT: &str = "https://clients.concerto.io:886/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the Concerto API
    pub endpoint: String,
    /// Client certificate (PEM)
    pub cert: Option<PathBuf>,
    /// Client private key (PEM)
    pub key: Option<PathBuf>,
    /// CA bundle used to verify the API server
    pub ca_cert: Option<PathBuf>,
    pub timeout_secs: u64,
    /// Default output format
    pub output: Option<OutputFormat>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            cert: None,
            key: None,
            ca_cert: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            output: None,
        }
    }
}

/// Values given on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub endpoint: Option<String>,
    pub cert: Option<PathBuf>,
    pub key: Option<PathBuf>,
    pub ca_cert: Option<PathBuf>,
    pub output: Option<OutputFormat>,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("cio").join("config.json"))
    }

    /// Load configuration from disk, falling back to defaults
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("ignoring config file: {:#}", e);
                Self::default()
            }
        }
    }

    /// Load configuration from `path`; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Apply command-line and environment values on top of the file values
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(endpoint) = overrides.endpoint {
            self.endpoint = endpoint;
        }
        if overrides.cert.is_some() {
            self.cert = overrides.cert;
        }
        if overrides.key.is_some() {
            self.key = overrides.key;
        }
        if overrides.ca_cert.is_some() {
            self.ca_cert = overrides.ca_cert;
        }
        if overrides.output.is_some() {
            self.output = overrides.output;
        }
        self
    }

    /// Get effective output format (CLI > config > text)
    pub fn effective_output(&self) -> OutputFormat {
        self.output.unwrap_or_default()
    }

    /// Set the endpoint in the default config file
    pub fn set_endpoint(endpoint: &str) -> Result<PathBuf> {
        let path = Self::config_path().context("no configuration directory on this system")?;
        Self::set_endpoint_in(&path, endpoint)?;
        Ok(path)
    }

    /// Set the endpoint in the file at `path`, keeping its other values.
    ///
    /// An unreadable file is an error rather than a reason to start over
    /// from defaults, so stored certificates are never dropped.
    pub fn set_endpoint_in(path: &Path, endpoint: &str) -> Result<()> {
        let mut config = Self::load_from(path)?;
        config.endpoint = endpoint.to_string();
        config.save_to(path)
    }
}
