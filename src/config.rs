//! Service configuration loaded from TOML.
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 3001
//!
//! [search]
//! sources = ["retailmenot", "honey", "google-shopping"]
//! max_results = 5
//! timeout_seconds = 10
//! ```

use std::path::{Path, PathBuf};

use coupon_search::SearchConfig;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ServiceError};

/// Listener settings for the HTTP API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 3001,
        }
    }
}

/// Complete service configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub search: SearchConfig,
}

impl ServiceConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| ServiceError::Config(e.to_string()))
    }

    /// Load `path` if it exists, otherwise return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or
    /// if the resulting search settings are invalid.
    pub fn load(path: &Path) -> Result<Self> {
        let config = if path.exists() {
            Self::from_file(path)?
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Self::default()
        };
        config.search.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| ServiceError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Override the listen port from a `PORT`-style value. Blank values are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Config`] if the value is not a valid port.
    pub fn with_port_override(mut self, port: Option<&str>) -> Result<Self> {
        if let Some(raw) = port.map(str::trim).filter(|p| !p.is_empty()) {
            self.server.port = raw
                .parse()
                .map_err(|_| ServiceError::Config(format!("invalid PORT value: {raw}")))?;
        }
        Ok(self)
    }

    /// `host:port` for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Returns the default config file path: `~/.config/coupon-scout/config.toml`.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join("coupon-scout")
            .join("config.toml")
    }
}
