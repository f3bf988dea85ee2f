use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{DebateError, Result};

/// Default store location, relative to the working directory
pub const DEFAULT_DATABASE_URL: &str = "sqlite://db/masterdebater.db";

/// Default HTTP bind address
pub const DEFAULT_BIND: &str = "127.0.0.1:8000";

/// Centralized configuration for MasterDebater
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MasterDebaterConfig {
    pub database: DatabaseConfig,
    pub server: ServerSection,
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub bind: String,
    pub cors_permissive: bool,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            cors_permissive: false,
        }
    }
}

impl MasterDebaterConfig {
    /// Load config.
    ///
    /// An explicit path must exist. Without one, `~/.masterdebater/config.toml`
    /// is read if present, otherwise defaults apply. Environment overrides
    /// (`DATABASE_URL`, `MASTERDEBATER_BIND`) are applied last.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => {
                let path = Self::config_path();
                if path.exists() {
                    Self::from_file(&path)?
                } else {
                    tracing::debug!(path = %path.display(), "No config file, using defaults");
                    Self::default()
                }
            }
        };

        config.apply_env();
        Ok(config)
    }

    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| DebateError::config(path, format!("failed to read: {}", e)))?;

        Self::from_toml(&content).map_err(|e| match e {
            DebateError::Config { reason, .. } => DebateError::config(path, reason),
            other => other,
        })
    }

    /// Parse config from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| DebateError::config("<inline>", format!("invalid TOML: {}", e)))?;

        if config.database.max_connections == 0 {
            return Err(DebateError::config(
                "<inline>",
                "database.max_connections must be at least 1",
            ));
        }

        Ok(config)
    }

    /// Get config file path: ~/.masterdebater/config.toml
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".masterdebater/config.toml")
    }

    fn apply_env(&mut self) {
        if let Ok(url) = env::var("DATABASE_URL") {
            if !url.is_empty() {
                self.database.url = url;
            }
        }
        if let Ok(bind) = env::var("MASTERDEBATER_BIND") {
            if !bind.is_empty() {
                self.server.bind = bind;
            }
        }
    }
}
