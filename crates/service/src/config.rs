//! Service configuration
//!
//! Defaults, an optional TOML file named by `STORECAST_CONFIG`, then
//! environment overrides on top, in that order.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Socket address the HTTP server binds
    pub listen_addr: String,
    /// Path of the model artifact file served and reloaded
    pub model_path: PathBuf,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            model_path: PathBuf::from("models/active.json"),
        }
    }
}

impl ServiceConfig {
    /// Load configuration for this process.
    pub fn load() -> Result<Self> {
        let mut config = match env::var("STORECAST_CONFIG") {
            Ok(path) if !path.trim().is_empty() => {
                let content = std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read config file {path}"))?;
                toml::from_str(&content)
                    .with_context(|| format!("failed to parse config file {path}"))?
            }
            _ => Self::default(),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = env::var("STORECAST_LISTEN_ADDR") {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                self.listen_addr = trimmed.to_string();
            }
        }
        if let Ok(value) = env::var("STORECAST_MODEL_PATH") {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                self.model_path = PathBuf::from(trimmed);
            }
        }
    }
}
