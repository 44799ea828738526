//! Runtime configuration
//!
//! Loaded from a YAML file; every field has a default so an absent or
//! partial file is valid.

use crate::engine::{EngineFactory, EngineSettings, HttpExtractionService, ServiceError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("cannot create extraction service client: {0}")]
    Service(#[from] ServiceError),
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_log_filter() -> String {
    "info".to_string()
}

/// Where the extraction service lives. Without a base URL only local
/// engines can run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub engines: EngineSettings,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            service: ServiceConfig::default(),
            engines: EngineSettings::default(),
            log_filter: default_log_filter(),
        }
    }
}

impl RuntimeConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to null, not to an empty mapping.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }

    /// Load from `path` if given, else use defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    /// Build an engine factory wired to the configured service, if any.
    pub fn engine_factory(&self) -> Result<EngineFactory, ConfigError> {
        match &self.service.base_url {
            Some(url) => {
                let service = HttpExtractionService::new(url, self.service.timeout_secs)?;
                tracing::debug!(
                    base_url = service.base_url(),
                    timeout_secs = self.service.timeout_secs,
                    "extraction service configured"
                );
                Ok(EngineFactory::with_service(self.engines.clone(), Arc::new(service)))
            }
            None => Ok(EngineFactory::local(self.engines.clone())),
        }
    }
}
