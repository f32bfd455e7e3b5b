// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Configuration management for PlantVision

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::history::HISTORY_KEY;

/// Main application configuration
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    /// Where the analysis history lives
    #[serde(default)]
    pub storage: StorageConfig,

    /// Classifier behaviour
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Plant catalog source
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Web API settings
    #[serde(default)]
    pub web: WebConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Sqlite,
    File,
    Memory,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// Database file for `sqlite`, directory for `file`; ignored for `memory`
    #[serde(default = "default_storage_path")]
    pub path: String,
    #[serde(default = "default_storage_key")]
    pub key: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ClassifierConfig {
    #[serde(default = "default_min_delay_ms")]
    pub min_delay_ms: u64,
    #[serde(default = "default_jitter_ms")]
    pub jitter_ms: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct CatalogConfig {
    /// JSON catalog replacing the built-in plants
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct WebConfig {
    #[serde(default = "default_web_host")]
    pub host: String,
    #[serde(default = "default_web_port")]
    pub port: u16,
}

// Default value functions
fn default_storage_path() -> String { "plantvision.db".to_string() }
fn default_storage_key() -> String { HISTORY_KEY.to_string() }
fn default_min_delay_ms() -> u64 { 2000 }
fn default_jitter_ms() -> u64 { 3000 }
fn default_web_host() -> String { "127.0.0.1".to_string() }
fn default_web_port() -> u16 { 8080 }

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: default_storage_path(),
            key: default_storage_key(),
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: default_min_delay_ms(),
            jitter_ms: default_jitter_ms(),
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_web_host(),
            port: default_web_port(),
        }
    }
}

impl CatalogConfig {
    pub fn path_buf(&self) -> Option<PathBuf> {
        self.path.as_ref().map(PathBuf::from)
    }
}

impl AppConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = serde_json::from_str(&content)
                .map_err(|e| {
                    crate::PlantVisionError::Config(format!("Failed to parse config: {}", e))
                })?;
            config.validate()?;
            Ok(config)
        } else {
            tracing::info!("Config file not found at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject settings that can never work
    pub fn validate(&self) -> crate::Result<()> {
        if self.storage.key.trim().is_empty() {
            return Err(crate::PlantVisionError::Config(
                "storage.key must not be empty".to_string(),
            ));
        }
        if self.storage.backend != StorageBackend::Memory && self.storage.path.trim().is_empty() {
            return Err(crate::PlantVisionError::Config(
                "storage.path must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
