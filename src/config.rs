// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Configuration persistence for kubesel
//!
//! Stores user preferences like the default output format in a config file.
//! All kubesel data is stored under ~/.kubesel/:
//! - ~/.kubesel/config.json - user configuration
//! - ~/.kubesel/history - REPL command history
//! - ~/.kubesel/log/ - log files

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Get the base kubesel directory (~/.kubesel/)
pub fn base_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|p| p.join(".kubesel"))
        .context("Could not determine home directory")
}

/// Get the REPL history file path (~/.kubesel/history)
pub fn history_path() -> Result<PathBuf> {
    Ok(base_dir()?.join("history"))
}

/// kubesel configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Default output format ("raw", "json" or "yaml"); used when no -o flag
    /// is given
    #[serde(default)]
    pub default_output: Option<String>,
}

impl Config {
    /// Load config from disk, or return default if not found
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to disk
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Get the config file path (~/.kubesel/config.json)
    pub fn config_path() -> Result<PathBuf> {
        Ok(base_dir()?.join("config.json"))
    }

    /// Update the default output format and save
    pub fn set_default_output(&mut self, format: &str) -> Result<()> {
        self.default_output = Some(format.to_string());
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.default_output.is_none());
    }

    #[test]
    fn test_config_serialize() {
        let config = Config {
            default_output: Some("json".to_string()),
        };
        let json = serde_json::to_string_pretty(&config).unwrap();
        assert!(json.contains("default_output"));
        assert!(json.contains("json"));
    }

    #[test]
    fn test_config_deserialize() {
        let json = r#"{"default_output": "yaml"}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.default_output.as_deref(), Some("yaml"));
    }

    #[test]
    fn test_config_deserialize_empty() {
        let json = "{}";
        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.default_output.is_none());
    }

    #[test]
    fn test_config_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");

        // Save config
        let config = Config {
            default_output: Some("raw".to_string()),
        };
        let content = serde_json::to_string_pretty(&config).unwrap();
        fs::write(&config_path, content).unwrap();

        // Load and verify
        let loaded_content = fs::read_to_string(&config_path).unwrap();
        let loaded: Config = serde_json::from_str(&loaded_content).unwrap();
        assert_eq!(loaded.default_output.as_deref(), Some("raw"));
    }
}
