// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 Basecoat contributors

//! Persisted settings: the Gemini API key plus engine knobs

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::Result;

/// Application settings, persisted as pretty JSON.
///
/// Only `api_key` is required in the file; the engine fields fall back to
/// defaults so a bare `{"api_key": "..."}` file loads unchanged.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Settings {
    /// Google Gemini API key. Empty means "not configured".
    #[serde(default)]
    pub api_key: String,

    /// Vision model used for analysis
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the Gemini REST API
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_timeout() -> u64 {
    120
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            endpoint: default_endpoint(),
            timeout_secs: default_timeout(),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file.
    ///
    /// A missing or malformed file yields defaults (empty key) rather than
    /// an error, so startup never fails on a bad settings file.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(settings) => settings,
                Err(e) => {
                    tracing::warn!("Malformed settings file {:?}: {}, using defaults", path, e);
                    Self::default()
                }
            },
            Err(_) => {
                tracing::debug!("Settings file not found at {:?}, using defaults", path);
                Self::default()
            }
        }
    }

    /// Save settings to a JSON file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Whether an API key has been configured
    pub fn has_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let mut settings = Settings::default();
        settings.api_key = "X".to_string();
        settings.save(&path).unwrap();

        let loaded = Settings::load(&path);
        assert_eq!(loaded.api_key, "X");
        assert_eq!(loaded, settings);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Settings::load(&dir.path().join("nope.json"));
        assert_eq!(loaded, Settings::default());
        assert!(!loaded.has_key());
    }

    #[test]
    fn malformed_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{not json").unwrap();

        let loaded = Settings::load(&path);
        assert_eq!(loaded, Settings::default());
    }

    #[test]
    fn bare_api_key_file_loads_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"api_key": "abc123"}"#).unwrap();

        let loaded = Settings::load(&path);
        assert_eq!(loaded.api_key, "abc123");
        assert_eq!(loaded.model, "gemini-2.5-flash");
        assert_eq!(loaded.timeout_secs, 120);
    }
}
