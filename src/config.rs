// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Editor settings file.
//!
//! Settings are read from a YAML file. Lookup order: `--config` argument,
//! `TONETRACK_CONFIG` environment variable, `tonetrack.yaml` in the working
//! directory. A missing file yields the defaults; `TONETRACK_API_URL`
//! overrides the service address in every case.

use crate::constants::DEFAULT_TOTAL_DURATION;
use crate::models::interaction::SnapMode;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "tonetrack.yaml";
pub const CONFIG_ENV: &str = "TONETRACK_CONFIG";
pub const API_URL_ENV: &str = "TONETRACK_API_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Base address of the annotation service.
    pub api_base_url: String,
    pub fetch_audio_path: String,
    pub submit_audio_path: String,
    pub save_json_path: String,
    pub request_timeout_secs: u64,
    /// Timeline length used until media reports its own.
    pub default_duration_secs: f64,
    pub snap_mode: SnapMode,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000".to_string(),
            fetch_audio_path: "/api/audio".to_string(),
            submit_audio_path: "/api/audio/upload".to_string(),
            save_json_path: "/api/annotations".to_string(),
            request_timeout_secs: 30,
            default_duration_secs: DEFAULT_TOTAL_DURATION,
            snap_mode: SnapMode::OnRelease,
        }
    }
}

impl EditorConfig {
    /// Parse settings from YAML text.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config = serde_yaml::from_str(yaml).context("Invalid settings file")?;
        Ok(config)
    }

    /// Read settings from a file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings {}", path.display()))?;
        Self::from_yaml(&yaml)
    }

    /// Resolve and load settings, then apply environment overrides.
    pub fn load(cli_path: Option<&Path>) -> Result<Self> {
        let explicit = cli_path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var(CONFIG_ENV).ok().map(PathBuf::from));

        let mut config = match explicit {
            // An explicitly named file must exist.
            Some(path) => Self::from_file(&path)?,
            None => {
                let local = PathBuf::from(CONFIG_FILE_NAME);
                if local.exists() {
                    Self::from_file(&local)?
                } else {
                    log::debug!("No settings file, using defaults");
                    Self::default()
                }
            }
        };
        config.apply_api_url_override(std::env::var(API_URL_ENV).ok());
        config.sanitize();
        Ok(config)
    }

    /// Replace the service address when an override is present.
    pub fn apply_api_url_override(&mut self, api_url: Option<String>) {
        if let Some(url) = api_url.filter(|url| !url.trim().is_empty()) {
            log::info!("Service address overridden to {}", url);
            self.api_base_url = url;
        }
    }

    fn sanitize(&mut self) {
        if !self.default_duration_secs.is_finite() || self.default_duration_secs <= 0.0 {
            log::warn!(
                "Ignoring default duration {}, using {}",
                self.default_duration_secs,
                DEFAULT_TOTAL_DURATION
            );
            self.default_duration_secs = DEFAULT_TOTAL_DURATION;
        }
        if self.request_timeout_secs == 0 {
            self.request_timeout_secs = 30;
        }
    }

    /// Join the base address with an endpoint path.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_uses_defaults() {
        let config = EditorConfig::from_yaml("api_base_url: https://annotate.example.org\nsnap_mode: live\n")
            .unwrap();
        assert_eq!(config.api_base_url, "https://annotate.example.org");
        assert_eq!(config.snap_mode, SnapMode::Live);
        assert_eq!(config.default_duration_secs, DEFAULT_TOTAL_DURATION);
        assert_eq!(config.save_json_path, EditorConfig::default().save_json_path);
    }

    #[test]
    fn test_bad_snap_mode_is_an_error() {
        assert!(EditorConfig::from_yaml("snap_mode: sometimes\n").is_err());
    }

    #[test]
    fn test_api_url_override() {
        let mut config = EditorConfig::default();
        config.apply_api_url_override(Some("  ".to_string()));
        assert_eq!(config.api_base_url, "http://localhost:5000");
        config.apply_api_url_override(Some("http://10.0.0.2:8000".to_string()));
        assert_eq!(config.api_base_url, "http://10.0.0.2:8000");
    }

    #[test]
    fn test_sanitize() {
        let mut config = EditorConfig::from_yaml("default_duration_secs: -3\nrequest_timeout_secs: 0\n").unwrap();
        config.sanitize();
        assert_eq!(config.default_duration_secs, DEFAULT_TOTAL_DURATION);
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn test_endpoint_joining() {
        let mut config = EditorConfig::default();
        config.api_base_url = "http://host:1/".to_string();
        assert_eq!(config.endpoint("/api/audio"), "http://host:1/api/audio");
        assert_eq!(config.endpoint("save"), "http://host:1/save");
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        assert!(EditorConfig::load(Some(Path::new("/nonexistent/tonetrack.yaml"))).is_err());
    }
}
