//! Client configuration
//!
//! Loaded from TOML, then overridden by environment variables. Every field
//! has a default so an empty file (or no file) is a valid configuration.
//!
//! ```toml
//! [server]
//! base_url = "http://localhost:5000"
//! request_timeout_ms = 30000
//!
//! [pacing]
//! stage_delay_ms = 300
//! results_delay_ms = 1000
//!
//! [output]
//! report_dir = "reports"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::progress::Pacing;

pub const ENV_SERVER_URL: &str = "NORMCONTROL_SERVER_URL";
pub const ENV_REPORT_DIR: &str = "NORMCONTROL_REPORT_DIR";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub server: ServerConfig,
    pub pacing: PacingConfig,
    pub output: OutputConfig,
}

impl ClientConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary lookup (the environment in production)
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_SERVER_URL).filter(|v| !v.is_empty()) {
            self.server.base_url = url;
        }
        if let Some(dir) = lookup(ENV_REPORT_DIR).filter(|v| !v.is_empty()) {
            self.output.report_dir = PathBuf::from(dir);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub base_url: String,
    pub upload_path: String,
    pub analyze_path: String,
    pub report_path: String,
    /// Per-request timeout; unset means wait indefinitely
    pub request_timeout_ms: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            upload_path: "/upload".to_string(),
            analyze_path: "/analyze".to_string(),
            report_path: "/report".to_string(),
            request_timeout_ms: None,
        }
    }
}

impl ServerConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Join the base URL and an endpoint path with exactly one slash
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub fn upload_url(&self) -> String {
        self.endpoint(&self.upload_path)
    }

    pub fn analyze_url(&self) -> String {
        self.endpoint(&self.analyze_path)
    }

    pub fn report_url(&self) -> String {
        self.endpoint(&self.report_path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    pub stage_delay_ms: u64,
    pub results_delay_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        let pacing = Pacing::default();
        Self {
            stage_delay_ms: pacing.stage_delay.as_millis() as u64,
            results_delay_ms: pacing.results_delay.as_millis() as u64,
        }
    }
}

impl PacingConfig {
    pub fn pacing(&self) -> Pacing {
        Pacing {
            stage_delay: Duration::from_millis(self.stage_delay_ms),
            results_delay: Duration::from_millis(self.results_delay_ms),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub report_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            report_dir: PathBuf::from("."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = ClientConfig::from_toml("").unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.server.upload_url(), "http://localhost:5000/upload");
        assert_eq!(config.pacing.pacing(), Pacing::default());
        assert_eq!(config.server.request_timeout_ms, None);
    }

    #[test]
    fn test_partial_config() {
        let config = ClientConfig::from_toml(
            r#"
            [server]
            base_url = "https://normcontrol.example/api/"
            request_timeout_ms = 5000

            [pacing]
            results_delay_ms = 0
            "#,
        )
        .unwrap();

        assert_eq!(
            config.server.analyze_url(),
            "https://normcontrol.example/api/analyze"
        );
        assert_eq!(config.server.request_timeout_ms, Some(5000));
        assert_eq!(config.pacing.stage_delay_ms, 300);
        assert_eq!(config.pacing.pacing().results_delay, Duration::ZERO);
    }

    #[test]
    fn test_malformed_config() {
        let err = ClientConfig::from_toml("[server]\nbase_url = 5").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = ClientConfig::from_file("/nonexistent/normcontrol.toml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/normcontrol.toml"));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("normcontrol.toml");
        std::fs::write(&path, "[output]\nreport_dir = \"out\"\n").unwrap();

        let config = ClientConfig::from_file(&path).unwrap();
        assert_eq!(config.output.report_dir, PathBuf::from("out"));
    }

    #[test]
    fn test_overrides() {
        let mut config = ClientConfig::default();
        config.apply_overrides(|key| match key {
            ENV_SERVER_URL => Some("http://10.0.0.5:8000".to_string()),
            ENV_REPORT_DIR => Some(String::new()),
            _ => None,
        });
        assert_eq!(config.server.base_url, "http://10.0.0.5:8000");
        assert_eq!(config.output.report_dir, PathBuf::from("."));
    }

    #[test]
    fn test_endpoint_join() {
        let server = ServerConfig::with_base_url("http://host:1");
        assert_eq!(server.endpoint("/report"), "http://host:1/report");
        assert_eq!(server.endpoint("report"), "http://host:1/report");
    }
}
