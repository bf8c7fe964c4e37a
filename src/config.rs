//! Configuration for the Anamnesis notes client
//!
//! Layered loading: built-in defaults, then an optional TOML file (by
//! default under the user config directory), then `ANAMNESIS_*` environment
//! variables. The result is one plain struct handed to the pieces that need
//! it.

use crate::error::Result;
use crate::types::IgnoreList;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Window titles treated as noise out of the box
const DEFAULT_IGNORED_TITLES: &[&str] = &["History", "Downloads", "Settings", "New Tab"];

/// Runtime configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnamnesisConfig {
    /// Base URL of the notes backend
    pub backend_base_url: String,

    /// Substrings marking contexts to ignore
    pub ignore_list: Vec<String>,

    /// Context loaded when the session starts
    pub initial_context: String,

    /// Active-window polling interval in milliseconds
    pub poll_interval_ms: u64,

    /// Helper command printing the focused window as JSON.
    /// Required for `run`; the other commands work without it.
    pub window_probe_command: Option<String>,

    /// Control socket path for a running session
    pub socket_path: PathBuf,
}

impl Default for AnamnesisConfig {
    fn default() -> Self {
        Self {
            backend_base_url: "http://127.0.0.1:8000".to_string(),
            ignore_list: DEFAULT_IGNORED_TITLES
                .iter()
                .map(|title| title.to_string())
                .collect(),
            initial_context: "default".to_string(),
            poll_interval_ms: 500,
            window_probe_command: None,
            socket_path: std::env::temp_dir().join("anamnesis.sock"),
        }
    }
}

impl AnamnesisConfig {
    /// Default config file location under the user config directory
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("anamnesis")
            .join("config.toml")
    }

    /// Load configuration, layering defaults, the config file (when it
    /// exists), and `ANAMNESIS_*` environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::default_path);

        let mut builder = config::Config::builder()
            .add_source(config::Config::try_from(&AnamnesisConfig::default())?);

        if path.exists() {
            debug!("Loading configuration from {}", path.display());
            builder = builder.add_source(config::File::from(path.as_path()));
        }

        let settings = builder
            .add_source(config::Environment::with_prefix("ANAMNESIS"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Polling interval as a [`Duration`]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// The configured ignore list
    pub fn ignore_list(&self) -> IgnoreList {
        IgnoreList::new(self.ignore_list.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AnamnesisConfig::default();
        assert_eq!(config.backend_base_url, "http://127.0.0.1:8000");
        assert_eq!(config.initial_context, "default");
        assert_eq!(config.poll_interval_ms, 500);
        assert!(config.window_probe_command.is_none());
        assert!(config.ignore_list().matches("New Tab - Chrome"));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AnamnesisConfig::load(Some(&dir.path().join("nope.toml"))).unwrap();
        assert_eq!(config.backend_base_url, "http://127.0.0.1:8000");
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "backend_base_url = \"http://notes.internal:9000\"\nignore_list = [\"Login Screen\"]\npoll_interval_ms = 250"
        )
        .unwrap();

        let config = AnamnesisConfig::load(Some(&path)).unwrap();
        assert_eq!(config.backend_base_url, "http://notes.internal:9000");
        assert_eq!(config.poll_interval(), Duration::from_millis(250));
        assert!(config.ignore_list().matches("Login Screen — App"));
        assert!(!config.ignore_list().matches("History"));
        // Keys absent from the file keep their defaults.
        assert_eq!(config.initial_context, "default");
    }
}
