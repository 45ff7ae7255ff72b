//! turnero configuration.
//!
//! Read from ~/.config/turnero/config.toml, with `TURNERO_*` environment
//! variables layered on top (e.g. `TURNERO_BACKEND=firestore`,
//! `TURNERO_FIRESTORE__API_KEY=...`).

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{TurneroError, TurneroResult};

static DEFAULT_DATA_DIR: &str = "~/.local/share/turnero";
static DEFAULT_FIRESTORE_URL: &str = "https://firestore.googleapis.com/v1";
static DEFAULT_FIRESTORE_DATABASE: &str = "(default)";

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn default_firestore_url() -> String {
    DEFAULT_FIRESTORE_URL.to_string()
}

fn default_firestore_database() -> String {
    DEFAULT_FIRESTORE_DATABASE.to_string()
}

/// Which persistence backend records live in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// JSON files in `data_dir`
    #[default]
    Local,
    /// Cloud Firestore over its REST API
    Firestore,
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::Local => f.write_str("local"),
            Backend::Firestore => f.write_str("firestore"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirestoreConfig {
    pub project_id: Option<String>,

    pub api_key: Option<String>,

    #[serde(default = "default_firestore_database")]
    pub database: String,

    /// Override to point at the Firestore emulator
    #[serde(default = "default_firestore_url")]
    pub base_url: String,
}

impl Default for FirestoreConfig {
    fn default() -> Self {
        FirestoreConfig {
            project_id: None,
            api_key: None,
            database: default_firestore_database(),
            base_url: default_firestore_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurneroConfig {
    #[serde(default)]
    pub backend: Backend,

    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default)]
    pub firestore: FirestoreConfig,
}

impl Default for TurneroConfig {
    fn default() -> Self {
        TurneroConfig {
            backend: Backend::default(),
            data_dir: default_data_dir(),
            firestore: FirestoreConfig::default(),
        }
    }
}

impl TurneroConfig {
    pub fn config_path() -> TurneroResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| TurneroError::Config("Could not determine config directory".into()))?
            .join("turnero");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the user's config, writing a commented default file on first run.
    pub fn load() -> TurneroResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> TurneroResult<Self> {
        let config: TurneroConfig = Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(
                Environment::with_prefix("TURNERO")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(|e| TurneroError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| TurneroError::Config(e.to_string()))?;

        tracing::debug!(path = %path.display(), backend = %config.backend, "loaded config");
        Ok(config)
    }

    /// `data_dir` with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.data_dir.to_string_lossy()).into_owned();

        PathBuf::from(full_path_str)
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> TurneroResult<()> {
        let contents = format!(
            "\
# turnero configuration

# Where records are kept: \"local\" or \"firestore\"
# backend = \"local\"

# Directory for the local backend:
# data_dir = \"{}\"

# [firestore]
# project_id = \"my-salon\"
# api_key = \"...\"
# database = \"{}\"
# base_url = \"{}\"
",
            DEFAULT_DATA_DIR, DEFAULT_FIRESTORE_DATABASE, DEFAULT_FIRESTORE_URL
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                TurneroError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| TurneroError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_file_loads_as_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("turnero/config.toml");

        TurneroConfig::create_default_config(&path).unwrap();
        let config = TurneroConfig::load_from(&path).unwrap();

        assert_eq!(config.data_dir, default_data_dir());
        assert_eq!(config.firestore.database, "(default)");
        assert_eq!(config.firestore.base_url, DEFAULT_FIRESTORE_URL);
    }

    #[test]
    fn test_firestore_section() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "backend = \"firestore\"\n\n[firestore]\nproject_id = \"salon\"\napi_key = \"k\"\n",
        )
        .unwrap();

        let config = TurneroConfig::load_from(&path).unwrap();

        assert_eq!(config.backend, Backend::Firestore);
        assert_eq!(config.firestore.project_id.as_deref(), Some("salon"));
        assert_eq!(config.firestore.api_key.as_deref(), Some("k"));
        assert_eq!(config.firestore.database, "(default)");
    }

    #[test]
    fn test_unknown_backend_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "backend = \"postgres\"\n").unwrap();

        let err = TurneroConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, TurneroError::Config(_)));
    }
}
