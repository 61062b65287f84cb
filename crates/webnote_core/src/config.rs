//! Application configuration.
//!
//! # Responsibility
//! - Describe where notes live and which store backend is used.
//! - Load settings from an optional JSON file, falling back to defaults.
//!
//! # Invariants
//! - A missing config file is not an error; defaults apply.
//! - Unknown keys are ignored and missing keys take their default value.

use crate::logging::default_log_level;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Page shown when the rendering surface first opens.
pub const DEFAULT_START_URL: &str = "https://www.example.com";
const SQLITE_FILE_NAME: &str = "notes.db";
const FLAT_FILE_NAME: &str = "notes.txt";

/// Persistence backend for captured notes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// Single-table SQLite database with timestamps.
    #[default]
    Sqlite,
    /// Legacy append-only `notes.txt` log without timestamps.
    FlatFile,
}

impl StoreBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::FlatFile => "flat_file",
        }
    }

    /// File name used inside the data directory.
    pub fn default_file_name(self) -> &'static str {
        match self {
            Self::Sqlite => SQLITE_FILE_NAME,
            Self::FlatFile => FLAT_FILE_NAME,
        }
    }
}

/// Store location and backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Directory holding the store file. Relative paths resolve against the
    /// working directory, matching where `notes.txt` used to be written.
    pub data_dir: PathBuf,
    /// Overrides the backend's default file name.
    pub file_name: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            data_dir: PathBuf::from("."),
            file_name: None,
        }
    }
}

impl StoreConfig {
    pub fn store_path(&self) -> PathBuf {
        let file_name = self
            .file_name
            .as_deref()
            .unwrap_or_else(|| self.backend.default_file_name());
        self.data_dir.join(file_name)
    }
}

/// Top-level application settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub start_url: String,
    pub log_level: String,
    /// Absolute directory for rolling logs; `None` leaves logging to the host.
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            start_url: DEFAULT_START_URL.to_string(),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

/// Failure while reading a config file.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read config: {err}"),
            Self::Parse(err) => write!(f, "invalid config: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
        }
    }
}

impl AppConfig {
    /// Loads settings from a JSON file; a missing file yields defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path.as_ref()) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => return Err(ConfigError::Io(err)),
        };
        serde_json::from_str(&content).map_err(ConfigError::Parse)
    }
}
