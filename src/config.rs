//! Configuration file support.
//!
//! Settings are read from a TOML file, either the path given on the command
//! line or `<config dir>/plan-check/config.toml` when it exists. Every key is
//! optional; command line flags take precedence.
//!
//! ```toml
//! report_dir = "/srv/plan-check/reports"
//! dvh_settle_ms = 750
//! color = false
//! ```

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Subfolder of the user's desktop that receives reports
pub const DEFAULT_REPORT_FOLDER: &str = "PlanCheck";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Contents of `config.toml`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// Folder for persisted reports (overrides the desktop default)
    pub report_dir: Option<PathBuf>,
    /// Desktop subfolder name when `report_dir` is not set
    pub report_folder: Option<String>,
    pub dvh_settle_ms: Option<u64>,
    pub dvh_timeout_ms: Option<u64>,
    pub dvh_poll_ms: Option<u64>,
    pub color: Option<bool>,
    /// Also write logs to `plan-check.log` in this folder
    pub log_dir: Option<PathBuf>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the explicit file, or the default file if present, or defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load(path),
            None => match default_config_path() {
                Some(path) if path.is_file() => Self::load(&path),
                _ => Ok(Self::default()),
            },
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("plan-check").join("config.toml"))
}

/// Desktop subfolder for reports, falling back to the home directory.
pub fn default_report_dir(folder: Option<&str>) -> PathBuf {
    dirs::desktop_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(folder.unwrap_or(DEFAULT_REPORT_FOLDER))
}
