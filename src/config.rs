//! Runtime configuration: where data, logs, and exports live, plus the
//! timings used by the TUI. Everything is resolved once at startup.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Result};
use directories::{BaseDirs, UserDirs};

use crate::export::DEFAULT_EXPORT_FILENAME;

/// Overrides the data directory when set.
pub const HOME_ENV_VAR: &str = "SCORE_TRACKER_HOME";
/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".score-tracker";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "scores.sqlite";
const LOG_DIR_NAME: &str = "logs";

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    pub export_dir: PathBuf,
    pub export_filename: String,
    /// How long a notification stays in the footer.
    pub notification_ttl: Duration,
    /// Window in which a second reset press commits the reset.
    pub reset_confirm_window: Duration,
    /// How long the last score change stays highlighted on a card.
    pub score_flash_ttl: Duration,
}

impl Config {
    /// Resolve paths from the environment and the platform's user dirs.
    pub fn from_env() -> Result<Self> {
        let data_dir = match env::var_os(HOME_ENV_VAR) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => {
                let base_dirs =
                    BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
                base_dirs.home_dir().join(DATA_DIR_NAME)
            }
        };

        let export_dir = UserDirs::new()
            .and_then(|dirs| dirs.download_dir().map(PathBuf::from))
            .unwrap_or_else(|| data_dir.clone());

        Ok(Self::with_dirs(data_dir, export_dir))
    }

    /// Build a config rooted at explicit directories with default timings.
    pub fn with_dirs(data_dir: PathBuf, export_dir: PathBuf) -> Self {
        Self {
            db_path: data_dir.join(DB_FILE_NAME),
            log_dir: data_dir.join(LOG_DIR_NAME),
            data_dir,
            export_dir,
            export_filename: DEFAULT_EXPORT_FILENAME.to_string(),
            notification_ttl: Duration::from_millis(3000),
            reset_confirm_window: Duration::from_millis(3000),
            score_flash_ttl: Duration::from_millis(1200),
        }
    }
}
