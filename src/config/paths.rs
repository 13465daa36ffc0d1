//! Path management for Tally
//!
//! Resolves where settings and table files live.
//!
//! ## Path Resolution Order
//!
//! 1. `TALLY_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/tally` or `~/.config/tally`
//! 3. Windows: `%APPDATA%\tally`

use std::path::PathBuf;

use crate::error::TallyError;

/// Environment variable that overrides the base directory
pub const DATA_DIR_ENV: &str = "TALLY_DATA_DIR";

/// Manages all paths used by Tally
#[derive(Debug, Clone)]
pub struct TallyPaths {
    base_dir: PathBuf,
}

impl TallyPaths {
    /// Resolve the base directory from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, TallyError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Use an explicit base directory (tests, embedding)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Directory holding one JSON file per table
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    pub fn accounts_file(&self) -> PathBuf {
        self.data_dir().join("accounts.json")
    }

    pub fn categories_file(&self) -> PathBuf {
        self.data_dir().join("categories.json")
    }

    pub fn transactions_file(&self) -> PathBuf {
        self.data_dir().join("transactions.json")
    }

    pub fn subscriptions_file(&self) -> PathBuf {
        self.data_dir().join("subscriptions.json")
    }

    /// Append-only JSONL log of billing events
    pub fn payment_events_log(&self) -> PathBuf {
        self.data_dir().join("payment_events.log")
    }

    /// Create the base and data directories
    pub fn ensure_directories(&self) -> Result<(), TallyError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| TallyError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| TallyError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Initialized once a settings file has been written
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, TallyError> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => {
            let home = std::env::var("HOME").map_err(|_| {
                TallyError::Config(format!(
                    "HOME is not set; set {} to choose a data directory",
                    DATA_DIR_ENV
                ))
            })?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join("tally"))
}

#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, TallyError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| TallyError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("tally"))
}
