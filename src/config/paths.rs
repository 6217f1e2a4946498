//! Path management for minex
//!
//! Provides XDG-compliant path resolution for configuration, data, and logs.
//!
//! ## Path Resolution Order
//!
//! 1. `MINEX_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/minex` or `~/.config/minex`
//! 3. Windows: `%APPDATA%\minex`

use std::path::PathBuf;

use crate::error::MinexError;

/// Manages all paths used by minex
#[derive(Debug, Clone)]
pub struct MinexPaths {
    base_dir: PathBuf,
}

impl MinexPaths {
    /// Create a new MinexPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, MinexError> {
        let base_dir = if let Ok(custom) = std::env::var("MINEX_DATA_DIR") {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create MinexPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.config/minex/ or equivalent)
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (~/.config/minex/data/)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the log directory (~/.config/minex/logs/)
    pub fn log_dir(&self) -> PathBuf {
        self.base_dir.join("logs")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the expense key-value store
    pub fn expenses_file(&self) -> PathBuf {
        self.data_dir().join("expenses.json")
    }

    /// Ensure the base, data and log directories exist
    pub fn ensure_directories(&self) -> Result<(), MinexError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| MinexError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| MinexError::Io(format!("Failed to create data directory: {}", e)))?;

        std::fs::create_dir_all(self.log_dir())
            .map_err(|e| MinexError::Io(format!("Failed to create log directory: {}", e)))?;

        Ok(())
    }
}

#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, MinexError> {
    if let Ok(config_home) = std::env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(config_home).join("minex"));
    }
    let home = std::env::var("HOME")
        .map_err(|_| MinexError::Config("Could not determine HOME directory".into()))?;
    Ok(PathBuf::from(home).join(".config").join("minex"))
}

#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, MinexError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| MinexError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("minex"))
}
