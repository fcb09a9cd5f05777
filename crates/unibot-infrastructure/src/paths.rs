//! Path management for unibot's local files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/unibot/            # Config directory (platform config dir)
//! ├── config.toml              # Client configuration
//! ├── session.toml             # Credential bundle (owner-only)
//! └── logs/                    # Application logs
//!     └── unibot.log.YYYY-MM-DD
//! ```
//!
//! `UNIBOT_CONFIG_DIR` replaces the whole directory when set.

use std::path::PathBuf;

const APP_DIR: &str = "unibot";
const CONFIG_DIR_ENV: &str = "UNIBOT_CONFIG_DIR";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Neither the override nor the platform config directory is available.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find configuration directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for unibot_core::UnibotError {
    fn from(e: PathError) -> Self {
        unibot_core::UnibotError::config(e.to_string())
    }
}

pub struct UnibotPaths;

impl UnibotPaths {
    /// Returns the unibot configuration directory.
    pub fn config_dir() -> Result<PathBuf, PathError> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|v| !v.is_empty()) {
            return Ok(PathBuf::from(dir));
        }
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::ConfigDirNotFound)
    }

    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn session_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("session.toml"))
    }

    pub fn log_dir() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("logs"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_files_live_under_config_dir() {
        let Ok(dir) = UnibotPaths::config_dir() else {
            // No home directory in this environment.
            return;
        };
        assert_eq!(UnibotPaths::config_file().unwrap(), dir.join("config.toml"));
        assert_eq!(UnibotPaths::session_file().unwrap(), dir.join("session.toml"));
        assert_eq!(UnibotPaths::log_dir().unwrap(), dir.join("logs"));
    }
}
