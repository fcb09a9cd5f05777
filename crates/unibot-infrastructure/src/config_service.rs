//! Configuration service implementation.
//!
//! Loads [`ClientConfig`] from `config.toml`. A missing file yields the
//! defaults; `UNIBOT_BASE_URL` overrides whatever the file says.

use crate::paths::UnibotPaths;
use crate::storage::AtomicTomlFile;
use std::path::PathBuf;
use unibot_core::config::ClientConfig;
use unibot_core::error::Result;

pub const BASE_URL_ENV: &str = "UNIBOT_BASE_URL";

#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    /// Service for the default `config.toml` location.
    pub fn new() -> Result<Self> {
        Ok(Self::with_path(UnibotPaths::config_file()?))
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Reads the file (or defaults) and applies environment overrides.
    pub fn load(&self) -> Result<ClientConfig> {
        let file = AtomicTomlFile::<ClientConfig>::new(self.path.clone());
        let config = match file.load()? {
            Some(config) => {
                tracing::debug!(path = %self.path.display(), "Loaded client configuration");
                config
            }
            None => {
                tracing::debug!(path = %self.path.display(), "No configuration file, using defaults");
                ClientConfig::default()
            }
        };

        let config = apply_overrides(config, std::env::var(BASE_URL_ENV).ok());
        config.normalized_base_url()?;
        Ok(config)
    }
}

fn apply_overrides(mut config: ClientConfig, base_url: Option<String>) -> ClientConfig {
    if let Some(url) = base_url.filter(|url| !url.trim().is_empty()) {
        config.base_url = url;
    }
    config
}
