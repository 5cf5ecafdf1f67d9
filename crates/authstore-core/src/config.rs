//! Application configuration management.
//!
//! This module handles loading and saving the configuration, which holds the
//! API base URL, the token storage backend and the last email used to log in.
//!
//! Configuration is stored at `~/.config/authstore/config.json`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::storage::{FileStorage, KeyringStorage, Storage};

/// Application name used for config/data directory paths
const APP_NAME: &str = "authstore";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding the API base URL
pub const API_URL_ENV: &str = "AUTHSTORE_API_URL";

/// API base URL baked in at build time, if any
const BUILD_API_URL: Option<&str> = option_env!("AUTHSTORE_API_URL");

/// Where session tokens are kept between runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    File,
    Keyring,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_url: Option<String>,
    #[serde(default)]
    pub storage: StorageBackend,
    pub last_email: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path).context("Failed to read config file")?;
            serde_json::from_str(&contents).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory holding the file storage backend
    pub fn data_dir(&self) -> Result<PathBuf> {
        let data_dir = dirs::data_local_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    /// API base URL: environment, then config file, then the build-time value
    pub fn api_url(&self) -> Result<String> {
        let env = std::env::var(API_URL_ENV).ok();
        resolve_api_url(env.as_deref(), self.api_url.as_deref(), BUILD_API_URL)
    }

    /// Open the configured token storage backend
    pub fn open_storage(&self) -> Result<Box<dyn Storage>> {
        Ok(match self.storage {
            StorageBackend::File => Box::new(FileStorage::in_dir(&self.data_dir()?)?),
            StorageBackend::Keyring => Box::new(KeyringStorage::default()),
        })
    }
}

/// First non-blank candidate, with any trailing slash removed
pub fn resolve_api_url(
    env: Option<&str>,
    file: Option<&str>,
    build: Option<&str>,
) -> Result<String> {
    [env, file, build]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|url| !url.is_empty())
        .map(|url| url.trim_end_matches('/').to_string())
        .ok_or_else(|| {
            anyhow::anyhow!(
                "No API URL configured. Set {} or add \"api_url\" to the config file",
                API_URL_ENV
            )
        })
}
