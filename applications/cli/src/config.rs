/// Player configuration
use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tilawa_playback::PlaybackConfig;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default = "default_device")]
    pub device: DeviceSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

/// Headless output settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeviceSettings {
    /// Nominal length of every entry, in seconds
    #[serde(default = "default_entry_seconds")]
    pub entry_seconds: f64,

    /// Clock resolution in milliseconds
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: default_storage(),
            playback: PlaybackConfig::default(),
            device: default_device(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// Reads `path` if given (it must exist), otherwise `tilawa.toml` in the
    /// working directory when present. `TILAWA_` environment variables
    /// override file values, with `__` between nested keys
    /// (`TILAWA_STORAGE__DATABASE_URL`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from("tilawa.toml");
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("TILAWA")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.storage.database_url.trim().is_empty() {
            return Err(CliError::Config(
                "storage.database_url must not be empty".to_string(),
            ));
        }

        if self.playback.segment_cdn_base.trim().is_empty() {
            return Err(CliError::Config(
                "playback.segment_cdn_base must not be empty".to_string(),
            ));
        }

        if !self.device.entry_seconds.is_finite() || self.device.entry_seconds <= 0.0 {
            return Err(CliError::Config(format!(
                "device.entry_seconds must be positive, got {}",
                self.device.entry_seconds
            )));
        }

        if self.device.tick_ms == 0 {
            return Err(CliError::Config("device.tick_ms must be positive".to_string()));
        }

        Ok(())
    }
}

// Default values
fn default_storage() -> StorageSettings {
    StorageSettings {
        database_url: default_database_url(),
    }
}

fn default_database_url() -> String {
    "sqlite://./data/tilawa.db".to_string()
}

fn default_device() -> DeviceSettings {
    DeviceSettings {
        entry_seconds: default_entry_seconds(),
        tick_ms: default_tick_ms(),
    }
}

fn default_entry_seconds() -> f64 {
    30.0
}

fn default_tick_ms() -> u64 {
    250
}
