//! Settings management

use kiln_core::SceneConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Scene and host settings, read from a JSON file.
///
/// Missing fields take their default value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSettings {
    /// Initial number of entity slots.
    pub pool_capacity: usize,
    /// Lifetime, in ticks, of packets published without an explicit one.
    pub default_event_lifetime: u8,
    pub tick_rate_hz: u32,
    /// Ticks the runtime executes before exiting; 0 runs forever.
    pub max_ticks: u64,
    /// `tracing` filter used when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            pool_capacity: 256,
            default_event_lifetime: 2,
            tick_rate_hz: 60,
            max_ticks: 600,
            log_filter: "info".to_string(),
        }
    }
}

impl SceneSettings {
    /// Read and validate settings from `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&text)?;
        settings.validate()?;
        tracing::debug!(path = %path.display(), ?settings, "loaded settings");
        Ok(settings)
    }

    /// Write the settings as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.pool_capacity == 0 {
            return Err(SettingsError::Invalid {
                field: "pool_capacity",
                reason: "must be at least 1",
            });
        }
        if self.default_event_lifetime == 0 {
            return Err(SettingsError::Invalid {
                field: "default_event_lifetime",
                reason: "packets with a lifetime of zero are never delivered",
            });
        }
        if self.tick_rate_hz == 0 {
            return Err(SettingsError::Invalid {
                field: "tick_rate_hz",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }

    pub fn scene_config(&self) -> SceneConfig {
        SceneConfig {
            capacity: self.pool_capacity,
            default_event_lifetime: self.default_event_lifetime,
            tick_rate_hz: self.tick_rate_hz,
        }
    }
}
