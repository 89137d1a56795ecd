//! # Hub Configuration
//!
//! One TOML file, one section per service. Every field has a default, so an
//! empty file (or no file at all) is a valid configuration.
//!
//! ```toml
//! [storage]
//! path = "gamehub_state_v1.json"
//!
//! [economy]
//! starting_balance = 1000
//! grant_amount = 100
//!
//! [[economy.catalog]]
//! id = "pet_egg_basic"
//! name = "Basic Pet Egg"
//! price = 100
//! mint_cap = 10000
//!
//! [moderation]
//! denylist = ["badword", "slur1", "slur2"]
//! mask = "****"
//!
//! [messaging]
//! default_room = "room-1"
//! inbox_capacity = 256
//! chat_log_capacity = 500
//! ```

use std::path::{Path, PathBuf};

use gamehub_economy::EconomyConfig;
use gamehub_security::{ModerationConfig, ModerationFilter};
use gamehub_shared::constants::{DEFAULT_CHAT_LOG_CAPACITY, DEFAULT_INBOX_CAPACITY, DEFAULT_ROOM, DEFAULT_STATE_FILE};
use serde::{Deserialize, Serialize};

use crate::error::{HubError, HubResult};

/// Where the snapshot is kept.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// JSON state file.
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_STATE_FILE),
        }
    }
}

/// Room settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessagingConfig {
    /// Room joined when a blank room id is given.
    pub default_room: String,
    /// Per-subscriber inbox size. Events beyond it are dropped.
    pub inbox_capacity: usize,
    /// Rendered chat lines kept per session.
    pub chat_log_capacity: usize,
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            default_room: DEFAULT_ROOM.to_string(),
            inbox_capacity: DEFAULT_INBOX_CAPACITY,
            chat_log_capacity: DEFAULT_CHAT_LOG_CAPACITY,
        }
    }
}

/// Full hub configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    /// Storage section.
    pub storage: StorageConfig,
    /// Economy section.
    pub economy: EconomyConfig,
    /// Moderation section.
    pub moderation: ModerationConfig,
    /// Messaging section.
    pub messaging: MessagingConfig,
}

impl HubConfig {
    /// Parses and validates TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::Config`] for malformed TOML, or the first
    /// validation failure.
    pub fn from_toml(raw: &str) -> HubResult<Self> {
        let config: Self = toml::from_str(raw).map_err(|e| HubError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a config file.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::Config`] if the file cannot be read or parsed, or
    /// the first validation failure.
    pub fn load(path: impl AsRef<Path>) -> HubResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| HubError::Config(format!("cannot read {}: {e}", path.display())))?;
        let config = Self::from_toml(&raw)?;
        tracing::info!(path = %path.display(), items = config.economy.catalog.len(), "loaded config");
        Ok(config)
    }

    /// Checks every section.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> HubResult<()> {
        self.economy.validate()?;
        ModerationFilter::new(&self.moderation)?;

        if self.messaging.inbox_capacity == 0 {
            return Err(HubError::Config("messaging.inbox_capacity must be positive".to_string()));
        }
        if self.messaging.chat_log_capacity == 0 {
            return Err(HubError::Config("messaging.chat_log_capacity must be positive".to_string()));
        }
        if self.messaging.default_room.trim().is_empty() {
            return Err(HubError::Config("messaging.default_room must not be blank".to_string()));
        }
        if self.storage.path.as_os_str().is_empty() {
            return Err(HubError::Config("storage.path must not be empty".to_string()));
        }
        Ok(())
    }
}
