//! # Basket Configuration
//!
//! Configuration for the cart store and its SQLite file.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     BASKET_STORAGE_KEY=@GoMarketPlace                                  │
//! │     BASKET_DB_PATH=/tmp/basket.db                                      │
//! │     BASKET_WRITE_MODE=coalesced                                        │
//! │     BASKET_ON_CORRUPT=fail                                             │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/basket/basket.toml (Linux)                               │
//! │     ~/Library/Application Support/com.basket.basket/basket.toml (macOS)│
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     key "@GoMarketPlace", immediate writes, reset on corrupt           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # basket.toml
//! [storage]
//! key = "@GoMarketPlace"
//! database_path = "/path/to/basket.db"  # optional
//!
//! [persistence]
//! write_mode = "immediate"  # immediate | coalesced
//!
//! [hydrate]
//! on_corrupt = "reset"  # reset | fail
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::error::{CartError, CartResult};
use crate::store::StoreOptions;

/// Storage key used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "@GoMarketPlace";

const CONFIG_FILE_NAME: &str = "basket.toml";
const DATABASE_FILE_NAME: &str = "basket.db";

// =============================================================================
// Write Mode
// =============================================================================

/// How the persistence writer treats a backlog of queued snapshots.
///
/// ## Mode Comparison
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                        Write Mode Comparison                            │
/// │                                                                         │
/// │  IMMEDIATE (Default)                │  COALESCED                        │
/// │  ───────────────────                │  ─────────                        │
/// │  • Every snapshot is written        │  • Backlog collapses to newest    │
/// │  • One write per mutation           │  • Fewer writes under bursts      │
/// │                                                                         │
/// │  Example: add(x), inc(x), inc(x) while write #1 is in flight           │
/// │                                                                         │
/// │  IMMEDIATE:                         │  COALESCED:                       │
/// │  → write {x,1}                      │  → write {x,1}                    │
/// │  → write {x,2}                      │  → write {x,3}                    │
/// │  → write {x,3}                      │  (2 writes)                       │
/// │  (3 writes)                                                             │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteMode {
    #[default]
    Immediate,
    Coalesced,
}

impl std::fmt::Display for WriteMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WriteMode::Immediate => write!(f, "immediate"),
            WriteMode::Coalesced => write!(f, "coalesced"),
        }
    }
}

impl std::str::FromStr for WriteMode {
    type Err = CartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "immediate" => Ok(WriteMode::Immediate),
            "coalesced" | "coalesce" => Ok(WriteMode::Coalesced),
            other => Err(CartError::Config(format!(
                "Unknown write mode: '{}'. Valid options: immediate, coalesced",
                other
            ))),
        }
    }
}

// =============================================================================
// Corrupt Policy
// =============================================================================

/// What hydrate does with a stored blob that does not decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorruptPolicy {
    /// Warn and start with an empty cart. The blob stays until the next
    /// mutation overwrites it.
    #[default]
    Reset,

    /// Refuse to open the store.
    Fail,
}

impl std::fmt::Display for CorruptPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CorruptPolicy::Reset => write!(f, "reset"),
            CorruptPolicy::Fail => write!(f, "fail"),
        }
    }
}

impl std::str::FromStr for CorruptPolicy {
    type Err = CartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reset" => Ok(CorruptPolicy::Reset),
            "fail" | "error" => Ok(CorruptPolicy::Fail),
            other => Err(CartError::Config(format!(
                "Unknown corrupt policy: '{}'. Valid options: reset, fail",
                other
            ))),
        }
    }
}

// =============================================================================
// Sections
// =============================================================================

/// Where the cart lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Key the serialized cart is stored under.
    #[serde(default = "default_key")]
    pub key: String,

    /// SQLite file. Defaults to `basket.db` in the platform data directory.
    #[serde(default)]
    pub database_path: Option<PathBuf>,
}

fn default_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            key: default_key(),
            database_path: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersistenceSettings {
    #[serde(default)]
    pub write_mode: WriteMode,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HydrateSettings {
    #[serde(default)]
    pub on_corrupt: CorruptPolicy,
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete basket configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BasketConfig {
    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub persistence: PersistenceSettings,

    #[serde(default)]
    pub hydrate: HydrateSettings,
}

impl BasketConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`basket.toml`, or `config_path` when given)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> CartResult<Self> {
        Self::load_from(
            config_path.or_else(Self::default_config_path),
            |name| std::env::var(name).ok(),
        )
    }

    /// Loads from an explicit file (if any) with `BASKET_*` values read
    /// through `lookup` instead of the process environment.
    pub fn load_from(
        config_path: Option<PathBuf>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> CartResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path {
            if path.exists() {
                info!(?path, "Loading basket config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(lookup);
        config.validate()?;

        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> CartResult<()> {
        if self.storage.key.trim().is_empty() {
            return Err(CartError::Config("storage.key must not be empty".into()));
        }

        if let Some(ref path) = self.storage.database_path {
            if path.as_os_str().is_empty() {
                return Err(CartError::Config(
                    "storage.database_path must not be empty".into(),
                ));
            }
        }

        Ok(())
    }

    /// Applies `BASKET_*` overrides read through `lookup`.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup("BASKET_STORAGE_KEY") {
            debug!(key = %key, "Overriding storage key from environment");
            self.storage.key = key;
        }

        if let Some(path) = lookup("BASKET_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.storage.database_path = Some(PathBuf::from(path));
        }

        if let Some(mode) = lookup("BASKET_WRITE_MODE") {
            match mode.parse() {
                Ok(parsed) => self.persistence.write_mode = parsed,
                Err(_) => warn!(mode = %mode, "Unknown write mode in environment"),
            }
        }

        if let Some(policy) = lookup("BASKET_ON_CORRUPT") {
            match policy.parse() {
                Ok(parsed) => self.hydrate.on_corrupt = parsed,
                Err(_) => warn!(policy = %policy, "Unknown corrupt policy in environment"),
            }
        }
    }

    fn project_dirs() -> Option<directories::ProjectDirs> {
        directories::ProjectDirs::from("com", "basket", "basket")
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// The SQLite file to open: the configured path, else the platform data
    /// directory, else `basket.db` in the working directory.
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .or_else(|| {
                Self::project_dirs().map(|dirs| dirs.data_dir().join(DATABASE_FILE_NAME))
            })
            .unwrap_or_else(|| PathBuf::from(DATABASE_FILE_NAME))
    }

    /// Options for [`crate::CartStore::open`].
    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            key: self.storage.key.clone(),
            write_mode: self.persistence.write_mode,
            on_corrupt: self.hydrate.on_corrupt,
        }
    }
}
