//! Engine configuration.
//!
//! Timing knobs for the scheduled parts of the engine (auto-complete steps,
//! deck reset animation) and an optional deal seed. Every field has a
//! default, so an empty TOML document is a valid configuration.
//!
//! ```
//! use klondike_engine::config::EngineConfig;
//!
//! let config = EngineConfig::from_toml_str(r#"
//!     auto_complete = false
//!     tick_ms = 200
//!     seed = 42
//! "#).unwrap();
//!
//! assert!(!config.auto_complete);
//! assert_eq!(config.settle_ms, 50);
//! assert_eq!(config.seed, Some(42));
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Run the automatic finishing loop once the tableau has no hidden cards.
    pub auto_complete: bool,

    /// Delay before each automatic move, in milliseconds.
    pub tick_ms: u64,

    /// Delay after an automatic move before the next one may be scheduled.
    pub settle_ms: u64,

    /// Delay between a deck reset request and the reset itself. Zero
    /// applies resets immediately.
    pub reset_animation_ms: u64,

    /// Random seed for reproducible deals.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            auto_complete: true,
            tick_ms: 120,
            settle_ms: 50,
            reset_animation_ms: 600,
            seed: None,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file and validates it.
    ///
    /// # Errors
    ///
    /// Returns error if the file doesn't exist, contains invalid TOML, or
    /// fails `validate`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses and validates configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_ms == 0 {
            return Err(ConfigError::Invalid("tick_ms must be greater than zero".into()));
        }
        Ok(())
    }

    /// Sets the deal seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Turns scheduled auto-complete on or off.
    pub fn with_auto_complete(mut self, enabled: bool) -> Self {
        self.auto_complete = enabled;
        self
    }

    /// Sets the deck reset delay; zero makes resets immediate.
    pub fn with_reset_animation_ms(mut self, ms: u64) -> Self {
        self.reset_animation_ms = ms;
        self
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn reset_animation(&self) -> Duration {
        Duration::from_millis(self.reset_animation_ms)
    }
}
