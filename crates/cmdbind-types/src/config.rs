//! Engine configuration.
//!
//! Loaded from TOML; every field is optional and falls back to its default.

use std::path::Path;

use serde::Deserialize;

use crate::error::{CmdError, Result};

/// Message used when a command does not configure its own.
pub const DEFAULT_NO_PERMISSION_MESSAGE: &str = "You have no permissions to use that command!";

/// Tunables for registration and resolution.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Feedback for a failed permission check.
    pub no_permission_message: String,
    /// Fail registration when a name or alias is already taken. When off,
    /// the collision is logged and the first registered command wins.
    pub reject_alias_collisions: bool,
    /// Fail resolution when input remains after the last argument.
    pub strict_trailing_input: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            no_permission_message: DEFAULT_NO_PERMISSION_MESSAGE.to_string(),
            reject_alias_collisions: true,
            strict_trailing_input: false,
        }
    }
}

impl EngineConfig {
    /// Parse a config from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        if config.no_permission_message.trim().is_empty() {
            return Err(CmdError::Config(
                "no_permission_message must not be empty".to_string(),
            ));
        }
        Ok(config)
    }

    /// Read and parse a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&text)?;
        log::debug!("Loaded engine config from {}", path.display());
        Ok(config)
    }
}
