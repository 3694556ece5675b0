//! Configuration parsing and validation for the lockdown controller
//!
//! Supports:
//! - A versioned TOML startup config (device identity, kiosk flags, audit path)
//! - The JSON kiosk payload delivered by the management server
//! - Validation with clear error messages

mod schema;
mod settings;
mod validation;

pub use schema::*;
pub use settings::*;
pub use validation::*;

use lockdown_api::ConfigurationSnapshot;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to parse server configuration: {0}")]
    SnapshotError(#[from] serde_json::Error),

    #[error("Validation failed: {errors:?}")]
    ValidationFailed { errors: Vec<ValidationError> },

    #[error("Unsupported config version: {0}")]
    UnsupportedVersion(u32),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Current supported config version
pub const CURRENT_CONFIG_VERSION: u32 = 1;

/// Load and validate configuration from a TOML file
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<LockdownConfig> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from a TOML string
pub fn parse_config(content: &str) -> ConfigResult<LockdownConfig> {
    let raw: RawConfig = toml::from_str(content)?;

    if raw.config_version != CURRENT_CONFIG_VERSION {
        return Err(ConfigError::UnsupportedVersion(raw.config_version));
    }

    let errors = validate_config(&raw);
    if !errors.is_empty() {
        return Err(ConfigError::ValidationFailed { errors });
    }

    let config = LockdownConfig::from_raw(raw);
    debug!(
        self_package = %config.identity.self_package,
        kiosk_mode = config.snapshot.kiosk_mode_enabled,
        "Configuration parsed"
    );
    Ok(config)
}

/// Parse the kiosk section of a server configuration payload.
///
/// Unknown fields are ignored; a malformed main app id is dropped with a
/// warning rather than rejecting the whole payload.
pub fn parse_snapshot_json(content: &str) -> ConfigResult<ConfigurationSnapshot> {
    let mut snapshot: ConfigurationSnapshot = serde_json::from_str(content)?;

    if let Some(app) = &snapshot.main_app_id
        && !app.as_str().trim().is_empty()
        && !app.is_well_formed()
    {
        warn!(main_app = %app, "Ignoring malformed main app id");
        snapshot.main_app_id = None;
    }

    Ok(snapshot)
}
