//! Raw configuration schema (as parsed from TOML)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw configuration as parsed from TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawConfig {
    /// Config schema version
    pub config_version: u32,

    /// Package identities of this device
    pub device: RawDeviceConfig,

    /// Kiosk settings
    #[serde(default)]
    pub kiosk: RawKioskConfig,

    /// Audit log settings
    #[serde(default)]
    pub audit: RawAuditConfig,
}

/// Device identity settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawDeviceConfig {
    /// Package id of the controller app itself
    pub self_package: String,

    /// Settings app package (default: com.android.settings)
    pub settings_package: Option<String>,
}

/// Kiosk settings; unset flags stay unset
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawKioskConfig {
    #[serde(default)]
    pub kiosk_mode: bool,

    /// Package id of the app to pin
    pub main_app: Option<String>,

    /// Allow the settings app during lockdown
    #[serde(default)]
    pub enable_settings: bool,

    pub home: Option<bool>,
    pub recents: Option<bool>,
    pub notifications: Option<bool>,
    pub system_info: Option<bool>,
    pub keyguard: Option<bool>,
    pub lock_buttons: Option<bool>,
}

/// Audit log settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawAuditConfig {
    /// SQLite database path (default: <data dir>/audit.db)
    pub db_path: Option<PathBuf>,
}
