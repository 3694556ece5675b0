//! Validated configuration structures

use crate::schema::{RawAuditConfig, RawConfig, RawKioskConfig};
use lockdown_api::{ConfigurationSnapshot, DeviceIdentity};
use lockdown_util::{PackageId, default_data_dir};
use std::path::PathBuf;

/// Validated configuration ready for the controller
#[derive(Debug, Clone)]
pub struct LockdownConfig {
    /// Package identities injected into the controller
    pub identity: DeviceIdentity,

    /// Kiosk configuration
    pub snapshot: ConfigurationSnapshot,

    /// Allow the settings app during lockdown
    pub enable_settings: bool,

    pub audit: AuditConfig,
}

impl LockdownConfig {
    /// Convert from raw config (after validation)
    pub fn from_raw(raw: RawConfig) -> Self {
        let mut identity = DeviceIdentity::new(raw.device.self_package);
        if let Some(settings) = raw.device.settings_package {
            identity = identity.with_settings_package(settings);
        }

        let enable_settings = raw.kiosk.enable_settings;

        Self {
            identity,
            snapshot: snapshot_from_raw(raw.kiosk),
            enable_settings,
            audit: AuditConfig::from_raw(raw.audit),
        }
    }
}

fn snapshot_from_raw(raw: RawKioskConfig) -> ConfigurationSnapshot {
    ConfigurationSnapshot {
        kiosk_mode_enabled: raw.kiosk_mode,
        main_app_id: raw
            .main_app
            .filter(|app| !app.trim().is_empty())
            .map(PackageId::new),
        kiosk_home: raw.home,
        kiosk_recents: raw.recents,
        kiosk_notifications: raw.notifications,
        kiosk_system_info: raw.system_info,
        kiosk_keyguard: raw.keyguard,
        kiosk_lock_buttons: raw.lock_buttons,
    }
}

/// Audit log configuration
#[derive(Debug, Clone)]
pub struct AuditConfig {
    pub db_path: PathBuf,
}

impl AuditConfig {
    fn from_raw(raw: RawAuditConfig) -> Self {
        Self {
            db_path: raw
                .db_path
                .unwrap_or_else(|| default_data_dir().join("audit.db")),
        }
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self::from_raw(RawAuditConfig::default())
    }
}
