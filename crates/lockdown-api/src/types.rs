//! Shared types for the lockdown controller

use bitflags::bitflags;
use lockdown_util::PackageId;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::DEFAULT_SETTINGS_PACKAGE;

/// Kiosk configuration as supplied by the settings/config service.
///
/// Field names follow the server payload (`kioskMode`, `mainApp`,
/// `kioskHome`, ...). Each `kiosk_*` flag is tri-state: `None` means the
/// server did not configure it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationSnapshot {
    #[serde(rename = "kioskMode", default)]
    pub kiosk_mode_enabled: bool,

    #[serde(rename = "mainApp", default)]
    pub main_app_id: Option<PackageId>,

    #[serde(default)]
    pub kiosk_home: Option<bool>,

    #[serde(default)]
    pub kiosk_recents: Option<bool>,

    #[serde(default)]
    pub kiosk_notifications: Option<bool>,

    #[serde(default)]
    pub kiosk_system_info: Option<bool>,

    #[serde(default)]
    pub kiosk_keyguard: Option<bool>,

    /// Disables the power menu when explicitly true
    #[serde(default)]
    pub kiosk_lock_buttons: Option<bool>,
}

impl ConfigurationSnapshot {
    /// Kiosk mode enabled with the given main app and no flags configured
    pub fn kiosk(main_app: impl Into<PackageId>) -> Self {
        Self {
            kiosk_mode_enabled: true,
            main_app_id: Some(main_app.into()),
            ..Self::default()
        }
    }

    /// The configured main app, ignoring blank ids
    pub fn main_app(&self) -> Option<&PackageId> {
        self.main_app_id
            .as_ref()
            .filter(|id| !id.as_str().trim().is_empty())
    }
}

/// Package identities injected at startup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceIdentity {
    /// The controller's own package; always first in the allow list
    pub self_package: PackageId,

    /// The system settings app, allowed on request
    pub settings_package: PackageId,
}

impl DeviceIdentity {
    pub fn new(self_package: impl Into<PackageId>) -> Self {
        Self {
            self_package: self_package.into(),
            settings_package: PackageId::new(DEFAULT_SETTINGS_PACKAGE),
        }
    }

    pub fn with_settings_package(mut self, settings: impl Into<PackageId>) -> Self {
        self.settings_package = settings.into();
        self
    }
}

/// Lockdown state as tracked by the controller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockdownState {
    #[default]
    Unlocked,
    Locked,
}

impl fmt::Display for LockdownState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LockdownState::Unlocked => f.write_str("unlocked"),
            LockdownState::Locked => f.write_str("locked"),
        }
    }
}

/// Ordered, duplicate-free set of packages allowed to run during lockdown
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllowList(Vec<PackageId>);

impl AllowList {
    /// The empty list, used to clear the policy authority on exit
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Start a list with its mandatory first entry
    pub fn starting_with(first: PackageId) -> Self {
        Self(vec![first])
    }

    /// Append unless already present. Returns whether it was added.
    pub fn push(&mut self, package: PackageId) -> bool {
        if self.0.contains(&package) {
            return false;
        }
        self.0.push(package);
        true
    }

    pub fn contains(&self, package: &PackageId) -> bool {
        self.0.contains(package)
    }

    pub fn packages(&self) -> &[PackageId] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &PackageId> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for AllowList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, package) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", package)?;
        }
        write!(f, "]")
    }
}

bitflags! {
    /// System UI affordances that stay reachable during lockdown.
    ///
    /// Bit values match the platform's lock task feature constants.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct FeatureMask: u32 {
        const SYSTEM_INFO = 1;
        const NOTIFICATIONS = 1 << 1;
        const HOME = 1 << 2;
        const OVERVIEW = 1 << 3;
        /// Power button long-press menu
        const GLOBAL_ACTIONS = 1 << 4;
        const KEYGUARD = 1 << 5;
    }
}

impl Default for FeatureMask {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_from_server_payload() {
        let json = r#"{
            "kioskMode": true,
            "mainApp": "com.example.kiosk",
            "kioskHome": true,
            "kioskLockButtons": false
        }"#;

        let snapshot: ConfigurationSnapshot = serde_json::from_str(json).unwrap();
        assert!(snapshot.kiosk_mode_enabled);
        assert_eq!(snapshot.main_app().unwrap().as_str(), "com.example.kiosk");
        assert_eq!(snapshot.kiosk_home, Some(true));
        assert_eq!(snapshot.kiosk_lock_buttons, Some(false));
        assert_eq!(snapshot.kiosk_recents, None);
        assert_eq!(snapshot.kiosk_keyguard, None);
    }

    #[test]
    fn blank_main_app_is_absent() {
        let snapshot = ConfigurationSnapshot {
            main_app_id: Some(PackageId::new("  ")),
            ..Default::default()
        };
        assert!(snapshot.main_app().is_none());
    }

    #[test]
    fn allow_list_rejects_duplicates() {
        let mut list = AllowList::starting_with(PackageId::new("com.hmdm.launcher"));
        assert!(list.push(PackageId::new("com.example.kiosk")));
        assert!(!list.push(PackageId::new("com.hmdm.launcher")));
        assert!(!list.push(PackageId::new("com.example.kiosk")));

        assert_eq!(list.len(), 2);
        assert_eq!(list.to_string(), "[com.hmdm.launcher, com.example.kiosk]");
    }

    #[test]
    fn feature_mask_matches_platform_bits() {
        assert_eq!(FeatureMask::empty().bits(), 0);
        assert_eq!(FeatureMask::HOME.bits(), 4);
        assert_eq!(FeatureMask::GLOBAL_ACTIONS.bits(), 16);
        assert_eq!(FeatureMask::all().bits(), 63);
    }

    #[test]
    fn default_identity_uses_system_settings() {
        let identity = DeviceIdentity::new("com.hmdm.launcher");
        assert_eq!(identity.settings_package.as_str(), DEFAULT_SETTINGS_PACKAGE);
    }
}
