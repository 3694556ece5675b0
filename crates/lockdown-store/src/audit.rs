//! Audit event types

use chrono::{DateTime, Local};
use lockdown_api::{AllowList, FeatureMask};
use lockdown_util::{ErrorKind, PackageId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of an audit line
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSeverity {
    Info,
    Warn,
    Error,
}

impl AuditSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditSeverity::Info => "info",
            AuditSeverity::Warn => "warn",
            AuditSeverity::Error => "error",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "info" => Some(AuditSeverity::Info),
            "warn" => Some(AuditSeverity::Warn),
            "error" => Some(AuditSeverity::Error),
            _ => None,
        }
    }
}

impl fmt::Display for AuditSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Types of audit events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuditEventType {
    /// Lock task engaged
    LockdownEntered {
        allow_list: AllowList,
        kiosk_app: Option<PackageId>,
    },

    /// Enter attempt failed; the device stays unlocked
    LockdownRejected { kind: ErrorKind, message: String },

    /// Kiosk app brought to the foreground
    KioskAppLaunched { package: PackageId },

    /// Lockdown engaged but the kiosk app cannot be launched
    LaunchTargetMissing { package: PackageId },

    /// Lockdown engaged, launch call faulted
    LaunchFailed { package: PackageId, message: String },

    /// Allow list resubmitted while refreshing
    AllowListRefreshed { allow_list: AllowList },

    /// Refresh attempt failed
    RefreshRejected { kind: ErrorKind, message: String },

    /// Feature mask accepted by the policy authority
    FeaturesUpdated { features: FeatureMask },

    /// Feature mask rejected; lockdown proceeds without it
    FeatureUpdateFailed { message: String },

    /// Lock task released
    LockdownExited,

    /// A step of the exit path faulted; state is unlocked anyway
    ExitCleanupFailed { message: String },
}

impl AuditEventType {
    pub fn severity(&self) -> AuditSeverity {
        match self {
            AuditEventType::LockdownEntered { .. }
            | AuditEventType::KioskAppLaunched { .. }
            | AuditEventType::AllowListRefreshed { .. }
            | AuditEventType::FeaturesUpdated { .. }
            | AuditEventType::LockdownExited => AuditSeverity::Info,

            AuditEventType::LaunchTargetMissing { .. }
            | AuditEventType::LaunchFailed { .. }
            | AuditEventType::RefreshRejected { .. }
            | AuditEventType::FeatureUpdateFailed { .. } => AuditSeverity::Warn,

            // Unmet preconditions are expected on unmanaged devices
            AuditEventType::LockdownRejected { kind, .. } => match kind {
                ErrorKind::PlatformUnsupported | ErrorKind::PrivilegeDenied => AuditSeverity::Warn,
                _ => AuditSeverity::Error,
            },

            AuditEventType::ExitCleanupFailed { .. } => AuditSeverity::Error,
        }
    }

    /// Short human-readable line for the log sink
    pub fn message(&self) -> String {
        match self {
            AuditEventType::LockdownEntered {
                kiosk_app: Some(app),
                ..
            } => format!("Kiosk mode started, app: {}", app),
            AuditEventType::LockdownEntered { kiosk_app: None, .. } => {
                "Kiosk mode started (launcher as kiosk)".into()
            }
            AuditEventType::LockdownRejected { message, .. } => {
                format!("Failed to start kiosk mode: {}", message)
            }
            AuditEventType::KioskAppLaunched { package } => {
                format!("Kiosk app launched: {}", package)
            }
            AuditEventType::LaunchTargetMissing { package } => {
                format!("Kiosk mode started but app not launchable: {}", package)
            }
            AuditEventType::LaunchFailed { package, message } => {
                format!("Kiosk mode started but launching {} failed: {}", package, message)
            }
            AuditEventType::AllowListRefreshed { allow_list } => {
                format!("Kiosk allowed apps updated: {}", allow_list)
            }
            AuditEventType::RefreshRejected { message, .. } => {
                format!("Failed to update kiosk allowed apps: {}", message)
            }
            AuditEventType::FeaturesUpdated { features } => {
                format!("Lock task features set: {}", features.bits())
            }
            AuditEventType::FeatureUpdateFailed { message } => {
                format!("Failed to set lock task features: {}", message)
            }
            AuditEventType::LockdownExited => "Kiosk mode exited".into(),
            AuditEventType::ExitCleanupFailed { message } => {
                format!("Kiosk exit incomplete: {}", message)
            }
        }
    }
}

/// Full audit event with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Unique event ID
    pub id: i64,

    /// Event timestamp
    pub timestamp: DateTime<Local>,

    pub severity: AuditSeverity,

    /// Event type and details
    pub event: AuditEventType,
}

impl AuditEvent {
    pub fn new(event: AuditEventType) -> Self {
        Self {
            id: 0, // Will be set by store
            timestamp: Local::now(),
            severity: event.severity(),
            event,
        }
    }

    pub fn message(&self) -> String {
        self.event.message()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severities_follow_event_type() {
        assert_eq!(
            AuditEvent::new(AuditEventType::LockdownExited).severity,
            AuditSeverity::Info
        );
        assert_eq!(
            AuditEvent::new(AuditEventType::LaunchTargetMissing {
                package: PackageId::new("com.example.kiosk"),
            })
            .severity,
            AuditSeverity::Warn
        );
        assert_eq!(
            AuditEvent::new(AuditEventType::LockdownRejected {
                kind: ErrorKind::PrivilegeDenied,
                message: "not device owner".into(),
            })
            .severity,
            AuditSeverity::Warn
        );
        assert_eq!(
            AuditEvent::new(AuditEventType::LockdownRejected {
                kind: ErrorKind::PlatformSecurityViolation,
                message: "lock task not permitted".into(),
            })
            .severity,
            AuditSeverity::Error
        );
    }

    #[test]
    fn messages_are_human_readable() {
        let entered = AuditEventType::LockdownEntered {
            allow_list: AllowList::starting_with(PackageId::new("com.hmdm.launcher")),
            kiosk_app: None,
        };
        assert_eq!(entered.message(), "Kiosk mode started (launcher as kiosk)");

        let features = AuditEventType::FeaturesUpdated {
            features: FeatureMask::HOME | FeatureMask::GLOBAL_ACTIONS,
        };
        assert_eq!(features.message(), "Lock task features set: 20");
    }

    #[test]
    fn severity_round_trips_through_text() {
        for severity in [AuditSeverity::Info, AuditSeverity::Warn, AuditSeverity::Error] {
            assert_eq!(AuditSeverity::parse(severity.as_str()), Some(severity));
        }
        assert_eq!(AuditSeverity::parse("debug"), None);
    }
}
