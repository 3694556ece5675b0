//! Device platform traits

use lockdown_api::{AllowList, FeatureMask};
use lockdown_util::{LockdownError, PackageId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by the hosting platform
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    #[error("Security violation: {0}")]
    SecurityViolation(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Package not found: {0}")]
    PackageNotFound(PackageId),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type PlatformResult<T> = Result<T, PlatformError>;

impl From<PlatformError> for LockdownError {
    fn from(e: PlatformError) -> Self {
        match e {
            PlatformError::SecurityViolation(msg) => LockdownError::PlatformSecurityViolation(msg),
            PlatformError::PackageNotFound(package) => LockdownError::LaunchTargetMissing(package),
            PlatformError::ServiceUnavailable(msg) | PlatformError::Internal(msg) => {
                LockdownError::UnknownPlatformFault(msg)
            }
        }
    }
}

/// Lock task mode as reported by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockTaskMode {
    None,
    /// Full lockdown started by a device owner
    Locked,
    /// User-initiated screen pinning
    Pinned,
}

impl LockTaskMode {
    pub fn is_active(&self) -> bool {
        !matches!(self, LockTaskMode::None)
    }
}

/// Resolved launch entry point of an installed app
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchTarget {
    pub package: PackageId,

    /// Platform-specific entry component (activity name, desktop id, ...)
    pub component: String,
}

impl LaunchTarget {
    pub fn new(package: PackageId, component: impl Into<String>) -> Self {
        Self {
            package,
            component: component.into(),
        }
    }
}

/// The hosting platform, as seen by the controller.
///
/// Capability queries are live reads; implementations must not cache them.
/// Every method reports platform faults as `PlatformError`, never by panicking.
pub trait DevicePlatform: Send + Sync {
    // Capability queries

    /// Platform API level (OS release tier)
    fn api_level(&self) -> PlatformResult<u32>;

    /// Whether this app holds the device-owner role
    fn is_device_owner(&self) -> PlatformResult<bool>;

    /// Whether the draw-over-other-apps permission is granted
    fn can_draw_overlays(&self) -> PlatformResult<bool>;

    // Policy authority

    /// Replace the set of packages allowed to run in lock task mode
    fn set_lock_task_packages(&self, packages: &AllowList) -> PlatformResult<()>;

    /// Replace the system UI features available in lock task mode
    fn set_lock_task_features(&self, features: FeatureMask) -> PlatformResult<()>;

    // Lock task primitive

    /// Pin the current foreground task
    fn start_lock_task(&self) -> PlatformResult<()>;

    /// Release the current foreground task
    fn stop_lock_task(&self) -> PlatformResult<()>;

    /// Current lock task mode, regardless of who started it
    fn lock_task_mode(&self) -> PlatformResult<LockTaskMode>;

    // Packages

    fn is_package_installed(&self, package: &PackageId) -> PlatformResult<bool>;

    /// Look up the launch entry point; `Ok(None)` when the app has none
    fn resolve_launch_target(&self, package: &PackageId) -> PlatformResult<Option<LaunchTarget>>;

    /// Bring the target to the foreground in a fresh task
    fn launch(&self, target: &LaunchTarget) -> PlatformResult<()>;
}
