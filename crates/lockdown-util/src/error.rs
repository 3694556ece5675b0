//! Error types for the lockdown controller

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::PackageId;

/// Coarse classification of every failure the controller can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// OS tier too old for the requested primitive
    PlatformUnsupported,
    /// Caller lacks device-owner privilege
    PrivilegeDenied,
    /// Overlay creation attempted without the draw-over-other-apps grant
    OverlayPermissionDenied,
    /// Lockdown engaged but the designated app has no launch entry point
    LaunchTargetMissing,
    /// The platform rejected the privileged call when it was made
    PlatformSecurityViolation,
    /// Anything else the platform threw at us
    UnknownPlatformFault,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::PlatformUnsupported => "platform_unsupported",
            ErrorKind::PrivilegeDenied => "privilege_denied",
            ErrorKind::OverlayPermissionDenied => "overlay_permission_denied",
            ErrorKind::LaunchTargetMissing => "launch_target_missing",
            ErrorKind::PlatformSecurityViolation => "platform_security_violation",
            ErrorKind::UnknownPlatformFault => "unknown_platform_fault",
        };
        f.write_str(name)
    }
}

/// Core error type for lockdown operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LockdownError {
    #[error("Platform does not support {0}")]
    PlatformUnsupported(String),

    #[error("Device owner privilege required for {0}")]
    PrivilegeDenied(String),

    #[error("Overlay permission not granted")]
    OverlayPermissionDenied,

    #[error("No launch target for package {0}")]
    LaunchTargetMissing(PackageId),

    #[error("Platform security violation: {0}")]
    PlatformSecurityViolation(String),

    #[error("Platform fault: {0}")]
    UnknownPlatformFault(String),
}

impl LockdownError {
    pub fn unsupported(what: impl Into<String>) -> Self {
        Self::PlatformUnsupported(what.into())
    }

    pub fn privilege(what: impl Into<String>) -> Self {
        Self::PrivilegeDenied(what.into())
    }

    pub fn security(msg: impl Into<String>) -> Self {
        Self::PlatformSecurityViolation(msg.into())
    }

    pub fn fault(msg: impl Into<String>) -> Self {
        Self::UnknownPlatformFault(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::PlatformUnsupported(_) => ErrorKind::PlatformUnsupported,
            Self::PrivilegeDenied(_) => ErrorKind::PrivilegeDenied,
            Self::OverlayPermissionDenied => ErrorKind::OverlayPermissionDenied,
            Self::LaunchTargetMissing(_) => ErrorKind::LaunchTargetMissing,
            Self::PlatformSecurityViolation(_) => ErrorKind::PlatformSecurityViolation,
            Self::UnknownPlatformFault(_) => ErrorKind::UnknownPlatformFault,
        }
    }
}

pub type LockdownResult<T> = std::result::Result<T, LockdownError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_match_variants() {
        assert_eq!(
            LockdownError::unsupported("lock task").kind(),
            ErrorKind::PlatformUnsupported
        );
        assert_eq!(
            LockdownError::privilege("lock task").kind(),
            ErrorKind::PrivilegeDenied
        );
        assert_eq!(
            LockdownError::LaunchTargetMissing(PackageId::new("com.example.kiosk")).kind(),
            ErrorKind::LaunchTargetMissing
        );
        assert_eq!(
            LockdownError::security("denied").kind(),
            ErrorKind::PlatformSecurityViolation
        );
        assert_eq!(LockdownError::fault("boom").kind(), ErrorKind::UnknownPlatformFault);
    }

    #[test]
    fn error_messages_carry_context() {
        let err = LockdownError::LaunchTargetMissing(PackageId::new("com.example.kiosk"));
        assert_eq!(err.to_string(), "No launch target for package com.example.kiosk");
        assert_eq!(ErrorKind::PrivilegeDenied.to_string(), "privilege_denied");
    }
}
