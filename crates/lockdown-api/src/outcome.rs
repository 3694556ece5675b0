//! Outcomes of controller operations

use lockdown_util::{ErrorKind, PackageId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of an operation that did not fail outright
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LockdownOutcome {
    Success,
    /// The primary guarantee holds but something secondary did not happen
    Degraded { reason: Degradation },
}

impl LockdownOutcome {
    pub fn degraded(reason: Degradation) -> Self {
        Self::Degraded { reason }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    pub fn degradation(&self) -> Option<&Degradation> {
        match self {
            Self::Success => None,
            Self::Degraded { reason } => Some(reason),
        }
    }
}

/// Why a successful operation is only partially successful
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Degradation {
    /// Lockdown engaged but the app has no launch entry point
    LaunchTargetMissing { package: PackageId },

    /// Lockdown engaged, the entry point resolved, but the launch faulted
    LaunchFailed {
        package: PackageId,
        kind: ErrorKind,
        message: String,
    },

    /// State is unlocked but the platform may not have fully released
    CleanupIncomplete { faults: Vec<String> },
}

impl Degradation {
    /// Reason code reported to the host
    pub fn kind(&self) -> ErrorKind {
        match self {
            Degradation::LaunchTargetMissing { .. } => ErrorKind::LaunchTargetMissing,
            Degradation::LaunchFailed { kind, .. } => *kind,
            Degradation::CleanupIncomplete { .. } => ErrorKind::UnknownPlatformFault,
        }
    }
}

impl fmt::Display for Degradation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Degradation::LaunchTargetMissing { package } => {
                write!(f, "no launch target for {}", package)
            }
            Degradation::LaunchFailed {
                package, message, ..
            } => write!(f, "launching {} failed: {}", package, message),
            Degradation::CleanupIncomplete { faults } => {
                write!(f, "exit cleanup incomplete: {}", faults.join("; "))
            }
        }
    }
}
