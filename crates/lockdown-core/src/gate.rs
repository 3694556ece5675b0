//! Capability gate
//!
//! All knowledge of platform tiers lives here. Callers branch on the
//! capability, never on the API level.

use lockdown_api::OverlayLayer;
use lockdown_host_api::DevicePlatform;
use std::sync::Arc;
use tracing::debug;

/// First tier with lock task packages and the lock task primitive
pub const LOCKDOWN_MIN_API_LEVEL: u32 = 21;

/// First tier with configurable lock task features
pub const FEATURE_CONTROL_MIN_API_LEVEL: u32 = 28;

/// First tier with the dedicated application overlay layer
pub const APPLICATION_OVERLAY_MIN_API_LEVEL: u32 = 26;

/// Capabilities observed at one instant. Never cache it across operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilitySnapshot {
    /// `None` when the platform could not report its tier
    pub api_level: Option<u32>,
    pub is_owner: bool,
    pub can_draw_overlays: bool,
}

impl CapabilitySnapshot {
    pub fn supports_lockdown(&self) -> bool {
        self.api_level.is_some_and(|l| l >= LOCKDOWN_MIN_API_LEVEL)
    }

    pub fn supports_feature_control(&self) -> bool {
        self.api_level
            .is_some_and(|l| l >= FEATURE_CONTROL_MIN_API_LEVEL)
    }
}

/// Read-only view of what the platform allows right now.
///
/// Every query goes to the platform; a failed query reads as "not capable".
#[derive(Clone)]
pub struct CapabilityGate {
    platform: Arc<dyn DevicePlatform>,
}

impl CapabilityGate {
    pub fn new(platform: Arc<dyn DevicePlatform>) -> Self {
        Self { platform }
    }

    fn api_level(&self) -> Option<u32> {
        match self.platform.api_level() {
            Ok(level) => Some(level),
            Err(e) => {
                debug!(error = %e, "API level query failed");
                None
            }
        }
    }

    pub fn platform_supports_lockdown(&self) -> bool {
        self.api_level()
            .is_some_and(|l| l >= LOCKDOWN_MIN_API_LEVEL)
    }

    pub fn platform_supports_feature_control(&self) -> bool {
        self.api_level()
            .is_some_and(|l| l >= FEATURE_CONTROL_MIN_API_LEVEL)
    }

    /// Overlay surfaces need the same tier as lockdown itself
    pub fn platform_supports_overlays(&self) -> bool {
        self.platform_supports_lockdown()
    }

    pub fn is_owner(&self) -> bool {
        self.platform.is_device_owner().unwrap_or_else(|e| {
            debug!(error = %e, "Device owner query failed");
            false
        })
    }

    pub fn can_draw_overlay(&self) -> bool {
        self.platform.can_draw_overlays().unwrap_or_else(|e| {
            debug!(error = %e, "Overlay permission query failed");
            false
        })
    }

    /// Window layer for overlay surfaces on this tier
    pub fn overlay_layer(&self) -> OverlayLayer {
        match self.api_level() {
            Some(level) if level >= APPLICATION_OVERLAY_MIN_API_LEVEL => {
                OverlayLayer::ApplicationOverlay
            }
            _ => OverlayLayer::SystemAlert,
        }
    }

    pub fn snapshot(&self) -> CapabilitySnapshot {
        CapabilitySnapshot {
            api_level: self.api_level(),
            is_owner: self.is_owner(),
            can_draw_overlays: self.can_draw_overlay(),
        }
    }
}
