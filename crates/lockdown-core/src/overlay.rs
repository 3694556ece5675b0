//! Overlay surfaces that harden a locked device
//!
//! The surfaces cover the status bar (notification pull-down), the trailing
//! screen edge (edge-swipe switchers) and a hidden corner target the host
//! uses for its exit gesture. None of them are required for lockdown to
//! work, so every failure here yields no handle instead of an error.

use lockdown_api::{Anchor, Extent, OverlayFlags, OverlayGeometry, OverlayKind, OverlayLayer};
use lockdown_host_api::{OverlayHandle, WindowService};
use lockdown_util::{ErrorKind, LockdownError, LockdownResult};
use std::rc::Rc;
use tracing::{debug, error, warn};

use crate::CapabilityGate;

/// Status bar height in density-independent pixels when the platform does not report one
pub const STATUS_BAR_FALLBACK_DP: f32 = 24.0;

pub const EDGE_BLOCKER_WIDTH_PX: u32 = 10;

pub const UNLOCK_CONTROL_SIZE_PX: u32 = 100;

/// Distance of the unlock control from the trailing edge and the status bar
pub const UNLOCK_CONTROL_MARGIN_PX: i32 = 20;

/// Status bar height in pixels, falling back to the standard height at the
/// display's density
pub fn status_bar_height(windows: &dyn WindowService) -> u32 {
    match windows.status_bar_height() {
        Some(height) if height > 0 => height,
        _ => (STATUS_BAR_FALLBACK_DP * windows.density()) as u32,
    }
}

/// Placement of an overlay surface
pub fn overlay_geometry(kind: OverlayKind, status_bar_height: u32, layer: OverlayLayer) -> OverlayGeometry {
    let blocker_flags =
        OverlayFlags::NOT_FOCUSABLE | OverlayFlags::NOT_TOUCH_MODAL | OverlayFlags::LAYOUT_IN_SCREEN;

    match kind {
        OverlayKind::StatusBarBlocker => OverlayGeometry {
            anchor: Anchor::Top,
            width: Extent::MatchParent,
            height: Extent::Pixels(status_bar_height),
            offset_x: 0,
            offset_y: 0,
            layer,
            flags: blocker_flags,
            transparent: true,
        },
        OverlayKind::EdgeBlocker => OverlayGeometry {
            anchor: Anchor::TopTrailing,
            width: Extent::Pixels(EDGE_BLOCKER_WIDTH_PX),
            height: Extent::MatchParent,
            offset_x: 0,
            offset_y: 0,
            layer,
            flags: blocker_flags,
            transparent: true,
        },
        OverlayKind::UnlockControl => OverlayGeometry {
            anchor: Anchor::TopTrailing,
            width: Extent::Pixels(UNLOCK_CONTROL_SIZE_PX),
            height: Extent::Pixels(UNLOCK_CONTROL_SIZE_PX),
            offset_x: UNLOCK_CONTROL_MARGIN_PX,
            offset_y: i32::try_from(status_bar_height)
                .unwrap_or(i32::MAX)
                .saturating_add(UNLOCK_CONTROL_MARGIN_PX),
            layer,
            // Must receive taps
            flags: OverlayFlags::NOT_FOCUSABLE,
            transparent: true,
        },
    }
}

/// Creates overlay surfaces on the UI thread.
///
/// The window service is optional: hosts without one still get a manager,
/// it just never produces a handle.
pub struct OverlaySurfaceManager {
    gate: CapabilityGate,
    windows: Option<Rc<dyn WindowService>>,
}

impl OverlaySurfaceManager {
    pub fn new(gate: CapabilityGate, windows: Option<Rc<dyn WindowService>>) -> Self {
        Self { gate, windows }
    }

    pub fn block_status_bar(&self) -> Option<OverlayHandle> {
        self.create(OverlayKind::StatusBarBlocker)
    }

    pub fn block_edge_swipe(&self) -> Option<OverlayHandle> {
        self.create(OverlayKind::EdgeBlocker)
    }

    pub fn create_unlock_control(&self) -> Option<OverlayHandle> {
        self.create(OverlayKind::UnlockControl)
    }

    /// Create a surface, logging and swallowing any failure
    pub fn create(&self, kind: OverlayKind) -> Option<OverlayHandle> {
        match self.try_create(kind) {
            Ok(handle) => {
                debug!(overlay = %handle.id(), kind = %kind, token = %handle.token(), "Overlay created");
                Some(handle)
            }
            Err(e) => {
                match e.kind() {
                    ErrorKind::PlatformUnsupported | ErrorKind::OverlayPermissionDenied => {
                        warn!(kind = %kind, error = %e, "Overlay not created")
                    }
                    _ => error!(kind = %kind, error = %e, "Failed to create overlay"),
                }
                None
            }
        }
    }

    /// Create a surface, reporting why it could not be created
    pub fn try_create(&self, kind: OverlayKind) -> LockdownResult<OverlayHandle> {
        if !self.gate.platform_supports_overlays() {
            return Err(LockdownError::unsupported("overlay surfaces"));
        }
        if !self.gate.can_draw_overlay() {
            return Err(LockdownError::OverlayPermissionDenied);
        }
        let Some(windows) = &self.windows else {
            return Err(LockdownError::fault("window service unavailable"));
        };

        let geometry = overlay_geometry(
            kind,
            status_bar_height(windows.as_ref()),
            self.gate.overlay_layer(),
        );
        let token = windows.add_surface(&geometry)?;

        Ok(OverlayHandle::new(kind, geometry, token, Rc::clone(windows)))
    }

    /// Remove a surface. Returns false if the platform refused.
    pub fn destroy(&self, handle: OverlayHandle) -> bool {
        let kind = handle.kind();
        match handle.destroy() {
            Ok(()) => true,
            Err(e) => {
                warn!(kind = %kind, error = %e, "Failed to remove overlay");
                false
            }
        }
    }
}
