//! Overlay surface geometry

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The overlay surfaces the controller knows how to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayKind {
    /// Blocks the notification / quick settings pull-down
    StatusBarBlocker,
    /// Blocks edge-swipe app switchers
    EdgeBlocker,
    /// Invisible touch target for the multi-tap exit gesture
    UnlockControl,
}

impl fmt::Display for OverlayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverlayKind::StatusBarBlocker => f.write_str("status bar blocker"),
            OverlayKind::EdgeBlocker => f.write_str("edge blocker"),
            OverlayKind::UnlockControl => f.write_str("unlock control"),
        }
    }
}

/// Where a surface is pinned on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    Top,
    TopTrailing,
}

/// Width or height of a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extent {
    /// Span the whole display along this axis
    MatchParent,
    Pixels(u32),
}

/// Window layer (z-order) the surface is placed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayLayer {
    /// Dedicated overlay layer on newer platforms
    ApplicationOverlay,
    /// Legacy system alert layer
    SystemAlert,
}

bitflags! {
    /// Window behavior flags, bit-compatible with the platform layout params
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct OverlayFlags: u32 {
        const NOT_FOCUSABLE = 0x0000_0008;
        /// Touches outside the surface go to the windows behind it
        const NOT_TOUCH_MODAL = 0x0000_0020;
        const LAYOUT_IN_SCREEN = 0x0000_0100;
    }
}

/// Everything the window service needs to place a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayGeometry {
    pub anchor: Anchor,
    pub width: Extent,
    pub height: Extent,

    /// Offset from the anchor edge, in pixels
    pub offset_x: i32,
    pub offset_y: i32,

    pub layer: OverlayLayer,
    pub flags: OverlayFlags,

    /// Fully transparent background
    pub transparent: bool,
}
