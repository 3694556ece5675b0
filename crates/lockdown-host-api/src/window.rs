//! Window service interface for overlay surfaces
//!
//! The window service is bound to the UI thread, so the trait carries no
//! `Send`/`Sync` bounds and is shared through `Rc`.

use lockdown_api::OverlayGeometry;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::PlatformResult;

/// Platform token for a surface added to the window service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceToken(u64);

impl SurfaceToken {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SurfaceToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface#{}", self.0)
    }
}

/// Window/surface service of the hosting platform
pub trait WindowService {
    /// Status bar height in pixels, if the platform exposes it
    fn status_bar_height(&self) -> Option<u32>;

    /// Display density (pixels per density-independent pixel)
    fn density(&self) -> f32;

    /// Add a surface above all apps
    fn add_surface(&self, geometry: &OverlayGeometry) -> PlatformResult<SurfaceToken>;

    /// Remove a previously added surface
    fn remove_surface(&self, token: SurfaceToken) -> PlatformResult<()>;
}
