//! Overlay handle

use lockdown_api::{OverlayGeometry, OverlayKind};
use lockdown_util::OverlayId;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, warn};

use crate::{PlatformResult, SurfaceToken, WindowService};

/// Owned handle to an overlay surface.
///
/// The surface is removed exactly once: either through [`OverlayHandle::destroy`]
/// or when the handle is dropped. Holding an `Rc` to the window service keeps
/// the handle on the UI thread.
pub struct OverlayHandle {
    id: OverlayId,
    kind: OverlayKind,
    geometry: OverlayGeometry,
    token: SurfaceToken,
    service: Rc<dyn WindowService>,
    released: bool,
}

impl OverlayHandle {
    pub fn new(
        kind: OverlayKind,
        geometry: OverlayGeometry,
        token: SurfaceToken,
        service: Rc<dyn WindowService>,
    ) -> Self {
        Self {
            id: OverlayId::new(),
            kind,
            geometry,
            token,
            service,
            released: false,
        }
    }

    pub fn id(&self) -> OverlayId {
        self.id
    }

    pub fn kind(&self) -> OverlayKind {
        self.kind
    }

    pub fn geometry(&self) -> &OverlayGeometry {
        &self.geometry
    }

    pub fn token(&self) -> SurfaceToken {
        self.token
    }

    /// Remove the surface now and report how it went
    pub fn destroy(mut self) -> PlatformResult<()> {
        self.released = true;
        let result = self.service.remove_surface(self.token);
        if result.is_ok() {
            debug!(overlay = %self.id, kind = %self.kind, "Overlay removed");
        }
        result
    }
}

impl Drop for OverlayHandle {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        match self.service.remove_surface(self.token) {
            Ok(()) => debug!(overlay = %self.id, kind = %self.kind, "Overlay removed on drop"),
            Err(e) => warn!(
                overlay = %self.id,
                kind = %self.kind,
                error = %e,
                "Failed to remove overlay on drop"
            ),
        }
    }
}

impl fmt::Debug for OverlayHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverlayHandle")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("geometry", &self.geometry)
            .field("token", &self.token)
            .field("released", &self.released)
            .finish()
    }
}
