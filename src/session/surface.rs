//! Render request identity and surface slots

use crate::source::RasterSurface;

/// Unique identifier for render requests
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RequestId(pub u64);

impl RequestId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

/// State of one renderable slot
#[derive(Clone, Debug)]
pub enum SurfaceSlot {
    /// Placeholder, nothing requested yet
    Empty,
    /// A render is in flight
    Pending(RequestId),
    /// Rendered raster installed
    Ready(RasterSurface),
    /// Page outside the document, not shown at all
    Hidden,
    /// Per-page render failure, shown as an inline error marker
    Failed(String),
}

impl SurfaceSlot {
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// The installed surface, if any
    #[must_use]
    pub fn surface(&self) -> Option<&RasterSurface> {
        match self {
            Self::Ready(surface) => Some(surface),
            _ => None,
        }
    }
}

/// The desktop render target: exactly two side-by-side slots
#[derive(Clone, Debug)]
pub struct DesktopSurfaces {
    pub left: SurfaceSlot,
    pub right: SurfaceSlot,
}

impl Default for DesktopSurfaces {
    fn default() -> Self {
        Self {
            left: SurfaceSlot::Empty,
            right: SurfaceSlot::Empty,
        }
    }
}

impl DesktopSurfaces {
    /// Reset both slots to placeholders
    pub fn clear(&mut self) {
        self.left = SurfaceSlot::Empty;
        self.right = SurfaceSlot::Empty;
    }

    /// Number of slots holding a rendered surface
    #[must_use]
    pub fn ready_count(&self) -> usize {
        usize::from(self.left.is_ready()) + usize::from(self.right.is_ready())
    }
}
