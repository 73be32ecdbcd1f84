//! Document source contract
//!
//! The viewing session never decodes documents itself. Everything it needs
//! from a rendering engine is behind [`DocumentSource`] and [`PageSource`]:
//! open an identifier to get a page count, ask a page for its intrinsic
//! size, render a page at a scale into a raster surface.

#[cfg(feature = "pdf")]
mod mupdf_source;

#[cfg(feature = "pdf")]
pub use mupdf_source::MupdfSource;

/// Density factor cap. Backing resolution never exceeds twice the display
/// size regardless of the device pixel ratio.
pub const MAX_DENSITY_FACTOR: f32 = 2.0;

/// Opaque identifier for a document, as resolved from the navigation
/// surface (typically a filename).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DocumentId(String);

impl DocumentId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Errors from the document source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("document not found: {0}")]
    NotFound(String),

    #[error("failed to decode document: {0}")]
    Decode(String),

    #[error("failed to load page {page}: {detail}")]
    Page { page: u32, detail: String },

    #[error("failed to render page {page}: {detail}")]
    Render { page: u32, detail: String },
}

impl SourceError {
    /// True for failures that are isolated to a single page and must not
    /// abort the session.
    #[must_use]
    pub fn is_per_page(&self) -> bool {
        matches!(self, Self::Page { .. } | Self::Render { .. })
    }
}

/// Intrinsic geometry of a single page, in points at scale 1.0
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageInfo {
    /// Page number (1-based)
    pub number: u32,
    /// Intrinsic width in points
    pub width: f32,
    /// Intrinsic height in points
    pub height: f32,
}

/// Parameters for rendering one page
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderParams {
    /// User-facing scale factor (1.0 = 100%)
    pub scale: f32,
    /// Backing-resolution multiplier, already capped
    pub density_factor: f32,
}

impl RenderParams {
    /// Build params from a scale and the raw device pixel ratio. The
    /// density factor only affects backing resolution, never layout size.
    #[must_use]
    pub fn new(scale: f32, device_pixel_ratio: f32) -> Self {
        Self {
            scale,
            density_factor: device_pixel_ratio.clamp(1.0, MAX_DENSITY_FACTOR),
        }
    }
}

/// A rendered raster target for one page at one scale.
///
/// `width_px`/`height_px` are the backing dimensions (intrinsic size x
/// scale x density factor); `display_width`/`display_height` are the
/// layout dimensions (intrinsic size x scale).
#[derive(Clone)]
pub struct RasterSurface {
    /// Page number (1-based)
    pub page: u32,
    /// Raw RGB pixel data (3 bytes per pixel), may be empty for sources
    /// that only report geometry
    pub pixels: Vec<u8>,
    /// Backing width in pixels
    pub width_px: u32,
    /// Backing height in pixels
    pub height_px: u32,
    /// Display width in logical pixels
    pub display_width: f32,
    /// Display height in logical pixels
    pub display_height: f32,
    /// Scale factor the surface was rendered at
    pub scale: f32,
}

impl RasterSurface {
    /// Compute surface dimensions for a page under the given params.
    #[must_use]
    pub fn sized_for(info: &PageInfo, params: &RenderParams) -> Self {
        let display_width = info.width * params.scale;
        let display_height = info.height * params.scale;
        Self {
            page: info.number,
            pixels: Vec::new(),
            width_px: (display_width * params.density_factor).round() as u32,
            height_px: (display_height * params.density_factor).round() as u32,
            display_width,
            display_height,
            scale: params.scale,
        }
    }
}

impl std::fmt::Debug for RasterSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterSurface")
            .field("page", &self.page)
            .field("width_px", &self.width_px)
            .field("height_px", &self.height_px)
            .field("display_width", &self.display_width)
            .field("display_height", &self.display_height)
            .field("scale", &self.scale)
            .finish_non_exhaustive()
    }
}

/// Byte-level progress of a document open
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadProgress {
    pub loaded: u64,
    pub total: Option<u64>,
}

impl LoadProgress {
    /// Percentage complete, when the total is known
    #[must_use]
    pub fn percent(&self) -> Option<u8> {
        let total = self.total?;
        if total == 0 {
            return None;
        }
        Some(((self.loaded.min(total) * 100) / total) as u8)
    }
}

/// An opened document: page count plus per-page geometry and rendering
pub trait PageSource {
    /// Number of pages in the document
    fn page_count(&self) -> u32;

    /// Intrinsic geometry of a page (1-based)
    fn page(&self, number: u32) -> Result<PageInfo, SourceError>;

    /// Render a page into a raster surface. Failures are recoverable per
    /// page.
    fn render(&mut self, number: u32, params: &RenderParams) -> Result<RasterSurface, SourceError>;
}

/// Resolves document identifiers into opened documents
pub trait DocumentSource {
    fn open(&self, id: &DocumentId) -> Result<Box<dyn PageSource>, SourceError>;

    /// Open with byte-level progress reporting. Sources that cannot
    /// report progress fall back to a plain open.
    fn open_with_progress(
        &self,
        id: &DocumentId,
        progress: &mut dyn FnMut(LoadProgress),
    ) -> Result<Box<dyn PageSource>, SourceError> {
        let _ = progress;
        self.open(id)
    }
}
