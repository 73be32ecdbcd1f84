//! Lazy mobile renderer
//!
//! Mobile mode presents every page as one scrollable column but renders
//! nothing eagerly: each page starts as a lightweight placeholder
//! registered with the visibility tracker, and gets its raster only when
//! scrolled within the lookahead margin. Renders are one-shot; a page is
//! never re-rendered by later visibility events, only by a mode switch.

use log::debug;

use super::surface::{RequestId, SurfaceSlot};
use crate::session::state::Viewport;
use crate::source::RasterSurface;
use crate::visibility::VisibilityTracker;

/// Upper bound on the fit-to-width scale
pub const MOBILE_MAX_SCALE: f32 = 1.5;

/// Horizontal padding subtracted from the viewport when fitting a page
pub const MOBILE_EDGE_PADDING: f32 = 24.0;

/// Height/width ratio assumed for pages that have not been rendered yet
const ESTIMATED_PAGE_ASPECT: f32 = 1.294;

/// Scale that fits a page into the mobile viewport width, capped
#[must_use]
pub fn fit_scale(viewport_width: f32, intrinsic_width: f32) -> f32 {
    if intrinsic_width <= 0.0 {
        return 1.0;
    }
    ((viewport_width - MOBILE_EDGE_PADDING) / intrinsic_width).min(MOBILE_MAX_SCALE)
}

/// Scroll position of the mobile column, in logical pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_top: f32,
    pub scroll_height: f32,
    pub client_height: f32,
}

impl ScrollMetrics {
    #[must_use]
    pub fn max_scroll_offset(&self) -> f32 {
        (self.scroll_height - self.client_height).max(0.0)
    }
}

/// Reading progress through the column, clamped to 0-100
#[must_use]
pub fn reading_progress(metrics: &ScrollMetrics) -> u8 {
    let max = metrics.max_scroll_offset();
    if max <= 0.0 {
        return 0;
    }
    let percent = metrics.scroll_top / max * 100.0;
    percent.clamp(0.0, 100.0).round() as u8
}

/// One page of the mobile column
#[derive(Clone, Debug)]
pub struct MobilePage {
    /// Page number (1-based)
    pub number: u32,
    /// Ordinal label, "Page 3 of 85"
    pub label: String,
    /// Vertical offset of the page in the column
    pub top: f32,
    /// Display height; estimated until the page is rendered
    pub height: f32,
    pub slot: SurfaceSlot,
}

/// The mobile render target: placeholders, visibility tracking, scroll
/// state
#[derive(Debug)]
pub struct MobileView {
    pages: Vec<MobilePage>,
    tracker: VisibilityTracker,
    scroll: ScrollMetrics,
}

impl MobileView {
    /// Build the placeholder column for a document. No raster content is
    /// produced here.
    #[must_use]
    pub fn build(page_count: u32, viewport: &Viewport) -> Self {
        let estimated_width = (viewport.width as f32 - MOBILE_EDGE_PADDING).max(1.0);
        let estimated_height = estimated_width * ESTIMATED_PAGE_ASPECT;

        let mut tracker = VisibilityTracker::new();
        let mut pages = Vec::with_capacity(page_count as usize);
        for number in 1..=page_count {
            let top = (number - 1) as f32 * estimated_height;
            tracker.register(number, top, estimated_height);
            pages.push(MobilePage {
                number,
                label: format!("Page {number} of {page_count}"),
                top,
                height: estimated_height,
                slot: SurfaceSlot::Empty,
            });
        }

        debug!("built mobile column with {page_count} placeholders");

        Self {
            pages,
            tracker,
            scroll: ScrollMetrics {
                scroll_top: 0.0,
                scroll_height: page_count as f32 * estimated_height,
                client_height: viewport.height as f32,
            },
        }
    }

    #[must_use]
    pub fn pages(&self) -> &[MobilePage] {
        &self.pages
    }

    #[must_use]
    pub fn page(&self, number: u32) -> Option<&MobilePage> {
        self.pages.get(number.checked_sub(1)? as usize)
    }

    fn page_mut(&mut self, number: u32) -> Option<&mut MobilePage> {
        self.pages.get_mut(number.checked_sub(1)? as usize)
    }

    #[must_use]
    pub fn scroll(&self) -> &ScrollMetrics {
        &self.scroll
    }

    /// Record a scroll event and return pages that just came within the
    /// lookahead margin and still need a render.
    pub fn handle_scroll(&mut self, metrics: ScrollMetrics) -> Vec<u32> {
        self.scroll = metrics;
        let visible = self
            .tracker
            .observe(metrics.scroll_top, metrics.client_height);
        visible
            .into_iter()
            .filter(|&n| self.page(n).is_some_and(|p| p.slot.is_empty()))
            .collect()
    }

    /// Reading progress at the current scroll position
    #[must_use]
    pub fn progress(&self) -> u8 {
        reading_progress(&self.scroll)
    }

    /// Target scroll offset for a jump to `page`
    #[must_use]
    pub fn jump_offset(&self, page: u32) -> f32 {
        let count = self.pages.len() as f32;
        if count == 0.0 {
            return 0.0;
        }
        ((page.saturating_sub(1)) as f32 / count) * self.scroll.max_scroll_offset()
    }

    /// First page whose extent reaches below the current scroll top. This
    /// approximates the mobile "current page".
    #[must_use]
    pub fn first_visible_page(&self) -> u32 {
        self.pages
            .iter()
            .find(|p| p.top + p.height > self.scroll.scroll_top)
            .map_or(1, |p| p.number)
    }

    /// Mark a page as having a render in flight
    pub fn mark_pending(&mut self, number: u32, id: RequestId) {
        if let Some(page) = self.page_mut(number) {
            page.slot = SurfaceSlot::Pending(id);
        }
    }

    /// Install a rendered surface. The page's real display height
    /// replaces the estimate and the page stops being tracked.
    pub fn install_surface(&mut self, number: u32, surface: RasterSurface) {
        let height = surface.display_height;
        if let Some(page) = self.page_mut(number) {
            page.slot = SurfaceSlot::Ready(surface);
            page.height = height;
        } else {
            return;
        }
        self.tracker.unregister(number);
        self.relayout();
    }

    /// Record a per-page render failure as an inline marker. The failure
    /// is isolated: other pages keep rendering, and the page is not
    /// retried.
    pub fn mark_failed(&mut self, number: u32, detail: String) {
        if let Some(page) = self.page_mut(number) {
            page.slot = SurfaceSlot::Failed(detail);
        }
        self.tracker.unregister(number);
    }

    /// Recompute page offsets after a height change and push the new
    /// extents into the tracker.
    fn relayout(&mut self) {
        let mut top = 0.0;
        for page in &mut self.pages {
            page.top = top;
            top += page.height;
        }
        self.scroll.scroll_height = top;
        for page in &self.pages {
            self.tracker.update_extent(page.number, page.top, page.height);
        }
    }

    /// Number of pages holding a rendered surface
    #[must_use]
    pub fn rendered_count(&self) -> usize {
        self.pages.iter().filter(|p| p.slot.is_ready()).count()
    }
}
