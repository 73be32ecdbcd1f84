//! Session state management
//!
//! The state machine is pure: [`SessionState::apply`] mutates the state
//! and returns the effects the change produced. Executing those effects
//! (issuing renders, rebuilding layouts) is the controller's job, so
//! every transition stays testable without a document source.

use super::zoom::ZoomLevels;

/// Viewport widths at or below this are Mobile
pub const MOBILE_BREAKPOINT: u32 = 768;

/// How the session presents pages
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewMode {
    /// Two side-by-side surfaces, paged navigation
    Desktop,
    /// One scrollable column, lazily materialized
    Mobile,
}

/// Viewport geometry in logical pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub device_pixel_ratio: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 800,
            device_pixel_ratio: 1.0,
        }
    }
}

impl Viewport {
    #[must_use]
    pub const fn new(width: u32, height: u32, device_pixel_ratio: f32) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio,
        }
    }

    /// Width class of this viewport
    #[must_use]
    pub fn mode(&self) -> ViewMode {
        if self.width <= MOBILE_BREAKPOINT {
            ViewMode::Mobile
        } else {
            ViewMode::Desktop
        }
    }
}

/// Mutable session state
#[derive(Clone, Debug)]
pub struct SessionState {
    /// Leading page of the display window (1-based)
    pub current_page: u32,

    /// Total page count, set once the document is opened
    pub page_count: u32,

    /// Position in the zoom table
    pub zoom: ZoomLevels,

    /// Current viewport geometry
    pub viewport: Viewport,

    /// Presentation mode, derived from the viewport width
    pub mode: ViewMode,
}

impl SessionState {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            current_page: 1,
            page_count: 0,
            zoom: ZoomLevels::default(),
            mode: viewport.mode(),
            viewport,
        }
    }

    /// Leading page of the last reachable window. Odd page counts end on
    /// a singleton window at the final page; even page counts end on the
    /// final pair.
    #[must_use]
    fn last_window_start(&self) -> u32 {
        if self.page_count % 2 == 1 {
            self.page_count
        } else {
            self.page_count.saturating_sub(1)
        }
    }

    /// Apply a command and return resulting effects
    #[must_use]
    pub fn apply(&mut self, cmd: Command) -> Vec<Effect> {
        match cmd {
            Command::NextPage => {
                if self.mode != ViewMode::Desktop
                    || self.page_count == 0
                    || self.current_page >= self.page_count
                {
                    return vec![];
                }
                let next = (self.current_page + 2).min(self.last_window_start());
                if next == self.current_page {
                    return vec![];
                }
                self.current_page = next;
                vec![Effect::InvalidateSurfaces, Effect::RenderWindow]
            }

            Command::PreviousPage => {
                if self.mode != ViewMode::Desktop || self.current_page <= 1 {
                    return vec![];
                }
                self.current_page = self.current_page.saturating_sub(2).max(1);
                vec![Effect::InvalidateSurfaces, Effect::RenderWindow]
            }

            Command::GoToPage(page) => {
                // Out-of-range requests fail silently
                if page < 1 || page > self.page_count {
                    return vec![];
                }
                match self.mode {
                    ViewMode::Desktop => {
                        if self.current_page == page {
                            return vec![];
                        }
                        self.current_page = page;
                        vec![Effect::InvalidateSurfaces, Effect::RenderWindow]
                    }
                    // Mobile has no fixed current page: jump by scrolling
                    // and force-render the target so it lands instantly.
                    ViewMode::Mobile => {
                        vec![Effect::ScrollToPage(page), Effect::RenderPageNow(page)]
                    }
                }
            }

            Command::ZoomIn => {
                if self.mode != ViewMode::Desktop || !self.zoom.zoom_in() {
                    return vec![];
                }
                vec![Effect::InvalidateSurfaces, Effect::RenderWindow]
            }

            Command::ZoomOut => {
                if self.mode != ViewMode::Desktop || !self.zoom.zoom_out() {
                    return vec![];
                }
                vec![Effect::InvalidateSurfaces, Effect::RenderWindow]
            }

            Command::SetZoomLevel(percent) => {
                if self.mode != ViewMode::Desktop || !self.zoom.snap_to(percent) {
                    return vec![];
                }
                vec![Effect::InvalidateSurfaces, Effect::RenderWindow]
            }

            Command::SetViewport(viewport) => {
                let previous = self.mode;
                self.viewport = viewport;
                let mode = viewport.mode();
                if mode == previous {
                    // Same width class: transitions are idempotent
                    return vec![];
                }
                self.mode = mode;
                match mode {
                    ViewMode::Mobile => vec![
                        Effect::InvalidateSurfaces,
                        Effect::RebuildMobileLayout,
                        Effect::BindMobileControls,
                    ],
                    ViewMode::Desktop => vec![
                        Effect::InvalidateSurfaces,
                        Effect::RenderWindow,
                        Effect::BindDesktopControls,
                    ],
                }
            }

            Command::SetPageCount(count) => {
                self.page_count = count;
                if count > 0 && self.current_page > count {
                    self.current_page = count;
                }
                vec![]
            }
        }
    }
}

/// Commands that modify session state
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Advance the desktop window by two pages
    NextPage,
    /// Retreat the desktop window by two pages
    PreviousPage,
    /// Jump directly to a page (1-based)
    GoToPage(u32),
    /// Step one zoom level up
    ZoomIn,
    /// Step one zoom level down
    ZoomOut,
    /// Snap to the zoom level closest to the given percent
    SetZoomLevel(u16),
    /// Update viewport geometry, possibly crossing the breakpoint
    SetViewport(Viewport),
    /// Set the page count (once, at document open)
    SetPageCount(u32),
}

/// Effects produced by state changes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Drop all rendered surfaces; in-flight renders become stale
    InvalidateSurfaces,
    /// Render both desktop surfaces for the current window
    RenderWindow,
    /// Rebuild the mobile placeholder list and visibility tracking
    RebuildMobileLayout,
    /// Rebind desktop-only controls after a mode switch
    BindDesktopControls,
    /// Rebind mobile-only controls after a mode switch
    BindMobileControls,
    /// Smooth-scroll the mobile column to a page
    ScrollToPage(u32),
    /// Render a page immediately, bypassing the visibility tracker
    RenderPageNow(u32),
}
