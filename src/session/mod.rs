//! Responsive document-viewing session
//!
//! State machine, render targets, and controller for paging, zooming, and
//! lazily rendering a multi-page document across the desktop/mobile
//! breakpoint.

mod chrome;
mod controller;
mod mobile;
mod state;
mod surface;
mod toc;
mod zoom;

pub use chrome::{ControlFlags, ReadingTimer, ViewerChrome, desktop_chrome};
pub use controller::{
    ControlBinding, RenderOutcome, RenderTarget, RenderTicket, ViewingSession,
};
pub use mobile::{
    MOBILE_EDGE_PADDING, MOBILE_MAX_SCALE, MobilePage, MobileView, ScrollMetrics, fit_scale,
    reading_progress,
};
pub use state::{Command, Effect, MOBILE_BREAKPOINT, SessionState, ViewMode, Viewport};
pub use surface::{DesktopSurfaces, RequestId, SurfaceSlot};
pub use toc::{TocEntry, chapters_per_section, desktop_outline, mobile_outline};
pub use zoom::{ZOOM_LEVELS, ZoomLevels};
