//! Viewing session controller
//!
//! Owns the session state, the per-mode render targets, and the render
//! pipeline. Mutations go through [`ViewingSession::apply`], which runs
//! the state machine and executes the resulting effects; rendering is a
//! separate, idempotent step ([`ViewingSession::pump`] +
//! [`ViewingSession::apply_outcome`]) so completions can arrive in any
//! order.
//!
//! The source implements no cancellation, so an in-flight render always
//! completes. Every ticket is stamped with the generation current at
//! enqueue time; invalidation bumps the generation, and outcomes carrying
//! an older stamp are discarded instead of overwriting newer surfaces.

use log::{debug, info};

use super::chrome::{ViewerChrome, desktop_chrome};
use super::mobile::{MobileView, ScrollMetrics, fit_scale};
use super::state::{Command, Effect, SessionState, ViewMode, Viewport};
use super::surface::{DesktopSurfaces, RequestId, SurfaceSlot};
use super::toc::{TocEntry, desktop_outline, mobile_outline};
use crate::source::{
    DocumentId, DocumentSource, LoadProgress, PageSource, RasterSurface, RenderParams, SourceError,
};

/// Which slot a render ticket fills
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderTarget {
    DesktopLeft,
    DesktopRight,
    Mobile,
}

/// A render request waiting to be executed against the source
#[derive(Clone, Copy, Debug)]
pub struct RenderTicket {
    pub id: RequestId,
    pub page: u32,
    pub target: RenderTarget,
    pub params: RenderParams,
    /// Generation current when the ticket was enqueued
    pub generation: u64,
}

/// A completed render, not yet applied to a surface
#[derive(Debug)]
pub struct RenderOutcome {
    pub id: RequestId,
    pub page: u32,
    pub target: RenderTarget,
    pub generation: u64,
    pub result: Result<RasterSurface, SourceError>,
}

/// Which control set the input adapter currently has bound
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlBinding {
    /// Page/zoom buttons and keyboard shortcuts
    Desktop,
    /// Contents and fullscreen triggers
    Mobile,
    /// Session torn down
    Unbound,
}

/// A responsive document-viewing session
pub struct ViewingSession {
    document_id: DocumentId,
    source: Box<dyn PageSource>,
    state: SessionState,
    desktop: DesktopSurfaces,
    mobile: Option<MobileView>,
    pending: Vec<RenderTicket>,
    next_request_id: u64,
    generation: u64,
    controls: ControlBinding,
}

impl ViewingSession {
    /// Open a document and set up the layout for the current viewport.
    /// Open failures abort the session; the caller redirects to the
    /// catalog.
    pub fn open(
        source: &dyn DocumentSource,
        document_id: DocumentId,
        viewport: Viewport,
    ) -> Result<Self, SourceError> {
        Self::open_with_progress(source, document_id, viewport, &mut |_| {})
    }

    /// Open with byte-level progress reporting
    pub fn open_with_progress(
        source: &dyn DocumentSource,
        document_id: DocumentId,
        viewport: Viewport,
        progress: &mut dyn FnMut(LoadProgress),
    ) -> Result<Self, SourceError> {
        let document = source.open_with_progress(&document_id, progress)?;
        let page_count = document.page_count();
        info!("opened {document_id}: {page_count} pages");

        let mut state = SessionState::new(viewport);
        let _ = state.apply(Command::SetPageCount(page_count));

        let mut session = Self {
            document_id,
            source: document,
            state,
            desktop: DesktopSurfaces::default(),
            mobile: None,
            pending: Vec::new(),
            next_request_id: 1,
            generation: 0,
            controls: ControlBinding::Unbound,
        };

        match session.state.mode {
            ViewMode::Desktop => {
                session.execute(Effect::RenderWindow);
                session.execute(Effect::BindDesktopControls);
            }
            ViewMode::Mobile => {
                session.execute(Effect::RebuildMobileLayout);
                session.execute(Effect::BindMobileControls);
            }
        }

        Ok(session)
    }

    #[must_use]
    pub fn document_id(&self) -> &DocumentId {
        &self.document_id
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn desktop_surfaces(&self) -> &DesktopSurfaces {
        &self.desktop
    }

    #[must_use]
    pub fn mobile_view(&self) -> Option<&MobileView> {
        self.mobile.as_ref()
    }

    #[must_use]
    pub fn controls(&self) -> ControlBinding {
        self.controls
    }

    /// Toolbar snapshot for the current state
    #[must_use]
    pub fn chrome(&self) -> ViewerChrome {
        desktop_chrome(&self.state)
    }

    /// Outline for the current mode's contents control
    #[must_use]
    pub fn outline(&self) -> Vec<TocEntry> {
        match self.state.mode {
            ViewMode::Desktop => desktop_outline(self.state.page_count),
            ViewMode::Mobile => mobile_outline(self.state.page_count),
        }
    }

    /// Apply a command, execute its effects, and return them so the input
    /// adapter can react (scrolling, control rebinding).
    pub fn apply(&mut self, cmd: Command) -> Vec<Effect> {
        let effects = self.state.apply(cmd);
        for effect in &effects {
            self.execute(*effect);
        }
        effects
    }

    fn execute(&mut self, effect: Effect) {
        match effect {
            Effect::InvalidateSurfaces => {
                self.generation += 1;
                self.pending.clear();
                self.desktop.clear();
                self.mobile = None;
                debug!("surfaces invalidated, generation {}", self.generation);
            }

            Effect::RenderWindow => self.request_window(),

            Effect::RebuildMobileLayout => self.rebuild_mobile_layout(),

            Effect::BindDesktopControls => self.controls = ControlBinding::Desktop,

            Effect::BindMobileControls => self.controls = ControlBinding::Mobile,

            // The scroll itself belongs to the host; the offset is
            // available through scroll_target_for.
            Effect::ScrollToPage(_) => {}

            Effect::RenderPageNow(page) => self.enqueue_mobile_render(page),
        }
    }

    /// Request both desktop surfaces for the current window. Idempotent
    /// for a given state: slots already pending or ready are left alone.
    fn request_window(&mut self) {
        let current = self.state.current_page;
        self.enqueue_desktop(RenderTarget::DesktopLeft, current);
        self.enqueue_desktop(RenderTarget::DesktopRight, current + 1);
    }

    fn enqueue_desktop(&mut self, target: RenderTarget, page: u32) {
        let slot = match target {
            RenderTarget::DesktopLeft => &mut self.desktop.left,
            RenderTarget::DesktopRight => &mut self.desktop.right,
            RenderTarget::Mobile => return,
        };

        // Out-of-range pages are hidden, not errors
        if page < 1 || page > self.state.page_count {
            *slot = SurfaceSlot::Hidden;
            return;
        }

        if !slot.is_empty() {
            return;
        }

        let id = RequestId::new(self.next_request_id);
        self.next_request_id += 1;
        *slot = SurfaceSlot::Pending(id);

        let params = RenderParams::new(
            self.state.zoom.factor(),
            self.state.viewport.device_pixel_ratio,
        );
        self.pending.push(RenderTicket {
            id,
            page,
            target,
            params,
            generation: self.generation,
        });
    }

    fn rebuild_mobile_layout(&mut self) {
        let mut view = MobileView::build(self.state.page_count, &self.state.viewport);

        // Kick off renders for the initially visible pages without
        // waiting for the first scroll event.
        let initial = view.handle_scroll(*view.scroll());
        self.mobile = Some(view);
        for page in initial {
            self.enqueue_mobile_render(page);
        }
    }

    fn enqueue_mobile_render(&mut self, page: u32) {
        let Some(view) = self.mobile.as_mut() else {
            return;
        };
        if !view.page(page).is_some_and(|p| p.slot.is_empty()) {
            return;
        }

        // The fit scale needs the page's intrinsic width; a failure here
        // is a per-page fault and degrades to an inline marker.
        let info = match self.source.page(page) {
            Ok(info) => info,
            Err(err) => {
                debug!("page {page} geometry unavailable: {err}");
                view.mark_failed(page, err.to_string());
                return;
            }
        };

        let scale = fit_scale(self.state.viewport.width as f32, info.width);
        let params = RenderParams::new(scale, self.state.viewport.device_pixel_ratio);

        let id = RequestId::new(self.next_request_id);
        self.next_request_id += 1;
        view.mark_pending(page, id);
        self.pending.push(RenderTicket {
            id,
            page,
            target: RenderTarget::Mobile,
            params,
            generation: self.generation,
        });
    }

    /// Record a scroll of the mobile column: updates progress, triggers
    /// lookahead renders. Returns the reading progress, or None in
    /// desktop mode.
    pub fn handle_scroll(&mut self, metrics: ScrollMetrics) -> Option<u8> {
        let view = self.mobile.as_mut()?;
        let to_render = view.handle_scroll(metrics);
        let progress = view.progress();
        for page in to_render {
            self.enqueue_mobile_render(page);
        }
        Some(progress)
    }

    /// Scroll offset for a mobile jump to `page`
    #[must_use]
    pub fn scroll_target_for(&self, page: u32) -> Option<f32> {
        self.mobile.as_ref().map(|v| v.jump_offset(page))
    }

    /// Execute all pending render tickets against the source and return
    /// the outcomes without applying them. Stale tickets still render
    /// (the source cannot cancel) and are weeded out at apply time.
    pub fn pump(&mut self) -> Vec<RenderOutcome> {
        let tickets = std::mem::take(&mut self.pending);
        tickets
            .into_iter()
            .map(|ticket| {
                let result = self.source.render(ticket.page, &ticket.params);
                RenderOutcome {
                    id: ticket.id,
                    page: ticket.page,
                    target: ticket.target,
                    generation: ticket.generation,
                    result,
                }
            })
            .collect()
    }

    /// Install a completed render. Returns false when the outcome is
    /// stale (older generation, or its slot was reassigned) and was
    /// discarded.
    pub fn apply_outcome(&mut self, outcome: RenderOutcome) -> bool {
        if outcome.generation != self.generation {
            debug!(
                "discarding stale render of page {} (generation {} < {})",
                outcome.page, outcome.generation, self.generation
            );
            return false;
        }

        match outcome.target {
            RenderTarget::DesktopLeft | RenderTarget::DesktopRight => {
                let slot = match outcome.target {
                    RenderTarget::DesktopLeft => &mut self.desktop.left,
                    _ => &mut self.desktop.right,
                };
                // Discard by surface identity: only the render that was
                // issued for this slot may fill it.
                if !matches!(slot, SurfaceSlot::Pending(id) if *id == outcome.id) {
                    debug!("discarding render of page {}: slot reassigned", outcome.page);
                    return false;
                }
                *slot = match outcome.result {
                    Ok(surface) => SurfaceSlot::Ready(surface),
                    Err(err) => SurfaceSlot::Failed(err.to_string()),
                };
                true
            }

            RenderTarget::Mobile => {
                let Some(view) = self.mobile.as_mut() else {
                    return false;
                };
                let pending_here = matches!(
                    view.page(outcome.page).map(|p| &p.slot),
                    Some(SurfaceSlot::Pending(id)) if *id == outcome.id
                );
                if !pending_here {
                    debug!("discarding render of page {}: slot reassigned", outcome.page);
                    return false;
                }
                match outcome.result {
                    Ok(surface) => view.install_surface(outcome.page, surface),
                    Err(err) => view.mark_failed(outcome.page, err.to_string()),
                }
                true
            }
        }
    }

    /// Pump all pending renders and apply the fresh ones. Returns how
    /// many were applied.
    pub fn pump_and_apply(&mut self) -> usize {
        self.pump()
            .into_iter()
            .map(|outcome| self.apply_outcome(outcome))
            .filter(|applied| *applied)
            .count()
    }

    /// Tear the session down: drop surfaces, detach tracking, unbind
    /// controls.
    pub fn close(&mut self) {
        self.pending.clear();
        self.desktop.clear();
        self.mobile = None;
        self.controls = ControlBinding::Unbound;
        info!("closed session for {}", self.document_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FakeSource;

    fn desktop_viewport() -> Viewport {
        Viewport::new(1280, 800, 1.0)
    }

    fn mobile_viewport() -> Viewport {
        Viewport::new(480, 800, 2.0)
    }

    #[test]
    fn open_renders_both_desktop_surfaces() {
        let source = FakeSource::with_pages(10);
        let mut session =
            ViewingSession::open(&source, DocumentId::from("a.pdf"), desktop_viewport()).unwrap();

        assert_eq!(session.pump_and_apply(), 2);
        assert_eq!(session.desktop_surfaces().ready_count(), 2);
        assert_eq!(session.controls(), ControlBinding::Desktop);
    }

    #[test]
    fn singleton_tail_hides_right_surface() {
        let source = FakeSource::with_pages(5);
        let mut session =
            ViewingSession::open(&source, DocumentId::from("a.pdf"), desktop_viewport()).unwrap();
        let _ = session.apply(Command::GoToPage(5));
        let _ = session.pump_and_apply();

        assert!(session.desktop_surfaces().left.is_ready());
        assert!(matches!(
            session.desktop_surfaces().right,
            SurfaceSlot::Hidden
        ));
    }

    #[test]
    fn stale_outcomes_are_discarded() {
        let source = FakeSource::with_pages(10);
        let mut session =
            ViewingSession::open(&source, DocumentId::from("a.pdf"), desktop_viewport()).unwrap();

        // Render completes, but a zoom change lands first
        let outcomes = session.pump();
        let _ = session.apply(Command::ZoomIn);
        for outcome in outcomes {
            assert!(!session.apply_outcome(outcome));
        }

        // The newer request still fills the slots
        assert_eq!(session.pump_and_apply(), 2);
        let left = session.desktop_surfaces().left.surface().unwrap();
        assert_eq!(left.scale, 1.05);
    }

    #[test]
    fn open_in_mobile_builds_placeholders_and_renders_lazily() {
        let source = FakeSource::with_pages(30);
        let mut session =
            ViewingSession::open(&source, DocumentId::from("a.pdf"), mobile_viewport()).unwrap();

        assert_eq!(session.controls(), ControlBinding::Mobile);
        let view = session.mobile_view().unwrap();
        assert_eq!(view.pages().len(), 30);

        let applied = session.pump_and_apply();
        assert!(applied > 0);
        assert!(applied < 30);
    }

    #[test]
    fn per_page_failure_becomes_inline_marker() {
        let source = FakeSource::with_pages(10).failing_render(1);
        let mut session =
            ViewingSession::open(&source, DocumentId::from("a.pdf"), desktop_viewport()).unwrap();
        let _ = session.pump_and_apply();

        assert!(matches!(
            session.desktop_surfaces().left,
            SurfaceSlot::Failed(_)
        ));
        assert!(session.desktop_surfaces().right.is_ready());
    }

    #[test]
    fn close_unbinds_and_clears() {
        let source = FakeSource::with_pages(10);
        let mut session =
            ViewingSession::open(&source, DocumentId::from("a.pdf"), desktop_viewport()).unwrap();
        let _ = session.pump_and_apply();

        session.close();
        assert_eq!(session.controls(), ControlBinding::Unbound);
        assert_eq!(session.desktop_surfaces().ready_count(), 0);
        assert!(session.mobile_view().is_none());
    }
}
