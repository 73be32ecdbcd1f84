use lectern::session::{
    Command, ControlBinding, ScrollMetrics, ViewMode, ViewingSession, Viewport,
};
use lectern::source::DocumentId;
use lectern::test_utils::FakeSource;

fn mobile_viewport() -> Viewport {
    Viewport::new(480, 800, 2.0)
}

fn desktop_viewport() -> Viewport {
    Viewport::new(1280, 800, 1.0)
}

fn open_mobile(source: &FakeSource) -> ViewingSession {
    ViewingSession::open(source, DocumentId::from("guide.pdf"), mobile_viewport()).unwrap()
}

#[test]
fn mobile_open_materializes_only_visible_pages() {
    let source = FakeSource::with_pages(40);
    let mut session = open_mobile(&source);

    let _ = session.pump_and_apply();
    let view = session.mobile_view().unwrap();

    assert_eq!(view.pages().len(), 40);
    let rendered = view.rendered_count();
    assert!(rendered > 0, "initially visible pages render eagerly");
    assert!(rendered < 10, "far pages stay placeholders");
}

#[test]
fn scrolling_renders_ahead_of_the_viewport() {
    let source = FakeSource::with_pages(40);
    let mut session = open_mobile(&source);
    let _ = session.pump_and_apply();
    let before = session.mobile_view().unwrap().rendered_count();

    let metrics = ScrollMetrics {
        scroll_top: 3000.0,
        scroll_height: session.mobile_view().unwrap().scroll().scroll_height,
        client_height: 800.0,
    };
    let progress = session.handle_scroll(metrics).unwrap();
    let _ = session.pump_and_apply();

    assert!(session.mobile_view().unwrap().rendered_count() > before);
    assert!(progress > 0);
}

#[test]
fn scroll_progress_is_clamped_percentage() {
    let source = FakeSource::with_pages(10);
    let mut session = open_mobile(&source);
    let _ = session.pump_and_apply();

    let scroll_height = session.mobile_view().unwrap().scroll().scroll_height;
    let max = scroll_height - 800.0;

    let half = session
        .handle_scroll(ScrollMetrics {
            scroll_top: max / 2.0,
            scroll_height,
            client_height: 800.0,
        })
        .unwrap();
    assert_eq!(half, 50);

    let over = session
        .handle_scroll(ScrollMetrics {
            scroll_top: max * 3.0,
            scroll_height,
            client_height: 800.0,
        })
        .unwrap();
    assert_eq!(over, 100);
}

#[test]
fn jump_to_page_force_renders_the_target() {
    let source = FakeSource::with_pages(40);
    let mut session = open_mobile(&source);
    let _ = session.pump_and_apply();

    // Page 30 is far outside the lookahead
    assert!(
        session
            .mobile_view()
            .unwrap()
            .page(30)
            .unwrap()
            .slot
            .is_empty()
    );

    let _ = session.apply(Command::GoToPage(30));
    let _ = session.pump_and_apply();

    assert!(
        session
            .mobile_view()
            .unwrap()
            .page(30)
            .unwrap()
            .slot
            .is_ready()
    );
    let offset = session.scroll_target_for(30).unwrap();
    assert!(offset > 0.0);
}

#[test]
fn mobile_render_failure_is_isolated() {
    let source = FakeSource::with_pages(10).failing_render(1);
    let mut session = open_mobile(&source);
    let _ = session.pump_and_apply();

    let view = session.mobile_view().unwrap();
    assert!(matches!(
        view.page(1).unwrap().slot,
        lectern::session::SurfaceSlot::Failed(_)
    ));
    assert!(view.page(2).unwrap().slot.is_ready());
}

#[test]
fn mobile_fit_scale_is_capped_and_fits_width() {
    let source = FakeSource::with_pages(4).with_page_size(912.0, 1200.0);
    let mut session = open_mobile(&source);
    let _ = session.pump_and_apply();

    // (480 - 24) / 912 = 0.5
    let calls = source.renders();
    assert!(!calls.is_empty());
    assert!(calls.iter().all(|c| (c.scale - 0.5).abs() < 0.001));

    // A narrow page would exceed the cap; it must stop at 1.5
    let narrow = FakeSource::with_pages(4).with_page_size(100.0, 160.0);
    let mut session = open_mobile(&narrow);
    let _ = session.pump_and_apply();
    assert!(
        narrow
            .renders()
            .iter()
            .all(|c| c.scale == lectern::session::MOBILE_MAX_SCALE)
    );
}

#[test]
fn mode_switch_round_trip_restores_desktop_state() {
    let source = FakeSource::with_pages(30);
    let mut session =
        ViewingSession::open(&source, DocumentId::from("guide.pdf"), desktop_viewport()).unwrap();
    let _ = session.apply(Command::GoToPage(11));
    let _ = session.apply(Command::SetZoomLevel(150));
    let _ = session.pump_and_apply();

    // Shrink below the breakpoint and back
    let _ = session.apply(Command::SetViewport(mobile_viewport()));
    assert_eq!(session.state().mode, ViewMode::Mobile);
    assert_eq!(session.controls(), ControlBinding::Mobile);
    assert!(session.mobile_view().is_some());
    assert_eq!(session.desktop_surfaces().ready_count(), 0);
    let _ = session.pump_and_apply();

    let _ = session.apply(Command::SetViewport(desktop_viewport()));
    let _ = session.pump_and_apply();

    assert_eq!(session.state().mode, ViewMode::Desktop);
    assert_eq!(session.controls(), ControlBinding::Desktop);
    assert!(session.mobile_view().is_none());
    assert_eq!(session.state().current_page, 11);
    assert_eq!(session.state().zoom.percent(), 150);

    // Exactly two surfaces, matching the pre-switch window and scale
    let surfaces = session.desktop_surfaces();
    assert_eq!(surfaces.ready_count(), 2);
    assert_eq!(surfaces.left.surface().unwrap().page, 11);
    assert_eq!(surfaces.right.surface().unwrap().page, 12);
    assert_eq!(surfaces.left.surface().unwrap().scale, 1.5);
}

#[test]
fn reentering_same_mode_is_a_no_op() {
    let source = FakeSource::with_pages(10);
    let mut session = open_mobile(&source);
    let _ = session.pump_and_apply();
    let rendered = session.mobile_view().unwrap().rendered_count();

    // Still mobile, different size: nothing is rebuilt
    let effects = session.apply(Command::SetViewport(Viewport::new(500, 900, 2.0)));
    assert!(effects.is_empty());
    assert_eq!(session.mobile_view().unwrap().rendered_count(), rendered);
}

#[test]
fn outline_depends_on_mode() {
    let source = FakeSource::with_pages(42);
    let mut session =
        ViewingSession::open(&source, DocumentId::from("guide.pdf"), desktop_viewport()).unwrap();

    let desktop_entries = session.outline();
    assert!(desktop_entries.iter().any(|e| e.level == 1));

    let _ = session.apply(Command::SetViewport(mobile_viewport()));
    let mobile_entries = session.outline();
    assert!(mobile_entries.iter().all(|e| e.level == 0));
    assert_eq!(mobile_entries.len(), 11);
}
