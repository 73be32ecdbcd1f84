use lectern::session::{Command, SurfaceSlot, ViewingSession, Viewport};
use lectern::source::{DocumentId, SourceError};
use lectern::test_utils::FakeSource;

fn desktop_viewport() -> Viewport {
    Viewport::new(1280, 800, 1.0)
}

fn open_desktop(source: &FakeSource) -> ViewingSession {
    ViewingSession::open(source, DocumentId::from("guide.pdf"), desktop_viewport()).unwrap()
}

#[test]
fn open_failure_aborts_session() {
    let missing = FakeSource::with_pages(10).missing();
    let err = ViewingSession::open(&missing, DocumentId::from("gone.pdf"), desktop_viewport())
        .err()
        .unwrap();
    assert!(matches!(err, SourceError::NotFound(_)));

    let corrupt = FakeSource::with_pages(10).failing_open("bad xref");
    let err = ViewingSession::open(&corrupt, DocumentId::from("bad.pdf"), desktop_viewport())
        .err()
        .unwrap();
    assert!(matches!(err, SourceError::Decode(_)));
}

#[test]
fn window_advances_in_pairs_and_renders_both_pages() {
    let source = FakeSource::with_pages(10);
    let mut session = open_desktop(&source);
    let _ = session.pump_and_apply();

    let _ = session.apply(Command::NextPage);
    let _ = session.pump_and_apply();

    assert_eq!(session.state().current_page, 3);
    let surfaces = session.desktop_surfaces();
    assert_eq!(surfaces.left.surface().unwrap().page, 3);
    assert_eq!(surfaces.right.surface().unwrap().page, 4);
}

#[test]
fn even_page_count_exhausts_at_last_pair() {
    let source = FakeSource::with_pages(6);
    let mut session = open_desktop(&source);

    for _ in 0..20 {
        let _ = session.apply(Command::NextPage);
        assert!(session.state().current_page <= 5);
    }
    let _ = session.pump_and_apply();

    assert_eq!(session.state().current_page, 5);
    assert_eq!(session.desktop_surfaces().ready_count(), 2);
}

#[test]
fn odd_page_count_ends_on_singleton_window() {
    let source = FakeSource::with_pages(7);
    let mut session = open_desktop(&source);

    for _ in 0..20 {
        let _ = session.apply(Command::NextPage);
    }
    let _ = session.pump_and_apply();

    assert_eq!(session.state().current_page, 7);
    assert!(session.desktop_surfaces().left.is_ready());
    assert!(matches!(
        session.desktop_surfaces().right,
        SurfaceSlot::Hidden
    ));
}

#[test]
fn out_of_range_navigation_changes_nothing() {
    let source = FakeSource::with_pages(10);
    let mut session = open_desktop(&source);
    let _ = session.pump_and_apply();
    let renders_before = source.renders().len();

    assert!(session.apply(Command::GoToPage(0)).is_empty());
    assert!(session.apply(Command::GoToPage(11)).is_empty());
    let _ = session.pump_and_apply();

    assert_eq!(session.state().current_page, 1);
    assert_eq!(source.renders().len(), renders_before);
}

#[test]
fn zoom_round_trip_renders_at_original_scale() {
    let source = FakeSource::with_pages(10);
    let mut session = open_desktop(&source);
    let _ = session.pump_and_apply();

    let _ = session.apply(Command::ZoomIn);
    let _ = session.pump_and_apply();
    let _ = session.apply(Command::ZoomOut);
    let _ = session.pump_and_apply();

    assert_eq!(session.state().zoom.percent(), 100);
    assert_eq!(
        session.desktop_surfaces().left.surface().unwrap().scale,
        1.0
    );
}

#[test]
fn snap_prefers_lower_level_on_tie() {
    let source = FakeSource::with_pages(10);
    let mut session = open_desktop(&source);

    let _ = session.apply(Command::SetZoomLevel(205));
    assert_eq!(session.state().zoom.percent(), 200);
}

#[test]
fn stale_render_never_overwrites_newer_state() {
    let source = FakeSource::with_pages(10);
    let mut session = open_desktop(&source);

    // Two renders complete but a page turn supersedes them before they
    // are applied. Last write wins by generation, not arrival order.
    let stale = session.pump();
    let _ = session.apply(Command::NextPage);
    let fresh = session.pump();

    for outcome in fresh {
        assert!(session.apply_outcome(outcome));
    }
    for outcome in stale {
        assert!(!session.apply_outcome(outcome));
    }

    let surfaces = session.desktop_surfaces();
    assert_eq!(surfaces.left.surface().unwrap().page, 3);
    assert_eq!(surfaces.right.surface().unwrap().page, 4);
}

#[test]
fn render_failure_marks_only_the_failed_slot() {
    let source = FakeSource::with_pages(10).failing_render(2);
    let mut session = open_desktop(&source);
    let _ = session.pump_and_apply();

    let surfaces = session.desktop_surfaces();
    assert!(surfaces.left.is_ready());
    assert!(matches!(surfaces.right, SurfaceSlot::Failed(_)));

    // The session keeps working past the failure
    let _ = session.apply(Command::NextPage);
    let _ = session.pump_and_apply();
    assert_eq!(session.desktop_surfaces().ready_count(), 2);
}

#[test]
fn density_factor_caps_backing_resolution() {
    let source = FakeSource::with_pages(4).with_page_size(600.0, 800.0);
    let mut session = ViewingSession::open(
        &source,
        DocumentId::from("guide.pdf"),
        Viewport::new(1280, 800, 3.0),
    )
    .unwrap();
    let _ = session.pump_and_apply();

    let left = session.desktop_surfaces().left.surface().unwrap();
    // Device pixel ratio of 3 is capped to 2
    assert_eq!(left.width_px, 1200);
    assert_eq!(left.display_width, 600.0);
}
