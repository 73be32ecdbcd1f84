//! Viewer chrome derived from session state
//!
//! Everything the toolbar shows is a pure function of the current state:
//! page-info and zoom labels, which controls are enabled, and the reading
//! progress percentage.

use std::time::Instant;

use super::state::SessionState;

/// Enablement of the desktop navigation controls
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ControlFlags {
    pub prev_enabled: bool,
    pub next_enabled: bool,
    pub zoom_in_enabled: bool,
    pub zoom_out_enabled: bool,
}

/// Snapshot of the desktop toolbar state
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewerChrome {
    /// "Page 3-4 of 85", or "Page 85 of 85" on the tail
    pub page_label: String,
    /// "150%"
    pub zoom_label: String,
    /// Reading progress through the document, 0-100
    pub progress_percent: u8,
    pub controls: ControlFlags,
}

/// Compute the toolbar snapshot for the current desktop window
#[must_use]
pub fn desktop_chrome(state: &SessionState) -> ViewerChrome {
    let current = state.current_page;
    let count = state.page_count;

    let page_label = if count == 0 {
        "Loading...".to_string()
    } else if current >= count {
        format!("Page {current} of {count}")
    } else {
        let right = (current + 1).min(count);
        format!("Page {current}-{right} of {count}")
    };

    let progress_percent = if count == 0 {
        0
    } else {
        ((f64::from(current) / f64::from(count)) * 100.0).round() as u8
    };

    ViewerChrome {
        page_label,
        zoom_label: format!("{}%", state.zoom.percent()),
        progress_percent,
        controls: ControlFlags {
            prev_enabled: current > 1,
            next_enabled: current < count,
            zoom_in_enabled: !state.zoom.at_max(),
            zoom_out_enabled: !state.zoom.at_min(),
        },
    }
}

/// Elapsed reading time for the session, displayed as "mm:ss"
#[derive(Clone, Copy, Debug)]
pub struct ReadingTimer {
    started: Instant,
}

impl ReadingTimer {
    #[must_use]
    pub fn started_at(started: Instant) -> Self {
        Self { started }
    }

    #[must_use]
    pub fn label_at(&self, now: Instant) -> String {
        let elapsed = now.saturating_duration_since(self.started).as_secs();
        format!("{:02}:{:02}", elapsed / 60, elapsed % 60)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::session::state::{Command, Viewport};

    fn state_at(page: u32, page_count: u32) -> SessionState {
        let mut state = SessionState::new(Viewport::new(1280, 800, 1.0));
        let _ = state.apply(Command::SetPageCount(page_count));
        let _ = state.apply(Command::GoToPage(page));
        state
    }

    #[test]
    fn page_label_shows_window_range() {
        let chrome = desktop_chrome(&state_at(3, 85));
        assert_eq!(chrome.page_label, "Page 3-4 of 85");
    }

    #[test]
    fn page_label_collapses_on_tail() {
        let chrome = desktop_chrome(&state_at(85, 85));
        assert_eq!(chrome.page_label, "Page 85 of 85");
    }

    #[test]
    fn controls_disable_at_bounds() {
        let chrome = desktop_chrome(&state_at(1, 10));
        assert!(!chrome.controls.prev_enabled);
        assert!(chrome.controls.next_enabled);

        let chrome = desktop_chrome(&state_at(10, 10));
        assert!(chrome.controls.prev_enabled);
        assert!(!chrome.controls.next_enabled);
    }

    #[test]
    fn zoom_controls_track_table_bounds() {
        let mut state = state_at(1, 10);
        let _ = state.apply(Command::SetZoomLevel(300));
        let chrome = desktop_chrome(&state);
        assert!(!chrome.controls.zoom_in_enabled);
        assert!(chrome.controls.zoom_out_enabled);
        assert_eq!(chrome.zoom_label, "300%");
    }

    #[test]
    fn progress_rounds_page_ratio() {
        let chrome = desktop_chrome(&state_at(5, 10));
        assert_eq!(chrome.progress_percent, 50);

        let chrome = desktop_chrome(&state_at(1, 3));
        assert_eq!(chrome.progress_percent, 33);
    }

    #[test]
    fn timer_formats_minutes_and_seconds() {
        let start = Instant::now();
        let timer = ReadingTimer::started_at(start);
        assert_eq!(timer.label_at(start), "00:00");
        assert_eq!(timer.label_at(start + Duration::from_secs(75)), "01:15");
        assert_eq!(timer.label_at(start + Duration::from_secs(600)), "10:00");
    }
}
