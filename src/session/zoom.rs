//! Zoom level table and stepping
//!
//! Zoom is never a free-floating factor: it is an index into a fixed
//! ascending table of percents, stepped one entry at a time or snapped to
//! the nearest entry on a direct request.

/// The fixed zoom table: 5% increments from 25% to 200%, then 10%
/// increments up to 300%.
pub const ZOOM_LEVELS: [u16; 46] = [
    25, 30, 35, 40, 45, 50, 55, 60, 65, 70, 75, 80, 85, 90, 95, 100, 105, 110, 115, 120, 125, 130,
    135, 140, 145, 150, 155, 160, 165, 170, 175, 180, 185, 190, 195, 200, 210, 220, 230, 240, 250,
    260, 270, 280, 290, 300,
];

/// Index of the 100% entry, the starting zoom for every session
const DEFAULT_INDEX: usize = 15;

/// Current position in the zoom table
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ZoomLevels {
    index: usize,
}

impl Default for ZoomLevels {
    fn default() -> Self {
        Self {
            index: DEFAULT_INDEX,
        }
    }
}

impl ZoomLevels {
    /// Current zoom as an integer percent
    #[must_use]
    pub fn percent(self) -> u16 {
        ZOOM_LEVELS[self.index]
    }

    /// Current zoom as a scale factor (1.0 = 100%)
    #[must_use]
    pub fn factor(self) -> f32 {
        f32::from(self.percent()) / 100.0
    }

    /// Current index into the table
    #[must_use]
    pub fn index(self) -> usize {
        self.index
    }

    #[must_use]
    pub fn at_min(self) -> bool {
        self.index == 0
    }

    #[must_use]
    pub fn at_max(self) -> bool {
        self.index == ZOOM_LEVELS.len() - 1
    }

    /// Step one entry up. Returns false (and stays put) at the top end.
    pub fn zoom_in(&mut self) -> bool {
        if self.at_max() {
            return false;
        }
        self.index += 1;
        true
    }

    /// Step one entry down. Returns false (and stays put) at the bottom
    /// end.
    pub fn zoom_out(&mut self) -> bool {
        if self.at_min() {
            return false;
        }
        self.index -= 1;
        true
    }

    /// Snap to the table entry closest to `percent` by absolute
    /// difference. Ties resolve to the first (lowest) entry found in an
    /// ascending scan. Returns true if the index changed.
    pub fn snap_to(&mut self, percent: u16) -> bool {
        let mut closest = 0;
        let mut closest_diff = ZOOM_LEVELS[0].abs_diff(percent);

        for (i, &level) in ZOOM_LEVELS.iter().enumerate().skip(1) {
            let diff = level.abs_diff(percent);
            if diff < closest_diff {
                closest_diff = diff;
                closest = i;
            }
        }

        let changed = self.index != closest;
        self.index = closest;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_100_percent() {
        let zoom = ZoomLevels::default();
        assert_eq!(zoom.percent(), 100);
        assert_eq!(zoom.factor(), 1.0);
    }

    #[test]
    fn in_then_out_is_identity_away_from_bounds() {
        for start in 1..ZOOM_LEVELS.len() - 1 {
            let mut zoom = ZoomLevels { index: start };
            assert!(zoom.zoom_in());
            assert!(zoom.zoom_out());
            assert_eq!(zoom.index(), start);
        }
    }

    #[test]
    fn no_op_at_either_end() {
        let mut zoom = ZoomLevels { index: 0 };
        assert!(!zoom.zoom_out());
        assert_eq!(zoom.percent(), 25);

        let mut zoom = ZoomLevels {
            index: ZOOM_LEVELS.len() - 1,
        };
        assert!(!zoom.zoom_in());
        assert_eq!(zoom.percent(), 300);
    }

    #[test]
    fn snap_picks_nearest_entry() {
        let mut zoom = ZoomLevels::default();
        zoom.snap_to(27);
        assert_eq!(zoom.percent(), 25);

        zoom.snap_to(148);
        assert_eq!(zoom.percent(), 150);

        zoom.snap_to(1000);
        assert_eq!(zoom.percent(), 300);
    }

    #[test]
    fn snap_tie_breaks_toward_lower_entry() {
        // 205 is equidistant from 200 and 210
        let mut zoom = ZoomLevels::default();
        zoom.snap_to(205);
        assert_eq!(zoom.percent(), 200);
    }

    #[test]
    fn snap_reports_change() {
        let mut zoom = ZoomLevels::default();
        assert!(!zoom.snap_to(100));
        assert!(zoom.snap_to(150));
    }
}
