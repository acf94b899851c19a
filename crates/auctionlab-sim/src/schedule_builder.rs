use auctionlab_types::{PriceRange, Result, Schedule, ScheduleSegment, TimeWindow};
use tracing::warn;

/// Builds time-windowed price schedules
pub struct ScheduleBuilder;

impl ScheduleBuilder {
    /// One fixed segment spanning the whole window
    pub fn fixed(window: TimeWindow, range: PriceRange) -> Result<Schedule> {
        Schedule::new(vec![ScheduleSegment::fixed(window, range)])
    }

    /// `pre_range` on `[from, shock_time)`, `post_range` on `[shock_time, to)`.
    ///
    /// A shock time not strictly inside the window means there is no shock:
    /// the result is a single full-window segment with `pre_range`.
    pub fn shocked(
        window: TimeWindow,
        pre_range: PriceRange,
        post_range: PriceRange,
        shock_time: f64,
    ) -> Result<Schedule> {
        if !window.strictly_contains(shock_time) {
            warn!(
                shock_time,
                from = window.from,
                to = window.to,
                "shock time outside session window, schedule has no shock"
            );
            return Self::fixed(window, pre_range);
        }

        let before = TimeWindow::new(window.from, shock_time)?;
        let after = TimeWindow::new(shock_time, window.to)?;
        Schedule::new(vec![
            ScheduleSegment::fixed(before, pre_range),
            ScheduleSegment::fixed(after, post_range),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auctionlab_types::StepMode;
    use proptest::prelude::*;

    fn window(from: f64, to: f64) -> TimeWindow {
        TimeWindow::new(from, to).unwrap()
    }

    fn range(low: f64, high: f64) -> PriceRange {
        PriceRange::new(low, high).unwrap()
    }

    #[test]
    fn test_fixed_single_segment() {
        let w = window(0.0, 600.0);
        let s = ScheduleBuilder::fixed(w, range(80.0, 320.0)).unwrap();

        assert_eq!(s.segments().len(), 1);
        assert_eq!(s.segments()[0].window, w);
        assert_eq!(s.segments()[0].ranges, vec![range(80.0, 320.0)]);
        assert_eq!(s.segments()[0].stepmode, StepMode::Fixed);
    }

    #[test]
    fn test_shocked_splits_at_shock_time() {
        let s = ScheduleBuilder::shocked(
            window(0.0, 600.0),
            range(80.0, 320.0),
            range(300.0, 400.0),
            300.0,
        )
        .unwrap();

        let segs = s.segments();
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[0].window, window(0.0, 300.0));
        assert_eq!(segs[0].ranges, vec![range(80.0, 320.0)]);
        assert_eq!(segs[1].window, window(300.0, 600.0));
        assert_eq!(segs[1].ranges, vec![range(300.0, 400.0)]);
        assert!(segs[0].window.from < segs[1].window.from);
        assert!(s.covers(&window(0.0, 600.0)));
    }

    #[test]
    fn test_shock_outside_window_degenerates_to_pre_range() {
        let w = window(0.0, 600.0);
        for shock in [0.0, 600.0, -10.0, 900.0] {
            let s = ScheduleBuilder::shocked(w, range(80.0, 320.0), range(300.0, 400.0), shock)
                .unwrap();
            assert_eq!(s.segments().len(), 1, "shock at {}", shock);
            assert_eq!(s.segments()[0].window, w);
            assert_eq!(s.segments()[0].ranges, vec![range(80.0, 320.0)]);
        }
    }

    proptest! {
        #[test]
        fn prop_fixed_window_preserved(from in -1e4f64..1e4, len in 0.001f64..1e4, lo in 0f64..500.0, w in 0f64..500.0) {
            let win = TimeWindow::new(from, from + len).unwrap();
            let s = ScheduleBuilder::fixed(win, PriceRange::new(lo, lo + w).unwrap()).unwrap();
            prop_assert_eq!(s.segments().len(), 1);
            prop_assert_eq!(s.segments()[0].window, win);
        }

        #[test]
        fn prop_shocked_tiles_window(len in 1.0f64..1e4, frac in 0.0f64..1.0) {
            let win = TimeWindow::new(0.0, len).unwrap();
            let shock = frac * len;
            let s = ScheduleBuilder::shocked(
                win,
                PriceRange::new(80.0, 320.0).unwrap(),
                PriceRange::new(300.0, 400.0).unwrap(),
                shock,
            ).unwrap();
            prop_assert!(s.covers(&win));
            prop_assert!(s.segments().windows(2).all(|p| p[0].window.from < p[1].window.from));
        }
    }
}
