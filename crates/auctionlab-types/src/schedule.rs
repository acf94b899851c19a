use serde::{Deserialize, Serialize};

use crate::error::{HarnessError, Result};
use crate::window::{PriceRange, TimeWindow};

/// How a segment's price range is sampled over its window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepMode {
    /// Range is constant for the whole segment
    Fixed,
}

impl StepMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepMode::Fixed => "fixed",
        }
    }
}

/// Arrival timing of new customer orders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeMode {
    #[serde(rename = "periodic")]
    Periodic,
    #[serde(rename = "drip-poisson")]
    DripPoisson,
}

impl TimeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeMode::Periodic => "periodic",
            TimeMode::DripPoisson => "drip-poisson",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSegment {
    pub window: TimeWindow,
    pub ranges: Vec<PriceRange>,
    pub stepmode: StepMode,
}

impl ScheduleSegment {
    pub fn fixed(window: TimeWindow, range: PriceRange) -> Self {
        ScheduleSegment {
            window,
            ranges: vec![range],
            stepmode: StepMode::Fixed,
        }
    }
}

/// Piecewise price schedule, segments sorted by window start
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    segments: Vec<ScheduleSegment>,
}

impl Schedule {
    /// Build a schedule, rejecting empty, unsorted or overlapping segment lists
    pub fn new(segments: Vec<ScheduleSegment>) -> Result<Self> {
        check_segments(&segments)?;
        Ok(Schedule { segments })
    }

    /// Re-check ordering invariants, e.g. after deserialization
    pub fn validate(&self) -> Result<()> {
        check_segments(&self.segments)
    }

    pub fn segments(&self) -> &[ScheduleSegment] {
        &self.segments
    }

    /// Segment whose window contains `t`
    pub fn segment_at(&self, t: f64) -> Option<&ScheduleSegment> {
        self.segments.iter().find(|s| s.window.contains(t))
    }

    /// Earliest start to latest end across all segments
    pub fn span(&self) -> Option<(f64, f64)> {
        let first = self.segments.first()?;
        let last = self.segments.last()?;
        Some((first.window.from, last.window.to))
    }

    /// True when the segments tile `window` exactly, with no gaps
    pub fn covers(&self, window: &TimeWindow) -> bool {
        match self.span() {
            Some((from, to)) if from == window.from && to == window.to => {}
            _ => return false,
        }
        self.segments
            .windows(2)
            .all(|pair| pair[0].window.to == pair[1].window.from)
    }

    /// Check that no segment reaches outside the session window
    pub fn validate_within(&self, window: &TimeWindow) -> Result<()> {
        let (from, to) = self
            .span()
            .ok_or_else(|| HarnessError::config("schedule has no segments"))?;
        if from < window.from || to > window.to {
            return Err(HarnessError::config(format!(
                "schedule span [{}, {}) exceeds session window [{}, {})",
                from, to, window.from, window.to
            )));
        }
        Ok(())
    }
}

fn segment_error(index: usize, err: HarnessError) -> HarnessError {
    match err {
        HarnessError::Config(msg) => {
            HarnessError::config(format!("schedule segment {}: {}", index, msg))
        }
        other => other,
    }
}

fn check_segments(segments: &[ScheduleSegment]) -> Result<()> {
    if segments.is_empty() {
        return Err(HarnessError::config("schedule has no segments"));
    }
    for (i, segment) in segments.iter().enumerate() {
        if segment.ranges.is_empty() {
            return Err(HarnessError::config(format!(
                "schedule segment {} has no price ranges",
                i
            )));
        }
        segment
            .window
            .validate()
            .map_err(|e| segment_error(i, e))?;
        for range in &segment.ranges {
            range
                .validate()
                .map_err(|e| segment_error(i, e))?;
        }
    }
    for pair in segments.windows(2) {
        let (prev, next) = (&pair[0].window, &pair[1].window);
        if next.from < prev.from {
            return Err(HarnessError::config(format!(
                "schedule segments out of order: [{}, {}) after [{}, {})",
                next.from, next.to, prev.from, prev.to
            )));
        }
        if prev.overlaps(next) {
            return Err(HarnessError::config(format!(
                "schedule segments overlap: [{}, {}) and [{}, {})",
                prev.from, prev.to, next.from, next.to
            )));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSchedule {
    pub supply: Schedule,
    pub demand: Schedule,
    /// Seconds between order replenishments
    pub interval: f64,
    pub timemode: TimeMode,
}

impl OrderSchedule {
    pub fn new(supply: Schedule, demand: Schedule, interval: f64, timemode: TimeMode) -> Result<Self> {
        if !(interval.is_finite() && interval > 0.0) {
            return Err(HarnessError::config(format!(
                "order interval must be positive, got {}",
                interval
            )));
        }
        Ok(OrderSchedule {
            supply,
            demand,
            interval,
            timemode,
        })
    }

    /// Same schedule on both sides of the market
    pub fn symmetric(schedule: Schedule, interval: f64, timemode: TimeMode) -> Result<Self> {
        Self::new(schedule.clone(), schedule, interval, timemode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(from: f64, to: f64) -> ScheduleSegment {
        ScheduleSegment::fixed(
            TimeWindow::new(from, to).unwrap(),
            PriceRange::new(80.0, 320.0).unwrap(),
        )
    }

    #[test]
    fn test_rejects_overlap() {
        let err = Schedule::new(vec![seg(0.0, 310.0), seg(300.0, 600.0)]).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_rejects_unsorted() {
        assert!(Schedule::new(vec![seg(300.0, 600.0), seg(0.0, 300.0)]).is_err());
    }

    #[test]
    fn test_rejects_inverted_segment_literal() {
        let inverted = ScheduleSegment {
            window: TimeWindow { from: 500.0, to: 100.0 },
            ranges: vec![PriceRange::new(80.0, 320.0).unwrap()],
            stepmode: StepMode::Fixed,
        };
        assert!(Schedule::new(vec![inverted]).unwrap_err().is_config());

        let crossed = ScheduleSegment {
            window: TimeWindow::new(0.0, 600.0).unwrap(),
            ranges: vec![PriceRange { low: 400.0, high: 80.0 }],
            stepmode: StepMode::Fixed,
        };
        assert!(Schedule::new(vec![crossed]).unwrap_err().is_config());
    }

    #[test]
    fn test_deserialized_schedule_revalidated() {
        let json = r#"{"segments": [{"window": {"from": 600.0, "to": 0.0}, "ranges": [{"low": 80.0, "high": 320.0}], "stepmode": "fixed"}]}"#;
        let schedule: Schedule = serde_json::from_str(json).unwrap();
        assert!(schedule.validate().unwrap_err().is_config());

        let json = r#"{"segments": [{"window": {"from": 0.0, "to": 600.0}, "ranges": [{"low": 400.0, "high": 80.0}], "stepmode": "fixed"}]}"#;
        let schedule: Schedule = serde_json::from_str(json).unwrap();
        assert!(schedule.validate().is_err());
    }

    #[test]
    fn test_rejects_empty() {
        assert!(Schedule::new(vec![]).is_err());
    }

    #[test]
    fn test_coverage() {
        let window = TimeWindow::new(0.0, 600.0).unwrap();
        let full = Schedule::new(vec![seg(0.0, 300.0), seg(300.0, 600.0)]).unwrap();
        assert!(full.covers(&window));

        let gappy = Schedule::new(vec![seg(0.0, 200.0), seg(300.0, 600.0)]).unwrap();
        assert!(!gappy.covers(&window));
        assert!(gappy.validate_within(&window).is_ok());

        let short = TimeWindow::new(0.0, 500.0).unwrap();
        assert!(full.validate_within(&short).is_err());
    }

    #[test]
    fn test_segment_lookup() {
        let s = Schedule::new(vec![seg(0.0, 300.0), seg(300.0, 600.0)]).unwrap();
        assert_eq!(s.segment_at(300.0).unwrap().window.from, 300.0);
        assert_eq!(s.segment_at(299.9).unwrap().window.from, 0.0);
        assert!(s.segment_at(600.0).is_none());
    }

    #[test]
    fn test_interval_must_be_positive() {
        let s = Schedule::new(vec![seg(0.0, 600.0)]).unwrap();
        assert!(OrderSchedule::symmetric(s.clone(), 0.0, TimeMode::Periodic).is_err());
        assert!(OrderSchedule::symmetric(s.clone(), -5.0, TimeMode::Periodic).is_err());
        assert!(OrderSchedule::symmetric(s, 60.0, TimeMode::Periodic).is_ok());
    }

    #[test]
    fn test_timemode_wire_names() {
        assert_eq!(serde_json::to_string(&TimeMode::DripPoisson).unwrap(), "\"drip-poisson\"");
        assert_eq!(serde_json::to_string(&StepMode::Fixed).unwrap(), "\"fixed\"");
    }
}
