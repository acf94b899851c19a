use auctionlab_types::{
    DumpFlags, OrderSchedule, PriceRange, Result, Schedule, SessionSpec, TimeMode, TimeWindow,
    TraderPopulation, TraderType,
};
use serde::{Deserialize, Serialize};

use crate::population::TraderPopulationSpec;
use crate::schedule_builder::ScheduleBuilder;

/// Named experiment constants shared by the canned templates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentPreset {
    pub start_time: f64,
    pub end_time: f64,

    /// Supply and demand valuation range
    pub chart_range: (f64, f64),

    /// Post-shock range for the shock template
    pub shocked_range: (f64, f64),

    /// Seconds between replenishments under periodic timing
    pub periodic_interval: f64,

    /// Mean seconds between arrivals under drip-poisson timing
    pub poisson_interval: f64,

    /// Sessions in a repeated sweep
    pub repeated_sessions: usize,

    pub reference_population: Vec<(TraderType, u32)>,
    pub scaled_population: Vec<(TraderType, u32)>,
    pub mixed_population: Vec<(TraderType, u32)>,

    pub dump_flags: DumpFlags,
    pub verbose: bool,
}

impl Default for ExperimentPreset {
    fn default() -> Self {
        Self::vernon_smith_1962()
    }
}

impl ExperimentPreset {
    /// Ten-minute sessions over the (80, 320) range of Smith's 1962 JPE
    /// experiment, periodic replenishment every 60s, ZIP traders.
    pub fn vernon_smith_1962() -> Self {
        ExperimentPreset {
            start_time: 0.0,
            end_time: 60.0 * 10.0,
            chart_range: (80.0, 320.0),
            shocked_range: (300.0, 400.0),
            periodic_interval: 60.0,
            poisson_interval: 10.0,
            repeated_sessions: 10,
            reference_population: vec![(TraderType::Zip, 11)],
            scaled_population: vec![(TraderType::Zip, 40)],
            mixed_population: vec![
                (TraderType::Zip, 10),
                (TraderType::Zic, 10),
                (TraderType::Shaver, 10),
                (TraderType::Giveaway, 10),
            ],
            dump_flags: DumpFlags::default(),
            verbose: false,
        }
    }

    pub fn window(&self) -> Result<TimeWindow> {
        TimeWindow::new(self.start_time, self.end_time)
    }

    pub fn chart_range(&self) -> Result<PriceRange> {
        PriceRange::new(self.chart_range.0, self.chart_range.1)
    }

    pub fn shocked_range(&self) -> Result<PriceRange> {
        PriceRange::new(self.shocked_range.0, self.shocked_range.1)
    }

    /// Midpoint of the session, where the shock template switches ranges
    pub fn shock_time(&self) -> f64 {
        ((self.start_time + self.end_time) / 2.0).floor()
    }

    pub fn fixed_schedule(&self) -> Result<Schedule> {
        ScheduleBuilder::fixed(self.window()?, self.chart_range()?)
    }

    pub fn periodic(&self, schedule: Schedule) -> Result<OrderSchedule> {
        OrderSchedule::symmetric(schedule, self.periodic_interval, TimeMode::Periodic)
    }

    pub fn poisson(&self, schedule: Schedule) -> Result<OrderSchedule> {
        OrderSchedule::symmetric(schedule, self.poisson_interval, TimeMode::DripPoisson)
    }

    pub fn session(&self, population: TraderPopulation, order_schedule: OrderSchedule) -> SessionSpec {
        SessionSpec {
            start_time: self.start_time,
            end_time: self.end_time,
            population,
            order_schedule,
            dump_flags: self.dump_flags,
            verbose: self.verbose,
        }
    }

    /// Fixed schedule, periodic timing, reference population
    pub fn reference_session(&self) -> Result<SessionSpec> {
        let population = TraderPopulationSpec::heterogeneous(&self.reference_population)?;
        Ok(self.session(population, self.periodic(self.fixed_schedule()?)?))
    }
}

/// What varies in a sweep relative to the reference session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepShape {
    pub schedule_changes: bool,
    pub timing_changes: bool,
    pub population_changes: bool,
}

/// Data-only description of one scenario: the sessions to run and how
/// their tapes are combined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepDefinition {
    pub key: String,
    /// Plot title
    pub title: String,
    pub description: String,
    /// Reference session, run under the bare prefix when enabled and never aggregated
    pub baseline: Option<SessionSpec>,
    /// Aggregated sessions, in run order
    pub sessions: Vec<SessionSpec>,
    pub shape: SweepShape,
}

impl SweepDefinition {
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Same session repeated `n` times
    pub fn repeated(spec: SessionSpec, n: usize) -> Vec<SessionSpec> {
        vec![spec; n]
    }
}
