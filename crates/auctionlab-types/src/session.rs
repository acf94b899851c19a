use serde::{Deserialize, Serialize};

use crate::error::{HarnessError, Result};
use crate::schedule::OrderSchedule;
use crate::trader::TraderPopulation;
use crate::window::TimeWindow;

/// Artifacts the engine can write, one CSV file each
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactKind {
    Blotters,
    LimitOrderBook,
    Strategies,
    AverageBalances,
    Tape,
}

impl ArtifactKind {
    pub fn all() -> &'static [ArtifactKind] {
        &[
            ArtifactKind::Blotters,
            ArtifactKind::LimitOrderBook,
            ArtifactKind::Strategies,
            ArtifactKind::AverageBalances,
            ArtifactKind::Tape,
        ]
    }

    /// Filename suffix appended to the trial id
    pub fn suffix(&self) -> &'static str {
        match self {
            ArtifactKind::Blotters => "_blotters.csv",
            ArtifactKind::LimitOrderBook => "_LOB_frames.csv",
            ArtifactKind::Strategies => "_strats.csv",
            ArtifactKind::AverageBalances => "_avg_balance.csv",
            ArtifactKind::Tape => "_tape.csv",
        }
    }

    pub fn file_name(&self, trial_id: &str) -> String {
        format!("{}{}", trial_id, self.suffix())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DumpFlags {
    pub blotters: bool,
    pub limit_order_book: bool,
    pub strategies: bool,
    pub average_balances: bool,
    pub tape: bool,
}

impl Default for DumpFlags {
    fn default() -> Self {
        DumpFlags {
            blotters: true,
            limit_order_book: false,
            strategies: true,
            average_balances: true,
            tape: true,
        }
    }
}

impl DumpFlags {
    pub fn none() -> Self {
        DumpFlags {
            blotters: false,
            limit_order_book: false,
            strategies: false,
            average_balances: false,
            tape: false,
        }
    }

    pub fn tape_only() -> Self {
        DumpFlags {
            tape: true,
            ..Self::none()
        }
    }

    pub fn is_enabled(&self, kind: ArtifactKind) -> bool {
        match kind {
            ArtifactKind::Blotters => self.blotters,
            ArtifactKind::LimitOrderBook => self.limit_order_book,
            ArtifactKind::Strategies => self.strategies,
            ArtifactKind::AverageBalances => self.average_balances,
            ArtifactKind::Tape => self.tape,
        }
    }

    pub fn enabled(&self) -> Vec<ArtifactKind> {
        ArtifactKind::all()
            .iter()
            .copied()
            .filter(|k| self.is_enabled(*k))
            .collect()
    }
}

/// Session parameters before a trial id is assigned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSpec {
    pub start_time: f64,
    pub end_time: f64,
    pub population: TraderPopulation,
    pub order_schedule: OrderSchedule,
    pub dump_flags: DumpFlags,
    pub verbose: bool,
}

impl SessionSpec {
    pub fn window(&self) -> Result<TimeWindow> {
        TimeWindow::new(self.start_time, self.end_time)
    }

    pub fn with_trial_id(&self, trial_id: impl Into<String>) -> SessionConfig {
        SessionConfig {
            trial_id: trial_id.into(),
            start_time: self.start_time,
            end_time: self.end_time,
            population: self.population.clone(),
            order_schedule: self.order_schedule.clone(),
            dump_flags: self.dump_flags,
            verbose: self.verbose,
        }
    }
}

/// Everything one engine call needs. Treated as immutable once handed over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub trial_id: String,
    pub start_time: f64,
    pub end_time: f64,
    pub population: TraderPopulation,
    pub order_schedule: OrderSchedule,
    pub dump_flags: DumpFlags,
    pub verbose: bool,
}

impl SessionConfig {
    pub fn window(&self) -> Result<TimeWindow> {
        TimeWindow::new(self.start_time, self.end_time)
    }

    /// Check every pre-engine invariant
    pub fn validate(&self) -> Result<()> {
        if self.trial_id.trim().is_empty() {
            return Err(HarnessError::config("trial id must not be empty"));
        }
        let window = self.window()?;
        let sched = &self.order_schedule;
        if !(sched.interval.is_finite() && sched.interval > 0.0) {
            return Err(HarnessError::config(format!(
                "order interval must be positive, got {}",
                sched.interval
            )));
        }
        sched.supply.validate()?;
        sched.demand.validate()?;
        sched.supply.validate_within(&window)?;
        sched.demand.validate_within(&window)?;
        self.population.validate()
    }
}
