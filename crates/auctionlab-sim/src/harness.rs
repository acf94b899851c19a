use auctionlab_engine::{ArtifactLayout, MarketEngine};
use auctionlab_types::{AggregatedSeries, HarnessError, Result, SessionConfig};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{info, warn};

use crate::catalog::ScenarioCatalog;
use crate::config::HarnessConfig;
use crate::runner::SessionRunner;
use crate::scenario::{ExperimentPreset, SweepDefinition};
use crate::summary::SeriesSummary;
use crate::tape::TapeAggregator;

/// Outcome of one executed sweep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimResult {
    pub scenario_key: String,
    pub title: String,
    /// Aggregated sessions, in run order
    pub trial_ids: Vec<String>,
    pub baseline_trial_id: Option<String>,
    pub series: AggregatedSeries,
    pub summary: SeriesSummary,
    pub runtime_ms: f64,
}

/// Generic build -> run -> aggregate pipeline shared by every scenario
pub struct Harness<E: MarketEngine> {
    runner: SessionRunner<E>,
    aggregator: TapeAggregator,
    trial_prefix: String,
    run_baseline: bool,
}

impl Harness<Box<dyn MarketEngine>> {
    pub fn from_config(config: &HarnessConfig) -> Result<Self> {
        config.validate()?;
        Ok(Harness::new(config.build_engine(), config.layout())
            .with_prefix(&config.trial_prefix)
            .with_baseline(config.run_baseline))
    }
}

impl<E: MarketEngine> Harness<E> {
    pub fn new(engine: E, layout: ArtifactLayout) -> Self {
        Harness {
            runner: SessionRunner::new(engine),
            aggregator: TapeAggregator::new(layout),
            trial_prefix: "demo_".to_string(),
            run_baseline: false,
        }
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.trial_prefix = prefix.to_string();
        self
    }

    pub fn with_baseline(mut self, enabled: bool) -> Self {
        self.run_baseline = enabled;
        self
    }

    pub fn engine(&self) -> &E {
        self.runner.engine()
    }

    /// Build a catalog scenario and execute it
    pub fn run_scenario(
        &mut self,
        catalog: &ScenarioCatalog,
        key: &str,
        preset: &ExperimentPreset,
    ) -> Result<SimResult> {
        let sweep = catalog.build(key, preset)?;
        self.execute(&sweep)
    }

    /// Run every session of the sweep in order and concatenate the tapes
    pub fn execute(&mut self, sweep: &SweepDefinition) -> Result<SimResult> {
        let started = Instant::now();

        let (baseline, configs) = self.plan(sweep)?;
        info!(
            scenario = %sweep.key,
            sessions = configs.len(),
            baseline = baseline.is_some(),
            "executing sweep"
        );

        if let Some(baseline) = &baseline {
            self.runner.run_session(baseline)?;
        }
        let trial_ids = self.runner.run_sessions(&configs)?;
        let series = self.aggregator.aggregate(&trial_ids)?;
        let summary = SeriesSummary::from_series(&series);

        info!(
            scenario = %sweep.key,
            records = summary.total_records,
            "sweep aggregated"
        );

        Ok(SimResult {
            scenario_key: sweep.key.clone(),
            title: sweep.title.clone(),
            trial_ids,
            baseline_trial_id: baseline.map(|b| b.trial_id),
            series,
            summary,
            runtime_ms: started.elapsed().as_secs_f64() * 1000.0,
        })
    }

    /// Everything that can be rejected is rejected here, before the engine runs
    fn plan(&self, sweep: &SweepDefinition) -> Result<(Option<SessionConfig>, Vec<SessionConfig>)> {
        if sweep.sessions.is_empty() {
            return Err(HarnessError::config(format!(
                "sweep {} has no sessions",
                sweep.key
            )));
        }
        if let Some(i) = sweep.sessions.iter().position(|s| !s.dump_flags.tape) {
            return Err(HarnessError::config(format!(
                "sweep {} session {} does not dump its tape",
                sweep.key, i
            )));
        }

        let configs = SessionRunner::<E>::plan_sweep(&self.trial_prefix, &sweep.sessions)?;

        let baseline = match (&sweep.baseline, self.run_baseline) {
            (Some(spec), true) => {
                let config = spec.with_trial_id(self.trial_prefix.clone());
                config.validate()?;
                Some(config)
            }
            _ => None,
        };

        for config in baseline.iter().chain(configs.iter()) {
            let window = config.window()?;
            let sched = &config.order_schedule;
            if !sched.supply.covers(&window) || !sched.demand.covers(&window) {
                warn!(
                    trial_id = %config.trial_id,
                    "schedule does not cover the full session window"
                );
            }
        }

        Ok((baseline, configs))
    }
}
