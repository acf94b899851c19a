use auctionlab_engine::MarketEngine;
use auctionlab_types::{HarnessError, Result, SessionConfig, SessionSpec};
use std::collections::BTreeSet;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Drives sessions through the engine strictly one at a time.
///
/// Artifacts are addressed only by trial id. Sessions are never retried,
/// and artifacts of sessions that completed before a failure are left on disk.
pub struct SessionRunner<E: MarketEngine> {
    engine: E,
}

impl<E: MarketEngine> SessionRunner<E> {
    pub fn new(engine: E) -> Self {
        SessionRunner { engine }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn into_engine(self) -> E {
        self.engine
    }

    /// `prefix + index` for index in `0..n`
    pub fn trial_ids(prefix: &str, n: usize) -> Vec<String> {
        (0..n).map(|i| format!("{}{}", prefix, i)).collect()
    }

    /// Assign trial ids to a sweep and validate every session up front
    pub fn plan_sweep(prefix: &str, specs: &[SessionSpec]) -> Result<Vec<SessionConfig>> {
        let configs: Vec<SessionConfig> = Self::trial_ids(prefix, specs.len())
            .into_iter()
            .zip(specs)
            .map(|(id, spec)| spec.with_trial_id(id))
            .collect();
        check_sessions(&configs)?;
        Ok(configs)
    }

    /// Run one session after validating it
    pub fn run_session(&mut self, config: &SessionConfig) -> Result<()> {
        config.validate()?;
        self.invoke(config)
    }

    /// Run sessions in the given order, stopping at the first engine failure.
    /// Returns the trial ids that completed.
    pub fn run_sessions(&mut self, configs: &[SessionConfig]) -> Result<Vec<String>> {
        check_sessions(configs)?;

        let mut completed = Vec::with_capacity(configs.len());
        for config in configs {
            if let Err(e) = self.invoke(config) {
                warn!(
                    trial_id = %config.trial_id,
                    completed = completed.len(),
                    skipped = configs.len() - completed.len() - 1,
                    "sweep aborted: {}",
                    e
                );
                return Err(e);
            }
            completed.push(config.trial_id.clone());
        }
        Ok(completed)
    }

    /// Plan and run a sweep of `specs` under `prefix`
    pub fn run_sweep(&mut self, prefix: &str, specs: &[SessionSpec]) -> Result<Vec<String>> {
        let configs = Self::plan_sweep(prefix, specs)?;
        info!(prefix, sessions = configs.len(), engine = self.engine.name(), "starting sweep");
        self.run_sessions(&configs)
    }

    fn invoke(&mut self, config: &SessionConfig) -> Result<()> {
        let started = Instant::now();
        debug!(trial_id = %config.trial_id, "running session");
        self.engine.run_session(config)?;
        info!(
            trial_id = %config.trial_id,
            runtime_ms = started.elapsed().as_millis() as u64,
            "session complete"
        );
        Ok(())
    }
}

/// Validate all sessions and reject repeated trial ids, before any engine call
fn check_sessions(configs: &[SessionConfig]) -> Result<()> {
    let mut seen = BTreeSet::new();
    for config in configs {
        config.validate()?;
        if !seen.insert(config.trial_id.as_str()) {
            return Err(HarnessError::config(format!(
                "trial id {} appears more than once in sweep",
                config.trial_id
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trial_ids() {
        let ids = SessionRunner::<auctionlab_engine::SyntheticEngine>::trial_ids("demo_", 3);
        assert_eq!(ids, vec!["demo_0", "demo_1", "demo_2"]);
    }
}
