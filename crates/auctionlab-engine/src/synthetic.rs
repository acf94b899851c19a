use auctionlab_types::{
    ArtifactKind, HarnessError, PriceRange, Result, Schedule, SessionConfig, TimeMode,
};
use std::collections::BTreeSet;
use tracing::debug;

use crate::engine::MarketEngine;
use crate::layout::ArtifactLayout;

/// Deterministic in-process engine for tests and offline runs.
///
/// Writes only the tape artifact. Each arrival event produces a short burst
/// of trades priced inside the overlap of the active supply and demand
/// ranges, so a shocked schedule shows up as a level shift on the tape.
#[derive(Debug, Clone)]
pub struct SyntheticEngine {
    layout: ArtifactLayout,
    seed: u64,
    fail_on: BTreeSet<String>,
    calls: Vec<String>,
}

impl SyntheticEngine {
    pub fn new(layout: ArtifactLayout) -> Self {
        SyntheticEngine {
            layout,
            seed: 42,
            fail_on: BTreeSet::new(),
            calls: Vec::new(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Make the call for `trial_id` fail without writing anything
    pub fn fail_on(mut self, trial_id: impl Into<String>) -> Self {
        self.fail_on.insert(trial_id.into());
        self
    }

    /// Trial ids in the order the engine was invoked, failed calls included
    pub fn calls(&self) -> &[String] {
        &self.calls
    }

    pub fn layout(&self) -> &ArtifactLayout {
        &self.layout
    }

    fn generate_tape(&self, config: &SessionConfig) -> Result<String> {
        let mut rng = SimpleRng::new(self.seed ^ hash_trial_id(&config.trial_id));
        let sched = &config.order_schedule;
        let depth = config
            .population
            .seller_count()
            .min(config.population.buyer_count())
            .max(1) as usize;
        let burst = (depth / 4).max(1);

        let mut out = String::new();
        let mut t = config.start_time;
        while t < config.end_time {
            let trades = 1 + rng.next_usize(burst);
            for k in 0..trades {
                let raw = t + (k as f64 + rng.next_f64()) * 0.01 * sched.interval;
                // Quantize first so the written time selects the same segment
                let trade_time = (raw * 1000.0).round() / 1000.0;
                if trade_time >= config.end_time {
                    break;
                }
                let Some(range) = clearing_range(&sched.supply, &sched.demand, trade_time) else {
                    continue;
                };
                let price = (range.low + rng.next_f64() * range.width()).round();
                if config.verbose {
                    debug!(trial_id = %config.trial_id, time = trade_time, price, "synthetic trade");
                }
                // Row layout mirrors the engine tape: marker, time, price
                out.push_str(&format!("Trd, {:.3}, {}\n", trade_time, price));
            }
            let step = match sched.timemode {
                TimeMode::Periodic => sched.interval,
                TimeMode::DripPoisson => rng.next_exp(sched.interval),
            };
            let next = t + step;
            if next <= t {
                return Err(HarnessError::EngineExecution {
                    trial_id: config.trial_id.clone(),
                    reason: format!("session clock stalled at t={} with step {}", t, step),
                });
            }
            t = next;
        }
        Ok(out)
    }
}

impl MarketEngine for SyntheticEngine {
    fn run_session(&mut self, config: &SessionConfig) -> Result<()> {
        self.calls.push(config.trial_id.clone());

        if self.fail_on.contains(&config.trial_id) {
            return Err(HarnessError::EngineExecution {
                trial_id: config.trial_id.clone(),
                reason: "injected failure".to_string(),
            });
        }

        if !config.dump_flags.tape {
            return Ok(());
        }

        self.layout.ensure_root()?;
        let path = self.layout.artifact_path(&config.trial_id, ArtifactKind::Tape);
        let tape = self.generate_tape(config)?;
        std::fs::write(&path, tape).map_err(|e| HarnessError::EngineExecution {
            trial_id: config.trial_id.clone(),
            reason: format!("cannot write {}: {}", path.display(), e),
        })?;
        debug!(path = %path.display(), "synthetic tape written");
        Ok(())
    }

    fn name(&self) -> &str {
        "synthetic"
    }
}

/// Intersection of the first supply and demand ranges active at `t`.
/// Disjoint ranges collapse to the midpoint between them.
fn clearing_range(supply: &Schedule, demand: &Schedule, t: f64) -> Option<PriceRange> {
    let s = supply.segment_at(t)?.ranges.first()?;
    let d = demand.segment_at(t)?.ranges.first()?;
    let low = s.low.max(d.low);
    let high = s.high.min(d.high);
    if low <= high {
        Some(PriceRange { low, high })
    } else {
        let mid = (low + high) / 2.0;
        Some(PriceRange { low: mid, high: mid })
    }
}

fn hash_trial_id(trial_id: &str) -> u64 {
    // FNV-1a
    trial_id.bytes().fold(0xcbf29ce484222325u64, |h, b| {
        (h ^ b as u64).wrapping_mul(0x100000001b3)
    })
}

/// Simple RNG for deterministic generation
#[derive(Debug, Clone)]
struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        SimpleRng { state: seed }
    }

    fn next(&mut self) -> u64 {
        // Linear congruential generator
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.state
    }

    fn next_f64(&mut self) -> f64 {
        (self.next() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn next_usize(&mut self, max: usize) -> usize {
        if max == 0 {
            return 0;
        }
        (self.next() as usize) % max
    }

    /// Exponential draw with the given mean, floored at `mean * 1e-6`
    fn next_exp(&mut self, mean: f64) -> f64 {
        let u = 1.0 - self.next_f64();
        (-u.ln() * mean).max(mean * 1e-6)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut a = SimpleRng::new(7);
        let mut b = SimpleRng::new(7);
        for _ in 0..10 {
            assert_eq!(a.next(), b.next());
        }
    }

    #[test]
    fn test_exp_draw_positive() {
        let mut rng = SimpleRng::new(1);
        for _ in 0..1000 {
            assert!(rng.next_exp(10.0) > 0.0);
        }
    }

    #[test]
    fn test_trial_hash_differs() {
        assert_ne!(hash_trial_id("demo_0"), hash_trial_id("demo_1"));
    }
}
