use serde::{Deserialize, Serialize};

use crate::error::{HarnessError, Result};

/// Half-open time interval `[from, to)` in seconds since session start
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub from: f64,
    pub to: f64,
}

impl TimeWindow {
    pub fn new(from: f64, to: f64) -> Result<Self> {
        if !from.is_finite() || !to.is_finite() {
            return Err(HarnessError::config(format!(
                "time window bounds must be finite, got [{}, {})",
                from, to
            )));
        }
        if to <= from {
            return Err(HarnessError::config(format!(
                "time window must satisfy to > from, got [{}, {})",
                from, to
            )));
        }
        Ok(TimeWindow { from, to })
    }

    /// Re-check the constructor invariants on a value built field by field
    pub fn validate(&self) -> Result<()> {
        Self::new(self.from, self.to).map(|_| ())
    }

    pub fn duration(&self) -> f64 {
        self.to - self.from
    }

    /// Strict interior test, both bounds excluded
    pub fn strictly_contains(&self, t: f64) -> bool {
        self.from < t && t < self.to
    }

    pub fn contains(&self, t: f64) -> bool {
        self.from <= t && t < self.to
    }

    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.from < other.to && other.from < self.to
    }
}

/// Valuation bound `(low, high)` for one side of the market
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub low: f64,
    pub high: f64,
}

impl PriceRange {
    pub fn new(low: f64, high: f64) -> Result<Self> {
        if !low.is_finite() || !high.is_finite() {
            return Err(HarnessError::config(format!(
                "price range bounds must be finite, got ({}, {})",
                low, high
            )));
        }
        if low > high {
            return Err(HarnessError::config(format!(
                "price range low {} exceeds high {}",
                low, high
            )));
        }
        Ok(PriceRange { low, high })
    }

    pub fn validate(&self) -> Result<()> {
        Self::new(self.low, self.high).map(|_| ())
    }

    pub fn width(&self) -> f64 {
        self.high - self.low
    }

    pub fn contains(&self, price: f64) -> bool {
        self.low <= price && price <= self.high
    }
}
