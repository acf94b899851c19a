use auctionlab_types::{HarnessError, Result, SessionSpec};
use serde::Serialize;

use crate::population::TraderPopulationSpec;
use crate::scenario::{ExperimentPreset, SweepDefinition, SweepShape};
use crate::schedule_builder::ScheduleBuilder;

/// Pure function from preset to sweep
pub type SweepTemplate = fn(&ExperimentPreset) -> Result<SweepDefinition>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScenarioStatus {
    Ready,
    UnderConstruction,
}

#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub key: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    /// `None` for entries that are listed but not runnable yet
    pub template: Option<SweepTemplate>,
}

impl CatalogEntry {
    pub fn status(&self) -> ScenarioStatus {
        match self.template {
            Some(_) => ScenarioStatus::Ready,
            None => ScenarioStatus::UnderConstruction,
        }
    }
}

/// Registry of named sweep templates
#[derive(Debug, Clone, Default)]
pub struct ScenarioCatalog {
    entries: Vec<CatalogEntry>,
}

impl ScenarioCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The seven canned experiments
    pub fn standard() -> Self {
        ScenarioCatalog {
            entries: standard_entries(),
        }
    }

    pub fn register(&mut self, entry: CatalogEntry) -> Result<()> {
        if self.get(entry.key).is_some() {
            return Err(HarnessError::config(format!(
                "scenario {} already registered",
                entry.key
            )));
        }
        self.entries.push(entry);
        Ok(())
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn get(&self, key: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.key == key)
    }

    pub fn keys(&self) -> Vec<&'static str> {
        self.entries.iter().map(|e| e.key).collect()
    }

    /// Instantiate a scenario against a preset
    pub fn build(&self, key: &str, preset: &ExperimentPreset) -> Result<SweepDefinition> {
        let entry = self
            .get(key)
            .ok_or_else(|| HarnessError::ScenarioNotFound(key.to_string()))?;
        let template = entry
            .template
            .ok_or_else(|| HarnessError::Unimplemented(key.to_string()))?;
        template(preset)
    }
}

fn standard_entries() -> Vec<CatalogEntry> {
    vec![
        CatalogEntry {
            key: "one-trader-one-session",
            title: "1-Trader 1-Session Market",
            description: "Fixed schedule, periodic replenishment, ZIP traders, one session",
            template: Some(one_trader_one_session),
        },
        CatalogEntry {
            key: "one-trader-multi-session",
            title: "1-Trader Multi-Session Market",
            description: "The single-session market repeated across independent sessions",
            template: Some(one_trader_multi_session),
        },
        CatalogEntry {
            key: "periodic-to-poisson",
            title: "Periodic to Poisson Market",
            description: "Order arrivals switch from periodic to drip-poisson timing",
            template: Some(periodic_to_poisson),
        },
        CatalogEntry {
            key: "multi-trader-multi-session",
            title: "Multi-Trader Multi-Session Market",
            description: "Poisson arrivals with a larger ZIP population per side",
            template: Some(multi_trader_multi_session),
        },
        CatalogEntry {
            key: "multi-type",
            title: "Multi-Trader Multi-Session Multi-Type Market",
            description: "Heterogeneous ZIP/ZIC/SHVR/GVWY population, one session",
            template: Some(multi_type),
        },
        CatalogEntry {
            key: "shock",
            title: "Shock Introduction Market",
            description: "Supply and demand jump to a higher range halfway through the session",
            template: Some(shock),
        },
        CatalogEntry {
            key: "demo-simulator",
            title: "Demo Simulator",
            description: "Custom input simulation (under construction)",
            template: None,
        },
    ]
}

fn sweep(
    preset: &ExperimentPreset,
    key: &str,
    title: &str,
    description: &str,
    sessions: Vec<SessionSpec>,
    shape: SweepShape,
) -> Result<SweepDefinition> {
    Ok(SweepDefinition {
        key: key.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        baseline: Some(preset.reference_session()?),
        sessions,
        shape,
    })
}

fn one_trader_one_session(preset: &ExperimentPreset) -> Result<SweepDefinition> {
    sweep(
        preset,
        "one-trader-one-session",
        "1-Trader 1-Session Market",
        "Reference market, one session",
        vec![preset.reference_session()?],
        SweepShape::default(),
    )
}

fn one_trader_multi_session(preset: &ExperimentPreset) -> Result<SweepDefinition> {
    sweep(
        preset,
        "one-trader-multi-session",
        "1-Trader Multi-Session Market",
        "Reference market repeated",
        SweepDefinition::repeated(preset.reference_session()?, preset.repeated_sessions),
        SweepShape::default(),
    )
}

fn periodic_to_poisson(preset: &ExperimentPreset) -> Result<SweepDefinition> {
    let population = TraderPopulationSpec::heterogeneous(&preset.reference_population)?;
    let spec = preset.session(population, preset.poisson(preset.fixed_schedule()?)?);
    sweep(
        preset,
        "periodic-to-poisson",
        "Periodic to Poisson Market",
        "Drip-poisson arrivals, repeated",
        SweepDefinition::repeated(spec, preset.repeated_sessions),
        SweepShape {
            timing_changes: true,
            ..SweepShape::default()
        },
    )
}

fn multi_trader_multi_session(preset: &ExperimentPreset) -> Result<SweepDefinition> {
    let population = TraderPopulationSpec::heterogeneous(&preset.scaled_population)?;
    let spec = preset.session(population, preset.poisson(preset.fixed_schedule()?)?);
    sweep(
        preset,
        "multi-trader-multi-session",
        "Multi-Trader Multi-Session Market",
        "Scaled population, drip-poisson arrivals, repeated",
        SweepDefinition::repeated(spec, preset.repeated_sessions),
        SweepShape {
            timing_changes: true,
            population_changes: true,
            ..SweepShape::default()
        },
    )
}

fn multi_type(preset: &ExperimentPreset) -> Result<SweepDefinition> {
    let population = TraderPopulationSpec::heterogeneous(&preset.mixed_population)?;
    let spec = preset.session(population, preset.poisson(preset.fixed_schedule()?)?);
    sweep(
        preset,
        "multi-type",
        "Multi-Trader Multi-Session Multi-Type Market",
        "Mixed trader types, one session",
        vec![spec],
        SweepShape {
            timing_changes: true,
            population_changes: true,
            ..SweepShape::default()
        },
    )
}

fn shock(preset: &ExperimentPreset) -> Result<SweepDefinition> {
    let schedule = ScheduleBuilder::shocked(
        preset.window()?,
        preset.chart_range()?,
        preset.shocked_range()?,
        preset.shock_time(),
    )?;
    let population = TraderPopulationSpec::heterogeneous(&preset.mixed_population)?;
    let spec = preset.session(population, preset.poisson(schedule)?);
    sweep(
        preset,
        "shock",
        "Shock Introduction Market",
        "Mid-session supply and demand shock, one session",
        vec![spec],
        SweepShape {
            schedule_changes: true,
            timing_changes: true,
            population_changes: true,
        },
    )
}
