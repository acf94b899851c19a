mod schedule_builder;
mod population;
mod runner;
mod tape;
mod scenario;
mod catalog;
mod summary;
mod config;
mod harness;

pub use schedule_builder::ScheduleBuilder;
pub use population::TraderPopulationSpec;
pub use runner::SessionRunner;
pub use tape::{parse_tape, TapeAggregator};
pub use scenario::{ExperimentPreset, SweepDefinition, SweepShape};
pub use catalog::{CatalogEntry, ScenarioCatalog, ScenarioStatus, SweepTemplate};
pub use summary::SeriesSummary;
pub use config::{EngineConfig, HarnessConfig};
pub use harness::{Harness, SimResult};
