mod hashing;
mod plot;
mod reporter;

pub use hashing::{series_hash, HashRef};
pub use plot::ScatterPlot;
pub use reporter::{FileReporter, MemoryReporter, Reporter, ScenarioReport};
