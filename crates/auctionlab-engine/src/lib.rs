mod engine;
mod layout;
mod synthetic;
mod process;

pub use engine::MarketEngine;
pub use layout::ArtifactLayout;
pub use synthetic::SyntheticEngine;
pub use process::{EngineRequest, ProcessEngine};
