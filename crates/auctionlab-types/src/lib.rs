mod error;
mod window;
mod schedule;
mod trader;
mod session;
mod tape;

pub use error::{HarnessError, Result};
pub use window::{PriceRange, TimeWindow};
pub use schedule::{OrderSchedule, Schedule, ScheduleSegment, StepMode, TimeMode};
pub use trader::{TraderGroup, TraderPopulation, TraderType};
pub use session::{ArtifactKind, DumpFlags, SessionConfig, SessionSpec};
pub use tape::{AggregatedSeries, SessionSlice, TapeRecord};
