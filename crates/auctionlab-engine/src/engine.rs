use auctionlab_types::{Result, SessionConfig};

/// Call contract of the external matching engine.
///
/// One call runs one bounded session to completion and writes its artifacts
/// under names derived from `config.trial_id`. Calls are blocking and are
/// never issued concurrently by this workspace.
pub trait MarketEngine {
    fn run_session(&mut self, config: &SessionConfig) -> Result<()>;

    /// Short label for logs
    fn name(&self) -> &str {
        "engine"
    }
}

impl<E: MarketEngine + ?Sized> MarketEngine for Box<E> {
    fn run_session(&mut self, config: &SessionConfig) -> Result<()> {
        (**self).run_session(config)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<E: MarketEngine + ?Sized> MarketEngine for &mut E {
    fn run_session(&mut self, config: &SessionConfig) -> Result<()> {
        (**self).run_session(config)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
