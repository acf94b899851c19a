use auctionlab_engine::{ArtifactLayout, MarketEngine, ProcessEngine, SyntheticEngine};
use auctionlab_types::{HarnessError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Which engine sessions are sent to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EngineConfig {
    /// Built-in deterministic stand-in
    Synthetic { seed: u64 },
    /// External engine process, request JSON on stdin
    Process {
        program: PathBuf,
        #[serde(default)]
        args: Vec<String>,
        #[serde(default)]
        working_dir: Option<PathBuf>,
    },
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig::Synthetic { seed: 42 }
    }
}

/// Harness configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Directory engine artifacts are written to and read from
    pub artifact_dir: PathBuf,

    /// Trial ids are `trial_prefix + index`. Runs sharing a prefix and
    /// directory overwrite each other's artifacts.
    pub trial_prefix: String,

    /// Where reports are written
    pub output_dir: PathBuf,

    /// Run the reference session before each sweep
    pub run_baseline: bool,

    pub engine: EngineConfig,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        HarnessConfig {
            artifact_dir: PathBuf::from("data/demo"),
            trial_prefix: "demo_".to_string(),
            output_dir: PathBuf::from("data/reports"),
            run_baseline: false,
            engine: EngineConfig::default(),
        }
    }
}

impl HarnessConfig {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| HarnessError::ArtifactIo {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let config: HarnessConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.trial_prefix.is_empty() {
            return Err(HarnessError::config("trial_prefix must not be empty"));
        }
        if let EngineConfig::Process { program, .. } = &self.engine {
            if program.as_os_str().is_empty() {
                return Err(HarnessError::config("engine program must not be empty"));
            }
        }
        Ok(())
    }

    pub fn layout(&self) -> ArtifactLayout {
        ArtifactLayout::new(&self.artifact_dir)
    }

    pub fn build_engine(&self) -> Box<dyn MarketEngine> {
        match &self.engine {
            EngineConfig::Synthetic { seed } => {
                Box::new(SyntheticEngine::new(self.layout()).with_seed(*seed))
            }
            EngineConfig::Process {
                program,
                args,
                working_dir,
            } => {
                let mut engine = ProcessEngine::new(program, self.layout()).with_args(args.clone());
                if let Some(dir) = working_dir {
                    engine = engine.with_working_dir(dir);
                }
                Box::new(engine)
            }
        }
    }
}
