use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Engine execution failed for trial {trial_id}: {reason}")]
    EngineExecution { trial_id: String, reason: String },

    #[error("Artifact IO error at {path}: {reason}")]
    ArtifactIo { path: String, reason: String },

    #[error("Tape parse error in {source_name} at row {row}: {reason}")]
    Parse {
        source_name: String,
        row: usize,
        reason: String,
    },

    #[error("Scenario not found: {0}")]
    ScenarioNotFound(String),

    #[error("Scenario under construction: {0}")]
    Unimplemented(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl HarnessError {
    pub fn config(msg: impl Into<String>) -> Self {
        HarnessError::Config(msg.into())
    }

    /// True for failures raised before any engine call was made.
    pub fn is_config(&self) -> bool {
        matches!(self, HarnessError::Config(_))
    }
}

impl From<serde_json::Error> for HarnessError {
    fn from(e: serde_json::Error) -> Self {
        HarnessError::Serialization(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, HarnessError>;
