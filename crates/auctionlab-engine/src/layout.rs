use auctionlab_types::{ArtifactKind, HarnessError, Result};
use std::path::{Path, PathBuf};

/// Maps trial ids to artifact paths under one root directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLayout {
    root: PathBuf,
}

impl ArtifactLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        ArtifactLayout { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path prefix the engine appends artifact suffixes to
    pub fn trial_base(&self, trial_id: &str) -> PathBuf {
        self.root.join(trial_id)
    }

    pub fn artifact_path(&self, trial_id: &str, kind: ArtifactKind) -> PathBuf {
        self.root.join(kind.file_name(trial_id))
    }

    pub fn ensure_root(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root).map_err(|e| HarnessError::ArtifactIo {
            path: self.root.display().to_string(),
            reason: e.to_string(),
        })
    }
}

impl Default for ArtifactLayout {
    fn default() -> Self {
        Self::new("data/demo")
    }
}
