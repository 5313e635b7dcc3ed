use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::fs::FileSystem;

/// Opaque "persist named artifact" collaborator. Every call fully replaces the named artifact.
pub trait ArtifactSink {
    fn persist(&self, relative: &Path, contents: &str) -> Result<()>;
}

/// Writes artifacts below a root directory
pub struct DirectorySink<F: FileSystem> {
    fs: F,
    root: PathBuf,
}

impl<F: FileSystem> DirectorySink<F> {
    pub fn new(fs: F, root: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            root: root.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn file_system(&self) -> &F {
        &self.fs
    }
}

impl<F: FileSystem> ArtifactSink for DirectorySink<F> {
    fn persist(&self, relative: &Path, contents: &str) -> Result<()> {
        let target = self.root.join(relative);
        debug!(path = %target.display(), bytes = contents.len(), "Writing artifact");
        self.fs
            .write(&target, contents)
            .with_context(|| format!("Failed to write artifact {}", target.display()))
    }
}
