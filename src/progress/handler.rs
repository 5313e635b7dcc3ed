//! Progress handler trait and events

use std::time::Duration;

/// Events emitted while a generation run progresses
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Run started
    Started { project_root: String },

    /// An acquisition strategy produced the description
    SourceResolved {
        source: String,
        detail: String,
        endpoints: usize,
    },

    /// All artifacts persisted
    ArtifactsWritten { artifacts: usize },

    /// Sample validation finished
    ValidationComplete { probes: usize, errors: usize },

    /// Run completed successfully
    Completed { total_time: Duration },

    /// Run failed
    Failed { error: String },
}

/// Receives progress events from the orchestrator
pub trait ProgressHandler: Send + Sync {
    fn on_progress(&self, event: &ProgressEvent);
}

/// No-op handler that ignores all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpHandler;

impl ProgressHandler for NoOpHandler {
    fn on_progress(&self, _event: &ProgressEvent) {}
}
