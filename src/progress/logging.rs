//! Logging-based progress handler

use super::{ProgressEvent, ProgressHandler};
use tracing::{debug, info, warn};

/// Handler that logs progress events using tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

impl ProgressHandler for LoggingHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::Started { project_root } => {
                info!(project = %project_root, "Starting documentation run");
            }
            ProgressEvent::SourceResolved {
                source,
                detail,
                endpoints,
            } => {
                info!(source = %source, detail = %detail, endpoints, "Description resolved");
            }
            ProgressEvent::ArtifactsWritten { artifacts } => {
                debug!(artifacts, "Artifacts written");
            }
            ProgressEvent::ValidationComplete { probes, errors } => {
                if *errors > 0 {
                    warn!(probes, errors, "Sample validation finished with errors");
                } else {
                    info!(probes, "Sample validation finished");
                }
            }
            ProgressEvent::Completed { total_time } => {
                info!(
                    total_time_ms = total_time.as_millis() as u64,
                    "Documentation generated"
                );
            }
            ProgressEvent::Failed { error } => {
                warn!(error = %error, "Documentation run failed");
            }
        }
    }
}
