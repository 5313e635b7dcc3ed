use anyhow::Result;
use chrono::Utc;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info};

use super::report::RunReport;
use crate::acquire::{
    AcquireError, AcquisitionStrategy, ExporterLocator, IntrospectionStrategy, RemoteFetch,
    SpecAcquisitor, StaticScan, StrategyKind,
};
use crate::config::GuideConfig;
use crate::emit::ArtifactEmitter;
use crate::fs::RealFileSystem;
use crate::output::{layout, ArtifactSink, DirectorySink};
use crate::progress::{ProgressEvent, ProgressHandler};
use crate::synth::ExampleSynthesizer;
use crate::transport::Transport;
use crate::validation::SampleValidator;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    #[default]
    None,
    Sample,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    pub preferred: StrategyKind,
    pub validation: ValidationMode,
    /// Recorded in the report; probes stay read-only either way
    pub allow_destructive: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            preferred: StrategyKind::Remote,
            validation: ValidationMode::None,
            allow_destructive: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Acquisition(#[from] AcquireError),

    #[error("Failed to render artifacts: {0:#}")]
    Emission(anyhow::Error),

    #[error("Failed to persist artifacts: {0:#}")]
    Persistence(anyhow::Error),
}

/// Runs acquire, emit, persist and the optional validation, strictly in that order
pub struct PipelineOrchestrator {
    acquisitor: SpecAcquisitor,
    emitter: ArtifactEmitter,
    sink: Box<dyn ArtifactSink>,
    validator: SampleValidator,
    progress_handler: Option<Box<dyn ProgressHandler>>,
}

impl PipelineOrchestrator {
    pub fn new(
        acquisitor: SpecAcquisitor,
        emitter: ArtifactEmitter,
        sink: Box<dyn ArtifactSink>,
        validator: SampleValidator,
    ) -> Self {
        Self {
            acquisitor,
            emitter,
            sink,
            validator,
            progress_handler: None,
        }
    }

    /// Standard wiring for a project directory: all three strategies, artifacts written under
    /// `project_root`, HTTP through `transport`
    pub fn for_project(
        project_root: &Path,
        config: &GuideConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self> {
        let strategies: Vec<Box<dyn AcquisitionStrategy>> = vec![
            Box::new(
                RemoteFetch::new(Arc::clone(&transport), config.openapi_url.clone())
                    .with_timeout(config.fetch_timeout()),
            ),
            Box::new(IntrospectionStrategy::new(Box::new(
                ExporterLocator::new(RealFileSystem, project_root)
                    .with_timeout(config.introspect_timeout()),
            ))),
            Box::new(StaticScan::new(project_root)?),
        ];

        let validator = SampleValidator::new(transport)
            .with_timeout(config.probe_timeout())
            .with_max_probes(config.max_probes);

        Ok(Self::new(
            SpecAcquisitor::new(strategies),
            ArtifactEmitter::new(ExampleSynthesizer::with_max_depth(config.max_schema_depth)),
            Box::new(DirectorySink::new(RealFileSystem, project_root)),
            validator,
        ))
    }

    pub fn with_progress_handler(mut self, handler: Box<dyn ProgressHandler>) -> Self {
        self.progress_handler = Some(handler);
        self
    }

    fn notify(&self, event: ProgressEvent) {
        if let Some(handler) = &self.progress_handler {
            handler.on_progress(&event);
        }
    }

    pub fn execute(&self, label: &str, options: RunOptions) -> Result<RunReport, PipelineError> {
        let start = Instant::now();
        self.notify(ProgressEvent::Started {
            project_root: label.to_string(),
        });

        let result = self.run(options);
        match &result {
            Ok(report) => {
                info!(
                    source = %report.source,
                    endpoints = report.endpoint_count,
                    artifacts = report.artifacts.len(),
                    "Pipeline complete"
                );
                self.notify(ProgressEvent::Completed {
                    total_time: start.elapsed(),
                });
            }
            Err(e) => self.notify(ProgressEvent::Failed {
                error: e.to_string(),
            }),
        }
        result
    }

    fn run(&self, options: RunOptions) -> Result<RunReport, PipelineError> {
        debug!(preferred = %options.preferred, validation = ?options.validation, "Acquiring description");
        let acquired = self.acquisitor.acquire(options.preferred)?;
        let description = &acquired.resolved.description;
        self.notify(ProgressEvent::SourceResolved {
            source: acquired.source.to_string(),
            detail: acquired.detail.clone(),
            endpoints: description.operation_count(),
        });

        let bundle = self
            .emitter
            .emit(&acquired.resolved)
            .map_err(PipelineError::Emission)?;
        bundle
            .persist(self.sink.as_ref())
            .map_err(PipelineError::Persistence)?;
        self.notify(ProgressEvent::ArtifactsWritten {
            artifacts: bundle.artifacts.len(),
        });

        let validation = match options.validation {
            ValidationMode::None => None,
            ValidationMode::Sample => Some(self.validator.validate(
                description,
                &bundle.base_url,
                options.allow_destructive,
            )),
        };

        let mut artifacts: Vec<String> = bundle
            .paths()
            .map(|p| p.to_string_lossy().into_owned())
            .collect();
        artifacts.push(layout::REPORT_FILE.to_string());

        let report = RunReport {
            source: acquired.source,
            detail: acquired.detail.clone(),
            title: description.info.title().to_string(),
            version: description.info.version().to_string(),
            base_url: bundle.base_url.clone(),
            endpoint_count: bundle.endpoint_count,
            schema_count: bundle.schema_count,
            artifacts,
            validation,
            allow_destructive: options.allow_destructive,
            generated_at: Utc::now(),
        };

        if let Some(probes) = &report.validation {
            self.notify(ProgressEvent::ValidationComplete {
                probes: probes.len(),
                errors: report.probe_errors(),
            });
        }

        self.sink
            .persist(Path::new(layout::REPORT_FILE), &report.to_text())
            .map_err(PipelineError::Persistence)?;

        Ok(report)
    }
}
