//! End-to-end generation run and its report

pub mod orchestrator;
pub mod report;

pub use orchestrator::{PipelineError, PipelineOrchestrator, RunOptions, ValidationMode};
pub use report::RunReport;
