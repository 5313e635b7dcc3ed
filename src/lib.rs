//! apiguide - API documentation generator
//!
//! Resolves a service's API description and renders a set of documentation artifacts from it:
//! a Markdown guide, per-endpoint code samples, a schema catalog, a Postman collection and a
//! CSV endpoint index.
//!
//! # Core Concepts
//!
//! - **Acquisition**: the description comes from the first strategy that yields one. A remote
//!   fetch from the running service, then an exporter binary in the project, then a scan of
//!   route registrations in the source tree.
//! - **Synthesis**: every schema node gets a deterministic placeholder example
//! - **Emission**: artifacts are rendered in memory and handed to an [`output::ArtifactSink`]
//! - **Validation**: optionally probes a few read-only endpoints of the live service
//!
//! # Example Usage
//!
//! ```ignore
//! use apiguide::{GuideConfig, PipelineOrchestrator, ReqwestTransport, RunOptions};
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! let config = GuideConfig::default();
//! let orchestrator = PipelineOrchestrator::for_project(
//!     Path::new("."),
//!     &config,
//!     Arc::new(ReqwestTransport::new()),
//! )?;
//! let report = orchestrator.execute(".", RunOptions::default())?;
//! println!("{}", report.source_line());
//! ```

pub mod acquire;
pub mod cli;
pub mod config;
pub mod description;
pub mod emit;
pub mod extract;
pub mod fs;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod synth;
pub mod transport;
pub mod util;
pub mod validation;

pub use acquire::{AcquireError, Acquired, AcquisitionStrategy, SpecAcquisitor, StrategyKind};
pub use config::{ConfigError, GuideConfig};
pub use description::{ApiDescription, ResolvedDescription, TypeDescription};
pub use emit::{ArtifactBundle, ArtifactEmitter};
pub use pipeline::{PipelineError, PipelineOrchestrator, RunOptions, RunReport, ValidationMode};
pub use synth::ExampleSynthesizer;
pub use transport::{ReqwestTransport, Transport};
pub use util::{init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
