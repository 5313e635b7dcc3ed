//! Artifact persistence and the output layout

pub mod layout;
pub mod sink;

pub use sink::{ArtifactSink, DirectorySink};
