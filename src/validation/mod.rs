//! Optional post-generation sampling of a few read-only endpoints

pub mod sampler;

pub use sampler::{select_candidates, ProbeOutcome, ProbeResult, SampleValidator};
