//! Artifact emission: renders every generated document from one resolved description.
//!
//! All per-operation artifacts (guide sections, sample units, index rows, collection items)
//! are rendered from a single traversal of the description's paths, so they always agree on
//! the set and order of endpoints.

pub mod catalog;
pub mod collection;
pub mod guide;
pub mod index;
pub mod samples;

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::description::{ApiDescription, Operation, ResolvedDescription};
use crate::extract;
use crate::output::layout;
use crate::output::ArtifactSink;
use crate::synth::ExampleSynthesizer;

/// One (verb, path) pair in traversal order, with everything its artifacts share
#[derive(Debug, Clone)]
pub struct Endpoint<'a> {
    /// Uppercase HTTP verb
    pub method: String,
    pub path: &'a str,
    pub operation: &'a Operation,
    pub requires_auth: bool,
    /// Synthesized request body; `None` when there is no JSON body schema or no confident example
    pub body_example: Option<Value>,
}

impl<'a> Endpoint<'a> {
    pub fn url(&self, base: &str) -> String {
        format!("{}{}", base, self.path)
    }

    /// Display name: the summary, else `VERB path`
    pub fn display_name(&self) -> String {
        self.operation
            .summary
            .clone()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| format!("{} {}", self.method, self.path))
    }

    pub fn example_link(&self) -> String {
        format!(
            "{}/{}",
            layout::EXAMPLES_DIR,
            layout::example_file_name(&self.method, self.path)
        )
    }
}

/// Walks `paths` and their verb maps in document order
pub fn endpoints<'a>(
    description: &'a ApiDescription,
    synthesizer: &ExampleSynthesizer,
) -> Vec<Endpoint<'a>> {
    description
        .paths
        .iter()
        .flat_map(|(path, item)| {
            item.iter().map(move |(method, operation)| Endpoint {
                method: method.to_uppercase(),
                path: path.as_str(),
                operation,
                requires_auth: extract::requires_auth(operation),
                body_example: extract::request_body_schema(operation)
                    .map(|schema| synthesizer.synthesize(schema))
                    .filter(|example| !example.is_null()),
            })
        })
        .collect()
}

/// Two-space indented JSON with non-ASCII kept verbatim
pub fn pretty_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize JSON artifact")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    pub contents: String,
}

impl Artifact {
    pub fn new(path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
        }
    }
}

/// Everything one run produces, in emission order
#[derive(Debug, Clone, Default)]
pub struct ArtifactBundle {
    pub artifacts: Vec<Artifact>,
    pub endpoint_count: usize,
    pub schema_count: usize,
    pub base_url: String,
}

impl ArtifactBundle {
    pub fn get(&self, path: impl AsRef<Path>) -> Option<&str> {
        let path = path.as_ref();
        self.artifacts
            .iter()
            .find(|a| a.path == path)
            .map(|a| a.contents.as_str())
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.artifacts.iter().map(|a| a.path.as_path())
    }

    pub fn persist(&self, sink: &dyn ArtifactSink) -> Result<()> {
        for artifact in &self.artifacts {
            sink.persist(&artifact.path, &artifact.contents)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ArtifactEmitter {
    synthesizer: ExampleSynthesizer,
}

impl ArtifactEmitter {
    pub fn new(synthesizer: ExampleSynthesizer) -> Self {
        Self { synthesizer }
    }

    pub fn emit(&self, resolved: &ResolvedDescription) -> Result<ArtifactBundle> {
        let description = &resolved.description;
        let base = extract::base_url(description);
        let endpoints = endpoints(description, &self.synthesizer);

        let mut artifacts = vec![Artifact::new(
            layout::SNAPSHOT_FILE,
            pretty_json(&resolved.raw)?,
        )];

        artifacts.push(Artifact::new(
            layout::GUIDE_FILE,
            guide::render(description, &endpoints, &base, &self.synthesizer)?,
        ));

        for endpoint in &endpoints {
            artifacts.push(Artifact::new(
                layout::example_path(&endpoint.method, endpoint.path),
                samples::render(endpoint, &base)?,
            ));
        }

        let schemas = catalog::entries(resolved)?;
        let schema_count = schemas.len();
        artifacts.extend(schemas);

        artifacts.push(Artifact::new(
            layout::COLLECTION_FILE,
            pretty_json(&collection::build(description, &endpoints, &base)?)?,
        ));
        artifacts.push(Artifact::new(layout::INDEX_FILE, index::render(&endpoints)));

        debug!(
            endpoints = endpoints.len(),
            schemas = schema_count,
            artifacts = artifacts.len(),
            "Rendered artifacts"
        );

        Ok(ArtifactBundle {
            artifacts,
            endpoint_count: endpoints.len(),
            schema_count,
            base_url: base,
        })
    }
}
