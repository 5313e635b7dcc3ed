//! In-process introspection: asks the project's own code for its API description.
//!
//! Candidates are capability objects rather than names matched by convention. A candidate
//! answers "can you produce a description?" and the strategy takes the first one that does.
//! For Rust services the natural candidate is an exporter binary that prints the description
//! as JSON on stdout. The binary is built first and then run directly, each step under its own
//! deadline, so a candidate that turns out to be a long-running server is killed instead of
//! blocking the fallback chain.

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;
use tracing::debug;

use super::{AcquisitionStrategy, Attempt, StrategyKind};
use crate::description::ResolvedDescription;
use crate::fs::{FileSystem, FileType};
use crate::util::run_bounded;

/// Applies separately to building and to running an exporter
pub const DEFAULT_EXPORTER_TIMEOUT: Duration = Duration::from_secs(60);

/// Conventional exporter binaries, tried before anything found by walking `src/bin`
pub const WELL_KNOWN_EXPORTERS: [&str; 4] =
    ["export_openapi", "dump_openapi", "generate_openapi", "openapi"];

const BIN_DIR: &str = "src/bin";
const EXPORTER_MARKER: &str = "openapi";

pub trait AppCandidate {
    fn name(&self) -> &str;

    /// `Ok(None)` means the candidate exists but is not an API application
    fn describe(&self) -> Result<Option<Value>>;
}

pub trait CandidateLocator {
    fn well_known(&self) -> Vec<Box<dyn AppCandidate>>;

    fn walk_package(&self) -> Vec<Box<dyn AppCandidate>>;
}

pub struct IntrospectionStrategy {
    locator: Box<dyn CandidateLocator>,
}

impl IntrospectionStrategy {
    pub fn new(locator: Box<dyn CandidateLocator>) -> Self {
        Self { locator }
    }
}

impl AcquisitionStrategy for IntrospectionStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Introspection
    }

    fn attempt(&self) -> Result<Attempt> {
        let candidates = self
            .locator
            .well_known()
            .into_iter()
            .chain(self.locator.walk_package());

        for candidate in candidates {
            let document = match candidate.describe() {
                Ok(Some(document)) if looks_like_description(&document) => document,
                Ok(_) => {
                    debug!(candidate = candidate.name(), "Candidate is not an API application");
                    continue;
                }
                Err(e) => {
                    debug!(candidate = candidate.name(), error = %e, "Candidate failed");
                    continue;
                }
            };

            match ResolvedDescription::from_value(document) {
                Ok(resolved) => {
                    return Ok(Attempt {
                        resolved,
                        detail: candidate.name().to_string(),
                    })
                }
                Err(e) => {
                    debug!(candidate = candidate.name(), error = %e, "Candidate output rejected");
                }
            }
        }

        anyhow::bail!("no introspection candidate produced an API description")
    }
}

fn looks_like_description(document: &Value) -> bool {
    document
        .as_object()
        .map_or(false, |map| map.contains_key("paths") || map.contains_key("openapi"))
}

/// Finds exporter binaries under the project's `src/bin`
pub struct ExporterLocator<F: FileSystem> {
    fs: F,
    root: PathBuf,
    timeout: Duration,
}

impl<F: FileSystem> ExporterLocator<F> {
    pub fn new(fs: F, root: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            root: root.into(),
            timeout: DEFAULT_EXPORTER_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn bin_dir(&self) -> PathBuf {
        self.root.join(BIN_DIR)
    }

    fn candidate(&self, name: &str) -> Box<dyn AppCandidate> {
        Box::new(ExporterBinary::new(&self.root, name).with_timeout(self.timeout))
    }

    /// Binary name for a `src/bin` entry: `name.rs` or `name/main.rs`
    fn entry_source(
        &self,
        path: &Path,
        name: &str,
        file_type: FileType,
    ) -> Option<(String, PathBuf)> {
        match file_type {
            FileType::File => name
                .strip_suffix(".rs")
                .map(|stem| (stem.to_string(), path.to_path_buf())),
            FileType::Directory => {
                let main = path.join("main.rs");
                self.fs.is_file(&main).then(|| (name.to_string(), main))
            }
            FileType::Symlink => None,
        }
    }
}

impl<F: FileSystem> CandidateLocator for ExporterLocator<F> {
    fn well_known(&self) -> Vec<Box<dyn AppCandidate>> {
        let bin_dir = self.bin_dir();
        WELL_KNOWN_EXPORTERS
            .iter()
            .filter(|name| {
                self.fs.is_file(&bin_dir.join(format!("{}.rs", name)))
                    || self.fs.is_file(&bin_dir.join(name).join("main.rs"))
            })
            .map(|name| self.candidate(name))
            .collect()
    }

    fn walk_package(&self) -> Vec<Box<dyn AppCandidate>> {
        let bin_dir = self.bin_dir();
        let entries = match self.fs.read_dir(&bin_dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(path = %bin_dir.display(), error = %e, "No binaries to walk");
                return Vec::new();
            }
        };

        entries
            .iter()
            .filter_map(|entry| self.entry_source(entry.path(), entry.file_name(), entry.file_type()))
            .filter(|(name, _)| !WELL_KNOWN_EXPORTERS.contains(&name.as_str()))
            .filter(|(_, source)| {
                self.fs
                    .read_to_string(source)
                    .map(|content| content.to_lowercase().contains(EXPORTER_MARKER))
                    .unwrap_or(false)
            })
            .map(|(name, _)| self.candidate(&name))
            .collect()
    }
}

/// A project binary that prints the API description on stdout
pub struct ExporterBinary {
    root: PathBuf,
    name: String,
    timeout: Duration,
}

impl ExporterBinary {
    pub fn new(root: &Path, name: &str) -> Self {
        Self {
            root: root.to_path_buf(),
            name: name.to_string(),
            timeout: DEFAULT_EXPORTER_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds the binary and returns the path cargo reports for it
    fn build(&self) -> Result<PathBuf> {
        debug!(binary = %self.name, root = %self.root.display(), "Building exporter");

        let output = run_bounded(
            Command::new("cargo")
                .args([
                    "build",
                    "--quiet",
                    "--message-format=json-render-diagnostics",
                    "--bin",
                    &self.name,
                ])
                .current_dir(&self.root),
            self.timeout,
        )
        .with_context(|| format!("failed to build exporter {}", self.name))?;

        if !output.status.success() {
            anyhow::bail!(
                "building exporter {} failed with {}: {}",
                self.name,
                output.status,
                output.stderr_text()
            );
        }

        built_executable(&output.stdout, &self.name)
            .with_context(|| format!("cargo reported no executable for {}", self.name))
    }

    /// Runs a built exporter and parses its stdout
    fn run(&self, executable: &Path) -> Result<Value> {
        debug!(binary = %self.name, executable = %executable.display(), "Running exporter");

        let output = run_bounded(
            Command::new(executable).current_dir(&self.root),
            self.timeout,
        )
        .with_context(|| format!("exporter {} did not complete", self.name))?;

        if !output.status.success() {
            anyhow::bail!(
                "exporter {} exited with {}: {}",
                self.name,
                output.status,
                output.stderr_text()
            );
        }

        serde_json::from_slice(&output.stdout)
            .with_context(|| format!("exporter {} did not print JSON", self.name))
    }
}

impl AppCandidate for ExporterBinary {
    fn name(&self) -> &str {
        &self.name
    }

    fn describe(&self) -> Result<Option<Value>> {
        let executable = self.build()?;
        self.run(&executable).map(Some)
    }
}

/// The `executable` of the last `compiler-artifact` message for binary `name` in cargo's JSON
/// message stream
fn built_executable(messages: &[u8], name: &str) -> Option<PathBuf> {
    String::from_utf8_lossy(messages)
        .lines()
        .filter_map(|line| serde_json::from_str::<Value>(line).ok())
        .filter(|message| message["reason"] == "compiler-artifact")
        .filter(|message| message["target"]["name"] == name)
        .filter(|message| {
            message["target"]["kind"]
                .as_array()
                .map_or(false, |kinds| kinds.iter().any(|kind| kind == "bin"))
        })
        .filter_map(|message| message["executable"].as_str().map(PathBuf::from))
        .last()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileSystem;
    use serde_json::json;

    struct Canned {
        name: &'static str,
        output: std::result::Result<Option<Value>, &'static str>,
    }

    impl AppCandidate for Canned {
        fn name(&self) -> &str {
            self.name
        }

        fn describe(&self) -> Result<Option<Value>> {
            self.output.clone().map_err(|e| anyhow::anyhow!(e))
        }
    }

    struct Listed {
        well_known: Vec<Canned>,
        walked: Vec<Canned>,
    }

    fn boxed(candidates: &[Canned]) -> Vec<Box<dyn AppCandidate>> {
        candidates
            .iter()
            .map(|c| {
                Box::new(Canned {
                    name: c.name,
                    output: c.output.clone(),
                }) as Box<dyn AppCandidate>
            })
            .collect()
    }

    impl CandidateLocator for Listed {
        fn well_known(&self) -> Vec<Box<dyn AppCandidate>> {
            boxed(&self.well_known)
        }

        fn walk_package(&self) -> Vec<Box<dyn AppCandidate>> {
            boxed(&self.walked)
        }
    }

    fn names(candidates: Vec<Box<dyn AppCandidate>>) -> Vec<String> {
        candidates.iter().map(|c| c.name().to_string()).collect()
    }

    #[test]
    fn test_failures_are_swallowed_per_candidate() {
        let strategy = IntrospectionStrategy::new(Box::new(Listed {
            well_known: vec![
                Canned { name: "broken", output: Err("import failed") },
                Canned { name: "cli_tool", output: Ok(None) },
                Canned { name: "not_api", output: Ok(Some(json!({"hello": "world"}))) },
            ],
            walked: vec![Canned {
                name: "svc",
                output: Ok(Some(json!({"openapi": "3.1.0", "paths": {"/a": {"get": {}}}}))),
            }],
        }));

        let attempt = strategy.attempt().unwrap();
        assert_eq!(attempt.detail, "svc");
        assert_eq!(attempt.resolved.description.operation_count(), 1);
    }

    #[test]
    fn test_well_known_wins_over_walk() {
        let strategy = IntrospectionStrategy::new(Box::new(Listed {
            well_known: vec![Canned { name: "export_openapi", output: Ok(Some(json!({"paths": {}}))) }],
            walked: vec![Canned { name: "other", output: Ok(Some(json!({"paths": {"/b": {}}}))) }],
        }));

        assert_eq!(strategy.attempt().unwrap().detail, "export_openapi");
    }

    #[test]
    fn test_no_candidates_is_failure() {
        let strategy = IntrospectionStrategy::new(Box::new(Listed {
            well_known: vec![],
            walked: vec![],
        }));
        assert!(strategy.attempt().is_err());
    }

    #[test]
    fn test_locator_finds_well_known_exporters() {
        let fs = MockFileSystem::new();
        fs.add_file("src/bin/dump_openapi.rs", "fn main() {}");
        fs.add_file("src/bin/openapi/main.rs", "fn main() {}");
        fs.add_file("src/bin/migrate.rs", "fn main() {}");

        let locator = ExporterLocator::new(fs, "/mock");
        assert_eq!(names(locator.well_known()), vec!["dump_openapi", "openapi"]);
    }

    #[test]
    fn test_locator_walk_filters_on_marker() {
        let fs = MockFileSystem::new();
        fs.add_file("src/bin/export_openapi.rs", "// OpenAPI");
        fs.add_file("src/bin/spec_dump.rs", "println!(\"{}\", ApiDoc::openapi().to_json()?);");
        fs.add_file("src/bin/migrate.rs", "fn main() { run_migrations() }");
        fs.add_file("src/bin/docs/main.rs", "use utoipa::OpenApi;");
        fs.add_file("src/bin/notes.txt", "openapi");

        let locator = ExporterLocator::new(fs, "/mock");
        assert_eq!(names(locator.walk_package()), vec!["docs", "spec_dump"]);
    }

    #[test]
    fn test_locator_without_bin_dir() {
        let locator = ExporterLocator::new(MockFileSystem::new(), "/mock");
        assert!(locator.well_known().is_empty());
        assert!(locator.walk_package().is_empty());
    }

    #[test]
    fn test_built_executable_from_cargo_messages() {
        let messages = [
            json!({"reason": "compiler-artifact", "target": {"name": "serde", "kind": ["lib"]}, "executable": null}),
            json!({"reason": "compiler-artifact", "target": {"name": "export_openapi", "kind": ["bin"]}, "executable": "/svc/target/debug/export_openapi"}),
            json!({"reason": "build-finished", "success": true}),
        ]
        .iter()
        .map(Value::to_string)
        .collect::<Vec<_>>()
        .join("\n");

        assert_eq!(
            built_executable(messages.as_bytes(), "export_openapi"),
            Some(PathBuf::from("/svc/target/debug/export_openapi"))
        );
        assert!(built_executable(messages.as_bytes(), "server").is_none());
        assert!(built_executable(b"not json", "export_openapi").is_none());
    }

    #[test]
    fn test_locator_passes_timeout_to_candidates() {
        let fs = MockFileSystem::new();
        fs.add_file("src/bin/export_openapi.rs", "fn main() {}");

        let locator = ExporterLocator::new(fs, "/mock").with_timeout(Duration::from_secs(7));
        assert_eq!(locator.timeout, Duration::from_secs(7));
        assert_eq!(names(locator.well_known()), vec!["export_openapi"]);
    }

    #[cfg(unix)]
    mod exporter_runs {
        use super::*;
        use std::os::unix::fs::PermissionsExt;
        use std::time::Instant;
        use tempfile::TempDir;

        fn script(dir: &TempDir, name: &str, body: &str) -> PathBuf {
            let path = dir.path().join(name);
            std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        #[test]
        fn test_exporter_output_is_parsed() {
            let dir = TempDir::new().unwrap();
            let exporter = script(&dir, "export_openapi", r#"echo '{"openapi": "3.1.0", "paths": {}}'"#);

            let binary = ExporterBinary::new(dir.path(), "export_openapi");
            let document = binary.run(&exporter).unwrap();
            assert_eq!(document["openapi"], "3.1.0");
        }

        #[test]
        fn test_server_binary_is_killed_at_deadline() {
            let dir = TempDir::new().unwrap();
            let server = script(&dir, "server", "echo listening >&2\nwhile true; do sleep 1; done");

            let binary = ExporterBinary::new(dir.path(), "server")
                .with_timeout(Duration::from_millis(300));
            let start = Instant::now();
            let err = binary.run(&server).unwrap_err();

            assert!(format!("{:#}", err).contains("did not finish"));
            assert!(start.elapsed() < Duration::from_secs(5));
        }

        #[test]
        fn test_failing_exporter_reports_stderr() {
            let dir = TempDir::new().unwrap();
            let exporter = script(&dir, "dump_openapi", "echo missing DATABASE_URL >&2\nexit 1");

            let binary = ExporterBinary::new(dir.path(), "dump_openapi");
            let err = binary.run(&exporter).unwrap_err();
            assert!(err.to_string().contains("missing DATABASE_URL"));
        }
    }
}
