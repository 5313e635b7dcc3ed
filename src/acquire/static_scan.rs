use anyhow::Result;
use ignore::{overrides::OverrideBuilder, WalkBuilder};
use indexmap::IndexMap;
use regex::Regex;
use serde_json::{json, Map, Value};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::{AcquisitionStrategy, Attempt, StrategyKind};
use crate::description::ResolvedDescription;

pub const FALLBACK_TITLE: &str = "Static Scan (Fallback)";
pub const FALLBACK_VERSION: &str = "0.0.0";
pub const FALLBACK_DETAIL: &str = "fallback";

const ROUTE_PATTERN: &str =
    r#"(?i)\b[A-Za-z_]\w*\.(get|post|put|patch|delete)\(\s*["'](/[^"'\s]*)["']"#;

const EXCLUDED_DIRS: [&str; 7] = [
    "node_modules",
    "target",
    "venv",
    "__pycache__",
    "dist",
    "build",
    "vendor",
];

#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub max_depth: usize,
    pub max_files: usize,
    pub extensions: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_depth: 32,
            max_files: 10_000,
            extensions: ["py", "js", "ts", "mjs", "rb", "go", "java", "kt", "rs", "php"]
                .iter()
                .map(|e| e.to_string())
                .collect(),
        }
    }
}

/// Best-effort route discovery over source text.
///
/// Matches `<identifier>.<verb>("/path"` call sites (decorators included) in every source file
/// under the root, skipping hidden trees and dependency/build directories. False positives are
/// accepted; the scan never fails.
pub struct StaticScan {
    root: PathBuf,
    config: ScanConfig,
    pattern: Regex,
}

impl StaticScan {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            root: root.into(),
            config: ScanConfig::default(),
            pattern: Regex::new(ROUTE_PATTERN)?,
        })
    }

    pub fn with_config(mut self, config: ScanConfig) -> Self {
        self.config = config;
        self
    }

    /// Routes found in `text`, as (uppercase verb, path) in order of appearance
    pub fn routes_in<'t>(&self, text: &'t str) -> Vec<(String, &'t str)> {
        self.pattern
            .captures_iter(text)
            .filter_map(|caps| {
                let verb = caps.get(1)?.as_str().to_ascii_uppercase();
                let path = caps.get(2)?.as_str();
                Some((verb, path))
            })
            .collect()
    }

    pub fn scan(&self) -> Value {
        let start = Instant::now();
        let mut routes: IndexMap<String, IndexMap<String, Value>> = IndexMap::new();
        let mut files_scanned = 0usize;

        let mut override_builder = OverrideBuilder::new(&self.root);
        for excluded in EXCLUDED_DIRS {
            override_builder.add(&format!("!{}/", excluded)).ok();
        }
        let mut walker = WalkBuilder::new(&self.root);
        walker
            .max_depth(Some(self.config.max_depth))
            .hidden(true)
            .git_ignore(false)
            .sort_by_file_name(|a, b| a.cmp(b));
        if let Ok(overrides) = override_builder.build() {
            walker.overrides(overrides);
        }

        for result in walker.build() {
            let entry = match result {
                Ok(e) => e,
                Err(err) => {
                    warn!(error = %err, "Failed to read directory entry");
                    continue;
                }
            };
            let path = entry.path();

            if !entry.file_type().map_or(false, |ft| ft.is_file()) {
                continue;
            }
            let matches_extension = path
                .extension()
                .and_then(|e| e.to_str())
                .map_or(false, |e| self.config.extensions.iter().any(|x| x == e));
            if !matches_extension {
                continue;
            }

            if files_scanned >= self.config.max_files {
                warn!(
                    files_scanned,
                    max_files = self.config.max_files,
                    "Reached file limit, stopping scan"
                );
                break;
            }
            files_scanned += 1;

            let Ok(bytes) = std::fs::read(path) else {
                continue;
            };
            let text = String::from_utf8_lossy(&bytes);

            for (verb, route) in self.routes_in(&text) {
                debug!(path = %path.display(), verb = %verb, route, "Discovered route");
                let operations = routes.entry(route.to_string()).or_default();
                operations.entry(verb.to_lowercase()).or_insert_with(|| {
                    json!({
                        "summary": format!("Discovered {} {} (static scan)", verb, route),
                        "responses": {"200": {"description": "OK"}},
                    })
                });
            }
        }

        info!(
            routes = routes.len(),
            files_scanned,
            scan_time_ms = start.elapsed().as_millis() as u64,
            "Static scan completed"
        );

        let paths: Map<String, Value> = routes
            .into_iter()
            .map(|(route, operations)| (route, Value::Object(operations.into_iter().collect())))
            .collect();

        json!({
            "openapi": "3.1.0",
            "info": {"title": FALLBACK_TITLE, "version": FALLBACK_VERSION},
            "paths": paths,
        })
    }
}

impl AcquisitionStrategy for StaticScan {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Static
    }

    fn attempt(&self) -> Result<Attempt> {
        let resolved = ResolvedDescription::from_value(self.scan())?;
        Ok(Attempt {
            resolved,
            detail: FALLBACK_DETAIL.to_string(),
        })
    }
}
