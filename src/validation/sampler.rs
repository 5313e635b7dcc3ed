use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::description::ApiDescription;
use crate::transport::Transport;

pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(3);
pub const DEFAULT_MAX_PROBES: usize = 3;

/// Path fragments of conventional health, readiness and documentation endpoints
pub const SAFE_SEGMENTS: [&str; 5] = ["/health", "/live", "/ready", "/docs", "/openapi.json"];

/// How many leading paths the fallback selection looks at
const FALLBACK_WINDOW: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "value")]
pub enum ProbeOutcome {
    Status(u16),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeResult {
    pub method: String,
    pub path: String,
    pub outcome: ProbeOutcome,
}

impl fmt::Display for ProbeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            ProbeOutcome::Status(status) => write!(f, "{} {} -> {}", self.method, self.path, status),
            ProbeOutcome::Error(message) => {
                write!(f, "{} {} -> ERROR {}", self.method, self.path, message)
            }
        }
    }
}

/// Read-only probe candidates.
///
/// Prefers GET paths containing a [`SAFE_SEGMENTS`] fragment; with none of those, takes GET
/// paths from the first ten in document order. At most `max_probes` are returned.
pub fn select_candidates(description: &ApiDescription, max_probes: usize) -> Vec<String> {
    let has_get = |item: &crate::description::PathItem| item.contains_key("get");

    let preferred: Vec<String> = description
        .paths
        .iter()
        .filter(|(path, item)| has_get(item) && SAFE_SEGMENTS.iter().any(|s| path.contains(s)))
        .map(|(path, _)| path.clone())
        .take(max_probes)
        .collect();
    if !preferred.is_empty() {
        return preferred;
    }

    description
        .paths
        .iter()
        .take(FALLBACK_WINDOW)
        .filter(|(_, item)| has_get(item))
        .map(|(path, _)| path.clone())
        .take(max_probes)
        .collect()
}

/// Issues one blocking GET per candidate and records what happened
pub struct SampleValidator {
    transport: Arc<dyn Transport>,
    timeout: Duration,
    max_probes: usize,
}

impl SampleValidator {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            timeout: DEFAULT_PROBE_TIMEOUT,
            max_probes: DEFAULT_MAX_PROBES,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_probes(mut self, max_probes: usize) -> Self {
        self.max_probes = max_probes;
        self
    }

    /// Probes never fail the run; errors become [`ProbeOutcome::Error`] entries.
    /// `allow_destructive` is recorded only: this validator issues GET requests exclusively.
    pub fn validate(
        &self,
        description: &ApiDescription,
        base: &str,
        allow_destructive: bool,
    ) -> Vec<ProbeResult> {
        let candidates = select_candidates(description, self.max_probes);
        info!(
            candidates = candidates.len(),
            allow_destructive, "Probing sample endpoints"
        );

        candidates
            .into_iter()
            .map(|path| {
                let url = format!("{}{}", base, path);
                let outcome = match self.transport.get(&url, None, self.timeout) {
                    Ok(response) => ProbeOutcome::Status(response.status),
                    Err(e) => ProbeOutcome::Error(e.to_string()),
                };
                debug!(url = %url, outcome = ?outcome, "Probe finished");
                ProbeResult {
                    method: "GET".to_string(),
                    path,
                    outcome,
                }
            })
            .collect()
    }
}
