use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::acquire::StrategyKind;
use crate::validation::ProbeResult;

/// Summary of one generation run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub source: StrategyKind,
    pub detail: String,
    pub title: String,
    pub version: String,
    pub base_url: String,
    pub endpoint_count: usize,
    pub schema_count: usize,
    /// Artifact paths relative to the output root, in write order
    pub artifacts: Vec<String>,
    /// Probe results when sample validation ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<Vec<ProbeResult>>,
    pub allow_destructive: bool,
    pub generated_at: DateTime<Utc>,
}

impl RunReport {
    pub fn source_line(&self) -> String {
        format!("Description source: {} ({})", self.source, self.detail)
    }

    /// Contents of `docs/report.txt`; leaves out the timestamp so reruns are byte-identical
    pub fn to_text(&self) -> String {
        let mut lines = vec![self.source_line()];
        if let Some(probes) = &self.validation {
            lines.push("Validation:".to_string());
            lines.extend(probes.iter().map(ToString::to_string));
        }
        let mut text = lines.join("\n");
        text.push('\n');
        text
    }

    pub fn probe_errors(&self) -> usize {
        self.validation.as_ref().map_or(0, |probes| {
            probes
                .iter()
                .filter(|p| matches!(p.outcome, crate::validation::ProbeOutcome::Error(_)))
                .count()
        })
    }
}
