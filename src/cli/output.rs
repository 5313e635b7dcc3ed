//! Output formatting for the run report
//!
//! Renders a [`RunReport`] as JSON, YAML or human-readable text. Everything produced here goes
//! to stdout; logs stay on stderr.

use anyhow::{Context, Result};
use serde_json::Value;

use crate::pipeline::RunReport;
use crate::validation::ProbeOutcome;

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format
    Yaml,
    /// Human-readable formatted text
    Human,
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format_report(&self, report: &RunReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(report)
                .context("Failed to serialize run report to JSON"),
            OutputFormat::Yaml => {
                serde_yaml::to_string(report).context("Failed to serialize run report to YAML")
            }
            OutputFormat::Human => Ok(self.format_human(report)),
        }
    }

    /// Formats a synthesized example; human and JSON both print pretty JSON
    pub fn format_example(&self, example: &Value) -> Result<String> {
        match self.format {
            OutputFormat::Yaml => {
                serde_yaml::to_string(example).context("Failed to serialize example to YAML")
            }
            OutputFormat::Json | OutputFormat::Human => serde_json::to_string_pretty(example)
                .context("Failed to serialize example to JSON"),
        }
    }

    fn format_human(&self, report: &RunReport) -> String {
        let mut output = String::new();

        output.push_str("\u{2713} API Guide Generated\n");
        output.push_str(&"\u{2501}".repeat(42));
        output.push_str("\n\n");

        output.push_str(&format!("{}\n", report.source_line()));
        output.push_str(&format!("API:           {} {}\n", report.title, report.version));
        output.push_str(&format!("Base URL:      {}\n", report.base_url));
        output.push_str(&format!("Endpoints:     {}\n", report.endpoint_count));
        output.push_str(&format!("Schemas:       {}\n\n", report.schema_count));

        output.push_str("Artifacts:\n");
        let last = report.artifacts.len().saturating_sub(1);
        for (i, artifact) in report.artifacts.iter().enumerate() {
            let connector = if i == last { "\u{2514}" } else { "\u{251C}" };
            output.push_str(&format!("{}\u{2500} {}\n", connector, artifact));
        }

        if let Some(probes) = &report.validation {
            output.push_str("\nValidation:\n");
            if probes.is_empty() {
                output.push_str("  (no safe endpoints to probe)\n");
            }
            for probe in probes {
                let marker = match probe.outcome {
                    ProbeOutcome::Status(code) if (200..300).contains(&code) => "\u{2713}",
                    _ => "\u{26A0}",
                };
                output.push_str(&format!("  {} {}\n", marker, probe));
            }
            if report.allow_destructive {
                output.push_str("  (destructive requests allowed; probes stayed read-only)\n");
            }
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acquire::StrategyKind;
    use crate::validation::ProbeResult;
    use chrono::Utc;
    use serde_json::json;

    fn create_test_report() -> RunReport {
        RunReport {
            source: StrategyKind::Static,
            detail: "fallback".to_string(),
            title: "Static Scan (Fallback)".to_string(),
            version: "0.0.0".to_string(),
            base_url: "http://localhost:8000".to_string(),
            endpoint_count: 1,
            schema_count: 0,
            artifacts: vec![
                "docs/openapi.json".to_string(),
                "API_GUIDE.md".to_string(),
                "docs/report.txt".to_string(),
            ],
            validation: Some(vec![ProbeResult {
                method: "GET".to_string(),
                path: "/health".to_string(),
                outcome: ProbeOutcome::Status(200),
            }]),
            allow_destructive: false,
            generated_at: Utc::now(),
        }
    }

    #[test]
    fn test_json_format() {
        let output = OutputFormatter::new(OutputFormat::Json)
            .format_report(&create_test_report())
            .unwrap();
        let parsed: Value = serde_json::from_str(&output).unwrap();

        assert_eq!(parsed["source"], "static");
        assert_eq!(parsed["endpoint_count"], 1);
        assert_eq!(parsed["validation"][0]["outcome"]["kind"], "status");
        assert_eq!(parsed["validation"][0]["outcome"]["value"], 200);
    }

    #[test]
    fn test_yaml_format() {
        let output = OutputFormatter::new(OutputFormat::Yaml)
            .format_report(&create_test_report())
            .unwrap();

        assert!(output.contains("source: static"));
        assert!(output.contains("endpoint_count: 1"));
    }

    #[test]
    fn test_human_format() {
        let output = OutputFormatter::new(OutputFormat::Human)
            .format_report(&create_test_report())
            .unwrap();

        assert!(output.contains("Description source: static (fallback)"));
        assert!(output.contains("Endpoints:     1"));
        assert!(output.contains("\u{2514}\u{2500} docs/report.txt"));
        assert!(output.contains("GET /health -> 200"));
    }

    #[test]
    fn test_human_format_without_validation() {
        let mut report = create_test_report();
        report.validation = None;
        let output = OutputFormatter::new(OutputFormat::Human)
            .format_report(&report)
            .unwrap();

        assert!(!output.contains("Validation:"));
    }

    #[test]
    fn test_format_example() {
        let example = json!({"id": 0});
        let json_out = OutputFormatter::new(OutputFormat::Human)
            .format_example(&example)
            .unwrap();
        assert_eq!(json_out, "{\n  \"id\": 0\n}");

        let yaml_out = OutputFormatter::new(OutputFormat::Yaml)
            .format_example(&example)
            .unwrap();
        assert_eq!(yaml_out.trim(), "id: 0");
    }
}
