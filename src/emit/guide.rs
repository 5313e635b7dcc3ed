//! `API_GUIDE.md`: the human-readable guide

use anyhow::Result;
use serde_json::Value;

use super::{pretty_json, Endpoint};
use crate::description::{ApiDescription, Parameter};
use crate::extract;
use crate::synth::ExampleSynthesizer;

const BEARER_HINT: &str = "Add `Authorization: Bearer <token>` where required.\n";

/// Renders the guide; sections are separated by blank lines
pub fn render(
    description: &ApiDescription,
    endpoints: &[Endpoint<'_>],
    base: &str,
    synthesizer: &ExampleSynthesizer,
) -> Result<String> {
    let mut parts: Vec<String> = Vec::new();
    let info = &description.info;

    parts.push(format!(
        "# {}\n\n**Version:** {}\n\n**Base URL:** `{}`\n",
        info.title(),
        info.version(),
        base
    ));
    if let Some(text) = &info.description {
        parts.push(text.clone());
    }

    parts.push(format!(
        "## Quick Start\n\n```bash\ncurl -s {}/health || true\n```",
        base
    ));

    let schemes = &description.components.security_schemes;
    if !schemes.is_empty() {
        parts.push("## Authentication\n".to_string());
        for (name, scheme) in schemes {
            parts.push(format!(
                "- **{}**: {} {}",
                name,
                scheme.kind,
                scheme.scheme.as_deref().unwrap_or("")
            ));
        }
        parts.push(BEARER_HINT.to_string());
    }

    parts.push("## Endpoints\n".to_string());
    for endpoint in endpoints {
        endpoint_section(&mut parts, endpoint, synthesizer)?;
    }

    let schemas = &description.components.schemas;
    if !schemas.is_empty() {
        parts.push("## Schemas\n".to_string());
        for (name, schema) in schemas {
            parts.push(format!("### `{}`", name));
            if let Some(text) = &schema.description {
                parts.push(text.clone());
            }
            let example = synthesizer.synthesize(schema);
            if !example.is_null() {
                parts.push("**Example**".to_string());
                parts.push(json_block(&example)?);
            }
        }
    }

    Ok(parts.join("\n\n"))
}

fn endpoint_section(
    parts: &mut Vec<String>,
    endpoint: &Endpoint<'_>,
    synthesizer: &ExampleSynthesizer,
) -> Result<()> {
    let operation = endpoint.operation;

    parts.push(format!("### {} `{}`", endpoint.method, endpoint.path));
    if let Some(summary) = operation.summary.as_deref().filter(|s| !s.is_empty()) {
        parts.push(format!("**Summary:** {}", summary));
    }
    if !operation.tags.is_empty() {
        parts.push(format!("**Tags:** {}", operation.tags.join(", ")));
    }
    if endpoint.requires_auth {
        parts.push("> Requires authentication\n".to_string());
    }

    if !operation.parameters.is_empty() {
        parts.push("**Parameters**".to_string());
        parts.push(parameter_table(&operation.parameters));
    }

    if let Some(body) = &endpoint.body_example {
        parts.push("**Request Body (JSON)**".to_string());
        parts.push(json_block(body)?);
    }

    parts.push("**Responses**".to_string());
    for (code, response) in &operation.responses {
        parts.push(format!("- **{}**: {}", code, response.description));
        if let Some(schema) = extract::json_schema_of(response) {
            let example = synthesizer.synthesize(schema);
            if !example.is_null() {
                parts.push(json_block(&example)?);
            }
        }
    }

    parts.push(format!("[Examples ->]({})", endpoint.example_link()));
    parts.push(String::new());
    Ok(())
}

fn parameter_table(parameters: &[Parameter]) -> String {
    let mut rows = vec![
        "| Name | In | Type | Required | Default |".to_string(),
        "|---|---|---|---|---|".to_string(),
    ];
    for parameter in parameters {
        let default = parameter
            .default_value()
            .map(Value::to_string)
            .unwrap_or_else(|| "-".to_string());
        rows.push(format!(
            "| `{}` | {} | {} | {} | {} |",
            cell(&parameter.name),
            cell(&parameter.location),
            cell(parameter.type_name()),
            parameter.required,
            cell(&default)
        ));
    }
    rows.join("\n")
}

/// Table cell text; a bare `|` would end the cell early
fn cell(text: &str) -> String {
    text.replace('|', "\\|")
}

fn json_block(value: &Value) -> Result<String> {
    Ok(format!("```json\n{}\n```", pretty_json(value)?))
}
