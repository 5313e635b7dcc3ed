//! Per-endpoint sample units: the same request as curl, HTTPie and Python `requests`

use anyhow::{Context, Result};

use super::Endpoint;

const AUTH_HEADER: &str = "Authorization: Bearer <token>";

pub fn render(endpoint: &Endpoint<'_>, base: &str) -> Result<String> {
    let url = endpoint.url(base);
    let body = endpoint
        .body_example
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .context("Failed to serialize request body example")?;

    let sections = [
        format!("**curl**\n```bash\n{}\n```", curl(endpoint, &url, body.as_deref())),
        format!("**HTTPie**\n```bash\n{}\n```", httpie(endpoint, &url, body.as_deref())),
        format!(
            "**Python (requests)**\n```python\n{}\n```",
            python(endpoint, &url, body.as_deref())?
        ),
    ];
    Ok(sections.join("\n\n") + "\n")
}

fn curl(endpoint: &Endpoint<'_>, url: &str, body: Option<&str>) -> String {
    let mut command = format!("curl -s -X {} \"{}\"", endpoint.method, url);
    if endpoint.requires_auth {
        command.push_str(&format!(" -H \"{}\"", AUTH_HEADER));
    }
    if let Some(body) = body {
        command.push_str(&format!(
            " -H \"Content-Type: application/json\" -d {}",
            shell_quote(body)
        ));
    }
    command
}

fn httpie(endpoint: &Endpoint<'_>, url: &str, body: Option<&str>) -> String {
    let mut command = format!("http {} {}", endpoint.method, url);
    if endpoint.requires_auth {
        command.push_str(" Authorization:'Bearer <token>'");
    }
    if let Some(body) = body {
        command.push_str(&format!(
            " Content-Type:application/json <<< {}",
            shell_quote(body)
        ));
    }
    command
}

fn python(endpoint: &Endpoint<'_>, url: &str, body: Option<&str>) -> Result<String> {
    let mut lines = Vec::new();
    if body.is_some() {
        lines.push("import json".to_string());
    }
    lines.push("import requests".to_string());
    lines.push(String::new());

    if endpoint.requires_auth {
        lines.push("headers = {\"Authorization\": \"Bearer <token>\"}".to_string());
    } else {
        lines.push("headers = {}".to_string());
    }

    let payload = match body {
        // A JSON string literal is also a valid Python string literal
        Some(body) => format!("json=json.loads({})", serde_json::to_string(body)?),
        None if endpoint.method == "GET" => "params={}".to_string(),
        None => "json={}".to_string(),
    };
    lines.push(format!(
        "r = requests.{}(\"{}\", headers=headers, {})",
        endpoint.method.to_lowercase(),
        url,
        payload
    ));
    lines.push("print(r.status_code)".to_string());
    lines.push(
        "print(r.json() if \"application/json\" in r.headers.get(\"Content-Type\", \"\") else r.text)"
            .to_string(),
    );
    Ok(lines.join("\n"))
}

/// Single-quotes for POSIX shells
fn shell_quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', r"'\''"))
}
