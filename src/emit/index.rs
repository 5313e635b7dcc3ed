//! `docs/endpoints.csv`: one row per endpoint

use super::Endpoint;

pub const HEADER: &str = "method,path,operationId,tags,summary";

pub fn render(endpoints: &[Endpoint<'_>]) -> String {
    let mut lines = vec![HEADER.to_string()];
    for endpoint in endpoints {
        let operation = endpoint.operation;
        let tags = operation.tags.join(", ");
        let fields = [
            endpoint.method.as_str(),
            endpoint.path,
            operation.operation_id.as_deref().unwrap_or(""),
            tags.as_str(),
            operation.summary.as_deref().unwrap_or(""),
        ];
        lines.push(
            fields
                .iter()
                .map(|f| csv_field(f))
                .collect::<Vec<_>>()
                .join(","),
        );
    }
    let mut csv = lines.join("\n");
    csv.push('\n');
    csv
}

/// RFC 4180: quote fields containing a delimiter, quote or line break; double inner quotes
fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::description::ResolvedDescription;
    use crate::emit::endpoints;
    use crate::synth::ExampleSynthesizer;
    use serde_json::json;

    #[test]
    fn test_rows_and_quoting() {
        let resolved = ResolvedDescription::from_value(json!({
            "paths": {
                "/items": {
                    "get": {"operationId": "list_items", "tags": ["items", "public"], "summary": "List items"},
                    "post": {"summary": "Create \"item\""}
                },
                "/health": {"get": {}}
            }
        }))
        .unwrap();
        let found = endpoints(&resolved.description, &ExampleSynthesizer::new());

        assert_eq!(
            render(&found),
            "method,path,operationId,tags,summary\n\
             GET,/items,list_items,\"items, public\",List items\n\
             POST,/items,,,\"Create \"\"item\"\"\"\n\
             GET,/health,,,\n"
        );
    }

    #[test]
    fn test_empty_index_has_header_only() {
        assert_eq!(render(&[]), "method,path,operationId,tags,summary\n");
    }
}
