//! Pure lookups over a resolved description

use regex::Regex;
use std::sync::OnceLock;

use crate::description::{ApiDescription, Operation, Response, TypeDescription};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

const JSON_MEDIA_TYPE: &str = "application/json";
const MULTIPART_MEDIA_TYPE: &str = "multipart/form-data";

/// First server URL without its trailing slash, or the local default
pub fn base_url(description: &ApiDescription) -> String {
    description
        .servers
        .first()
        .map(|server| server.url.trim_end_matches('/'))
        .filter(|url| !url.is_empty())
        .unwrap_or(DEFAULT_BASE_URL)
        .to_string()
}

pub fn requires_auth(operation: &Operation) -> bool {
    operation
        .security
        .as_ref()
        .map_or(false, |requirements| !requirements.is_empty())
}

/// JSON-bearing request body schema.
///
/// Media types are tried in a fixed priority: `application/json`, then any `+json` type,
/// then `multipart/form-data`. Entries without a schema are passed over.
pub fn request_body_schema(operation: &Operation) -> Option<&TypeDescription> {
    let content = &operation.request_body.as_ref()?.content;
    let schema_of = |media_type: &str| content.get(media_type).and_then(|m| m.schema.as_ref());

    schema_of(JSON_MEDIA_TYPE)
        .or_else(|| {
            content
                .iter()
                .filter(|(media_type, _)| media_type.ends_with("+json"))
                .find_map(|(_, media)| media.schema.as_ref())
        })
        .or_else(|| schema_of(MULTIPART_MEDIA_TYPE))
}

/// Schema of the first response, in document order, that carries `application/json`
pub fn response_schema(operation: &Operation) -> Option<&TypeDescription> {
    operation.responses.values().find_map(json_schema_of)
}

/// JSON schema of one response entry
pub fn json_schema_of(response: &Response) -> Option<&TypeDescription> {
    response
        .content
        .get(JSON_MEDIA_TYPE)
        .and_then(|media| media.schema.as_ref())
}

/// Replaces every run of characters outside `[A-Za-z0-9._-]` with `_`
pub fn sanitize_filename(name: &str) -> String {
    static UNSAFE: OnceLock<Regex> = OnceLock::new();
    let re = UNSAFE.get_or_init(|| Regex::new(r"[^a-zA-Z0-9._\-]+").expect("valid regex"));
    re.replace_all(name, "_").into_owned()
}
