use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

use super::lenient;
use super::schema::TypeDescription;

/// Verb keys accepted inside a path item; everything else (`parameters`, `summary`, ...) is skipped
pub const HTTP_METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

pub const DEFAULT_TITLE: &str = "API Guide";
pub const DEFAULT_VERSION: &str = "0.0.0";

/// Operations of one path keyed by lowercase HTTP verb, in document order
pub type PathItem = IndexMap<String, Operation>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiDescription {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional_text"
    )]
    pub openapi: Option<String>,

    #[serde(default, deserialize_with = "lenient::or_default")]
    pub info: Info,

    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "lenient::items"
    )]
    pub servers: Vec<Server>,

    #[serde(default, deserialize_with = "deserialize_paths")]
    pub paths: IndexMap<String, PathItem>,

    #[serde(
        default,
        skip_serializing_if = "Components::is_empty",
        deserialize_with = "lenient::or_default"
    )]
    pub components: Components,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Info {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional_text"
    )]
    pub title: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional_text"
    )]
    pub version: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional_text"
    )]
    pub description: Option<String>,
}

impl Info {
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(DEFAULT_TITLE)
    }

    pub fn version(&self) -> &str {
        self.version.as_deref().unwrap_or(DEFAULT_VERSION)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Server {
    #[serde(default, deserialize_with = "lenient::string")]
    pub url: String,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional_text"
    )]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional_text"
    )]
    pub summary: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional_text"
    )]
    pub description: Option<String>,

    #[serde(
        rename = "operationId",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional_text"
    )]
    pub operation_id: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "lenient::string_list"
    )]
    pub tags: Vec<String>,

    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "lenient::items"
    )]
    pub parameters: Vec<Parameter>,

    #[serde(
        rename = "requestBody",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional"
    )]
    pub request_body: Option<RequestBody>,

    #[serde(default, deserialize_with = "lenient::entries")]
    pub responses: IndexMap<String, Response>,

    /// Security requirements; presence of at least one entry means the call needs credentials
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional_list"
    )]
    pub security: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,

    #[serde(rename = "in", default, deserialize_with = "lenient::string")]
    pub location: String,

    #[serde(default, deserialize_with = "lenient::flag")]
    pub required: bool,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional_text"
    )]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<TypeDescription>,
}

impl Parameter {
    pub fn type_name(&self) -> &str {
        self.schema
            .as_ref()
            .and_then(TypeDescription::type_name)
            .unwrap_or("")
    }

    /// The schema's `default`; an explicit `null` is shown as no default
    pub fn default_value(&self) -> Option<&Value> {
        self.schema
            .as_ref()
            .and_then(|s| s.default.as_ref())
            .filter(|v| !v.is_null())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestBody {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional_text"
    )]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "lenient::flag")]
    pub required: bool,

    #[serde(default, deserialize_with = "lenient::entries")]
    pub content: IndexMap<String, MediaType>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<TypeDescription>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: String,

    #[serde(
        default,
        skip_serializing_if = "IndexMap::is_empty",
        deserialize_with = "lenient::entries"
    )]
    pub content: IndexMap<String, MediaType>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Components {
    #[serde(
        default,
        skip_serializing_if = "IndexMap::is_empty",
        deserialize_with = "lenient::entries"
    )]
    pub schemas: IndexMap<String, TypeDescription>,

    #[serde(
        rename = "securitySchemes",
        default,
        skip_serializing_if = "IndexMap::is_empty",
        deserialize_with = "lenient::entries"
    )]
    pub security_schemes: IndexMap<String, SecurityScheme>,
}

impl Components {
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty() && self.security_schemes.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecurityScheme {
    #[serde(rename = "type", default, deserialize_with = "lenient::string")]
    pub kind: String,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional_text"
    )]
    pub scheme: Option<String>,
}

impl ApiDescription {
    /// Number of (verb, path) pairs
    pub fn operation_count(&self) -> usize {
        self.paths.values().map(IndexMap::len).sum()
    }
}

/// Path items keyed by URL template. Non-verb keys are skipped, and so is a verb whose value
/// is not an operation object.
fn deserialize_paths<'de, D>(deserializer: D) -> Result<IndexMap<String, PathItem>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Object(raw) = Value::deserialize(deserializer)? else {
        return Ok(IndexMap::new());
    };
    let mut paths = IndexMap::with_capacity(raw.len());

    for (path, item) in raw {
        let Value::Object(entries) = item else {
            continue;
        };

        let mut operations = PathItem::new();
        for (method, operation) in entries {
            let method = method.to_ascii_lowercase();
            if !HTTP_METHODS.contains(&method.as_str()) {
                continue;
            }
            match serde_json::from_value::<Operation>(operation) {
                Ok(operation) => {
                    operations.insert(method, operation);
                }
                Err(e) => {
                    debug!(path = %path, method = %method, error = %e, "Skipping unreadable operation");
                }
            }
        }
        paths.insert(path, operations);
    }

    Ok(paths)
}
