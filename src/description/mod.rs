//! The API Description: a typed view over an OpenAPI-shaped document.
//!
//! Only the parts the generator reads are modelled. The document as received is kept next to
//! the typed view in [`ResolvedDescription`] so snapshots and the schema catalog can be written
//! without losing keys the model does not know about.

pub mod lenient;
pub mod model;
pub mod schema;

pub use model::{
    ApiDescription, Components, Info, MediaType, Operation, Parameter, PathItem, RequestBody,
    Response, SecurityScheme, Server, HTTP_METHODS,
};
pub use schema::{SchemaShape, TypeDescription, TypeTag};

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DescriptionError {
    #[error("API description must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("Malformed API description: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// A typed description together with the JSON document it was read from
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedDescription {
    pub description: ApiDescription,
    pub raw: Value,
}

impl ResolvedDescription {
    pub fn from_value(raw: Value) -> Result<Self, DescriptionError> {
        if !raw.is_object() {
            return Err(DescriptionError::NotAnObject(json_kind(&raw)));
        }
        let description = serde_json::from_value(raw.clone())?;
        Ok(Self { description, raw })
    }

    pub fn from_description(description: ApiDescription) -> Result<Self, DescriptionError> {
        let raw = serde_json::to_value(&description)?;
        Ok(Self { description, raw })
    }

    /// A document with no keys at all carries nothing to document
    pub fn is_empty(&self) -> bool {
        self.raw.as_object().map_or(true, |map| map.is_empty())
    }

    /// The named component schema exactly as it appeared in the source document
    pub fn raw_schema(&self, name: &str) -> Option<&Value> {
        self.raw
            .get("components")
            .and_then(|c| c.get("schemas"))
            .and_then(|s| s.get(name))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
