//! Type Descriptions: JSON-Schema-like nodes describing the shape of a value.
//!
//! Nodes are kept self-contained as given; `$ref` and other keywords this crate does not
//! interpret are preserved in [`TypeDescription::extra`] so a node serializes back close to
//! its source form.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::lenient;

/// The `type` keyword, either a single tag or an OpenAPI 3.1 style union
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeTag {
    Single(String),
    Union(Vec<String>),
}

impl TypeTag {
    /// The tag that decides the node's shape; `null` members of a union are ignored
    pub fn primary(&self) -> Option<&str> {
        match self {
            TypeTag::Single(tag) => Some(tag.as_str()),
            TypeTag::Union(tags) => tags.iter().map(String::as_str).find(|t| *t != "null"),
        }
    }
}

/// A schema node.
///
/// Deserialization never fails: a boolean or other non-object node reads as the empty node, and
/// a keyword of the wrong JSON kind reads as absent. An explicit `default: null` is kept as
/// `Some(Value::Null)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TypeDescription {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_tag: Option<TypeTag>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    #[serde(rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, TypeDescription>>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<TypeDescription>>,

    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl<'de> Deserialize<'de> for TypeDescription {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Self::from_value(Value::deserialize(deserializer)?))
    }
}

/// Resolved shape of a [`TypeDescription`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SchemaShape<'a> {
    Object {
        properties: Option<&'a IndexMap<String, TypeDescription>>,
        required: &'a [String],
    },
    Array {
        items: Option<&'a TypeDescription>,
    },
    String {
        format: Option<&'a str>,
    },
    Integer,
    Number,
    Boolean,
    Untyped,
}

impl TypeDescription {
    /// Creates a node with only the `type` keyword set
    pub fn of_type(tag: &str) -> Self {
        Self {
            type_tag: Some(TypeTag::Single(tag.to_string())),
            ..Default::default()
        }
    }

    /// Resolves the node's shape.
    ///
    /// A node declaring `properties` is an object whatever its `type` says; only then is the
    /// literal tag consulted.
    pub fn shape(&self) -> SchemaShape<'_> {
        if let Some(properties) = &self.properties {
            return SchemaShape::Object {
                properties: Some(properties),
                required: &self.required,
            };
        }

        match self.type_name() {
            Some("object") => SchemaShape::Object {
                properties: None,
                required: &self.required,
            },
            Some("array") => SchemaShape::Array {
                items: self.items.as_deref(),
            },
            Some("string") => SchemaShape::String {
                format: self.format.as_deref(),
            },
            Some("integer") => SchemaShape::Integer,
            Some("number") => SchemaShape::Number,
            Some("boolean") => SchemaShape::Boolean,
            _ => SchemaShape::Untyped,
        }
    }

    /// Reads a node from raw JSON
    pub fn from_value(value: Value) -> Self {
        let Value::Object(map) = value else {
            return Self::default();
        };

        let mut node = Self::default();
        for (key, value) in map {
            match key.as_str() {
                "type" => node.type_tag = serde_json::from_value(value).ok(),
                "format" => node.format = lenient::text(value),
                "description" => node.description = lenient::text(value),
                "example" => node.example = Some(value).filter(|v| !v.is_null()),
                "default" => node.default = Some(value),
                "enum" => node.enum_values = lenient::values(value),
                "properties" => {
                    node.properties = match value {
                        Value::Object(properties) => Some(
                            properties
                                .into_iter()
                                .map(|(name, schema)| (name, Self::from_value(schema)))
                                .collect(),
                        ),
                        _ => None,
                    }
                }
                // `required: true` shows up on property nodes in hand-written documents
                "required" => node.required = lenient::names(value),
                "items" => {
                    node.items = match value {
                        Value::Null => None,
                        items => Some(Box::new(Self::from_value(items))),
                    }
                }
                _ => {
                    node.extra.insert(key, value);
                }
            }
        }
        node
    }

    /// The literal type tag, if any
    pub fn type_name(&self) -> Option<&str> {
        self.type_tag.as_ref().and_then(TypeTag::primary)
    }

    pub fn is_required(&self, property: &str) -> bool {
        self.required.iter().any(|name| name == property)
    }
}
