//! Example synthesis: turns a [`TypeDescription`] into a representative JSON value.
//!
//! Resolution order, first match wins: explicit `example`, first `enum` member, then a
//! shape-specific placeholder (honouring `default` for primitives). Object properties listed
//! in `required` never come out as null. The output is fully deterministic so regenerated
//! documentation is byte-identical for an unchanged description.

use serde_json::{json, Map, Value};

use crate::description::{SchemaShape, TypeDescription};

pub const DATE_TIME_EXAMPLE: &str = "2025-01-01T00:00:00Z";
pub const EMAIL_EXAMPLE: &str = "user@example.com";
pub const UUID_EXAMPLE: &str = "00000000-0000-0000-0000-000000000000";
pub const STRING_EXAMPLE: &str = "string";
pub const INTEGER_EXAMPLE: i64 = 123;
pub const NUMBER_EXAMPLE: f64 = 1.23;

/// Nesting bound; self-referencing or pathologically deep schemas degrade to null past it
pub const DEFAULT_MAX_DEPTH: usize = 32;

#[derive(Debug, Clone, Copy)]
pub struct ExampleSynthesizer {
    max_depth: usize,
}

impl Default for ExampleSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

impl ExampleSynthesizer {
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Synthesizes an example; `Value::Null` means no confident example exists
    pub fn synthesize(&self, schema: &TypeDescription) -> Value {
        self.synthesize_at(schema, 0)
    }

    fn synthesize_at(&self, schema: &TypeDescription, depth: usize) -> Value {
        if depth > self.max_depth {
            return Value::Null;
        }

        if let Some(example) = &schema.example {
            return example.clone();
        }

        if let Some(first) = schema.enum_values.first() {
            return first.clone();
        }

        match schema.shape() {
            SchemaShape::String { format } => match format {
                Some("date-time") => json!(DATE_TIME_EXAMPLE),
                Some("email") => json!(EMAIL_EXAMPLE),
                Some("uuid") => json!(UUID_EXAMPLE),
                _ => default_or(schema, json!(STRING_EXAMPLE)),
            },
            SchemaShape::Integer => default_or(schema, json!(INTEGER_EXAMPLE)),
            SchemaShape::Number => default_or(schema, json!(NUMBER_EXAMPLE)),
            SchemaShape::Boolean => default_or(schema, Value::Bool(true)),
            SchemaShape::Array { items } => {
                let element = match items {
                    Some(items) => self.synthesize_at(items, depth + 1),
                    None => self.synthesize_at(&TypeDescription::default(), depth + 1),
                };
                Value::Array(vec![element])
            }
            SchemaShape::Object {
                properties,
                required,
            } => {
                let mut object = Map::new();
                for (name, property) in properties.into_iter().flatten() {
                    let mut value = self.synthesize_at(property, depth + 1);
                    if value.is_null() && required.iter().any(|r| r == name) {
                        value = json!(STRING_EXAMPLE);
                    }
                    object.insert(name.clone(), value);
                }
                Value::Object(object)
            }
            SchemaShape::Untyped => schema.default.clone().unwrap_or(Value::Null),
        }
    }
}

fn default_or(schema: &TypeDescription, fallback: Value) -> Value {
    schema.default.clone().unwrap_or(fallback)
}

/// Synthesizes with the default depth bound
pub fn synthesize(schema: &TypeDescription) -> Value {
    ExampleSynthesizer::new().synthesize(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use yare::parameterized;

    fn schema(value: Value) -> TypeDescription {
        serde_json::from_value(value).unwrap()
    }

    #[parameterized(
        explicit_example = { json!({"type": "integer", "example": 7}), json!(7) },
        example_beats_enum = { json!({"enum": ["a"], "example": "z"}), json!("z") },
        enum_first = { json!({"type": "string", "enum": ["a", "b"]}), json!("a") },
        date_time = { json!({"type": "string", "format": "date-time"}), json!(DATE_TIME_EXAMPLE) },
        email = { json!({"type": "string", "format": "email"}), json!(EMAIL_EXAMPLE) },
        uuid = { json!({"type": "string", "format": "uuid"}), json!(UUID_EXAMPLE) },
        format_beats_default = { json!({"type": "string", "format": "uuid", "default": "x"}), json!(UUID_EXAMPLE) },
        string_default = { json!({"type": "string", "default": "hello"}), json!("hello") },
        plain_string = { json!({"type": "string"}), json!("string") },
        integer = { json!({"type": "integer"}), json!(123) },
        integer_default = { json!({"type": "integer", "default": 5}), json!(5) },
        integer_null_default = { json!({"type": "integer", "default": null}), Value::Null },
        number = { json!({"type": "number"}), json!(1.23) },
        boolean = { json!({"type": "boolean"}), json!(true) },
        boolean_default = { json!({"type": "boolean", "default": false}), json!(false) },
        untyped = { json!({}), Value::Null },
        untyped_default = { json!({"default": {"k": 1}}), json!({"k": 1}) },
        unknown_type = { json!({"type": "file"}), Value::Null },
        empty_object = { json!({"type": "object"}), json!({}) },
    )]
    fn test_resolution_order(input: Value, expected: Value) {
        assert_eq!(synthesize(&schema(input)), expected);
    }

    #[test]
    fn test_array_wraps_items_example() {
        let node = schema(json!({"type": "array", "items": {"type": "string", "format": "email"}}));
        assert_eq!(synthesize(&node), json!([EMAIL_EXAMPLE]));
    }

    #[test]
    fn test_array_without_items() {
        let node = schema(json!({"type": "array"}));
        assert_eq!(synthesize(&node), json!([null]));
    }

    #[test]
    fn test_object_example() {
        let node = schema(json!({
            "type": "object",
            "properties": {"id": {"type": "integer"}},
            "required": ["id"]
        }));
        assert_eq!(synthesize(&node), json!({"id": 123}));
    }

    #[test]
    fn test_required_property_never_null() {
        let node = schema(json!({
            "properties": {
                "anything": {},
                "optional": {}
            },
            "required": ["anything"]
        }));

        assert_eq!(
            synthesize(&node),
            json!({"anything": "string", "optional": null})
        );
    }

    #[test]
    fn test_nested_objects_keep_property_order() {
        let node = schema(json!({
            "type": "object",
            "properties": {
                "zeta": {"type": "boolean"},
                "alpha": {
                    "type": "object",
                    "properties": {"tags": {"type": "array", "items": {"type": "string"}}}
                }
            }
        }));

        let rendered = serde_json::to_string(&synthesize(&node)).unwrap();
        assert_eq!(rendered, r#"{"zeta":true,"alpha":{"tags":["string"]}}"#);
    }

    #[test]
    fn test_depth_bound_degrades_to_null() {
        let mut node = TypeDescription::of_type("integer");
        for _ in 0..5 {
            node = TypeDescription {
                items: Some(Box::new(node)),
                ..TypeDescription::of_type("array")
            };
        }

        let shallow = ExampleSynthesizer::with_max_depth(2);
        assert_eq!(shallow.synthesize(&node), json!([[[null]]]));

        let deep = ExampleSynthesizer::with_max_depth(10);
        assert_eq!(deep.synthesize(&node), json!([[[[[123]]]]]));
    }

    #[test]
    fn test_required_property_past_depth_bound_is_placeholder() {
        let node = schema(json!({
            "type": "object",
            "properties": {"inner": {"type": "integer"}},
            "required": ["inner"]
        }));

        let synthesizer = ExampleSynthesizer::with_max_depth(0);
        assert_eq!(synthesizer.synthesize(&node), json!({"inner": "string"}));
    }

    #[test]
    fn test_synthesis_is_deterministic() {
        let node = schema(json!({
            "type": "object",
            "properties": {
                "id": {"type": "string", "format": "uuid"},
                "created": {"type": "string", "format": "date-time"},
                "score": {"type": "number"}
            }
        }));
        assert_eq!(synthesize(&node), synthesize(&node));
    }
}
