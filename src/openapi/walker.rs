//! Shape → schema conversion.
//!
//! # Responsibilities
//! - Turn a codec [`Shape`] into an OpenAPI schema
//! - Register deliberately named records once and refer to them by `$ref`
//! - Turn a response contract into a per-status `responses` object
//!
//! # Design Decisions
//! - The registry is plain mutable state threaded through the recursion;
//!   it only lives for one document build
//! - Unknown named wrappers fail the walk instead of guessing a schema
//! - Children are registered before their parents

use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;

use crate::codec::Shape;
use crate::route::{ResponseContract, ResponseMetadata};

use super::types::{MediaType, ResponseObject, SchemaObject, SchemaOrRef};

/// Documentation generation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct SchemaError(pub String);

impl SchemaError {
    fn new(message: impl Into<String>) -> Self {
        SchemaError(message.into())
    }
}

/// Named schemas collected during one walk.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: BTreeMap<String, SchemaObject>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&SchemaObject> {
        self.schemas.get(name)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// First registration of a name wins.
    fn register(&mut self, name: &str, schema: SchemaObject) {
        self.schemas.entry(name.to_string()).or_insert(schema);
    }

    pub fn into_schemas(self) -> BTreeMap<String, SchemaObject> {
        self.schemas
    }
}

const PRIMITIVE_NAMES: &[&str] = &[
    "string", "number", "integer", "boolean", "null", "undefined", "unknown", "Int",
];

/// Whether a shape name was chosen by the user rather than derived.
pub fn name_is_deliberate(name: &str) -> bool {
    !name.is_empty() && !name.contains('{') && !PRIMITIVE_NAMES.contains(&name)
}

/// Generic phrase for a status code's range.
pub fn status_description(code: u16) -> &'static str {
    match code {
        200..=299 => "Success",
        300..=399 => "Moved",
        400..=499 => "User error",
        500..=599 => "Internal error",
        _ => "",
    }
}

/// Describe a shape, returning a `$ref` for deliberately named records.
pub fn describe(shape: &Shape, registry: &mut SchemaRegistry) -> Result<SchemaOrRef, SchemaError> {
    if let Shape::Optional(inner) = shape {
        return describe(inner, registry);
    }
    match shape.name().filter(|name| name_is_deliberate(name)) {
        Some(name) => {
            if !registry.contains(name) {
                let schema = describe_inline(shape, registry)?;
                registry.register(name, schema);
            }
            Ok(SchemaOrRef::reference(name))
        }
        None => describe_inline(shape, registry).map(SchemaOrRef::from),
    }
}

/// Describe a shape without turning its own name into a reference.
/// Nested named records are still registered.
pub fn describe_inline(shape: &Shape, registry: &mut SchemaRegistry) -> Result<SchemaObject, SchemaError> {
    match shape {
        Shape::String => Ok(SchemaObject::typed("string")),
        Shape::Number => Ok(SchemaObject::typed("number")),
        Shape::Integer => Ok(SchemaObject::typed("integer")),
        Shape::Boolean => Ok(SchemaObject::typed("boolean")),
        Shape::Null => Ok(nullable_object()),
        Shape::Unknown => Ok(SchemaObject::typed("object")),
        Shape::Literal(value) => describe_literal(value),
        Shape::Array(item) => Ok(SchemaObject {
            items: Some(Box::new(describe(item, registry)?)),
            ..SchemaObject::typed("array")
        }),
        Shape::Record { .. } | Shape::Partial { .. } | Shape::Intersection { .. } => {
            describe_object(shape, registry)
        }
        Shape::Optional(inner) => describe_inline(inner, registry),
        Shape::Union(members) => describe_union(members, registry),
        Shape::KeyOf(keys) => Ok(string_enum(keys.clone())),
        Shape::Named(name) => describe_named(name),
    }
}

fn nullable_object() -> SchemaObject {
    SchemaObject {
        nullable: Some(true),
        ..SchemaObject::typed("object")
    }
}

fn string_enum(values: Vec<String>) -> SchemaObject {
    SchemaObject {
        enum_values: Some(values),
        ..SchemaObject::typed("string")
    }
}

fn describe_literal(value: &Value) -> Result<SchemaObject, SchemaError> {
    match value {
        Value::String(_) => Ok(SchemaObject::typed("string").with_example(value.clone())),
        Value::Number(n) => Ok(SchemaObject::typed("number").with_example(n.to_string())),
        Value::Bool(b) => Ok(SchemaObject::typed("boolean").with_example(b.to_string())),
        Value::Null => Ok(nullable_object()),
        other => Err(SchemaError::new(format!("unsupported literal value {other}"))),
    }
}

fn is_object_like(shape: &Shape) -> bool {
    match shape {
        Shape::Record { .. } | Shape::Partial { .. } => true,
        Shape::Intersection { members, .. } => members.iter().all(is_object_like),
        _ => false,
    }
}

fn describe_object(shape: &Shape, registry: &mut SchemaRegistry) -> Result<SchemaObject, SchemaError> {
    if let Shape::Intersection { members, .. } = shape {
        if let Some(member) = members.iter().find(|m| !is_object_like(m)) {
            return Err(SchemaError::new(format!(
                "cannot flatten {} into an intersection of records",
                member.kind()
            )));
        }
    }

    let mut properties = BTreeMap::new();
    let mut required: Vec<String> = Vec::new();
    for field in shape.declared_fields() {
        properties.insert(field.name.to_string(), describe(field.shape, registry)?);
        if field.required && !required.iter().any(|r| r == field.name) {
            required.push(field.name.to_string());
        }
    }

    Ok(SchemaObject {
        properties: Some(properties),
        required,
        ..SchemaObject::typed("object")
    })
}

/// Literals of one primitive kind collapse into a string enum.
fn literal_enum(members: &[Shape]) -> Option<Vec<String>> {
    let literals: Vec<&Value> = members
        .iter()
        .map(|m| match m {
            Shape::Literal(value) => Some(value),
            _ => None,
        })
        .collect::<Option<_>>()?;

    let same_kind = literals.iter().all(|v| v.is_string())
        || literals.iter().all(|v| v.is_number())
        || literals.iter().all(|v| v.is_boolean());
    if literals.is_empty() || !same_kind {
        return None;
    }

    Some(
        literals
            .into_iter()
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
    )
}

fn describe_union(members: &[Shape], registry: &mut SchemaRegistry) -> Result<SchemaObject, SchemaError> {
    if let Some(values) = literal_enum(members) {
        return Ok(string_enum(values));
    }
    let one_of = members
        .iter()
        .map(|m| describe(m, registry))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(SchemaObject {
        one_of: Some(one_of),
        ..SchemaObject::typed("object")
    })
}

fn describe_named(name: &str) -> Result<SchemaObject, SchemaError> {
    match name {
        "NumberFromString" => Ok(SchemaObject::typed("number")),
        "IntFromString" | "Int" => Ok(SchemaObject::typed("integer")),
        "BooleanFromString" => Ok(SchemaObject::typed("boolean")),
        "DateFromISOString" => Ok(SchemaObject::typed("string").with_format("date-time")),
        "Date" => Ok(SchemaObject::typed("string").with_format("date")),
        "UUID" => Ok(SchemaObject::typed("string").with_format("uuid")),
        "NonEmptyString" => Ok(SchemaObject::typed("string")),
        other => Err(SchemaError::new(format!("no schema known for type {other}"))),
    }
}

/// Split a response shape into `(code, data shapes)`, grouping repeated codes.
fn response_branches(shape: &Shape) -> Result<Vec<(u16, Vec<&Shape>)>, SchemaError> {
    let members: Vec<&Shape> = match shape {
        Shape::Union(members) => members.iter().collect(),
        other => vec![other],
    };

    let mut grouped: Vec<(u16, Vec<&Shape>)> = Vec::new();
    for member in members {
        let fields = match member {
            Shape::Record { fields, .. } => fields,
            other => {
                return Err(SchemaError::new(format!(
                    "response must be a record of code and data, got {}",
                    other.kind()
                )))
            }
        };
        let field = |key: &str| fields.iter().find(|(k, _)| k == key).map(|(_, s)| s);

        let code = match field("code") {
            Some(Shape::Literal(value)) => value
                .as_u64()
                .and_then(|c| u16::try_from(c).ok())
                .ok_or_else(|| SchemaError::new(format!("invalid status code {value}")))?,
            _ => return Err(SchemaError::new("response is missing a literal status code")),
        };
        let data = field("data").ok_or_else(|| SchemaError::new("response is missing data"))?;

        match grouped.iter_mut().find(|(c, _)| *c == code) {
            Some((_, shapes)) => shapes.push(data),
            None => grouped.push((code, vec![data])),
        }
    }
    Ok(grouped)
}

/// Describe every branch of a response contract.
///
/// Each body is registered under the metadata's schema name, else its own
/// deliberate name, else `<fallback_prefix><code>`, and referenced by `$ref`.
pub fn describe_responses(
    contract: &ResponseContract,
    fallback_prefix: &str,
    registry: &mut SchemaRegistry,
) -> Result<BTreeMap<String, ResponseObject>, SchemaError> {
    let Some(shape) = contract.shape() else {
        return Ok(BTreeMap::new());
    };
    let empty = BTreeMap::new();
    let metadata = contract.metadata().unwrap_or(&empty);

    let mut responses = BTreeMap::new();
    for (code, shapes) in response_branches(&shape)? {
        let data = match shapes.as_slice() {
            [single] => (*single).clone(),
            many => Shape::Union(many.iter().map(|s| (*s).clone()).collect()),
        };
        let meta = metadata.get(&code).cloned().unwrap_or_default();

        let schema_name = meta
            .schema_name
            .clone()
            .or_else(|| data.name().filter(|n| name_is_deliberate(n)).map(str::to_string))
            .unwrap_or_else(|| format!("{fallback_prefix}{code}"));

        if !registry.contains(&schema_name) {
            let schema = describe_inline(&data, registry)?;
            registry.register(&schema_name, schema);
        }

        let description = meta
            .description
            .clone()
            .unwrap_or_else(|| status_description(code).to_string());
        responses.insert(
            code.to_string(),
            ResponseObject {
                description,
                content: Some(MediaType::json(SchemaOrRef::reference(&schema_name), meta.example)),
            },
        );
    }
    Ok(responses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{self, Codec};
    use serde_json::json;

    fn walk(codec: codec::SharedCodec) -> Value {
        let mut registry = SchemaRegistry::new();
        let schema = describe(&codec.shape(), &mut registry).unwrap();
        serde_json::to_value(schema).unwrap()
    }

    fn user() -> codec::SharedCodec {
        codec::named_record(
            "User",
            [
                ("userId", codec::number()),
                ("firstName", codec::string()),
                ("surname", codec::string()),
            ],
        )
    }

    #[test]
    fn test_primitives() {
        assert_eq!(walk(codec::string()), json!({"type": "string"}));
        assert_eq!(walk(codec::boolean()), json!({"type": "boolean"}));
        assert_eq!(walk(codec::number()), json!({"type": "number"}));
        assert_eq!(walk(codec::int()), json!({"type": "integer"}));
        assert_eq!(walk(codec::null()), json!({"type": "object", "nullable": true}));
        assert_eq!(walk(codec::unknown()), json!({"type": "object"}));
    }

    #[test]
    fn test_array_and_record() {
        assert_eq!(
            walk(codec::array(codec::string())),
            json!({"type": "array", "items": {"type": "string"}})
        );
        assert_eq!(
            walk(codec::record([("one", codec::string()), ("two", codec::number())])),
            json!({
                "type": "object",
                "properties": {"one": {"type": "string"}, "two": {"type": "number"}},
                "required": ["one", "two"]
            })
        );
    }

    #[test]
    fn test_literals() {
        assert_eq!(walk(codec::literal("OK")), json!({"type": "string", "example": "OK"}));
        assert_eq!(walk(codec::literal(123)), json!({"type": "number", "example": "123"}));
        assert_eq!(walk(codec::literal(true)), json!({"type": "boolean", "example": "true"}));
    }

    #[test]
    fn test_literal_unions_become_enums() {
        let strings = codec::union([codec::literal("Horse"), codec::literal("Course")]);
        assert_eq!(walk(strings), json!({"type": "string", "enum": ["Horse", "Course"]}));

        let numbers = codec::union([codec::literal(1), codec::literal(2), codec::literal(3)]);
        assert_eq!(walk(numbers), json!({"type": "string", "enum": ["1", "2", "3"]}));

        let bools = codec::union([codec::literal(true), codec::literal(false)]);
        assert_eq!(walk(bools), json!({"type": "string", "enum": ["true", "false"]}));

        let keys = codec::keyof(["Horse", "Course", "Morse"]);
        assert_eq!(walk(keys), json!({"type": "string", "enum": ["Horse", "Course", "Morse"]}));
    }

    #[test]
    fn test_mixed_union_uses_one_of() {
        let union = codec::union([codec::string(), codec::number()]);
        assert_eq!(
            walk(union),
            json!({"type": "object", "oneOf": [{"type": "string"}, {"type": "number"}]})
        );
        let mixed = codec::union([codec::literal("a"), codec::literal(1)]);
        assert!(walk(mixed).get("oneOf").is_some());
    }

    #[test]
    fn test_intersection_flattens_required_fields() {
        let failure = codec::named_intersection(
            "InfoFailure",
            [
                codec::record([("errorMsg", codec::string())]),
                codec::partial([("optionalStuff", codec::string())]),
            ],
        );
        let mut registry = SchemaRegistry::new();
        let schema = describe(&failure.shape(), &mut registry).unwrap();
        assert_eq!(schema, SchemaOrRef::reference("InfoFailure"));
        assert_eq!(
            serde_json::to_value(registry.get("InfoFailure")).unwrap(),
            json!({
                "type": "object",
                "properties": {"errorMsg": {"type": "string"}, "optionalStuff": {"type": "string"}},
                "required": ["errorMsg"]
            })
        );
    }

    #[test]
    fn test_intersection_of_non_records_fails() {
        let shape = Shape::Intersection {
            name: None,
            members: vec![Shape::String, Shape::Number],
        };
        assert!(describe(&shape, &mut SchemaRegistry::new()).is_err());
    }

    #[test]
    fn test_named_wrappers() {
        assert_eq!(walk(codec::number_from_string()), json!({"type": "number"}));
        assert_eq!(walk(codec::int_from_string()), json!({"type": "integer"}));
        assert_eq!(walk(codec::boolean_from_string()), json!({"type": "boolean"}));
        assert_eq!(
            walk(codec::date_from_iso_string()),
            json!({"type": "string", "format": "date-time"})
        );
        assert_eq!(walk(codec::uuid()), json!({"type": "string", "format": "uuid"}));
        assert_eq!(walk(codec::non_empty_string()), json!({"type": "string"}));
    }

    #[test]
    fn test_unknown_named_wrapper_fails() {
        let err = describe(&Shape::Named("RegExp".into()), &mut SchemaRegistry::new()).unwrap_err();
        assert_eq!(err.to_string(), "no schema known for type RegExp");
    }

    #[test]
    fn test_named_records_are_registered_once() {
        let success = codec::named_record(
            "UserSuccess",
            [("message", codec::string()), ("users", codec::array(user()))],
        );
        let mut registry = SchemaRegistry::new();
        let first = describe(&success.shape(), &mut registry).unwrap();
        let second = describe(&success.shape(), &mut registry).unwrap();

        assert_eq!(first, SchemaOrRef::reference("UserSuccess"));
        assert_eq!(first, second);
        assert_eq!(registry.len(), 2);
        assert_eq!(
            serde_json::to_value(registry.get("UserSuccess")).unwrap()["properties"]["users"],
            json!({"type": "array", "items": {"$ref": "#/components/schemas/User"}})
        );
    }

    #[test]
    fn test_optional_named_record_is_still_referenced() {
        let shape = codec::record([("owner", codec::optional(user())), ("creator", user())]).shape();
        let mut registry = SchemaRegistry::new();
        let schema = serde_json::to_value(describe(&shape, &mut registry).unwrap()).unwrap();

        let reference = json!({"$ref": "#/components/schemas/User"});
        assert_eq!(schema["properties"]["owner"], reference);
        assert_eq!(schema["properties"]["creator"], reference);
        assert_eq!(schema["required"], json!(["creator"]));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_primitive_names_are_not_deliberate() {
        assert!(name_is_deliberate("User"));
        assert!(!name_is_deliberate("string"));
        assert!(!name_is_deliberate("{ id: number }"));
        assert!(!name_is_deliberate(""));
    }

    #[test]
    fn test_status_descriptions() {
        assert_eq!(status_description(204), "Success");
        assert_eq!(status_description(301), "Moved");
        assert_eq!(status_description(404), "User error");
        assert_eq!(status_description(503), "Internal error");
        assert_eq!(status_description(99), "");
    }

    #[test]
    fn test_responses_use_metadata_name_and_description() {
        let contract = ResponseContract::with_metadata(
            200,
            codec::literal("OK"),
            ResponseMetadata::new()
                .description("Successful OK great")
                .schema_name("Healthz"),
        );
        let mut registry = SchemaRegistry::new();
        let responses = describe_responses(&contract, "GetHealthz", &mut registry).unwrap();

        assert_eq!(
            serde_json::to_value(&responses).unwrap(),
            json!({
                "200": {
                    "description": "Successful OK great",
                    "content": {"application/json": {"schema": {"$ref": "#/components/schemas/Healthz"}}}
                }
            })
        );
        assert_eq!(
            serde_json::to_value(registry.get("Healthz")).unwrap(),
            json!({"type": "string", "example": "OK"})
        );
    }

    #[test]
    fn test_responses_fall_back_to_shape_name_then_prefix() {
        let contract = ResponseContract::new(200, user())
            .or(ResponseContract::new(404, codec::string()));
        let mut registry = SchemaRegistry::new();
        let responses = describe_responses(&contract, "GetUserId", &mut registry).unwrap();

        assert_eq!(responses["200"].description, "Success");
        assert_eq!(responses["404"].description, "User error");
        assert!(registry.contains("User"));
        assert!(registry.contains("GetUserId404"));
    }

    #[test]
    fn test_shared_response_schema_is_deduplicated() {
        let contract = ResponseContract::new(200, user()).or(ResponseContract::new(201, user()));
        let mut registry = SchemaRegistry::new();
        let responses = describe_responses(&contract, "PostUser", &mut registry).unwrap();

        assert_eq!(registry.len(), 1);
        let reference = json!({"$ref": "#/components/schemas/User"});
        for code in ["200", "201"] {
            let body = serde_json::to_value(&responses[code]).unwrap();
            assert_eq!(body["content"]["application/json"]["schema"], reference);
        }
    }

    #[test]
    fn test_repeated_code_becomes_union() {
        let contract = ResponseContract::with_metadata(
            200,
            codec::string(),
            ResponseMetadata::new().schema_name("InfoSuccess"),
        )
        .or(ResponseContract::new(200, codec::number()));
        let mut registry = SchemaRegistry::new();
        describe_responses(&contract, "PostInfo", &mut registry).unwrap();
        assert_eq!(
            serde_json::to_value(registry.get("InfoSuccess")).unwrap(),
            json!({"type": "object", "oneOf": [{"type": "string"}, {"type": "number"}]})
        );
    }
}
