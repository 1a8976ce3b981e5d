//! Leaf codecs: JSON primitives, literals and well-known string wrappers.

use serde_json::{Number, Value};

use super::{Codec, FieldError, Shape};

/// Plain JSON primitive kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    String,
    Number,
    Integer,
    Boolean,
    Null,
    Unknown,
}

fn is_integer(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0),
        _ => false,
    }
}

impl Codec for Primitive {
    fn decode(&self, raw: &Value) -> Result<Value, Vec<FieldError>> {
        let ok = match self {
            Primitive::String => raw.is_string(),
            Primitive::Number => raw.is_number(),
            Primitive::Integer => is_integer(raw),
            Primitive::Boolean => raw.is_boolean(),
            Primitive::Null => raw.is_null(),
            Primitive::Unknown => true,
        };
        if ok {
            Ok(raw.clone())
        } else {
            Err(vec![FieldError::expected(self.label(), raw)])
        }
    }

    fn shape(&self) -> Shape {
        match self {
            Primitive::String => Shape::String,
            Primitive::Number => Shape::Number,
            Primitive::Integer => Shape::Integer,
            Primitive::Boolean => Shape::Boolean,
            Primitive::Null => Shape::Null,
            Primitive::Unknown => Shape::Unknown,
        }
    }
}

impl Primitive {
    fn label(&self) -> &'static str {
        match self {
            Primitive::String => "string",
            Primitive::Number => "number",
            Primitive::Integer => "integer",
            Primitive::Boolean => "boolean",
            Primitive::Null => "null",
            Primitive::Unknown => "anything",
        }
    }
}

/// Accepts exactly one value.
#[derive(Debug, Clone, PartialEq)]
pub struct LiteralCodec {
    value: Value,
}

impl LiteralCodec {
    pub fn new(value: Value) -> Self {
        Self { value }
    }
}

impl Codec for LiteralCodec {
    fn decode(&self, raw: &Value) -> Result<Value, Vec<FieldError>> {
        if *raw == self.value {
            Ok(raw.clone())
        } else {
            Err(vec![FieldError::expected(&format!("literal {}", self.value), raw)])
        }
    }

    fn shape(&self) -> Shape {
        Shape::Literal(self.value.clone())
    }
}

/// Wrappers that parse a string into a richer value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WellKnown {
    NumberFromString,
    IntFromString,
    BooleanFromString,
    DateFromIsoString,
    Uuid,
    NonEmptyString,
}

impl WellKnown {
    /// Name recorded in the shape descriptor.
    pub fn name(&self) -> &'static str {
        match self {
            WellKnown::NumberFromString => "NumberFromString",
            WellKnown::IntFromString => "IntFromString",
            WellKnown::BooleanFromString => "BooleanFromString",
            WellKnown::DateFromIsoString => "DateFromISOString",
            WellKnown::Uuid => "UUID",
            WellKnown::NonEmptyString => "NonEmptyString",
        }
    }

    fn parse(&self, text: &str) -> Option<Value> {
        match self {
            WellKnown::NumberFromString => parse_number(text),
            WellKnown::IntFromString => text.trim().parse::<i64>().ok().map(Value::from),
            WellKnown::BooleanFromString => match text {
                "true" => Some(Value::Bool(true)),
                "false" => Some(Value::Bool(false)),
                _ => None,
            },
            WellKnown::DateFromIsoString => chrono::DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| Value::String(dt.to_rfc3339())),
            WellKnown::Uuid => uuid::Uuid::parse_str(text)
                .ok()
                .map(|id| Value::String(id.hyphenated().to_string())),
            WellKnown::NonEmptyString => (!text.is_empty()).then(|| Value::String(text.to_string())),
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            WellKnown::NumberFromString => "a numeric string",
            WellKnown::IntFromString => "an integer string",
            WellKnown::BooleanFromString => "\"true\" or \"false\"",
            WellKnown::DateFromIsoString => "an RFC 3339 timestamp",
            WellKnown::Uuid => "a UUID",
            WellKnown::NonEmptyString => "a non-empty string",
        }
    }
}

// Integers stay integers so that `"1"` decodes to `1`, not `1.0`.
fn parse_number(text: &str) -> Option<Value> {
    let text = text.trim();
    if let Ok(i) = text.parse::<i64>() {
        return Some(Value::from(i));
    }
    text.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
}

impl Codec for WellKnown {
    fn decode(&self, raw: &Value) -> Result<Value, Vec<FieldError>> {
        raw.as_str()
            .and_then(|text| self.parse(text))
            .ok_or_else(|| vec![FieldError::expected(self.describe(), raw)])
    }

    fn is(&self, value: &Value) -> bool {
        match self {
            WellKnown::NumberFromString => value.is_number(),
            WellKnown::IntFromString => is_integer(value),
            WellKnown::BooleanFromString => value.is_boolean(),
            _ => self.decode(value).is_ok(),
        }
    }

    fn encode(&self, value: &Value) -> Value {
        match (self, value) {
            (WellKnown::NumberFromString | WellKnown::IntFromString, Value::Number(n)) => {
                Value::String(n.to_string())
            }
            (WellKnown::BooleanFromString, Value::Bool(b)) => Value::String(b.to_string()),
            _ => value.clone(),
        }
    }

    fn shape(&self) -> Shape {
        Shape::Named(self.name().to_string())
    }
}
