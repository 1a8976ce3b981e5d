//! Validator collaborator.
//!
//! # Data Flow
//! ```text
//! raw JSON value (path segment map, query map, header map, body)
//!     → Codec::decode   (untyped → typed, or field errors)
//!     → typed JSON value handed to the route handler
//!
//! typed reply data
//!     → Codec::is       (pick the matching response branch)
//!     → Codec::encode   (typed → wire)
//! ```
//!
//! # Design Decisions
//! - Decoding never panics: every failure is a `FieldError` with a dotted path
//! - Typed values are still `serde_json::Value`; handlers deserialize them
//!   into their own structs
//! - `Codec::shape` is the only thing the router core inspects

pub mod composite;
pub mod primitive;
pub mod shape;

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

pub use composite::{ArrayCodec, IntersectionCodec, KeyOfCodec, OptionalCodec, RecordCodec, UnionCodec};
pub use primitive::{LiteralCodec, Primitive, WellKnown};
pub use shape::{DeclaredField, Shape};

/// A decode function paired with a description of what it accepts.
pub trait Codec: Send + Sync + fmt::Debug {
    /// Turn an untyped input into a typed value.
    fn decode(&self, raw: &Value) -> Result<Value, Vec<FieldError>>;

    /// Whether an already-typed value belongs to this codec.
    fn is(&self, value: &Value) -> bool {
        self.decode(value).is_ok()
    }

    /// Turn a typed value back into its wire form.
    fn encode(&self, value: &Value) -> Value {
        value.clone()
    }

    fn shape(&self) -> Shape;
}

/// Codecs are shared between routes and across request tasks.
pub type SharedCodec = Arc<dyn Codec>;

/// One decoding failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Dotted location of the failing value, empty for the root.
    pub path: String,
    pub message: String,
}

impl FieldError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            path: String::new(),
            message: message.into(),
        }
    }

    /// Error for a value that is not of the expected kind.
    pub fn expected(what: &str, got: &Value) -> Self {
        Self::new(format!("expected {what}, got {got}"))
    }

    /// Prefix the path with an enclosing key or index.
    pub fn within(mut self, segment: &str) -> Self {
        self.path = if self.path.is_empty() {
            segment.to_string()
        } else {
            format!("{segment}.{}", self.path)
        };
        self
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Merge the outputs of several decoders that ran on the same input.
///
/// Objects are unioned field by field, later outputs winning on shared keys.
/// Any non-object output replaces what came before it.
pub(crate) fn merge_decoded(outputs: Vec<Value>) -> Value {
    outputs
        .into_iter()
        .reduce(|acc, next| match (acc, next) {
            (Value::Object(mut left), Value::Object(right)) => {
                left.extend(right);
                Value::Object(left)
            }
            (_, next) => next,
        })
        .unwrap_or_else(|| Value::Object(Default::default()))
}

pub fn string() -> SharedCodec {
    Arc::new(Primitive::String)
}

pub fn number() -> SharedCodec {
    Arc::new(Primitive::Number)
}

pub fn integer() -> SharedCodec {
    Arc::new(Primitive::Integer)
}

/// Alias of [`integer`].
pub fn int() -> SharedCodec {
    integer()
}

pub fn boolean() -> SharedCodec {
    Arc::new(Primitive::Boolean)
}

pub fn null() -> SharedCodec {
    Arc::new(Primitive::Null)
}

/// Accepts anything.
pub fn unknown() -> SharedCodec {
    Arc::new(Primitive::Unknown)
}

pub fn literal(value: impl Into<Value>) -> SharedCodec {
    Arc::new(LiteralCodec::new(value.into()))
}

pub fn array(item: SharedCodec) -> SharedCodec {
    Arc::new(ArrayCodec::new(item))
}

/// Array that must hold at least one element.
pub fn non_empty_array(item: SharedCodec) -> SharedCodec {
    Arc::new(ArrayCodec::non_empty(item))
}

/// Anonymous record; every field is required unless wrapped in [`optional`].
pub fn record<K, I>(fields: I) -> SharedCodec
where
    K: Into<String>,
    I: IntoIterator<Item = (K, SharedCodec)>,
{
    Arc::new(RecordCodec::new(None, fields, false))
}

/// Record registered under `name` in generated documentation.
pub fn named_record<K, I>(name: impl Into<String>, fields: I) -> SharedCodec
where
    K: Into<String>,
    I: IntoIterator<Item = (K, SharedCodec)>,
{
    Arc::new(RecordCodec::new(Some(name.into()), fields, false))
}

/// Record whose fields may all be missing.
pub fn partial<K, I>(fields: I) -> SharedCodec
where
    K: Into<String>,
    I: IntoIterator<Item = (K, SharedCodec)>,
{
    Arc::new(RecordCodec::new(None, fields, true))
}

pub fn optional(inner: SharedCodec) -> SharedCodec {
    Arc::new(OptionalCodec::new(inner))
}

pub fn union(members: impl IntoIterator<Item = SharedCodec>) -> SharedCodec {
    Arc::new(UnionCodec::new(members.into_iter().collect()))
}

pub fn intersection(members: impl IntoIterator<Item = SharedCodec>) -> SharedCodec {
    Arc::new(IntersectionCodec::new(None, members.into_iter().collect()))
}

pub fn named_intersection(
    name: impl Into<String>,
    members: impl IntoIterator<Item = SharedCodec>,
) -> SharedCodec {
    Arc::new(IntersectionCodec::new(Some(name.into()), members.into_iter().collect()))
}

/// One of a fixed set of string keys.
pub fn keyof<K: Into<String>>(keys: impl IntoIterator<Item = K>) -> SharedCodec {
    Arc::new(KeyOfCodec::new(keys.into_iter().map(Into::into).collect()))
}

pub fn number_from_string() -> SharedCodec {
    Arc::new(WellKnown::NumberFromString)
}

pub fn int_from_string() -> SharedCodec {
    Arc::new(WellKnown::IntFromString)
}

pub fn boolean_from_string() -> SharedCodec {
    Arc::new(WellKnown::BooleanFromString)
}

/// RFC 3339 timestamp.
pub fn date_from_iso_string() -> SharedCodec {
    Arc::new(WellKnown::DateFromIsoString)
}

pub fn uuid() -> SharedCodec {
    Arc::new(WellKnown::Uuid)
}

pub fn non_empty_string() -> SharedCodec {
    Arc::new(WellKnown::NonEmptyString)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_error_paths() {
        let err = FieldError::new("expected number").within("age").within("user");
        assert_eq!(err.path, "user.age");
        assert_eq!(err.to_string(), "user.age: expected number");
        assert_eq!(FieldError::new("boom").to_string(), "boom");
    }

    #[test]
    fn test_merge_decoded_unions_objects() {
        let merged = merge_decoded(vec![json!({"a": 1, "b": 1}), json!({"b": 2, "c": 3})]);
        assert_eq!(merged, json!({"a": 1, "b": 2, "c": 3}));
    }

    #[test]
    fn test_merge_decoded_non_object_wins_last() {
        assert_eq!(merge_decoded(vec![json!({"a": 1}), json!("x")]), json!("x"));
        assert_eq!(merge_decoded(vec![]), json!({}));
    }
}
