//! Shape descriptors.
//!
//! A `Shape` is the introspectable half of a codec: it says what a decoder
//! accepts without running it. The matcher reads shapes to pre-fill defaults
//! for declared keys and the OpenAPI walker turns them into schemas.

use serde_json::Value;

/// Structural description of the values a codec accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    String,
    Number,
    Integer,
    Boolean,
    Null,
    Unknown,
    /// Exactly one value.
    Literal(Value),
    Array(Box<Shape>),
    /// Object with every field required unless the field shape is `Optional`.
    Record {
        name: Option<String>,
        fields: Vec<(String, Shape)>,
    },
    /// Object with every field optional.
    Partial {
        name: Option<String>,
        fields: Vec<(String, Shape)>,
    },
    /// Value may be absent or null.
    Optional(Box<Shape>),
    Union(Vec<Shape>),
    Intersection {
        name: Option<String>,
        members: Vec<Shape>,
    },
    /// One of a fixed set of strings.
    KeyOf(Vec<String>),
    /// A well-known wrapper type identified by name, e.g. `NumberFromString`.
    Named(String),
}

/// A field declared by an object-like shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeclaredField<'a> {
    pub name: &'a str,
    pub shape: &'a Shape,
    pub required: bool,
}

impl Shape {
    /// The identifier given to a record or intersection, if any.
    pub fn name(&self) -> Option<&str> {
        match self {
            Shape::Record { name, .. }
            | Shape::Partial { name, .. }
            | Shape::Intersection { name, .. } => name.as_deref(),
            _ => None,
        }
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, Shape::Optional(_))
    }

    /// Fields declared at the top level of an object-like shape.
    ///
    /// Intersections contribute the fields of every member, in member order.
    /// Any other shape declares no fields.
    pub fn declared_fields(&self) -> Vec<DeclaredField<'_>> {
        let mut out = Vec::new();
        self.collect_fields(&mut out);
        out
    }

    /// Names of the fields returned by [`Shape::declared_fields`].
    pub fn declared_keys(&self) -> Vec<&str> {
        self.declared_fields().into_iter().map(|f| f.name).collect()
    }

    fn collect_fields<'a>(&'a self, out: &mut Vec<DeclaredField<'a>>) {
        match self {
            Shape::Record { fields, .. } => {
                out.extend(fields.iter().map(|(name, shape)| DeclaredField {
                    name,
                    shape,
                    required: !shape.is_optional(),
                }));
            }
            Shape::Partial { fields, .. } => {
                out.extend(fields.iter().map(|(name, shape)| DeclaredField {
                    name,
                    shape,
                    required: false,
                }));
            }
            Shape::Intersection { members, .. } => {
                for member in members {
                    member.collect_fields(out);
                }
            }
            _ => {}
        }
    }

    /// Short label used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::String => "string",
            Shape::Number => "number",
            Shape::Integer => "integer",
            Shape::Boolean => "boolean",
            Shape::Null => "null",
            Shape::Unknown => "unknown",
            Shape::Literal(_) => "literal",
            Shape::Array(_) => "array",
            Shape::Record { .. } => "record",
            Shape::Partial { .. } => "partial",
            Shape::Optional(_) => "optional",
            Shape::Union(_) => "union",
            Shape::Intersection { .. } => "intersection",
            Shape::KeyOf(_) => "keyof",
            Shape::Named(_) => "named",
        }
    }
}
