//! Input validators and their AND-merge.

use serde_json::{Map, Value};

use crate::codec::composite::decode_all;
use crate::codec::{FieldError, Shape, SharedCodec};

/// Optional decoder for one input surface (params, query, body or headers).
///
/// `Absent` is the identity of [`Validator::and`]. A present validator holds
/// the conjunction of every codec merged into it; each one sees the same raw
/// input and the typed outputs are field-unioned.
#[derive(Debug, Clone, Default)]
pub enum Validator {
    #[default]
    Absent,
    Present(Conjunction),
}

/// Non-empty list of codecs that must all accept the input.
#[derive(Debug, Clone)]
pub struct Conjunction {
    codecs: Vec<SharedCodec>,
}

impl Conjunction {
    pub fn codecs(&self) -> &[SharedCodec] {
        &self.codecs
    }
}

impl Validator {
    pub fn new(codec: SharedCodec) -> Self {
        Validator::Present(Conjunction { codecs: vec![codec] })
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Validator::Present(_))
    }

    /// AND-merge: both sides must accept, outputs are unioned.
    pub fn and(self, other: Validator) -> Validator {
        match (self, other) {
            (Validator::Absent, other) => other,
            (this, Validator::Absent) => this,
            (Validator::Present(mut left), Validator::Present(right)) => {
                left.codecs.extend(right.codecs);
                Validator::Present(left)
            }
        }
    }

    /// Decode a raw input. Absent validators yield an empty object.
    pub fn decode(&self, raw: &Value) -> Result<Value, Vec<FieldError>> {
        match self {
            Validator::Absent => Ok(Value::Object(Map::new())),
            Validator::Present(conjunction) => decode_all(&conjunction.codecs, raw),
        }
    }

    /// Structural description, the intersection of every merged shape.
    pub fn shape(&self) -> Option<Shape> {
        match self {
            Validator::Absent => None,
            Validator::Present(conjunction) => match conjunction.codecs.as_slice() {
                [single] => Some(single.shape()),
                codecs => Some(Shape::Intersection {
                    name: None,
                    members: codecs.iter().map(|c| c.shape()).collect(),
                }),
            },
        }
    }

    /// Top-level keys declared by the shape, used to pre-fill missing inputs.
    pub fn declared_keys(&self) -> Vec<String> {
        self.shape()
            .map(|shape| shape.declared_keys().into_iter().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Declared keys that must be present for the shape to decode.
    pub fn required_keys(&self) -> Vec<String> {
        self.shape()
            .map(|shape| {
                shape
                    .declared_fields()
                    .into_iter()
                    .filter(|field| field.required)
                    .map(|field| field.name.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl PartialEq for Validator {
    fn eq(&self, other: &Self) -> bool {
        self.shape() == other.shape()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec;
    use serde_json::json;

    fn id_validator() -> Validator {
        Validator::new(codec::record([("id", codec::number_from_string())]))
    }

    fn name_validator() -> Validator {
        Validator::new(codec::record([("name", codec::string())]))
    }

    #[test]
    fn test_absent_is_identity() {
        assert_eq!(Validator::Absent.and(id_validator()), id_validator());
        assert_eq!(id_validator().and(Validator::Absent), id_validator());
        assert!(!Validator::Absent.and(Validator::Absent).is_present());
    }

    #[test]
    fn test_absent_decodes_to_empty_object() {
        assert_eq!(Validator::Absent.decode(&json!("anything")).unwrap(), json!({}));
    }

    #[test]
    fn test_and_requires_both_and_unions_fields() {
        let merged = id_validator().and(name_validator());

        let ok = merged.decode(&json!({"id": "7", "name": "dog"})).unwrap();
        assert_eq!(ok, json!({"id": 7, "name": "dog"}));

        assert!(merged.decode(&json!({"id": "7"})).is_err());
        assert!(merged.decode(&json!({"name": "dog"})).is_err());
    }

    #[test]
    fn test_and_reports_errors_from_both_sides() {
        let merged = id_validator().and(name_validator());
        let errors = merged.decode(&json!({})).unwrap_err();
        let paths: Vec<_> = errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["id", "name"]);
    }

    #[test]
    fn test_merged_shape_is_intersection() {
        let merged = id_validator().and(name_validator());
        match merged.shape() {
            Some(Shape::Intersection { name: None, members }) => assert_eq!(members.len(), 2),
            other => panic!("unexpected shape {other:?}"),
        }
        assert_eq!(merged.declared_keys(), vec!["id", "name"]);
    }

    #[test]
    fn test_and_is_associative() {
        let a = id_validator();
        let b = name_validator();
        let c = Validator::new(codec::record([("age", codec::number())]));

        let left = a.clone().and(b.clone()).and(c.clone());
        let right = a.and(b.and(c));
        assert_eq!(left, right);
    }
}
