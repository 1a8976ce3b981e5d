//! Codecs built from other codecs.

use serde_json::{Map, Value};

use super::{merge_decoded, Codec, FieldError, Shape, SharedCodec};

static NULL: Value = Value::Null;

/// Homogeneous array.
#[derive(Debug, Clone)]
pub struct ArrayCodec {
    item: SharedCodec,
    non_empty: bool,
}

impl ArrayCodec {
    pub fn new(item: SharedCodec) -> Self {
        Self { item, non_empty: false }
    }

    pub fn non_empty(item: SharedCodec) -> Self {
        Self { item, non_empty: true }
    }
}

impl Codec for ArrayCodec {
    fn decode(&self, raw: &Value) -> Result<Value, Vec<FieldError>> {
        let items = raw
            .as_array()
            .ok_or_else(|| vec![FieldError::expected("array", raw)])?;
        if self.non_empty && items.is_empty() {
            return Err(vec![FieldError::new("expected a non-empty array")]);
        }

        let mut decoded = Vec::with_capacity(items.len());
        let mut errors = Vec::new();
        for (index, item) in items.iter().enumerate() {
            match self.item.decode(item) {
                Ok(value) => decoded.push(value),
                Err(errs) => {
                    let index = index.to_string();
                    errors.extend(errs.into_iter().map(|e| e.within(&index)));
                }
            }
        }

        if errors.is_empty() {
            Ok(Value::Array(decoded))
        } else {
            Err(errors)
        }
    }

    fn is(&self, value: &Value) -> bool {
        value.as_array().is_some_and(|items| {
            !(self.non_empty && items.is_empty()) && items.iter().all(|i| self.item.is(i))
        })
    }

    fn encode(&self, value: &Value) -> Value {
        match value {
            Value::Array(items) => Value::Array(items.iter().map(|i| self.item.encode(i)).collect()),
            other => other.clone(),
        }
    }

    fn shape(&self) -> Shape {
        Shape::Array(Box::new(self.item.shape()))
    }
}

/// Object with a fixed set of fields. Undeclared keys are dropped on decode.
#[derive(Debug, Clone)]
pub struct RecordCodec {
    name: Option<String>,
    fields: Vec<(String, SharedCodec)>,
    partial: bool,
}

impl RecordCodec {
    pub fn new<K, I>(name: Option<String>, fields: I, partial: bool) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, SharedCodec)>,
    {
        Self {
            name,
            fields: fields.into_iter().map(|(k, c)| (k.into(), c)).collect(),
            partial,
        }
    }

    fn may_be_missing(&self, codec: &SharedCodec) -> bool {
        self.partial || codec.shape().is_optional()
    }
}

impl Codec for RecordCodec {
    fn decode(&self, raw: &Value) -> Result<Value, Vec<FieldError>> {
        let object = raw
            .as_object()
            .ok_or_else(|| vec![FieldError::expected("object", raw)])?;

        let mut decoded = Map::new();
        let mut errors = Vec::new();
        for (key, codec) in &self.fields {
            let value = object.get(key);
            if self.partial && value.map_or(true, Value::is_null) {
                continue;
            }
            match codec.decode(value.unwrap_or(&NULL)) {
                Ok(Value::Null) if value.is_none() => {}
                Ok(v) => {
                    decoded.insert(key.clone(), v);
                }
                Err(errs) => errors.extend(errs.into_iter().map(|e| e.within(key))),
            }
        }

        if errors.is_empty() {
            Ok(Value::Object(decoded))
        } else {
            Err(errors)
        }
    }

    fn is(&self, value: &Value) -> bool {
        let Some(object) = value.as_object() else {
            return false;
        };
        self.fields.iter().all(|(key, codec)| match object.get(key) {
            None => self.may_be_missing(codec),
            Some(v) => codec.is(v) || (self.partial && v.is_null()),
        })
    }

    fn encode(&self, value: &Value) -> Value {
        let Value::Object(object) = value else {
            return value.clone();
        };
        let mut out = object.clone();
        for (key, codec) in &self.fields {
            if let Some(v) = object.get(key) {
                out.insert(key.clone(), codec.encode(v));
            }
        }
        Value::Object(out)
    }

    fn shape(&self) -> Shape {
        let fields = self
            .fields
            .iter()
            .map(|(k, c)| (k.clone(), c.shape()))
            .collect();
        if self.partial {
            Shape::Partial { name: self.name.clone(), fields }
        } else {
            Shape::Record { name: self.name.clone(), fields }
        }
    }
}

/// Accepts null (or a missing field) in addition to the inner codec.
#[derive(Debug, Clone)]
pub struct OptionalCodec {
    inner: SharedCodec,
}

impl OptionalCodec {
    pub fn new(inner: SharedCodec) -> Self {
        Self { inner }
    }
}

impl Codec for OptionalCodec {
    fn decode(&self, raw: &Value) -> Result<Value, Vec<FieldError>> {
        if raw.is_null() {
            Ok(Value::Null)
        } else {
            self.inner.decode(raw)
        }
    }

    fn is(&self, value: &Value) -> bool {
        value.is_null() || self.inner.is(value)
    }

    fn encode(&self, value: &Value) -> Value {
        if value.is_null() {
            Value::Null
        } else {
            self.inner.encode(value)
        }
    }

    fn shape(&self) -> Shape {
        Shape::Optional(Box::new(self.inner.shape()))
    }
}

/// First member that decodes wins.
#[derive(Debug, Clone)]
pub struct UnionCodec {
    members: Vec<SharedCodec>,
}

impl UnionCodec {
    pub fn new(members: Vec<SharedCodec>) -> Self {
        Self { members }
    }
}

impl Codec for UnionCodec {
    fn decode(&self, raw: &Value) -> Result<Value, Vec<FieldError>> {
        let mut errors = Vec::new();
        for member in &self.members {
            match member.decode(raw) {
                Ok(value) => return Ok(value),
                Err(errs) => errors.extend(errs),
            }
        }
        errors.insert(0, FieldError::new("no union member matched"));
        Err(errors)
    }

    fn is(&self, value: &Value) -> bool {
        self.members.iter().any(|m| m.is(value))
    }

    fn encode(&self, value: &Value) -> Value {
        self.members
            .iter()
            .find(|m| m.is(value))
            .map(|m| m.encode(value))
            .unwrap_or_else(|| value.clone())
    }

    fn shape(&self) -> Shape {
        Shape::Union(self.members.iter().map(|m| m.shape()).collect())
    }
}

/// Every member must decode; outputs are merged.
#[derive(Debug, Clone)]
pub struct IntersectionCodec {
    name: Option<String>,
    members: Vec<SharedCodec>,
}

impl IntersectionCodec {
    pub fn new(name: Option<String>, members: Vec<SharedCodec>) -> Self {
        Self { name, members }
    }
}

/// Run every codec against the same input without stopping at the first failure.
pub(crate) fn decode_all(codecs: &[SharedCodec], raw: &Value) -> Result<Value, Vec<FieldError>> {
    let mut outputs = Vec::with_capacity(codecs.len());
    let mut errors = Vec::new();
    for codec in codecs {
        match codec.decode(raw) {
            Ok(value) => outputs.push(value),
            Err(errs) => errors.extend(errs),
        }
    }
    if errors.is_empty() {
        Ok(merge_decoded(outputs))
    } else {
        Err(errors)
    }
}

impl Codec for IntersectionCodec {
    fn decode(&self, raw: &Value) -> Result<Value, Vec<FieldError>> {
        decode_all(&self.members, raw)
    }

    fn is(&self, value: &Value) -> bool {
        self.members.iter().all(|m| m.is(value))
    }

    fn encode(&self, value: &Value) -> Value {
        self.members
            .iter()
            .fold(value.clone(), |acc, member| member.encode(&acc))
    }

    fn shape(&self) -> Shape {
        Shape::Intersection {
            name: self.name.clone(),
            members: self.members.iter().map(|m| m.shape()).collect(),
        }
    }
}

/// String restricted to a fixed key set.
#[derive(Debug, Clone)]
pub struct KeyOfCodec {
    keys: Vec<String>,
}

impl KeyOfCodec {
    pub fn new(keys: Vec<String>) -> Self {
        Self { keys }
    }
}

impl Codec for KeyOfCodec {
    fn decode(&self, raw: &Value) -> Result<Value, Vec<FieldError>> {
        match raw.as_str() {
            Some(key) if self.keys.iter().any(|k| k == key) => Ok(raw.clone()),
            _ => Err(vec![FieldError::expected(
                &format!("one of {}", self.keys.join(", ")),
                raw,
            )]),
        }
    }

    fn shape(&self) -> Shape {
        Shape::KeyOf(self.keys.clone())
    }
}
