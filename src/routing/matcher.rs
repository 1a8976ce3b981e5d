//! Route matching logic.
//!
//! # Responsibilities
//! - Check a request's path shape and method against one route
//! - Build the raw params, query, header and body inputs
//! - Run all four validators and report the first failing area
//!
//! # Data Flow
//! ```text
//! RawRequest {url, method, body, headers}
//!     → split path / query, percent-decode
//!     → length check → literal check → capture params → method check
//!     → params, query, body, headers validators (all run)
//!     → MatchedRequest or MatchError
//! ```
//!
//! # Design Decisions
//! - Literal segments compare case-insensitively
//! - `NoMatch` means the route does not describe the request at all;
//!   `Validation` means it does but an input is malformed
//! - Validators never short-circuit; the reported area follows the fixed
//!   order params, query, body, headers

use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::codec::FieldError;
use crate::route::{Route, RouteItem};

/// The request as supplied by the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRequest {
    pub url: String,
    pub method: String,
    pub body: Value,
    pub headers: Map<String, Value>,
}

impl RawRequest {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: method.into(),
            body: Value::Null,
            headers: Map::new(),
        }
    }

    pub fn with_body(mut self, body: impl Into<Value>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// Typed inputs handed to a route handler.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedRequest {
    pub params: Value,
    pub query: Value,
    pub data: Value,
    pub headers: Value,
}

impl MatchedRequest {
    pub fn params_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.params)
    }

    pub fn query_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.query)
    }

    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.data)
    }

    pub fn headers_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.headers)
    }
}

/// Input surface a validation error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchArea {
    Params,
    Query,
    Body,
    Headers,
}

impl MatchArea {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchArea::Params => "params",
            MatchArea::Query => "query",
            MatchArea::Body => "body",
            MatchArea::Headers => "headers",
        }
    }
}

impl fmt::Display for MatchArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatchError {
    /// Path shape or method differ; try the next route.
    #[error("no match: {reason}")]
    NoMatch { reason: String },

    /// The route matched but one of its inputs did not decode.
    #[error("{area}: {}", join_errors(.errors))]
    Validation { area: MatchArea, errors: Vec<FieldError> },

    /// A matched route has nothing to encode its reply with.
    #[error("NoResponseContract")]
    NoResponseContract,
}

impl MatchError {
    fn no_match(reason: impl Into<String>) -> Self {
        MatchError::NoMatch {
            reason: reason.into(),
        }
    }
}

fn join_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

fn percent_decode(text: &str) -> String {
    urlencoding::decode(text)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| text.to_string())
}

/// Split a URL into decoded path segments and the raw query string.
fn split_url(url: &str) -> (Vec<String>, &str) {
    let (path, query) = url.split_once('?').unwrap_or((url, ""));
    let segments = path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(percent_decode)
        .collect();
    (segments, query)
}

/// `a=1&a=2&b=&=c&d=e=f` → `{a: ["1", "2"], d: ["e"]}`
///
/// Pairs with an empty key or value are dropped, so `?tag=` behaves like a
/// missing `tag`. Only the text between the first and second `=` is kept.
fn parse_query(query: &str) -> Map<String, Value> {
    let mut map = Map::new();
    for pair in query.split('&') {
        let mut fields = pair.split('=');
        let (Some(key), Some(value)) = (fields.next(), fields.next()) else {
            continue;
        };
        if key.is_empty() || value.is_empty() {
            continue;
        }
        let entry = map
            .entry(percent_decode(key))
            .or_insert_with(|| Value::Array(Vec::new()));
        if let Value::Array(values) = entry {
            values.push(Value::String(percent_decode(value)));
        }
    }
    map
}

fn capture_params(parts: &[RouteItem], segments: &[String]) -> Result<Map<String, Value>, MatchError> {
    if parts.len() != segments.len() {
        return Err(MatchError::no_match("length"));
    }

    let mut params = Map::new();
    for (item, segment) in parts.iter().zip(segments) {
        match item {
            RouteItem::Literal(text) if text.eq_ignore_ascii_case(segment) => {}
            RouteItem::Literal(text) => {
                return Err(MatchError::no_match(format!("expected literal {text}, got {segment}")))
            }
            RouteItem::Param(name) => {
                params.insert(name.clone(), Value::String(segment.clone()));
            }
        }
    }
    Ok(params)
}

/// Match one route against a raw request.
pub fn match_route(route: &Route, request: &RawRequest) -> Result<MatchedRequest, MatchError> {
    let (segments, query_string) = split_url(&request.url);
    let params = capture_params(route.parts(), &segments)?;

    if let Some(method) = route.method() {
        if !method.matches(&request.method) {
            return Err(MatchError::no_match("method"));
        }
    }

    let mut query = parse_query(query_string);
    // Optional and partial fields stay missing so their own codec decides.
    for key in route.query().required_keys() {
        query.entry(key).or_insert_with(|| Value::Array(Vec::new()));
    }

    let mut headers: Map<String, Value> = request
        .headers
        .iter()
        .map(|(name, value)| (name.to_lowercase(), value.clone()))
        .collect();
    for key in route.headers().declared_keys() {
        headers.entry(key).or_insert(Value::Null);
    }

    let params = route.params().decode(&Value::Object(params));
    let query = route.query().decode(&Value::Object(query));
    let data = route.data().decode(&request.body);
    let headers = route.headers().decode(&Value::Object(headers));

    let in_area = |area, result: Result<Value, Vec<FieldError>>| {
        result.map_err(|errors| MatchError::Validation { area, errors })
    };
    Ok(MatchedRequest {
        params: in_area(MatchArea::Params, params)?,
        query: in_area(MatchArea::Query, query)?,
        data: in_area(MatchArea::Body, data)?,
        headers: in_area(MatchArea::Headers, headers)?,
    })
}
