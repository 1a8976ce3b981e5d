//! Request extraction.
//!
//! # Responsibilities
//! - Turn an axum request into the router's `RawRequest`
//! - Enforce the body size limit while buffering
//! - Parse the body as JSON, falling back to text
//!
//! # Design Decisions
//! - The URL keeps its query string; the matcher splits and decodes it
//! - Header names arrive lowercased from `http`; repeated headers are
//!   joined with ", "
//! - Non UTF-8 header values are dropped

use axum::body::{to_bytes, Body};
use axum::http::Request;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::routing::RawRequest;

pub const X_REQUEST_ID: &str = "x-request-id";

#[derive(Debug, Error)]
pub enum BodyError {
    #[error("request body exceeds {limit} bytes")]
    TooLarge { limit: usize },
}

/// Empty → null, valid JSON → that value, anything else → a string.
pub fn parse_body(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

pub async fn into_raw_request(request: Request<Body>, max_body_size: usize) -> Result<RawRequest, BodyError> {
    let (parts, body) = request.into_parts();

    let url = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| parts.uri.path().to_string());

    let mut headers = Map::new();
    for (name, value) in &parts.headers {
        let Ok(value) = value.to_str() else {
            continue;
        };
        match headers.get_mut(name.as_str()) {
            Some(Value::String(existing)) => {
                existing.push_str(", ");
                existing.push_str(value);
            }
            _ => {
                headers.insert(name.as_str().to_string(), Value::String(value.to_string()));
            }
        }
    }

    let bytes = to_bytes(body, max_body_size)
        .await
        .map_err(|_| BodyError::TooLarge { limit: max_body_size })?;

    Ok(RawRequest {
        url,
        method: parts.method.as_str().to_string(),
        body: parse_body(&bytes),
        headers,
    })
}
