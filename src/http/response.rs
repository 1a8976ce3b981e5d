//! Response conversion.
//!
//! # Responsibilities
//! - Turn a `RouteResponse` into an axum response
//! - Pick the content type from the body kind
//! - Copy handler-supplied headers
//!
//! # Design Decisions
//! - String bodies go out as `text/plain`, everything else as JSON
//! - Invalid status codes become 500; invalid headers are skipped with a warning

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::Value;

use crate::routing::RouteResponse;

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
const APPLICATION_JSON: &str = "application/json";

pub fn into_http_response(route_response: RouteResponse) -> Response {
    let status = StatusCode::from_u16(route_response.status_code).unwrap_or_else(|_| {
        tracing::warn!(status = route_response.status_code, "Handler returned an invalid status code");
        StatusCode::INTERNAL_SERVER_ERROR
    });

    let (content_type, body) = match route_response.body {
        Value::String(text) => (TEXT_PLAIN, Body::from(text)),
        other => match serde_json::to_vec(&other) {
            Ok(bytes) => (APPLICATION_JSON, Body::from(bytes)),
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize response body");
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
        },
    };

    let mut response = Response::new(body);
    *response.status_mut() = status;
    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));

    for (name, value) in route_response.headers {
        match (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(&value)) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => tracing::warn!(header = %name, "Skipping invalid response header"),
        }
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn route_response(status_code: u16, body: Value) -> RouteResponse {
        RouteResponse {
            status_code,
            body,
            headers: BTreeMap::new(),
        }
    }

    #[tokio::test]
    async fn test_string_body_is_text() {
        let response = into_http_response(route_response(200, json!("OK")));
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], TEXT_PLAIN);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"OK");
    }

    #[tokio::test]
    async fn test_json_body() {
        let response = into_http_response(route_response(201, json!({"id": 1})));
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()[CONTENT_TYPE], APPLICATION_JSON);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(serde_json::from_slice::<Value>(&bytes).unwrap(), json!({"id": 1}));
    }

    #[test]
    fn test_headers_and_invalid_status() {
        let mut input = route_response(1000, Value::Null);
        input.headers.insert("x-custom".into(), "yes".into());
        input.headers.insert("bad header".into(), "no".into());

        let response = into_http_response(input);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()["x-custom"], "yes");
        assert_eq!(response.headers().len(), 2);
    }
}
