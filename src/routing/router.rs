//! Route table and dispatch.
//!
//! # Responsibilities
//! - Store (route, handler) pairs in registration order
//! - Try each route in turn, stopping at the first structural match
//! - Run the winning handler and encode its reply
//! - Serve the generated OpenAPI document
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) linear scan; table order is the only tie-break
//! - A validation failure is final, later routes are never tried
//! - The documentation route is checked before every registered route and
//!   its document is built once, on first request

use std::collections::BTreeMap;
use std::sync::OnceLock;
use std::time::Instant;

use serde_json::Value;

use crate::codec;
use crate::observability::metrics;
use crate::openapi;
use crate::route::{self, Route};

use super::handler::{Handler, RouteWithHandler};
use super::matcher::{match_route, MatchError, RawRequest};

pub const DEFAULT_DOCS_PATH: &str = "swagger.json";

/// Table-level documentation metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct TableMetadata {
    pub title: String,
    pub description: Option<String>,
    pub version: String,
}

impl Default for TableMetadata {
    fn default() -> Self {
        Self {
            title: "API".to_string(),
            description: None,
            version: "1.0.0".to_string(),
        }
    }
}

/// What goes back to the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteResponse {
    pub status_code: u16,
    pub body: Value,
    pub headers: BTreeMap<String, String>,
}

impl RouteResponse {
    fn new(status_code: u16, body: impl Into<Value>) -> Self {
        Self {
            status_code,
            body: body.into(),
            headers: BTreeMap::new(),
        }
    }
}

/// How a dispatch ended, used as a metrics label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Handled,
    Docs,
    ValidationFailed,
    NoResponseContract,
    NotFound,
}

impl DispatchOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            DispatchOutcome::Handled => "handled",
            DispatchOutcome::Docs => "docs",
            DispatchOutcome::ValidationFailed => "validation_failed",
            DispatchOutcome::NoResponseContract => "no_response_contract",
            DispatchOutcome::NotFound => "not_found",
        }
    }
}

/// Ordered route table.
#[derive(Debug)]
pub struct RouteTable {
    routes: Vec<RouteWithHandler>,
    metadata: TableMetadata,
    docs_route: Route,
    document: OnceLock<Result<Value, String>>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

fn docs_route(docs_path: &str) -> Route {
    route::get() + route::path(docs_path) + route::response(200, codec::unknown())
}

impl RouteTable {
    pub fn new(routes: impl IntoIterator<Item = RouteWithHandler>) -> Self {
        Self {
            routes: routes.into_iter().collect(),
            metadata: TableMetadata::default(),
            docs_route: docs_route(DEFAULT_DOCS_PATH),
            document: OnceLock::new(),
        }
    }

    pub fn with_metadata(
        mut self,
        title: impl Into<String>,
        description: Option<String>,
        version: impl Into<String>,
    ) -> Self {
        self.metadata = TableMetadata {
            title: title.into(),
            description,
            version: version.into(),
        };
        self
    }

    /// Serve the document at `path` instead of `/swagger.json`.
    pub fn with_docs_path(mut self, path: &str) -> Self {
        self.docs_route = docs_route(path);
        self
    }

    /// Append a route; earlier registrations take precedence.
    pub fn route(mut self, route: Route, handler: Handler) -> Self {
        self.routes.push(RouteWithHandler::new(route, handler));
        self
    }

    pub fn routes(&self) -> &[RouteWithHandler] {
        &self.routes
    }

    pub fn metadata(&self) -> &TableMetadata {
        &self.metadata
    }

    pub fn docs_path(&self) -> String {
        self.docs_route.show_path()
    }

    /// The OpenAPI document, generated on first use.
    pub fn document(&self) -> Result<&Value, &str> {
        self.document
            .get_or_init(|| openapi::document(self).map_err(|e| e.to_string()))
            .as_ref()
            .map_err(String::as_str)
    }

    /// Dispatch a request through the table.
    pub async fn dispatch(&self, request: RawRequest) -> RouteResponse {
        let start = Instant::now();
        let (outcome, response) = self.dispatch_inner(&request).await;
        metrics::record_dispatch(outcome.as_str(), response.status_code, start);
        response
    }

    async fn dispatch_inner(&self, request: &RawRequest) -> (DispatchOutcome, RouteResponse) {
        if match_route(&self.docs_route, request).is_ok() {
            let response = match self.document() {
                Ok(document) => RouteResponse::new(200, document.clone()),
                Err(diagnostic) => {
                    tracing::error!(error = %diagnostic, "Failed to generate API documentation");
                    RouteResponse::new(500, diagnostic)
                }
            };
            return (DispatchOutcome::Docs, response);
        }

        for entry in &self.routes {
            let matched = match match_route(&entry.route, request) {
                Ok(matched) => matched,
                Err(MatchError::NoMatch { reason }) => {
                    tracing::debug!(
                        route = %entry.route.show_path(),
                        reason = %reason,
                        "Route did not match, trying next"
                    );
                    continue;
                }
                Err(error) => {
                    tracing::warn!(
                        route = %entry.route.show_path(),
                        method = %request.method,
                        url = %request.url,
                        error = %error,
                        "Request failed validation"
                    );
                    return (
                        DispatchOutcome::ValidationFailed,
                        RouteResponse::new(400, error.to_string()),
                    );
                }
            };

            tracing::debug!(
                route = %entry.route.show_path(),
                method = %request.method,
                "Route matched"
            );

            let reply = entry.handler.call(matched).await;
            return match entry.route.response().encode(reply) {
                Some(reply) => (
                    DispatchOutcome::Handled,
                    RouteResponse {
                        status_code: reply.code,
                        body: reply.data,
                        headers: reply.headers,
                    },
                ),
                None => {
                    tracing::error!(
                        route = %entry.route.show_path(),
                        "Matched route declares no response contract"
                    );
                    (
                        DispatchOutcome::NoResponseContract,
                        RouteResponse::new(500, MatchError::NoResponseContract.to_string()),
                    )
                }
            };
        }

        tracing::debug!(method = %request.method, url = %request.url, "No route matched");
        (DispatchOutcome::NotFound, RouteResponse::new(404, "Not Found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::{make_route, respond};
    use serde_json::json;

    fn text_route(path: &str) -> Route {
        route::get() + route::path(path) + route::response(200, codec::string())
    }

    fn table() -> RouteTable {
        RouteTable::default()
            .route(text_route("/readyz"), Handler::pure(|_| respond(200, "ready")))
            .route(text_route("/healthz"), Handler::pure(|_| respond(200, "healthy")))
            .route(
                make_route([
                    route::get(),
                    route::lit("user"),
                    route::param("id", codec::number_from_string()),
                    route::response(200, codec::record([("id", codec::number())])),
                ]),
                Handler::pure(|req| respond(200, req.params)),
            )
            .route(
                text_route("/user/:name"),
                Handler::pure(|_| respond(200, "fallback")),
            )
            .route(route::lit("broken"), Handler::pure(|_| respond(200, "x")))
    }

    #[tokio::test]
    async fn test_falls_through_structural_mismatch() {
        let response = table().dispatch(RawRequest::new("GET", "/healthz")).await;
        assert_eq!(response.status_code, 200);
        assert_eq!(response.body, json!("healthy"));
    }

    #[tokio::test]
    async fn test_handler_reply_is_encoded() {
        let response = table().dispatch(RawRequest::new("GET", "/user/5")).await;
        assert_eq!(response.status_code, 200);
        assert_eq!(response.body, json!({"id": 5}));
    }

    #[tokio::test]
    async fn test_validation_error_stops_dispatch() {
        let response = table().dispatch(RawRequest::new("GET", "/user/dog")).await;
        assert_eq!(response.status_code, 400);
        let body = response.body.as_str().unwrap_or_default().to_string();
        assert!(body.starts_with("params:"), "unexpected body {body}");
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_found() {
        let response = table().dispatch(RawRequest::new("GET", "/nope")).await;
        assert_eq!(response.status_code, 404);
    }

    #[tokio::test]
    async fn test_missing_response_contract_is_500() {
        let response = table().dispatch(RawRequest::new("GET", "/broken")).await;
        assert_eq!(response.status_code, 500);
        assert_eq!(response.body, json!("NoResponseContract"));
    }

    #[tokio::test]
    async fn test_reply_headers_are_forwarded() {
        let table = RouteTable::default().route(
            text_route("/h"),
            Handler::new(|_| async { respond(200, "ok").with_header("x-custom", "1") }),
        );
        let response = table.dispatch(RawRequest::new("GET", "/h")).await;
        assert_eq!(response.headers.get("x-custom").map(String::as_str), Some("1"));
    }

    #[tokio::test]
    async fn test_docs_route_served_first() {
        let table = table().with_metadata("Demo", None, "2.0.0");
        let response = table.dispatch(RawRequest::new("GET", "/swagger.json")).await;
        assert_eq!(response.status_code, 200);
        assert_eq!(response.body["info"]["title"], json!("Demo"));
        assert_eq!(response.body["openapi"], json!("3.0.0"));
    }

    #[tokio::test]
    async fn test_custom_docs_path() {
        let table = table().with_docs_path("docs/openapi.json");
        assert_eq!(table.docs_path(), "/docs/openapi.json");
        let response = table.dispatch(RawRequest::new("GET", "/docs/openapi.json")).await;
        assert_eq!(response.status_code, 200);
        let old = table.dispatch(RawRequest::new("GET", "/swagger.json")).await;
        assert_eq!(old.status_code, 404);
    }
}
