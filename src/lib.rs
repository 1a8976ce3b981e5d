//! Declarative route descriptions with request matching, validation,
//! dispatch and generated OpenAPI documentation.
//!
//! # Architecture Overview
//!
//! ```text
//!   route fragments ──combine──▶ Route ──┬──▶ routing::matcher ──▶ routing::router ──▶ handler
//!   (get, lit, param,                    │         (per request)        (ordered table)
//!    query, data, response)              │
//!                                        └──▶ openapi::walker ──▶ /swagger.json
//!                                                  (once)
//!
//!   http::server (axum) ── RawRequest ──▶ RouteTable::dispatch ── RouteResponse ──▶ client
//! ```
//!
//! # Example
//!
//! ```no_run
//! use fragment_router::codec;
//! use fragment_router::route::{self, make_route, respond};
//! use fragment_router::routing::{Handler, RouteTable};
//!
//! let user = make_route([
//!     route::get(),
//!     route::lit("user"),
//!     route::param("id", codec::number_from_string()),
//!     route::response(200, codec::record([("id", codec::number())])),
//! ]);
//!
//! let table = RouteTable::default()
//!     .route(user, Handler::pure(|req| respond(200, req.params)));
//! ```

// Core subsystems
pub mod codec;
pub mod openapi;
pub mod route;
pub mod routing;

// Transport
pub mod http;

// Cross-cutting concerns
pub mod config;
pub mod lifecycle;
pub mod observability;

pub use config::ServerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use route::{make_route, respond, Reply, Route};
pub use routing::{Handler, MatchError, MatchedRequest, RawRequest, RouteResponse, RouteTable};
