//! HTTP transport subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware: request id, trace, timeout, limit)
//!     → request.rs (buffer body, build RawRequest)
//!     → routing::RouteTable::dispatch
//!     → response.rs (RouteResponse → HTTP response)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{into_raw_request, parse_body, BodyError, X_REQUEST_ID};
pub use response::into_http_response;
pub use server::{AppState, HttpServer};
