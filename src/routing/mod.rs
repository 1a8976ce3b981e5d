//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming RawRequest {url, method, body, headers}
//!     → router.rs (docs route, then each route in order)
//!     → matcher.rs (structural match, then validation)
//!         NoMatch         → next route
//!         Validation      → 400, stop
//!         MatchedRequest  → handler.rs → Reply
//!     → response contract encode → RouteResponse
//! ```
//!
//! # Design Decisions
//! - Route tables are built at startup, immutable at runtime
//! - Linear scan, first structural match wins
//! - Deterministic: same input always matches same route

pub mod handler;
pub mod matcher;
pub mod router;

pub use handler::{Handler, RouteWithHandler};
pub use matcher::{match_route, MatchArea, MatchError, MatchedRequest, RawRequest};
pub use router::{DispatchOutcome, RouteResponse, RouteTable, TableMetadata, DEFAULT_DOCS_PATH};
