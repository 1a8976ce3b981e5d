//! OpenAPI documentation subsystem.
//!
//! # Data Flow
//! ```text
//! RouteTable (routes are data, never executed here)
//!     → document.rs (one operation per path + method)
//!     → walker.rs (shape → schema, named schema registry)
//!     → types.rs (serializable OpenAPI 3.0 document)
//! ```
//!
//! # Design Decisions
//! - Generated once per table, at first request to the docs route
//! - Walker failures are build-time errors and never reach live traffic
//!   as anything but the docs route's 500

pub mod document;
pub mod types;
pub mod walker;

pub use document::{build_document, document};
pub use types::OpenApiDocument;
pub use walker::{describe, describe_responses, SchemaError, SchemaRegistry};
