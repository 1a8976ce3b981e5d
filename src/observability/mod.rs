//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! routing::router (every dispatch):
//!     → tracing events (match, fallthrough, validation failure)
//!     → metrics.rs (outcome counter, duration histogram)
//!
//! http::server:
//!     → tower-http TraceLayer spans, tagged with x-request-id
//!
//! Consumers:
//!     → logging.rs subscriber (stdout)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Structured events through `tracing`; level set from config, overridable
//!   with `RUST_LOG`
//! - Metrics are no-ops until a recorder is installed, so tests need no setup

pub mod logging;
pub mod metrics;
