#![forbid(unsafe_code)]
#![warn(
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    rustdoc::broken_intra_doc_links,
    missing_docs
)]

//! Telemetry primitives shared across the qrgate workspace.
//!
//! Layout: `init.rs` (subscriber install), `context.rs` (request context),
//! `layers.rs` (request-id layers), `metrics.rs` (Prometheus registry).

pub mod context;
pub mod error;
pub mod init;
pub mod layers;
pub mod metrics;

pub use context::{
    NO_REQUEST, RequestScope, ServiceSpanGuard, current_request_id, current_route,
};
pub use error::{Result, TelemetryError};
pub use init::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, build_sha, init_logging};
pub use layers::{propagate_request_id_layer, set_request_id_layer};
pub use metrics::{Metrics, UpstreamOutcome};
