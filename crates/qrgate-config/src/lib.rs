#![forbid(unsafe_code)]
#![warn(
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    rustdoc::broken_intra_doc_links,
    missing_docs
)]

//! Environment-driven configuration for the qrgate service.
//!
//! Layout: `defaults.rs` (default values and upstream hosts), `model.rs`
//! (typed settings), `validate.rs` (parsing helpers), `loader.rs`
//! (environment lookup).

pub mod defaults;
pub mod error;
pub mod loader;
pub mod model;
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use model::{LoggingSettings, ServerConfig, TranslateSettings, UpstreamEndpoints};
