#![forbid(unsafe_code)]
#![warn(
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    rustdoc::broken_intra_doc_links,
    missing_docs
)]

//! qrgate application bootstrap wiring.
//!
//! Layout: `bootstrap.rs` (service wiring), `error.rs` (bootstrap errors).

/// Application bootstrap and environment loading.
pub mod bootstrap;
/// Bootstrap error types.
pub mod error;

pub use bootstrap::run_app;
pub use error::{AppError, AppResult};
