#![forbid(unsafe_code)]
#![warn(
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    rustdoc::broken_intra_doc_links,
    missing_docs
)]

//! HTTP surface of the QR login proxy.
//!
//! Layout: `http/` (router, handlers, middleware), `sessions.rs` (keyed login
//! session store), `localizer.rs` (translation facade), `i18n.rs` (UI strings
//! and locale negotiation), `pages.rs` (HTML rendering).

pub mod error;
pub mod http;
pub mod i18n;
pub mod localizer;
pub(crate) mod pages;
pub mod sessions;
pub(crate) mod state;

pub use error::{ApiServerError, ApiServerResult};
pub use http::router::ApiServer;
pub use localizer::{LocalizerFacade, SharedLocalizer};
pub use sessions::{SessionId, SessionStore};
