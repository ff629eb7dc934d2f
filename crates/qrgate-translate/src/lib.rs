#![forbid(unsafe_code)]
#![warn(
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    rustdoc::broken_intra_doc_links,
    missing_docs
)]

//! Scraping client for the public mobile translation page.
//!
//! Layout: `scrape.rs` (marker extraction and entity cleanup), `client.rs`
//! (HTTP client and bounded fan-out).

pub mod client;
pub mod error;
pub mod scrape;

pub use client::{SOURCE_LANGUAGE, Translator, primary_subtag};
pub use error::{TranslateError, TranslateResult};
pub use scrape::ResultScraper;
