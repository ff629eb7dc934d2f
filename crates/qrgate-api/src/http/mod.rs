//! HTTP routing, handlers and middleware.

pub(crate) mod constants;
pub(crate) mod errors;
pub(crate) mod health;
pub(crate) mod login;
pub(crate) mod pages;
pub(crate) mod reauth;
pub mod router;
pub(crate) mod telemetry;
#[cfg(test)]
pub(crate) mod test_support;
pub(crate) mod token;

use axum::http::{HeaderMap, header::AsHeaderName};

/// Header value as text, ignoring values that are not visible ASCII.
pub(crate) fn header_str(headers: &HeaderMap, name: impl AsHeaderName) -> Option<&str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}
