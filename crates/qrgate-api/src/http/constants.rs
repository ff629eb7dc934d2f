//! Shared HTTP header names.

pub(crate) const HEADER_REQUEST_ID: &str = "x-request-id";
pub(crate) const HEADER_SESSION_ID: &str = "x-session-id";
pub(crate) const HEADER_COUNTRY_CODE: &str = "country-code";
pub(crate) const HEADER_SSID: &str = "ssid";
