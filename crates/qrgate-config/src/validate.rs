//! Validation helpers and parsing utilities for environment values.

use std::net::SocketAddr;
use std::time::Duration;

use url::Url;

use crate::error::{ConfigError, ConfigResult};

pub(crate) fn parse_socket_addr(field: &'static str, raw: &str) -> ConfigResult<SocketAddr> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::invalid(field, raw, "not_a_socket_address"))
}

pub(crate) fn parse_secs(field: &'static str, raw: &str) -> ConfigResult<Duration> {
    let secs: u64 = raw
        .trim()
        .parse()
        .map_err(|_| ConfigError::invalid(field, raw, "not_an_integer"))?;
    if secs == 0 {
        return Err(ConfigError::invalid(field, raw, "zero"));
    }
    Ok(Duration::from_secs(secs))
}

pub(crate) fn parse_concurrency(field: &'static str, raw: &str) -> ConfigResult<usize> {
    let value: usize = raw
        .trim()
        .parse()
        .map_err(|_| ConfigError::invalid(field, raw, "not_an_integer"))?;
    if value == 0 {
        return Err(ConfigError::invalid(field, raw, "zero"));
    }
    Ok(value)
}

/// Validate an HTTP(S) base URL and normalise away trailing slashes.
pub(crate) fn parse_base_url(field: &'static str, raw: &str) -> ConfigResult<String> {
    let trimmed = raw.trim();
    let url = Url::parse(trimmed).map_err(|_| ConfigError::invalid(field, raw, "not_a_url"))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::invalid(field, raw, "unsupported_scheme"));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(ConfigError::invalid(field, raw, "unexpected_query"));
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

pub(crate) fn parse_log_format(field: &'static str, raw: &str) -> ConfigResult<String> {
    let value = raw.trim().to_ascii_lowercase();
    match value.as_str() {
        "json" | "pretty" => Ok(value),
        _ => Err(ConfigError::invalid(field, raw, "unknown_format")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_reject_zero_and_garbage() {
        assert_eq!(parse_secs("F", "15").ok(), Some(Duration::from_secs(15)));
        assert_eq!(parse_secs("F", "0").map_err(|e| e.reason()).err(), Some("zero"));
        assert_eq!(
            parse_secs("F", "soon").map_err(|e| e.reason()).err(),
            Some("not_an_integer")
        );
    }

    #[test]
    fn base_urls_are_normalised() {
        assert_eq!(
            parse_base_url("F", "https://example.test/").ok().as_deref(),
            Some("https://example.test")
        );
        assert_eq!(
            parse_base_url("F", "ftp://example.test")
                .map_err(|e| e.reason())
                .err(),
            Some("unsupported_scheme")
        );
        assert!(parse_base_url("F", "not a url").is_err());
    }

    #[test]
    fn log_format_accepts_known_names() {
        assert_eq!(parse_log_format("F", "JSON").ok().as_deref(), Some("json"));
        assert!(parse_log_format("F", "xml").is_err());
    }
}
