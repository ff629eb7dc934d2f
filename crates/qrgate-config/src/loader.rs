//! Environment-backed configuration loader.
//!
//! # Design
//! - Every variable is optional; absent values fall back to `defaults.rs`.
//! - Parsing goes through an injectable lookup so tests never mutate the process
//!   environment.

use tracing::debug;

use crate::error::ConfigResult;
use crate::model::{LoggingSettings, ServerConfig, TranslateSettings, UpstreamEndpoints};
use crate::validate::{
    parse_base_url, parse_concurrency, parse_log_format, parse_secs, parse_socket_addr,
};

/// Listener address.
pub const ENV_BIND_ADDR: &str = "QRGATE_BIND_ADDR";
/// Idle session lifetime in seconds.
pub const ENV_SESSION_TTL_SECS: &str = "QRGATE_SESSION_TTL_SECS";
/// Authentication upstream timeout in seconds.
pub const ENV_UPSTREAM_TIMEOUT_SECS: &str = "QRGATE_UPSTREAM_TIMEOUT_SECS";
/// Translation timeout in seconds.
pub const ENV_TRANSLATE_TIMEOUT_SECS: &str = "QRGATE_TRANSLATE_TIMEOUT_SECS";
/// Translation fan-out concurrency.
pub const ENV_TRANSLATE_CONCURRENCY: &str = "QRGATE_TRANSLATE_CONCURRENCY";
/// Translation endpoint override.
pub const ENV_TRANSLATE_BASE_URL: &str = "QRGATE_TRANSLATE_BASE_URL";
/// Client configuration host override.
pub const ENV_CLIENTCONFIG_BASE_URL: &str = "QRGATE_CLIENTCONFIG_BASE_URL";
/// Auth host override.
pub const ENV_AUTH_BASE_URL: &str = "QRGATE_AUTH_BASE_URL";
/// Authenticate host override.
pub const ENV_AUTHENTICATE_BASE_URL: &str = "QRGATE_AUTHENTICATE_BASE_URL";
/// QR login landing host override.
pub const ENV_QR_LOGIN_BASE_URL: &str = "QRGATE_QR_LOGIN_BASE_URL";
/// Log level.
pub const ENV_LOG_LEVEL: &str = "QRGATE_LOG_LEVEL";
/// Log format (`json` or `pretty`).
pub const ENV_LOG_FORMAT: &str = "QRGATE_LOG_FORMAT";

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ConfigError::InvalidField`] naming the first variable
    /// whose value fails validation.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration using the supplied variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ConfigError::InvalidField`] naming the first variable
    /// whose value fails validation.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let bind_addr = get(ENV_BIND_ADDR)
            .map(|raw| parse_socket_addr(ENV_BIND_ADDR, &raw))
            .transpose()?
            .unwrap_or(defaults.bind_addr);
        let session_ttl = get(ENV_SESSION_TTL_SECS)
            .map(|raw| parse_secs(ENV_SESSION_TTL_SECS, &raw))
            .transpose()?
            .unwrap_or(defaults.session_ttl);

        let base = |name: &'static str, fallback: String| -> ConfigResult<String> {
            get(name).map_or(Ok(fallback), |raw| parse_base_url(name, &raw))
        };

        let upstream = UpstreamEndpoints {
            clientconfig: base(ENV_CLIENTCONFIG_BASE_URL, defaults.upstream.clientconfig)?,
            auth: base(ENV_AUTH_BASE_URL, defaults.upstream.auth)?,
            authenticate: base(ENV_AUTHENTICATE_BASE_URL, defaults.upstream.authenticate)?,
            qr_login: base(ENV_QR_LOGIN_BASE_URL, defaults.upstream.qr_login)?,
            timeout: get(ENV_UPSTREAM_TIMEOUT_SECS)
                .map(|raw| parse_secs(ENV_UPSTREAM_TIMEOUT_SECS, &raw))
                .transpose()?
                .unwrap_or(defaults.upstream.timeout),
        };

        let translate = TranslateSettings {
            base_url: base(ENV_TRANSLATE_BASE_URL, defaults.translate.base_url)?,
            timeout: get(ENV_TRANSLATE_TIMEOUT_SECS)
                .map(|raw| parse_secs(ENV_TRANSLATE_TIMEOUT_SECS, &raw))
                .transpose()?
                .unwrap_or(defaults.translate.timeout),
            concurrency: get(ENV_TRANSLATE_CONCURRENCY)
                .map(|raw| parse_concurrency(ENV_TRANSLATE_CONCURRENCY, &raw))
                .transpose()?
                .unwrap_or(defaults.translate.concurrency),
        };

        let logging = LoggingSettings {
            level: get(ENV_LOG_LEVEL).map_or(defaults.logging.level, |raw| raw.trim().to_string()),
            format: get(ENV_LOG_FORMAT)
                .map(|raw| parse_log_format(ENV_LOG_FORMAT, &raw))
                .transpose()?,
        };

        let config = Self {
            bind_addr,
            session_ttl,
            upstream,
            translate,
            logging,
        };
        debug!(bind_addr = %config.bind_addr, "loaded configuration from environment");
        Ok(config)
    }
}
