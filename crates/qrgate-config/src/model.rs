//! Typed configuration models.

use std::net::SocketAddr;
use std::time::Duration;

use serde::Serialize;

use crate::defaults;

/// Fully validated service configuration.
#[derive(Debug, Clone, Serialize)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    pub bind_addr: SocketAddr,
    /// Idle lifetime of a login session in the session store.
    pub session_ttl: Duration,
    /// Authentication upstream hosts and call timeout.
    pub upstream: UpstreamEndpoints,
    /// Translation endpoint settings.
    pub translate: TranslateSettings,
    /// Logging level and format.
    pub logging: LoggingSettings,
}

/// Base URLs of the authentication upstreams, without trailing slashes.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UpstreamEndpoints {
    /// Client configuration service.
    pub clientconfig: String,
    /// OpenID discovery, token submission, authorization and authorize redirect.
    pub auth: String,
    /// Login initiation and login status.
    pub authenticate: String,
    /// QR login landing page embedded in generated login URLs.
    pub qr_login: String,
    /// Timeout applied to each call.
    pub timeout: Duration,
}

/// Translation client settings.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TranslateSettings {
    /// Translation endpoint base URL.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Upper bound on concurrent requests in one fan-out.
    pub concurrency: usize,
}

/// Logging settings handed to the telemetry crate.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Level directive used when `RUST_LOG` is unset.
    pub level: String,
    /// Output format name (`json` or `pretty`); inferred from the build when absent.
    pub format: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            session_ttl: defaults::SESSION_TTL,
            upstream: UpstreamEndpoints::default(),
            translate: TranslateSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Default for UpstreamEndpoints {
    fn default() -> Self {
        Self {
            clientconfig: defaults::CLIENTCONFIG_BASE_URL.to_string(),
            auth: defaults::AUTH_BASE_URL.to_string(),
            authenticate: defaults::AUTHENTICATE_BASE_URL.to_string(),
            qr_login: defaults::QR_LOGIN_BASE_URL.to_string(),
            timeout: defaults::UPSTREAM_TIMEOUT,
        }
    }
}

impl UpstreamEndpoints {
    /// Point every upstream at a single base URL. Used by tests that serve all
    /// hosts from one mock server.
    #[must_use]
    pub fn single_host(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/').to_string();
        Self {
            clientconfig: base.clone(),
            auth: base.clone(),
            authenticate: base.clone(),
            qr_login: base,
            timeout: defaults::UPSTREAM_TIMEOUT,
        }
    }
}

impl Default for TranslateSettings {
    fn default() -> Self {
        Self {
            base_url: defaults::TRANSLATE_BASE_URL.to_string(),
            timeout: defaults::TRANSLATE_TIMEOUT,
            concurrency: defaults::TRANSLATE_CONCURRENCY,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            format: None,
        }
    }
}
