//! Default values for service configuration.
//!
//! # Design
//! - Keep upstream hosts in one place; tests override them with mock servers.

use std::time::Duration;

/// Default listener address.
pub const BIND_ADDR: &str = "127.0.0.1:5000";
/// Lifetime of an idle login session before it is evicted.
pub const SESSION_TTL: Duration = Duration::from_secs(600);
/// Timeout applied to every authentication upstream call.
pub const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(15);
/// Timeout applied to every translation request.
pub const TRANSLATE_TIMEOUT: Duration = Duration::from_secs(10);
/// Maximum number of concurrent translation requests per fan-out.
pub const TRANSLATE_CONCURRENCY: usize = 8;
/// Log level applied when neither `RUST_LOG` nor `QRGATE_LOG_LEVEL` is set.
pub const LOG_LEVEL: &str = "info";

/// Public translation endpoint.
pub const TRANSLATE_BASE_URL: &str = "https://translate.google.com";
/// Client configuration host.
pub const CLIENTCONFIG_BASE_URL: &str = "https://clientconfig.rpg.riotgames.com";
/// OpenID and token host.
pub const AUTH_BASE_URL: &str = "https://auth.riotgames.com";
/// Login initiation and status host.
pub const AUTHENTICATE_BASE_URL: &str = "https://authenticate.riotgames.com";
/// Host serving the QR login landing page.
pub const QR_LOGIN_BASE_URL: &str = "https://qrlogin.riotgames.com";
