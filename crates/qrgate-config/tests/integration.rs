use std::collections::HashMap;
use std::time::Duration;

use qrgate_config::loader::{
    ENV_AUTH_BASE_URL, ENV_BIND_ADDR, ENV_LOG_FORMAT, ENV_SESSION_TTL_SECS,
    ENV_TRANSLATE_CONCURRENCY, ENV_UPSTREAM_TIMEOUT_SECS,
};
use qrgate_config::{ConfigError, ServerConfig, defaults};

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
        .collect();
    move |name| map.get(name).cloned()
}

#[test]
fn empty_environment_yields_defaults() -> anyhow::Result<()> {
    let config = ServerConfig::from_lookup(lookup(&[]))?;
    assert_eq!(config.bind_addr.to_string(), defaults::BIND_ADDR);
    assert_eq!(config.session_ttl, defaults::SESSION_TTL);
    assert_eq!(config.upstream.auth, defaults::AUTH_BASE_URL);
    assert_eq!(config.translate.concurrency, defaults::TRANSLATE_CONCURRENCY);
    assert_eq!(config.logging.level, "info");
    assert!(config.logging.format.is_none());
    Ok(())
}

#[test]
fn overrides_are_applied() -> anyhow::Result<()> {
    let config = ServerConfig::from_lookup(lookup(&[
        (ENV_BIND_ADDR, "0.0.0.0:8080"),
        (ENV_SESSION_TTL_SECS, "30"),
        (ENV_UPSTREAM_TIMEOUT_SECS, "4"),
        (ENV_TRANSLATE_CONCURRENCY, "2"),
        (ENV_AUTH_BASE_URL, "http://127.0.0.1:9000/"),
        (ENV_LOG_FORMAT, "json"),
    ]))?;
    assert_eq!(config.bind_addr.port(), 8080);
    assert_eq!(config.session_ttl, Duration::from_secs(30));
    assert_eq!(config.upstream.timeout, Duration::from_secs(4));
    assert_eq!(config.translate.concurrency, 2);
    assert_eq!(config.upstream.auth, "http://127.0.0.1:9000");
    assert_eq!(config.logging.format.as_deref(), Some("json"));
    Ok(())
}

#[test]
fn blank_values_are_treated_as_unset() -> anyhow::Result<()> {
    let config = ServerConfig::from_lookup(lookup(&[(ENV_SESSION_TTL_SECS, "  ")]))?;
    assert_eq!(config.session_ttl, defaults::SESSION_TTL);
    Ok(())
}

#[test]
fn invalid_values_name_the_field() {
    let err = ServerConfig::from_lookup(lookup(&[(ENV_TRANSLATE_CONCURRENCY, "0")]))
        .expect_err("zero concurrency must be rejected");
    assert_eq!(err.field(), ENV_TRANSLATE_CONCURRENCY);
    assert_eq!(err.reason(), "zero");
    assert!(matches!(
        err,
        ConfigError::InvalidField { value: Some(ref value), .. } if value == "0"
    ));

    let err = ServerConfig::from_lookup(lookup(&[(ENV_BIND_ADDR, "localhost")]))
        .expect_err("hostnames are not socket addresses");
    assert_eq!(err.reason(), "not_a_socket_address");
}
