use std::sync::Arc;

use qrgate_api::ApiServer;
use qrgate_config::{LoggingSettings, ServerConfig};
use qrgate_telemetry::{LogFormat, LoggingConfig, Metrics, ServiceSpanGuard};
use qrgate_translate::Translator;
use qrgate_upstream::RiotAuthClient;
use tracing::info;

use crate::error::{AppError, AppResult};

/// Build identifier baked in at compile time, `dev` for local builds.
const BUILD_SHA: &str = match option_env!("QRGATE_BUILD_SHA") {
    Some(sha) => sha,
    None => "dev",
};

/// Dependencies required to bootstrap the qrgate service.
pub(crate) struct BootstrapDependencies {
    config: ServerConfig,
    telemetry: Metrics,
}

impl BootstrapDependencies {
    /// Construct production dependencies from the environment for the binary entrypoint.
    pub(crate) fn from_env() -> AppResult<Self> {
        let config =
            ServerConfig::from_env().map_err(|err| AppError::config("config.from_env", err))?;
        Self::with_config(config)
    }

    pub(crate) fn with_config(config: ServerConfig) -> AppResult<Self> {
        let telemetry =
            Metrics::new().map_err(|err| AppError::telemetry("telemetry.metrics", err))?;
        Ok(Self { config, telemetry })
    }
}

/// Entry point for the qrgate boot sequence.
///
/// # Errors
///
/// Returns an error if configuration is invalid, telemetry cannot be installed,
/// an outbound client cannot be built, or the listener fails.
pub async fn run_app() -> AppResult<()> {
    let dependencies = BootstrapDependencies::from_env()?;
    run_app_with(dependencies).await
}

/// Boot sequence that relies entirely on injected dependencies.
pub(crate) async fn run_app_with(dependencies: BootstrapDependencies) -> AppResult<()> {
    let BootstrapDependencies { config, telemetry } = dependencies;

    qrgate_telemetry::init_logging(&logging_config(&config.logging))
        .map_err(|err| AppError::telemetry("telemetry.init", err))?;
    let _span = ServiceSpanGuard::enter("qrgate", "bootstrap");

    info!(
        bind_addr = %config.bind_addr,
        session_ttl_secs = config.session_ttl.as_secs(),
        "qrgate bootstrap starting"
    );

    let api = build_api(&config, telemetry)?;

    info!("serving login proxy");
    api.serve(config.bind_addr)
        .await
        .map_err(|err| AppError::api_server("api_server.serve", err))
}

fn build_api(config: &ServerConfig, telemetry: Metrics) -> AppResult<ApiServer> {
    let upstream = RiotAuthClient::new(config.upstream.clone(), telemetry.clone())
        .map_err(|err| AppError::upstream("upstream.client", err))?;
    let translator = Translator::new(&config.translate)
        .map_err(|err| AppError::translate("translate.client", err))?;

    Ok(ApiServer::new(
        Arc::new(upstream),
        Arc::new(translator),
        config.session_ttl,
        telemetry,
    ))
}

fn logging_config(settings: &LoggingSettings) -> LoggingConfig<'_> {
    LoggingConfig {
        level: settings.level.as_str(),
        format: LogFormat::from_name(settings.format.as_deref()),
        build_sha: BUILD_SHA,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    fn lookup(vars: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |name| {
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value).to_string())
        }
    }

    #[test]
    fn logging_config_maps_level_and_format() {
        let settings = LoggingSettings {
            level: "debug".to_string(),
            format: Some("json".to_string()),
        };
        let config = logging_config(&settings);
        assert_eq!(config.level, "debug");
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.build_sha, BUILD_SHA);
    }

    #[test]
    fn logging_config_infers_format_when_unset() {
        let settings = LoggingSettings {
            level: "info".to_string(),
            format: None,
        };
        assert_eq!(logging_config(&settings).format, LogFormat::infer());
    }

    #[test]
    fn dependencies_build_from_default_config() -> Result<()> {
        let config = ServerConfig::from_lookup(lookup(&[]))?;
        let dependencies = BootstrapDependencies::with_config(config)?;
        assert_eq!(dependencies.config.bind_addr.port(), 5000);
        Ok(())
    }

    #[test]
    fn api_builds_from_overridden_endpoints() -> Result<()> {
        let config = ServerConfig::from_lookup(lookup(&[
            ("QRGATE_AUTH_BASE_URL", "http://127.0.0.1:9"),
            ("QRGATE_TRANSLATE_BASE_URL", "http://127.0.0.1:9/m"),
        ]))?;
        let dependencies = BootstrapDependencies::with_config(config)?;
        build_api(&dependencies.config, dependencies.telemetry)?;
        Ok(())
    }

    #[test]
    fn invalid_environment_surfaces_config_error() {
        let err = ServerConfig::from_lookup(lookup(&[("QRGATE_BIND_ADDR", "not-an-addr")]))
            .map_err(|err| AppError::config("config.from_env", err));
        assert!(matches!(
            err,
            Err(AppError::Config {
                operation: "config.from_env",
                ..
            })
        ));
    }
}
