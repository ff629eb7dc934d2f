//! # Design
//!
//! - Constant messages; the failing bootstrap step travels as `operation`.
//! - Source errors are preserved rather than logged at the call site.

use thiserror::Error;

/// Result alias for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("configuration operation failed")]
    Config {
        /// Operation identifier.
        operation: &'static str,
        /// Source configuration error.
        source: qrgate_config::ConfigError,
    },
    /// Telemetry could not be initialised.
    #[error("telemetry operation failed")]
    Telemetry {
        /// Operation identifier.
        operation: &'static str,
        /// Source telemetry error.
        source: qrgate_telemetry::TelemetryError,
    },
    /// The translation client could not be built.
    #[error("translation client operation failed")]
    Translate {
        /// Operation identifier.
        operation: &'static str,
        /// Source translation error.
        source: qrgate_translate::TranslateError,
    },
    /// The upstream client could not be built.
    #[error("upstream client operation failed")]
    Upstream {
        /// Operation identifier.
        operation: &'static str,
        /// Source upstream error.
        source: qrgate_upstream::UpstreamError,
    },
    /// The HTTP server failed.
    #[error("api server operation failed")]
    ApiServer {
        /// Operation identifier.
        operation: &'static str,
        /// Source API server error.
        source: qrgate_api::ApiServerError,
    },
}

impl AppError {
    pub(crate) const fn config(
        operation: &'static str,
        source: qrgate_config::ConfigError,
    ) -> Self {
        Self::Config { operation, source }
    }

    pub(crate) const fn telemetry(
        operation: &'static str,
        source: qrgate_telemetry::TelemetryError,
    ) -> Self {
        Self::Telemetry { operation, source }
    }

    pub(crate) const fn translate(
        operation: &'static str,
        source: qrgate_translate::TranslateError,
    ) -> Self {
        Self::Translate { operation, source }
    }

    pub(crate) const fn upstream(
        operation: &'static str,
        source: qrgate_upstream::UpstreamError,
    ) -> Self {
        Self::Upstream { operation, source }
    }

    pub(crate) const fn api_server(
        operation: &'static str,
        source: qrgate_api::ApiServerError,
    ) -> Self {
        Self::ApiServer { operation, source }
    }
}
