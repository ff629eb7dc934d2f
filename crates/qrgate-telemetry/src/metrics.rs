//! Prometheus-backed metrics registry.
//!
//! # Design
//! - Encapsulates collector registration to keep the public API small.
//! - Upstream calls are labelled by call name so a single failing handshake
//!   step is visible without log spelunking.

use std::sync::Arc;

use prometheus::{Encoder, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

use crate::error::{Result, TelemetryError};

/// Prometheus-backed metrics registry shared across services.
#[derive(Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

struct MetricsInner {
    registry: Registry,
    http_requests_total: IntCounterVec,
    upstream_calls_total: IntCounterVec,
    translations_total: IntCounterVec,
    active_sessions: IntGauge,
}

/// Outcome label recorded for an upstream call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamOutcome {
    /// The call returned the expected status.
    Ok,
    /// The call returned an unexpected status or body.
    Rejected,
    /// The call failed before a response was received.
    Transport,
}

impl UpstreamOutcome {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Rejected => "rejected",
            Self::Transport => "transport",
        }
    }
}

impl Metrics {
    /// Construct a new metrics registry with the standard collectors registered.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the Prometheus collectors cannot be
    /// registered.
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let http_requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "Total HTTP requests received"),
            &["route", "code"],
        )
        .map_err(|source| TelemetryError::MetricsRegister {
            name: "http_requests_total",
            source,
        })?;
        let upstream_calls_total = IntCounterVec::new(
            Opts::new(
                "upstream_calls_total",
                "Outbound authentication calls by call name and outcome",
            ),
            &["call", "outcome"],
        )
        .map_err(|source| TelemetryError::MetricsRegister {
            name: "upstream_calls_total",
            source,
        })?;
        let translations_total = IntCounterVec::new(
            Opts::new("translations_total", "Translation lookups by outcome"),
            &["outcome"],
        )
        .map_err(|source| TelemetryError::MetricsRegister {
            name: "translations_total",
            source,
        })?;
        let active_sessions = IntGauge::with_opts(Opts::new(
            "active_sessions",
            "Login sessions held by the session store",
        ))
        .map_err(|source| TelemetryError::MetricsRegister {
            name: "active_sessions",
            source,
        })?;

        Self::register(&registry, "http_requests_total", &http_requests_total)?;
        Self::register(&registry, "upstream_calls_total", &upstream_calls_total)?;
        Self::register(&registry, "translations_total", &translations_total)?;
        Self::register(&registry, "active_sessions", &active_sessions)?;

        Ok(Self {
            inner: Arc::new(MetricsInner {
                registry,
                http_requests_total,
                upstream_calls_total,
                translations_total,
                active_sessions,
            }),
        })
    }

    fn register<C>(registry: &Registry, name: &'static str, collector: &C) -> Result<()>
    where
        C: prometheus::core::Collector + Clone + 'static,
    {
        registry
            .register(Box::new(collector.clone()))
            .map_err(|source| TelemetryError::MetricsRegister { name, source })
    }

    /// Increment the HTTP request counter for the given route and status code.
    pub fn inc_http_request(&self, route: &str, status: u16) {
        self.inner
            .http_requests_total
            .with_label_values(&[route, &status.to_string()])
            .inc();
    }

    /// Record the outcome of an outbound upstream call.
    pub fn inc_upstream_call(&self, call: &str, outcome: UpstreamOutcome) {
        self.inner
            .upstream_calls_total
            .with_label_values(&[call, outcome.as_str()])
            .inc();
    }

    /// Record a translation lookup outcome.
    pub fn inc_translation(&self, success: bool) {
        let outcome = if success { "ok" } else { "failed" };
        self.inner
            .translations_total
            .with_label_values(&[outcome])
            .inc();
    }

    /// Set the active session gauge.
    pub fn set_active_sessions(&self, count: usize) {
        self.inner
            .active_sessions
            .set(i64::try_from(count).unwrap_or(i64::MAX));
    }

    /// Render the metrics registry using the Prometheus text exposition format.
    ///
    /// # Errors
    ///
    /// Returns an error if the metrics cannot be encoded or if the encoded
    /// buffer is not valid UTF-8.
    pub fn render(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.inner.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|source| TelemetryError::MetricsEncode { source })?;
        String::from_utf8(buffer).map_err(|source| TelemetryError::MetricsUtf8 { source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn active_session_gauge_tracks_latest_count() -> Result<()> {
        let metrics = Metrics::new()?;
        metrics.set_active_sessions(3);
        metrics.set_active_sessions(2);
        assert!(metrics.render()?.lines().any(|line| line == "active_sessions 2"));
        Ok(())
    }

    #[test]
    fn render_includes_labelled_counters() -> Result<()> {
        let metrics = Metrics::new()?;
        metrics.inc_http_request("/login_url", 200);
        metrics.inc_upstream_call("login.initiate", UpstreamOutcome::Rejected);
        metrics.inc_translation(false);

        let rendered = metrics.render()?;
        assert!(rendered.contains("http_requests_total"));
        assert!(rendered.contains("route=\"/login_url\""));
        assert!(rendered.contains("call=\"login.initiate\""));
        assert!(rendered.contains("outcome=\"rejected\""));
        assert!(rendered.contains("translations_total{outcome=\"failed\"} 1"));
        Ok(())
    }
}
