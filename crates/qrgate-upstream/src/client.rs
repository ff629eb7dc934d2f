//! Shared HTTP plumbing for the authentication upstreams.
//!
//! # Design
//!
//! - Each login flow gets its own cookie-carrying `reqwest::Client`; the
//!   upstreams key the QR session on those cookies.
//! - The authorize redirect is read from a client that never follows redirects.
//! - Every call is counted in `upstream_calls_total` by call name and outcome.

use std::sync::Arc;

use qrgate_config::UpstreamEndpoints;
use qrgate_telemetry::{Metrics, UpstreamOutcome, current_request_id, current_route};
use reqwest::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use reqwest::redirect::Policy;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{UpstreamCall, UpstreamError, UpstreamResult};
use crate::trace::{RandomTraceContext, TraceContextSource};

const HEADER_BAGGAGE: &str = "baggage";
const HEADER_TRACEPARENT: &str = "traceparent";
const HEADER_COUNTRY_CODE: &str = "country-code";

/// User agent the desktop client presents to each upstream service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ClientAgent {
    ClientConfig,
    RsoAuth,
    RsoAuthenticator,
    RsoAuthExchange,
}

impl ClientAgent {
    pub(crate) const fn user_agent(self) -> &'static str {
        match self {
            Self::ClientConfig => {
                "RiotGamesApi/24.9.1.4445 client-config (Windows;10;;Professional, x64) riot_client/0"
            }
            Self::RsoAuth => {
                "RiotGamesApi/24.9.1.4445 rso-auth (Windows;10;;Professional, x64) riot_client/0"
            }
            Self::RsoAuthenticator => {
                "RiotGamesApi/24.9.1.4445 rso-authenticator (Windows;10;;Professional, x64) riot_client/0"
            }
            Self::RsoAuthExchange => {
                "RiotGamesApi/24.10.1.4471 rso-auth (Windows;10;;Professional, x64) riot_client/0"
            }
        }
    }
}

/// Client for the QR login, token exchange and authorize endpoints.
#[derive(Clone)]
pub struct RiotAuthClient {
    endpoints: UpstreamEndpoints,
    trace: Arc<dyn TraceContextSource>,
    metrics: Metrics,
    redirectless: Client,
}

impl RiotAuthClient {
    /// Build a client for the given endpoints with random correlation ids.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(endpoints: UpstreamEndpoints, metrics: Metrics) -> UpstreamResult<Self> {
        let redirectless = Client::builder()
            .timeout(endpoints.timeout)
            .redirect(Policy::none())
            .build()
            .map_err(|source| UpstreamError::ClientBuild { source })?;
        Ok(Self {
            endpoints,
            trace: Arc::new(RandomTraceContext),
            metrics,
            redirectless,
        })
    }

    /// Replace the correlation id source.
    #[must_use]
    pub fn with_trace_source(mut self, trace: Arc<dyn TraceContextSource>) -> Self {
        self.trace = trace;
        self
    }

    /// Configured upstream endpoints.
    #[must_use]
    pub const fn endpoints(&self) -> &UpstreamEndpoints {
        &self.endpoints
    }

    pub(crate) fn trace(&self) -> &dyn TraceContextSource {
        self.trace.as_ref()
    }

    pub(crate) const fn redirectless(&self) -> &Client {
        &self.redirectless
    }

    /// Fresh cookie-carrying HTTP session.
    pub(crate) fn cookie_session(&self) -> UpstreamResult<Client> {
        Client::builder()
            .cookie_store(true)
            .timeout(self.endpoints.timeout)
            .build()
            .map_err(|source| UpstreamError::ClientBuild { source })
    }

    /// Headers the desktop client attaches to every call of a flow.
    ///
    /// A fresh `traceparent` is generated on each invocation.
    pub(crate) fn correlation_headers(
        &self,
        sdk_sid: Uuid,
        agent: ClientAgent,
        country_code: Option<&str>,
    ) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(agent.user_agent()));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Ok(value) = HeaderValue::from_str(&format!("sdksid={sdk_sid}")) {
            headers.insert(HeaderName::from_static(HEADER_BAGGAGE), value);
        }
        if let Ok(value) = HeaderValue::from_str(&self.trace.next_ids().traceparent()) {
            headers.insert(HeaderName::from_static(HEADER_TRACEPARENT), value);
        }
        if let Some(code) = country_code {
            match HeaderValue::from_str(code) {
                Ok(value) => {
                    headers.insert(HeaderName::from_static(HEADER_COUNTRY_CODE), value);
                }
                Err(_) => debug!(country_code = code, "country code is not a valid header value"),
            }
        }
        headers
    }

    /// Send a request, counting transport failures.
    pub(crate) async fn send(
        &self,
        call: UpstreamCall,
        request: RequestBuilder,
    ) -> UpstreamResult<Response> {
        request.send().await.map_err(|source| {
            warn!(
                call = call.as_str(),
                request_id = %current_request_id(),
                route = %current_route(),
                error = %source,
                "upstream request failed"
            );
            self.record(call, UpstreamOutcome::Transport);
            UpstreamError::Transport { call, source }
        })
    }

    /// Pass the response through when `accept` holds for its status and count
    /// the call as successful.
    pub(crate) fn require_status(
        &self,
        call: UpstreamCall,
        response: Response,
        accept: impl Fn(StatusCode) -> bool,
    ) -> UpstreamResult<Response> {
        let response = self.check_status(call, response, accept)?;
        self.record(call, UpstreamOutcome::Ok);
        Ok(response)
    }

    /// Like [`Self::require_status`], but leaves the success count to the
    /// caller, which still has a body to read.
    pub(crate) fn check_status(
        &self,
        call: UpstreamCall,
        response: Response,
        accept: impl Fn(StatusCode) -> bool,
    ) -> UpstreamResult<Response> {
        let status = response.status();
        if accept(status) {
            Ok(response)
        } else {
            warn!(
                call = call.as_str(),
                request_id = %current_request_id(),
                route = %current_route(),
                status = status.as_u16(),
                "upstream returned an unexpected status"
            );
            self.record(call, UpstreamOutcome::Rejected);
            Err(UpstreamError::UnexpectedStatus {
                call,
                status: status.as_u16(),
            })
        }
    }

    pub(crate) fn record(&self, call: UpstreamCall, outcome: UpstreamOutcome) {
        self.metrics.inc_upstream_call(call.as_str(), outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::fixed::CountingTraceContext;

    #[test]
    fn correlation_headers_carry_session_and_trace() -> anyhow::Result<()> {
        let client = RiotAuthClient::new(UpstreamEndpoints::default(), Metrics::new()?)?
            .with_trace_source(Arc::new(CountingTraceContext::default()));
        let sdk_sid = Uuid::from_u128(7);

        let headers = client.correlation_headers(sdk_sid, ClientAgent::RsoAuth, Some("ko-KR"));
        assert_eq!(
            headers.get("baggage").and_then(|v| v.to_str().ok()),
            Some("sdksid=00000000-0000-0000-0000-000000000007")
        );
        assert_eq!(
            headers.get("traceparent").and_then(|v| v.to_str().ok()),
            Some("00-00000000000000000000000000000001-0000000000000001-00")
        );
        assert_eq!(
            headers.get("country-code").and_then(|v| v.to_str().ok()),
            Some("ko-KR")
        );

        let next = client.correlation_headers(sdk_sid, ClientAgent::RsoAuthExchange, None);
        assert!(next.get("country-code").is_none());
        assert_ne!(headers.get("traceparent"), next.get("traceparent"));
        assert!(
            next.get(USER_AGENT)
                .and_then(|v| v.to_str().ok())
                .is_some_and(|agent| agent.starts_with("RiotGamesApi/24.10.1.4471 rso-auth"))
        );
        Ok(())
    }
}
