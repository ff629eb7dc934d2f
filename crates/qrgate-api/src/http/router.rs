//! Router construction and server host.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    http::{
        HeaderName, HeaderValue, Method, Request,
        header::{ACCEPT_LANGUAGE, ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE, X_FRAME_OPTIONS},
    },
    middleware,
    response::Response,
    routing::{get, post},
};
use qrgate_telemetry::{Metrics, build_sha};
use qrgate_upstream::AuthUpstream;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{Span, info};

use crate::error::{ApiServerError, ApiServerResult};
use crate::http::constants::{
    HEADER_COUNTRY_CODE, HEADER_REQUEST_ID, HEADER_SESSION_ID, HEADER_SSID,
};
use crate::http::header_str;
use crate::http::health::{health, metrics};
use crate::http::login::login_url;
use crate::http::pages::{auth_page, demo, index, not_found};
use crate::http::reauth::cookie_reauth;
use crate::http::telemetry::RequestMetricsLayer;
use crate::http::token::get_token;
use crate::localizer::SharedLocalizer;
use crate::state::ApiState;

/// Axum router wrapper hosting the login proxy.
pub struct ApiServer {
    router: Router,
}

impl ApiServer {
    /// Build the router around the given upstream and translation backends.
    #[must_use]
    pub fn new(
        upstream: Arc<dyn AuthUpstream>,
        localizer: SharedLocalizer,
        session_ttl: Duration,
        telemetry: Metrics,
    ) -> Self {
        let state = Arc::new(ApiState::new(
            upstream,
            localizer,
            session_ttl,
            telemetry.clone(),
        ));
        let cors_layer = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([
                CONTENT_TYPE,
                ACCEPT_LANGUAGE,
                HeaderName::from_static(HEADER_COUNTRY_CODE),
                HeaderName::from_static(HEADER_SESSION_ID),
                HeaderName::from_static(HEADER_SSID),
            ])
            .expose_headers([HeaderName::from_static(HEADER_SESSION_ID)]);
        let trace_layer = TraceLayer::new_for_http()
            .make_span_with(|request: &Request<_>| {
                tracing::info_span!(
                    "http.request",
                    method = %request.method(),
                    route = %request.uri().path(),
                    request_id = %header_str(request.headers(), HEADER_REQUEST_ID).unwrap_or(""),
                    build_sha = %build_sha(),
                    status_code = tracing::field::Empty,
                    latency_ms = tracing::field::Empty
                )
            })
            .on_request(|_request: &Request<_>, _span: &Span| {})
            .on_response(|response: &Response, latency: Duration, span: &Span| {
                span.record("status_code", response.status().as_u16());
                span.record(
                    "latency_ms",
                    u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                );
            });
        let layered = ServiceBuilder::new()
            .layer(qrgate_telemetry::set_request_id_layer())
            .layer(qrgate_telemetry::propagate_request_id_layer())
            .layer(trace_layer)
            .layer(RequestMetricsLayer::new(telemetry));

        let router = Self::routes()
            .route_layer(layered)
            .fallback(not_found)
            .layer(middleware::map_response(apply_browser_headers))
            .layer(cors_layer)
            .with_state(state);

        Self { router }
    }

    fn routes() -> Router<Arc<ApiState>> {
        Router::new()
            .route("/", get(index))
            .route("/demo/", get(demo))
            .route("/auth/{lang}/", get(auth_page))
            .route("/login_url", post(login_url))
            .route("/get_token", post(get_token))
            .route("/cookie_reauth", post(cookie_reauth))
            .route("/health", get(health))
            .route("/metrics", get(metrics))
    }

    /// Serve the router on the supplied address until the listener fails.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener fails to bind or the server terminates unexpectedly.
    pub async fn serve(self, addr: SocketAddr) -> ApiServerResult<()> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ApiServerError::Bind { addr, source })?;
        info!(addr = %addr, "http listener bound");
        axum::serve(listener, self.router.into_make_service())
            .await
            .map_err(|source| ApiServerError::Serve { source })
    }

    #[cfg(test)]
    pub(crate) fn router(&self) -> Router {
        self.router.clone()
    }
}

/// Pages are meant to be embedded cross-origin.
async fn apply_browser_headers(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.remove(X_FRAME_OPTIONS);
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    response
}
