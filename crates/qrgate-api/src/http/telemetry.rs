//! Per-route request counting.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::extract::MatchedPath;
use axum::http::Request;
use axum::response::Response;
use qrgate_telemetry::{Metrics, RequestScope};
use tower::{Layer, Service};

use crate::http::constants::HEADER_REQUEST_ID;
use crate::http::header_str;

/// Counts responses in `http_requests_total` by matched route and status.
#[derive(Clone)]
pub(crate) struct RequestMetricsLayer {
    telemetry: Metrics,
}

impl RequestMetricsLayer {
    pub(crate) const fn new(telemetry: Metrics) -> Self {
        Self { telemetry }
    }
}

impl<S> Layer<S> for RequestMetricsLayer {
    type Service = RequestMetrics<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestMetrics {
            inner,
            telemetry: self.telemetry.clone(),
        }
    }
}

#[derive(Clone)]
pub(crate) struct RequestMetrics<S> {
    inner: S,
    telemetry: Metrics,
}

impl<S, B> Service<Request<B>> for RequestMetrics<S>
where
    S: Service<Request<B>, Response = Response> + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Response, S::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<B>) -> Self::Future {
        // Only matched routes pass through here, so the label set stays bounded.
        let route = request
            .extensions()
            .get::<MatchedPath>()
            .map_or("unmatched", MatchedPath::as_str)
            .to_string();
        let request_id = header_str(request.headers(), HEADER_REQUEST_ID)
            .unwrap_or_default()
            .to_string();
        let telemetry = self.telemetry.clone();
        let pending = self.inner.call(request);

        let scope = RequestScope::new(request_id, route.clone());

        Box::pin(scope.run(async move {
            let response = pending.await?;
            telemetry.inc_http_request(&route, response.status().as_u16());
            Ok(response)
        }))
    }
}
