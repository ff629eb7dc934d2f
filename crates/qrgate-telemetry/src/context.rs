//! Request scope and process span helpers.
//!
//! # Design
//! - The scope of the inbound request lives in task-local storage, so outbound
//!   upstream calls can tag their logs without threading ids through every
//!   signature.
//! - The process span carries the service name, boot phase and build SHA.

use std::future::Future;
use std::sync::Arc;

use tracing::{Span, span::Entered};

use crate::init::build_sha;

/// Placeholder logged for fields read outside of any request.
pub const NO_REQUEST: &str = "-";

tokio::task_local! {
    static REQUEST_SCOPE: RequestScope;
}

/// Identity of the inbound request currently being served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestScope {
    request_id: Arc<str>,
    route: Arc<str>,
}

impl RequestScope {
    /// Scope for a request id and matched route.
    #[must_use]
    pub fn new(request_id: impl Into<String>, route: impl Into<String>) -> Self {
        Self {
            request_id: Arc::from(request_id.into()),
            route: Arc::from(route.into()),
        }
    }

    /// Scope of the request served by the current task, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        REQUEST_SCOPE.try_with(Clone::clone).ok()
    }

    /// Request id, as carried by `x-request-id`.
    #[must_use]
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Matched route template.
    #[must_use]
    pub fn route(&self) -> &str {
        &self.route
    }

    /// Drive `fut` with this scope visible to [`RequestScope::current`].
    pub async fn run<F: Future>(self, fut: F) -> F::Output {
        REQUEST_SCOPE.scope(self, fut).await
    }
}

/// Request id of the current task, or [`NO_REQUEST`].
#[must_use]
pub fn current_request_id() -> String {
    RequestScope::current().map_or_else(
        || NO_REQUEST.to_string(),
        |scope| scope.request_id().to_string(),
    )
}

/// Matched route of the current task, or [`NO_REQUEST`].
#[must_use]
pub fn current_route() -> String {
    RequestScope::current().map_or_else(
        || NO_REQUEST.to_string(),
        |scope| scope.route().to_string(),
    )
}

/// Keeps the process span entered until dropped.
pub struct ServiceSpanGuard {
    _entered: Entered<'static>,
}

impl ServiceSpanGuard {
    /// Enter a `service` span tagged with the boot phase and build SHA.
    #[must_use]
    pub fn enter(service: &'static str, phase: &str) -> Self {
        let span: &'static Span = Box::leak(Box::new(tracing::info_span!(
            "service",
            service = service,
            phase = %phase,
            build_sha = %build_sha()
        )));
        Self {
            _entered: span.enter(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scope_is_visible_only_inside_run() {
        assert!(RequestScope::current().is_none());
        assert_eq!(current_request_id(), NO_REQUEST);

        let route = RequestScope::new("req-7", "/get_token")
            .run(async {
                let scope = RequestScope::current().expect("scope inside run");
                assert_eq!(scope.request_id(), "req-7");
                assert_eq!(current_request_id(), "req-7");
                current_route()
            })
            .await;

        assert_eq!(route, "/get_token");
        assert_eq!(current_route(), NO_REQUEST);
    }

    #[tokio::test]
    async fn nested_scopes_shadow_outer_scope() {
        let inner = RequestScope::new("outer", "/login_url")
            .run(async {
                RequestScope::new("inner", "/cookie_reauth")
                    .run(async { RequestScope::current() })
                    .await
            })
            .await;
        assert_eq!(inner, Some(RequestScope::new("inner", "/cookie_reauth")));
    }

    #[test]
    fn service_span_guard_can_be_dropped() {
        let guard = ServiceSpanGuard::enter("qrgate", "test");
        drop(guard);
    }
}
