//! Shared state handed to every handler.

use std::sync::Arc;
use std::time::Duration;

use qrgate_telemetry::Metrics;
use qrgate_translate::TranslateResult;
use qrgate_upstream::{AuthUpstream, LoginSession};
use tracing::debug;

use crate::localizer::SharedLocalizer;
use crate::sessions::{SessionId, SessionStore};

pub(crate) struct ApiState {
    pub(crate) upstream: Arc<dyn AuthUpstream>,
    localizer: SharedLocalizer,
    sessions: SessionStore,
    pub(crate) telemetry: Metrics,
}

impl ApiState {
    pub(crate) fn new(
        upstream: Arc<dyn AuthUpstream>,
        localizer: SharedLocalizer,
        session_ttl: Duration,
        telemetry: Metrics,
    ) -> Self {
        Self {
            upstream,
            localizer,
            sessions: SessionStore::new(session_ttl),
            telemetry,
        }
    }

    pub(crate) fn open_session(&self, session: LoginSession) -> SessionId {
        let id = self.sessions.insert(session);
        self.refresh_session_gauge();
        id
    }

    pub(crate) fn session(&self, id: &SessionId) -> Option<LoginSession> {
        let session = self.sessions.get(id);
        self.refresh_session_gauge();
        session
    }

    pub(crate) fn replace_session(&self, id: &SessionId, session: LoginSession) {
        if !self.sessions.replace(id, session) {
            debug!(session_id = %id, "session expired during refresh and was re-created");
        }
        self.refresh_session_gauge();
    }

    pub(crate) fn close_session(&self, id: &SessionId) {
        self.sessions.remove(id);
        self.refresh_session_gauge();
    }

    pub(crate) fn session_count(&self) -> usize {
        self.sessions.len()
    }

    fn refresh_session_gauge(&self) {
        self.telemetry.set_active_sessions(self.sessions.len());
    }

    pub(crate) async fn localize(&self, text: &str, locale: &str) -> TranslateResult<String> {
        let result = self.localizer.localize(text, locale).await;
        self.telemetry.inc_translation(result.is_ok());
        result
    }

    pub(crate) async fn localize_all(
        &self,
        texts: &[&str],
        locale: &str,
    ) -> TranslateResult<Vec<String>> {
        let result = self.localizer.localize_all(texts, locale).await;
        self.telemetry.inc_translation(result.is_ok());
        result
    }
}
