//! `POST /login_url`: start a QR login.

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue, header::ACCEPT_LANGUAGE},
    response::{IntoResponse, Response},
};
use qrgate_upstream::LoginHandshake;
use serde::Serialize;
use tracing::{info, warn};

use crate::http::constants::{HEADER_COUNTRY_CODE, HEADER_SESSION_ID};
use crate::http::errors::ApiError;
use crate::http::header_str;
use crate::i18n::resolve_locale;
use crate::state::ApiState;

#[derive(Debug, Serialize)]
pub(crate) struct LoginUrlResponse {
    pub(crate) session_id: String,
    pub(crate) login_url: String,
    pub(crate) cluster: String,
    pub(crate) suuid: String,
    pub(crate) timestamp: String,
}

pub(crate) async fn login_url(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let requested = header_str(&headers, HEADER_COUNTRY_CODE);
    let locale = resolve_locale(requested, header_str(&headers, ACCEPT_LANGUAGE)).ok_or_else(
        || {
            ApiError::bad_request(format!(
                "Unsupported language: {}",
                requested.unwrap_or_default().trim()
            ))
        },
    )?;

    let LoginHandshake {
        ticket,
        login_url,
        session,
    } = state.upstream.initiate_login(locale).await.map_err(|err| {
        warn!(error = %err, locale, "login handshake failed");
        ApiError::from_upstream(&err)
    })?;
    let session_id = state.open_session(session);
    info!(session_id = %session_id, locale, "login url issued");

    let mut response = Json(LoginUrlResponse {
        session_id: session_id.to_string(),
        login_url,
        cluster: ticket.cluster,
        suuid: ticket.suuid,
        timestamp: ticket.timestamp,
    })
    .into_response();
    if let Ok(value) = HeaderValue::from_str(&session_id.to_string()) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(HEADER_SESSION_ID), value);
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::test_support::{StubUpstream, body_json, test_state_with};
    use anyhow::Result;
    use axum::http::StatusCode;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[tokio::test]
    async fn issues_url_and_session_header() -> Result<()> {
        let upstream = StubUpstream::ready();
        let state = test_state_with(upstream.clone());
        let response = login_url(
            State(Arc::clone(&state)),
            headers(&[(HEADER_COUNTRY_CODE, "fr-FR")]),
        )
        .await
        .expect("login url issued");

        let header = response
            .headers()
            .get(HEADER_SESSION_ID)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .expect("session header");
        let body = body_json(response).await?;
        assert_eq!(body["session_id"], header.as_str());
        assert_eq!(body["cluster"], "cluster-1");
        assert_eq!(body["login_url"], "https://qr.test/riotmobile?n=1");
        assert_eq!(upstream.initiated_locales(), vec!["fr-FR".to_string()]);
        assert_eq!(state.session_count(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn auto_negotiates_from_accept_language() {
        let upstream = StubUpstream::ready();
        let state = test_state_with(upstream.clone());
        login_url(
            State(state),
            headers(&[
                (HEADER_COUNTRY_CODE, "auto"),
                ("accept-language", "ja-JP,ja;q=0.9"),
            ]),
        )
        .await
        .expect("login url issued");
        assert_eq!(upstream.initiated_locales(), vec!["ja-JP".to_string()]);
    }

    #[tokio::test]
    async fn missing_header_defaults_to_english() {
        let upstream = StubUpstream::ready();
        login_url(State(test_state_with(upstream.clone())), HeaderMap::new())
            .await
            .expect("login url issued");
        assert_eq!(upstream.initiated_locales(), vec!["en-US".to_string()]);
    }

    #[tokio::test]
    async fn unsupported_locale_is_rejected_without_upstream_calls() {
        let upstream = StubUpstream::ready();
        let err = login_url(
            State(test_state_with(upstream.clone())),
            headers(&[(HEADER_COUNTRY_CODE, "xx-XX")]),
        )
        .await
        .expect_err("unsupported locale");
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "Unsupported language: xx-XX");
        assert!(upstream.initiated_locales().is_empty());
    }

    #[tokio::test]
    async fn missing_cluster_is_bad_request() {
        let state = test_state_with(StubUpstream::missing_cluster());
        let err = login_url(State(Arc::clone(&state)), HeaderMap::new())
            .await
            .expect_err("missing cluster");
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            err.message(),
            "Required data is missing from the response."
        );
        assert_eq!(state.session_count(), 0);
    }
}
