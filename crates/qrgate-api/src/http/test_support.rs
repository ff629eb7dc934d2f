//! Stub backends shared by handler and router tests.

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::response::Response;
use qrgate_telemetry::Metrics;
use qrgate_translate::{TranslateError, TranslateResult};
use qrgate_upstream::{
    AuthUpstream, AuthorizationGrant, ExtractionSubject, LoginHandshake, LoginSession,
    LoginStatus, LoginTicket, UpstreamCall, UpstreamError, UpstreamResult,
};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::localizer::{LocalizerFacade, SharedLocalizer};
use crate::state::ApiState;

#[derive(Clone, Copy)]
pub(crate) enum StubReauth {
    Token,
    Invalid,
    Unreadable,
}

#[derive(Default)]
struct Calls {
    initiated: Vec<String>,
    exchanged: Vec<String>,
    polls: VecDeque<Option<Value>>,
}

/// Scripted upstream: handshakes succeed unless told otherwise, polls pop
/// queued results and default to a pending status.
pub(crate) struct StubUpstream {
    missing_cluster: bool,
    grant_uri: String,
    reauth: StubReauth,
    calls: Mutex<Calls>,
}

impl StubUpstream {
    fn build(missing_cluster: bool) -> Self {
        Self {
            missing_cluster,
            grant_uri: "http://localhost/redirect#access_token=ABC123&id_token=XYZ".to_string(),
            reauth: StubReauth::Token,
            calls: Mutex::new(Calls::default()),
        }
    }

    pub(crate) fn ready() -> Arc<Self> {
        Arc::new(Self::build(false))
    }

    pub(crate) fn missing_cluster() -> Arc<Self> {
        Arc::new(Self::build(true))
    }

    pub(crate) fn with_grant_uri(self: Arc<Self>, uri: &str) -> Arc<Self> {
        let mut stub = Self::build(self.missing_cluster);
        stub.grant_uri = uri.to_string();
        stub.reauth = self.reauth;
        Arc::new(stub)
    }

    pub(crate) fn with_reauth(self: Arc<Self>, reauth: StubReauth) -> Arc<Self> {
        let mut stub = Self::build(self.missing_cluster);
        stub.grant_uri.clone_from(&self.grant_uri);
        stub.reauth = reauth;
        Arc::new(stub)
    }

    pub(crate) fn push_poll(&self, body: Option<Value>) {
        self.calls.lock().expect("calls lock").polls.push_back(body);
    }

    pub(crate) fn initiated_locales(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").initiated.clone()
    }

    pub(crate) fn exchanged_tokens(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").exchanged.clone()
    }
}

#[async_trait]
impl AuthUpstream for StubUpstream {
    async fn initiate_login(&self, country_code: &str) -> UpstreamResult<LoginHandshake> {
        if self.missing_cluster {
            return Err(UpstreamError::MissingField {
                call: UpstreamCall::LoginInitiate,
                field: "cluster",
            });
        }
        let n = {
            let mut calls = self.calls.lock().expect("calls lock");
            calls.initiated.push(country_code.to_string());
            calls.initiated.len()
        };
        Ok(LoginHandshake {
            ticket: LoginTicket {
                cluster: format!("cluster-{n}"),
                suuid: format!("suuid-{n}"),
                timestamp: "1700000000".to_string(),
            },
            login_url: format!("https://qr.test/riotmobile?n={n}"),
            session: LoginSession::new(
                reqwest::Client::new(),
                Uuid::from_u128(n as u128),
                country_code,
            ),
        })
    }

    async fn poll_login(&self, _session: &LoginSession) -> UpstreamResult<Option<LoginStatus>> {
        let next = self
            .calls
            .lock()
            .expect("calls lock")
            .polls
            .pop_front()
            .unwrap_or_else(|| Some(json!({ "type": "multifactor" })));
        Ok(next.and_then(|body| match body {
            Value::Object(map) => Some(LoginStatus::new(map)),
            _ => None,
        }))
    }

    async fn exchange_login_token(&self, login_token: &str) -> UpstreamResult<AuthorizationGrant> {
        self.calls
            .lock()
            .expect("calls lock")
            .exchanged
            .push(login_token.to_string());
        Ok(AuthorizationGrant {
            uri: self.grant_uri.clone(),
            cookies: BTreeMap::from([("ssid".to_string(), "cookie-value".to_string())]),
        })
    }

    async fn reauthorize_with_cookie(&self, _ssid: &str) -> UpstreamResult<String> {
        match self.reauth {
            StubReauth::Token => Ok("REAUTH".to_string()),
            StubReauth::Invalid => Err(UpstreamError::InvalidCookie),
            StubReauth::Unreadable => Err(UpstreamError::Extraction {
                subject: ExtractionSubject::AuthorizeRedirect,
            }),
        }
    }
}

/// Localizer that tags texts with the locale, or always fails.
pub(crate) struct StubLocalizer {
    failing: bool,
}

impl StubLocalizer {
    pub(crate) fn echo() -> SharedLocalizer {
        Arc::new(Self { failing: false })
    }

    pub(crate) fn failing() -> SharedLocalizer {
        Arc::new(Self { failing: true })
    }
}

#[async_trait]
impl LocalizerFacade for StubLocalizer {
    async fn localize(&self, text: &str, locale: &str) -> TranslateResult<String> {
        if self.failing {
            return Err(TranslateError::NoMatch {
                target: locale.to_string(),
            });
        }
        if locale == "ko-KR" {
            return Ok(text.to_string());
        }
        Ok(format!("[{locale}] {text}"))
    }

    async fn localize_all(&self, texts: &[&str], locale: &str) -> TranslateResult<Vec<String>> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.localize(text, locale).await?);
        }
        Ok(out)
    }
}

pub(crate) fn test_state() -> Arc<ApiState> {
    test_state_with(StubUpstream::ready())
}

pub(crate) fn test_state_with(upstream: Arc<StubUpstream>) -> Arc<ApiState> {
    test_state_with_localizer(upstream, StubLocalizer::echo())
}

pub(crate) fn test_state_with_localizer(
    upstream: Arc<StubUpstream>,
    localizer: SharedLocalizer,
) -> Arc<ApiState> {
    Arc::new(ApiState::new(
        upstream,
        localizer,
        Duration::from_secs(60),
        Metrics::new().expect("metrics registry"),
    ))
}

pub(crate) async fn body_text(response: Response) -> anyhow::Result<String> {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok(String::from_utf8(bytes.to_vec())?)
}

pub(crate) async fn body_json(response: Response) -> anyhow::Result<Value> {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}
