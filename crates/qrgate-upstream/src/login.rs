//! QR login handshake and login status polling.

use reqwest::Client;
use serde_json::{Map, Value};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::client::{ClientAgent, RiotAuthClient};
use crate::contracts::{ClientConfigQuery, LoginInitRequest, LoginInitResponse, TextOrNumber};
use crate::error::{UpstreamCall, UpstreamError, UpstreamResult};
use crate::region;
use qrgate_telemetry::UpstreamOutcome;

/// Cookie-carrying HTTP session of one QR login.
#[derive(Debug, Clone)]
pub struct LoginSession {
    client: Client,
    sdk_sid: Uuid,
    country_code: String,
}

impl LoginSession {
    /// Wrap an existing HTTP session.
    #[must_use]
    pub fn new(client: Client, sdk_sid: Uuid, country_code: impl Into<String>) -> Self {
        Self {
            client,
            sdk_sid,
            country_code: country_code.into(),
        }
    }

    /// Client session id sent as `baggage`.
    #[must_use]
    pub const fn sdk_sid(&self) -> Uuid {
        self.sdk_sid
    }

    /// Locale code the session was opened for.
    #[must_use]
    pub fn country_code(&self) -> &str {
        &self.country_code
    }
}

/// Identifiers of a QR login returned by the initiation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginTicket {
    /// Upstream cluster.
    pub cluster: String,
    /// QR session identifier.
    pub suuid: String,
    /// Creation timestamp as sent by the upstream.
    pub timestamp: String,
}

impl LoginTicket {
    /// Mobile login URL encoded in the QR code.
    #[must_use]
    pub fn login_url(&self, qr_login_base: &str) -> String {
        format!(
            "{qr_login_base}/riotmobile?cluster={}&suuid={}&timestamp={}\
             &utm_source=riotclient&utm_medium=client&utm_campaign=qrlogin-riotmobile",
            self.cluster, self.suuid, self.timestamp
        )
    }

    fn from_response(response: LoginInitResponse) -> UpstreamResult<Self> {
        let field = |value: Option<TextOrNumber>, name: &'static str| {
            value
                .and_then(TextOrNumber::into_text)
                .ok_or(UpstreamError::MissingField {
                    call: UpstreamCall::LoginInitiate,
                    field: name,
                })
        };
        Ok(Self {
            cluster: field(response.cluster, "cluster")?,
            suuid: field(response.suuid, "suuid")?,
            timestamp: field(response.timestamp, "timestamp")?,
        })
    }
}

/// Result of a completed handshake.
#[derive(Debug, Clone)]
pub struct LoginHandshake {
    /// Identifiers returned by the initiation call.
    pub ticket: LoginTicket,
    /// Mobile login URL.
    pub login_url: String,
    /// Session to poll on.
    pub session: LoginSession,
}

/// Login status document returned by a successful poll.
///
/// The upstream body is kept as-is so that it can be relayed to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginStatus(Map<String, Value>);

impl LoginStatus {
    /// Wrap a raw status body.
    #[must_use]
    pub const fn new(body: Map<String, Value>) -> Self {
        Self(body)
    }

    /// Value of the `type` field.
    #[must_use]
    pub fn kind(&self) -> Option<&str> {
        self.0.get("type").and_then(Value::as_str)
    }

    /// Whether the QR code has been confirmed on a mobile device.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.kind() == Some("success")
    }

    /// Single-use login token of a successful status.
    #[must_use]
    pub fn login_token(&self) -> Option<&str> {
        self.0
            .get("success")
            .and_then(|success| success.get("login_token"))
            .and_then(Value::as_str)
    }

    /// Raw status body.
    #[must_use]
    pub fn into_body(self) -> Map<String, Value> {
        self.0
    }
}

impl RiotAuthClient {
    /// Run the handshake: client config, OpenID discovery, login initiation.
    ///
    /// # Errors
    ///
    /// Returns an error if any call fails, the first two calls are rejected,
    /// or the initiation response lacks `cluster`, `suuid` or `timestamp`.
    #[instrument(name = "upstream.initiate_login", skip(self))]
    pub async fn initiate_login(&self, country_code: &str) -> UpstreamResult<LoginHandshake> {
        let session = LoginSession::new(
            self.cookie_session()?,
            self.trace().session_id(),
            country_code,
        );
        let endpoints = self.endpoints();

        let call = UpstreamCall::ClientConfig;
        let request = session
            .client
            .get(format!("{}/api/v1/config/public", endpoints.clientconfig))
            .query(&ClientConfigQuery::for_region(region::region_for(country_code)))
            .headers(self.correlation_headers(
                session.sdk_sid,
                ClientAgent::ClientConfig,
                Some(country_code),
            ));
        let response = self.send(call, request).await?;
        self.require_status(call, response, |status| status.is_success())?;

        let call = UpstreamCall::OpenIdConfiguration;
        let request = session
            .client
            .get(format!("{}/.well-known/openid-configuration", endpoints.auth))
            .headers(self.correlation_headers(
                session.sdk_sid,
                ClientAgent::RsoAuth,
                Some(country_code),
            ));
        let response = self.send(call, request).await?;
        self.require_status(call, response, |status| status.is_success())?;

        let call = UpstreamCall::LoginInitiate;
        let request = session
            .client
            .post(format!("{}/api/v1/login", endpoints.authenticate))
            .headers(self.correlation_headers(
                session.sdk_sid,
                ClientAgent::RsoAuthenticator,
                Some(country_code),
            ))
            .json(&LoginInitRequest::qr_code(country_code));
        let response = self.send(call, request).await?;
        let body: LoginInitResponse = response.json().await.map_err(|source| {
            self.record(call, UpstreamOutcome::Rejected);
            UpstreamError::Decode { call, source }
        })?;
        let ticket = LoginTicket::from_response(body).inspect_err(|_| {
            self.record(call, UpstreamOutcome::Rejected);
        })?;
        self.record(call, UpstreamOutcome::Ok);

        let login_url = ticket.login_url(&endpoints.qr_login);
        info!(cluster = %ticket.cluster, sdk_sid = %session.sdk_sid, "qr login initiated");
        Ok(LoginHandshake {
            ticket,
            login_url,
            session,
        })
    }

    /// Query the login status once on an existing session.
    ///
    /// Any status other than 200 yields `None`: the ticket is pending expiry
    /// handling by the caller.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or a 200 body is not a JSON object.
    #[instrument(name = "upstream.poll_login", skip(self, session), fields(sdk_sid = %session.sdk_sid))]
    pub async fn poll_login(&self, session: &LoginSession) -> UpstreamResult<Option<LoginStatus>> {
        let call = UpstreamCall::LoginStatus;
        let request = session
            .client
            .get(format!("{}/api/v1/login", self.endpoints().authenticate))
            .headers(self.correlation_headers(
                session.sdk_sid,
                ClientAgent::RsoAuthenticator,
                Some(&session.country_code),
            ));
        let response = self.send(call, request).await?;
        if response.status() != reqwest::StatusCode::OK {
            debug!(status = response.status().as_u16(), "login status not available");
            self.record(call, UpstreamOutcome::Rejected);
            return Ok(None);
        }

        let body: Map<String, Value> = response.json().await.map_err(|source| {
            self.record(call, UpstreamOutcome::Rejected);
            UpstreamError::Decode { call, source }
        })?;
        self.record(call, UpstreamOutcome::Ok);
        Ok(Some(LoginStatus::new(body)))
    }
}
