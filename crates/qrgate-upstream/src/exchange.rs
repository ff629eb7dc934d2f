//! Login token to access token exchange.

use std::collections::BTreeMap;

use qrgate_telemetry::UpstreamOutcome;
use reqwest::StatusCode;
use tracing::{info, instrument};

use crate::client::{ClientAgent, RiotAuthClient};
use crate::contracts::{AuthorizationRequest, AuthorizationResponse, LoginTokenRequest};
use crate::error::{ExtractionSubject, UpstreamCall, UpstreamError, UpstreamResult};

/// Authorization redirect plus the cookies set alongside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationGrant {
    /// Redirect URI carrying the tokens in its fragment.
    pub uri: String,
    /// Cookies set by the authorization response.
    pub cookies: BTreeMap<String, String>,
}

impl AuthorizationGrant {
    /// Access token carried by the redirect URI.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError::Extraction`] when the URI has no token.
    pub fn access_token(&self) -> UpstreamResult<String> {
        extract_access_token(&self.uri)
    }
}

/// Pull the access token out of `...#access_token=<token>&...`.
///
/// # Errors
///
/// Returns [`UpstreamError::Extraction`] when the marker is absent or the token
/// is empty.
pub fn extract_access_token(uri: &str) -> UpstreamResult<String> {
    uri.split_once("#access_token=")
        .and_then(|(_, rest)| rest.split('&').next())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .ok_or(UpstreamError::Extraction {
            subject: ExtractionSubject::RedirectUri,
        })
}

impl RiotAuthClient {
    /// Submit a login token and request an authorization grant.
    ///
    /// Both calls run on a new cookie session with a new client session id.
    ///
    /// # Errors
    ///
    /// Returns an error if the submission does not answer 204, the
    /// authorization does not answer 200, or the grant lacks a redirect URI.
    #[instrument(name = "upstream.exchange_login_token", skip_all)]
    pub async fn exchange_login_token(&self, login_token: &str) -> UpstreamResult<AuthorizationGrant> {
        let client = self.cookie_session()?;
        let sdk_sid = self.trace().session_id();
        let auth = &self.endpoints().auth;

        let call = UpstreamCall::LoginToken;
        let request = client
            .post(format!("{auth}/api/v1/login-token"))
            .headers(self.correlation_headers(sdk_sid, ClientAgent::RsoAuthExchange, None))
            .json(&LoginTokenRequest::new(login_token));
        let response = self.send(call, request).await?;
        self.require_status(call, response, |status| status == StatusCode::NO_CONTENT)?;

        let call = UpstreamCall::Authorization;
        let request = client
            .post(format!("{auth}/api/v1/authorization"))
            .headers(self.correlation_headers(sdk_sid, ClientAgent::RsoAuthExchange, None))
            .json(&AuthorizationRequest::with_nonce(self.trace().nonce()));
        let response = self.send(call, request).await?;
        let response = self.check_status(call, response, |status| status == StatusCode::OK)?;

        let cookies: BTreeMap<String, String> = response
            .cookies()
            .map(|cookie| (cookie.name().to_string(), cookie.value().to_string()))
            .collect();
        let body: AuthorizationResponse = response
            .json()
            .await
            .map_err(|source| {
                self.record(call, UpstreamOutcome::Rejected);
                UpstreamError::Decode { call, source }
            })?;
        let uri = body.into_uri().ok_or_else(|| {
            self.record(call, UpstreamOutcome::Rejected);
            UpstreamError::MissingField {
                call,
                field: "response.parameters.uri",
            }
        })?;
        self.record(call, UpstreamOutcome::Ok);

        info!(cookies = cookies.len(), "authorization grant issued");
        Ok(AuthorizationGrant { uri, cookies })
    }
}
