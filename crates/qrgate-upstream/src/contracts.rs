//! Request and response shapes of the authentication upstreams.
//!
//! Nothing outside this crate sees these types; handlers only receive the
//! values extracted from them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Client identifier presented by the desktop client.
pub const RIOT_CLIENT_ID: &str = "riot-client";

/// Query of the public client configuration fetch.
#[derive(Debug, Serialize)]
pub struct ClientConfigQuery<'a> {
    /// Operating system the client claims to run on.
    pub os: &'static str,
    /// Upstream region derived from the locale; omitted when unknown.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<&'a str>,
    /// Application name.
    pub app: &'static str,
    /// Client build version.
    pub version: &'static str,
    /// Release channel.
    pub patchline: &'static str,
}

impl<'a> ClientConfigQuery<'a> {
    /// Query for the given region with the pinned client build.
    #[must_use]
    pub const fn for_region(region: Option<&'a str>) -> Self {
        Self {
            os: "windows",
            region,
            app: "Riot Client",
            version: "97.0.1.2366",
            patchline: "KeystoneFoundationLiveWin",
        }
    }
}

/// Body of the login initiation POST.
#[derive(Debug, Serialize)]
pub struct LoginInitRequest {
    /// Always [`RIOT_CLIENT_ID`].
    pub client_id: &'static str,
    /// Locale with `-` replaced by `_`.
    pub language: String,
    /// Client platform.
    pub platform: &'static str,
    /// Whether the login should be remembered.
    pub remember: bool,
    /// Login type.
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Empty object requesting a QR code login.
    pub qrcode: serde_json::Map<String, Value>,
}

impl LoginInitRequest {
    /// QR login request for a locale code such as `fr-FR`.
    #[must_use]
    pub fn qr_code(locale: &str) -> Self {
        Self {
            client_id: RIOT_CLIENT_ID,
            language: locale.replace('-', "_"),
            platform: "windows",
            remember: false,
            kind: "auth",
            qrcode: serde_json::Map::new(),
        }
    }
}

/// Scalar that the upstream sends either quoted or as a bare number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TextOrNumber {
    /// JSON string.
    Text(String),
    /// JSON number.
    Number(serde_json::Number),
    /// Any other JSON value, treated as absent.
    Other(Value),
}

impl TextOrNumber {
    /// Non-empty textual form, if the value carries one.
    #[must_use]
    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Text(text) if !text.is_empty() => Some(text),
            Self::Number(number) => Some(number.to_string()),
            Self::Text(_) | Self::Other(_) => None,
        }
    }
}

/// Response of the login initiation POST.
#[derive(Debug, Deserialize)]
pub struct LoginInitResponse {
    /// Upstream cluster serving the QR session.
    #[serde(default)]
    pub cluster: Option<TextOrNumber>,
    /// QR session identifier.
    #[serde(default)]
    pub suuid: Option<TextOrNumber>,
    /// Creation timestamp of the QR session.
    #[serde(default)]
    pub timestamp: Option<TextOrNumber>,
}

/// Body of the login token submission.
#[derive(Debug, Serialize)]
pub struct LoginTokenRequest<'a> {
    /// Always `null`.
    pub authentication_type: Option<&'static str>,
    /// Always empty.
    pub code_verifier: &'static str,
    /// Token taken from a successful login status.
    pub login_token: &'a str,
    /// Whether the login persists.
    pub persist_login: bool,
}

impl<'a> LoginTokenRequest<'a> {
    /// Submission of a single-use login token.
    #[must_use]
    pub const fn new(login_token: &'a str) -> Self {
        Self {
            authentication_type: None,
            code_verifier: "",
            login_token,
            persist_login: false,
        }
    }
}

/// Body of the authorization request.
#[derive(Debug, Serialize)]
pub struct AuthorizationRequest {
    /// Always empty.
    pub acr_values: &'static str,
    /// Always empty.
    pub claims: &'static str,
    /// Always [`RIOT_CLIENT_ID`].
    pub client_id: &'static str,
    /// Always empty.
    pub code_challenge: &'static str,
    /// Always empty.
    pub code_challenge_method: &'static str,
    /// Fresh per request.
    pub nonce: String,
    /// Loopback redirect the desktop client registers.
    pub redirect_uri: &'static str,
    /// Requested response types.
    pub response_type: &'static str,
    /// Requested scopes.
    pub scope: &'static str,
}

impl AuthorizationRequest {
    /// Token request for the desktop client with the given nonce.
    #[must_use]
    pub const fn with_nonce(nonce: String) -> Self {
        Self {
            acr_values: "",
            claims: "",
            client_id: RIOT_CLIENT_ID,
            code_challenge: "",
            code_challenge_method: "",
            nonce,
            redirect_uri: "http://localhost/redirect",
            response_type: "token id_token",
            scope: "openid link ban lol_region account",
        }
    }
}

/// Response of the authorization request.
#[derive(Debug, Deserialize)]
pub struct AuthorizationResponse {
    /// Nested response envelope.
    #[serde(default)]
    pub response: Option<AuthorizationEnvelope>,
}

/// `response` object of an authorization response.
#[derive(Debug, Deserialize)]
pub struct AuthorizationEnvelope {
    /// Redirect parameters.
    #[serde(default)]
    pub parameters: Option<AuthorizationParameters>,
}

/// `response.parameters` object of an authorization response.
#[derive(Debug, Deserialize)]
pub struct AuthorizationParameters {
    /// Redirect URI carrying the tokens in its fragment.
    #[serde(default)]
    pub uri: Option<String>,
}

impl AuthorizationResponse {
    /// Redirect URI, when the full path is present.
    #[must_use]
    pub fn into_uri(self) -> Option<String> {
        self.response?.parameters?.uri
    }
}

/// Query of the cookie-based authorize redirect.
#[derive(Debug, Serialize)]
pub struct AuthorizeQuery {
    /// Web client redirect target.
    pub redirect_uri: &'static str,
    /// Web client identifier.
    pub client_id: &'static str,
    /// Requested response types.
    pub response_type: &'static str,
    /// Fixed nonce.
    pub nonce: &'static str,
    /// Requested scopes.
    pub scope: &'static str,
}

impl Default for AuthorizeQuery {
    fn default() -> Self {
        Self {
            redirect_uri: "https://playvalorant.com/opt_in",
            client_id: "play-valorant-web-prod",
            response_type: "token id_token",
            nonce: "1",
            scope: "account openid",
        }
    }
}
