#![forbid(unsafe_code)]
#![warn(
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    rustdoc::broken_intra_doc_links,
    missing_docs
)]

//! Adapters for the undocumented QR login, token and authorize endpoints.
//!
//! Layout: `contracts.rs` (wire shapes), `trace.rs` (correlation ids),
//! `region.rs` (locale table), `client.rs` (shared HTTP plumbing), `login.rs`
//! (handshake and status poll), `exchange.rs` (login token to access token),
//! `reauth.rs` (cookie reauthentication).

pub mod client;
pub mod contracts;
pub mod error;
pub mod exchange;
pub mod login;
pub mod reauth;
pub mod region;
pub mod trace;

use async_trait::async_trait;

pub use client::RiotAuthClient;
pub use error::{ExtractionSubject, UpstreamCall, UpstreamError, UpstreamResult};
pub use exchange::{AuthorizationGrant, extract_access_token};
pub use reauth::access_token_from_location;
pub use login::{LoginHandshake, LoginSession, LoginStatus, LoginTicket};
pub use trace::{RandomTraceContext, TraceContextSource, TraceIds};

/// Authentication upstream consumed by the HTTP layer.
///
/// Every method maps to one step of the native client's login flow; shapes of
/// the third-party responses never leak past implementations of this trait.
#[async_trait]
pub trait AuthUpstream: Send + Sync {
    /// Run the three-call handshake and return a QR login URL with its session.
    async fn initiate_login(&self, country_code: &str) -> UpstreamResult<LoginHandshake>;
    /// Query the login status once. `None` means the ticket is not usable any more.
    async fn poll_login(&self, session: &LoginSession) -> UpstreamResult<Option<LoginStatus>>;
    /// Trade a single-use login token for an authorization redirect.
    async fn exchange_login_token(&self, login_token: &str) -> UpstreamResult<AuthorizationGrant>;
    /// Trade an `ssid` session cookie for an access token.
    async fn reauthorize_with_cookie(&self, ssid: &str) -> UpstreamResult<String>;
}

#[async_trait]
impl AuthUpstream for RiotAuthClient {
    async fn initiate_login(&self, country_code: &str) -> UpstreamResult<LoginHandshake> {
        Self::initiate_login(self, country_code).await
    }

    async fn poll_login(&self, session: &LoginSession) -> UpstreamResult<Option<LoginStatus>> {
        Self::poll_login(self, session).await
    }

    async fn exchange_login_token(&self, login_token: &str) -> UpstreamResult<AuthorizationGrant> {
        Self::exchange_login_token(self, login_token).await
    }

    async fn reauthorize_with_cookie(&self, ssid: &str) -> UpstreamResult<String> {
        Self::reauthorize_with_cookie(self, ssid).await
    }
}
