//! # Design
//!
//! - Display messages stay constant; the failing call travels as a field.
//! - `public_message` is the only place that decides what a browser client sees.

use thiserror::Error;

/// Result alias for upstream operations.
pub type UpstreamResult<T> = Result<T, UpstreamError>;

/// Individual outbound calls made against the authentication upstreams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamCall {
    /// Public client configuration fetch.
    ClientConfig,
    /// OpenID discovery document fetch.
    OpenIdConfiguration,
    /// Login initiation POST.
    LoginInitiate,
    /// Login status GET.
    LoginStatus,
    /// Login token submission.
    LoginToken,
    /// Authorization grant request.
    Authorization,
    /// Cookie-based authorize redirect.
    Authorize,
}

impl UpstreamCall {
    /// Stable label used in logs and metrics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ClientConfig => "client_config",
            Self::OpenIdConfiguration => "openid_configuration",
            Self::LoginInitiate => "login_initiate",
            Self::LoginStatus => "login_status",
            Self::LoginToken => "login_token",
            Self::Authorization => "authorization",
            Self::Authorize => "authorize",
        }
    }
}

/// Redirect an access token was expected in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionSubject {
    /// Authorization grant redirect URI (`#access_token=` marker).
    RedirectUri,
    /// `Location` of the cookie-based authorize redirect.
    AuthorizeRedirect,
}

impl ExtractionSubject {
    /// Stable label used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RedirectUri => "redirect_uri",
            Self::AuthorizeRedirect => "authorize_redirect",
        }
    }
}

/// Errors raised while talking to the authentication upstreams.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Building an HTTP session failed.
    #[error("failed to build upstream http client")]
    ClientBuild {
        /// Underlying HTTP client error.
        source: reqwest::Error,
    },
    /// The call failed before a response was received.
    #[error("upstream request failed")]
    Transport {
        /// Call that failed.
        call: UpstreamCall,
        /// Underlying HTTP client error.
        source: reqwest::Error,
    },
    /// The call returned a status the flow cannot continue from.
    #[error("upstream returned an unexpected status")]
    UnexpectedStatus {
        /// Call that failed.
        call: UpstreamCall,
        /// HTTP status returned.
        status: u16,
    },
    /// The response body was not the JSON document the call expects.
    #[error("upstream response could not be decoded")]
    Decode {
        /// Call that failed.
        call: UpstreamCall,
        /// Underlying HTTP client error.
        source: reqwest::Error,
    },
    /// An expected field was absent from the response body.
    #[error("upstream response is missing a required field")]
    MissingField {
        /// Call that failed.
        call: UpstreamCall,
        /// Dotted path of the missing field.
        field: &'static str,
    },
    /// A redirect did not carry an access token where one was expected.
    #[error("access token could not be extracted")]
    Extraction {
        /// What the extraction was applied to.
        subject: ExtractionSubject,
    },
    /// The authorize redirect did not carry an access token at all.
    #[error("session cookie was rejected")]
    InvalidCookie,
}

impl UpstreamError {
    /// Call associated with the failure, when there is one.
    #[must_use]
    pub const fn call(&self) -> Option<UpstreamCall> {
        match self {
            Self::Transport { call, .. }
            | Self::UnexpectedStatus { call, .. }
            | Self::Decode { call, .. }
            | Self::MissingField { call, .. } => Some(*call),
            Self::ClientBuild { .. } | Self::Extraction { .. } | Self::InvalidCookie => None,
        }
    }

    /// Message safe to return to API clients.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::ClientBuild { .. } => "Upstream client unavailable".to_string(),
            Self::Transport { source, .. } => source.to_string(),
            Self::UnexpectedStatus { call, .. } => match call {
                UpstreamCall::LoginToken => "Login token submission failed".to_string(),
                UpstreamCall::Authorization => "Authorization failed".to_string(),
                UpstreamCall::ClientConfig
                | UpstreamCall::OpenIdConfiguration
                | UpstreamCall::LoginInitiate => "Login handshake failed".to_string(),
                UpstreamCall::LoginStatus | UpstreamCall::Authorize => {
                    "Unexpected upstream response".to_string()
                }
            },
            Self::Decode { .. } => "Unexpected upstream response".to_string(),
            Self::MissingField { call, .. } => match call {
                UpstreamCall::LoginInitiate => {
                    "Required data is missing from the response.".to_string()
                }
                UpstreamCall::Authorization => "Failed to get access token URI".to_string(),
                UpstreamCall::LoginStatus => "Failed to read login token".to_string(),
                _ => "Unexpected upstream response".to_string(),
            },
            Self::Extraction { subject } => match subject {
                ExtractionSubject::AuthorizeRedirect => "Failed to get access token".to_string(),
                ExtractionSubject::RedirectUri => "Failed to extract access token".to_string(),
            },
            Self::InvalidCookie => "Invalid Cookie".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_messages_follow_the_failing_call() {
        let missing = UpstreamError::MissingField {
            call: UpstreamCall::LoginInitiate,
            field: "cluster",
        };
        assert_eq!(
            missing.public_message(),
            "Required data is missing from the response."
        );
        assert_eq!(missing.call(), Some(UpstreamCall::LoginInitiate));

        let rejected = UpstreamError::UnexpectedStatus {
            call: UpstreamCall::LoginToken,
            status: 400,
        };
        assert_eq!(rejected.public_message(), "Login token submission failed");
        assert_eq!(
            rejected.to_string(),
            "upstream returned an unexpected status"
        );

        let uri = UpstreamError::MissingField {
            call: UpstreamCall::Authorization,
            field: "response.parameters.uri",
        };
        assert_eq!(uri.public_message(), "Failed to get access token URI");

        assert_eq!(UpstreamError::InvalidCookie.public_message(), "Invalid Cookie");
        assert_eq!(
            UpstreamError::Extraction {
                subject: ExtractionSubject::RedirectUri
            }
            .public_message(),
            "Failed to extract access token"
        );
        assert_eq!(
            UpstreamError::Extraction {
                subject: ExtractionSubject::AuthorizeRedirect
            }
            .public_message(),
            "Failed to get access token"
        );
    }
}
