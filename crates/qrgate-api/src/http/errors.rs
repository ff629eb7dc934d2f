//! JSON error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use qrgate_upstream::{ExtractionSubject, UpstreamError};
use serde::Serialize;

/// Error returned by JSON handlers as `{"error": "..."}`.
#[derive(Debug)]
pub(crate) struct ApiError {
    pub(crate) status: StatusCode,
    message: String,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub(crate) fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub(crate) fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub(crate) fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub(crate) fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message)
    }

    pub(crate) fn message(&self) -> &str {
        &self.message
    }

    /// Map an upstream failure onto the status the browser client expects.
    ///
    /// Rejections by the upstream are the caller's problem (400); failures to
    /// reach or read the upstream are ours (502).
    pub(crate) fn from_upstream(err: &UpstreamError) -> Self {
        let message = err.public_message();
        match err {
            UpstreamError::Transport { .. } | UpstreamError::Decode { .. } => {
                Self::bad_gateway(message)
            }
            UpstreamError::ClientBuild { .. } => Self::internal(message),
            UpstreamError::InvalidCookie => Self::unauthorized(message),
            UpstreamError::Extraction {
                subject: ExtractionSubject::AuthorizeRedirect,
            } => Self::internal(message),
            UpstreamError::UnexpectedStatus { .. }
            | UpstreamError::MissingField { .. }
            | UpstreamError::Extraction {
                subject: ExtractionSubject::RedirectUri,
            } => Self::bad_request(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: &self.message,
            }),
        )
            .into_response()
    }
}
