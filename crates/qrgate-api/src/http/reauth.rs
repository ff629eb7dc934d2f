//! `POST /cookie_reauth`: access token from an `ssid` cookie.

use std::sync::Arc;

use axum::{Json, extract::State, http::HeaderMap};
use qrgate_upstream::UpstreamError;
use serde::Serialize;
use tracing::warn;

use crate::http::constants::HEADER_SSID;
use crate::http::errors::ApiError;
use crate::http::header_str;
use crate::state::ApiState;

#[derive(Debug, Serialize)]
pub(crate) struct AccessTokenResponse {
    pub(crate) access_token: String,
}

pub(crate) async fn cookie_reauth(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
) -> Result<Json<AccessTokenResponse>, ApiError> {
    let ssid = header_str(&headers, HEADER_SSID)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ApiError::bad_request("Cookie is required"))?;

    match state.upstream.reauthorize_with_cookie(ssid).await {
        Ok(access_token) => Ok(Json(AccessTokenResponse { access_token })),
        Err(UpstreamError::InvalidCookie) => Err(ApiError::unauthorized("Invalid Cookie")),
        Err(err) => {
            warn!(error = %err, "cookie reauthentication failed");
            Err(ApiError::internal(err.public_message()))
        }
    }
}
