//! `POST /get_token`: poll a QR login and exchange its token.

use std::sync::Arc;

use axum::{Json, extract::State, http::HeaderMap};
use qrgate_upstream::{UpstreamCall, UpstreamError};
use serde_json::{Map, Value, json};
use tracing::{info, warn};

use crate::http::constants::HEADER_SESSION_ID;
use crate::http::errors::ApiError;
use crate::http::header_str;
use crate::sessions::SessionId;
use crate::state::ApiState;

const NO_ACTIVE_SESSION: &str = "No active session";

pub(crate) async fn get_token(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let session_id: SessionId = header_str(&headers, HEADER_SESSION_ID)
        .and_then(|value| value.parse().ok())
        .ok_or_else(|| ApiError::bad_request(NO_ACTIVE_SESSION))?;
    let session = state
        .session(&session_id)
        .ok_or_else(|| ApiError::bad_request(NO_ACTIVE_SESSION))?;

    let polled = state.upstream.poll_login(&session).await.map_err(|err| {
        warn!(error = %err, session_id = %session_id, "login status poll failed");
        ApiError::from_upstream(&err)
    })?;

    let Some(status) = polled else {
        // Expired ticket: issue exactly one replacement under the same id.
        let handshake = state
            .upstream
            .initiate_login(session.country_code())
            .await
            .map_err(|err| {
                warn!(error = %err, session_id = %session_id, "login refresh failed");
                ApiError::from_upstream(&err)
            })?;
        state.replace_session(&session_id, handshake.session);
        info!(session_id = %session_id, "expired login url replaced");
        return Ok(Json(json!({
            "error": "Token expired",
            "new_url": handshake.login_url,
        })));
    };

    if !status.is_success() {
        return Ok(Json(Value::Object(status.into_body())));
    }

    let login_token = status
        .login_token()
        .ok_or_else(|| {
            ApiError::from_upstream(&UpstreamError::MissingField {
                call: UpstreamCall::LoginStatus,
                field: "success.login_token",
            })
        })?
        .to_string();
    let grant = state
        .upstream
        .exchange_login_token(&login_token)
        .await
        .map_err(|err| {
            warn!(error = %err, session_id = %session_id, "login token exchange failed");
            ApiError::from_upstream(&err)
        })?;
    let access_token = grant
        .access_token()
        .map_err(|err| ApiError::from_upstream(&err))?;
    state.close_session(&session_id);
    info!(session_id = %session_id, "qr login completed");

    let cookies: Map<String, Value> = grant
        .cookies
        .into_iter()
        .map(|(name, value)| (name, Value::String(value)))
        .collect();
    let mut body = status.into_body();
    body.insert("access_token".to_string(), Value::String(access_token));
    body.insert("cookies".to_string(), Value::Object(cookies));
    body.remove("uri");
    Ok(Json(Value::Object(body)))
}
