//! HTML endpoints: landing, demo, login page and error pages.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header::ACCEPT_LANGUAGE},
    response::{Html, IntoResponse, Response},
};
use qrgate_upstream::region;
use tracing::warn;

use crate::http::header_str;
use crate::i18n::{
    FALLBACK_LOCALE, GENERIC_ERROR_FALLBACK, GENERIC_ERROR_TEXT, resolve_locale, ui_source_texts,
};
use crate::pages::{DEMO_HTML, INDEX_HTML, render_auth_page, render_error_page};
use crate::state::ApiState;

pub(crate) async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub(crate) async fn demo() -> Html<&'static str> {
    Html(DEMO_HTML)
}

pub(crate) async fn auth_page(
    State(state): State<Arc<ApiState>>,
    Path(lang): Path<String>,
    headers: HeaderMap,
) -> Response {
    let Some(locale) = resolve_locale(Some(&lang), header_str(&headers, ACCEPT_LANGUAGE)) else {
        return error_page(
            &state,
            &headers,
            StatusCode::NOT_FOUND,
            &format!("Unsupported language: {lang}"),
        )
        .await;
    };

    match state.localize_all(&ui_source_texts(), locale).await {
        Ok(texts) => Html(render_auth_page(locale, &texts)).into_response(),
        Err(err) => {
            warn!(error = %err, locale, "login page translation failed");
            error_page(
                &state,
                &headers,
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("Translation failed: {err}"),
            )
            .await
        }
    }
}

pub(crate) async fn not_found(State(state): State<Arc<ApiState>>, headers: HeaderMap) -> Response {
    error_page(&state, &headers, StatusCode::NOT_FOUND, "Page not found").await
}

/// Render an error page headed by the generic error text in the requester's locale.
///
/// Falls back to English when the heading cannot be translated.
pub(crate) async fn error_page(
    state: &ApiState,
    headers: &HeaderMap,
    status: StatusCode,
    message: &str,
) -> Response {
    let locale = region::best_match(header_str(headers, ACCEPT_LANGUAGE));
    let (heading, locale) = match state.localize(GENERIC_ERROR_TEXT, locale).await {
        Ok(heading) => (heading, locale),
        Err(err) => {
            warn!(error = %err, locale, "error page heading translation failed");
            (GENERIC_ERROR_FALLBACK.to_string(), FALLBACK_LOCALE)
        }
    };
    (
        status,
        Html(render_error_page(status.as_u16(), message, &heading, locale)),
    )
        .into_response()
}
