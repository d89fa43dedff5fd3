use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::Response,
};
use chrono::DateTime;
use tower_cookies::Cookies;

use crate::{
    error::AppError,
    models::session::Session,
    state::AppState,
};

/// The cookie the session token travels in.
pub const SESSION_COOKIE: &str = "session_token";

/// Extracts the session token from the `Authorization` header or, failing
/// that, from the session cookie.
fn extract_session_token(request: &Request<Body>, cookies: &Cookies) -> Option<String> {
    let bearer = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string());

    bearer.or_else(|| cookies.get(SESSION_COOKIE).map(|c| c.value().to_string()))
}

/// A middleware that requires a valid, unexpired session token.
///
/// On success the request carries a [`Session`] extension.
pub async fn require_auth(
    State(state): State<AppState>,
    cookies: Cookies,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    tracing::debug!("🔐 Checking authentication...");

    let token = extract_session_token(&request, &cookies).ok_or_else(|| {
        tracing::warn!("❌ No session token presented");
        AppError::Authentication("Unauthorized".to_string())
    })?;

    let claims = state.sessions.authenticate(&token, state.clock.now())?;

    let session = Session {
        person_id: claims.subject_id,
        expires_at: DateTime::from_timestamp(claims.expires_at, 0).unwrap_or_default(),
    };

    tracing::debug!("✅ Person authenticated: {}", session.person_id);

    request.extensions_mut().insert(session);

    Ok(next.run(request).await)
}
