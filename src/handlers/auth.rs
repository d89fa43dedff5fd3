use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tower_cookies::cookie::time::Duration;
use tower_cookies::{Cookie, Cookies};

use crate::{
    error::Result,
    middleware_layer::auth::SESSION_COOKIE,
    models::session::Session,
    services::{auth as auth_service, persons as person_service, reset as reset_service},
    state::AppState,
    validation::auth::*,
};

/// The body every forgot-password request gets, registered or not.
pub const RESET_REQUESTED: &str = "If the address is registered, a reset link has been sent";

/// The request payload for login.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// The request payload for requesting a reset link.
#[derive(Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// The request payload for redeeming a reset link.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub reset_password_id: String,
    pub new_password: String,
}

/// The response payload for authentication-related requests.
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// The response payload for a successful login.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub message: String,
    pub session_token: String,
}

/// Creates the session cookie.
fn create_session_cookie(value: String, max_age_secs: i64, secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, value);
    cookie.set_http_only(true);
    if secure {
        cookie.set_secure(true);
    }
    cookie.set_same_site(tower_cookies::cookie::SameSite::Lax);
    cookie.set_max_age(Duration::seconds(max_age_secs));
    cookie.set_path("/");
    cookie
}

fn message(text: &str) -> Json<MessageResponse> {
    Json(MessageResponse {
        message: text.to_string(),
    })
}

/// Handles login.
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(payload): Json<LoginRequest>,
) -> Result<Response> {
    tracing::info!("🔐 Login attempt");
    validate_email(&payload.email)?;

    let token = auth_service::login(&state, &payload.email, &payload.password).await?;

    cookies.add(create_session_cookie(
        token.clone(),
        state.sessions.ttl().num_seconds(),
        state.config.production,
    ));
    tracing::debug!("✅ Session cookie added");

    let response = LoginResponse {
        message: "Login successful".to_string(),
        session_token: token,
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}

/// Handles logout. Tokens are stateless, so this only drops the cookie.
#[axum::debug_handler]
pub async fn logout(cookies: Cookies) -> Result<Response> {
    let mut session_cookie = Cookie::new(SESSION_COOKIE, "");
    session_cookie.set_max_age(Duration::seconds(0));
    session_cookie.set_path("/");
    cookies.remove(session_cookie);

    tracing::info!("👋 Session cookie cleared");

    Ok((StatusCode::OK, message("Logout successful")).into_response())
}

/// Handles a request for a password-reset link.
#[axum::debug_handler]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> Result<Response> {
    validate_email(&payload.email)?;

    reset_service::issue_ticket(&state, &payload.email).await?;

    Ok((StatusCode::OK, message(RESET_REQUESTED)).into_response())
}

/// Handles redeeming a password-reset link.
#[axum::debug_handler]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Response> {
    validate_password(&payload.new_password)?;

    reset_service::redeem_ticket(&state, &payload.reset_password_id, &payload.new_password)
        .await?;

    Ok((StatusCode::OK, message("Password reset successfully")).into_response())
}

/// Returns the authenticated person.
#[axum::debug_handler]
pub async fn me(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<Response> {
    let person = person_service::get_person(&state, &session.person_id).await?;
    Ok((StatusCode::OK, Json(person.fields)).into_response())
}
