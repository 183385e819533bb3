use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use np_core::AdminCredentials;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use crate::{ApiError, AppState, JsonBody};

pub const SESSION_COOKIE: &str = "isAdmin";
pub const LOGIN_PATH: &str = "/admin/login";
const ADMIN_PREFIX: &str = "/admin";
const SESSION_MAX_AGE_SECS: u64 = 24 * 60 * 60;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

pub fn validate_credentials(expected: &AdminCredentials, username: &str, password: &str) -> bool {
    expected.username == username && expected.password == password
}

/// True iff the request carries `isAdmin=true`.
pub fn is_authenticated(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .any(|(name, value)| name == SESSION_COOKIE && value == "true")
}

fn is_guarded(path: &str) -> bool {
    let in_admin = path == ADMIN_PREFIX || path.starts_with("/admin/");
    in_admin && path != LOGIN_PATH
}

/// Sends unauthenticated admin requests to the login entry point.
pub async fn require_admin(request: Request, next: Next) -> Response {
    let path = request.uri().path();
    if is_guarded(path) && !is_authenticated(request.headers()) {
        tracing::debug!("Redirecting unauthenticated request for {}", path);
        return Redirect::to(LOGIN_PATH).into_response();
    }
    next.run(request).await
}

fn session_cookie(max_age: u64) -> String {
    let value = if max_age > 0 { "true" } else { "" };
    format!(
        "{}={}; Path=/; Max-Age={}; SameSite=Lax",
        SESSION_COOKIE, value, max_age
    )
}

pub async fn login_status(headers: HeaderMap) -> Json<serde_json::Value> {
    Json(json!({ "authenticated": is_authenticated(&headers) }))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> Result<Response, ApiError> {
    if !validate_credentials(&state.credentials, &request.username, &request.password) {
        tracing::warn!("Rejected admin login for {}", request.username);
        return Ok((
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Invalid username or password" })),
        )
            .into_response());
    }

    tracing::info!("🔑 Admin {} logged in", request.username);
    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, session_cookie(SESSION_MAX_AGE_SECS))],
        Json(json!({ "authenticated": true })),
    )
        .into_response())
}

pub async fn logout() -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, session_cookie(0))],
    )
}
