//! Cookie session gate.
//!
//! # Responsibilities
//! - Issue the session cookie on a successful login
//! - Redirect page requests without a session to `/login?from=<path>`
//!
//! # Design Decisions
//! - The session is a presence check only: any non-empty cookie value counts
//! - API routes are never gated; only page routes carry the middleware

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, HeaderMap, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde_json::{json, Value};

use crate::config::AuthConfig;
use crate::http::server::AppState;

const PUBLIC_PATHS: [&str; 4] = ["/login", "/favicon.ico", "/robots.txt", "/sitemap.xml"];

pub fn is_public_path(path: &str) -> bool {
    PUBLIC_PATHS.contains(&path) || path.starts_with("/api/login")
}

/// True when a cookie named `cookie_name` with a non-empty value is present.
pub fn has_session(headers: &HeaderMap, cookie_name: &str) -> bool {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .any(|(name, value)| name == cookie_name && !value.is_empty())
}

/// Fields that are missing or not strings never match.
pub fn credentials_match(body: &Value, auth: &AuthConfig) -> bool {
    let field = |name: &str| body.get(name).and_then(Value::as_str);
    field("username") == Some(auth.username.as_str()) && field("password") == Some(auth.password.as_str())
}

pub fn session_cookie(auth: &AuthConfig) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
        auth.cookie_name, auth.cookie_value, auth.max_age_secs
    );
    if auth.secure_cookie {
        cookie.push_str("; Secure");
    }
    cookie
}

pub fn login_redirect(from: &str) -> Redirect {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("from", from)
        .finish();
    Redirect::temporary(&format!("/login?{}", query))
}

pub async fn session_gate(State(state): State<AppState>, request: Request<Body>, next: Next) -> Response {
    let path = request.uri().path().to_string();
    if is_public_path(&path) || has_session(request.headers(), &state.config.auth.cookie_name) {
        return next.run(request).await;
    }

    tracing::debug!(path = %path, "No session, redirecting to login");
    login_redirect(&path).into_response()
}

/// `POST /api/login`.
pub async fn login(State(state): State<AppState>, body: Bytes) -> Response {
    let credentials: Value = match serde_json::from_slice(&body) {
        Ok(c) => c,
        Err(_) => return (StatusCode::BAD_REQUEST, Json(json!({ "error": "Bad request" }))).into_response(),
    };

    let auth = &state.config.auth;
    if !credentials_match(&credentials, auth) {
        let username = credentials.get("username").and_then(Value::as_str).unwrap_or("");
        tracing::warn!(username = %username, "Login rejected");
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Invalid credentials" }))).into_response();
    }

    let mut response = Json(json!({ "success": true })).into_response();
    match HeaderValue::from_str(&session_cookie(auth)) {
        Ok(cookie) => {
            response.headers_mut().insert(header::SET_COOKIE, cookie);
            response
        }
        Err(e) => {
            tracing::error!(error = %e, "Session cookie is not a valid header value");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": "Session unavailable" }))).into_response()
        }
    }
}
