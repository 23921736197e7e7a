//! Authentication handlers

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentSession;
use crate::services::auth::LoginOutcome;
use crate::services::AuthService;
use crate::AppState;
use shared::types::SessionRole;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub pin: String,
}

#[derive(Serialize)]
pub struct MeResponse {
    pub role: SessionRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff_id: Option<Uuid>,
    pub branch_id: Uuid,
}

/// PIN login. Returns the session and also sets a `session_id` cookie
/// for browser clients.
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<LoginRequest>,
) -> AppResult<(StatusCode, [(header::HeaderName, String); 1], Json<LoginOutcome>)> {
    let ip = headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string());
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|h| h.to_str().ok())
        .map(|v| v.to_string());

    let service = AuthService::new(state.db.clone(), &state.config);
    let outcome = service.login(&body.pin, ip, user_agent).await?;

    let cookie = format!(
        "session_id={}; HttpOnly; SameSite=Lax; Path=/; Expires={}",
        outcome.session_id,
        outcome.expires_at.format("%a, %d %b %Y %H:%M:%S GMT")
    );

    Ok((StatusCode::OK, [(header::SET_COOKIE, cookie)], Json(outcome)))
}

/// Delete the current session and clear the cookie
pub async fn logout(
    State(state): State<AppState>,
    session: CurrentSession,
) -> AppResult<[(header::HeaderName, String); 1]> {
    let service = AuthService::new(state.db.clone(), &state.config);
    service.logout(session.0.session_id).await?;

    let cookie = "session_id=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0".to_string();
    Ok([(header::SET_COOKIE, cookie)])
}

/// Who is logged in right now
pub async fn me(session: CurrentSession) -> Json<MeResponse> {
    Json(MeResponse {
        role: session.0.role,
        staff_id: session.0.staff_id,
        branch_id: session.0.branch_id,
    })
}
