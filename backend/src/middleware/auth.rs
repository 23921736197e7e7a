//! Session authentication middleware
//!
//! Every login creates a row in the `sessions` table; protected routes
//! carry the session id either as a Bearer token or as a `session_id`
//! cookie. The middleware looks the session up, rejects missing or
//! expired ones, and stashes a [`SessionContext`] in request extensions.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{ErrorDetail, ErrorResponse};
use crate::AppState;
use shared::types::SessionRole;

/// Authenticated session attached to a request
#[derive(Clone, Debug)]
pub struct SessionContext {
    pub session_id: Uuid,
    pub branch_id: Uuid,
    pub role: SessionRole,
    pub staff_id: Option<Uuid>,
}

impl SessionContext {
    pub fn is_admin(&self) -> bool {
        self.role == SessionRole::Admin
    }
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    id: Uuid,
    branch_id: Uuid,
    role: String,
    staff_id: Option<Uuid>,
    expires_at: DateTime<Utc>,
}

/// Validate the session token and insert a [`SessionContext`] extension
pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = match extract_token(&request) {
        Some(token) => token,
        None => return unauthorized_response("Missing session token"),
    };

    let session_id = match Uuid::parse_str(&token) {
        Ok(id) => id,
        Err(_) => return unauthorized_response("Malformed session token"),
    };

    let row = sqlx::query_as::<_, SessionRow>(
        "SELECT id, branch_id, role, staff_id, expires_at FROM sessions WHERE id = $1",
    )
    .bind(session_id)
    .fetch_optional(&state.db)
    .await;

    let row = match row {
        Ok(Some(row)) => row,
        Ok(None) => return unauthorized_response("Session not found"),
        Err(err) => {
            tracing::error!("Session lookup failed: {}", err);
            return unauthorized_response("Session lookup failed");
        }
    };

    if row.expires_at <= Utc::now() {
        return unauthorized_response("Session expired");
    }

    let role = match row.role.parse::<SessionRole>() {
        Ok(role) => role,
        Err(_) => return unauthorized_response("Invalid session role"),
    };

    request.extensions_mut().insert(SessionContext {
        session_id: row.id,
        branch_id: row.branch_id,
        role,
        staff_id: row.staff_id,
    });

    next.run(request).await
}

/// Pull the session token from `Authorization: Bearer ...` or the
/// `session_id` cookie, in that order.
fn extract_token(request: &Request) -> Option<String> {
    if let Some(header) = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    {
        if let Some(token) = header.strip_prefix("Bearer ") {
            return Some(token.trim().to_string());
        }
    }

    let cookies = request
        .headers()
        .get(header::COOKIE)
        .and_then(|h| h.to_str().ok())?;

    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == "session_id").then(|| value.trim().to_string())
    })
}

fn unauthorized_response(message: &str) -> Response {
    let error = ErrorResponse {
        error: ErrorDetail {
            code: "UNAUTHORIZED".to_string(),
            message: message.to_string(),
            field: None,
        },
    };

    (StatusCode::UNAUTHORIZED, Json(error)).into_response()
}

/// Extractor for the authenticated session
/// Use this in handlers behind [`session_middleware`]
#[derive(Clone, Debug)]
pub struct CurrentSession(pub SessionContext);

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionContext>()
            .cloned()
            .map(CurrentSession)
            .ok_or_else(|| {
                let error = ErrorResponse {
                    error: ErrorDetail {
                        code: "UNAUTHORIZED".to_string(),
                        message: "Authentication required".to_string(),
                        field: None,
                    },
                };
                (StatusCode::UNAUTHORIZED, Json(error))
            })
    }
}
