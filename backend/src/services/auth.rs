//! PIN login and session management
//!
//! One settings row holds the admin PIN hash and a shared staff PIN
//! hash; each staff member can additionally have a personal PIN. A
//! successful login writes a session row that the middleware checks on
//! every protected request.

use bcrypt::verify;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use shared::types::SessionRole;
use shared::validation::validate_pin;

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db: PgPool,
    session_expiry_days: i64,
}

/// A freshly created login session
#[derive(Debug, Serialize)]
pub struct LoginOutcome {
    pub session_id: Uuid,
    pub role: SessionRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff_id: Option<Uuid>,
    pub expires_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct SettingsRow {
    branch_id: Uuid,
    pin_hash: String,
    staff_pin_hash: Option<String>,
}

#[derive(sqlx::FromRow)]
struct StaffPinRow {
    id: Uuid,
    pin_hash: String,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(db: PgPool, config: &Config) -> Self {
        Self {
            db,
            session_expiry_days: config.session.expiry_days,
        }
    }

    /// Log in with a PIN. Tries the admin PIN, then the shared staff
    /// PIN, then each active staff member's personal PIN.
    pub async fn login(
        &self,
        pin: &str,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> AppResult<LoginOutcome> {
        let pin = pin.trim();
        validate_pin(pin).map_err(|msg| AppError::validation("pin", msg))?;

        let settings = sqlx::query_as::<_, SettingsRow>(
            "SELECT branch_id, pin_hash, staff_pin_hash FROM settings LIMIT 1",
        )
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| {
            AppError::Configuration("System not configured. No settings found.".to_string())
        })?;

        let (role, staff_id) = self.resolve_pin(pin, &settings).await?;

        self.create_session(settings.branch_id, role, staff_id, ip_address, user_agent)
            .await
    }

    async fn resolve_pin(
        &self,
        pin: &str,
        settings: &SettingsRow,
    ) -> AppResult<(SessionRole, Option<Uuid>)> {
        if check_pin(pin, &settings.pin_hash)? {
            return Ok((SessionRole::Admin, None));
        }

        if let Some(staff_hash) = &settings.staff_pin_hash {
            if check_pin(pin, staff_hash)? {
                return Ok((SessionRole::Staff, None));
            }
        }

        let staff = sqlx::query_as::<_, StaffPinRow>(
            "SELECT id, pin_hash FROM staff WHERE is_active = TRUE",
        )
        .fetch_all(&self.db)
        .await?;

        for member in staff {
            if check_pin(pin, &member.pin_hash)? {
                return Ok((SessionRole::Staff, Some(member.id)));
            }
        }

        Err(AppError::InvalidPin)
    }

    async fn create_session(
        &self,
        branch_id: Uuid,
        role: SessionRole,
        staff_id: Option<Uuid>,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> AppResult<LoginOutcome> {
        let session_id = Uuid::new_v4();
        let now = Utc::now();
        let expires_at = now + Duration::days(self.session_expiry_days);

        sqlx::query(
            r#"
            INSERT INTO sessions (id, branch_id, role, staff_id, ip_address, user_agent, created_at, expires_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(session_id)
        .bind(branch_id)
        .bind(role.as_str())
        .bind(staff_id)
        .bind(ip_address)
        .bind(user_agent)
        .bind(now)
        .bind(expires_at)
        .execute(&self.db)
        .await?;

        Ok(LoginOutcome {
            session_id,
            role,
            staff_id,
            expires_at,
        })
    }

    /// Delete a session. Missing sessions are ignored so logout is
    /// idempotent.
    pub async fn logout(&self, session_id: Uuid) -> AppResult<()> {
        sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(session_id)
            .execute(&self.db)
            .await?;
        Ok(())
    }
}

fn check_pin(pin: &str, hash: &str) -> AppResult<bool> {
    verify(pin, hash).map_err(|e| AppError::Internal(format!("PIN verification failed: {}", e)))
}
