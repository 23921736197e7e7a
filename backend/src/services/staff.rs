//! Staff management

use bcrypt::{hash, DEFAULT_COST};
use serde::Deserialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::Staff;
use shared::validation::validate_pin;

/// Staff service
#[derive(Clone)]
pub struct StaffService {
    db: PgPool,
}

/// Input for adding a staff member
#[derive(Debug, Deserialize)]
pub struct CreateStaffInput {
    pub name: String,
    pub pin: String,
}

#[derive(FromRow)]
struct StaffRow {
    id: Uuid,
    name: String,
    is_active: bool,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<StaffRow> for Staff {
    fn from(r: StaffRow) -> Self {
        Staff {
            id: r.id,
            name: r.name,
            is_active: r.is_active,
            created_at: r.created_at,
        }
    }
}

impl StaffService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Active staff by name
    pub async fn list_active(&self) -> AppResult<Vec<Staff>> {
        let rows = sqlx::query_as::<_, StaffRow>(
            "SELECT id, name, is_active, created_at FROM staff WHERE is_active = TRUE ORDER BY name ASC",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Staff::from).collect())
    }

    /// Add a staff member with a personal login PIN
    pub async fn create(&self, branch_id: Uuid, input: CreateStaffInput) -> AppResult<Staff> {
        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::validation("name", "Name is required"));
        }
        let pin = input.pin.trim();
        validate_pin(pin).map_err(|msg| AppError::validation("pin", msg))?;

        let pin_hash =
            hash(pin, DEFAULT_COST).map_err(|e| AppError::Internal(format!("PIN hashing failed: {}", e)))?;

        let row = sqlx::query_as::<_, StaffRow>(
            r#"
            INSERT INTO staff (branch_id, name, pin_hash)
            VALUES ($1, $2, $3)
            RETURNING id, name, is_active, created_at
            "#,
        )
        .bind(branch_id)
        .bind(&name)
        .bind(&pin_hash)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Soft delete: the member disappears from rosters but stays on old
    /// sales
    pub async fn deactivate(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("UPDATE staff SET is_active = FALSE WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Staff member".to_string()));
        }
        Ok(())
    }
}
