//! Membership plan lookups

use sqlx::PgPool;

use crate::error::AppResult;
use shared::models::Plan;

/// Plan service
#[derive(Clone)]
pub struct PlanService {
    db: PgPool,
}

#[derive(sqlx::FromRow)]
struct PlanRowFull {
    id: uuid::Uuid,
    code: String,
    name: String,
    duration_days: Option<i32>,
    base_amount: rust_decimal::Decimal,
    is_taxable: bool,
    gst_rate: rust_decimal::Decimal,
    is_active: bool,
}

impl PlanService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List active plans, cheapest first
    pub async fn list_active(&self) -> AppResult<Vec<Plan>> {
        let rows = sqlx::query_as::<_, PlanRowFull>(
            r#"
            SELECT id, code, name, duration_days, base_amount, is_taxable, gst_rate, is_active
            FROM plans
            WHERE is_active = TRUE
            ORDER BY base_amount ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| Plan {
                id: r.id,
                code: r.code,
                name: r.name,
                duration_days: r.duration_days,
                base_amount: r.base_amount,
                is_taxable: r.is_taxable,
                gst_rate: r.gst_rate,
                is_active: r.is_active,
            })
            .collect())
    }
}
