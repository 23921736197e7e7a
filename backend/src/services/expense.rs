//! Branch expense tracking

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::Expense;
use shared::validation::validate_positive_amount;

/// Expense service
#[derive(Clone)]
pub struct ExpenseService {
    db: PgPool,
}

/// Input for recording an expense
#[derive(Debug, Deserialize)]
pub struct CreateExpenseInput {
    pub title: String,
    pub amount: Decimal,
    pub category: Option<String>,
    pub date: NaiveDate,
}

#[derive(FromRow)]
struct ExpenseRow {
    id: Uuid,
    title: String,
    amount: Decimal,
    category: Option<String>,
    date: NaiveDate,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<ExpenseRow> for Expense {
    fn from(r: ExpenseRow) -> Self {
        Expense {
            id: r.id,
            title: r.title,
            amount: r.amount,
            category: r.category,
            date: r.date,
            created_at: r.created_at,
        }
    }
}

impl ExpenseService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Most recent expenses, capped at 100
    pub async fn list(&self) -> AppResult<Vec<Expense>> {
        let rows = sqlx::query_as::<_, ExpenseRow>(
            r#"
            SELECT id, title, amount, category, date, created_at
            FROM expenses
            ORDER BY date DESC, created_at DESC
            LIMIT 100
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Expense::from).collect())
    }

    /// Record an expense against the session's branch
    pub async fn create(&self, branch_id: Uuid, input: CreateExpenseInput) -> AppResult<Expense> {
        let title = input.title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::validation("title", "Title is required"));
        }
        validate_positive_amount(input.amount)
            .map_err(|msg| AppError::validation("amount", msg))?;

        let row = sqlx::query_as::<_, ExpenseRow>(
            r#"
            INSERT INTO expenses (branch_id, title, amount, category, date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, amount, category, date, created_at
            "#,
        )
        .bind(branch_id)
        .bind(&title)
        .bind(input.amount)
        .bind(&input.category)
        .bind(input.date)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }
}
