//! HTTP handlers for expenses

use axum::{extract::State, http::StatusCode, Json};

use crate::error::AppResult;
use crate::middleware::CurrentSession;
use crate::services::expense::CreateExpenseInput;
use crate::services::ExpenseService;
use crate::AppState;
use shared::models::Expense;

/// List recent expenses
pub async fn list_expenses(State(state): State<AppState>) -> AppResult<Json<Vec<Expense>>> {
    let service = ExpenseService::new(state.db);
    let expenses = service.list().await?;
    Ok(Json(expenses))
}

/// Record an expense
pub async fn create_expense(
    State(state): State<AppState>,
    session: CurrentSession,
    Json(input): Json<CreateExpenseInput>,
) -> AppResult<(StatusCode, Json<Expense>)> {
    let service = ExpenseService::new(state.db);
    let expense = service.create(session.0.branch_id, input).await?;
    Ok((StatusCode::CREATED, Json(expense)))
}
