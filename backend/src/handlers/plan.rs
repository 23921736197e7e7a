//! HTTP handlers for membership plans

use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::services::PlanService;
use crate::AppState;
use shared::models::Plan;

/// List active membership plans
pub async fn list_plans(State(state): State<AppState>) -> AppResult<Json<Vec<Plan>>> {
    let service = PlanService::new(state.db);
    let plans = service.list_active().await?;
    Ok(Json(plans))
}
