//! HTTP handlers for staff management

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentSession;
use crate::services::staff::CreateStaffInput;
use crate::services::StaffService;
use crate::AppState;
use shared::models::Staff;

/// List active staff
pub async fn list_staff(State(state): State<AppState>) -> AppResult<Json<Vec<Staff>>> {
    let service = StaffService::new(state.db);
    let staff = service.list_active().await?;
    Ok(Json(staff))
}

/// Add a staff member
pub async fn create_staff(
    State(state): State<AppState>,
    session: CurrentSession,
    Json(input): Json<CreateStaffInput>,
) -> AppResult<(StatusCode, Json<Staff>)> {
    let service = StaffService::new(state.db);
    let member = service.create(session.0.branch_id, input).await?;
    Ok((StatusCode::CREATED, Json(member)))
}

/// Soft delete a staff member
pub async fn delete_staff(
    State(state): State<AppState>,
    Path(staff_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = StaffService::new(state.db);
    service.deactivate(staff_id).await?;
    Ok(Json(()))
}
