//! HTTP handlers for shop checkout and sales history

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

use crate::error::AppResult;
use crate::middleware::CurrentSession;
use crate::services::sale::{CheckoutInput, SalesHistoryQuery};
use crate::services::SaleService;
use crate::AppState;
use shared::models::Sale;

/// Check out the shop cart
pub async fn checkout(
    State(state): State<AppState>,
    session: CurrentSession,
    Json(input): Json<CheckoutInput>,
) -> AppResult<(StatusCode, Json<Sale>)> {
    let service = SaleService::new(state.db);
    let sale = service
        .checkout(session.0.branch_id, session.0.staff_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(sale)))
}

/// Sales in a day/week/month window
pub async fn sales_history(
    State(state): State<AppState>,
    Query(query): Query<SalesHistoryQuery>,
) -> AppResult<Json<Vec<Sale>>> {
    let service = SaleService::new(state.db);
    let sales = service.history(&query).await?;
    Ok(Json(sales))
}
