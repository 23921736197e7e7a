//! HTTP handlers for reporting

use axum::{
    extract::{Query, State},
    Json,
};

use crate::error::AppResult;
use crate::services::reporting::{PeriodSummary, SummaryQuery};
use crate::services::ReportingService;
use crate::AppState;

/// Period summary across sales, invoices and expenses
pub async fn report_summary(
    State(state): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> AppResult<Json<PeriodSummary>> {
    let service = ReportingService::new(state.db);
    let summary = service.summary(&query).await?;
    Ok(Json(summary))
}
