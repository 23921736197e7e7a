//! HTTP handlers for membership invoices

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    Json,
};

use crate::error::AppResult;
use crate::middleware::CurrentSession;
use crate::services::invoice::{CreateInvoiceInput, InvoiceListQuery, InvoiceSummary};
use crate::services::InvoiceService;
use crate::AppState;
use shared::models::Invoice;

/// Create a membership invoice
pub async fn create_invoice(
    State(state): State<AppState>,
    session: CurrentSession,
    Json(input): Json<CreateInvoiceInput>,
) -> AppResult<(StatusCode, Json<Invoice>)> {
    let service = InvoiceService::new(state.db);
    let invoice = service.create_invoice(session.0.branch_id, input).await?;
    Ok((StatusCode::CREATED, Json(invoice)))
}

/// List invoices with optional search and lookback range
pub async fn list_invoices(
    State(state): State<AppState>,
    Query(query): Query<InvoiceListQuery>,
) -> AppResult<Json<Vec<InvoiceSummary>>> {
    let service = InvoiceService::new(state.db);
    let invoices = service.list(&query).await?;
    Ok(Json(invoices))
}

/// Fetch a single invoice by its display code
pub async fn get_invoice(
    State(state): State<AppState>,
    Path(invoice_code): Path<String>,
) -> AppResult<Json<Invoice>> {
    let service = InvoiceService::new(state.db);
    let invoice = service.get_by_code(&invoice_code).await?;
    Ok(Json(invoice))
}

/// Export filtered invoices as a CSV download
pub async fn export_invoices(
    State(state): State<AppState>,
    Query(query): Query<InvoiceListQuery>,
) -> AppResult<([(header::HeaderName, String); 2], String)> {
    let service = InvoiceService::new(state.db);
    let csv = service.export_csv(&query).await?;

    Ok((
        [
            (
                header::CONTENT_TYPE,
                "text/csv; charset=utf-8".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"invoices-export.csv\"".to_string(),
            ),
        ],
        csv,
    ))
}
