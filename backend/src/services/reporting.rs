//! Sales and expense reporting
//!
//! Aggregates the shop ledger, the invoice ledger and expenses over a
//! day/week/month window for the dashboard.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::error::AppResult;
use shared::periods::period_bounds;
use shared::types::PeriodMode;

/// Reporting service
#[derive(Clone)]
pub struct ReportingService {
    db: PgPool,
}

/// Query parameters for the summary report
#[derive(Debug, Default, Deserialize)]
pub struct SummaryQuery {
    #[serde(default)]
    pub mode: PeriodMode,
    pub date: Option<NaiveDate>,
}

/// Period totals across shop sales, invoices and expenses
#[derive(Debug, Serialize)]
pub struct PeriodSummary {
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    pub sales_count: i64,
    pub sales_revenue: Decimal,
    pub cash_total: Decimal,
    pub upi_total: Decimal,
    pub invoice_count: i64,
    pub invoice_total: Decimal,
    pub expense_total: Decimal,
    /// sales revenue + invoiced amount - expenses
    pub net: Decimal,
}

#[derive(FromRow)]
struct SalesAggRow {
    sales_count: i64,
    sales_revenue: Decimal,
    cash_total: Decimal,
    upi_total: Decimal,
}

#[derive(FromRow)]
struct InvoiceAggRow {
    invoice_count: i64,
    invoice_total: Decimal,
}

impl ReportingService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Totals for the period containing `date`
    pub async fn summary(&self, query: &SummaryQuery) -> AppResult<PeriodSummary> {
        let target = query.date.unwrap_or_else(|| Utc::now().date_naive());
        let bounds = period_bounds(query.mode, target);

        let sales = sqlx::query_as::<_, SalesAggRow>(
            r#"
            SELECT COUNT(*) AS sales_count,
                   COALESCE(SUM(total_amount), 0) AS sales_revenue,
                   COALESCE(SUM(cash_amount), 0) AS cash_total,
                   COALESCE(SUM(upi_amount), 0) AS upi_total
            FROM sales
            WHERE sale_date >= $1 AND sale_date < $2
            "#,
        )
        .bind(bounds.start)
        .bind(bounds.end)
        .fetch_one(&self.db)
        .await?;

        let invoices = sqlx::query_as::<_, InvoiceAggRow>(
            r#"
            SELECT COUNT(*) AS invoice_count,
                   COALESCE(SUM(grand_total), 0) AS invoice_total
            FROM invoices
            WHERE invoice_date >= $1 AND invoice_date < $2 AND is_void = FALSE
            "#,
        )
        .bind(bounds.start)
        .bind(bounds.end)
        .fetch_one(&self.db)
        .await?;

        let expense_total = sqlx::query_scalar::<_, Decimal>(
            "SELECT COALESCE(SUM(amount), 0) FROM expenses WHERE date >= $1 AND date < $2",
        )
        .bind(bounds.start.date_naive())
        .bind(bounds.end.date_naive())
        .fetch_one(&self.db)
        .await?;

        let net = sales.sales_revenue + invoices.invoice_total - expense_total;

        Ok(PeriodSummary {
            period_start: bounds.start,
            period_end: bounds.end,
            sales_count: sales.sales_count,
            sales_revenue: sales.sales_revenue,
            cash_total: sales.cash_total,
            upi_total: sales.upi_total,
            invoice_count: invoices.invoice_count,
            invoice_total: invoices.invoice_total,
            expense_total,
            net,
        })
    }
}
