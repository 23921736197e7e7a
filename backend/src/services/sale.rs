//! Shop checkout and sales history
//!
//! A checkout runs in one transaction: each cart product is locked,
//! stock-checked and decremented, then the sale header and its items
//! are written together. Either the whole cart commits or nothing does.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::{Sale, SaleItem};
use shared::periods::period_bounds;
use shared::shop::{cart_total, price_line, PricedLine};
use shared::types::{PaymentMode, PeriodMode};

/// Sale service
#[derive(Clone)]
pub struct SaleService {
    db: PgPool,
}

/// One cart line at checkout
#[derive(Debug, Deserialize)]
pub struct CartItem {
    pub product_id: Uuid,
    pub quantity: i32,
}

/// Input for a shop checkout
#[derive(Debug, Deserialize)]
pub struct CheckoutInput {
    pub items: Vec<CartItem>,
    pub payment_mode: PaymentMode,
    pub cash_amount: Option<Decimal>,
    pub upi_amount: Option<Decimal>,
}

/// Query parameters for sales history
#[derive(Debug, Default, Deserialize)]
pub struct SalesHistoryQuery {
    #[serde(default)]
    pub mode: PeriodMode,
    /// Date inside the requested period; defaults to today
    pub date: Option<NaiveDate>,
}

#[derive(FromRow)]
struct ProductForSale {
    id: Uuid,
    name: String,
    price: Decimal,
    stock: i32,
}

#[derive(FromRow)]
struct SaleHeaderRow {
    id: Uuid,
    staff_id: Option<Uuid>,
    total_amount: Decimal,
    payment_mode: String,
    cash_amount: Decimal,
    upi_amount: Decimal,
    sale_date: DateTime<Utc>,
}

#[derive(FromRow)]
struct SaleItemRow {
    id: Uuid,
    sale_id: Uuid,
    product_id: Uuid,
    product_name: String,
    quantity: i32,
    unit_price: Decimal,
    total: Decimal,
}

impl SaleService {
    /// Create a new SaleService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Check out a cart. Branch and staff both come from the login
    /// session.
    pub async fn checkout(
        &self,
        branch_id: Uuid,
        staff_id: Option<Uuid>,
        input: CheckoutInput,
    ) -> AppResult<Sale> {
        if input.items.is_empty() {
            return Err(AppError::validation("items", "Cart must not be empty"));
        }
        for item in &input.items {
            if item.quantity <= 0 {
                return Err(AppError::validation("items", "Quantity must be positive"));
            }
        }

        let cash_amount = input.cash_amount.unwrap_or(Decimal::ZERO);
        let upi_amount = input.upi_amount.unwrap_or(Decimal::ZERO);

        let mut tx = self.db.begin().await?;

        let mut lines: Vec<(ProductForSale, PricedLine)> = Vec::with_capacity(input.items.len());

        for item in &input.items {
            // Lock the product row so concurrent checkouts cannot both
            // pass the stock check.
            let product = sqlx::query_as::<_, ProductForSale>(
                r#"
                SELECT id, name, price, stock
                FROM products
                WHERE id = $1 AND is_active = TRUE
                FOR UPDATE
                "#,
            )
            .bind(item.product_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

            let priced =
                price_line(product.price, product.stock, item.quantity).map_err(|shortfall| {
                    AppError::InsufficientStock(format!(
                        "Only {} of '{}' left in stock",
                        shortfall.available, product.name
                    ))
                })?;

            sqlx::query("UPDATE products SET stock = stock - $1, updated_at = NOW() WHERE id = $2")
                .bind(priced.quantity)
                .bind(product.id)
                .execute(&mut *tx)
                .await?;

            lines.push((product, priced));
        }

        let priced_lines: Vec<PricedLine> = lines.iter().map(|(_, priced)| *priced).collect();
        let total_amount = cart_total(&priced_lines);

        let header = sqlx::query_as::<_, SaleHeaderRow>(
            r#"
            INSERT INTO sales (branch_id, staff_id, total_amount, payment_mode, cash_amount, upi_amount)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, staff_id, total_amount, payment_mode, cash_amount, upi_amount, sale_date
            "#,
        )
        .bind(branch_id)
        .bind(staff_id)
        .bind(total_amount)
        .bind(input.payment_mode.as_str())
        .bind(cash_amount)
        .bind(upi_amount)
        .fetch_one(&mut *tx)
        .await?;

        let mut items = Vec::with_capacity(lines.len());
        for (product, priced) in &lines {
            let item_id = sqlx::query_scalar::<_, Uuid>(
                r#"
                INSERT INTO sale_items (sale_id, product_id, quantity, unit_price, total)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id
                "#,
            )
            .bind(header.id)
            .bind(product.id)
            .bind(priced.quantity)
            .bind(priced.unit_price)
            .bind(priced.line_total)
            .fetch_one(&mut *tx)
            .await?;

            items.push(SaleItem {
                id: item_id,
                product_id: product.id,
                product_name: product.name.clone(),
                quantity: priced.quantity,
                unit_price: priced.unit_price,
                total: priced.line_total,
            });
        }

        tx.commit().await?;

        tracing::info!(sale_id = %header.id, total = %header.total_amount, "Sale recorded");

        build_sale(header, items)
    }

    /// Sales in the requested period, newest first, with product names
    /// on each line
    pub async fn history(&self, query: &SalesHistoryQuery) -> AppResult<Vec<Sale>> {
        let target = query.date.unwrap_or_else(|| Utc::now().date_naive());
        let bounds = period_bounds(query.mode, target);

        let headers = sqlx::query_as::<_, SaleHeaderRow>(
            r#"
            SELECT id, staff_id, total_amount, payment_mode, cash_amount, upi_amount, sale_date
            FROM sales
            WHERE sale_date >= $1 AND sale_date < $2
            ORDER BY sale_date DESC
            "#,
        )
        .bind(bounds.start)
        .bind(bounds.end)
        .fetch_all(&self.db)
        .await?;

        let ids: Vec<Uuid> = headers.iter().map(|h| h.id).collect();
        let item_rows = sqlx::query_as::<_, SaleItemRow>(
            r#"
            SELECT si.id, si.sale_id, si.product_id, p.name AS product_name,
                   si.quantity, si.unit_price, si.total
            FROM sale_items si
            JOIN products p ON p.id = si.product_id
            WHERE si.sale_id = ANY($1)
            ORDER BY si.id
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.db)
        .await?;

        headers
            .into_iter()
            .map(|header| {
                let items = item_rows
                    .iter()
                    .filter(|i| i.sale_id == header.id)
                    .map(|i| SaleItem {
                        id: i.id,
                        product_id: i.product_id,
                        product_name: i.product_name.clone(),
                        quantity: i.quantity,
                        unit_price: i.unit_price,
                        total: i.total,
                    })
                    .collect();
                build_sale(header, items)
            })
            .collect()
    }
}

fn build_sale(header: SaleHeaderRow, items: Vec<SaleItem>) -> AppResult<Sale> {
    let payment_mode = header
        .payment_mode
        .parse::<PaymentMode>()
        .map_err(AppError::Internal)?;

    Ok(Sale {
        id: header.id,
        staff_id: header.staff_id,
        total_amount: header.total_amount,
        payment_mode,
        cash_amount: header.cash_amount,
        upi_amount: header.upi_amount,
        sale_date: header.sale_date,
        items,
    })
}
