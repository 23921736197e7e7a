//! Shop sale models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::PaymentMode;

/// A completed shop checkout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    pub id: Uuid,
    pub staff_id: Option<Uuid>,
    pub total_amount: Decimal,
    pub payment_mode: PaymentMode,
    pub cash_amount: Decimal,
    pub upi_amount: Decimal,
    pub sale_date: DateTime<Utc>,
    pub items: Vec<SaleItem>,
}

/// A line in a sale, priced at checkout time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleItem {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total: Decimal,
}
