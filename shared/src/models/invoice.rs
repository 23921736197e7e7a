//! Invoice models
//!
//! An invoice is created exactly once, header and items in the same
//! transaction, and never mutated afterwards apart from the `is_void`
//! flag. `invoice_number` is strictly increasing per branch;
//! `invoice_code` is its zero-padded display form.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::InvoiceItemType;

use super::BranchInfo;

/// A membership invoice with its computed GST totals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub id: Uuid,
    pub invoice_number: i32,
    pub invoice_code: String,
    pub invoice_date: DateTime<Utc>,
    pub customer_name: String,
    pub customer_phone: String,
    pub taxable_subtotal: Decimal,
    pub cgst_amount: Decimal,
    pub sgst_amount: Decimal,
    pub total_gst: Decimal,
    pub nontaxable_subtotal: Decimal,
    pub grand_total: Decimal,
    pub is_void: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<BranchInfo>,
    pub items: Vec<InvoiceItem>,
}

/// A line on an invoice, owned by its invoice and written in the same
/// transaction as the header
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceItem {
    pub id: Uuid,
    pub item_type: InvoiceItemType,
    pub description: String,
    pub duration_days: Option<i32>,
    pub quantity: i32,
    pub base_amount: Decimal,
    pub line_total_before_tax: Decimal,
    pub is_taxable: bool,
    pub gst_rate: Decimal,
    pub plan_id: Option<Uuid>,
}
