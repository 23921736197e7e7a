//! GST invoice totals and invoice numbering
//!
//! Pure billing arithmetic, kept free of persistence concerns so the
//! rules can be tested exhaustively. Amounts accumulate at full
//! precision and each aggregate is rounded exactly once at the end.
//! CGST and SGST are each half of total GST, rounded independently; on
//! an odd cent both halves round up and together overshoot the total
//! by one cent, which is how the printed invoice must read.

use rust_decimal::{Decimal, RoundingStrategy};

/// Minimum digits in a printed invoice code. Numbers past 999 keep all
/// their digits.
pub const INVOICE_CODE_MIN_WIDTH: usize = 3;

/// One billable line: the base amount and its tax treatment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineItem {
    pub amount: Decimal,
    pub is_taxable: bool,
    /// GST percentage, e.g. 18 for 18%
    pub gst_rate: Decimal,
}

/// Computed totals for an invoice, all rounded to 2 decimal places.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvoiceTotals {
    pub taxable_subtotal: Decimal,
    pub cgst_amount: Decimal,
    pub sgst_amount: Decimal,
    pub total_gst: Decimal,
    pub nontaxable_subtotal: Decimal,
    pub grand_total: Decimal,
}

/// Round to 2 decimal places, half away from zero.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Compute invoice totals from line items.
///
/// A line participates in GST only when it is flagged taxable AND has a
/// positive rate; everything else goes to the non-taxable subtotal.
/// Sums accumulate unrounded, then each aggregate is rounded once.
pub fn calculate_invoice_totals(items: &[LineItem]) -> InvoiceTotals {
    let mut taxable = Decimal::ZERO;
    let mut gst = Decimal::ZERO;
    let mut nontaxable = Decimal::ZERO;

    for item in items {
        if item.is_taxable && item.gst_rate > Decimal::ZERO {
            taxable += item.amount;
            gst += item.amount * item.gst_rate / Decimal::ONE_HUNDRED;
        } else {
            nontaxable += item.amount;
        }
    }

    let taxable_subtotal = round2(taxable);
    let total_gst = round2(gst);
    let nontaxable_subtotal = round2(nontaxable);

    // Equal halves, rounded independently. cgst + sgst may overshoot
    // total_gst by one cent; the statutory lines are what they are.
    let half_gst = round2(total_gst / Decimal::TWO);

    InvoiceTotals {
        taxable_subtotal,
        cgst_amount: half_gst,
        sgst_amount: half_gst,
        total_gst,
        nontaxable_subtotal,
        grand_total: round2(taxable_subtotal + total_gst + nontaxable_subtotal),
    }
}

/// Next invoice number after the highest one assigned so far.
pub fn next_invoice_number(last: Option<i32>) -> i32 {
    last.unwrap_or(0) + 1
}

/// Printed form of an invoice number: zero-padded to three digits.
pub fn invoice_code(number: i32) -> String {
    format!("{:0width$}", number, width = INVOICE_CODE_MIN_WIDTH)
}
