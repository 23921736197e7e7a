//! Shop cart pricing
//!
//! The stock check and line pricing behind a checkout, kept pure so the
//! rules are testable without a database. A line is priced at the
//! product's current price; an oversell is rejected before any stock
//! moves.

use rust_decimal::Decimal;

/// A cart line priced against the current product row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricedLine {
    pub quantity: i32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

/// Requested more units than the shelf holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockShortfall {
    pub available: i32,
    pub requested: i32,
}

/// Price one cart line, rejecting it when stock cannot cover the
/// requested quantity.
pub fn price_line(
    unit_price: Decimal,
    stock: i32,
    quantity: i32,
) -> Result<PricedLine, StockShortfall> {
    if stock < quantity {
        return Err(StockShortfall {
            available: stock,
            requested: quantity,
        });
    }

    Ok(PricedLine {
        quantity,
        unit_price,
        line_total: unit_price * Decimal::from(quantity),
    })
}

/// Sum of the priced line totals.
pub fn cart_total(lines: &[PricedLine]) -> Decimal {
    lines.iter().map(|line| line.line_total).sum()
}
