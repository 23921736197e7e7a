//! Shop sales tests
//!
//! Covers checkout line arithmetic, payment mode handling, and the
//! period windows that sales history and summary reports query over.

use chrono::{Datelike, NaiveDate, Weekday};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::billing::round2;
use shared::periods::{lookback_start, period_bounds};
use shared::shop::{cart_total, price_line, StockShortfall};
use shared::types::{PaymentMode, PeriodMode};

/// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ============================================================================
// Checkout arithmetic
// ============================================================================

mod checkout {
    use super::*;

    #[test]
    fn line_total_is_price_times_quantity() {
        let line = price_line(dec("120.00"), 12, 3).unwrap();
        assert_eq!(line.line_total, dec("360.00"));
        assert_eq!(line.unit_price, dec("120.00"));
    }

    #[test]
    fn cart_total_sums_priced_lines() {
        let lines = [
            price_line(dec("120.00"), 12, 3).unwrap(), // protein bars
            price_line(dec("40.00"), 20, 2).unwrap(),  // water bottles
            price_line(dec("899.00"), 4, 1).unwrap(),  // shaker
        ];
        assert_eq!(cart_total(&lines), dec("1339.00"));
    }

    #[test]
    fn selling_the_last_units_is_allowed() {
        let line = price_line(dec("40.00"), 5, 5).unwrap();
        assert_eq!(line.quantity, 5);
        assert_eq!(line.line_total, dec("200.00"));
    }

    #[test]
    fn oversell_is_rejected_with_the_shortfall() {
        let err = price_line(dec("40.00"), 2, 5).unwrap_err();
        assert_eq!(
            err,
            StockShortfall {
                available: 2,
                requested: 5,
            }
        );
    }

    #[test]
    fn zero_stock_rejects_any_quantity() {
        assert!(price_line(dec("40.00"), 0, 1).is_err());
    }

    #[test]
    fn one_bad_line_fails_the_cart() {
        // The service rolls the whole transaction back on the first
        // shortfall; pricing stops at the failing line.
        let results = [
            price_line(dec("120.00"), 12, 3),
            price_line(dec("40.00"), 1, 2),
        ];
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
    }
}

// ============================================================================
// Payment modes
// ============================================================================

mod payment_modes {
    use super::*;

    #[test]
    fn stored_form_round_trips() {
        for mode in [PaymentMode::Cash, PaymentMode::Upi, PaymentMode::Split] {
            let stored = mode.as_str();
            assert_eq!(stored.parse::<PaymentMode>().unwrap(), mode);
        }
    }

    #[test]
    fn unknown_stored_value_is_an_error() {
        assert!("CARD".parse::<PaymentMode>().is_err());
        assert!("cash".parse::<PaymentMode>().is_err());
    }
}

// ============================================================================
// History period windows
// ============================================================================

mod periods {
    use super::*;

    #[test]
    fn day_window_is_exactly_24_hours() {
        let bounds = period_bounds(PeriodMode::Day, day(2025, 6, 15));
        assert_eq!((bounds.end - bounds.start).num_hours(), 24);
    }

    #[test]
    fn week_window_starts_monday() {
        // 2025-06-15 is a Sunday
        assert_eq!(day(2025, 6, 15).weekday(), Weekday::Sun);
        let bounds = period_bounds(PeriodMode::Week, day(2025, 6, 15));
        assert_eq!(bounds.start.date_naive(), day(2025, 6, 9));
        assert_eq!(bounds.start.date_naive().weekday(), Weekday::Mon);
        assert_eq!((bounds.end - bounds.start).num_days(), 7);
    }

    #[test]
    fn monday_is_its_own_week_start() {
        let bounds = period_bounds(PeriodMode::Week, day(2025, 6, 9));
        assert_eq!(bounds.start.date_naive(), day(2025, 6, 9));
    }

    #[test]
    fn month_window_covers_the_calendar_month() {
        let bounds = period_bounds(PeriodMode::Month, day(2025, 6, 15));
        assert_eq!(bounds.start.date_naive(), day(2025, 6, 1));
        assert_eq!(bounds.end.date_naive(), day(2025, 7, 1));
    }

    #[test]
    fn february_window_is_short() {
        let bounds = period_bounds(PeriodMode::Month, day(2025, 2, 10));
        assert_eq!((bounds.end - bounds.start).num_days(), 28);
    }

    #[test]
    fn half_open_bounds_never_overlap() {
        let today = period_bounds(PeriodMode::Day, day(2025, 6, 15));
        let tomorrow = period_bounds(PeriodMode::Day, day(2025, 6, 16));
        assert_eq!(today.end, tomorrow.start);
    }

    #[test]
    fn lookback_ranges() {
        let now = period_bounds(PeriodMode::Day, day(2025, 6, 15)).start;
        assert_eq!(
            lookback_start(Some("today"), now).unwrap().date_naive(),
            day(2025, 6, 15)
        );
        assert_eq!(
            lookback_start(Some("week"), now).unwrap().date_naive(),
            day(2025, 6, 8)
        );
        assert_eq!(
            lookback_start(Some("month"), now).unwrap().date_naive(),
            day(2025, 5, 16)
        );
        assert!(lookback_start(Some("all"), now).is_none());
    }
}

// ============================================================================
// Summary net calculation
// ============================================================================

mod summary {
    use super::*;

    #[test]
    fn net_is_revenue_plus_invoiced_minus_expenses() {
        let sales_revenue = dec("1339.00");
        let invoice_total = dec("2267.82");
        let expense_total = dec("800.00");
        let net = sales_revenue + invoice_total - expense_total;
        assert_eq!(net, dec("2806.82"));
    }

    #[test]
    fn net_can_go_negative() {
        let net = dec("100.00") + dec("0") - dec("250.00");
        assert_eq!(net, dec("-150.00"));
        assert!(net < Decimal::ZERO);
    }
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every date falls inside its own day/week/month window
    #[test]
    fn prop_date_within_its_own_window(
        year in 2020i32..2030,
        ordinal in 1u32..=365
    ) {
        let date = NaiveDate::from_yo_opt(year, ordinal).unwrap();
        for mode in [PeriodMode::Day, PeriodMode::Week, PeriodMode::Month] {
            let bounds = period_bounds(mode, date);
            let midday = date.and_hms_opt(12, 0, 0).unwrap().and_utc();
            prop_assert!(bounds.start <= midday && midday < bounds.end);
        }
    }

    /// Week windows are always Monday-aligned and 7 days long
    #[test]
    fn prop_week_windows_monday_aligned(
        year in 2020i32..2030,
        ordinal in 1u32..=365
    ) {
        let date = NaiveDate::from_yo_opt(year, ordinal).unwrap();
        let bounds = period_bounds(PeriodMode::Week, date);
        prop_assert_eq!(bounds.start.date_naive().weekday(), Weekday::Mon);
        prop_assert_eq!((bounds.end - bounds.start).num_days(), 7);
    }

    /// Priced lines keep paise precision and scale with quantity
    #[test]
    fn prop_line_total_scales(paise in 1i64..1_000_000, qty in 1i32..100) {
        let price = Decimal::new(paise, 2);
        let line = price_line(price, qty, qty).unwrap();
        prop_assert_eq!(line.line_total, price * Decimal::from(qty));
        prop_assert_eq!(round2(line.line_total), line.line_total);
    }

    /// A line is sellable exactly when stock covers the quantity
    #[test]
    fn prop_stock_check_boundary(stock in 0i32..100, qty in 1i32..100) {
        let result = price_line(Decimal::new(4000, 2), stock, qty);
        prop_assert_eq!(result.is_ok(), stock >= qty);
    }
}
