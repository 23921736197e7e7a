//! GST invoice totals tests
//!
//! Covers the billing arithmetic behind membership invoices:
//! - accumulate-then-round subtotals
//! - CGST/SGST equal split with independent rounding
//! - grand total additivity

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::billing::{calculate_invoice_totals, round2, LineItem};

/// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn taxable(amount: &str, rate: &str) -> LineItem {
    LineItem {
        amount: dec(amount),
        is_taxable: true,
        gst_rate: dec(rate),
    }
}

fn nontaxable(amount: &str) -> LineItem {
    LineItem {
        amount: dec(amount),
        is_taxable: false,
        gst_rate: Decimal::ZERO,
    }
}

// ============================================================================
// Worked invoice scenarios
// ============================================================================

mod scenarios {
    use super::*;

    #[test]
    fn quarterly_membership_invoice() {
        // 1499 membership at 18% GST
        let totals = calculate_invoice_totals(&[taxable("1499", "18")]);

        assert_eq!(totals.taxable_subtotal, dec("1499.00"));
        assert_eq!(totals.total_gst, dec("269.82"));
        assert_eq!(totals.cgst_amount, dec("134.91"));
        assert_eq!(totals.sgst_amount, dec("134.91"));
        assert_eq!(totals.grand_total, dec("1768.82"));
    }

    #[test]
    fn membership_with_registration_fee() {
        // Registration fee is outside GST
        let totals = calculate_invoice_totals(&[taxable("1499", "18"), nontaxable("499")]);

        assert_eq!(totals.taxable_subtotal, dec("1499.00"));
        assert_eq!(totals.total_gst, dec("269.82"));
        assert_eq!(totals.nontaxable_subtotal, dec("499.00"));
        assert_eq!(totals.grand_total, dec("2267.82"));
    }

    #[test]
    fn membership_fee_and_trainer_addon() {
        let totals = calculate_invoice_totals(&[
            taxable("1499", "18"),
            nontaxable("499"),
            nontaxable("5000"),
        ]);

        assert_eq!(totals.nontaxable_subtotal, dec("5499.00"));
        assert_eq!(totals.grand_total, dec("7267.82"));
    }

    #[test]
    fn empty_item_list() {
        let totals = calculate_invoice_totals(&[]);
        assert_eq!(totals.grand_total, Decimal::ZERO);
        assert_eq!(totals.total_gst, Decimal::ZERO);
    }
}

// ============================================================================
// Rounding discipline
// ============================================================================

mod rounding {
    use super::*;

    #[test]
    fn half_cents_round_away_from_zero() {
        assert_eq!(round2(dec("269.825")), dec("269.83"));
        assert_eq!(round2(dec("134.905")), dec("134.91"));
        assert_eq!(round2(dec("-1.005")), dec("-1.01"));
    }

    #[test]
    fn subtotals_round_once_not_per_line() {
        // Per-line rounding would give 33.34 * 3 = 100.02
        let items = [
            nontaxable("33.335"),
            nontaxable("33.335"),
            nontaxable("33.335"),
        ];
        let totals = calculate_invoice_totals(&items);
        assert_eq!(totals.nontaxable_subtotal, dec("100.01"));
    }

    #[test]
    fn gst_accumulates_before_rounding() {
        // Each line's GST is 0.0009; per-line rounding would lose both
        let items = [taxable("0.005", "18"), taxable("0.005", "18")];
        let totals = calculate_invoice_totals(&items);
        assert_eq!(totals.taxable_subtotal, dec("0.01"));
        assert_eq!(totals.total_gst, dec("0.00"));
    }
}

// ============================================================================
// CGST/SGST split
// ============================================================================

mod gst_split {
    use super::*;

    #[test]
    fn halves_are_always_equal() {
        for amount in ["1499", "999", "150.50", "0.01", "123456.78"] {
            let totals = calculate_invoice_totals(&[taxable(amount, "18")]);
            assert_eq!(totals.cgst_amount, totals.sgst_amount);
        }
    }

    #[test]
    fn even_cent_total_splits_exactly() {
        let totals = calculate_invoice_totals(&[taxable("1000", "18")]);
        assert_eq!(totals.total_gst, dec("180.00"));
        assert_eq!(totals.cgst_amount + totals.sgst_amount, dec("180.00"));
    }

    #[test]
    fn odd_cent_total_drifts_at_most_one_cent() {
        // 150.50 at 1% -> 1.51 GST, halves round to 0.76 each
        let totals = calculate_invoice_totals(&[taxable("150.50", "1")]);
        assert_eq!(totals.total_gst, dec("1.51"));
        assert_eq!(totals.cgst_amount, dec("0.76"));
        let drift = (totals.cgst_amount + totals.sgst_amount - totals.total_gst).abs();
        assert!(drift <= dec("0.01"));
    }

    #[test]
    fn zero_rate_line_contributes_no_gst() {
        let totals = calculate_invoice_totals(&[LineItem {
            amount: dec("750"),
            is_taxable: true,
            gst_rate: Decimal::ZERO,
        }]);
        assert_eq!(totals.total_gst, Decimal::ZERO);
        assert_eq!(totals.nontaxable_subtotal, dec("750.00"));
    }
}

// ============================================================================
// Property tests
// ============================================================================

fn amount_strategy() -> impl Strategy<Value = Decimal> {
    // Paise-precision amounts up to 1 lakh
    (1i64..=10_000_000).prop_map(|paise| Decimal::new(paise, 2))
}

fn line_strategy() -> impl Strategy<Value = LineItem> {
    (amount_strategy(), any::<bool>()).prop_map(|(amount, is_taxable)| LineItem {
        amount,
        is_taxable,
        gst_rate: if is_taxable {
            Decimal::from(18)
        } else {
            Decimal::ZERO
        },
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Grand total is the sum of the three rounded aggregates
    #[test]
    fn prop_grand_total_additivity(items in prop::collection::vec(line_strategy(), 0..8)) {
        let totals = calculate_invoice_totals(&items);
        prop_assert_eq!(
            totals.grand_total,
            round2(totals.taxable_subtotal + totals.total_gst + totals.nontaxable_subtotal)
        );
    }

    /// All aggregates are non-negative for non-negative inputs
    #[test]
    fn prop_totals_non_negative(items in prop::collection::vec(line_strategy(), 0..8)) {
        let totals = calculate_invoice_totals(&items);
        prop_assert!(totals.taxable_subtotal >= Decimal::ZERO);
        prop_assert!(totals.total_gst >= Decimal::ZERO);
        prop_assert!(totals.nontaxable_subtotal >= Decimal::ZERO);
        prop_assert!(totals.grand_total >= Decimal::ZERO);
    }

    /// CGST and SGST are equal and their sum is within one cent of
    /// total GST
    #[test]
    fn prop_split_within_one_cent(items in prop::collection::vec(line_strategy(), 0..8)) {
        let totals = calculate_invoice_totals(&items);
        prop_assert_eq!(totals.cgst_amount, totals.sgst_amount);
        let drift = (totals.cgst_amount + totals.sgst_amount - totals.total_gst).abs();
        prop_assert!(drift <= Decimal::new(1, 2));
    }

    /// GST at 18% equals 18% of the taxable subtotal (single rate)
    #[test]
    fn prop_single_rate_gst(amount in amount_strategy()) {
        let totals = calculate_invoice_totals(&[LineItem {
            amount,
            is_taxable: true,
            gst_rate: Decimal::from(18),
        }]);
        prop_assert_eq!(totals.total_gst, round2(amount * Decimal::from(18) / Decimal::from(100)));
    }

    /// Non-taxable lines never touch the taxable side
    #[test]
    fn prop_nontaxable_isolation(amount in amount_strategy()) {
        let totals = calculate_invoice_totals(&[LineItem {
            amount,
            is_taxable: false,
            gst_rate: Decimal::ZERO,
        }]);
        prop_assert_eq!(totals.taxable_subtotal, Decimal::ZERO);
        prop_assert_eq!(totals.total_gst, Decimal::ZERO);
        prop_assert_eq!(totals.nontaxable_subtotal, round2(amount));
    }
}
