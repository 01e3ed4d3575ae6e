//! Property tests for the slab engine and the regime comparison.

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tax_core::{
    Recommendation, ValidationError, compute_new_regime_tax, compute_old_regime_tax, evaluate,
    find_break_even_deduction,
};

fn rupees(value: u64) -> Decimal {
    Decimal::from(value)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn new_regime_tax_is_never_negative(income in 0u64..50_000_000) {
        let result = compute_new_regime_tax(rupees(income));

        prop_assert!(result.total_tax >= Decimal::ZERO);
    }

    #[test]
    fn new_regime_is_exactly_zero_up_to_twelve_lakh(income in 0u64..=1_200_000) {
        let result = compute_new_regime_tax(rupees(income));

        prop_assert_eq!(result.total_tax, Decimal::ZERO);
    }

    #[test]
    fn old_regime_taxable_income_and_tax_are_non_negative(
        income in 0u64..50_000_000,
        share_bp in 0u64..=10_000
    ) {
        let income = rupees(income);
        let deductions = (income * rupees(share_bp) / dec!(10000)).floor();
        let result = compute_old_regime_tax(income, deductions);

        prop_assert!(result.taxable_income >= Decimal::ZERO);
        prop_assert!(result.total_tax >= Decimal::ZERO);
    }

    #[test]
    fn more_deductions_never_raise_old_regime_tax(
        income in 0u64..20_000_000,
        low_bp in 0u64..=10_000,
        extra_bp in 0u64..=10_000
    ) {
        let income = rupees(income);
        let low = (income * rupees(low_bp) / dec!(10000)).floor();
        let high = (low + (income - low) * rupees(extra_bp) / dec!(10000)).floor();

        let tax_low = compute_old_regime_tax(income, low).total_tax;
        let tax_high = compute_old_regime_tax(income, high).total_tax;

        prop_assert!(tax_high <= tax_low, "{tax_high} > {tax_low} for {low} -> {high}");
    }

    #[test]
    fn breakdown_sums_to_total_in_both_regimes(
        income in 0u64..30_000_000,
        share_bp in 0u64..=10_000
    ) {
        let income = rupees(income);
        let deductions = (income * rupees(share_bp) / dec!(10000)).floor();

        let new = compute_new_regime_tax(income);
        let old = compute_old_regime_tax(income, deductions);

        prop_assert_eq!(new.tax_from_breakdown(), new.total_tax);
        prop_assert_eq!(old.tax_from_breakdown(), old.total_tax);
    }

    #[test]
    fn recommendation_matches_lower_total(
        income in 0u64..30_000_000,
        share_bp in 0u64..=10_000
    ) {
        let income = rupees(income);
        let deductions = (income * rupees(share_bp) / dec!(10000)).floor();
        let report = evaluate(income, deductions).unwrap();

        let expected = if report.new_regime.total_tax < report.old_regime.total_tax {
            Recommendation::New
        } else if report.old_regime.total_tax < report.new_regime.total_tax {
            Recommendation::Old
        } else {
            Recommendation::Equal
        };
        prop_assert_eq!(report.recommended_regime, expected);
        prop_assert_eq!(
            report.savings,
            (report.new_regime.total_tax - report.old_regime.total_tax).abs()
        );
    }

    #[test]
    fn deductions_above_income_are_rejected(income in 0u64..10_000_000, excess in 1u64..1_000_000) {
        prop_assert_eq!(
            evaluate(rupees(income), rupees(income + excess)),
            Err(ValidationError::ExcessiveDeductions)
        );
    }

    #[test]
    fn break_even_lands_within_one_rupee_when_in_range(income in 1_275_001u64..10_000_000) {
        let income = rupees(income);
        let target = compute_new_regime_tax(income).total_tax;

        let deduction = find_break_even_deduction(income);

        if deduction <= income {
            let old_tax = compute_old_regime_tax(income, deduction).total_tax;
            prop_assert!((old_tax - target).abs() < Decimal::ONE);
        }
    }
}

/// Crossing a slab boundary by one rupee changes the tax by at most the top
/// marginal rate, outside the rebate cliff.
#[test]
fn new_regime_is_continuous_across_slab_boundaries() {
    let standard_deduction = dec!(75000);
    for boundary in [1_600_000u64, 2_000_000, 2_400_000] {
        let at = rupees(boundary) + standard_deduction;
        let below = compute_new_regime_tax(at - Decimal::ONE).total_tax;
        let on = compute_new_regime_tax(at).total_tax;
        let above = compute_new_regime_tax(at + Decimal::ONE).total_tax;

        assert!(on - below <= dec!(0.30), "jump below {boundary}");
        assert!(above - on <= dec!(0.30), "jump above {boundary}");
        assert!(above > on && on > below);
    }
}

#[test]
fn old_regime_is_continuous_across_slab_boundaries() {
    let standard_deduction = dec!(50000);
    for boundary in [250_000u64, 500_000, 1_000_000] {
        let at = rupees(boundary) + standard_deduction;
        let below = compute_old_regime_tax(at - Decimal::ONE, Decimal::ZERO).total_tax;
        let above = compute_old_regime_tax(at + Decimal::ONE, Decimal::ZERO).total_tax;

        assert!(above - below <= dec!(0.60), "jump across {boundary}");
    }
}

#[test]
fn concrete_scenarios() {
    assert_eq!(compute_new_regime_tax(dec!(1000000)).total_tax, dec!(0));
    assert_eq!(compute_new_regime_tax(dec!(1500000)).total_tax, dec!(93750));
    assert_eq!(
        compute_old_regime_tax(dec!(1500000), dec!(200000)).total_tax,
        dec!(187500)
    );
    assert_eq!(
        evaluate(dec!(800000), dec!(800000)).unwrap().old_regime.total_tax,
        dec!(0)
    );
    assert_eq!(
        evaluate(dec!(2000000), dec!(-5)),
        Err(ValidationError::NegativeDeductions)
    );
    assert_eq!(
        evaluate(dec!(-1), dec!(0)),
        Err(ValidationError::InvalidIncome)
    );
}
