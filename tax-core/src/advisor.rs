//! Regime comparison entry point.
//!
//! [`TaxAdvisor`] validates raw inputs, runs both regime calculators and folds
//! the results into a [`ComparisonReport`].
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::{Recommendation, TaxAdvisor};
//!
//! let advisor = TaxAdvisor::default();
//! let report = advisor.evaluate(dec!(1500000), dec!(200000)).unwrap();
//!
//! assert_eq!(report.new_regime.total_tax, dec!(93750));
//! assert_eq!(report.old_regime.total_tax, dec!(187500));
//! assert_eq!(report.recommended_regime, Recommendation::New);
//! assert_eq!(report.savings, dec!(93750));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, warn};

use crate::calculations::{BreakEven, BreakEvenSolver, DEFAULT_TOLERANCE, RegimeCalculator};
use crate::{
    BreakEvenHint, ComparisonReport, Recommendation, Regime, RegimeResult, SlabTable,
    SlabTableError,
};

/// Input problems detected before any tax is computed.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a valid positive income amount.")]
    InvalidIncome,

    #[error("Deductions cannot be negative.")]
    NegativeDeductions,

    #[error("Deductions cannot be more than income.")]
    ExcessiveDeductions,
}

/// Table configuration could not be used to build an advisor.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AdvisorError {
    #[error("{regime} regime table is invalid: {source}")]
    InvalidTable {
        regime: &'static str,
        #[source]
        source: SlabTableError,
    },

    #[error("expected a {expected} regime table, got {found}")]
    WrongRegime {
        expected: &'static str,
        found: &'static str,
    },

    #[error("break-even tolerance must be positive, got {0}")]
    InvalidTolerance(Decimal),
}

/// Compares the new and old regimes for a taxpayer.
///
/// Holds no per-call state; one advisor can serve any number of
/// evaluations.
#[derive(Debug, Clone)]
pub struct TaxAdvisor {
    new_table: SlabTable,
    old_table: SlabTable,
    break_even_tolerance: Decimal,
}

impl Default for TaxAdvisor {
    fn default() -> Self {
        Self {
            new_table: SlabTable::new_regime(),
            old_table: SlabTable::old_regime(),
            break_even_tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl TaxAdvisor {
    /// Builds an advisor from custom tables after validating them.
    ///
    /// # Errors
    ///
    /// Returns [`AdvisorError`] if either table is malformed or the tables
    /// are passed for the wrong regime.
    pub fn with_tables(
        new_table: SlabTable,
        old_table: SlabTable,
    ) -> Result<Self, AdvisorError> {
        for (table, expected) in [(&new_table, Regime::New), (&old_table, Regime::Old)] {
            if table.regime != expected {
                return Err(AdvisorError::WrongRegime {
                    expected: expected.as_str(),
                    found: table.regime.as_str(),
                });
            }
            table.validate().map_err(|source| AdvisorError::InvalidTable {
                regime: expected.as_str(),
                source,
            })?;
        }

        Ok(Self {
            new_table,
            old_table,
            break_even_tolerance: DEFAULT_TOLERANCE,
        })
    }

    /// Replaces the rupee tolerance used by the break-even search.
    pub fn with_break_even_tolerance(
        mut self,
        tolerance: Decimal,
    ) -> Result<Self, AdvisorError> {
        if tolerance <= Decimal::ZERO {
            return Err(AdvisorError::InvalidTolerance(tolerance));
        }
        self.break_even_tolerance = tolerance;
        Ok(self)
    }

    pub fn new_table(&self) -> &SlabTable {
        &self.new_table
    }

    pub fn old_table(&self) -> &SlabTable {
        &self.old_table
    }

    pub fn solver(&self) -> BreakEvenSolver<'_> {
        BreakEvenSolver::new(&self.new_table, &self.old_table)
            .with_tolerance(self.break_even_tolerance)
    }

    /// Gross income at or below which the new regime owes nothing, making
    /// itemized deductions irrelevant to the recommendation.
    pub fn deductions_relevant_above(&self) -> Decimal {
        self.new_table
            .tax_free_gross_limit()
            .unwrap_or(self.new_table.standard_deduction + self.new_table.zero_rate_limit())
    }

    /// Validates the inputs and compares both regimes.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if:
    /// - `income` is negative
    /// - `deductions` is negative
    /// - `deductions` exceeds `income`
    pub fn evaluate(
        &self,
        income: Decimal,
        deductions: Decimal,
    ) -> Result<ComparisonReport, ValidationError> {
        validate_inputs(income, deductions).inspect_err(|error| {
            warn!(%income, %deductions, %error, "rejected tax inputs");
        })?;

        let new_regime = self.compute_new_regime_tax(income);
        let old_regime = self.compute_old_regime_tax(income, deductions);

        let recommended_regime = recommend(&new_regime, &old_regime);
        let savings = (new_regime.total_tax - old_regime.total_tax).abs();
        let tax_free_under_new_regime = new_regime.total_tax.is_zero();
        let break_even = self.hint_for(income);

        debug!(
            %income,
            %deductions,
            new_tax = %new_regime.total_tax,
            old_tax = %old_regime.total_tax,
            ?recommended_regime,
            "regimes compared"
        );

        Ok(ComparisonReport {
            income,
            deductions,
            new_regime_effective_rate: new_regime.effective_rate(income),
            old_regime_effective_rate: old_regime.effective_rate(income),
            new_regime,
            old_regime,
            recommended_regime,
            savings,
            tax_free_under_new_regime,
            break_even,
        })
    }

    /// Suggests the old-regime deduction that would match the new regime.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidIncome`] if `income` is negative.
    pub fn break_even_hint(
        &self,
        income: Decimal,
    ) -> Result<BreakEvenHint, ValidationError> {
        if income < Decimal::ZERO {
            return Err(ValidationError::InvalidIncome);
        }
        Ok(self.hint_for(income))
    }

    pub fn compute_new_regime_tax(
        &self,
        income: Decimal,
    ) -> RegimeResult {
        RegimeCalculator::new(&self.new_table).calculate(income, Decimal::ZERO)
    }

    pub fn compute_old_regime_tax(
        &self,
        income: Decimal,
        deductions: Decimal,
    ) -> RegimeResult {
        RegimeCalculator::new(&self.old_table).calculate(income, deductions)
    }

    /// Only searches when the new regime is cheaper with no deductions
    /// claimed; otherwise there is nothing to catch up to.
    fn hint_for(
        &self,
        income: Decimal,
    ) -> BreakEvenHint {
        let new_tax = self.compute_new_regime_tax(income).total_tax;
        let old_tax = self.compute_old_regime_tax(income, Decimal::ZERO).total_tax;

        if new_tax >= old_tax {
            return BreakEvenHint::NotNeeded;
        }

        match self.solver().analyze(income) {
            BreakEven::Deduction(amount) => BreakEvenHint::Deduction(amount),
            BreakEven::Unreachable => BreakEvenHint::Unreachable,
        }
    }
}

fn validate_inputs(
    income: Decimal,
    deductions: Decimal,
) -> Result<(), ValidationError> {
    if income < Decimal::ZERO {
        return Err(ValidationError::InvalidIncome);
    }
    if deductions < Decimal::ZERO {
        return Err(ValidationError::NegativeDeductions);
    }
    if deductions > income {
        return Err(ValidationError::ExcessiveDeductions);
    }
    Ok(())
}

fn recommend(
    new_regime: &RegimeResult,
    old_regime: &RegimeResult,
) -> Recommendation {
    match new_regime.total_tax.cmp(&old_regime.total_tax) {
        std::cmp::Ordering::Less => Recommendation::New,
        std::cmp::Ordering::Greater => Recommendation::Old,
        std::cmp::Ordering::Equal => Recommendation::Equal,
    }
}

/// Compares both regimes using the compiled-in FY 2025-26 tables.
pub fn evaluate(
    income: Decimal,
    deductions: Decimal,
) -> Result<ComparisonReport, ValidationError> {
    TaxAdvisor::default().evaluate(income, deductions)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // validation tests
    // =========================================================================

    #[test]
    fn rejects_negative_income() {
        assert_eq!(
            evaluate(dec!(-1), dec!(0)),
            Err(ValidationError::InvalidIncome)
        );
    }

    #[test]
    fn rejects_negative_deductions() {
        assert_eq!(
            evaluate(dec!(2000000), dec!(-5)),
            Err(ValidationError::NegativeDeductions)
        );
    }

    #[test]
    fn rejects_deductions_above_income() {
        assert_eq!(
            evaluate(dec!(500000), dec!(500001)),
            Err(ValidationError::ExcessiveDeductions)
        );
    }

    #[test]
    fn income_is_checked_before_deductions() {
        assert_eq!(
            evaluate(dec!(-10), dec!(-5)),
            Err(ValidationError::InvalidIncome)
        );
    }

    #[test]
    fn validation_messages_are_human_readable() {
        assert_eq!(
            ValidationError::ExcessiveDeductions.to_string(),
            "Deductions cannot be more than income."
        );
    }

    // =========================================================================
    // comparison tests
    // =========================================================================

    #[test]
    fn ten_lakh_is_tax_free_under_new_regime() {
        let report = evaluate(dec!(1000000), dec!(0)).unwrap();

        assert_eq!(report.new_regime.total_tax, dec!(0));
        assert!(report.tax_free_under_new_regime);
        assert_eq!(report.old_regime.total_tax, dec!(102500));
        assert_eq!(report.recommended_regime, Recommendation::New);
        assert_eq!(report.savings, dec!(102500));
    }

    #[test]
    fn fifteen_lakh_without_deductions_prefers_new_regime() {
        let report = evaluate(dec!(1500000), dec!(0)).unwrap();

        assert_eq!(report.new_regime.total_tax, dec!(93750));
        // taxable 14,50,000: 12,500 + 1,00,000 + 1,35,000
        assert_eq!(report.old_regime.total_tax, dec!(247500));
        assert_eq!(report.recommended_regime, Recommendation::New);
        assert_eq!(report.savings, dec!(153750));
        assert!(!report.tax_free_under_new_regime);
    }

    #[test]
    fn deductions_equal_to_income_are_accepted() {
        let report = evaluate(dec!(800000), dec!(800000)).unwrap();

        assert_eq!(report.old_regime.taxable_income, dec!(0));
        assert_eq!(report.old_regime.total_tax, dec!(0));
        assert_eq!(report.recommended_regime, Recommendation::Equal);
        assert_eq!(report.savings, dec!(0));
    }

    #[test]
    fn large_deductions_make_old_regime_cheaper() {
        let report = evaluate(dec!(1500000), dec!(800000)).unwrap();

        // taxable 6,50,000: 12,500 + 30,000
        assert_eq!(report.old_regime.total_tax, dec!(42500));
        assert_eq!(report.recommended_regime, Recommendation::Old);
        assert_eq!(report.savings, dec!(51250));
    }

    #[test]
    fn effective_rates_are_percent_of_gross_income() {
        let report = evaluate(dec!(1500000), dec!(0)).unwrap();

        assert_eq!(report.new_regime_effective_rate, dec!(6.25));
        assert_eq!(report.old_regime_effective_rate, dec!(16.5));
    }

    #[test]
    fn zero_income_is_valid_and_equal() {
        let report = evaluate(dec!(0), dec!(0)).unwrap();

        assert_eq!(report.recommended_regime, Recommendation::Equal);
        assert_eq!(report.new_regime_effective_rate, dec!(0));
        assert_eq!(report.break_even, BreakEvenHint::NotNeeded);
    }

    // =========================================================================
    // break-even hint tests
    // =========================================================================

    #[test]
    fn hint_not_needed_when_both_regimes_are_free() {
        let advisor = TaxAdvisor::default();

        assert_eq!(
            advisor.break_even_hint(dec!(300000)),
            Ok(BreakEvenHint::NotNeeded)
        );
    }

    #[test]
    fn hint_suggests_deduction_when_new_regime_is_cheaper() {
        let advisor = TaxAdvisor::default();

        let hint = advisor.break_even_hint(dec!(1500000)).unwrap();

        let BreakEvenHint::Deduction(amount) = hint else {
            panic!("expected a deduction, got {hint:?}");
        };
        let old_tax = advisor.compute_old_regime_tax(dec!(1500000), amount).total_tax;
        assert!((old_tax - dec!(93750)).abs() < dec!(1));
    }

    #[test]
    fn hint_rejects_negative_income() {
        assert_eq!(
            TaxAdvisor::default().break_even_hint(dec!(-1)),
            Err(ValidationError::InvalidIncome)
        );
    }

    #[test]
    fn hint_is_unreachable_when_old_regime_ignores_deductions() {
        let mut old_table = SlabTable::old_regime();
        old_table.allows_other_deductions = false;
        let advisor = TaxAdvisor::with_tables(SlabTable::new_regime(), old_table).unwrap();

        assert_eq!(
            advisor.break_even_hint(dec!(2000000)),
            Ok(BreakEvenHint::Unreachable)
        );
    }

    // =========================================================================
    // construction tests
    // =========================================================================

    #[test]
    fn with_tables_rejects_swapped_tables() {
        let result = TaxAdvisor::with_tables(SlabTable::old_regime(), SlabTable::new_regime());

        assert_eq!(
            result.unwrap_err(),
            AdvisorError::WrongRegime {
                expected: "new",
                found: "old",
            }
        );
    }

    #[test]
    fn with_tables_rejects_malformed_table() {
        let mut old_table = SlabTable::old_regime();
        old_table.slabs.pop();

        let result = TaxAdvisor::with_tables(SlabTable::new_regime(), old_table);

        assert_eq!(
            result.unwrap_err(),
            AdvisorError::InvalidTable {
                regime: "old",
                source: SlabTableError::MissingUnboundedSlab,
            }
        );
    }

    #[test]
    fn tolerance_must_be_positive() {
        let result = TaxAdvisor::default().with_break_even_tolerance(dec!(0));

        assert_eq!(
            result.unwrap_err(),
            AdvisorError::InvalidTolerance(dec!(0))
        );
    }

    #[test]
    fn deductions_become_relevant_above_twelve_point_seven_five_lakh() {
        assert_eq!(
            TaxAdvisor::default().deductions_relevant_above(),
            dec!(1275000)
        );
    }
}
