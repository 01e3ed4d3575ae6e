//! Slab-by-slab tax computation for a single regime.
//!
//! # Breakdown Structure
//!
//! | Line                 | New regime | Old regime | Sign |
//! |----------------------|------------|------------|------|
//! | Gross Income         | yes        | yes        | +    |
//! | Standard Deduction   | yes        | yes        | -    |
//! | Other Deductions     | no         | yes        | -    |
//! | Taxable Income       | yes        | yes        | +    |
//! | Tax on X @ r% (...)  | per slab   | per slab   | +    |
//! | Rebate under 87A     | if eligible| no         | -    |
//!
//! When taxable income stays inside the leading 0% band a single zero line
//! replaces the slab lines.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::calculations::RegimeCalculator;
//! use tax_core::SlabTable;
//!
//! let table = SlabTable::new_regime();
//! let result = RegimeCalculator::new(&table).calculate(dec!(1500000), dec!(0));
//!
//! assert_eq!(result.taxable_income, dec!(1425000));
//! assert_eq!(result.total_tax, dec!(93750));
//! ```

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::common::format_indian;
use crate::{
    BreakdownLine, GROSS_INCOME_LABEL, OTHER_DEDUCTIONS_LABEL, RegimeResult,
    STANDARD_DEDUCTION_LABEL, SlabTable, TAXABLE_INCOME_LABEL, TaxSlab,
};

/// Computes tax and breakdown for the regime described by a [`SlabTable`].
///
/// Inputs are expected to be validated by the caller (see
/// [`crate::TaxAdvisor`]); the calculator itself never fails.
#[derive(Debug, Clone)]
pub struct RegimeCalculator<'a> {
    table: &'a SlabTable,
}

impl<'a> RegimeCalculator<'a> {
    pub fn new(table: &'a SlabTable) -> Self {
        Self { table }
    }

    /// Calculates the tax owed on `income`.
    ///
    /// `other_deductions` is only honoured by regimes that allow itemized
    /// deductions; other regimes ignore it.
    pub fn calculate(
        &self,
        income: Decimal,
        other_deductions: Decimal,
    ) -> RegimeResult {
        let other_deductions = if self.table.allows_other_deductions {
            other_deductions
        } else {
            Decimal::ZERO
        };
        let taxable_income = self.taxable_income(income, other_deductions);

        let mut breakdown = vec![
            BreakdownLine::new(GROSS_INCOME_LABEL, income),
            BreakdownLine::new(STANDARD_DEDUCTION_LABEL, -self.table.standard_deduction),
        ];
        if self.table.allows_other_deductions {
            breakdown.push(BreakdownLine::new(OTHER_DEDUCTIONS_LABEL, -other_deductions));
        }
        breakdown.push(BreakdownLine::new(TAXABLE_INCOME_LABEL, taxable_income));

        let zero_rate_limit = self.table.zero_rate_limit();
        let total_tax = if taxable_income <= zero_rate_limit {
            breakdown.push(BreakdownLine::new(
                format!("Tax on income up to ₹{} @ 0%", format_indian(zero_rate_limit)),
                Decimal::ZERO,
            ));
            Decimal::ZERO
        } else {
            let slab_tax = self.push_slab_lines(taxable_income, &mut breakdown);
            match self.rebate_line(taxable_income, slab_tax) {
                Some(line) => {
                    breakdown.push(line);
                    Decimal::ZERO
                }
                None => slab_tax,
            }
        };

        debug!(
            regime = self.table.regime.as_str(),
            %income,
            %taxable_income,
            %total_tax,
            "regime tax computed"
        );

        RegimeResult {
            regime: self.table.regime,
            taxable_income,
            total_tax,
            breakdown,
        }
    }

    /// Taxable income after standard and other deductions, never negative.
    fn taxable_income(
        &self,
        income: Decimal,
        other_deductions: Decimal,
    ) -> Decimal {
        (income - self.table.standard_deduction - other_deductions).max(Decimal::ZERO)
    }

    /// Appends one line per taxed slab the income reaches and returns the
    /// summed slab tax.
    fn push_slab_lines(
        &self,
        taxable_income: Decimal,
        breakdown: &mut Vec<BreakdownLine>,
    ) -> Decimal {
        let mut tax = Decimal::ZERO;

        for slab in self.table.slabs.iter().filter(|s| !s.rate.is_zero()) {
            let portion = slab.portion_of(taxable_income);
            if portion <= Decimal::ZERO {
                break;
            }
            let slab_tax = portion * slab.rate;
            breakdown.push(BreakdownLine::new(slab_label(slab, portion), slab_tax));
            tax += slab_tax;
        }

        tax
    }

    /// Full rebate when taxable income is within the rebate limit.
    fn rebate_line(
        &self,
        taxable_income: Decimal,
        slab_tax: Decimal,
    ) -> Option<BreakdownLine> {
        let rebate = self.table.rebate.as_ref()?;
        if taxable_income > rebate.taxable_income_limit {
            return None;
        }
        Some(BreakdownLine::new(
            format!(
                "Rebate under Section 87A (income up to ₹{})",
                format_indian(rebate.taxable_income_limit)
            ),
            -slab_tax,
        ))
    }
}

fn slab_label(
    slab: &TaxSlab,
    portion: Decimal,
) -> String {
    let upper = slab
        .upper_bound()
        .map(|u| format!("₹{}", format_indian(u)))
        .unwrap_or_else(|| "above".to_string());
    format!(
        "Tax on ₹{} @ {}% (₹{} to {})",
        format_indian(portion),
        slab.rate_percent(),
        format_indian(slab.lower_bound),
        upper
    )
}

/// Tax under the new regime using the compiled-in FY 2025-26 table.
pub fn compute_new_regime_tax(income: Decimal) -> RegimeResult {
    let table = SlabTable::new_regime();
    RegimeCalculator::new(&table).calculate(income, Decimal::ZERO)
}

/// Tax under the old regime using the compiled-in FY 2025-26 table.
pub fn compute_old_regime_tax(
    income: Decimal,
    deductions: Decimal,
) -> RegimeResult {
    let table = SlabTable::old_regime();
    RegimeCalculator::new(&table).calculate(income, deductions)
}
