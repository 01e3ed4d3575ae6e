use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Regime;

pub const GROSS_INCOME_LABEL: &str = "Gross Income";
pub const STANDARD_DEDUCTION_LABEL: &str = "Standard Deduction";
pub const OTHER_DEDUCTIONS_LABEL: &str = "Other Deductions";
pub const TAXABLE_INCOME_LABEL: &str = "Taxable Income";

/// One signed entry of a regime breakdown.
///
/// Deductions and rebates carry negative amounts; income and slab taxes are
/// non-negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownLine {
    pub label: String,
    pub amount: Decimal,
}

impl BreakdownLine {
    pub fn new(
        label: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        Self {
            label: label.into(),
            amount,
        }
    }
}

/// Tax owed under one regime together with the ledger that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeResult {
    pub regime: Regime,
    pub taxable_income: Decimal,
    pub total_tax: Decimal,
    pub breakdown: Vec<BreakdownLine>,
}

impl RegimeResult {
    /// Lines after `Taxable Income`: slab taxes and rebates.
    pub fn tax_lines(&self) -> &[BreakdownLine] {
        match self
            .breakdown
            .iter()
            .position(|line| line.label == TAXABLE_INCOME_LABEL)
        {
            Some(index) => &self.breakdown[index + 1..],
            None => &[],
        }
    }

    /// Re-derives the total from the ledger, floored at zero.
    ///
    /// Always equals [`RegimeResult::total_tax`] for results produced by the
    /// calculator.
    pub fn tax_from_breakdown(&self) -> Decimal {
        self.tax_lines()
            .iter()
            .map(|line| line.amount)
            .sum::<Decimal>()
            .max(Decimal::ZERO)
    }

    /// Total tax as a percentage of `income`; zero when income is zero.
    pub fn effective_rate(
        &self,
        income: Decimal,
    ) -> Decimal {
        if income <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        self.total_tax / income * Decimal::ONE_HUNDRED
    }
}
