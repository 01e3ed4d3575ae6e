//! Break-even deduction search.
//!
//! The new regime's tax does not depend on deductions, so it is computed once
//! and used as the target. The old regime calculator then acts as an oracle in
//! a binary search over whole-rupee deduction amounts in `[0, income]`,
//! relying on old-regime tax never increasing as deductions grow.
//!
//! The search returns the first midpoint whose old-regime tax lies within the
//! tolerance of the target. That value is an approximate root, not
//! necessarily the smallest deduction that matches.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::SlabTable;
use crate::calculations::RegimeCalculator;

/// Tax difference, in rupees, below which both regimes count as equal.
pub const DEFAULT_TOLERANCE: Decimal = Decimal::ONE;

/// Outcome of [`BreakEvenSolver::analyze`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BreakEven {
    Deduction(Decimal),
    /// Even deducting the whole income leaves the old regime more expensive.
    Unreachable,
}

#[derive(Debug, Clone)]
pub struct BreakEvenSolver<'a> {
    new_table: &'a SlabTable,
    old_table: &'a SlabTable,
    tolerance: Decimal,
}

impl<'a> BreakEvenSolver<'a> {
    pub fn new(
        new_table: &'a SlabTable,
        old_table: &'a SlabTable,
    ) -> Self {
        Self {
            new_table,
            old_table,
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    pub fn with_tolerance(
        mut self,
        tolerance: Decimal,
    ) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Searches for the deduction at which old-regime tax meets new-regime
    /// tax.
    ///
    /// When the search range empties without a match the final lower bound is
    /// returned. A value above `income` therefore means no deduction within
    /// the income can close the gap.
    pub fn find_break_even_deduction(
        &self,
        income: Decimal,
    ) -> Decimal {
        let target = RegimeCalculator::new(self.new_table)
            .calculate(income, Decimal::ZERO)
            .total_tax;
        let oracle = RegimeCalculator::new(self.old_table);

        let mut left = Decimal::ZERO;
        let mut right = income.floor();
        let mut iterations = 0u32;

        while left <= right {
            let mid = ((left + right) / Decimal::TWO).floor();
            let old_tax = oracle.calculate(income, mid).total_tax;
            iterations += 1;
            trace!(%left, %right, %mid, %old_tax, %target, "break-even probe");

            if (old_tax - target).abs() < self.tolerance {
                debug!(%income, deduction = %mid, iterations, "break-even found");
                return mid;
            }

            if old_tax > target {
                left = mid + Decimal::ONE;
            } else {
                right = mid - Decimal::ONE;
            }
        }

        debug!(%income, lower_bound = %left, iterations, "break-even search exhausted");
        left
    }

    /// Like [`find_break_even_deduction`](Self::find_break_even_deduction),
    /// but reports an out-of-range result as [`BreakEven::Unreachable`].
    pub fn analyze(
        &self,
        income: Decimal,
    ) -> BreakEven {
        let deduction = self.find_break_even_deduction(income);
        if deduction > income {
            BreakEven::Unreachable
        } else {
            BreakEven::Deduction(deduction)
        }
    }
}

/// Break-even deduction using the compiled-in FY 2025-26 tables.
pub fn find_break_even_deduction(income: Decimal) -> Decimal {
    let new_table = SlabTable::new_regime();
    let old_table = SlabTable::old_regime();
    BreakEvenSolver::new(&new_table, &old_table).find_break_even_deduction(income)
}
