//! Statutory slab tables for each regime.
//!
//! A [`SlabTable`] bundles everything the calculator needs to know about one
//! regime in one fiscal year: the standard deduction, whether itemized
//! deductions are allowed, the optional Section 87A rebate and the ordered
//! list of [`TaxSlab`]s.
//!
//! | Regime | Std. deduction | Slabs (taxable income)                         | Rebate      |
//! |--------|----------------|------------------------------------------------|-------------|
//! | New    | 75,000         | 0-4L 0%, then 5/10/15/20/25% per 4L, 30% > 24L | up to 12L   |
//! | Old    | 50,000         | 0-2.5L 0%, 2.5-5L 5%, 5-10L 20%, 30% > 10L     | none        |

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Regime, TaxSlab};

/// Fiscal year the compiled-in tables describe.
pub const FISCAL_YEAR: &str = "2025-26";

/// Structural problems detected by [`SlabTable::validate`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlabTableError {
    #[error("slab table has no slabs")]
    EmptyTable,

    #[error("first slab must start at 0, got {0}")]
    FirstSlabNotAtZero(Decimal),

    #[error("slab {index} starts at {found} but the previous slab ends at {expected}")]
    NonContiguous {
        index: usize,
        expected: Decimal,
        found: Decimal,
    },

    #[error("slab {index} has rate {rate}, expected a value between 0 and 1")]
    InvalidRate { index: usize, rate: Decimal },

    #[error("slab {index} has non-positive width {width}")]
    InvalidWidth { index: usize, width: Decimal },

    #[error("unbounded slab {0} is not the last slab")]
    UnboundedSlabNotLast(usize),

    #[error("the last slab must be unbounded")]
    MissingUnboundedSlab,

    #[error("standard deduction must be non-negative, got {0}")]
    NegativeStandardDeduction(Decimal),
}

/// Full rebate of the computed tax when taxable income stays at or below
/// `taxable_income_limit` (Section 87A).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rebate {
    pub taxable_income_limit: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlabTable {
    pub regime: Regime,
    pub fiscal_year: String,
    pub standard_deduction: Decimal,
    /// Whether the regime accepts itemized ("other") deductions.
    pub allows_other_deductions: bool,
    pub rebate: Option<Rebate>,
    pub slabs: Vec<TaxSlab>,
}

impl SlabTable {
    /// New regime slabs for FY 2025-26.
    pub fn new_regime() -> Self {
        let width = dec!(400000);
        Self {
            regime: Regime::New,
            fiscal_year: FISCAL_YEAR.to_string(),
            standard_deduction: dec!(75000),
            allows_other_deductions: false,
            rebate: Some(Rebate {
                taxable_income_limit: dec!(1200000),
            }),
            slabs: vec![
                TaxSlab::bounded(dec!(0), width, dec!(0)),
                TaxSlab::bounded(dec!(400000), width, dec!(0.05)),
                TaxSlab::bounded(dec!(800000), width, dec!(0.10)),
                TaxSlab::bounded(dec!(1200000), width, dec!(0.15)),
                TaxSlab::bounded(dec!(1600000), width, dec!(0.20)),
                TaxSlab::bounded(dec!(2000000), width, dec!(0.25)),
                TaxSlab::unbounded(dec!(2400000), dec!(0.30)),
            ],
        }
    }

    /// Old regime slabs for FY 2025-26.
    pub fn old_regime() -> Self {
        Self {
            regime: Regime::Old,
            fiscal_year: FISCAL_YEAR.to_string(),
            standard_deduction: dec!(50000),
            allows_other_deductions: true,
            rebate: None,
            slabs: vec![
                TaxSlab::bounded(dec!(0), dec!(250000), dec!(0)),
                TaxSlab::bounded(dec!(250000), dec!(250000), dec!(0.05)),
                TaxSlab::bounded(dec!(500000), dec!(500000), dec!(0.20)),
                TaxSlab::unbounded(dec!(1000000), dec!(0.30)),
            ],
        }
    }

    /// Upper edge of the leading 0% band. Taxable income at or below this
    /// amount attracts no tax at all.
    pub fn zero_rate_limit(&self) -> Decimal {
        self.slabs
            .iter()
            .take_while(|slab| slab.rate.is_zero())
            .last()
            .and_then(TaxSlab::upper_bound)
            .unwrap_or(Decimal::ZERO)
    }

    /// Highest gross income for which the rebate wipes out the tax entirely,
    /// i.e. the rebate limit plus the standard deduction.
    ///
    /// Above this amount itemized deductions under the old regime can start
    /// to matter for the comparison.
    pub fn tax_free_gross_limit(&self) -> Option<Decimal> {
        self.rebate
            .as_ref()
            .map(|r| r.taxable_income_limit + self.standard_deduction)
    }

    /// Checks ordering, contiguity, rates and the unbounded top slab.
    pub fn validate(&self) -> Result<(), SlabTableError> {
        if self.standard_deduction < Decimal::ZERO {
            return Err(SlabTableError::NegativeStandardDeduction(
                self.standard_deduction,
            ));
        }

        let first = self.slabs.first().ok_or(SlabTableError::EmptyTable)?;
        if !first.lower_bound.is_zero() {
            return Err(SlabTableError::FirstSlabNotAtZero(first.lower_bound));
        }

        let last_index = self.slabs.len() - 1;
        let mut expected_start = Decimal::ZERO;

        for (index, slab) in self.slabs.iter().enumerate() {
            if slab.lower_bound != expected_start {
                return Err(SlabTableError::NonContiguous {
                    index,
                    expected: expected_start,
                    found: slab.lower_bound,
                });
            }
            if slab.rate < Decimal::ZERO || slab.rate > Decimal::ONE {
                return Err(SlabTableError::InvalidRate {
                    index,
                    rate: slab.rate,
                });
            }
            match slab.width {
                Some(width) if width <= Decimal::ZERO => {
                    return Err(SlabTableError::InvalidWidth { index, width });
                }
                Some(width) => expected_start = slab.lower_bound + width,
                None if index != last_index => {
                    return Err(SlabTableError::UnboundedSlabNotLast(index));
                }
                None => {}
            }
        }

        if self.slabs[last_index].width.is_some() {
            return Err(SlabTableError::MissingUnboundedSlab);
        }

        Ok(())
    }
}
