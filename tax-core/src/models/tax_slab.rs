use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single progressive bracket: income between `lower_bound` and
/// `lower_bound + width` is taxed at `rate`.
///
/// The top slab of a table has `width: None`, meaning it extends without
/// limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxSlab {
    pub lower_bound: Decimal,
    pub width: Option<Decimal>,
    pub rate: Decimal,
}

impl TaxSlab {
    pub fn bounded(
        lower_bound: Decimal,
        width: Decimal,
        rate: Decimal,
    ) -> Self {
        Self {
            lower_bound,
            width: Some(width),
            rate,
        }
    }

    pub fn unbounded(
        lower_bound: Decimal,
        rate: Decimal,
    ) -> Self {
        Self {
            lower_bound,
            width: None,
            rate,
        }
    }

    /// Exclusive upper edge of the slab, `None` for the top slab.
    pub fn upper_bound(&self) -> Option<Decimal> {
        self.width.map(|w| self.lower_bound + w)
    }

    /// Portion of `taxable_income` that falls inside this slab.
    pub fn portion_of(
        &self,
        taxable_income: Decimal,
    ) -> Decimal {
        if taxable_income <= self.lower_bound {
            return Decimal::ZERO;
        }
        let above = taxable_income - self.lower_bound;
        match self.width {
            Some(width) => above.min(width),
            None => above,
        }
    }

    /// Rate expressed as a percentage, normalized for display (`0.05` -> `5`).
    pub fn rate_percent(&self) -> Decimal {
        (self.rate * Decimal::ONE_HUNDRED).normalize()
    }
}
