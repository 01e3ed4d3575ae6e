use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Recommendation, RegimeResult};

/// What the taxpayer would need to claim under the old regime to match the
/// new regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "amount", rename_all = "snake_case")]
pub enum BreakEvenHint {
    /// The old regime is already no worse, or neither regime charges tax.
    NotNeeded,
    /// Deductions of this amount make both regimes cost the same.
    Deduction(Decimal),
    /// No deduction up to the full income brings the old regime down to the
    /// new regime's tax.
    Unreachable,
}

/// Side-by-side result of both regimes for one taxpayer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub income: Decimal,
    pub deductions: Decimal,
    pub new_regime: RegimeResult,
    pub old_regime: RegimeResult,
    pub recommended_regime: Recommendation,
    /// Absolute difference between the two totals.
    pub savings: Decimal,
    pub new_regime_effective_rate: Decimal,
    pub old_regime_effective_rate: Decimal,
    /// Income sits inside the rebate band, so the new regime owes nothing.
    pub tax_free_under_new_regime: bool,
    pub break_even: BreakEvenHint,
}
