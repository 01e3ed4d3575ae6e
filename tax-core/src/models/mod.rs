mod comparison_report;
mod regime;
mod regime_result;
pub mod slab_table;
mod tax_slab;

pub use comparison_report::{BreakEvenHint, ComparisonReport};
pub use regime::{Recommendation, Regime};
pub use regime_result::{
    BreakdownLine, GROSS_INCOME_LABEL, OTHER_DEDUCTIONS_LABEL, RegimeResult,
    STANDARD_DEDUCTION_LABEL, TAXABLE_INCOME_LABEL,
};
pub use slab_table::{FISCAL_YEAR, Rebate, SlabTable, SlabTableError};
pub use tax_slab::TaxSlab;
