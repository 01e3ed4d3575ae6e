pub mod advisor;
pub mod calculations;
pub mod models;

pub use advisor::{AdvisorError, TaxAdvisor, ValidationError, evaluate};
pub use calculations::{compute_new_regime_tax, compute_old_regime_tax, find_break_even_deduction};
pub use models::*;
