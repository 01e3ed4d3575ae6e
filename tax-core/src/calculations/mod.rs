//! Tax calculation modules for the new and old regimes.
//!
//! This module provides the slab engine, shared rounding and formatting
//! helpers, and the break-even deduction search.

pub mod break_even;
pub mod common;
pub mod regime;

pub use break_even::{BreakEven, BreakEvenSolver, DEFAULT_TOLERANCE, find_break_even_deduction};
pub use regime::{RegimeCalculator, compute_new_regime_tax, compute_old_regime_tax};
