//! Common utility functions for tax calculations.
//!
//! Rounding to whole rupees and Indian digit grouping, shared by breakdown
//! labels and by the presentation layer.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a decimal value to whole rupees using half-up rounding.
///
/// Values at exactly 0.5 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::round_rupees;
///
/// assert_eq!(round_rupees(dec!(33749.4)), dec!(33749));
/// assert_eq!(round_rupees(dec!(33749.5)), dec!(33750));
/// assert_eq!(round_rupees(dec!(-0.5)), dec!(-1));
/// ```
pub fn round_rupees(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats an amount as whole rupees with Indian digit grouping: the last
/// three digits, then groups of two (`12,34,567`).
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::format_indian;
///
/// assert_eq!(format_indian(dec!(1234567)), "12,34,567");
/// assert_eq!(format_indian(dec!(400000)), "4,00,000");
/// assert_eq!(format_indian(dec!(-75000)), "-75,000");
/// ```
pub fn format_indian(value: Decimal) -> String {
    let rounded = round_rupees(value);
    let digits = rounded.abs().trunc().to_string();
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    if digits.len() <= 3 {
        return format!("{sign}{digits}");
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 2 {
        groups.push(&head[end - 2..end]);
        end -= 2;
    }
    groups.push(&head[..end]);
    groups.reverse();

    format!("{sign}{},{tail}", groups.join(","))
}
