use std::sync::OnceLock;

use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};
use tax_core::calculations::common::format_indian;
use thiserror::Error;

/// Error returned when a string cannot be parsed as a rupee amount.
#[derive(Debug, Error)]
#[error("invalid amount '{input}': {source}")]
pub struct ParseAmountError {
    input: String,
    #[source]
    source: rust_decimal::Error,
}

fn non_digits() -> &'static Regex {
    static NON_DIGITS: OnceLock<Regex> = OnceLock::new();
    NON_DIGITS.get_or_init(|| Regex::new(r"[^\d]").expect("static pattern compiles"))
}

/// Normalizes input for amount parsing: trims whitespace and removes the
/// rupee sign, thousands separators (Western or Indian grouping) and inner
/// spaces.
fn normalize_amount_input(s: &str) -> String {
    s.trim()
        .trim_start_matches('₹')
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect()
}

/// Parses a string into a rupee [`Decimal`].
///
/// Accepts `"12,34,567"`, `"1,234,567"` and `"₹ 15,00,000"`.
/// Empty or whitespace-only input is treated as 0.
/// Returns an error and logs when the input is non-empty but not parseable.
pub fn parse_amount(s: &str) -> Result<Decimal, ParseAmountError> {
    let normalized = normalize_amount_input(s);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    normalized.parse().map_err(|e| {
        tracing::error!(input = %s, "invalid amount: {}", e);
        ParseAmountError {
            input: s.to_string(),
            source: e,
        }
    })
}

/// Drops every character that is not an ASCII digit, the way the income
/// field behaves while the user is typing. Returns `None` when nothing
/// (or only zeros) remains.
pub fn sanitize_digits(s: &str) -> Option<Decimal> {
    let digits = non_digits().replace_all(s, "");
    let value: Decimal = digits.parse().ok()?;
    if value.is_zero() { None } else { Some(value) }
}

/// Formats a whole-rupee amount for display: `₹12,34,567`, `-₹75,000`.
pub fn format_currency(amount: Decimal) -> String {
    let grouped = format_indian(amount);
    match grouped.strip_prefix('-') {
        Some(positive) => format!("-₹{positive}"),
        None => format!("₹{grouped}"),
    }
}

/// Formats a percentage with one decimal place (`6.25` -> `"6.3%"`).
pub fn format_rate(rate: Decimal) -> String {
    let rounded = rate.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.1}%")
}
