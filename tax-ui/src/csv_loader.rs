//! CSV loader for batch regime comparisons.
//!
//! ## CSV Format
//!
//! Column order does **not** matter (headers are matched by name). Header
//! names are case-sensitive.
//!
//! | Column       | Required | Type   | Notes                                      |
//! |--------------|----------|--------|--------------------------------------------|
//! | `income`     | yes      | amount | Gross annual income, e.g. `"15,00,000"`    |
//! | `deductions` | no       | amount | Old-regime deductions; empty cell means 0  |
//!
//! Amounts may use Indian or Western digit grouping and a leading `₹`;
//! quote cells that contain commas.
//!
//! ### Example
//!
//! ```csv
//! income,deductions
//! 1000000,
//! "15,00,000","2,00,000"
//! ```
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::utils::{ParseAmountError, parse_amount};

// ---------------------------------------------------------------------------
// Serde-compatible row that mirrors the CSV layout exactly
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CsvRow {
    income: String,
    #[serde(default)]
    deductions: Option<String>,
}

/// One taxpayer's inputs read from a batch file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxInput {
    /// 1-based data row number (header excluded).
    pub row: usize,
    pub income: Decimal,
    pub deductions: Decimal,
}

// ---------------------------------------------------------------------------
// Public error type
// ---------------------------------------------------------------------------

/// Errors that stop the whole file from loading.
#[derive(Debug, thiserror::Error)]
pub enum CsvLoadError {
    /// The file could not be read.
    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The underlying CSV deserialisation failed (bad structure, missing
    /// required column, etc.).
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),
}

/// A single row whose cell could not be read as an amount. The rest of the
/// file is unaffected.
#[derive(Debug, thiserror::Error)]
#[error("invalid {column} on row {row}: {source}")]
pub struct InvalidAmountError {
    pub column: &'static str,
    /// 1-based data row number (header excluded).
    pub row: usize,
    #[source]
    pub source: ParseAmountError,
}

/// Outcome of reading one data row.
pub type RowResult = Result<TaxInput, InvalidAmountError>;

// ---------------------------------------------------------------------------
// Core loader
// ---------------------------------------------------------------------------

fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> RowResult {
    let income = parse_amount(&row.income).map_err(|source| InvalidAmountError {
        column: "income",
        row: row_number,
        source,
    })?;
    let deductions = parse_amount(row.deductions.as_deref().unwrap_or_default()).map_err(
        |source| InvalidAmountError {
            column: "deductions",
            row: row_number,
            source,
        },
    )?;

    Ok(TaxInput {
        row: row_number,
        income,
        deductions,
    })
}

/// Parse CSV text and return one result per data row, in file order.
///
/// Only structural problems fail the whole call. A cell that is not a
/// number yields an [InvalidAmountError] for that row alone; business rules
/// (negative income, deductions above income) are left to
/// [`tax_core::TaxAdvisor::evaluate`].
///
/// # Errors
///
/// * [CsvLoadError::Parse] – if the CSV is structurally invalid.
pub fn load_from_str(input: &str) -> Result<Vec<RowResult>, CsvLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    let mut rows = Vec::new();
    for (idx, result) in reader.deserialize::<CsvRow>().enumerate() {
        rows.push(convert_row(result?, idx + 1));
    }
    Ok(rows)
}

/// Read a file from disk and delegate to [load_from_str].
pub fn load_from_file(path: &Path) -> Result<Vec<RowResult>, CsvLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CsvLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_from_str(&contents)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
