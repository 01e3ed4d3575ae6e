//! Command runners behind the `tax-regime` binary.
//!
//! Each runner takes raw user text, turns it into amounts, asks the
//! [`TaxAdvisor`] and writes the result to the supplied writer in the chosen
//! [`OutputFormat`].

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Serialize;
use tax_core::{AdvisorError, ComparisonReport, TaxAdvisor, ValidationError};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, error, info, warn};

use crate::config::{AdvisorConfig, OutputFormat};
use crate::csv_loader;
use crate::debounce::Debouncer;
use crate::render::{ReportRenderer, write_json};
use crate::utils::{parse_amount, sanitize_digits};

/// One evaluated row of a batch file. Amounts are absent when the row's
/// cells could not be read.
#[derive(Debug, Clone, Serialize)]
pub struct BatchEntry {
    pub row: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub income: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deductions: Option<Decimal>,
    #[serde(flatten)]
    pub outcome: BatchOutcome,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchOutcome {
    Report(ComparisonReport),
    Error(String),
}

pub struct App {
    advisor: TaxAdvisor,
    debounce: Duration,
}

impl App {
    pub fn new(advisor: TaxAdvisor) -> Self {
        Self {
            advisor,
            debounce: Duration::from_millis(crate::config::DEFAULT_DEBOUNCE_MS),
        }
    }

    /// Builds the advisor from the statutory tables with the configured
    /// break-even tolerance.
    pub fn from_config(config: &AdvisorConfig) -> Result<Self, AdvisorError> {
        let advisor = TaxAdvisor::default().with_break_even_tolerance(config.break_even_tolerance)?;
        Ok(Self {
            advisor,
            debounce: config.debounce(),
        })
    }

    pub fn compare<W: Write>(
        &self,
        out: &mut W,
        income: &str,
        deductions: Option<&str>,
        format: OutputFormat,
    ) -> Result<()> {
        let income = parse_income(income)?;
        let deductions = match deductions {
            Some(text) => parse_amount(text).context("invalid deductions")?,
            None => Decimal::ZERO,
        };

        let report = self.advisor.evaluate(income, deductions)?;
        info!(%income, %deductions, recommended = ?report.recommended_regime, "comparison complete");

        match format {
            OutputFormat::Text => ReportRenderer::new(&self.advisor).write_report(out, &report)?,
            OutputFormat::Json => write_json(out, &report)?,
        }
        Ok(())
    }

    pub fn break_even<W: Write>(
        &self,
        out: &mut W,
        income: &str,
        format: OutputFormat,
    ) -> Result<()> {
        let income = parse_income(income)?;
        let hint = self.advisor.break_even_hint(income)?;

        match format {
            OutputFormat::Text => {
                ReportRenderer::new(&self.advisor).write_break_even(out, income, hint)?
            }
            OutputFormat::Json => write_json(out, &hint)?,
        }
        Ok(())
    }

    /// Evaluates every row of a CSV file. Rows with unreadable amounts or
    /// failed validation are reported alongside the others; the returned
    /// count says how many.
    pub fn batch<W: Write>(
        &self,
        out: &mut W,
        path: &Path,
        format: OutputFormat,
    ) -> Result<usize> {
        let inputs = csv_loader::load_from_file(path)
            .with_context(|| format!("failed to load batch file {}", path.display()))?;

        let entries: Vec<BatchEntry> = inputs
            .into_iter()
            .map(|row| match row {
                Ok(input) => {
                    let outcome = match self.advisor.evaluate(input.income, input.deductions) {
                        Ok(report) => BatchOutcome::Report(report),
                        Err(e) => BatchOutcome::Error(e.to_string()),
                    };
                    BatchEntry {
                        row: input.row,
                        income: Some(input.income),
                        deductions: Some(input.deductions),
                        outcome,
                    }
                }
                Err(e) => BatchEntry {
                    row: e.row,
                    income: None,
                    deductions: None,
                    outcome: BatchOutcome::Error(e.to_string()),
                },
            })
            .collect();

        let failed = entries
            .iter()
            .filter(|entry| matches!(entry.outcome, BatchOutcome::Error(_)))
            .count();
        if failed > 0 {
            warn!(failed, total = entries.len(), "some batch rows were rejected");
        }

        match format {
            OutputFormat::Text => ReportRenderer::new(&self.advisor).write_batch(out, &entries)?,
            OutputFormat::Json => write_json(out, &entries)?,
        }
        Ok(failed)
    }

    /// Reads `income [deductions]` lines until EOF or `quit`.
    ///
    /// Lines are fed through a [`Debouncer`], so a burst of input produces a
    /// single report for the last line once input pauses.
    pub async fn interactive<R, W>(
        &self,
        input: R,
        mut out: W,
        format: OutputFormat,
    ) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write + Send + 'static,
    {
        let advisor = self.advisor.clone();
        let debouncer = Debouncer::spawn(self.debounce, move |line: String| {
            if let Err(e) = respond(&advisor, &mut out, &line, format) {
                error!("failed to write report: {e:#}");
            }
        });

        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await.context("failed to read input")? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if matches!(line, "quit" | "exit") {
                break;
            }
            debug!(line, "input received");
            if !debouncer.call(line.to_string()) {
                break;
            }
        }

        debouncer.finish().await.context("report worker failed")?;
        Ok(())
    }
}

/// Amounts that do not parse as money are reported the same way as a
/// negative income.
fn parse_income(text: &str) -> Result<Decimal, ValidationError> {
    parse_amount(text).map_err(|_| ValidationError::InvalidIncome)
}

/// Handles one settled interactive line. Validation problems are written
/// to `out` as messages rather than returned.
fn respond<W: Write>(
    advisor: &TaxAdvisor,
    out: &mut W,
    line: &str,
    format: OutputFormat,
) -> Result<()> {
    let mut tokens = line.split_whitespace();
    let Some(income) = tokens.next().and_then(sanitize_digits) else {
        writeln!(out, "{}", ValidationError::InvalidIncome)?;
        return Ok(());
    };
    let deductions = match tokens.next().map(parse_amount).transpose() {
        Ok(value) => value.unwrap_or(Decimal::ZERO),
        Err(e) => {
            writeln!(out, "{e}")?;
            return Ok(());
        }
    };

    match advisor.evaluate(income, deductions) {
        Ok(report) => match format {
            OutputFormat::Text => ReportRenderer::new(advisor).write_report(out, &report)?,
            OutputFormat::Json => write_json(out, &report)?,
        },
        Err(e) => writeln!(out, "{e}")?,
    }
    writeln!(out)?;
    out.flush()?;
    Ok(())
}
