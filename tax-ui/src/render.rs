//! Text and JSON rendering of comparison reports.

use std::io::{self, Write};

use rust_decimal::Decimal;
use serde::Serialize;
use tax_core::{BreakEvenHint, ComparisonReport, Recommendation, RegimeResult, TaxAdvisor};

use crate::app::{BatchEntry, BatchOutcome};
use crate::utils::{format_currency, format_rate};

const LABEL_WIDTH: usize = 58;
const AMOUNT_WIDTH: usize = 14;

pub const TOTAL_TAX_LABEL: &str = "Total Tax Liability";
pub const NO_INCOME_MESSAGE: &str = "Enter an income above ₹0 to compare the two regimes.";

/// Writes any serializable value as pretty-printed JSON followed by a newline.
pub fn write_json<W: Write, T: Serialize + ?Sized>(
    out: &mut W,
    value: &T,
) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)
}

/// Human-readable output for reports produced by one [`TaxAdvisor`].
///
/// The advisor supplies the thresholds the wording depends on (rebate limit,
/// the income below which deductions stop mattering).
pub struct ReportRenderer<'a> {
    advisor: &'a TaxAdvisor,
}

impl<'a> ReportRenderer<'a> {
    pub fn new(advisor: &'a TaxAdvisor) -> Self {
        Self { advisor }
    }

    pub fn write_report<W: Write>(
        &self,
        out: &mut W,
        report: &ComparisonReport,
    ) -> io::Result<()> {
        if report.income.is_zero() {
            return writeln!(out, "{NO_INCOME_MESSAGE}");
        }
        if report.tax_free_under_new_regime {
            return self.write_tax_free(out, report);
        }

        writeln!(
            out,
            "New Tax Regime: {} (effective rate {})",
            format_currency(report.new_regime.total_tax),
            format_rate(report.new_regime_effective_rate)
        )?;
        writeln!(
            out,
            "Old Tax Regime: {} (effective rate {})",
            format_currency(report.old_regime.total_tax),
            format_rate(report.old_regime_effective_rate)
        )?;
        writeln!(out)?;
        writeln!(out, "{}", recommendation_text(report))?;
        writeln!(out)?;

        write_breakdown(out, &report.new_regime)?;
        writeln!(out)?;
        write_breakdown(out, &report.old_regime)?;

        if let Some(hint) = self.hint_text(report.income, report.break_even) {
            writeln!(out)?;
            writeln!(out, "{hint}")?;
        }
        Ok(())
    }

    /// Output of the `break-even` command.
    pub fn write_break_even<W: Write>(
        &self,
        out: &mut W,
        income: Decimal,
        hint: BreakEvenHint,
    ) -> io::Result<()> {
        let relevant_above = self.advisor.deductions_relevant_above();
        if income <= relevant_above {
            return writeln!(
                out,
                "Income up to {} owes no tax under the new regime, so deductions do not change the recommendation.",
                format_currency(relevant_above)
            );
        }
        let text = self.hint_text(income, hint).unwrap_or_else(|| {
            "No deductions needed: the old regime already costs no more than the new regime."
                .to_string()
        });
        writeln!(out, "{text}")
    }

    pub fn write_batch<W: Write>(
        &self,
        out: &mut W,
        entries: &[BatchEntry],
    ) -> io::Result<()> {
        writeln!(
            out,
            "{:>4}  {:>14}  {:>14}  {:>12}  {:>12}  {:<6}  {:>12}",
            "Row", "Income", "Deductions", "New Regime", "Old Regime", "Choose", "Savings"
        )?;
        for entry in entries {
            match &entry.outcome {
                BatchOutcome::Report(report) => writeln!(
                    out,
                    "{:>4}  {:>14}  {:>14}  {:>12}  {:>12}  {:<6}  {:>12}",
                    entry.row,
                    format_currency(report.income),
                    format_currency(report.deductions),
                    format_currency(report.new_regime.total_tax),
                    format_currency(report.old_regime.total_tax),
                    short_recommendation(report.recommended_regime),
                    format_currency(report.savings),
                )?,
                BatchOutcome::Error(message) => {
                    writeln!(out, "{:>4}  error: {message}", entry.row)?
                }
            }
        }
        Ok(())
    }

    fn write_tax_free<W: Write>(
        &self,
        out: &mut W,
        report: &ComparisonReport,
    ) -> io::Result<()> {
        writeln!(
            out,
            "Good news! Your income of {} is completely tax-free under the new regime!",
            format_currency(report.income)
        )?;

        let table = self.advisor.new_table();
        if let Some(rebate) = &table.rebate {
            writeln!(
                out,
                "For FY {} there is no tax liability for income up to {} under the new tax regime.",
                table.fiscal_year,
                format_currency(rebate.taxable_income_limit)
            )?;
        }
        if report.income <= self.advisor.deductions_relevant_above() {
            writeln!(out, "Deductions do not change the recommendation at this income.")?;
        }
        Ok(())
    }

    /// `None` when there is nothing useful to say.
    fn hint_text(
        &self,
        income: Decimal,
        hint: BreakEvenHint,
    ) -> Option<String> {
        if income <= self.advisor.deductions_relevant_above() {
            return None;
        }
        match hint {
            BreakEvenHint::NotNeeded => None,
            BreakEvenHint::Deduction(amount) => Some(format!(
                "Tip: You need deductions of {} to have same tax in both regimes.",
                format_currency(amount)
            )),
            BreakEvenHint::Unreachable => {
                Some("Old regime tax will always be higher for this income.".to_string())
            }
        }
    }
}

fn recommendation_text(report: &ComparisonReport) -> String {
    match report.recommended_regime.regime() {
        Some(regime) => format!(
            "Recommendation: Choose the {} (save {} annually)",
            regime.label(),
            format_currency(report.savings)
        ),
        None => "Note: Both tax regimes result in the same tax liability".to_string(),
    }
}

fn short_recommendation(recommendation: Recommendation) -> &'static str {
    match recommendation {
        Recommendation::New => "New",
        Recommendation::Old => "Old",
        Recommendation::Equal => "Either",
    }
}

fn write_breakdown<W: Write>(
    out: &mut W,
    result: &RegimeResult,
) -> io::Result<()> {
    writeln!(out, "{} breakdown", result.regime.label())?;
    for line in &result.breakdown {
        write_line(out, &line.label, line.amount)?;
    }
    write_line(out, TOTAL_TAX_LABEL, result.total_tax)
}

fn write_line<W: Write>(
    out: &mut W,
    label: &str,
    amount: Decimal,
) -> io::Result<()> {
    writeln!(
        out,
        "  {label:<LABEL_WIDTH$}{:>AMOUNT_WIDTH$}",
        format_currency(amount)
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn render(report: &ComparisonReport) -> String {
        let advisor = TaxAdvisor::default();
        let mut out = Vec::new();
        ReportRenderer::new(&advisor)
            .write_report(&mut out, report)
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn tax_free_income_gets_the_good_news_message_only() {
        let report = tax_core::evaluate(dec!(1000000), dec!(0)).unwrap();

        let text = render(&report);

        assert!(text.contains("Your income of ₹10,00,000 is completely tax-free"));
        assert!(text.contains("up to ₹12,00,000"));
        assert!(text.contains("Deductions do not change the recommendation"));
        assert!(!text.contains(TOTAL_TAX_LABEL));
    }

    #[test]
    fn zero_income_gets_a_neutral_prompt() {
        let report = tax_core::evaluate(dec!(0), dec!(0)).unwrap();

        let text = render(&report);

        assert_eq!(text, format!("{NO_INCOME_MESSAGE}\n"));
        assert!(!text.contains("tax-free"));
    }

    #[test]
    fn full_report_lists_totals_recommendation_and_breakdowns() {
        let report = tax_core::evaluate(dec!(1500000), dec!(200000)).unwrap();

        let text = render(&report);

        assert!(text.contains("New Tax Regime: ₹93,750 (effective rate 6.3%)"));
        assert!(text.contains("Old Tax Regime: ₹1,87,500 (effective rate 12.5%)"));
        assert!(text.contains("Recommendation: Choose the New Tax Regime (save ₹93,750 annually)"));
        assert!(text.contains("New Tax Regime breakdown"));
        assert!(text.contains("Old Tax Regime breakdown"));
        assert_eq!(text.matches(TOTAL_TAX_LABEL).count(), 2);
        assert!(text.contains("Tip: You need deductions of ₹5,43,7"));
    }

    #[test]
    fn equal_totals_print_the_note() {
        let mut report = tax_core::evaluate(dec!(1500000), dec!(200000)).unwrap();
        report.recommended_regime = Recommendation::Equal;

        let text = render(&report);

        assert!(text.contains("Note: Both tax regimes result in the same tax liability"));
    }

    #[test]
    fn breakdown_line_is_padded_to_fixed_columns() {
        let mut out = Vec::new();
        write_line(&mut out, "Gross Income", dec!(1500000)).unwrap();

        let line = String::from_utf8(out).unwrap();

        assert!(line.starts_with("  Gross Income "));
        assert!(line.trim_end().ends_with("₹15,00,000"));
    }

    #[test]
    fn break_even_messages() {
        let advisor = TaxAdvisor::default();
        let renderer = ReportRenderer::new(&advisor);
        let mut out = Vec::new();

        renderer
            .write_break_even(&mut out, dec!(3000000), BreakEvenHint::Unreachable)
            .unwrap();
        renderer
            .write_break_even(&mut out, dec!(2500000), BreakEvenHint::NotNeeded)
            .unwrap();
        renderer
            .write_break_even(&mut out, dec!(900000), BreakEvenHint::Deduction(dec!(600000)))
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Old regime tax will always be higher for this income.",
                "No deductions needed: the old regime already costs no more than the new regime.",
                "Income up to ₹12,75,000 owes no tax under the new regime, so deductions do not change the recommendation.",
            ]
        );
    }

    #[test]
    fn json_output_is_tagged_and_pretty() {
        let report = tax_core::evaluate(dec!(1500000), dec!(200000)).unwrap();
        let mut out = Vec::new();

        write_json(&mut out, &report).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["recommended_regime"], "new");
        assert_eq!(value["break_even"]["kind"], "deduction");
        assert!(String::from_utf8(out).unwrap().ends_with("}\n"));
    }
}
