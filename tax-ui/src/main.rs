use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{debug, info, warn};

use tax_ui::app::App;
use tax_ui::config::{AdvisorConfig, OutputFormat};
use tax_ui::logging;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Compares India's new and old income-tax regimes for FY 2025-26.
///
/// Amounts accept Indian (`15,00,000`) or Western (`1,500,000`) grouping and
/// an optional leading `₹`.
#[derive(Debug, Parser)]
#[command(name = "tax-regime", version)]
struct Cli {
    /// Config file to load instead of `$TAX_REGIME_CONFIG` or `./tax-regime.toml`.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter directive, e.g. `debug` or `tax_core=trace`.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Also append log records to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Output format; overrides `output` in the config file.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, conflicts_with = "format")]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn output_format(
        &self,
        configured: OutputFormat,
    ) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            self.format.unwrap_or(configured)
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compare both regimes for one taxpayer.
    Compare {
        /// Gross annual income.
        #[arg(long)]
        income: String,

        /// Deductions claimed under the old regime.
        #[arg(long)]
        deductions: Option<String>,
    },

    /// Deductions at which the old regime costs the same as the new one.
    BreakEven {
        #[arg(long)]
        income: String,
    },

    /// Compare every row of an `income,deductions` CSV file.
    Batch {
        #[arg(long)]
        file: PathBuf,
    },

    /// Read `income [deductions]` lines from stdin and report as you type.
    Interactive,
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AdvisorConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    logging::init_logging(
        cli.log_level.as_deref().or(config.log_level.as_deref()),
        cli.log_file.as_deref().or(config.log_file.as_deref()),
    )?;
    debug!(?config, "effective configuration");

    let format = cli.output_format(config.output);
    let app = App::from_config(&config).context("invalid configuration")?;

    let stdout = io::stdout();
    match cli.command {
        Command::Compare { income, deductions } => {
            app.compare(&mut stdout.lock(), &income, deductions.as_deref(), format)?
        }
        Command::BreakEven { income } => app.break_even(&mut stdout.lock(), &income, format)?,
        Command::Batch { file } => {
            let failed = app.batch(&mut stdout.lock(), &file, format)?;
            if failed > 0 {
                warn!("{failed} row(s) could not be evaluated");
            }
        }
        Command::Interactive => {
            info!("reading income lines from stdin; enter 'quit' to stop");
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            app.interactive(stdin, io::stdout(), format).await?;
        }
    }

    io::stdout().flush()?;
    Ok(())
}
