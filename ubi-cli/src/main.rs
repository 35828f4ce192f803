use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::debug;
use ubi_core::{Period, Preset};

use ubi_cli::app::{self, PolicySource, SweepFormat};
use ubi_cli::logging;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Universal basic income benefit calculator.
///
/// Shows what a UBI with an income-tested clawback means for one annual
/// income, under a built-in preset or a TOML policy file.
#[derive(Debug, Parser)]
#[command(name = "ubi-calc", version, about)]
struct Cli {
    /// Built-in policy preset (2022-23 or 2023-24).
    #[arg(long, global = true, conflicts_with = "policy")]
    preset: Option<Preset>,

    /// TOML policy file to use instead of a preset.
    #[arg(long, global = true)]
    policy: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `ubi_core=debug`. Overrides RUST_LOG.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Also append log output to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the benefit for one annual gross income.
    Evaluate {
        /// Annual personal income before tax, e.g. 45000 or "$45,000".
        #[arg(allow_hyphen_values = true)]
        income: Option<String>,

        /// Pay period to show figures for.
        #[arg(long, default_value = "annual")]
        period: Period,

        /// Show the full calculation instead of the summary line.
        #[arg(long)]
        detailed: bool,
    },

    /// Tabulate results across a range of incomes.
    Sweep {
        #[arg(long, default_value = "0")]
        start: Decimal,

        #[arg(long, default_value = "100000")]
        stop: Decimal,

        #[arg(long, default_value = "5000")]
        step: Decimal,

        #[arg(long, value_enum, default_value_t = SweepFormat::Table)]
        format: SweepFormat,
    },

    /// List the built-in presets.
    Presets,

    /// Validate a policy file and print its parameters.
    Check { file: PathBuf },
}

impl Cli {
    fn policy_source(&self) -> PolicySource {
        match (&self.policy, self.preset) {
            (Some(path), _) => PolicySource::File(path.clone()),
            (None, Some(preset)) => PolicySource::Preset(preset),
            (None, None) => PolicySource::default(),
        }
    }
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    logging::init_default_logging();

    let cli = Cli::parse();

    if let Some(level) = &cli.log_level {
        logging::set_log_level(level)?;
    }
    if let Some(path) = &cli.log_file {
        logging::enable_file_logging(path)?;
    }

    let output = match &cli.command {
        Command::Presets => app::run_presets()?,
        Command::Check { file } => {
            let config = app::load_policy(&PolicySource::File(file.clone()))?;
            app::describe_policy(&config)
        }
        Command::Evaluate {
            income,
            period,
            detailed,
        } => {
            let source = cli.policy_source();
            debug!(?source, "loading policy");
            let config = app::load_policy(&source)?;
            app::run_evaluate(&config, income.as_deref().unwrap_or(""), *period, *detailed)
        }
        Command::Sweep {
            start,
            stop,
            step,
            format,
        } => {
            let source = cli.policy_source();
            debug!(?source, "loading policy");
            let config = app::load_policy(&source)?;
            app::run_sweep(&config, *start, *stop, *step, *format)
                .context("Failed to build sweep")?
        }
    };

    print!("{output}");
    Ok(())
}
