use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::ValueEnum;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};
use ubi_core::{Period, PolicyConfig, Preset, SweepPoint, SweepSeries, evaluate, sweep};

use crate::chart::build_chart;
use crate::input::recover_income;
use crate::report::{BenefitReport, format_currency, format_percent};

pub const NO_INPUT_PROMPT: &str =
    "What is your annual personal income before tax? Enter an amount such as 45000.";

/// Where the active policy comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicySource {
    Preset(Preset),
    File(PathBuf),
}

impl Default for PolicySource {
    fn default() -> Self {
        Self::Preset(Preset::default())
    }
}

/// Resolves `source` to a validated policy. Never falls back to a default
/// when a file is given but broken.
pub fn load_policy(source: &PolicySource) -> Result<PolicyConfig> {
    match source {
        PolicySource::Preset(preset) => preset
            .config()
            .with_context(|| format!("preset {preset} is invalid")),
        PolicySource::File(path) => ubi_data::load_policy(path)
            .with_context(|| format!("Failed to load policy file: {}", path.display())),
    }
}

/// Output formats for `sweep`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SweepFormat {
    #[default]
    Table,
    Csv,
    ChartJson,
}

/// Renders the result for raw income text, or the prompt when there is
/// nothing to evaluate. Invalid text produces a warning line first.
pub fn run_evaluate(
    config: &PolicyConfig,
    raw_income: &str,
    period: Period,
    detailed: bool,
) -> String {
    let (input, warning) = recover_income(raw_income);

    let mut out = String::new();
    if let Some(warning) = warning {
        out.push_str(&format!("Warning: {warning}\n"));
    }

    match input.income() {
        None => {
            out.push_str(NO_INPUT_PROMPT);
            out.push('\n');
        }
        Some(income) => {
            let result = evaluate(income, config);
            info!(
                policy = config.name(),
                %income,
                net_benefit_total = %result.net_benefit_total,
                "evaluated income"
            );
            let report = BenefitReport::new(&result, config)
                .period(period)
                .detailed(detailed);
            out.push_str(&report.to_string());
        }
    }
    out
}

#[derive(Debug, Serialize)]
struct SweepRow {
    gross_income: Decimal,
    tax_payable: Decimal,
    net_income: Decimal,
    ubi_gross: Decimal,
    clawback_amount: Decimal,
    net_ubi_benefit: Decimal,
    net_benefit_total: Decimal,
    delta_vs_no_ubi: Decimal,
}

impl From<&SweepPoint> for SweepRow {
    fn from(point: &SweepPoint) -> Self {
        let r = &point.result;
        Self {
            gross_income: point.income,
            tax_payable: r.tax_payable,
            net_income: r.net_income,
            ubi_gross: r.ubi_gross,
            clawback_amount: r.clawback_amount,
            net_ubi_benefit: r.net_ubi_benefit,
            net_benefit_total: r.net_benefit_total,
            delta_vs_no_ubi: r.delta_vs_no_ubi,
        }
    }
}

fn render_table(series: &SweepSeries<'_>) -> String {
    let mut out = format!(
        "{:>12} {:>10} {:>12} {:>10} {:>10} {:>12}\n",
        "Gross", "Tax", "Net earned", "Clawback", "Net UBI", "Net final"
    );
    for point in series {
        let r = &point.result;
        out.push_str(&format!(
            "{:>12} {:>10} {:>12} {:>10} {:>10} {:>12}\n",
            format_currency(point.income),
            format_currency(r.tax_payable),
            format_currency(r.net_income),
            format_currency(r.clawback_amount),
            format_currency(r.net_ubi_benefit),
            format_currency(r.net_benefit_total),
        ));
    }
    out
}

fn render_csv(series: &SweepSeries<'_>) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for point in series {
        writer.serialize(SweepRow::from(&point))?;
    }
    let bytes = writer.into_inner().context("Failed to flush CSV output")?;
    Ok(String::from_utf8(bytes)?)
}

/// Evaluates a sweep over `[start, stop]` and renders it in `format`.
pub fn run_sweep(
    config: &PolicyConfig,
    start: Decimal,
    stop: Decimal,
    step: Decimal,
    format: SweepFormat,
) -> Result<String> {
    let series = sweep(config, start, stop, step).context("Invalid sweep range")?;
    debug!(%start, %stop, %step, ?format, "rendering sweep");

    match format {
        SweepFormat::Table => Ok(render_table(&series)),
        SweepFormat::Csv => render_csv(&series),
        SweepFormat::ChartJson => Ok(serde_json::to_string_pretty(&build_chart(&series))?),
    }
}

/// Multi-line summary of a policy's UBI parameters and bracket table.
pub fn describe_policy(config: &PolicyConfig) -> String {
    let mut out = format!("{}\n", config.name());
    out.push_str(&format!(
        "  UBI:       {}/week ({}/year)\n",
        format_currency(config.weekly_ubi()),
        format_currency(config.annual_ubi())
    ));
    out.push_str(&format!(
        "  Clawback:  {} of gross income, full recovery from {}\n",
        format_percent(config.clawback_rate()),
        format_currency(config.clawback_threshold())
    ));
    if config.is_consistent() {
        out.push_str("  Consistent: yes\n");
    } else {
        out.push_str(&format!(
            "  Consistent: no (annual UBI / threshold = {})\n",
            format_percent(config.implied_clawback_rate())
        ));
    }
    out.push_str("  Brackets:\n");
    for bracket in config.tax_brackets() {
        let upper = bracket
            .max_income
            .map(format_currency)
            .unwrap_or_else(|| "and over".to_string());
        out.push_str(&format!(
            "    {:>10} - {:<10} {:>8} + {}\n",
            format_currency(bracket.min_income),
            upper,
            format_currency(bracket.base_tax),
            format_percent(bracket.tax_rate)
        ));
    }
    out
}

/// Describes every built-in preset.
pub fn run_presets() -> Result<String> {
    let mut out = String::new();
    for preset in Preset::ALL {
        let config = preset
            .config()
            .with_context(|| format!("preset {preset} is invalid"))?;
        out.push_str(&describe_policy(&config));
    }
    Ok(out)
}
