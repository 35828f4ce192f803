//! Text rendering of a [`BenefitResult`]: currency formatting, the
//! always-on summary line, and the side-by-side "see calculation" view.

use std::fmt;

use rust_decimal::Decimal;
use ubi_core::calculations::common::round_whole_units;
use ubi_core::{BenefitResult, ClawbackBasis, Period, PolicyConfig};

const SCOPE_NOTE: &str = "Tax covers the personal income tax schedule only: no Medicare levy, \
levy surcharge, study-loan repayments or offsets, assuming full-year residency.";

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Whole-unit amount with thousands separators, e.g. `50,000`.
pub fn format_number(amount: Decimal) -> String {
    let rounded = round_whole_units(amount);
    let grouped = group_thousands(&rounded.abs().trunc().to_string());
    if rounded < Decimal::ZERO {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Whole-dollar currency, e.g. `$50,000` or `-$120`.
pub fn format_currency(amount: Decimal) -> String {
    let number = format_number(amount);
    match number.strip_prefix('-') {
        Some(positive) => format!("-${positive}"),
        None => format!("${number}"),
    }
}

/// A fractional rate as a percentage, e.g. `0.3226` as `32.26%`.
pub fn format_percent(rate: Decimal) -> String {
    format!("{}%", (rate * Decimal::ONE_HUNDRED).normalize())
}

fn period_label(period: Period) -> &'static str {
    match period {
        Period::Annual => "Annual",
        Period::Fortnightly => "Fortnightly",
        Period::Weekly => "Weekly",
    }
}

fn period_noun(period: Period) -> &'static str {
    match period {
        Period::Annual => "year",
        Period::Fortnightly => "fortnight",
        Period::Weekly => "week",
    }
}

/// How the clawback figure was reached.
pub fn recovery_explainer(
    result: &BenefitResult,
    config: &PolicyConfig,
) -> String {
    match result.clawback_basis {
        ClawbackBasis::FullRecovery => {
            "your salary reaches the annual threshold, so the whole basic income is recaptured"
                .to_string()
        }
        ClawbackBasis::Sliding => format!(
            "{} x {}",
            format_number(result.gross_income),
            format_percent(config.clawback_rate())
        ),
    }
}

/// The one-line outcome shown as soon as an income is entered.
pub fn brief_summary(
    result: &BenefitResult,
    config: &PolicyConfig,
) -> String {
    if result.is_net_beneficiary() {
        return format!(
            "Your income would be enhanced by {} per year after taxes under the {} policy.",
            format_currency(result.delta_vs_no_ubi),
            config.name()
        );
    }

    let reason = match result.clawback_basis {
        ClawbackBasis::FullRecovery => format!(
            "Because your salary reaches the annual threshold of {}",
            format_currency(config.clawback_threshold())
        ),
        ClawbackBasis::Sliding => {
            "Because the clawback on your salary already equals the whole basic income".to_string()
        }
    };
    format!(
        "{reason} you do not receive a net UBI benefit, but neither are you worse off: \
         your after-tax take home pay remains the same."
    )
}

/// Printable report for one evaluated income.
#[derive(Debug, Clone, Copy)]
pub struct BenefitReport<'a> {
    result: &'a BenefitResult,
    config: &'a PolicyConfig,
    period: Period,
    detailed: bool,
}

impl<'a> BenefitReport<'a> {
    pub fn new(
        result: &'a BenefitResult,
        config: &'a PolicyConfig,
    ) -> Self {
        Self {
            result,
            config,
            period: Period::Annual,
            detailed: false,
        }
    }

    pub fn period(
        mut self,
        period: Period,
    ) -> Self {
        self.period = period;
        self
    }

    pub fn detailed(
        mut self,
        detailed: bool,
    ) -> Self {
        self.detailed = detailed;
        self
    }
}

impl fmt::Display for BenefitReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let result = self.result;
        writeln!(f, "{}", brief_summary(result, self.config))?;
        if !self.detailed {
            return Ok(());
        }

        let view = result.per_period(self.period);
        let label = period_label(self.period);
        let tax_share = format!("({}% of your income)", result.effective_tax_rate);

        writeln!(f)?;
        writeln!(f, "Current personal income taxation regime (no UBI)")?;
        writeln!(
            f,
            "  {:<36}{}",
            format!("{label} gross income:"),
            format_currency(view.gross_income)
        )?;
        writeln!(
            f,
            "  {:<36}{} {tax_share}",
            format!("{label} tax payable:"),
            format_currency(view.tax_payable)
        )?;
        writeln!(
            f,
            "  {:<36}{}",
            format!("{label} net take home pay:"),
            format_currency(view.net_income)
        )?;

        writeln!(f)?;
        writeln!(f, "Proposed UBI mechanism ({})", self.config.name())?;
        writeln!(
            f,
            "  {:<36}{}",
            format!("{label} gross income:"),
            format_currency(view.gross_income)
        )?;
        writeln!(
            f,
            "  {:<36}{} {tax_share}",
            format!("{label} tax payable:"),
            format_currency(view.tax_payable)
        )?;
        write!(f, "  {:<36}{}", "UBI recovery amount:", format_currency(view.clawback_amount))?;
        if self.period == Period::Annual {
            write!(f, " ({})", recovery_explainer(result, self.config))?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "  {:<36}{} ({} - {})",
            format!("{label} net UBI:"),
            format_currency(view.net_ubi_benefit),
            format_currency(view.ubi_gross),
            format_currency(view.clawback_amount)
        )?;
        writeln!(
            f,
            "  {:<36}{} ({} + {})",
            format!("{label} take home pay + net UBI:"),
            format_currency(view.net_benefit_total),
            format_currency(view.net_income),
            format_currency(view.net_ubi_benefit)
        )?;

        writeln!(f)?;
        if result.is_net_beneficiary() {
            writeln!(
                f,
                "You are {} ahead per {} compared to not receiving a UBI ({} - {}).",
                format_currency(view.net_benefit_total - view.net_income),
                period_noun(self.period),
                format_currency(view.net_benefit_total),
                format_currency(view.net_income)
            )?;
        } else {
            writeln!(
                f,
                "The UBI is fully recovered, so you are neither better nor worse off: take home \
                 pay is the same in both scenarios."
            )?;
        }

        writeln!(f)?;
        writeln!(f, "{SCOPE_NOTE}")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use ubi_core::{Preset, evaluate};

    use super::*;

    fn config() -> PolicyConfig {
        Preset::Fy2023_24.config().unwrap()
    }

    #[test]
    fn format_number_groups_thousands() {
        assert_eq!(format_number(dec!(0)), "0");
        assert_eq!(format_number(dec!(999)), "999");
        assert_eq!(format_number(dec!(1000)), "1,000");
        assert_eq!(format_number(dec!(1234567.5)), "1,234,568");
    }

    #[test]
    fn format_currency_handles_sign() {
        assert_eq!(format_currency(dec!(96714)), "$96,714");
        assert_eq!(format_currency(dec!(-1200.4)), "-$1,200");
        assert_eq!(format_currency(dec!(-0.2)), "$0");
    }

    #[test]
    fn format_percent_drops_trailing_zeros() {
        assert_eq!(format_percent(dec!(0.3226)), "32.26%");
        assert_eq!(format_percent(dec!(0.325)), "32.5%");
        assert_eq!(format_percent(dec!(1)), "100%");
    }

    #[test]
    fn brief_summary_for_net_beneficiary() {
        let config = config();
        let result = evaluate(dec!(50000), &config);

        assert_eq!(
            brief_summary(&result, &config),
            concat!(
                "Your income would be enhanced by $15,070 per year after taxes ",
                "under the 2023-24 policy."
            )
        );
    }

    #[test]
    fn brief_summary_above_threshold() {
        let config = config();
        let result = evaluate(dec!(120000), &config);

        assert!(brief_summary(&result, &config).starts_with(
            "Because your salary reaches the annual threshold of $96,714 you do not receive"
        ));
    }

    #[test]
    fn brief_summary_when_capped_clawback_recovers_everything() {
        let config = Preset::Fy2022_23.config().unwrap();
        let result = evaluate(dec!(80599), &config);

        let summary = brief_summary(&result, &config);

        assert_eq!(result.clawback_basis, ClawbackBasis::Sliding);
        assert!(summary.starts_with("Because the clawback on your salary already equals"));
        assert!(!summary.contains("enhanced by $0"));
    }

    #[test]
    fn detailed_report_when_capped_clawback_recovers_everything() {
        let config = Preset::Fy2022_23.config().unwrap();
        let result = evaluate(dec!(80599), &config);

        let text = BenefitReport::new(&result, &config).detailed(true).to_string();

        assert!(text.contains("neither better nor worse off"));
        assert!(!text.contains("ahead per year"));
    }

    #[test]
    fn recovery_explainer_shows_formula_below_threshold() {
        let config = config();
        let result = evaluate(dec!(50000), &config);

        assert_eq!(recovery_explainer(&result, &config), "50,000 x 32.26%");
    }

    #[test]
    fn brief_report_is_one_line() {
        let config = config();
        let result = evaluate(dec!(50000), &config);

        let text = BenefitReport::new(&result, &config).to_string();

        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn detailed_report_shows_both_regimes() {
        let config = config();
        let result = evaluate(dec!(50000), &config);

        let text = BenefitReport::new(&result, &config).detailed(true).to_string();

        assert!(text.contains("Current personal income taxation regime (no UBI)"));
        assert!(text.contains("$6,717 (13% of your income)"));
        assert!(text.contains("$16,130 (50,000 x 32.26%)"));
        assert!(text.contains("$15,070 ($31,200 - $16,130)"));
        assert!(text.contains("$58,353 ($43,283 + $15,070)"));
        assert!(text.contains("You are $15,070 ahead per year"));
    }

    #[test]
    fn detailed_weekly_report_spreads_figures() {
        let config = config();
        let result = evaluate(dec!(50000), &config);

        let text = BenefitReport::new(&result, &config)
            .period(Period::Weekly)
            .detailed(true)
            .to_string();

        assert!(text.contains("Weekly gross income:"));
        assert!(text.contains("$962"));
        assert!(text.contains("$290 ($600 - $310)"));
        assert!(text.contains("ahead per week"));
    }
}
