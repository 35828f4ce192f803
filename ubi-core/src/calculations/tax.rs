use rust_decimal::Decimal;
use tracing::debug;

use crate::PolicyConfig;
use crate::calculations::common::round_half_up;

/// Income tax payable on an annual gross income, rounded to cents.
///
/// The bracket is located by binary search over the ascending schedule and
/// the tax is `base_tax + (income - min_income) × tax_rate`.
///
/// Negative income is outside the engine's contract; it is treated as zero
/// tax rather than an error.
pub fn compute_tax(
    income: Decimal,
    config: &PolicyConfig,
) -> Decimal {
    if income <= Decimal::ZERO {
        if income < Decimal::ZERO {
            debug!(%income, "negative income, tax clamped to zero");
        }
        return Decimal::ZERO;
    }

    let bracket = config.bracket_for(income);
    round_half_up(bracket.tax_on(income))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::Preset;

    fn config() -> PolicyConfig {
        Preset::Fy2023_24.config().unwrap()
    }

    #[test]
    fn zero_income_pays_no_tax() {
        assert_eq!(compute_tax(dec!(0), &config()), dec!(0));
    }

    #[test]
    fn negative_income_is_clamped() {
        assert_eq!(compute_tax(dec!(-1000), &config()), dec!(0));
    }

    #[test]
    fn tax_free_threshold_boundary() {
        assert_eq!(compute_tax(dec!(18200), &config()), dec!(0));
        assert_eq!(compute_tax(dec!(18201), &config()), dec!(0.19));
    }

    #[test]
    fn tax_at_each_bracket_edge_equals_base() {
        let config = config();

        assert_eq!(compute_tax(dec!(45000), &config), dec!(5092));
        assert_eq!(compute_tax(dec!(120000), &config), dec!(29467));
        assert_eq!(compute_tax(dec!(180000), &config), dec!(51667));
    }

    #[test]
    fn tax_within_middle_bracket() {
        // (60000 - 45000) × 0.325 + 5092
        assert_eq!(compute_tax(dec!(60000), &config()), dec!(9967));
    }

    #[test]
    fn tax_in_top_bracket() {
        // (250000 - 180000) × 0.45 + 51667
        assert_eq!(compute_tax(dec!(250000), &config()), dec!(83167));
    }

    #[test]
    fn fractional_income_rounds_to_cents() {
        // 0.5 × 0.19 = 0.095
        assert_eq!(compute_tax(dec!(18200.5), &config()), dec!(0.10));
    }

    #[test]
    fn tax_is_continuous_across_every_bracket_edge() {
        let config = config();
        let epsilon = dec!(0.01);

        for bracket in config.tax_brackets().iter().skip(1) {
            let at_edge = compute_tax(bracket.min_income, &config);
            let just_below = compute_tax(bracket.min_income - epsilon, &config);

            assert_eq!(at_edge, round_half_up(bracket.base_tax));
            assert!(at_edge - just_below <= epsilon, "jump at {}", bracket.min_income);
        }
    }
}
