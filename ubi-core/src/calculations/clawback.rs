use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::common::round_whole_units;
use crate::{ClawbackBasis, PolicyConfig};

/// Portion of the annual UBI recovered through the tax system.
///
/// At or above the clawback threshold the whole annual UBI is recovered.
/// Below it the clawback is `income × clawback_rate`, rounded half-up to
/// whole currency units and never more than the annual UBI.
pub fn compute_clawback(
    income: Decimal,
    config: &PolicyConfig,
) -> Decimal {
    clawback_with_basis(income, config).0
}

pub(crate) fn clawback_with_basis(
    income: Decimal,
    config: &PolicyConfig,
) -> (Decimal, ClawbackBasis) {
    let annual_ubi = config.annual_ubi();

    if income >= config.clawback_threshold() {
        return (annual_ubi, ClawbackBasis::FullRecovery);
    }
    if income < Decimal::ZERO {
        debug!(%income, "negative income, clawback clamped to zero");
        return (Decimal::ZERO, ClawbackBasis::Sliding);
    }

    let sliding = round_whole_units(income * config.clawback_rate());
    (sliding.min(annual_ubi), ClawbackBasis::Sliding)
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
    fn zero_income_has_no_clawback() {
        assert_eq!(
            clawback_with_basis(dec!(0), &config()),
            (dec!(0), ClawbackBasis::Sliding)
        );
    }

    #[test]
    fn sliding_clawback_below_threshold() {
        assert_eq!(compute_clawback(dec!(50000), &config()), dec!(16130));
    }

    #[test]
    fn sliding_clawback_rounds_half_up() {
        // 25 × 0.3226 = 8.065 → 8
        assert_eq!(compute_clawback(dec!(25), &config()), dec!(8));
        // 15 × 0.3226 = 4.839 → 5
        assert_eq!(compute_clawback(dec!(15), &config()), dec!(5));
    }

    #[test]
    fn threshold_is_full_recovery() {
        assert_eq!(
            clawback_with_basis(dec!(96714), &config()),
            (dec!(31200), ClawbackBasis::FullRecovery)
        );
    }

    #[test]
    fn just_below_threshold_is_sliding() {
        let (amount, basis) = clawback_with_basis(dec!(96713), &config());

        // 96713 × 0.3226 = 31199.61
        assert_eq!(amount, dec!(31200));
        assert_eq!(basis, ClawbackBasis::Sliding);
    }

    #[test]
    fn above_threshold_is_constant() {
        let config = config();

        assert_eq!(compute_clawback(dec!(120000), &config), dec!(31200));
        assert_eq!(compute_clawback(dec!(1000000), &config), dec!(31200));
    }

    #[test]
    fn sliding_clawback_is_capped_at_annual_ubi() {
        // 2022-23: 80599 × 0.3226 = 26001.24, capped to 26000
        let config = Preset::Fy2022_23.config().unwrap();

        assert_eq!(compute_clawback(dec!(80599), &config), dec!(26000));
    }

    #[test]
    fn negative_income_is_clamped() {
        assert_eq!(compute_clawback(dec!(-10), &config()), dec!(0));
    }
}
