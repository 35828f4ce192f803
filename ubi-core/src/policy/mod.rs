//! Policy configuration: the tax schedule and UBI parameters one
//! calculation runs under.
//!
//! A [`PolicyConfig`] can only be obtained through [`PolicyConfig::new`],
//! which checks every invariant up front. The calculation functions can
//! therefore assume a well-formed schedule and never fail.

mod preset;

pub use preset::{Preset, UnknownPresetError, resident_tax_brackets};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::calculations::common::round_half_up;
use crate::models::{TaxBracket, WEEKS_PER_YEAR};

/// Errors raised while constructing a [`PolicyConfig`].
///
/// Each message names the offending field so a broken policy file can be
/// fixed without reading the source.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("tax_brackets: at least one bracket is required")]
    NoTaxBrackets,

    #[error("tax_brackets[0].min_income: first bracket must start at 0, got {0}")]
    FirstBracketNotZero(Decimal),

    #[error(
        "tax_brackets[{index}].min_income: expected {expected} (previous max_income), got {actual}"
    )]
    NonContiguous {
        index: usize,
        expected: Decimal,
        actual: Decimal,
    },

    #[error("tax_brackets[{index}].max_income: only the last bracket may be unbounded")]
    UnboundedBeforeLast { index: usize },

    #[error("tax_brackets[{index}].max_income: last bracket must be unbounded, got {max}")]
    LastBracketBounded { index: usize, max: Decimal },

    #[error("tax_brackets[{index}].max_income: must exceed min_income {min}, got {max}")]
    EmptyBracket {
        index: usize,
        min: Decimal,
        max: Decimal,
    },

    #[error("tax_brackets[{index}].tax_rate: must be in [0, 1), got {rate}")]
    InvalidTaxRate { index: usize, rate: Decimal },

    #[error(
        "tax_brackets[{index}].base_tax: expected {expected} to keep tax continuous, got {actual}"
    )]
    DiscontinuousBaseTax {
        index: usize,
        expected: Decimal,
        actual: Decimal,
    },

    #[error("tax_brackets[{index}].base_tax: tax at min_income is too large to represent")]
    BaseTaxOverflow { index: usize },

    #[error("weekly_ubi: annual amount is too large to represent, got {0} per week")]
    AnnualUbiOverflow(Decimal),

    #[error("clawback_threshold: annual UBI / threshold is too large to represent, got {0}")]
    ImpliedRateOverflow(Decimal),

    #[error("weekly_ubi: must be positive, got {0}")]
    InvalidWeeklyUbi(Decimal),

    #[error("clawback_rate: must be in (0, 1], got {0}")]
    InvalidClawbackRate(Decimal),

    #[error("clawback_threshold: must be positive, got {0}")]
    InvalidClawbackThreshold(Decimal),
}

/// One validated policy variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyConfig {
    name: String,
    tax_brackets: Vec<TaxBracket>,
    weekly_ubi: Decimal,
    clawback_rate: Decimal,
    clawback_threshold: Decimal,
}

impl PolicyConfig {
    /// Validates and builds a policy.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found. Brackets are checked before
    /// the UBI parameters.
    pub fn new(
        name: impl Into<String>,
        tax_brackets: Vec<TaxBracket>,
        weekly_ubi: Decimal,
        clawback_rate: Decimal,
        clawback_threshold: Decimal,
    ) -> Result<Self, ConfigError> {
        validate_brackets(&tax_brackets)?;

        if weekly_ubi <= Decimal::ZERO {
            return Err(ConfigError::InvalidWeeklyUbi(weekly_ubi));
        }
        if clawback_rate <= Decimal::ZERO || clawback_rate > Decimal::ONE {
            return Err(ConfigError::InvalidClawbackRate(clawback_rate));
        }
        if clawback_threshold <= Decimal::ZERO {
            return Err(ConfigError::InvalidClawbackThreshold(clawback_threshold));
        }

        // annual_ubi and implied_clawback_rate rely on these never overflowing
        let annual_ubi = weekly_ubi
            .checked_mul(Decimal::from(WEEKS_PER_YEAR))
            .ok_or(ConfigError::AnnualUbiOverflow(weekly_ubi))?;
        annual_ubi
            .checked_div(clawback_threshold)
            .ok_or(ConfigError::ImpliedRateOverflow(clawback_threshold))?;

        let config = Self {
            name: name.into(),
            tax_brackets,
            weekly_ubi,
            clawback_rate,
            clawback_threshold,
        };

        if config.is_consistent() {
            debug!(policy = %config.name, "policy validated");
        } else {
            warn!(
                policy = %config.name,
                clawback_rate = %config.clawback_rate,
                implied_rate = %config.implied_clawback_rate(),
                "clawback threshold does not match annual UBI at the configured rate"
            );
        }

        Ok(config)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tax_brackets(&self) -> &[TaxBracket] {
        &self.tax_brackets
    }

    pub fn weekly_ubi(&self) -> Decimal {
        self.weekly_ubi
    }

    pub fn clawback_rate(&self) -> Decimal {
        self.clawback_rate
    }

    pub fn clawback_threshold(&self) -> Decimal {
        self.clawback_threshold
    }

    /// `weekly_ubi × 52`, also the largest possible clawback.
    pub fn annual_ubi(&self) -> Decimal {
        self.weekly_ubi * Decimal::from(WEEKS_PER_YEAR)
    }

    /// `annual_ubi / clawback_threshold`, stated to the same number of
    /// decimal places as the configured clawback rate.
    pub fn implied_clawback_rate(&self) -> Decimal {
        (self.annual_ubi() / self.clawback_threshold).round_dp_with_strategy(
            self.clawback_rate.scale(),
            RoundingStrategy::MidpointAwayFromZero,
        )
    }

    /// True when the sliding clawback reaches the full annual UBI at the
    /// threshold, to the precision the rate is stated in.
    pub fn is_consistent(&self) -> bool {
        self.implied_clawback_rate() == self.clawback_rate
    }

    /// Returns a copy with different UBI parameters and the same brackets.
    ///
    /// # Errors
    ///
    /// Same checks as [`PolicyConfig::new`].
    pub fn with_ubi(
        &self,
        name: impl Into<String>,
        weekly_ubi: Decimal,
        clawback_rate: Decimal,
        clawback_threshold: Decimal,
    ) -> Result<Self, ConfigError> {
        Self::new(
            name,
            self.tax_brackets.clone(),
            weekly_ubi,
            clawback_rate,
            clawback_threshold,
        )
    }

    /// The bracket whose `[min, max)` range contains `income`.
    ///
    /// Incomes below zero resolve to the first bracket.
    pub(crate) fn bracket_for(&self, income: Decimal) -> &TaxBracket {
        let upper = self.tax_brackets.partition_point(|b| b.min_income <= income);
        &self.tax_brackets[upper.saturating_sub(1)]
    }
}

fn validate_brackets(brackets: &[TaxBracket]) -> Result<(), ConfigError> {
    let Some(first) = brackets.first() else {
        return Err(ConfigError::NoTaxBrackets);
    };
    if first.min_income != Decimal::ZERO {
        return Err(ConfigError::FirstBracketNotZero(first.min_income));
    }

    let last_index = brackets.len() - 1;
    for (index, bracket) in brackets.iter().enumerate() {
        if bracket.tax_rate < Decimal::ZERO || bracket.tax_rate >= Decimal::ONE {
            return Err(ConfigError::InvalidTaxRate {
                index,
                rate: bracket.tax_rate,
            });
        }

        match (bracket.max_income, index == last_index) {
            (None, false) => return Err(ConfigError::UnboundedBeforeLast { index }),
            (Some(max), true) => return Err(ConfigError::LastBracketBounded { index, max }),
            (Some(max), false) if max <= bracket.min_income => {
                return Err(ConfigError::EmptyBracket {
                    index,
                    min: bracket.min_income,
                    max,
                });
            }
            _ => {}
        }

        let expected_base = match index.checked_sub(1).map(|i| &brackets[i]) {
            None => Decimal::ZERO,
            Some(previous) => {
                // max_income is Some for every non-last bracket, checked above
                let expected_min = previous.max_income.unwrap_or(previous.min_income);
                if bracket.min_income != expected_min {
                    return Err(ConfigError::NonContiguous {
                        index,
                        expected: expected_min,
                        actual: bracket.min_income,
                    });
                }
                let tax = previous
                    .checked_tax_on(bracket.min_income)
                    .ok_or(ConfigError::BaseTaxOverflow { index })?;
                round_half_up(tax)
            }
        };
        if round_half_up(bracket.base_tax) != expected_base {
            return Err(ConfigError::DiscontinuousBaseTax {
                index,
                expected: expected_base,
                actual: bracket.base_tax,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn brackets() -> Vec<TaxBracket> {
        resident_tax_brackets()
    }

    fn build(brackets: Vec<TaxBracket>) -> Result<PolicyConfig, ConfigError> {
        PolicyConfig::new("test", brackets, dec!(600), dec!(0.3226), dec!(96714))
    }

    #[test]
    fn new_accepts_resident_schedule() {
        let config = build(brackets()).unwrap();

        assert_eq!(config.tax_brackets().len(), 5);
        assert_eq!(config.annual_ubi(), dec!(31200));
        assert!(config.is_consistent());
    }

    #[test]
    fn new_rejects_empty_brackets() {
        assert_eq!(build(vec![]), Err(ConfigError::NoTaxBrackets));
    }

    #[test]
    fn new_rejects_first_bracket_above_zero() {
        let mut brackets = brackets();
        brackets[0].min_income = dec!(1);

        assert_eq!(build(brackets), Err(ConfigError::FirstBracketNotZero(dec!(1))));
    }

    #[test]
    fn new_rejects_gap_between_brackets() {
        let mut brackets = brackets();
        brackets[2].min_income = dec!(45001);

        assert_eq!(
            build(brackets),
            Err(ConfigError::NonContiguous {
                index: 2,
                expected: dec!(45000),
                actual: dec!(45001),
            })
        );
    }

    #[test]
    fn new_rejects_bounded_top_bracket() {
        let mut brackets = brackets();
        brackets[4].max_income = Some(dec!(1000000));

        assert_eq!(
            build(brackets),
            Err(ConfigError::LastBracketBounded {
                index: 4,
                max: dec!(1000000),
            })
        );
    }

    #[test]
    fn new_rejects_unbounded_middle_bracket() {
        let mut brackets = brackets();
        brackets[1].max_income = None;

        assert_eq!(build(brackets), Err(ConfigError::UnboundedBeforeLast { index: 1 }));
    }

    #[test]
    fn new_rejects_empty_bracket_range() {
        let brackets = vec![
            TaxBracket::new(dec!(0), Some(dec!(0)), dec!(0), dec!(0)),
            TaxBracket::new(dec!(0), None, dec!(0), dec!(0.2)),
        ];

        assert_eq!(
            build(brackets),
            Err(ConfigError::EmptyBracket {
                index: 0,
                min: dec!(0),
                max: dec!(0),
            })
        );
    }

    #[test]
    fn new_rejects_rate_of_one_or_more() {
        let mut brackets = brackets();
        brackets[4].tax_rate = dec!(1);

        assert_eq!(
            build(brackets),
            Err(ConfigError::InvalidTaxRate {
                index: 4,
                rate: dec!(1),
            })
        );
    }

    #[test]
    fn new_rejects_negative_rate() {
        let mut brackets = brackets();
        brackets[0].tax_rate = dec!(-0.01);

        assert!(matches!(
            build(brackets),
            Err(ConfigError::InvalidTaxRate { index: 0, .. })
        ));
    }

    #[test]
    fn new_rejects_discontinuous_base_tax() {
        let mut brackets = brackets();
        brackets[3].base_tax = dec!(29000);

        assert_eq!(
            build(brackets),
            Err(ConfigError::DiscontinuousBaseTax {
                index: 3,
                expected: dec!(29467),
                actual: dec!(29000),
            })
        );
    }

    #[test]
    fn new_rejects_nonzero_base_on_first_bracket() {
        let mut brackets = brackets();
        brackets[0].base_tax = dec!(10);

        assert!(matches!(
            build(brackets),
            Err(ConfigError::DiscontinuousBaseTax { index: 0, .. })
        ));
    }

    #[test]
    fn new_rejects_non_positive_weekly_ubi() {
        let result = PolicyConfig::new("t", brackets(), dec!(0), dec!(0.3226), dec!(96714));

        assert_eq!(result, Err(ConfigError::InvalidWeeklyUbi(dec!(0))));
    }

    #[test]
    fn new_rejects_clawback_rate_out_of_range() {
        let zero = PolicyConfig::new("t", brackets(), dec!(600), dec!(0), dec!(96714));
        let above_one = PolicyConfig::new("t", brackets(), dec!(600), dec!(1.01), dec!(96714));

        assert_eq!(zero, Err(ConfigError::InvalidClawbackRate(dec!(0))));
        assert_eq!(above_one, Err(ConfigError::InvalidClawbackRate(dec!(1.01))));
    }

    #[test]
    fn new_accepts_clawback_rate_of_one() {
        let config = PolicyConfig::new("t", brackets(), dec!(600), dec!(1), dec!(31200)).unwrap();

        assert!(config.is_consistent());
    }

    #[test]
    fn new_rejects_non_positive_threshold() {
        let result = PolicyConfig::new("t", brackets(), dec!(600), dec!(0.3226), dec!(-1));

        assert_eq!(result, Err(ConfigError::InvalidClawbackThreshold(dec!(-1))));
    }

    #[test]
    fn new_rejects_weekly_ubi_whose_annual_amount_overflows() {
        let weekly = dec!(2000000000000000000000000000);

        let result = PolicyConfig::new("t", brackets(), weekly, dec!(0.5), dec!(100));

        assert_eq!(result, Err(ConfigError::AnnualUbiOverflow(weekly)));
    }

    #[test]
    fn new_rejects_threshold_too_small_to_divide_by() {
        let threshold = dec!(0.000000000000000000000000001);

        let result = PolicyConfig::new("t", brackets(), dec!(600), dec!(0.5), threshold);

        assert_eq!(result, Err(ConfigError::ImpliedRateOverflow(threshold)));
    }

    #[test]
    fn new_accepts_tiny_threshold_that_still_divides() {
        let config =
            PolicyConfig::new("t", brackets(), dec!(600), dec!(1), dec!(0.0001)).unwrap();

        assert!(!config.is_consistent());
        assert_eq!(config.implied_clawback_rate(), dec!(312000000));
    }

    #[test]
    fn inconsistent_policy_is_accepted_but_flagged() {
        let config =
            PolicyConfig::new("t", brackets(), dec!(600), dec!(0.3226), dec!(80600)).unwrap();

        assert!(!config.is_consistent());
        assert_eq!(config.implied_clawback_rate(), dec!(0.3871));
    }

    #[test]
    fn error_messages_name_the_field() {
        let err = ConfigError::InvalidTaxRate {
            index: 2,
            rate: dec!(1.5),
        };

        assert_eq!(
            err.to_string(),
            "tax_brackets[2].tax_rate: must be in [0, 1), got 1.5"
        );
    }

    #[test]
    fn bracket_for_uses_half_open_ranges() {
        let config = build(brackets()).unwrap();

        assert_eq!(config.bracket_for(dec!(0)).min_income, dec!(0));
        assert_eq!(config.bracket_for(dec!(18199.99)).min_income, dec!(0));
        assert_eq!(config.bracket_for(dec!(18200)).min_income, dec!(18200));
        assert_eq!(config.bracket_for(dec!(180000)).min_income, dec!(180000));
        assert_eq!(config.bracket_for(dec!(-5)).min_income, dec!(0));
    }

    #[test]
    fn with_ubi_keeps_brackets() {
        let config = build(brackets()).unwrap();

        let variant = config
            .with_ubi("variant", dec!(500), dec!(0.3226), dec!(80600))
            .unwrap();

        assert_eq!(variant.tax_brackets(), config.tax_brackets());
        assert_eq!(variant.annual_ubi(), dec!(26000));
    }
}
