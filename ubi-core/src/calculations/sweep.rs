//! Income sweeps for charting.
//!
//! A [`SweepSeries`] describes a grid of incomes `start, start + step, …`
//! up to and including `stop`, plus the policy's clawback threshold so the
//! knee of the UBI curve is always sampled exactly. Iterating evaluates each
//! income on demand; the series holds no results and can be iterated any
//! number of times with identical output.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calculations::benefit::evaluate;
use crate::{BenefitResult, PolicyConfig};

/// Errors for an unusable sweep range.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SweepError {
    #[error("start: must be non-negative, got {0}")]
    NegativeStart(Decimal),

    #[error("stop: must not be below start {start}, got {stop}")]
    StopBeforeStart { start: Decimal, stop: Decimal },

    #[error("step: must be positive, got {0}")]
    NonPositiveStep(Decimal),
}

/// One sampled income and its evaluated result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepPoint {
    pub income: Decimal,
    pub result: BenefitResult,
}

/// A validated, restartable sweep over an income range.
#[derive(Debug, Clone, Copy)]
pub struct SweepSeries<'a> {
    config: &'a PolicyConfig,
    start: Decimal,
    stop: Decimal,
    step: Decimal,
}

/// Builds a sweep over `[start, stop]` in increments of `step`.
///
/// # Errors
///
/// Returns [`SweepError`] if `start` is negative, `stop < start`, or
/// `step` is not positive.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use ubi_core::{Preset, sweep};
///
/// let policy = Preset::Fy2022_23.config().unwrap();
/// let series = sweep(&policy, dec!(0), dec!(100000), dec!(20000)).unwrap();
/// let incomes: Vec<_> = series.iter().map(|p| p.income).collect();
///
/// assert_eq!(
///     incomes,
///     vec![dec!(0), dec!(20000), dec!(40000), dec!(60000), dec!(80000), dec!(80600), dec!(100000)]
/// );
/// ```
pub fn sweep(
    config: &PolicyConfig,
    start: Decimal,
    stop: Decimal,
    step: Decimal,
) -> Result<SweepSeries<'_>, SweepError> {
    if start < Decimal::ZERO {
        return Err(SweepError::NegativeStart(start));
    }
    if stop < start {
        return Err(SweepError::StopBeforeStart { start, stop });
    }
    if step <= Decimal::ZERO {
        return Err(SweepError::NonPositiveStep(step));
    }

    Ok(SweepSeries {
        config,
        start,
        stop,
        step,
    })
}

impl<'a> SweepSeries<'a> {
    pub fn config(&self) -> &'a PolicyConfig {
        self.config
    }

    pub fn step(&self) -> Decimal {
        self.step
    }

    /// Iterates the sampled points in ascending income order.
    pub fn iter(&self) -> SweepIter<'a> {
        SweepIter {
            config: self.config,
            next_grid: Some(self.start),
            stop: self.stop,
            step: self.step,
            knee: Some(self.config.clawback_threshold()),
        }
    }

    /// Evaluates every point into a vector.
    pub fn points(&self) -> Vec<SweepPoint> {
        self.iter().collect()
    }
}

impl<'a> IntoIterator for &SweepSeries<'a> {
    type Item = SweepPoint;
    type IntoIter = SweepIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over a [`SweepSeries`]; merges the step grid with the
/// clawback threshold, emitting each income once.
#[derive(Debug, Clone)]
pub struct SweepIter<'a> {
    config: &'a PolicyConfig,
    next_grid: Option<Decimal>,
    stop: Decimal,
    step: Decimal,
    knee: Option<Decimal>,
}

impl SweepIter<'_> {
    fn next_income(&mut self) -> Option<Decimal> {
        match (self.next_grid, self.knee) {
            (Some(grid), Some(knee)) if knee < grid => {
                self.knee = None;
                Some(knee)
            }
            (Some(grid), knee) => {
                if knee == Some(grid) {
                    self.knee = None;
                }
                self.next_grid = grid
                    .checked_add(self.step)
                    .filter(|next| *next <= self.stop);
                Some(grid)
            }
            (None, _) => self.knee.take(),
        }
    }
}

impl Iterator for SweepIter<'_> {
    type Item = SweepPoint;

    fn next(&mut self) -> Option<Self::Item> {
        let income = self.next_income()?;
        Some(SweepPoint {
            income,
            result: evaluate(income, self.config),
        })
    }
}
