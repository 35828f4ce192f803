//! Raw income text at the presentation boundary.
//!
//! The engine only ever sees a validated, non-negative income. Anything
//! else is turned into [`IncomeInput::NoInput`] here, together with an
//! [`InputError`] the caller shows to the user.

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::warn;

/// What the user has entered so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IncomeInput {
    /// Nothing usable entered yet; no result should be shown.
    #[default]
    NoInput,
    /// A validated annual gross income.
    Income(Decimal),
}

impl IncomeInput {
    pub fn income(&self) -> Option<Decimal> {
        match self {
            Self::NoInput => None,
            Self::Income(value) => Some(*value),
        }
    }
}

/// Why raw income text was rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("please enter valid numbers only, e.g. 45000 (got '{0}')")]
    NotANumber(String),

    #[error("please enter a non-negative number (got {0})")]
    Negative(Decimal),
}

/// Trims whitespace and strips a leading `$` and thousands separators.
fn normalize_income_input(s: &str) -> String {
    let trimmed = s.trim();
    trimmed
        .strip_prefix('$')
        .unwrap_or(trimmed)
        .trim_start()
        .replace(',', "")
}

/// Parses raw income text.
///
/// Empty or whitespace-only input is [`IncomeInput::NoInput`], not zero.
///
/// # Errors
///
/// * [`InputError::NotANumber`] - the text is not a decimal number
/// * [`InputError::Negative`] - the number is below zero
pub fn parse_income(raw: &str) -> Result<IncomeInput, InputError> {
    let normalized = normalize_income_input(raw);
    if normalized.is_empty() {
        return Ok(IncomeInput::NoInput);
    }

    let value: Decimal = normalized
        .parse()
        .map_err(|_| InputError::NotANumber(raw.trim().to_string()))?;
    if value < Decimal::ZERO {
        return Err(InputError::Negative(value));
    }

    Ok(IncomeInput::Income(value))
}

/// Parses raw income text, recovering from bad input.
///
/// Invalid text yields [`IncomeInput::NoInput`] plus the error to surface
/// as a warning; it is also logged.
pub fn recover_income(raw: &str) -> (IncomeInput, Option<InputError>) {
    match parse_income(raw) {
        Ok(input) => (input, None),
        Err(error) => {
            warn!(input = %raw, %error, "rejected income input");
            (IncomeInput::NoInput, Some(error))
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn parse_income_accepts_plain_integer() {
        assert_eq!(parse_income("45000"), Ok(IncomeInput::Income(dec!(45000))));
    }

    #[test]
    fn parse_income_accepts_currency_formatting() {
        assert_eq!(parse_income(" $1,234.56 "), Ok(IncomeInput::Income(dec!(1234.56))));
        assert_eq!(parse_income("$ 80,600"), Ok(IncomeInput::Income(dec!(80600))));
    }

    #[test]
    fn parse_income_empty_is_no_input() {
        assert_eq!(parse_income(""), Ok(IncomeInput::NoInput));
        assert_eq!(parse_income("   "), Ok(IncomeInput::NoInput));
    }

    #[test]
    fn parse_income_zero_is_a_real_income() {
        assert_eq!(parse_income("0"), Ok(IncomeInput::Income(dec!(0))));
    }

    #[test]
    fn parse_income_rejects_text() {
        assert_eq!(
            parse_income("lots"),
            Err(InputError::NotANumber("lots".to_string()))
        );
    }

    #[test]
    fn parse_income_rejects_negative() {
        assert_eq!(parse_income("-500"), Err(InputError::Negative(dec!(-500))));
    }

    #[test]
    fn recover_income_substitutes_no_input() {
        let (input, warning) = recover_income("-1");

        assert_eq!(input, IncomeInput::NoInput);
        assert_eq!(warning, Some(InputError::Negative(dec!(-1))));
    }

    #[test]
    fn recover_income_passes_valid_input_through() {
        let (input, warning) = recover_income("50000");

        assert_eq!(input.income(), Some(dec!(50000)));
        assert!(warning.is_none());
    }
}
