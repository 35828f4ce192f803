use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{ConfigError, PolicyConfig};
use crate::models::TaxBracket;

/// Shared clawback rate of both presets: 26,000 / 80,600 to four places.
const PRESET_CLAWBACK_RATE: Decimal = dec!(0.3226);

/// Resident individual income tax schedule used by both presets.
///
/// | lower   | upper   | base   | rate  |
/// |---------|---------|--------|-------|
/// | 0       | 18,200  | 0      | 0%    |
/// | 18,200  | 45,000  | 0      | 19%   |
/// | 45,000  | 120,000 | 5,092  | 32.5% |
/// | 120,000 | 180,000 | 29,467 | 37%   |
/// | 180,000 | ∞       | 51,667 | 45%   |
pub fn resident_tax_brackets() -> Vec<TaxBracket> {
    vec![
        TaxBracket::new(dec!(0), Some(dec!(18200)), dec!(0), dec!(0)),
        TaxBracket::new(dec!(18200), Some(dec!(45000)), dec!(0), dec!(0.19)),
        TaxBracket::new(dec!(45000), Some(dec!(120000)), dec!(5092), dec!(0.325)),
        TaxBracket::new(dec!(120000), Some(dec!(180000)), dec!(29467), dec!(0.37)),
        TaxBracket::new(dec!(180000), None, dec!(51667), dec!(0.45)),
    ]
}

/// Named policy variants that can be rebuilt from literal data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Preset {
    /// $500/week, fully clawed back from $80,600.
    #[serde(rename = "2022-23")]
    Fy2022_23,
    /// $600/week, fully clawed back from $96,714.
    #[default]
    #[serde(rename = "2023-24")]
    Fy2023_24,
}

impl Preset {
    pub const ALL: [Preset; 2] = [Preset::Fy2022_23, Preset::Fy2023_24];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fy2022_23 => "2022-23",
            Self::Fy2023_24 => "2023-24",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "2022-23" | "2022/23" => Some(Self::Fy2022_23),
            "2023-24" | "2023/24" => Some(Self::Fy2023_24),
            _ => None,
        }
    }

    pub fn weekly_ubi(&self) -> Decimal {
        match self {
            Self::Fy2022_23 => dec!(500),
            Self::Fy2023_24 => dec!(600),
        }
    }

    pub fn clawback_threshold(&self) -> Decimal {
        match self {
            Self::Fy2022_23 => dec!(80600),
            Self::Fy2023_24 => dec!(96714),
        }
    }

    pub fn clawback_rate(&self) -> Decimal {
        PRESET_CLAWBACK_RATE
    }

    /// Builds the validated policy for this preset.
    ///
    /// # Errors
    ///
    /// Only if the literal data above is edited into an invalid state.
    pub fn config(&self) -> Result<PolicyConfig, ConfigError> {
        PolicyConfig::new(
            self.as_str(),
            resident_tax_brackets(),
            self.weekly_ubi(),
            self.clawback_rate(),
            self.clawback_threshold(),
        )
    }
}

impl fmt::Display for Preset {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown preset '{0}' (expected 2022-23 or 2023-24)")]
pub struct UnknownPresetError(pub String);

impl FromStr for Preset {
    type Err = UnknownPresetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnknownPresetError(s.to_string()))
    }
}
