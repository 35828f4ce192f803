use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const WEEKS_PER_YEAR: u32 = 52;

/// Pay period an annual figure can be spread over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    #[default]
    Annual,
    Fortnightly,
    Weekly,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Annual => "annual",
            Self::Fortnightly => "fortnightly",
            Self::Weekly => "weekly",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "annual" | "year" | "yearly" => Some(Self::Annual),
            "fortnightly" | "fortnight" => Some(Self::Fortnightly),
            "weekly" | "week" => Some(Self::Weekly),
            _ => None,
        }
    }

    pub fn periods_per_year(&self) -> u32 {
        match self {
            Self::Annual => 1,
            Self::Fortnightly => WEEKS_PER_YEAR / 2,
            Self::Weekly => WEEKS_PER_YEAR,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown period '{0}' (expected annual, fortnightly or weekly)")]
pub struct UnknownPeriodError(pub String);

impl FromStr for Period {
    type Err = UnknownPeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnknownPeriodError(s.to_string()))
    }
}

/// A [`BenefitResult`](crate::BenefitResult) spread over one pay period,
/// each figure rounded to whole currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodBreakdown {
    pub period: Period,
    pub gross_income: Decimal,
    pub tax_payable: Decimal,
    pub net_income: Decimal,
    pub ubi_gross: Decimal,
    pub clawback_amount: Decimal,
    pub net_ubi_benefit: Decimal,
    pub net_benefit_total: Decimal,
}
