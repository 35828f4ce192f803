use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::period::{Period, PeriodBreakdown};
use crate::calculations::common::round_whole_units;

/// How the clawback for a given income was determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClawbackBasis {
    /// Income below the threshold: `income × clawback_rate`.
    Sliding,
    /// Income at or above the threshold: the whole annual UBI is recaptured.
    FullRecovery,
}

/// Every figure derived for one annual gross income under one policy.
///
/// Built fresh by [`evaluate`](crate::evaluate); never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenefitResult {
    pub gross_income: Decimal,

    // Current income tax regime, no UBI
    pub tax_payable: Decimal,
    pub net_income: Decimal,
    /// Tax as a whole-number percentage of gross income.
    pub effective_tax_rate: Decimal,

    // UBI layer
    pub ubi_gross: Decimal,
    pub clawback_amount: Decimal,
    pub clawback_basis: ClawbackBasis,
    pub net_ubi_benefit: Decimal,

    // Combined position
    pub net_benefit_total: Decimal,
    pub delta_vs_no_ubi: Decimal,
}

impl BenefitResult {
    /// True when the individual keeps some part of the UBI.
    pub fn is_net_beneficiary(&self) -> bool {
        self.delta_vs_no_ubi > Decimal::ZERO
    }

    /// Spreads the annual figures over `period`.
    pub fn per_period(
        &self,
        period: Period,
    ) -> PeriodBreakdown {
        let divisor = Decimal::from(period.periods_per_year());
        let spread = |annual: Decimal| round_whole_units(annual / divisor);

        PeriodBreakdown {
            period,
            gross_income: spread(self.gross_income),
            tax_payable: spread(self.tax_payable),
            net_income: spread(self.net_income),
            ubi_gross: spread(self.ubi_gross),
            clawback_amount: spread(self.clawback_amount),
            net_ubi_benefit: spread(self.net_ubi_benefit),
            net_benefit_total: spread(self.net_benefit_total),
        }
    }
}
