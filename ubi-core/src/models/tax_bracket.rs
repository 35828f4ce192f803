use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row of a marginal tax schedule.
///
/// `base_tax` is the tax already accumulated by all lower brackets at
/// `min_income`. `max_income` is `None` only for the top bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub min_income: Decimal,
    pub max_income: Option<Decimal>,
    pub tax_rate: Decimal,
    pub base_tax: Decimal,
}

impl TaxBracket {
    pub fn new(
        min_income: Decimal,
        max_income: Option<Decimal>,
        base_tax: Decimal,
        tax_rate: Decimal,
    ) -> Self {
        Self {
            min_income,
            max_income,
            tax_rate,
            base_tax,
        }
    }

    /// Unrounded tax on `income` using this bracket's base and marginal rate.
    ///
    /// Only meaningful for incomes at or above `min_income`.
    pub fn tax_on(
        &self,
        income: Decimal,
    ) -> Decimal {
        self.base_tax + (income - self.min_income) * self.tax_rate
    }

    /// [`TaxBracket::tax_on`], or `None` if the result does not fit in a
    /// [`Decimal`].
    pub fn checked_tax_on(
        &self,
        income: Decimal,
    ) -> Option<Decimal> {
        income
            .checked_sub(self.min_income)?
            .checked_mul(self.tax_rate)?
            .checked_add(self.base_tax)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn tax_on_adds_marginal_tax_to_base() {
        let bracket = TaxBracket::new(dec!(45000), Some(dec!(120000)), dec!(5092), dec!(0.325));

        assert_eq!(bracket.tax_on(dec!(120000)), dec!(29467));
    }

    #[test]
    fn checked_tax_on_matches_tax_on() {
        let bracket = TaxBracket::new(dec!(45000), Some(dec!(120000)), dec!(5092), dec!(0.325));

        assert_eq!(bracket.checked_tax_on(dec!(60000)), Some(bracket.tax_on(dec!(60000))));
    }

    #[test]
    fn checked_tax_on_reports_overflow() {
        let bracket = TaxBracket::new(dec!(0), None, Decimal::MAX, dec!(0.5));

        assert_eq!(bracket.checked_tax_on(dec!(1000)), None);
    }
}
