use rust_decimal::Decimal;

use crate::calculations::clawback::clawback_with_basis;
use crate::calculations::common::{max, round_whole_units};
use crate::calculations::tax::compute_tax;
use crate::{BenefitResult, PolicyConfig};

/// Computes the full benefit breakdown for one annual gross income.
///
/// The caller is responsible for passing a non-negative income; see
/// [`compute_tax`] for how negative values are treated.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use ubi_core::{Preset, evaluate};
///
/// let policy = Preset::Fy2023_24.config().unwrap();
/// let result = evaluate(dec!(50000), &policy);
///
/// assert_eq!(result.clawback_amount, dec!(16130));
/// assert_eq!(result.net_ubi_benefit, dec!(15070));
/// ```
pub fn evaluate(
    gross_income: Decimal,
    config: &PolicyConfig,
) -> BenefitResult {
    let tax_payable = compute_tax(gross_income, config);
    let net_income = gross_income - tax_payable;
    let effective_tax_rate =
        round_whole_units(tax_payable / max(gross_income, Decimal::ONE) * Decimal::ONE_HUNDRED);

    let ubi_gross = config.annual_ubi();
    let (clawback_amount, clawback_basis) = clawback_with_basis(gross_income, config);
    let net_ubi_benefit = ubi_gross - clawback_amount;

    let net_benefit_total = net_income + net_ubi_benefit;

    BenefitResult {
        gross_income,
        tax_payable,
        net_income,
        effective_tax_rate,
        ubi_gross,
        clawback_amount,
        clawback_basis,
        net_ubi_benefit,
        net_benefit_total,
        delta_vs_no_ubi: net_benefit_total - net_income,
    }
}
