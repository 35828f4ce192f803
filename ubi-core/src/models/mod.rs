mod benefit_result;
mod period;
mod tax_bracket;

pub use benefit_result::{BenefitResult, ClawbackBasis};
pub use period::{Period, PeriodBreakdown, UnknownPeriodError, WEEKS_PER_YEAR};
pub use tax_bracket::TaxBracket;
