//! Budget versus engaged variance of a line.

use rust_decimal::Decimal;
use serde::Serialize;

use super::figures::YearlyFigures;
use super::types::VarianceStatus;

/// Variance of one line-year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineVariance {
    /// Year.
    pub year: i32,
    /// Planned budget.
    pub budget: Decimal,
    /// Engaged amount.
    pub engaged: Decimal,
    /// `budget - engaged`.
    pub remaining: Decimal,
    /// Engaged / budget * 100, 0 when budget is zero.
    pub utilization_percent: Decimal,
    /// Invoiced / budget * 100, 0 when budget is zero.
    pub invoicing_percent: Decimal,
    /// Variance status.
    pub status: VarianceStatus,
}

impl LineVariance {
    /// Calculates the variance of a line-year.
    ///
    /// Under-engagement is favorable, overrun unfavorable.
    #[must_use]
    pub fn calculate(figures: &YearlyFigures) -> Self {
        let remaining = figures.remaining();
        Self {
            year: figures.year,
            budget: figures.budget,
            engaged: figures.engaged,
            remaining,
            utilization_percent: percent_of(figures.engaged, figures.budget),
            invoicing_percent: percent_of(figures.invoiced, figures.budget),
            status: VarianceStatus::from_headroom(remaining),
        }
    }
}

/// `part / whole * 100` rounded to 2 dp, 0 when `whole` is zero.
///
/// A result outside the decimal range saturates to `Decimal::MAX` or
/// `Decimal::MIN` by sign.
#[must_use]
pub fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map_or_else(
            || {
                if part.is_sign_negative() == whole.is_sign_negative() {
                    Decimal::MAX
                } else {
                    Decimal::MIN
                }
            },
            |percent| percent.round_dp(2),
        )
}
