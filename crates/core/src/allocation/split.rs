//! Apportioning amounts by percentage with the Largest Remainder Method.
//!
//! Each share is first rounded toward zero, then the leftover units go to the
//! shares with the largest fractional parts. The shares always sum exactly to
//! the total, so no cent is lost or created when a line's figures are split
//! across poles.

use rust_decimal::prelude::*;

use super::types::{Ownership, PoleFigures};
use crate::budget::YearlyFigures;

/// Minimum precision used when splitting currency amounts.
const CURRENCY_PLACES: u32 = 2;

/// Largest Remainder Method apportionment.
pub struct LargestRemainder;

impl LargestRemainder {
    /// Split `total` proportionally to `weights` at `decimal_places` precision.
    ///
    /// Weights do not have to sum to 100: shares are proportional to each
    /// weight over the weight sum. Ties on the fractional part go to the
    /// earlier weight. If every weight is zero the whole total goes to the
    /// first share.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use budgetops_core::allocation::LargestRemainder;
    ///
    /// let shares = LargestRemainder::split(dec!(100), &[dec!(33.33), dec!(33.33), dec!(33.34)], 2);
    /// assert_eq!(shares.iter().sum::<rust_decimal::Decimal>(), dec!(100));
    /// ```
    #[must_use]
    pub fn split(total: Decimal, weights: &[Decimal], decimal_places: u32) -> Vec<Decimal> {
        if weights.is_empty() {
            return Vec::new();
        }

        let total =
            total.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointNearestEven);
        let weight_sum: Decimal = weights.iter().copied().sum();
        if weight_sum.is_zero() {
            let mut shares = vec![Decimal::ZERO; weights.len()];
            shares[0] = total;
            return shares;
        }

        let negative = total.is_sign_negative();
        let magnitude = total.abs();
        let unit = Decimal::new(1, decimal_places);

        let exact: Vec<Decimal> = weights
            .iter()
            .map(|w| magnitude * *w / weight_sum)
            .collect();
        let mut shares: Vec<Decimal> = exact
            .iter()
            .map(|a| a.round_dp_with_strategy(decimal_places, RoundingStrategy::ToZero))
            .collect();

        let mut leftover = magnitude - shares.iter().copied().sum::<Decimal>();
        if leftover >= unit {
            let mut order: Vec<usize> = (0..weights.len()).collect();
            order.sort_by(|&a, &b| (exact[b] - shares[b]).cmp(&(exact[a] - shares[a])));
            for idx in order.iter().cycle() {
                if leftover < unit {
                    break;
                }
                shares[*idx] += unit;
                leftover -= unit;
            }
        }

        if negative {
            for share in &mut shares {
                *share = -*share;
            }
        }
        shares
    }
}

/// Apportions a line's figures across its owning poles.
///
/// An unassigned line yields a single entry without a pole holding 100%.
/// Per-pole budget, engaged and invoiced amounts sum exactly to the line's.
#[must_use]
pub fn split_figures(figures: &YearlyFigures, ownership: &Ownership) -> Vec<PoleFigures> {
    let shares = ownership.shares();
    if shares.is_empty() {
        return vec![PoleFigures {
            pole_id: None,
            percentage: Decimal::ONE_HUNDRED,
            figures: *figures,
        }];
    }

    let weights: Vec<Decimal> = shares.iter().map(|s| s.percentage).collect();
    let apportion = |amount: Decimal| {
        LargestRemainder::split(amount, &weights, amount.scale().max(CURRENCY_PLACES))
    };
    let budgets = apportion(figures.budget);
    let engaged = apportion(figures.engaged);
    let invoiced = apportion(figures.invoiced);

    shares
        .iter()
        .enumerate()
        .map(|(i, share)| PoleFigures {
            pole_id: Some(share.pole_id),
            percentage: share.percentage,
            figures: YearlyFigures {
                year: figures.year,
                budget: budgets[i],
                engaged: engaged[i],
                invoiced: invoiced[i],
            },
        })
        .collect()
}
