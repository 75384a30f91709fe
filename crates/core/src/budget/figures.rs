//! Derived yearly figures of a budget line.
//!
//! Engaged and invoiced amounts are never stored. They are recomputed from the
//! linked contracts and invoices every time figures are read.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use super::types::YearlyBudget;
use crate::procurement::{Contract, Invoice};

/// Planned, engaged and invoiced amounts of one budget line for one year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearlyFigures {
    /// Year.
    pub year: i32,
    /// Planned budget.
    pub budget: Decimal,
    /// Sum of contracts starting in `year`.
    pub engaged: Decimal,
    /// Sum of invoices dated in `year`.
    pub invoiced: Decimal,
}

impl YearlyFigures {
    /// Figures with nothing planned or spent.
    #[must_use]
    pub const fn empty(year: i32) -> Self {
        Self {
            year,
            budget: Decimal::ZERO,
            engaged: Decimal::ZERO,
            invoiced: Decimal::ZERO,
        }
    }

    /// Derives the figures for `year` from a planned amount and the documents
    /// linked to the line. Cancelled documents are ignored.
    #[must_use]
    pub fn derive(
        year: i32,
        budget: Decimal,
        contracts: &[Contract],
        invoices: &[Invoice],
    ) -> Self {
        let engaged = contracts
            .iter()
            .filter(|c| c.counts_as_engaged() && c.engaged_year() == year)
            .map(|c| c.amount)
            .sum();
        let invoiced = invoices
            .iter()
            .filter(|i| i.counts_as_invoiced() && i.invoiced_year() == year)
            .map(|i| i.amount)
            .sum();
        Self {
            year,
            budget,
            engaged,
            invoiced,
        }
    }

    /// Figures for every year that has a planned budget or a linked document,
    /// most recent year first.
    #[must_use]
    pub fn history(
        budgets: &[YearlyBudget],
        contracts: &[Contract],
        invoices: &[Invoice],
    ) -> Vec<Self> {
        let mut years: BTreeSet<i32> = budgets.iter().map(|b| b.year).collect();
        years.extend(
            contracts
                .iter()
                .filter(|c| c.counts_as_engaged())
                .map(Contract::engaged_year),
        );
        years.extend(
            invoices
                .iter()
                .filter(|i| i.counts_as_invoiced())
                .map(Invoice::invoiced_year),
        );

        years
            .into_iter()
            .rev()
            .map(|year| {
                let budget = budgets
                    .iter()
                    .find(|b| b.year == year)
                    .map_or(Decimal::ZERO, |b| b.amount);
                Self::derive(year, budget, contracts, invoices)
            })
            .collect()
    }

    /// `budget - engaged`. Negative when the line is overrun.
    #[must_use]
    pub fn remaining(&self) -> Decimal {
        self.budget - self.engaged
    }

    /// Returns true if more is engaged than planned.
    #[must_use]
    pub fn is_overrun(&self) -> bool {
        self.remaining() < Decimal::ZERO
    }
}

impl std::ops::Add for YearlyFigures {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            year: self.year,
            budget: self.budget + rhs.budget,
            engaged: self.engaged + rhs.engaged,
            invoiced: self.invoiced + rhs.invoiced,
        }
    }
}

impl Serialize for YearlyFigures {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("YearlyFigures", 5)?;
        state.serialize_field("year", &self.year)?;
        state.serialize_field("budget", &self.budget)?;
        state.serialize_field("engaged", &self.engaged)?;
        state.serialize_field("invoiced", &self.invoiced)?;
        state.serialize_field("remaining", &self.remaining())?;
        state.end()
    }
}
