//! Allocation data types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use budgetops_shared::types::PoleId;

use crate::budget::YearlyFigures;

/// Share of a budget line held by one pole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoleAllocation {
    /// Pole.
    pub pole_id: PoleId,
    /// Percentage in `[0, 100]`.
    pub percentage: Decimal,
}

/// Resolved ownership of a budget line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Ownership {
    /// No owning pole.
    Unassigned,
    /// Wholly owned by one pole.
    SinglePole(PoleId),
    /// Shared by several poles.
    MultiPole(Vec<PoleAllocation>),
}

impl Ownership {
    /// Collapses a legacy single-pole reference and an allocation set.
    ///
    /// A non-empty allocation set wins over the legacy pole.
    #[must_use]
    pub fn from_legacy(pole_id: Option<PoleId>, allocations: Vec<PoleAllocation>) -> Self {
        if !allocations.is_empty() {
            return Self::MultiPole(allocations);
        }
        pole_id.map_or(Self::Unassigned, Self::SinglePole)
    }

    /// `(pole, percentage)` shares. A single pole holds 100.
    #[must_use]
    pub fn shares(&self) -> Vec<PoleAllocation> {
        match self {
            Self::Unassigned => Vec::new(),
            Self::SinglePole(pole_id) => vec![PoleAllocation {
                pole_id: *pole_id,
                percentage: Decimal::ONE_HUNDRED,
            }],
            Self::MultiPole(allocations) => allocations.clone(),
        }
    }

    /// Returns true if the pole holds any share.
    #[must_use]
    pub fn includes(&self, pole_id: PoleId) -> bool {
        match self {
            Self::Unassigned => false,
            Self::SinglePole(p) => *p == pole_id,
            Self::MultiPole(allocations) => allocations.iter().any(|a| a.pole_id == pole_id),
        }
    }

    /// The pole with the largest share. Ties go to the first listed.
    #[must_use]
    pub fn primary_pole(&self) -> Option<PoleId> {
        match self {
            Self::Unassigned => None,
            Self::SinglePole(p) => Some(*p),
            Self::MultiPole(allocations) => allocations
                .iter()
                .fold(None::<&PoleAllocation>, |best, a| match best {
                    Some(b) if b.percentage >= a.percentage => Some(b),
                    _ => Some(a),
                })
                .map(|a| a.pole_id),
        }
    }
}

/// Figures apportioned to one pole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PoleFigures {
    /// Pole, `None` for an unassigned line.
    pub pole_id: Option<PoleId>,
    /// Share held.
    pub percentage: Decimal,
    /// Apportioned figures.
    pub figures: YearlyFigures,
}
