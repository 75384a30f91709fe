//! Fiscal year values and clone planning.

use chrono::Utc;
use serde::Serialize;

use budgetops_shared::types::ForecastBudgetLineId;

use crate::forecast::ForecastBudgetLine;

/// Earliest accepted fiscal year.
pub const MIN_YEAR: i32 = 1900;
/// Latest accepted fiscal year.
pub const MAX_YEAR: i32 = 2999;

/// Checks that a year lies in `[MIN_YEAR, MAX_YEAR]`.
///
/// # Errors
///
/// Returns a message describing the accepted range.
pub fn ensure_plausible_year(year: i32) -> Result<(), String> {
    if (MIN_YEAR..=MAX_YEAR).contains(&year) {
        Ok(())
    } else {
        Err(format!(
            "Year {year} is outside the accepted range {MIN_YEAR}-{MAX_YEAR}"
        ))
    }
}

/// Deduplicates years and orders them most recent first.
#[must_use]
pub fn canonical_years(years: impl IntoIterator<Item = i32>) -> Vec<i32> {
    let mut years: Vec<i32> = years.into_iter().collect();
    years.sort_unstable_by(|a, b| b.cmp(a));
    years.dedup();
    years
}

/// Copies forecast lines into `target_year`.
///
/// Labels, nature, classification and budget are kept. New identifiers are
/// issued; expenses, links and envelopes are never part of the copy.
#[must_use]
pub fn plan_year_clone(source: &[ForecastBudgetLine], target_year: i32) -> Vec<ForecastBudgetLine> {
    let now = Utc::now();
    source
        .iter()
        .map(|line| ForecastBudgetLine {
            id: ForecastBudgetLineId::new(),
            year: target_year,
            created_at: now,
            ..line.clone()
        })
        .collect()
}

/// What already occupies a year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct YearOccupancy {
    /// Number of forecast lines.
    pub forecast_lines: u64,
    /// Whether an envelope is set.
    pub has_envelope: bool,
}

impl YearOccupancy {
    /// A year is taken once it holds forecast lines or an envelope.
    #[must_use]
    pub fn is_taken(&self) -> bool {
        self.forecast_lines > 0 || self.has_envelope
    }
}

/// Outcome of the transactional year write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearWrite {
    /// Lines were inserted.
    Created(usize),
    /// The year was found taken inside the transaction.
    Duplicate,
}

/// Result of creating a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CreatedYear {
    /// Created year.
    pub year: i32,
    /// Year the structure was copied from.
    pub copied_from: Option<i32>,
    /// Number of forecast lines created.
    pub lines_created: usize,
}
