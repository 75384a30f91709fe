//! Blocking-reference reports for guarded deletions.

use std::fmt;

use budgetops_shared::types::EntityKind;
use serde::{Serialize, Serializer};
use serde::ser::SerializeMap;

/// Counts of records that still point at a deletion target.
///
/// Only non-zero counts are kept, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockingReferences {
    counts: Vec<(EntityKind, u64)>,
}

impl BlockingReferences {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a count for a kind. Zero counts are ignored.
    #[must_use]
    pub fn with(mut self, kind: EntityKind, count: u64) -> Self {
        self.add(kind, count);
        self
    }

    /// Adds a count for a kind in place. Zero counts are ignored.
    pub fn add(&mut self, kind: EntityKind, count: u64) {
        if count == 0 {
            return;
        }
        if let Some(entry) = self.counts.iter_mut().find(|(k, _)| *k == kind) {
            entry.1 += count;
        } else {
            self.counts.push((kind, count));
        }
    }

    /// Returns the count recorded for a kind.
    #[must_use]
    pub fn count(&self, kind: EntityKind) -> u64 {
        self.counts
            .iter()
            .find(|(k, _)| *k == kind)
            .map_or(0, |(_, c)| *c)
    }

    /// Returns true if nothing blocks the deletion.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Total number of blocking records.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|(_, c)| c).sum()
    }

    /// Iterates over `(kind, count)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (EntityKind, u64)> + '_ {
        self.counts.iter().copied()
    }
}

impl fmt::Display for BlockingReferences {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.counts.is_empty() {
            return f.write_str("no references");
        }
        for (i, (kind, count)) in self.counts.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            let noun = if *count == 1 {
                kind.singular()
            } else {
                kind.plural()
            };
            write!(f, "{count} {noun}")?;
        }
        Ok(())
    }
}

impl Serialize for BlockingReferences {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.counts.len()))?;
        for (kind, count) in &self.counts {
            map.serialize_entry(kind, count)?;
        }
        map.end()
    }
}

/// Outcome of a delete that is refused while references remain.
///
/// The repository counts references and deletes inside one transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardedDelete {
    /// The record was removed.
    Deleted,
    /// The record does not exist.
    NotFound,
    /// The record is still referenced.
    Blocked(BlockingReferences),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_lists_counts_in_order() {
        let refs = BlockingReferences::new()
            .with(EntityKind::Contract, 2)
            .with(EntityKind::Invoice, 5);
        assert_eq!(refs.to_string(), "2 contracts, 5 invoices");
    }

    #[test]
    fn test_display_singular() {
        let refs = BlockingReferences::new().with(EntityKind::ForecastExpense, 1);
        assert_eq!(refs.to_string(), "1 forecast expense");
    }

    #[test]
    fn test_zero_counts_are_dropped() {
        let refs = BlockingReferences::new()
            .with(EntityKind::Contract, 0)
            .with(EntityKind::Invoice, 0);
        assert!(refs.is_empty());
        assert_eq!(refs.total(), 0);
    }

    #[test]
    fn test_add_accumulates() {
        let mut refs = BlockingReferences::new();
        refs.add(EntityKind::Invoice, 2);
        refs.add(EntityKind::Invoice, 3);
        assert_eq!(refs.count(EntityKind::Invoice), 5);
        assert_eq!(refs.count(EntityKind::Contract), 0);
    }

    #[test]
    fn test_serializes_as_map() {
        let refs = BlockingReferences::new()
            .with(EntityKind::Contract, 2)
            .with(EntityKind::PurchaseOrder, 1);
        let json = serde_json::to_value(&refs).unwrap();
        assert_eq!(json["contract"], 2);
        assert_eq!(json["purchase_order"], 1);
    }
}
