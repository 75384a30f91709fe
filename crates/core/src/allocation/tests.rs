//! Tests for pole allocations.

use std::sync::Arc;

use proptest::prelude::*;
use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use budgetops_shared::types::{BudgetLineId, EntityKind, PoleId, TenantId};

use super::error::AllocationError;
use super::service::{AllocationService, validate_allocations};
use super::split::{LargestRemainder, split_figures};
use super::types::{Ownership, PoleAllocation};
use crate::budget::YearlyFigures;
use crate::test_support::MemoryStore;

fn alloc(pole_id: PoleId, percentage: Decimal) -> PoleAllocation {
    PoleAllocation {
        pole_id,
        percentage,
    }
}

// ============================================================================
// LargestRemainder
// ============================================================================

#[test]
fn test_split_empty_weights() {
    assert!(LargestRemainder::split(dec!(100), &[], 2).is_empty());
}

#[test]
fn test_split_exact_percentages() {
    let shares = LargestRemainder::split(dec!(100), &[dec!(50), dec!(30), dec!(20)], 2);
    assert_eq!(shares, vec![dec!(50), dec!(30), dec!(20)]);
}

#[test]
fn test_split_thirds_gives_leftover_cent_to_first() {
    let shares = LargestRemainder::split(dec!(100), &[dec!(1), dec!(1), dec!(1)], 2);
    assert_eq!(shares, vec![dec!(33.34), dec!(33.33), dec!(33.33)]);
}

#[test]
fn test_split_negative_total() {
    let shares = LargestRemainder::split(dec!(-100), &[dec!(1), dec!(1), dec!(1)], 2);
    assert_eq!(shares.iter().sum::<Decimal>(), dec!(-100));
    assert_eq!(shares[0], dec!(-33.34));
}

#[test]
fn test_split_tolerated_sum_still_exact() {
    // 99.99 is within tolerance of 100 and must not lose the missing share.
    let shares = LargestRemainder::split(dec!(1000000), &[dec!(60), dec!(39.99)], 2);
    assert_eq!(shares.iter().sum::<Decimal>(), dec!(1000000));
}

#[test]
fn test_split_zero_weights() {
    let shares = LargestRemainder::split(dec!(10), &[dec!(0), dec!(0)], 2);
    assert_eq!(shares, vec![dec!(10), dec!(0)]);
}

proptest! {
    /// Shares always sum exactly to the rounded total.
    #[test]
    fn test_split_sum_invariant(
        cents in -100_000_000i64..100_000_000,
        weights in prop::collection::vec(0u32..10_000, 1..8),
    ) {
        let total = Decimal::new(cents, 2);
        let weights: Vec<Decimal> = weights
            .into_iter()
            .map(|w| Decimal::new(i64::from(w), 2))
            .collect();

        let shares = LargestRemainder::split(total, &weights, 2);

        prop_assert_eq!(shares.len(), weights.len());
        prop_assert_eq!(shares.iter().copied().sum::<Decimal>(), total);
    }
}

// ============================================================================
// split_figures
// ============================================================================

#[test]
fn test_split_figures_multi_pole_sums_exactly() {
    let a = PoleId::new();
    let b = PoleId::new();
    let c = PoleId::new();
    let figures = YearlyFigures {
        year: 2025,
        budget: dec!(1000.01),
        engaged: dec!(333.33),
        invoiced: dec!(0.05),
    };
    let ownership = Ownership::MultiPole(vec![
        alloc(a, dec!(33.33)),
        alloc(b, dec!(33.33)),
        alloc(c, dec!(33.34)),
    ]);

    let parts = split_figures(&figures, &ownership);

    assert_eq!(parts.len(), 3);
    let sum = |f: fn(&YearlyFigures) -> Decimal| {
        parts.iter().map(|p| f(&p.figures)).sum::<Decimal>()
    };
    assert_eq!(sum(|f| f.budget), dec!(1000.01));
    assert_eq!(sum(|f| f.engaged), dec!(333.33));
    assert_eq!(sum(|f| f.invoiced), dec!(0.05));
    assert!(parts.iter().all(|p| p.figures.year == 2025));
}

#[test]
fn test_split_figures_single_pole() {
    let pole = PoleId::new();
    let figures = YearlyFigures {
        year: 2025,
        budget: dec!(500),
        engaged: dec!(100),
        invoiced: dec!(50),
    };

    let parts = split_figures(&figures, &Ownership::SinglePole(pole));

    assert_eq!(parts.len(), 1);
    assert_eq!(parts[0].pole_id, Some(pole));
    assert_eq!(parts[0].figures, figures);
}

#[test]
fn test_split_figures_unassigned() {
    let figures = YearlyFigures::empty(2025);
    let parts = split_figures(&figures, &Ownership::Unassigned);
    assert_eq!(parts.len(), 1);
    assert_eq!(parts[0].pole_id, None);
    assert_eq!(parts[0].percentage, dec!(100));
}

// ============================================================================
// Ownership
// ============================================================================

#[test]
fn test_from_legacy_allocations_win() {
    let legacy = PoleId::new();
    let shared = vec![alloc(PoleId::new(), dec!(60)), alloc(PoleId::new(), dec!(40))];

    let ownership = Ownership::from_legacy(Some(legacy), shared.clone());

    assert_eq!(ownership, Ownership::MultiPole(shared));
    assert!(!ownership.includes(legacy));
}

#[test]
fn test_from_legacy_falls_back_to_single_pole() {
    let legacy = PoleId::new();
    assert_eq!(
        Ownership::from_legacy(Some(legacy), vec![]),
        Ownership::SinglePole(legacy)
    );
    assert_eq!(Ownership::from_legacy(None, vec![]), Ownership::Unassigned);
}

#[test]
fn test_primary_pole_prefers_largest_then_first() {
    let a = PoleId::new();
    let b = PoleId::new();
    let c = PoleId::new();
    let tie = Ownership::MultiPole(vec![
        alloc(a, dec!(40)),
        alloc(b, dec!(40)),
        alloc(c, dec!(20)),
    ]);
    let largest = Ownership::MultiPole(vec![alloc(a, dec!(30)), alloc(b, dec!(70))]);

    assert_eq!(tie.primary_pole(), Some(a));
    assert_eq!(largest.primary_pole(), Some(b));
    assert_eq!(Ownership::Unassigned.primary_pole(), None);
}

// ============================================================================
// validate_allocations
// ============================================================================

#[rstest]
#[case(vec![dec!(100)], true)]
#[case(vec![dec!(60), dec!(40)], true)]
#[case(vec![dec!(33.33), dec!(33.33), dec!(33.33)], true)]
#[case(vec![dec!(50), dec!(37)], false)]
#[case(vec![dec!(60), dec!(40.02)], false)]
fn test_validate_sum(#[case] percentages: Vec<Decimal>, #[case] ok: bool) {
    let allocations: Vec<PoleAllocation> = percentages
        .into_iter()
        .map(|p| alloc(PoleId::new(), p))
        .collect();

    let result = validate_allocations(&allocations, dec!(0.01));

    assert_eq!(result.is_ok(), ok, "{result:?}");
    if !ok {
        assert!(matches!(result, Err(AllocationError::AllocationMismatch { .. })));
    }
}

#[test]
fn test_validate_out_of_range_before_sum() {
    let pole = PoleId::new();
    let allocations = vec![alloc(pole, dec!(120)), alloc(PoleId::new(), dec!(-20))];

    let result = validate_allocations(&allocations, dec!(0.01));

    assert!(matches!(
        result,
        Err(AllocationError::OutOfRange { pole_id, percentage })
            if pole_id == pole && percentage == dec!(120)
    ));
}

#[test]
fn test_validate_duplicate_pole() {
    let pole = PoleId::new();
    let allocations = vec![alloc(pole, dec!(50)), alloc(pole, dec!(50))];

    let result = validate_allocations(&allocations, dec!(0.01));

    assert!(matches!(result, Err(AllocationError::Validation(_))));
}

// ============================================================================
// AllocationService
// ============================================================================

#[tokio::test]
async fn test_set_allocations_mismatch_reports_actual_sum() {
    let store = Arc::new(MemoryStore::new());
    let tenant = TenantId::new();
    let line = store.seed_budget_line(tenant, "Network");
    let a = store.seed_pole(tenant, "IT");
    let b = store.seed_pole(tenant, "HR");
    let service = AllocationService::new(store);

    let result = service
        .set_allocations(tenant, line, vec![alloc(a, dec!(50)), alloc(b, dec!(37.0))])
        .await;

    match result {
        Err(AllocationError::AllocationMismatch { actual }) => assert_eq!(actual, dec!(87.0)),
        other => panic!("expected AllocationMismatch, got {other:?}"),
    }
    assert!(service.get_allocations(tenant, line).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_set_allocations_round_trips() {
    let store = Arc::new(MemoryStore::new());
    let tenant = TenantId::new();
    let line = store.seed_budget_line(tenant, "Network");
    let a = store.seed_pole(tenant, "IT");
    let b = store.seed_pole(tenant, "HR");
    let service = AllocationService::new(store);
    let set = vec![alloc(a, dec!(60)), alloc(b, dec!(40))];

    service.set_allocations(tenant, line, set.clone()).await.unwrap();

    assert_eq!(service.get_allocations(tenant, line).await.unwrap(), set);
    assert_eq!(
        service.ownership(tenant, line).await.unwrap(),
        Ownership::MultiPole(set)
    );
}

#[tokio::test]
async fn test_set_allocations_single_full_share() {
    let store = Arc::new(MemoryStore::new());
    let tenant = TenantId::new();
    let line = store.seed_budget_line(tenant, "Network");
    let a = store.seed_pole(tenant, "IT");
    let service = AllocationService::new(store);

    let result = service
        .set_allocations(tenant, line, vec![alloc(a, dec!(100))])
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_set_allocations_unknown_pole() {
    let store = Arc::new(MemoryStore::new());
    let tenant = TenantId::new();
    let line = store.seed_budget_line(tenant, "Network");
    let a = store.seed_pole(tenant, "IT");
    let ghost = PoleId::new();
    let service = AllocationService::new(store);

    let result = service
        .set_allocations(tenant, line, vec![alloc(a, dec!(50)), alloc(ghost, dec!(50))])
        .await;

    assert!(matches!(
        result,
        Err(AllocationError::InvalidReference { kind: EntityKind::Pole, id }) if id == ghost.0
    ));
}

#[tokio::test]
async fn test_set_allocations_unknown_line() {
    let store = Arc::new(MemoryStore::new());
    let service = AllocationService::new(store);

    let result = service
        .set_allocations(TenantId::new(), BudgetLineId::new(), vec![])
        .await;

    assert!(matches!(
        result,
        Err(AllocationError::InvalidReference {
            kind: EntityKind::BudgetLine,
            ..
        })
    ));
}

#[tokio::test]
async fn test_empty_set_reverts_to_single_pole() {
    let store = Arc::new(MemoryStore::new());
    let tenant = TenantId::new();
    let legacy = store.seed_pole(tenant, "Finance");
    let other = store.seed_pole(tenant, "IT");
    let line = store.seed_budget_line_with_pole(tenant, "Audit", Some(legacy));
    let service = AllocationService::new(store);

    service
        .set_allocations(tenant, line, vec![alloc(legacy, dec!(50)), alloc(other, dec!(50))])
        .await
        .unwrap();
    service.set_allocations(tenant, line, vec![]).await.unwrap();

    assert_eq!(
        service.ownership(tenant, line).await.unwrap(),
        Ownership::SinglePole(legacy)
    );
}

#[tokio::test]
async fn test_configured_tolerance_is_applied() {
    let store = Arc::new(MemoryStore::new());
    let tenant = TenantId::new();
    let line = store.seed_budget_line(tenant, "Network");
    let a = store.seed_pole(tenant, "IT");
    let b = store.seed_pole(tenant, "HR");
    let service = AllocationService::new(store).with_tolerance(dec!(0.5));

    let result = service
        .set_allocations(tenant, line, vec![alloc(a, dec!(60)), alloc(b, dec!(39.6))])
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_concurrent_replacements_never_mix() {
    let store = Arc::new(MemoryStore::new());
    let tenant = TenantId::new();
    let line = store.seed_budget_line(tenant, "Network");
    let a = store.seed_pole(tenant, "IT");
    let b = store.seed_pole(tenant, "HR");
    let c = store.seed_pole(tenant, "Ops");
    let service = Arc::new(AllocationService::new(store));

    let first = vec![alloc(a, dec!(70)), alloc(b, dec!(30))];
    let second = vec![alloc(c, dec!(100))];

    let s1 = service.clone();
    let f1 = first.clone();
    let t1 = tokio::spawn(async move { s1.set_allocations(tenant, line, f1).await });
    let s2 = service.clone();
    let f2 = second.clone();
    let t2 = tokio::spawn(async move { s2.set_allocations(tenant, line, f2).await });
    t1.await.unwrap().unwrap();
    t2.await.unwrap().unwrap();

    let current = service.get_allocations(tenant, line).await.unwrap();
    assert!(current == first || current == second, "mixed set: {current:?}");
}

#[tokio::test]
async fn test_pole_breakdown_uses_resolved_ownership() {
    let store = Arc::new(MemoryStore::new());
    let tenant = TenantId::new();
    let line = store.seed_budget_line(tenant, "Network");
    let a = store.seed_pole(tenant, "IT");
    let b = store.seed_pole(tenant, "HR");
    let service = AllocationService::new(store);
    service
        .set_allocations(tenant, line, vec![alloc(a, dec!(60)), alloc(b, dec!(40))])
        .await
        .unwrap();
    let figures = YearlyFigures {
        year: 2025,
        budget: dec!(1000),
        engaged: dec!(500),
        invoiced: dec!(250),
    };

    let parts = service.pole_breakdown(tenant, line, &figures).await.unwrap();

    assert_eq!(parts[0].figures.budget, dec!(600));
    assert_eq!(parts[1].figures.engaged, dec!(200));
}
