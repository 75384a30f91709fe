//! Tests for the rollup pipeline.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use proptest::prelude::*;
use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use budgetops_shared::types::{BudgetLineId, DomainId, PoleId, TenantId, VendorId};

use super::cockpit::CockpitSummary;
use super::error::RollupError;
use super::pipeline::RollupAggregator;
use super::record::{Labelled, RollupRecord, TenantSnapshot, build_records};
use super::service::RollupService;
use super::types::{
    Aggregation, BucketKey, DataSource, GroupBy, Metric, RollupFilter, SortRule, WidgetConfig,
};
use crate::allocation::{Ownership, PoleAllocation};
use crate::budget::{BudgetLine, Nature, YearlyBudget};
use crate::procurement::{Contract, ContractStatus, Invoice, InvoiceStatus};
use crate::test_support::MemoryStore;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn blank() -> RollupRecord {
    RollupRecord {
        date: None,
        year: None,
        status: None,
        vendor: None,
        domain: None,
        budget_type: None,
        nature: None,
        ownership: Ownership::Unassigned,
        pole: None,
        budget: Decimal::ZERO,
        engaged: Decimal::ZERO,
        invoiced: Decimal::ZERO,
        amount: Decimal::ZERO,
    }
}

fn vendor_record(vendor: Option<&Labelled<VendorId>>, amount: Decimal) -> RollupRecord {
    RollupRecord {
        date: Some(date(2025, 3, 1)),
        vendor: vendor.cloned(),
        amount,
        invoiced: amount,
        ..blank()
    }
}

fn vendor(name: &str) -> Labelled<VendorId> {
    Labelled {
        id: VendorId::new(),
        name: name.to_string(),
    }
}

fn widget(group_by: GroupBy, metrics: Vec<Metric>) -> WidgetConfig {
    WidgetConfig {
        source: DataSource::Invoices,
        group_by,
        metrics,
        aggregation: Aggregation::Sum,
        sort: SortRule::None,
        limit: None,
        filter: RollupFilter::default(),
    }
}

fn labels(result: &super::types::RollupResult) -> Vec<&str> {
    result.buckets.iter().map(|b| b.label.as_str()).collect()
}

// ============================================================================
// Grouping and aggregation
// ============================================================================

#[test]
fn test_top_n_by_value_desc() {
    let (a, b, c) = (vendor("A"), vendor("B"), vendor("C"));
    let records = vec![
        vendor_record(Some(&a), dec!(10)),
        vendor_record(Some(&b), dec!(50)),
        vendor_record(Some(&c), dec!(30)),
    ];
    let config = WidgetConfig {
        sort: SortRule::ValueDesc,
        limit: Some(2),
        ..widget(GroupBy::Vendor, vec![Metric::Amount])
    };

    let result = RollupAggregator::default().run(&records, &config).unwrap();

    assert_eq!(labels(&result), vec!["B", "C"]);
    assert_eq!(result.bucket_count, 3);
    assert!(result.truncated);
}

#[test]
fn test_missing_dimension_goes_to_other_bucket() {
    let acme = vendor("Acme");
    let records = vec![
        vendor_record(Some(&acme), dec!(10)),
        vendor_record(None, dec!(5)),
        vendor_record(None, dec!(7)),
    ];

    let result = RollupAggregator::new("Unclassified", 50)
        .run(&records, &widget(GroupBy::Vendor, vec![Metric::Amount]))
        .unwrap();

    let other = result.bucket("Unclassified").unwrap();
    assert_eq!(other.key, BucketKey::Other);
    assert_eq!(other.count, 2);
    assert_eq!(other.values, vec![dec!(12)]);
    assert_eq!(result.buckets.iter().filter(|b| b.key.is_other()).count(), 1);
}

#[test]
fn test_buckets_keep_discovery_order_and_same_name_vendors_stay_apart() {
    let first = vendor("Dup");
    let second = vendor("Dup");
    let records = vec![
        vendor_record(Some(&second), dec!(1)),
        vendor_record(Some(&first), dec!(2)),
        vendor_record(Some(&second), dec!(3)),
    ];

    let result = RollupAggregator::default()
        .run(&records, &widget(GroupBy::Vendor, vec![Metric::Amount]))
        .unwrap();

    assert_eq!(result.buckets.len(), 2);
    assert_eq!(result.buckets[0].values, vec![dec!(4)]);
    assert_eq!(result.buckets[1].values, vec![dec!(2)]);
}

#[rstest]
#[case(Aggregation::Sum, dec!(30))]
#[case(Aggregation::Average, dec!(3.33))]
#[case(Aggregation::Count, dec!(3))]
#[case(Aggregation::Min, dec!(0))]
#[case(Aggregation::Max, dec!(20))]
fn test_aggregations(#[case] aggregation: Aggregation, #[case] expected: Decimal) {
    let acme = vendor("Acme");
    let records = vec![
        vendor_record(Some(&acme), dec!(10)),
        vendor_record(Some(&acme), dec!(20)),
        vendor_record(Some(&acme), dec!(0)),
    ];
    let records: Vec<RollupRecord> = records
        .into_iter()
        .enumerate()
        .map(|(i, mut r)| {
            // Average over 10/3 exercises rounding.
            if aggregation == Aggregation::Average && i == 1 {
                r.amount = dec!(0);
            }
            r
        })
        .collect();
    let config = WidgetConfig {
        aggregation,
        ..widget(GroupBy::Vendor, vec![Metric::Amount])
    };

    let result = RollupAggregator::default().run(&records, &config).unwrap();

    assert_eq!(result.buckets[0].values, vec![expected]);
}

#[test]
fn test_count_ignores_metric_values() {
    let acme = vendor("Acme");
    let records = vec![
        vendor_record(Some(&acme), dec!(-5)),
        vendor_record(Some(&acme), dec!(1000)),
    ];
    let config = WidgetConfig {
        aggregation: Aggregation::Count,
        ..widget(GroupBy::Vendor, vec![Metric::Amount, Metric::Invoiced])
    };

    let result = RollupAggregator::default().run(&records, &config).unwrap();

    assert_eq!(result.buckets[0].values, vec![dec!(2), dec!(2)]);
}

#[test]
fn test_one_value_per_metric_in_order() {
    let acme = vendor("Acme");
    let mut record = vendor_record(Some(&acme), dec!(8));
    record.invoiced = dec!(3);

    let result = RollupAggregator::default()
        .run(
            &[record],
            &widget(GroupBy::Vendor, vec![Metric::Invoiced, Metric::Amount]),
        )
        .unwrap();

    assert_eq!(result.buckets[0].values, vec![dec!(3), dec!(8)]);
    assert_eq!(result.metrics, vec![Metric::Invoiced, Metric::Amount]);
}

#[test]
fn test_month_and_quarter_keys() {
    let records = vec![
        RollupRecord {
            date: Some(date(2025, 3, 31)),
            amount: dec!(1),
            ..blank()
        },
        RollupRecord {
            date: Some(date(2025, 11, 2)),
            amount: dec!(2),
            ..blank()
        },
    ];

    let months = RollupAggregator::default()
        .run(&records, &widget(GroupBy::Month, vec![Metric::Amount]))
        .unwrap();
    let quarters = RollupAggregator::default()
        .run(&records, &widget(GroupBy::Quarter, vec![Metric::Amount]))
        .unwrap();

    assert_eq!(labels(&months), vec!["2025-03", "2025-11"]);
    assert_eq!(labels(&quarters), vec!["2025-Q1", "2025-Q4"]);
}

#[test]
fn test_month_of_undated_record_is_other() {
    let records = vec![RollupRecord {
        year: Some(2025),
        amount: dec!(1),
        ..blank()
    }];

    let result = RollupAggregator::default()
        .run(&records, &widget(GroupBy::Month, vec![Metric::Amount]))
        .unwrap();

    assert!(result.buckets[0].key.is_other());
}

// ============================================================================
// Shares, sorting and limits
// ============================================================================

#[test]
fn test_shares_of_first_metric() {
    let (a, b) = (vendor("A"), vendor("B"));
    let records = vec![
        vendor_record(Some(&a), dec!(1)),
        vendor_record(Some(&b), dec!(2)),
    ];

    let result = RollupAggregator::default()
        .run(&records, &widget(GroupBy::Vendor, vec![Metric::Amount]))
        .unwrap();

    assert_eq!(result.bucket("A").unwrap().share, dec!(33.33));
    assert_eq!(result.bucket("B").unwrap().share, dec!(66.67));
}

#[test]
fn test_zero_total_gives_zero_shares_and_non_empty_result() {
    let a = vendor("A");
    let records = vec![vendor_record(Some(&a), dec!(0))];

    let result = RollupAggregator::default()
        .run(&records, &widget(GroupBy::Vendor, vec![Metric::Amount]))
        .unwrap();

    assert!(!result.is_empty());
    assert_eq!(result.buckets[0].share, Decimal::ZERO);
    assert_eq!(result.buckets[0].values, vec![Decimal::ZERO]);
}

#[test]
fn test_no_records_is_empty() {
    let result = RollupAggregator::default()
        .run(&[], &widget(GroupBy::Vendor, vec![Metric::Amount]))
        .unwrap();

    assert!(result.is_empty());
    assert_eq!(result.record_count, 0);
    assert!(!result.truncated);
}

#[rstest]
#[case(SortRule::NameAsc, vec!["Alpha", "Zulu", "Other"])]
#[case(SortRule::NameDesc, vec!["Zulu", "Alpha", "Other"])]
fn test_name_sort_keeps_other_last(#[case] sort: SortRule, #[case] expected: Vec<&str>) {
    let (alpha, zulu) = (vendor("Alpha"), vendor("Zulu"));
    let records = vec![
        vendor_record(None, dec!(1)),
        vendor_record(Some(&zulu), dec!(1)),
        vendor_record(Some(&alpha), dec!(1)),
    ];
    let config = WidgetConfig {
        sort,
        ..widget(GroupBy::Vendor, vec![Metric::Amount])
    };

    let result = RollupAggregator::default().run(&records, &config).unwrap();

    assert_eq!(labels(&result), expected);
}

#[test]
fn test_value_sort_is_stable_on_ties() {
    let (a, b, c) = (vendor("A"), vendor("B"), vendor("C"));
    let records = vec![
        vendor_record(Some(&a), dec!(5)),
        vendor_record(Some(&b), dec!(9)),
        vendor_record(Some(&c), dec!(5)),
    ];
    let config = WidgetConfig {
        sort: SortRule::ValueAsc,
        ..widget(GroupBy::Vendor, vec![Metric::Amount])
    };

    let result = RollupAggregator::default().run(&records, &config).unwrap();

    assert_eq!(labels(&result), vec!["A", "C", "B"]);
}

#[test]
fn test_limit_capped_by_max_buckets() {
    let vendors: Vec<_> = (0..5).map(|i| vendor(&format!("V{i}"))).collect();
    let records: Vec<_> = vendors
        .iter()
        .map(|v| vendor_record(Some(v), dec!(1)))
        .collect();
    let config = WidgetConfig {
        limit: Some(10),
        ..widget(GroupBy::Vendor, vec![Metric::Amount])
    };

    let result = RollupAggregator::new("Other", 3).run(&records, &config).unwrap();

    assert_eq!(result.buckets.len(), 3);
    assert_eq!(result.bucket_count, 5);
    assert!(result.truncated);
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn test_empty_metrics_rejected() {
    let result = RollupAggregator::default().run(&[], &widget(GroupBy::Vendor, vec![]));
    assert!(matches!(result, Err(RollupError::Validation(_))));
}

#[test]
fn test_zero_limit_rejected() {
    let config = WidgetConfig {
        limit: Some(0),
        ..widget(GroupBy::Vendor, vec![Metric::Amount])
    };
    let result = RollupAggregator::default().run(&[], &config);
    assert!(matches!(result, Err(RollupError::Validation(_))));
}

#[test]
fn test_metric_not_carried_by_source_rejected() {
    let result = RollupAggregator::default()
        .run(&[], &widget(GroupBy::Vendor, vec![Metric::Budget]));
    assert!(matches!(result, Err(RollupError::Validation(_))));
}

#[test]
fn test_inverted_date_range_rejected() {
    let mut config = widget(GroupBy::Vendor, vec![Metric::Amount]);
    config.filter.date_from = Some(date(2025, 6, 1));
    config.filter.date_to = Some(date(2025, 1, 1));

    let result = RollupAggregator::default().run(&[], &config);

    assert!(matches!(result, Err(RollupError::InvalidDateRange { .. })));
}

// ============================================================================
// Filters
// ============================================================================

#[test]
fn test_date_range_is_inclusive() {
    let records = vec![
        RollupRecord {
            date: Some(date(2025, 1, 1)),
            amount: dec!(1),
            ..blank()
        },
        RollupRecord {
            date: Some(date(2025, 1, 31)),
            amount: dec!(2),
            ..blank()
        },
        RollupRecord {
            date: Some(date(2025, 2, 1)),
            amount: dec!(4),
            ..blank()
        },
    ];
    let mut config = widget(GroupBy::Year, vec![Metric::Amount]);
    config.filter.date_from = Some(date(2025, 1, 1));
    config.filter.date_to = Some(date(2025, 1, 31));

    let result = RollupAggregator::default().run(&records, &config).unwrap();

    assert_eq!(result.record_count, 2);
    assert_eq!(result.buckets[0].values, vec![dec!(3)]);
}

#[test]
fn test_date_range_keeps_line_years_overlapping_it() {
    let records = vec![
        RollupRecord {
            year: Some(2024),
            ..blank()
        },
        RollupRecord {
            year: Some(2025),
            ..blank()
        },
        blank(),
    ];
    let mut config = widget(GroupBy::Year, vec![Metric::Amount]);
    config.source = DataSource::BudgetLines;
    config.filter.date_from = Some(date(2025, 3, 1));

    let result = RollupAggregator::default().run(&records, &config).unwrap();

    assert_eq!(labels(&result), vec!["2025"]);
}

#[test]
fn test_pole_filter_matches_any_share() {
    let (it, hr) = (PoleId::new(), PoleId::new());
    let shared = Ownership::MultiPole(vec![
        PoleAllocation {
            pole_id: hr,
            percentage: dec!(70),
        },
        PoleAllocation {
            pole_id: it,
            percentage: dec!(30),
        },
    ]);
    let records = vec![
        RollupRecord {
            ownership: shared,
            amount: dec!(10),
            ..blank()
        },
        RollupRecord {
            ownership: Ownership::SinglePole(hr),
            amount: dec!(20),
            ..blank()
        },
        RollupRecord {
            amount: dec!(40),
            ..blank()
        },
    ];
    let mut config = widget(GroupBy::Nature, vec![Metric::Amount]);
    config.filter.pole_id = Some(it);

    let result = RollupAggregator::default().run(&records, &config).unwrap();

    assert_eq!(result.record_count, 1);
    assert_eq!(result.buckets[0].values, vec![dec!(10)]);
}

#[test]
fn test_field_filters_combine() {
    let domain = Labelled {
        id: DomainId::new(),
        name: "Infra".to_string(),
    };
    let records = vec![
        RollupRecord {
            domain: Some(domain.clone()),
            status: Some("paid".to_string()),
            amount: dec!(1),
            ..blank()
        },
        RollupRecord {
            domain: Some(domain.clone()),
            status: Some("pending".to_string()),
            amount: dec!(2),
            ..blank()
        },
        RollupRecord {
            status: Some("paid".to_string()),
            amount: dec!(4),
            ..blank()
        },
    ];
    let mut config = widget(GroupBy::Domain, vec![Metric::Amount]);
    config.filter.domain_id = Some(domain.id);
    config.filter.status = Some("paid".to_string());

    let result = RollupAggregator::default().run(&records, &config).unwrap();

    assert_eq!(labels(&result), vec!["Infra"]);
    assert_eq!(result.buckets[0].values, vec![dec!(1)]);
}

proptest! {
    #[test]
    fn prop_bucket_counts_cover_every_record(
        picks in prop::collection::vec(prop::option::of(0usize..4), 0..40),
    ) {
        let vendors: Vec<_> = (0..4).map(|i| vendor(&format!("V{i}"))).collect();
        let records: Vec<_> = picks
            .iter()
            .map(|pick| vendor_record(pick.map(|i| &vendors[i]), dec!(1)))
            .collect();
        let missing = picks.iter().filter(|p| p.is_none()).count() as u64;

        let result = RollupAggregator::default()
            .run(&records, &widget(GroupBy::Vendor, vec![Metric::Amount]))
            .unwrap();

        let total: u64 = result.buckets.iter().map(|b| b.count).sum();
        prop_assert_eq!(total, picks.len() as u64);
        let other: u64 = result
            .buckets
            .iter()
            .filter(|b| b.key.is_other())
            .map(|b| b.count)
            .sum();
        prop_assert_eq!(other, missing);
    }
}

// ============================================================================
// Records from a snapshot
// ============================================================================

struct SnapshotFixture {
    snapshot: TenantSnapshot,
    line: BudgetLineId,
    it: PoleId,
}

fn snapshot_fixture() -> SnapshotFixture {
    let tenant = TenantId::new();
    let line = BudgetLineId::new();
    let (it, hr) = (PoleId::new(), PoleId::new());
    let vendor_id = VendorId::new();
    let now = Utc::now();

    let mut names = HashMap::new();
    names.insert(it.0, "IT".to_string());
    names.insert(hr.0, "HR".to_string());
    names.insert(vendor_id.0, "Acme".to_string());

    let mut allocations = HashMap::new();
    allocations.insert(
        line,
        vec![
            PoleAllocation {
                pole_id: hr,
                percentage: dec!(40),
            },
            PoleAllocation {
                pole_id: it,
                percentage: dec!(60),
            },
        ],
    );

    let contract = |amount: Decimal, start: NaiveDate, status: ContractStatus| Contract {
        id: budgetops_shared::types::ContractId::new(),
        tenant_id: tenant,
        budget_line_id: Some(line),
        vendor_id: Some(vendor_id),
        label: "Support".to_string(),
        amount,
        start_date: start,
        end_date: None,
        status,
        created_at: now,
    };

    SnapshotFixture {
        snapshot: TenantSnapshot {
            budget_lines: vec![BudgetLine {
                id: line,
                tenant_id: tenant,
                label: "Cloud".to_string(),
                nature: Nature::Investment,
                budget_type_id: None,
                domain_id: None,
                accounting_code: None,
                pole_id: Some(hr),
                created_at: now,
                updated_at: now,
            }],
            yearly_budgets: vec![YearlyBudget {
                budget_line_id: line,
                year: 2025,
                amount: dec!(1000),
            }],
            allocations,
            contracts: vec![
                contract(dec!(300), date(2025, 2, 1), ContractStatus::Active),
                contract(dec!(50), date(2025, 3, 1), ContractStatus::Cancelled),
                contract(dec!(80), date(2026, 1, 15), ContractStatus::Active),
            ],
            invoices: vec![Invoice {
                id: budgetops_shared::types::InvoiceId::new(),
                tenant_id: tenant,
                budget_line_id: None,
                contract_id: None,
                vendor_id: Some(vendor_id),
                number: "F-1".to_string(),
                amount: dec!(12),
                invoice_date: date(2025, 5, 5),
                status: InvoiceStatus::Paid,
                created_at: now,
            }],
            names,
        },
        line,
        it,
    }
}

#[test]
fn test_line_year_records_derive_engaged_and_skip_cancelled() {
    let fixture = snapshot_fixture();

    let records = build_records(&fixture.snapshot, DataSource::BudgetLines);

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].year, Some(2025));
    assert_eq!(records[0].budget, dec!(1000));
    assert_eq!(records[0].engaged, dec!(300));
    assert_eq!(records[1].year, Some(2026));
    assert_eq!(records[1].budget, Decimal::ZERO);
    assert_eq!(records[1].engaged, dec!(80));
}

#[test]
fn test_multi_pole_line_groups_under_largest_share() {
    let fixture = snapshot_fixture();
    let records = build_records(&fixture.snapshot, DataSource::BudgetLines);

    let result = RollupAggregator::default()
        .run(
            &records,
            &WidgetConfig {
                source: DataSource::BudgetLines,
                ..widget(GroupBy::Pole, vec![Metric::Budget])
            },
        )
        .unwrap();

    let bucket = result.bucket("IT").unwrap();
    assert_eq!(bucket.key, BucketKey::Value(fixture.it.to_string()));
    assert_eq!(bucket.values, vec![dec!(1000)]);
    assert!(records.iter().all(|r| r.ownership.includes(fixture.it)));
}

#[test]
fn test_documents_inherit_line_classification() {
    let fixture = snapshot_fixture();

    let contracts = build_records(&fixture.snapshot, DataSource::Contracts);
    let invoices = build_records(&fixture.snapshot, DataSource::Invoices);

    assert_eq!(contracts.len(), 3);
    assert!(contracts.iter().all(|r| r.nature == Some(Nature::Investment)));
    assert_eq!(contracts[1].status.as_deref(), Some("cancelled"));
    assert_eq!(invoices[0].nature, None);
    assert_eq!(invoices[0].vendor.as_ref().map(|v| v.name.as_str()), Some("Acme"));
    assert!(fixture.snapshot.allocations.contains_key(&fixture.line));
}

// ============================================================================
// Cockpit and service
// ============================================================================

#[test]
fn test_cockpit_zero_fills_natures() {
    let fixture = snapshot_fixture();
    let records = build_records(&fixture.snapshot, DataSource::BudgetLines);

    let summary = CockpitSummary::compute(&RollupAggregator::default(), &records, 2025).unwrap();

    assert_eq!(summary.budget, dec!(1000));
    assert_eq!(summary.engaged, dec!(300));
    assert_eq!(summary.remaining, dec!(700));
    assert_eq!(summary.engagement_rate, dec!(30));
    assert_eq!(summary.record_count, 1);
    assert_eq!(summary.by_nature.len(), 2);
    let functioning = &summary.by_nature[0];
    assert_eq!(functioning.nature, Nature::Functioning);
    assert_eq!(functioning.budget, Decimal::ZERO);
    assert_eq!(functioning.engagement_rate, Decimal::ZERO);
}

#[tokio::test]
async fn test_service_cockpit_from_store() {
    let store = Arc::new(MemoryStore::new());
    let tenant = TenantId::new();
    let line = store.seed_budget_line_of(tenant, "Licences", Nature::Functioning);
    store.seed_yearly_budget(tenant, line, 2025, dec!(400));
    store.seed_contract(tenant, Some(line), dec!(100), date(2025, 4, 1));
    store.seed_invoice(tenant, Some(line), dec!(25), date(2025, 6, 1));
    store.seed_yearly_budget(tenant, line, 2024, dec!(999));
    let service = RollupService::new(store, RollupAggregator::default());

    let summary = service.cockpit_summary(tenant, 2025).await.unwrap();

    assert_eq!(summary.budget, dec!(400));
    assert_eq!(summary.engaged, dec!(100));
    assert_eq!(summary.invoiced, dec!(25));
    assert_eq!(summary.engagement_rate, dec!(25));
    assert_eq!(summary.invoicing_rate, dec!(25));
}

#[tokio::test]
async fn test_cockpit_counts_every_nature_under_a_tight_bucket_cap() {
    let store = Arc::new(MemoryStore::new());
    let tenant = TenantId::new();
    let running = store.seed_budget_line_of(tenant, "Licences", Nature::Functioning);
    let capex = store.seed_budget_line_of(tenant, "Servers", Nature::Investment);
    store.seed_yearly_budget(tenant, running, 2025, dec!(400));
    store.seed_yearly_budget(tenant, capex, 2025, dec!(600));
    let service = RollupService::new(store, RollupAggregator::new("Other", 1));

    let summary = service.cockpit_summary(tenant, 2025).await.unwrap();

    assert_eq!(summary.budget, dec!(1000));
    let investment = summary
        .by_nature
        .iter()
        .find(|kpi| kpi.nature == Nature::Investment)
        .unwrap();
    assert_eq!(investment.budget, dec!(600));
}

#[tokio::test]
async fn test_service_run_is_tenant_scoped() {
    let store = Arc::new(MemoryStore::new());
    let tenant = TenantId::new();
    let acme = store.seed_vendor(tenant, "Acme");
    store.seed_vendor_contract(tenant, acme, dec!(10), date(2025, 1, 1));
    store.seed_vendor_contract(TenantId::new(), VendorId::new(), dec!(99), date(2025, 1, 1));
    let service = RollupService::new(store, RollupAggregator::default());
    let config = WidgetConfig {
        source: DataSource::Contracts,
        ..widget(GroupBy::Vendor, vec![Metric::Engaged])
    };

    let result = service.run(tenant, &config).await.unwrap();

    assert_eq!(labels(&result), vec!["Acme"]);
    assert_eq!(result.buckets[0].values, vec![dec!(10)]);
}

#[tokio::test]
async fn test_service_cockpit_rejects_implausible_year() {
    let service = RollupService::new(Arc::new(MemoryStore::new()), RollupAggregator::default());

    let result = service.cockpit_summary(TenantId::new(), 20250).await;

    assert!(matches!(result, Err(RollupError::Validation(_))));
}
