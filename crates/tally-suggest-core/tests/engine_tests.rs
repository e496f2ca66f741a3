use std::time::{Duration, Instant};

use chrono::{NaiveDate, TimeZone, Utc};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tally_suggest_core::engine::{FixedClock, SequentialIds, SuggestionEngine};
use tally_suggest_core::report::export_suggestions_report;
use tally_suggest_core::rules::find_rule;
use tally_suggest_core::{
    calculate_suggestion_analytics, filter_suggestions, generate_suggestions, AtoCategory,
    EmploymentType, Priority, Suggestion, SuggestionFilter, SuggestionRecord, SuggestionStatus,
    SuggestionType, TaxpayerProfile, WorkArrangement,
};

// ===========================================================================
// Fixtures
// ===========================================================================

fn profile() -> TaxpayerProfile {
    TaxpayerProfile {
        taxable_income: dec!(92_000),
        occupation: "Graphic designer".into(),
        age: 29,
        has_vehicle: true,
        work_arrangement: WorkArrangement::Hybrid,
        has_investments: true,
        investment_types: vec!["shares".into()],
        is_studying: true,
        has_home_office: true,
        employment_type: EmploymentType::Contractor,
        years_with_accountant: 1,
    }
}

fn record(id: &str, vendor: &str, description: &str, amount: Decimal, category: Option<AtoCategory>) -> SuggestionRecord {
    SuggestionRecord {
        id: id.into(),
        vendor: vendor.into(),
        amount,
        category,
        date: NaiveDate::from_ymd_opt(2025, 4, 10).unwrap(),
        description: if description.is_empty() {
            None
        } else {
            Some(description.into())
        },
    }
}

fn mixed_records() -> Vec<SuggestionRecord> {
    vec![
        record("r1", "Officeworks", "Office supplies", dec!(150), Some(AtoCategory::D5)),
        record("r2", "JB Hi-Fi", "Workstation computer", dec!(1500), Some(AtoCategory::D5)),
        record("r3", "Logitech", "Wireless mouse", dec!(250), Some(AtoCategory::D6)),
        record("r4", "Workwear Co", "Work uniform shirt", dec!(120), Some(AtoCategory::D15)),
        record("r5", "Apple", "MacBook Pro laptop", dec!(6500), Some(AtoCategory::D5)),
        record("r6", "Qantas", "Flight to Melbourne for client meeting", dec!(480), None),
        record("r7", "IKEA", "Standing desk", dec!(640), Some(AtoCategory::D5)),
        record("r8", "Udemy", "Design course", dec!(90), Some(AtoCategory::D5)),
    ]
}

fn engine() -> SuggestionEngine {
    SuggestionEngine::default()
        .with_clock(FixedClock(Utc.with_ymd_and_hms(2025, 7, 15, 10, 30, 0).unwrap()))
        .with_id_source(SequentialIds::new("sugg"))
}

fn for_record<'a>(list: &'a [Suggestion], record_id: &str) -> Vec<&'a Suggestion> {
    list.iter().filter(|s| s.record_id == record_id).collect()
}

// ===========================================================================
// Properties
// ===========================================================================

#[test]
fn test_empty_records_produce_no_suggestions() {
    assert!(generate_suggestions(&[], &profile()).unwrap().is_empty());
}

#[test]
fn test_tax_impact_invariant_holds() {
    let list = engine().generate(&mixed_records(), &profile()).unwrap();
    assert!(!list.is_empty());
    for s in &list {
        assert_eq!(s.tax_impact, s.suggested_tax_benefit - s.current_tax_benefit);
        assert!(s.amount > Decimal::ZERO);
        assert_eq!(s.status, SuggestionStatus::Pending);
        assert!(s.reviewed_at.is_none());
        assert!(find_rule(&s.rule_id).is_some(), "unknown rule {}", s.rule_id);
    }
}

#[test]
fn test_sorted_by_priority_then_impact() {
    let list = engine().generate(&mixed_records(), &profile()).unwrap();
    for pair in list.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert!(a.priority.rank() <= b.priority.rank());
        if a.priority == b.priority {
            assert!(a.tax_impact >= b.tax_impact);
        }
    }
}

#[test]
fn test_ids_unique() {
    let list = engine().generate(&mixed_records(), &profile()).unwrap();
    let mut ids: Vec<&str> = list.iter().map(|s| s.id.as_str()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), list.len());
}

#[test]
fn test_deterministic_with_injected_sources() {
    let first = engine().generate(&mixed_records(), &profile()).unwrap();
    let second = engine().generate(&mixed_records(), &profile()).unwrap();
    assert_eq!(first, second);
    assert_eq!(export_suggestions_report(&first), export_suggestions_report(&second));
}

#[test]
fn test_move_to_pool_never_outside_window() {
    let mut records = Vec::new();
    for (i, amount) in [dec!(50), dec!(299.99), dec!(300), dec!(650), dec!(999.99), dec!(1000), dec!(4000)]
        .into_iter()
        .enumerate()
    {
        records.push(record(&format!("p{}", i), "Store", "Ergonomic item", amount, Some(AtoCategory::D5)));
    }
    let mut low_income = profile();
    low_income.taxable_income = dec!(20_000);
    for p in [profile(), low_income] {
        let list = engine().generate(&records, &p).unwrap();
        for s in list.iter().filter(|s| s.suggestion_type == SuggestionType::MoveToPool) {
            assert!(s.amount >= dec!(300) && s.amount < dec!(1000));
        }
    }
}

#[test]
fn test_setup_depreciation_for_every_large_immediate_item() {
    let records = vec![
        record("a", "Store", "Camera body", dec!(1000), Some(AtoCategory::D5)),
        record("b", "Store", "Unlabelled purchase", dec!(2400), Some(AtoCategory::D5)),
        record("c", "Store", "Office chair", dec!(12_000), Some(AtoCategory::D5)),
    ];
    let list = engine().generate(&records, &profile()).unwrap();
    for id in ["a", "b", "c"] {
        let dep: Vec<_> = for_record(&list, id)
            .into_iter()
            .filter(|s| s.suggestion_type == SuggestionType::SetupDepreciation)
            .collect();
        assert_eq!(dep.len(), 1, "record {}", id);
        assert_eq!(dep[0].priority, Priority::Critical);
        assert_eq!(dep[0].suggested_category, AtoCategory::Dep);
    }
}

#[test]
fn test_one_record_can_yield_several_suggestions() {
    let list = engine().generate(&mixed_records(), &profile()).unwrap();
    let laptop = for_record(&list, "r5");
    let mut types: Vec<_> = laptop.iter().map(|s| s.suggestion_type).collect();
    types.sort();
    assert_eq!(
        types,
        vec![SuggestionType::SetupDepreciation, SuggestionType::MissingDepreciation]
    );
}

#[test]
fn test_filter_is_conjunction_of_provided_fields() {
    let list = engine().generate(&mixed_records(), &profile()).unwrap();
    let filter = SuggestionFilter {
        status: Some(SuggestionStatus::Pending),
        suggestion_type: Some(SuggestionType::Recategorize),
        priority: None,
    };
    let filtered = filter_suggestions(&list, &filter);
    let expected: Vec<Suggestion> = list
        .iter()
        .filter(|s| s.status == SuggestionStatus::Pending && s.suggestion_type == SuggestionType::Recategorize)
        .cloned()
        .collect();
    assert_eq!(filtered, expected);
    assert!(!filtered.is_empty());

    let none = filter_suggestions(
        &list,
        &SuggestionFilter {
            status: Some(SuggestionStatus::Accepted),
            ..Default::default()
        },
    );
    assert!(none.is_empty());
}

#[test]
fn test_analytics_by_type_sums_to_total() {
    let list = engine().generate(&mixed_records(), &profile()).unwrap();
    let analytics = calculate_suggestion_analytics(&list);
    assert_eq!(analytics.by_type.values().sum::<usize>(), analytics.total_suggestions);
    assert_eq!(analytics.by_status[&SuggestionStatus::Pending], list.len());
    assert_eq!(analytics.accepted_tax_impact, Decimal::ZERO);
}

// ===========================================================================
// Scenarios
// ===========================================================================

#[test]
fn test_scenario_office_supplies_below_floor() {
    let list = engine().generate(&mixed_records(), &profile()).unwrap();
    assert!(for_record(&list, "r1").is_empty());
}

#[test]
fn test_scenario_workstation_computer_needs_depreciation() {
    let list = engine().generate(&mixed_records(), &profile()).unwrap();
    let r2 = for_record(&list, "r2");
    assert_eq!(r2.len(), 1);
    assert_eq!(r2[0].suggestion_type, SuggestionType::SetupDepreciation);
    assert_eq!(r2[0].priority, Priority::Critical);
    assert_eq!(list[0].priority, Priority::Critical);
}

#[test]
fn test_scenario_wireless_mouse_switches_to_immediate() {
    let list = engine().generate(&mixed_records(), &profile()).unwrap();
    let r3 = for_record(&list, "r3");
    assert_eq!(r3.len(), 1);
    assert_eq!(r3[0].suggestion_type, SuggestionType::SwitchToImmediate);
    assert_eq!(r3[0].suggested_category, AtoCategory::IMMEDIATE_DEDUCTION);
    assert!(r3[0].tax_impact > Decimal::ZERO);
    // 75.00 immediate against 14.06 pooled
    assert_eq!(r3[0].tax_impact, dec!(60.94));
}

#[test]
fn test_scenario_uniform_shirt_recategorised() {
    let list = engine().generate(&mixed_records(), &profile()).unwrap();
    let r4 = for_record(&list, "r4");
    assert_eq!(r4.len(), 1);
    assert_eq!(r4[0].suggestion_type, SuggestionType::Recategorize);
    assert_eq!(r4[0].suggested_category, AtoCategory::D3);
    assert_eq!(r4[0].tax_impact, Decimal::ZERO);
}

#[test]
fn test_scenario_uncategorised_flight_goes_to_travel() {
    let list = engine().generate(&mixed_records(), &profile()).unwrap();
    let r6 = for_record(&list, "r6");
    assert_eq!(r6.len(), 1);
    assert_eq!(r6[0].current_category, None);
    assert_eq!(r6[0].suggested_category, AtoCategory::D2);
    assert_eq!(r6[0].tax_impact, dec!(144.00));
}

#[test]
fn test_scenario_desk_pool_move_is_not_surfaced() {
    let list = engine().generate(&mixed_records(), &profile()).unwrap();
    assert!(for_record(&list, "r7").is_empty());
}

#[test]
fn test_scenario_hundred_records_under_one_second() {
    let descriptions = [
        "Laptop computer",
        "Uniform",
        "Stationery",
        "Conference ticket",
        "Hotel stay",
        "Drill set",
        "Charity donation",
        "Monitor arm",
    ];
    let categories = [
        Some(AtoCategory::D5),
        Some(AtoCategory::D6),
        Some(AtoCategory::D15),
        None,
    ];
    let records: Vec<SuggestionRecord> = (0..100)
        .map(|i| {
            let amount = Decimal::from(50 + (i * 97) % 7000);
            record(
                &format!("syn-{}", i),
                "Synthetic vendor",
                descriptions[i % descriptions.len()],
                amount,
                categories[i % categories.len()],
            )
        })
        .collect();

    let start = Instant::now();
    let list = engine().generate(&records, &profile()).unwrap();
    let elapsed = start.elapsed();

    assert!(elapsed < Duration::from_secs(1), "took {:?}", elapsed);
    assert!(!list.is_empty());
}
