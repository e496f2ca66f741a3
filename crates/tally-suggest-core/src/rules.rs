use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::assets::{is_depreciable_asset, DepreciableAsset};
use crate::benefit::{compare_tax_benefits, compare_treatments, BenefitComparison, DeductionTreatment};
use crate::categories::AtoCategory;
use crate::config::EngineConfig;
use crate::error::SuggestError;
use crate::report::format_currency;
use crate::suggestion::{Confidence, Priority, SuggestionMetadata, SuggestionType};
use crate::types::{SuggestionRecord, TaxpayerProfile};
use crate::SuggestResult;

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Whether a match survives ranking when it does not improve the benefit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ImpactPolicy {
    /// Dropped unless `tax_impact > 0`.
    RequirePositive,
    /// Surfaced whatever the sign: compliance and classification fixes.
    AlwaysSurface,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SuggestionRule {
    pub id: &'static str,
    pub name: &'static str,
    pub suggestion_type: SuggestionType,
    pub impact_policy: ImpactPolicy,
    /// Rules that read the current category skip uncategorised records.
    pub requires_category: bool,
}

/// Evaluated in this order for every record.
pub const RULE_CATALOG: &[SuggestionRule] = &[
    SuggestionRule {
        id: "lvp-move-to-pool",
        name: "Move mid-cost item to the low-value pool",
        suggestion_type: SuggestionType::MoveToPool,
        impact_policy: ImpactPolicy::RequirePositive,
        requires_category: true,
    },
    SuggestionRule {
        id: "dep-setup-schedule",
        name: "Depreciate items at or above the pool threshold",
        suggestion_type: SuggestionType::SetupDepreciation,
        impact_policy: ImpactPolicy::AlwaysSurface,
        requires_category: true,
    },
    SuggestionRule {
        id: "lvp-switch-to-immediate",
        name: "Write off pooled items under the instant threshold",
        suggestion_type: SuggestionType::SwitchToImmediate,
        impact_policy: ImpactPolicy::RequirePositive,
        requires_category: true,
    },
    SuggestionRule {
        id: "recat-keyword-match",
        name: "Move generic expenses to a specific category",
        suggestion_type: SuggestionType::Recategorize,
        impact_policy: ImpactPolicy::AlwaysSurface,
        requires_category: false,
    },
    SuggestionRule {
        id: "dep-missing-schedule",
        name: "Flag large assets written off without a schedule",
        suggestion_type: SuggestionType::MissingDepreciation,
        impact_policy: ImpactPolicy::AlwaysSurface,
        requires_category: true,
    },
];

pub fn find_rule(id: &str) -> Option<&'static SuggestionRule> {
    RULE_CATALOG.iter().find(|r| r.id == id)
}

// ---------------------------------------------------------------------------
// Recategorization keywords
// ---------------------------------------------------------------------------

/// A category-specific vocabulary. Strong keywords name the category
/// outright; weak ones are suggestive but ambiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordGroup {
    pub name: &'static str,
    pub category: AtoCategory,
    pub strong: &'static [&'static str],
    pub weak: &'static [&'static str],
}

/// Searched top to bottom; the first group with a hit wins.
pub const RECATEGORIZE_GROUPS: &[KeywordGroup] = &[
    KeywordGroup {
        name: "clothing",
        category: AtoCategory::D3,
        strong: &["uniform", "hi-vis", "high-vis", "protective", "safety boots", "steel cap", "scrubs"],
        weak: &["shirt", "boots", "apron", "laundry", "dry cleaning"],
    },
    KeywordGroup {
        name: "self-education",
        category: AtoCategory::D4,
        strong: &["course", "tuition", "training", "seminar", "workshop", "certification", "university", "tafe"],
        weak: &["textbook", "conference", "webinar", "exam fee"],
    },
    KeywordGroup {
        name: "travel",
        category: AtoCategory::D2,
        strong: &["flight", "airfare", "airline", "accommodation", "hotel", "motel"],
        weak: &["taxi", "uber", "train", "airbnb", "meal allowance"],
    },
    KeywordGroup {
        name: "car",
        category: AtoCategory::D1,
        strong: &["fuel", "petrol", "diesel", "rego", "car service", "tyres"],
        weak: &["car wash", "parking", "toll"],
    },
    KeywordGroup {
        name: "tax-affairs",
        category: AtoCategory::D10,
        strong: &["tax agent", "tax return", "accountant fee"],
        weak: &["bookkeeping", "accounting"],
    },
    KeywordGroup {
        name: "donations",
        category: AtoCategory::D9,
        strong: &["donation", "charity"],
        weak: &["fundraiser", "appeal"],
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordHit {
    pub group: &'static KeywordGroup,
    pub keyword: &'static str,
    pub strong: bool,
}

pub fn match_keyword_group(text: &str) -> Option<KeywordHit> {
    let text = text.to_lowercase();
    RECATEGORIZE_GROUPS.iter().find_map(|group| {
        if let Some(kw) = group.strong.iter().find(|kw| text.contains(*kw)) {
            return Some(KeywordHit {
                group,
                keyword: *kw,
                strong: true,
            });
        }
        group.weak.iter().find(|kw| text.contains(*kw)).map(|kw| KeywordHit {
            group,
            keyword: *kw,
            strong: false,
        })
    })
}

// ---------------------------------------------------------------------------
// Matches
// ---------------------------------------------------------------------------

/// Suggestion content produced by a triggered rule, before the ranker gives
/// it an identity.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleMatch {
    pub rule: &'static SuggestionRule,
    pub current_category: Option<AtoCategory>,
    pub suggested_category: AtoCategory,
    pub title: String,
    pub description: String,
    pub reason: String,
    pub comparison: BenefitComparison,
    pub confidence: Confidence,
    pub priority: Priority,
    pub metadata: SuggestionMetadata,
}

impl RuleMatch {
    /// Whether the ranker should keep this match.
    pub fn is_surfaced(&self) -> bool {
        match self.rule.impact_policy {
            ImpactPolicy::AlwaysSurface => true,
            ImpactPolicy::RequirePositive => self.comparison.difference > Decimal::ZERO,
        }
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Run every catalog rule against one record. A record may trigger several
/// independent rules; all of them are returned, in catalog order.
pub fn evaluate_record(
    record: &SuggestionRecord,
    profile: &TaxpayerProfile,
    config: &EngineConfig,
) -> SuggestResult<Vec<RuleMatch>> {
    let mut matches = Vec::new();
    for rule in RULE_CATALOG {
        if rule.requires_category && record.category.is_none() {
            continue;
        }
        if let Some(m) = evaluate_rule(rule, record, profile, config)? {
            log::debug!(
                "rule {} matched record {} ({} -> {}, impact {})",
                rule.id,
                record.id,
                crate::categories::category_label(m.current_category),
                m.suggested_category,
                m.comparison.difference
            );
            matches.push(m);
        }
    }
    Ok(matches)
}

pub fn evaluate_rule(
    rule: &'static SuggestionRule,
    record: &SuggestionRecord,
    profile: &TaxpayerProfile,
    config: &EngineConfig,
) -> SuggestResult<Option<RuleMatch>> {
    match rule.suggestion_type {
        SuggestionType::MoveToPool => move_to_pool(rule, record, profile, config),
        SuggestionType::SetupDepreciation => setup_depreciation(rule, record, profile, config),
        SuggestionType::SwitchToImmediate => switch_to_immediate(rule, record, profile, config),
        SuggestionType::Recategorize => recategorize(rule, record, profile, config),
        SuggestionType::MissingDepreciation => missing_depreciation(rule, record, profile, config),
    }
}

fn move_to_pool(
    rule: &'static SuggestionRule,
    record: &SuggestionRecord,
    profile: &TaxpayerProfile,
    config: &EngineConfig,
) -> SuggestResult<Option<RuleMatch>> {
    if record.category != Some(AtoCategory::IMMEDIATE_DEDUCTION)
        || record.amount < config.instant_write_off_threshold
        || record.amount >= config.pool_threshold
    {
        return Ok(None);
    }

    let comparison = compare_tax_benefits(
        record.amount,
        record.category,
        AtoCategory::LOW_VALUE_POOL,
        profile.taxable_income,
        config.pool_first_year,
        None,
        config,
    )?;

    Ok(Some(RuleMatch {
        rule,
        current_category: record.category,
        suggested_category: AtoCategory::LOW_VALUE_POOL,
        title: "Move to the low-value pool".into(),
        description: format!(
            "{} ({}) can be pooled instead of written off in one year.",
            record.display_name(),
            format_currency(record.amount)
        ),
        reason: format!(
            "Items costing from {} up to {} qualify for the low-value pool, worth {} against {} as an immediate deduction.",
            format_currency(config.instant_write_off_threshold),
            format_currency(config.pool_threshold),
            format_currency(comparison.suggested_benefit),
            format_currency(comparison.current_benefit)
        ),
        comparison,
        confidence: Confidence::High,
        priority: Priority::Medium,
        metadata: metadata(record.category, AtoCategory::LOW_VALUE_POOL, None, None),
    }))
}

fn setup_depreciation(
    rule: &'static SuggestionRule,
    record: &SuggestionRecord,
    profile: &TaxpayerProfile,
    config: &EngineConfig,
) -> SuggestResult<Option<RuleMatch>> {
    if record.category != Some(AtoCategory::IMMEDIATE_DEDUCTION) || record.amount < config.pool_threshold {
        return Ok(None);
    }

    let asset = classify(record)?;
    let comparison = compare_treatments(
        record.amount,
        Some(DeductionTreatment::Immediate),
        DeductionTreatment::DeclineInValue { rate: asset.rate },
        profile.taxable_income,
        None,
        config,
    )?;

    Ok(Some(RuleMatch {
        rule,
        current_category: record.category,
        suggested_category: AtoCategory::Dep,
        title: "Set up a depreciation schedule".into(),
        description: format!(
            "{} ({}) should be depreciated as {}.",
            record.display_name(),
            format_currency(record.amount),
            asset.archetype.label().to_lowercase()
        ),
        reason: format!(
            "Assets costing {} or more cannot be claimed in full in the year of purchase; claim decline in value at {}% a year.",
            format_currency(config.pool_threshold),
            percent(asset.rate)
        ),
        comparison,
        confidence: if asset.is_keyword_match() {
            Confidence::High
        } else {
            Confidence::Medium
        },
        priority: Priority::Critical,
        metadata: metadata(record.category, AtoCategory::Dep, Some(&asset), None),
    }))
}

fn switch_to_immediate(
    rule: &'static SuggestionRule,
    record: &SuggestionRecord,
    profile: &TaxpayerProfile,
    config: &EngineConfig,
) -> SuggestResult<Option<RuleMatch>> {
    if record.category != Some(AtoCategory::LOW_VALUE_POOL)
        || record.amount >= config.instant_write_off_threshold
    {
        return Ok(None);
    }

    let comparison = compare_tax_benefits(
        record.amount,
        record.category,
        AtoCategory::IMMEDIATE_DEDUCTION,
        profile.taxable_income,
        config.pool_first_year,
        None,
        config,
    )?;

    Ok(Some(RuleMatch {
        rule,
        current_category: record.category,
        suggested_category: AtoCategory::IMMEDIATE_DEDUCTION,
        title: "Claim as an immediate deduction".into(),
        description: format!(
            "{} ({}) is under the instant write-off threshold.",
            record.display_name(),
            format_currency(record.amount)
        ),
        reason: format!(
            "Items under {} can be deducted in full this year instead of at {}% through the pool.",
            format_currency(config.instant_write_off_threshold),
            percent(config.pool_first_year_rate)
        ),
        comparison,
        confidence: Confidence::High,
        priority: Priority::High,
        metadata: metadata(record.category, AtoCategory::IMMEDIATE_DEDUCTION, None, None),
    }))
}

fn recategorize(
    rule: &'static SuggestionRule,
    record: &SuggestionRecord,
    profile: &TaxpayerProfile,
    config: &EngineConfig,
) -> SuggestResult<Option<RuleMatch>> {
    if let Some(current) = record.category {
        if !current.is_generic() {
            return Ok(None);
        }
    }

    let hit = match match_keyword_group(&record.match_text()) {
        Some(hit) => hit,
        None => return Ok(None),
    };
    let suggested = hit.group.category;
    if record.category == Some(suggested) {
        return Ok(None);
    }

    let comparison = compare_tax_benefits(
        record.amount,
        record.category,
        suggested,
        profile.taxable_income,
        config.pool_first_year,
        None,
        config,
    )?;

    let confidence = recategorize_confidence(&hit, profile);
    let priority = if comparison.difference > Decimal::ZERO {
        Priority::Medium
    } else {
        Priority::Low
    };

    let reason = match record.category {
        Some(current) => format!(
            "\"{}\" points to {} rather than the catch-all {}.",
            hit.keyword,
            suggested.display_name().to_lowercase(),
            current.display_name().to_lowercase()
        ),
        None => format!(
            "\"{}\" points to {}; the record has no category and is not being claimed.",
            hit.keyword,
            suggested.display_name().to_lowercase()
        ),
    };

    Ok(Some(RuleMatch {
        rule,
        current_category: record.category,
        suggested_category: suggested,
        title: format!("Recategorise as {}", suggested.display_name()),
        description: format!(
            "{} ({}) looks like a {} expense.",
            record.display_name(),
            format_currency(record.amount),
            hit.group.name
        ),
        reason,
        comparison,
        confidence,
        priority,
        metadata: metadata(record.category, suggested, None, Some(hit.keyword)),
    }))
}

fn recategorize_confidence(hit: &KeywordHit, profile: &TaxpayerProfile) -> Confidence {
    let base = if hit.strong {
        Confidence::High
    } else {
        Confidence::Medium
    };
    match hit.group.category {
        AtoCategory::D1 if !profile.has_vehicle => match base {
            Confidence::High => Confidence::Medium,
            _ => Confidence::Low,
        },
        AtoCategory::D4 if profile.is_studying => Confidence::High,
        _ => base,
    }
}

fn missing_depreciation(
    rule: &'static SuggestionRule,
    record: &SuggestionRecord,
    profile: &TaxpayerProfile,
    config: &EngineConfig,
) -> SuggestResult<Option<RuleMatch>> {
    // Pooled items are already outside this rule: only full write-offs qualify.
    if record.category != Some(AtoCategory::IMMEDIATE_DEDUCTION)
        || record.amount < config.large_asset_threshold
    {
        return Ok(None);
    }

    let asset = classify(record)?;
    let comparison = compare_treatments(
        record.amount,
        Some(DeductionTreatment::Immediate),
        DeductionTreatment::DeclineInValue { rate: asset.rate },
        profile.taxable_income,
        None,
        config,
    )?;

    Ok(Some(RuleMatch {
        rule,
        current_category: record.category,
        suggested_category: AtoCategory::Dep,
        title: "Large asset claimed without depreciation".into(),
        description: format!(
            "{} ({}) was deducted in full with no depreciation schedule.",
            record.display_name(),
            format_currency(record.amount)
        ),
        reason: format!(
            "An outlay of {} or more written off immediately is likely to be adjusted on review; the excess over the first-year decline in value is {}.",
            format_currency(config.large_asset_threshold),
            format_currency(record.amount - record.amount * asset.rate)
        ),
        comparison,
        confidence: if asset.is_keyword_match() {
            Confidence::High
        } else {
            Confidence::Low
        },
        priority: Priority::High,
        metadata: metadata(record.category, AtoCategory::Dep, Some(&asset), None),
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn classify(record: &SuggestionRecord) -> SuggestResult<DepreciableAsset> {
    is_depreciable_asset(&record.match_text(), record.amount).ok_or_else(|| {
        SuggestError::CalculationError(format!(
            "Record {} ({}) is not classifiable as a depreciable asset",
            record.id, record.amount
        ))
    })
}

fn metadata(
    current: Option<AtoCategory>,
    suggested: AtoCategory,
    asset: Option<&DepreciableAsset>,
    keyword: Option<&str>,
) -> SuggestionMetadata {
    SuggestionMetadata {
        original_category_name: current.map(|c| c.display_name().to_string()),
        suggested_category_name: suggested.display_name().to_string(),
        matched_keyword: keyword
            .map(str::to_string)
            .or_else(|| asset.and_then(|a| a.matched_keyword.clone())),
        asset_archetype: asset.map(|a| a.archetype),
        depreciation_rate: asset.map(|a| a.rate),
    }
}

fn percent(rate: Decimal) -> Decimal {
    (rate * dec!(100)).round_dp(2).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EmploymentType, WorkArrangement};
    use chrono::NaiveDate;

    fn sample_profile() -> TaxpayerProfile {
        TaxpayerProfile {
            taxable_income: dec!(85_000),
            occupation: "Software engineer".into(),
            age: 34,
            has_vehicle: false,
            work_arrangement: WorkArrangement::Hybrid,
            has_investments: false,
            investment_types: vec![],
            is_studying: false,
            has_home_office: true,
            employment_type: EmploymentType::FullTime,
            years_with_accountant: 0,
        }
    }

    fn record(description: &str, amount: Decimal, category: Option<AtoCategory>) -> SuggestionRecord {
        SuggestionRecord {
            id: "rec-1".into(),
            vendor: "Vendor".into(),
            amount,
            category,
            date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            description: Some(description.into()),
        }
    }

    fn types_for(rec: &SuggestionRecord, profile: &TaxpayerProfile) -> Vec<SuggestionType> {
        evaluate_record(rec, profile, &EngineConfig::default())
            .unwrap()
            .iter()
            .map(|m| m.rule.suggestion_type)
            .collect()
    }

    #[test]
    fn test_catalog_ids_unique_and_findable() {
        for rule in RULE_CATALOG {
            assert_eq!(find_rule(rule.id).unwrap(), rule);
        }
        let mut ids: Vec<_> = RULE_CATALOG.iter().map(|r| r.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), RULE_CATALOG.len());
        assert!(find_rule("no-such-rule").is_none());
    }

    #[test]
    fn test_catalog_covers_every_suggestion_type() {
        for t in SuggestionType::ALL {
            assert!(RULE_CATALOG.iter().any(|r| r.suggestion_type == t));
        }
    }

    #[test]
    fn test_move_to_pool_window() {
        let profile = sample_profile();
        let m = evaluate_record(&record("Office chair", dec!(450), Some(AtoCategory::D5)), &profile, &EngineConfig::default())
            .unwrap();
        let pool = m
            .iter()
            .find(|m| m.rule.suggestion_type == SuggestionType::MoveToPool)
            .unwrap();
        assert_eq!(pool.suggested_category, AtoCategory::D6);
        // First-year pooling is worse than a full write-off.
        assert!(!pool.is_surfaced());

        let below = record("Stationery", dec!(299.99), Some(AtoCategory::D5));
        assert!(!types_for(&below, &profile).contains(&SuggestionType::MoveToPool));
        let above = record("Stationery", dec!(1000), Some(AtoCategory::D5));
        assert!(!types_for(&above, &profile).contains(&SuggestionType::MoveToPool));
    }

    #[test]
    fn test_move_to_pool_dropped_at_zero_marginal_rate() {
        let mut profile = sample_profile();
        profile.taxable_income = dec!(10_000);
        let m = evaluate_record(&record("Office chair", dec!(450), Some(AtoCategory::D5)), &profile, &EngineConfig::default())
            .unwrap();
        assert!(m.iter().all(|m| m.rule.suggestion_type != SuggestionType::MoveToPool || !m.is_surfaced()));
    }

    #[test]
    fn test_setup_depreciation_is_critical_and_always_surfaced() {
        let rec = record("Workstation computer", dec!(1500), Some(AtoCategory::D5));
        let m = evaluate_record(&rec, &sample_profile(), &EngineConfig::default()).unwrap();
        let dep = m
            .iter()
            .find(|m| m.rule.suggestion_type == SuggestionType::SetupDepreciation)
            .unwrap();
        assert_eq!(dep.priority, Priority::Critical);
        assert_eq!(dep.confidence, Confidence::High);
        assert_eq!(dep.suggested_category, AtoCategory::Dep);
        assert!(dep.comparison.difference < Decimal::ZERO);
        assert!(dep.is_surfaced());
        assert_eq!(dep.metadata.depreciation_rate, Some(dec!(0.25)));
    }

    #[test]
    fn test_setup_depreciation_generic_asset_is_medium_confidence() {
        let rec = record("Espresso machine", dec!(1200), Some(AtoCategory::D5));
        let m = evaluate_record(&rec, &sample_profile(), &EngineConfig::default()).unwrap();
        let dep = m
            .iter()
            .find(|m| m.rule.suggestion_type == SuggestionType::SetupDepreciation)
            .unwrap();
        assert_eq!(dep.confidence, Confidence::Medium);
    }

    #[test]
    fn test_switch_to_immediate_positive() {
        let rec = record("Wireless mouse", dec!(250), Some(AtoCategory::D6));
        let m = evaluate_record(&rec, &sample_profile(), &EngineConfig::default()).unwrap();
        assert_eq!(m.len(), 1);
        assert_eq!(m[0].rule.suggestion_type, SuggestionType::SwitchToImmediate);
        assert_eq!(m[0].suggested_category, AtoCategory::D5);
        assert!(m[0].comparison.difference > Decimal::ZERO);
        assert!(m[0].is_surfaced());
    }

    #[test]
    fn test_pool_item_at_threshold_not_switched() {
        let rec = record("Keyboard", dec!(300), Some(AtoCategory::D6));
        assert!(types_for(&rec, &sample_profile()).is_empty());
    }

    #[test]
    fn test_recategorize_uniform() {
        let rec = record("Work uniform shirt", dec!(120), Some(AtoCategory::D15));
        let m = evaluate_record(&rec, &sample_profile(), &EngineConfig::default()).unwrap();
        assert_eq!(m.len(), 1);
        assert_eq!(m[0].rule.suggestion_type, SuggestionType::Recategorize);
        assert_eq!(m[0].suggested_category, AtoCategory::D3);
        assert_eq!(m[0].confidence, Confidence::High);
        assert_eq!(m[0].comparison.difference, Decimal::ZERO);
        assert_eq!(m[0].priority, Priority::Low);
        assert!(m[0].is_surfaced());
        assert_eq!(m[0].metadata.matched_keyword.as_deref(), Some("uniform"));
    }

    #[test]
    fn test_recategorize_skips_specific_categories() {
        let rec = record("Flight to Sydney", dec!(420), Some(AtoCategory::D7));
        assert!(types_for(&rec, &sample_profile()).is_empty());
    }

    #[test]
    fn test_uncategorised_record_only_runs_description_rules() {
        let rec = record("Python training course", dec!(1800), None);
        let m = evaluate_record(&rec, &sample_profile(), &EngineConfig::default()).unwrap();
        assert_eq!(m.len(), 1);
        assert_eq!(m[0].suggested_category, AtoCategory::D4);
        assert_eq!(m[0].current_category, None);
        assert_eq!(m[0].comparison.current_benefit, Decimal::ZERO);
        assert_eq!(m[0].priority, Priority::Medium);
    }

    #[test]
    fn test_uncategorised_record_without_keywords_yields_nothing() {
        let rec = record("Groceries", dec!(80), None);
        assert!(types_for(&rec, &sample_profile()).is_empty());
    }

    #[test]
    fn test_car_keywords_downgraded_without_vehicle() {
        let rec = record("Shell fuel", dec!(90), Some(AtoCategory::D5));
        let m = evaluate_record(&rec, &sample_profile(), &EngineConfig::default()).unwrap();
        assert_eq!(m[0].suggested_category, AtoCategory::D1);
        assert_eq!(m[0].confidence, Confidence::Medium);

        let mut driver = sample_profile();
        driver.has_vehicle = true;
        let m = evaluate_record(&rec, &driver, &EngineConfig::default()).unwrap();
        assert_eq!(m[0].confidence, Confidence::High);
    }

    #[test]
    fn test_studying_lifts_education_confidence() {
        let rec = record("Accounting textbook", dec!(95), Some(AtoCategory::D5));
        let m = evaluate_record(&rec, &sample_profile(), &EngineConfig::default()).unwrap();
        assert_eq!(m[0].suggested_category, AtoCategory::D4);
        assert_eq!(m[0].confidence, Confidence::Medium);

        let mut student = sample_profile();
        student.is_studying = true;
        let m = evaluate_record(&rec, &student, &EngineConfig::default()).unwrap();
        assert_eq!(m[0].confidence, Confidence::High);
    }

    #[test]
    fn test_keyword_group_order_is_precedence() {
        // "uniform" (clothing) outranks "conference" (education).
        let hit = match_keyword_group("conference uniform").unwrap();
        assert_eq!(hit.group.category, AtoCategory::D3);
        // Within a group strong keywords are checked before weak ones.
        let hit = match_keyword_group("boots and hi-vis vest").unwrap();
        assert_eq!(hit.keyword, "hi-vis");
        assert!(hit.strong);
    }

    #[test]
    fn test_large_asset_gets_both_depreciation_suggestions() {
        let rec = record("MacBook Pro laptop", dec!(6200), Some(AtoCategory::D5));
        let types = types_for(&rec, &sample_profile());
        assert_eq!(
            types,
            vec![SuggestionType::SetupDepreciation, SuggestionType::MissingDepreciation]
        );
    }

    #[test]
    fn test_missing_depreciation_generic_is_low_confidence() {
        let rec = record("Commercial oven", dec!(7000), Some(AtoCategory::D5));
        let m = evaluate_record(&rec, &sample_profile(), &EngineConfig::default()).unwrap();
        let missing = m
            .iter()
            .find(|m| m.rule.suggestion_type == SuggestionType::MissingDepreciation)
            .unwrap();
        assert_eq!(missing.confidence, Confidence::Low);
        assert_eq!(missing.priority, Priority::High);
        assert!(missing.is_surfaced());
    }

    #[test]
    fn test_missing_depreciation_only_for_full_write_offs() {
        let pooled = record("Commercial oven", dec!(7000), Some(AtoCategory::D6));
        assert!(types_for(&pooled, &sample_profile()).is_empty());

        let written_off = record("Commercial oven", dec!(7000), Some(AtoCategory::D5));
        assert!(types_for(&written_off, &sample_profile()).contains(&SuggestionType::MissingDepreciation));
    }

    #[test]
    fn test_negative_amount_propagates_error() {
        let rec = record("Uniform", dec!(-10), Some(AtoCategory::D5));
        assert!(evaluate_record(&rec, &sample_profile(), &EngineConfig::default()).is_err());
    }
}
