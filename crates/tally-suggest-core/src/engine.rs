use std::time::Instant;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::analytics::{calculate_suggestion_analytics, SuggestionAnalytics};
use crate::benefit::marginal_rate;
use crate::config::EngineConfig;
use crate::error::SuggestError;
use crate::rules::{evaluate_record, RuleMatch};
use crate::suggestion::{Suggestion, SuggestionStatus};
use crate::types::{with_metadata, ComputationOutput, SuggestionRecord, TaxpayerProfile};
use crate::SuggestResult;

// ---------------------------------------------------------------------------
// Injected capabilities
// ---------------------------------------------------------------------------

/// Source of wall-clock time for `created_at` / `reviewed_at`.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Source of suggestion identifiers. Must not repeat within a run.
pub trait IdSource {
    fn next_id(&mut self, now: DateTime<Utc>) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// `sugg_<unix millis>_<seq>`: sorts by creation time, then by sequence.
#[derive(Debug, Clone, Default)]
pub struct TimestampIds {
    seq: u64,
}

impl IdSource for TimestampIds {
    fn next_id(&mut self, now: DateTime<Utc>) -> String {
        self.seq += 1;
        format!("sugg_{}_{:08}", now.timestamp_millis(), self.seq)
    }
}

/// `<prefix>-0001`, `<prefix>-0002`, ... independent of time.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    seq: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            seq: 0,
        }
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self, _now: DateTime<Utc>) -> String {
        self.seq += 1;
        format!("{}-{:04}", self.prefix, self.seq)
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

pub struct SuggestionEngine {
    config: EngineConfig,
    ids: Box<dyn IdSource + Send>,
    clock: Box<dyn Clock + Send>,
}

impl Default for SuggestionEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl SuggestionEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            ids: Box::new(TimestampIds::default()),
            clock: Box::new(SystemClock),
        }
    }

    pub fn with_id_source(mut self, ids: impl IdSource + Send + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + Send + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Evaluate every record against the rule catalog and return the ranked
    /// suggestions.
    ///
    /// Matches whose rule requires a benefit are dropped when their impact is
    /// not positive. The rest get an id and timestamp in discovery order and
    /// are sorted by priority, then by tax impact descending; the sort is
    /// stable so equal keys keep record order.
    pub fn generate(
        &mut self,
        records: &[SuggestionRecord],
        profile: &TaxpayerProfile,
    ) -> SuggestResult<Vec<Suggestion>> {
        self.config.validate()?;
        validate_profile(profile)?;
        for record in records {
            validate_record(record)?;
        }

        let now = self.clock.now();
        let mut suggestions = Vec::new();
        for record in records {
            for m in evaluate_record(record, profile, &self.config)? {
                if !m.is_surfaced() {
                    log::trace!(
                        "dropping {} for record {}: impact {} not positive",
                        m.rule.id,
                        record.id,
                        m.comparison.difference
                    );
                    continue;
                }
                let id = self.ids.next_id(now);
                suggestions.push(into_suggestion(id, record, m, now));
            }
        }

        rank(&mut suggestions);
        Ok(suggestions)
    }
}

/// Stable sort by `(priority, tax_impact desc)`.
pub fn rank(suggestions: &mut [Suggestion]) {
    suggestions.sort_by(|a, b| {
        a.priority
            .rank()
            .cmp(&b.priority.rank())
            .then_with(|| b.tax_impact.cmp(&a.tax_impact))
    });
}

fn into_suggestion(
    id: String,
    record: &SuggestionRecord,
    m: RuleMatch,
    now: DateTime<Utc>,
) -> Suggestion {
    Suggestion {
        id,
        record_id: record.id.clone(),
        current_category: m.current_category,
        suggested_category: m.suggested_category,
        suggestion_type: m.rule.suggestion_type,
        title: m.title,
        description: m.description,
        reason: m.reason,
        current_tax_benefit: m.comparison.current_benefit,
        suggested_tax_benefit: m.comparison.suggested_benefit,
        tax_impact: m.comparison.difference,
        amount: record.amount,
        item_description: record.display_name().to_string(),
        confidence: m.confidence,
        priority: m.priority,
        status: SuggestionStatus::Pending,
        created_at: now,
        reviewed_at: None,
        rule_id: m.rule.id.to_string(),
        metadata: Some(m.metadata),
    }
}

/// Generate suggestions with the default configuration, wall clock and
/// timestamp ids.
pub fn generate_suggestions(
    records: &[SuggestionRecord],
    profile: &TaxpayerProfile,
) -> SuggestResult<Vec<Suggestion>> {
    SuggestionEngine::default().generate(records, profile)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_record(record: &SuggestionRecord) -> SuggestResult<()> {
    if record.id.trim().is_empty() {
        return Err(SuggestError::InvalidInput {
            field: "record.id".into(),
            reason: "Record id cannot be empty".into(),
        });
    }
    if record.amount <= Decimal::ZERO {
        return Err(SuggestError::InvalidInput {
            field: format!("record[{}].amount", record.id),
            reason: "Amount must be positive".into(),
        });
    }
    Ok(())
}

fn validate_profile(profile: &TaxpayerProfile) -> SuggestResult<()> {
    if profile.taxable_income < Decimal::ZERO {
        return Err(SuggestError::InvalidInput {
            field: "profile.taxable_income".into(),
            reason: "Taxable income cannot be negative".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionRunInput {
    pub records: Vec<SuggestionRecord>,
    pub profile: TaxpayerProfile,
    #[serde(default)]
    pub config: Option<EngineConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionRunOutput {
    pub suggestions: Vec<Suggestion>,
    pub analytics: SuggestionAnalytics,
    pub records_evaluated: usize,
}

/// Generate suggestions and wrap them, with analytics, in the standard
/// computation envelope.
pub fn run_suggestions(
    input: &SuggestionRunInput,
) -> SuggestResult<ComputationOutput<SuggestionRunOutput>> {
    let engine = SuggestionEngine::new(input.config.clone().unwrap_or_default());
    run_with_engine(engine, input)
}

pub fn run_with_engine(
    mut engine: SuggestionEngine,
    input: &SuggestionRunInput,
) -> SuggestResult<ComputationOutput<SuggestionRunOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let suggestions = engine.generate(&input.records, &input.profile)?;
    let config = engine.config();

    let uncategorised = input.records.iter().filter(|r| r.category.is_none()).count();
    if uncategorised > 0 {
        warnings.push(format!(
            "{} record(s) have no category; only description-based rules were applied to them.",
            uncategorised
        ));
    }

    let rate = marginal_rate(input.profile.taxable_income, &config.brackets)?;
    if rate.is_zero() {
        warnings.push(
            "Taxable income falls in the tax-free bracket; every tax benefit is zero and \
             benefit-driven suggestions are suppressed."
                .to_string(),
        );
    }

    let analytics = calculate_suggestion_analytics(&suggestions);
    let output = SuggestionRunOutput {
        records_evaluated: input.records.len(),
        suggestions,
        analytics,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Rule-catalog evaluation of categorised records: benefit under current vs suggested \
         treatment at the marginal rate, ranked by priority then tax impact",
        &serde_json::json!({
            "taxable_income": input.profile.taxable_income.to_string(),
            "marginal_rate": rate.to_string(),
            "instant_write_off_threshold": config.instant_write_off_threshold.to_string(),
            "pool_threshold": config.pool_threshold.to_string(),
            "large_asset_threshold": config.large_asset_threshold.to_string(),
            "pool_first_year": config.pool_first_year,
            "num_records": input.records.len(),
        }),
        warnings,
        elapsed,
        output,
    ))
}
