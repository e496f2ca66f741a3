use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;

use tally_suggest_core::lifecycle::ReviewAction;
use tally_suggest_core::rules::RULE_CATALOG;
use tally_suggest_core::{AtoCategory, EngineConfig, Suggestion, SuggestionFilter};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_suggestions(json: &str) -> NapiResult<Vec<Suggestion>> {
    serde_json::from_str(json).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

#[napi]
pub fn generate_suggestions(input_json: String) -> NapiResult<String> {
    let input: tally_suggest_core::engine::SuggestionRunInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = tally_suggest_core::engine::run_suggestions(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn list_rules() -> NapiResult<String> {
    serde_json::to_string(RULE_CATALOG).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Review
// ---------------------------------------------------------------------------

/// `action` is one of `accept`, `reject`, `ignore`, `reset`.
#[napi]
pub fn review_suggestion(suggestion_json: String, action: String) -> NapiResult<String> {
    let mut suggestion: Suggestion = serde_json::from_str(&suggestion_json).map_err(to_napi_error)?;
    let action: ReviewAction =
        serde_json::from_value(serde_json::Value::String(action.to_lowercase())).map_err(to_napi_error)?;
    suggestion
        .transition(action, chrono::Utc::now())
        .map_err(to_napi_error)?;
    serde_json::to_string(&suggestion).map_err(to_napi_error)
}

#[napi]
pub fn apply_suggestion(suggestion_json: String) -> NapiResult<String> {
    let suggestion: Suggestion = serde_json::from_str(&suggestion_json).map_err(to_napi_error)?;
    let applied = tally_suggest_core::apply_suggestion(&suggestion);
    serde_json::to_string(&applied).map_err(to_napi_error)
}

#[napi]
pub fn filter_suggestions(suggestions_json: String, filter_json: String) -> NapiResult<String> {
    let suggestions = parse_suggestions(&suggestions_json)?;
    let filter: SuggestionFilter = serde_json::from_str(&filter_json).map_err(to_napi_error)?;
    let output = tally_suggest_core::filter_suggestions(&suggestions, &filter);
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Analytics & export
// ---------------------------------------------------------------------------

#[napi]
pub fn suggestion_analytics(suggestions_json: String) -> NapiResult<String> {
    let suggestions = parse_suggestions(&suggestions_json)?;
    let output = tally_suggest_core::calculate_suggestion_analytics(&suggestions);
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Plain text, not JSON.
#[napi]
pub fn export_suggestions_report(suggestions_json: String) -> NapiResult<String> {
    let suggestions = parse_suggestions(&suggestions_json)?;
    Ok(tally_suggest_core::export_suggestions_report(&suggestions))
}

// ---------------------------------------------------------------------------
// Calculators
// ---------------------------------------------------------------------------

#[napi]
pub fn classify_asset(description: String, amount: String) -> NapiResult<String> {
    let amount: Decimal = amount.trim().parse().map_err(to_napi_error)?;
    let output = tally_suggest_core::assets::is_depreciable_asset(&description, amount);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct CompareInput {
    amount: Decimal,
    #[serde(default)]
    current_category: Option<AtoCategory>,
    suggested_category: AtoCategory,
    taxable_income: Decimal,
    #[serde(default = "default_first_year")]
    first_year: bool,
    #[serde(default)]
    prior_year_rate: Option<Decimal>,
    #[serde(default)]
    config: Option<EngineConfig>,
}

fn default_first_year() -> bool {
    true
}

#[napi]
pub fn compare_tax_benefits(input_json: String) -> NapiResult<String> {
    let input: CompareInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let config = input.config.unwrap_or_default();
    config.validate().map_err(to_napi_error)?;
    let output = tally_suggest_core::benefit::compare_tax_benefits(
        input.amount,
        input.current_category,
        input.suggested_category,
        input.taxable_income,
        input.first_year,
        input.prior_year_rate,
        &config,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
