use clap::Args;
use serde_json::Value;

use tally_suggest_core::engine::{self, SuggestionRunInput};
use tally_suggest_core::rules::{RECATEGORIZE_GROUPS, RULE_CATALOG};
use tally_suggest_core::{analytics, lifecycle, report};

use super::{parse_flag, suggestions_from};
use crate::input;

/// Arguments for suggestion generation
#[derive(Args)]
pub struct GenerateArgs {
    /// Path to JSON or YAML input file ({ records, profile, config? })
    #[arg(long)]
    pub input: Option<String>,

    /// Engine configuration (JSON or YAML); replaces any `config` in the input
    #[arg(long)]
    pub config: Option<String>,
}

/// Arguments for commands that read an existing suggestion list
#[derive(Args)]
pub struct SuggestionsArgs {
    /// Path to JSON file holding suggestions (array or `generate` output)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for filtering a suggestion list
#[derive(Args)]
pub struct FilterArgs {
    /// Path to JSON file holding suggestions (array or `generate` output)
    #[arg(long)]
    pub input: Option<String>,

    /// pending | accepted | rejected | ignored
    #[arg(long)]
    pub status: Option<String>,

    /// move-to-pool | setup-depreciation | switch-to-immediate | recategorize | missing-depreciation
    #[arg(long = "type")]
    pub suggestion_type: Option<String>,

    /// critical | high | medium | low
    #[arg(long)]
    pub priority: Option<String>,
}

pub fn run_generate(args: GenerateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut run_input: SuggestionRunInput =
        input::load_as(args.input.as_deref(), "suggestion generation")?;

    if let Some(ref path) = args.config {
        run_input.config = Some(input::file::read_config(path)?);
    }

    log::info!(
        "generating suggestions for {} record(s)",
        run_input.records.len()
    );
    let result = engine::run_suggestions(&run_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_analytics(args: SuggestionsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let suggestions = suggestions_from(input::load(args.input.as_deref(), "analytics")?)?;
    let result = analytics::calculate_suggestion_analytics(&suggestions);
    Ok(serde_json::to_value(result)?)
}

/// Plain-text report; printed as-is rather than through an output format.
pub fn run_export(args: SuggestionsArgs) -> Result<String, Box<dyn std::error::Error>> {
    let suggestions = suggestions_from(input::load(args.input.as_deref(), "report export")?)?;
    Ok(report::export_suggestions_report(&suggestions))
}

pub fn run_filter(args: FilterArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let suggestions = suggestions_from(input::load(args.input.as_deref(), "filtering")?)?;

    let filter = lifecycle::SuggestionFilter {
        status: args
            .status
            .as_deref()
            .map(|s| parse_flag("status", s))
            .transpose()?,
        suggestion_type: args
            .suggestion_type
            .as_deref()
            .map(|s| parse_flag("type", s))
            .transpose()?,
        priority: args
            .priority
            .as_deref()
            .map(|s| parse_flag("priority", s))
            .transpose()?,
    };

    let result = lifecycle::filter_suggestions(&suggestions, &filter);
    Ok(serde_json::to_value(result)?)
}

pub fn run_rules() -> Result<Value, Box<dyn std::error::Error>> {
    let groups: Vec<Value> = RECATEGORIZE_GROUPS
        .iter()
        .map(|g| {
            serde_json::json!({
                "group": g.name,
                "category": g.category,
                "strong": g.strong,
                "weak": g.weak,
            })
        })
        .collect();

    Ok(serde_json::json!({
        "rules": RULE_CATALOG,
        "recategorize_groups": groups,
    }))
}
