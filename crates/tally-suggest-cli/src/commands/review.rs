use clap::{Args, ValueEnum};
use serde_json::Value;

use tally_suggest_core::lifecycle::ReviewAction;
use tally_suggest_core::SuggestionStore;

use super::suggestions_from;
use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ActionArg {
    Accept,
    Reject,
    Ignore,
    Reset,
}

impl From<ActionArg> for ReviewAction {
    fn from(a: ActionArg) -> Self {
        match a {
            ActionArg::Accept => ReviewAction::Accept,
            ActionArg::Reject => ReviewAction::Reject,
            ActionArg::Ignore => ReviewAction::Ignore,
            ActionArg::Reset => ReviewAction::Reset,
        }
    }
}

/// Arguments for reviewing one suggestion
#[derive(Args)]
pub struct ReviewArgs {
    /// Path to JSON file holding suggestions (array or `generate` output)
    #[arg(long)]
    pub input: Option<String>,

    /// Suggestion id
    #[arg(long)]
    pub id: String,

    /// Review decision
    #[arg(long, value_enum)]
    pub action: ActionArg,
}

/// Arguments for applying one suggestion
#[derive(Args)]
pub struct ApplyArgs {
    /// Path to JSON file holding suggestions (array or `generate` output)
    #[arg(long)]
    pub input: Option<String>,

    /// Suggestion id
    #[arg(long)]
    pub id: String,
}

/// Reviews one suggestion and returns it alongside the full updated list,
/// which can be piped into the next command.
pub fn run_review(args: ReviewArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let suggestions = suggestions_from(input::load(args.input.as_deref(), "review")?)?;
    let mut store = SuggestionStore::new(suggestions);

    let reviewed = store.review(&args.id, args.action.into())?.clone();
    log::info!("suggestion {} is now {}", reviewed.id, reviewed.status);

    Ok(serde_json::json!({
        "suggestion": reviewed,
        "suggestions": store.into_inner(),
    }))
}

pub fn run_apply(args: ApplyArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let suggestions = suggestions_from(input::load(args.input.as_deref(), "apply")?)?;
    let store = SuggestionStore::new(suggestions);

    let applied = store.apply(&args.id)?;
    let record_id = store
        .get(&args.id)
        .map(|s| s.record_id.clone())
        .unwrap_or_default();

    Ok(serde_json::json!({
        "suggestion_id": args.id,
        "record_id": record_id,
        "category": applied.category,
        "notes": applied.notes,
    }))
}
