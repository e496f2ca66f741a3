pub mod analytics;
pub mod assets;
pub mod benefit;
pub mod categories;
pub mod config;
pub mod engine;
pub mod error;
pub mod lifecycle;
pub mod report;
pub mod rules;
pub mod suggestion;
pub mod types;

pub use analytics::{calculate_suggestion_analytics, SuggestionAnalytics};
pub use categories::AtoCategory;
pub use config::EngineConfig;
pub use engine::{generate_suggestions, run_suggestions, SuggestionEngine};
pub use error::SuggestError;
pub use lifecycle::{apply_suggestion, filter_suggestions, SuggestionFilter, SuggestionStore};
pub use report::export_suggestions_report;
pub use suggestion::*;
pub use types::*;

/// Standard result type for all suggestion engine operations
pub type SuggestResult<T> = Result<T, SuggestError>;
