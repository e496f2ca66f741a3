use thiserror::Error;

#[derive(Debug, Error)]
pub enum SuggestError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Invalid transition: suggestion {id} cannot {action} from {from}")]
    InvalidTransition {
        id: String,
        from: String,
        action: String,
    },

    #[error("Suggestion not found: {0}")]
    SuggestionNotFound(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for SuggestError {
    fn from(e: serde_json::Error) -> Self {
        SuggestError::SerializationError(e.to_string())
    }
}
