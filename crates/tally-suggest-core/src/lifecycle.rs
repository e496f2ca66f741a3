use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::categories::AtoCategory;
use crate::engine::{Clock, SystemClock};
use crate::error::SuggestError;
use crate::suggestion::{Priority, Suggestion, SuggestionStatus, SuggestionType};
use crate::SuggestResult;

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewAction {
    Accept,
    Reject,
    Ignore,
    Reset,
}

impl ReviewAction {
    pub fn as_str(self) -> &'static str {
        match self {
            ReviewAction::Accept => "accept",
            ReviewAction::Reject => "reject",
            ReviewAction::Ignore => "ignore",
            ReviewAction::Reset => "reset",
        }
    }
}

impl fmt::Display for ReviewAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Suggestion {
    pub fn accept(&mut self, now: DateTime<Utc>) -> SuggestResult<()> {
        self.transition(ReviewAction::Accept, now)
    }

    pub fn reject(&mut self, now: DateTime<Utc>) -> SuggestResult<()> {
        self.transition(ReviewAction::Reject, now)
    }

    pub fn ignore(&mut self, now: DateTime<Utc>) -> SuggestResult<()> {
        self.transition(ReviewAction::Ignore, now)
    }

    /// Back to `Pending`; clears `reviewed_at`, so no clock is needed.
    pub fn reset(&mut self) -> SuggestResult<()> {
        self.step(ReviewAction::Reset, None)
    }

    /// Apply a review action. Decisions are only taken from `Pending`; reset
    /// is only valid from a decided state. `tax_impact` is never touched.
    pub fn transition(&mut self, action: ReviewAction, now: DateTime<Utc>) -> SuggestResult<()> {
        self.step(action, Some(now))
    }

    fn step(&mut self, action: ReviewAction, now: Option<DateTime<Utc>>) -> SuggestResult<()> {
        let next = match (self.status, action) {
            (SuggestionStatus::Pending, ReviewAction::Accept) => SuggestionStatus::Accepted,
            (SuggestionStatus::Pending, ReviewAction::Reject) => SuggestionStatus::Rejected,
            (SuggestionStatus::Pending, ReviewAction::Ignore) => SuggestionStatus::Ignored,
            (from, ReviewAction::Reset) if from.is_terminal() => SuggestionStatus::Pending,
            (from, action) => {
                return Err(SuggestError::InvalidTransition {
                    id: self.id.clone(),
                    from: from.to_string(),
                    action: action.to_string(),
                });
            }
        };

        self.status = next;
        self.reviewed_at = match next {
            SuggestionStatus::Pending => None,
            _ => now,
        };
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Apply
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedCategory {
    pub category: AtoCategory,
    pub notes: String,
}

/// The category change the caller should persist for the suggestion's
/// record, with an audit note. Pure: neither the suggestion nor the record
/// is modified.
pub fn apply_suggestion(suggestion: &Suggestion) -> AppliedCategory {
    AppliedCategory {
        category: suggestion.suggested_category,
        notes: format!("{} — {}", suggestion.id, suggestion.reason),
    }
}

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

/// Omitted fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionFilter {
    #[serde(default)]
    pub status: Option<SuggestionStatus>,
    #[serde(default)]
    pub suggestion_type: Option<SuggestionType>,
    #[serde(default)]
    pub priority: Option<Priority>,
}

impl SuggestionFilter {
    pub fn matches(&self, s: &Suggestion) -> bool {
        self.status.map_or(true, |v| s.status == v)
            && self.suggestion_type.map_or(true, |v| s.suggestion_type == v)
            && self.priority.map_or(true, |v| s.priority == v)
    }
}

pub fn filter_suggestions(suggestions: &[Suggestion], filter: &SuggestionFilter) -> Vec<Suggestion> {
    suggestions
        .iter()
        .filter(|s| filter.matches(s))
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// In-memory holder for one review session. Persistence stays with the
/// caller: take the suggestions back out with [`SuggestionStore::into_inner`].
pub struct SuggestionStore {
    suggestions: Vec<Suggestion>,
    clock: Box<dyn Clock + Send>,
}

impl SuggestionStore {
    pub fn new(suggestions: Vec<Suggestion>) -> Self {
        Self {
            suggestions,
            clock: Box::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + Send + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn get(&self, id: &str) -> Option<&Suggestion> {
        self.suggestions.iter().find(|s| s.id == id)
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub fn pending(&self) -> Vec<&Suggestion> {
        self.suggestions
            .iter()
            .filter(|s| s.status == SuggestionStatus::Pending)
            .collect()
    }

    pub fn review(&mut self, id: &str, action: ReviewAction) -> SuggestResult<&Suggestion> {
        let now = self.clock.now();
        let suggestion = self
            .suggestions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| SuggestError::SuggestionNotFound(id.to_string()))?;
        suggestion.transition(action, now)?;
        Ok(&*suggestion)
    }

    pub fn accept(&mut self, id: &str) -> SuggestResult<&Suggestion> {
        self.review(id, ReviewAction::Accept)
    }

    pub fn reject(&mut self, id: &str) -> SuggestResult<&Suggestion> {
        self.review(id, ReviewAction::Reject)
    }

    pub fn ignore(&mut self, id: &str) -> SuggestResult<&Suggestion> {
        self.review(id, ReviewAction::Ignore)
    }

    pub fn reset(&mut self, id: &str) -> SuggestResult<&Suggestion> {
        self.review(id, ReviewAction::Reset)
    }

    pub fn apply(&self, id: &str) -> SuggestResult<AppliedCategory> {
        self.get(id)
            .map(apply_suggestion)
            .ok_or_else(|| SuggestError::SuggestionNotFound(id.to_string()))
    }

    pub fn into_inner(self) -> Vec<Suggestion> {
        self.suggestions
    }
}
