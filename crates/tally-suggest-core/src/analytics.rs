use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::suggestion::{Confidence, Priority, Suggestion, SuggestionStatus, SuggestionType};
use crate::types::{Money, Rate};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionAnalytics {
    pub total_suggestions: usize,
    /// Every status is present, zero-filled.
    pub by_status: BTreeMap<SuggestionStatus, usize>,
    /// Every suggestion type is present, zero-filled.
    pub by_type: BTreeMap<SuggestionType, usize>,
    pub by_priority: BTreeMap<Priority, usize>,
    pub total_tax_impact: Money,
    pub accepted_tax_impact: Money,
    pub average_tax_impact: Money,
    pub largest_tax_impact: Option<Money>,
    /// Percentage (0-100) of suggestions with high confidence.
    pub high_confidence_rate: Rate,
}

/// Roll a suggestion list up into counts, totals and distributions.
pub fn calculate_suggestion_analytics(suggestions: &[Suggestion]) -> SuggestionAnalytics {
    let mut by_status: BTreeMap<SuggestionStatus, usize> =
        SuggestionStatus::ALL.iter().map(|s| (*s, 0)).collect();
    let mut by_type: BTreeMap<SuggestionType, usize> =
        SuggestionType::ALL.iter().map(|t| (*t, 0)).collect();
    let mut by_priority: BTreeMap<Priority, usize> =
        Priority::ALL.iter().map(|p| (*p, 0)).collect();

    let mut total_tax_impact = Decimal::ZERO;
    let mut accepted_tax_impact = Decimal::ZERO;
    let mut high_confidence = 0usize;

    for s in suggestions {
        *by_status.entry(s.status).or_insert(0) += 1;
        *by_type.entry(s.suggestion_type).or_insert(0) += 1;
        *by_priority.entry(s.priority).or_insert(0) += 1;

        total_tax_impact += s.tax_impact;
        if s.status == SuggestionStatus::Accepted {
            accepted_tax_impact += s.tax_impact;
        }
        if s.confidence == Confidence::High {
            high_confidence += 1;
        }
    }

    let total = suggestions.len();
    let (average_tax_impact, high_confidence_rate) = if total > 0 {
        let n = Decimal::from(total as u64);
        (
            (total_tax_impact / n).round_dp(2),
            (Decimal::from(high_confidence as u64) / n * dec!(100)).round_dp(2),
        )
    } else {
        (Decimal::ZERO, Decimal::ZERO)
    };

    SuggestionAnalytics {
        total_suggestions: total,
        by_status,
        by_type,
        by_priority,
        total_tax_impact,
        accepted_tax_impact,
        average_tax_impact,
        largest_tax_impact: suggestions.iter().map(|s| s.tax_impact).max(),
        high_confidence_rate,
    }
}
