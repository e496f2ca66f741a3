use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::assets::AssetArchetype;
use crate::categories::AtoCategory;
use crate::types::{Money, Rate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SuggestionType {
    MoveToPool,
    SetupDepreciation,
    SwitchToImmediate,
    Recategorize,
    MissingDepreciation,
}

impl SuggestionType {
    pub const ALL: [SuggestionType; 5] = [
        SuggestionType::MoveToPool,
        SuggestionType::SetupDepreciation,
        SuggestionType::SwitchToImmediate,
        SuggestionType::Recategorize,
        SuggestionType::MissingDepreciation,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SuggestionType::MoveToPool => "move-to-pool",
            SuggestionType::SetupDepreciation => "setup-depreciation",
            SuggestionType::SwitchToImmediate => "switch-to-immediate",
            SuggestionType::Recategorize => "recategorize",
            SuggestionType::MissingDepreciation => "missing-depreciation",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// Declaration order is rank order: `Critical` sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Critical,
        Priority::High,
        Priority::Medium,
        Priority::Low,
    ];

    pub fn rank(self) -> u8 {
        match self {
            Priority::Critical => 0,
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
    Ignored,
}

impl SuggestionStatus {
    pub const ALL: [SuggestionStatus; 4] = [
        SuggestionStatus::Pending,
        SuggestionStatus::Accepted,
        SuggestionStatus::Rejected,
        SuggestionStatus::Ignored,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SuggestionStatus::Pending => "pending",
            SuggestionStatus::Accepted => "accepted",
            SuggestionStatus::Rejected => "rejected",
            SuggestionStatus::Ignored => "ignored",
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, SuggestionStatus::Pending)
    }
}

impl fmt::Display for SuggestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for SuggestionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_category_name: Option<String>,
    pub suggested_category_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_keyword: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_archetype: Option<AssetArchetype>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depreciation_rate: Option<Rate>,
}

/// A recommended re-categorization of one record.
///
/// Created by the engine, mutated afterwards only through the review
/// transitions in [`crate::lifecycle`]. `tax_impact` is fixed at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: String,
    pub record_id: String,
    pub current_category: Option<AtoCategory>,
    pub suggested_category: AtoCategory,
    pub suggestion_type: SuggestionType,
    pub title: String,
    pub description: String,
    pub reason: String,
    pub current_tax_benefit: Money,
    pub suggested_tax_benefit: Money,
    pub tax_impact: Money,
    pub amount: Money,
    pub item_description: String,
    pub confidence: Confidence,
    pub priority: Priority,
    #[serde(default)]
    pub status: SuggestionStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime<Utc>>,
    pub rule_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<SuggestionMetadata>,
}
