use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::categories::AtoCategory;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.30 = 30%). Never as percentages.
pub type Rate = Decimal;

/// An already-categorized expense or asset, as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionRecord {
    pub id: String,
    pub vendor: String,
    pub amount: Money,
    /// `None` when the upstream categorizer could not assign a code.
    #[serde(default)]
    pub category: Option<AtoCategory>,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SuggestionRecord {
    /// Text used for keyword matching: vendor followed by the description.
    pub fn match_text(&self) -> String {
        match &self.description {
            Some(desc) if !desc.trim().is_empty() => {
                format!("{} {}", self.vendor, desc).to_lowercase()
            }
            _ => self.vendor.to_lowercase(),
        }
    }

    /// Human-facing label: the description when present, else the vendor.
    pub fn display_name(&self) -> &str {
        match &self.description {
            Some(desc) if !desc.trim().is_empty() => desc,
            _ => &self.vendor,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkArrangement {
    #[default]
    Office,
    Remote,
    Hybrid,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmploymentType {
    #[default]
    FullTime,
    PartTime,
    Casual,
    Contractor,
    SoleTrader,
}

/// Income profile and situational flags of the taxpayer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxpayerProfile {
    pub taxable_income: Money,
    pub occupation: String,
    pub age: u32,
    pub has_vehicle: bool,
    pub work_arrangement: WorkArrangement,
    pub has_investments: bool,
    #[serde(default)]
    pub investment_types: Vec<String>,
    pub is_studying: bool,
    pub has_home_office: bool,
    pub employment_type: EmploymentType,
    #[serde(default)]
    pub years_with_accountant: u32,
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
