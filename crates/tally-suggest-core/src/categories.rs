use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SuggestError;

/// ATO deduction category codes for an individual tax return.
///
/// `Dep` is not a return label of its own: it marks an asset claimed through
/// a decline-in-value schedule rather than written off in the year of
/// purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AtoCategory {
    #[serde(rename = "D1")]
    D1,
    #[serde(rename = "D2")]
    D2,
    #[serde(rename = "D3")]
    D3,
    #[serde(rename = "D4")]
    D4,
    #[serde(rename = "D5")]
    D5,
    #[serde(rename = "D6")]
    D6,
    #[serde(rename = "D7")]
    D7,
    #[serde(rename = "D8")]
    D8,
    #[serde(rename = "D9")]
    D9,
    #[serde(rename = "D10")]
    D10,
    #[serde(rename = "D15")]
    D15,
    #[serde(rename = "DEP")]
    Dep,
}

/// How a category converts an outlay into a deduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryTreatment {
    Immediate,
    LowValuePool,
    DeclineInValue,
}

impl AtoCategory {
    pub const ALL: [AtoCategory; 12] = [
        AtoCategory::D1,
        AtoCategory::D2,
        AtoCategory::D3,
        AtoCategory::D4,
        AtoCategory::D5,
        AtoCategory::D6,
        AtoCategory::D7,
        AtoCategory::D8,
        AtoCategory::D9,
        AtoCategory::D10,
        AtoCategory::D15,
        AtoCategory::Dep,
    ];

    /// The category used for work-related items written off in full.
    pub const IMMEDIATE_DEDUCTION: AtoCategory = AtoCategory::D5;

    /// The low-value pool.
    pub const LOW_VALUE_POOL: AtoCategory = AtoCategory::D6;

    pub fn code(self) -> &'static str {
        match self {
            AtoCategory::D1 => "D1",
            AtoCategory::D2 => "D2",
            AtoCategory::D3 => "D3",
            AtoCategory::D4 => "D4",
            AtoCategory::D5 => "D5",
            AtoCategory::D6 => "D6",
            AtoCategory::D7 => "D7",
            AtoCategory::D8 => "D8",
            AtoCategory::D9 => "D9",
            AtoCategory::D10 => "D10",
            AtoCategory::D15 => "D15",
            AtoCategory::Dep => "DEP",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            AtoCategory::D1 => "Work-related car expenses",
            AtoCategory::D2 => "Work-related travel expenses",
            AtoCategory::D3 => "Work-related clothing, laundry and dry-cleaning",
            AtoCategory::D4 => "Work-related self-education expenses",
            AtoCategory::D5 => "Other work-related expenses",
            AtoCategory::D6 => "Low-value pool deduction",
            AtoCategory::D7 => "Interest deductions",
            AtoCategory::D8 => "Dividend deductions",
            AtoCategory::D9 => "Gifts or donations",
            AtoCategory::D10 => "Cost of managing tax affairs",
            AtoCategory::D15 => "Other deductions",
            AtoCategory::Dep => "Depreciating asset (decline in value)",
        }
    }

    pub fn treatment(self) -> CategoryTreatment {
        match self {
            AtoCategory::D6 => CategoryTreatment::LowValuePool,
            AtoCategory::Dep => CategoryTreatment::DeclineInValue,
            AtoCategory::D1
            | AtoCategory::D2
            | AtoCategory::D3
            | AtoCategory::D4
            | AtoCategory::D5
            | AtoCategory::D7
            | AtoCategory::D8
            | AtoCategory::D9
            | AtoCategory::D10
            | AtoCategory::D15 => CategoryTreatment::Immediate,
        }
    }

    /// Catch-all buckets that usually mean "nobody looked closely".
    pub fn is_generic(self) -> bool {
        matches!(self, AtoCategory::D5 | AtoCategory::D15)
    }
}

impl fmt::Display for AtoCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for AtoCategory {
    type Err = SuggestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();
        AtoCategory::ALL
            .iter()
            .copied()
            .find(|c| c.code() == code)
            .ok_or_else(|| SuggestError::InvalidInput {
                field: "category".into(),
                reason: format!("Unknown ATO category code '{}'", s),
            })
    }
}

/// Label for a possibly-missing category in human-facing text.
pub fn category_label(category: Option<AtoCategory>) -> &'static str {
    category.map(AtoCategory::code).unwrap_or("Uncategorised")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip_through_from_str() {
        for category in AtoCategory::ALL {
            assert_eq!(category.code().parse::<AtoCategory>().unwrap(), category);
        }
    }

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!("dep".parse::<AtoCategory>().unwrap(), AtoCategory::Dep);
        assert_eq!(" d6 ".parse::<AtoCategory>().unwrap(), AtoCategory::D6);
    }

    #[test]
    fn test_unknown_code_rejected() {
        let err = "D42".parse::<AtoCategory>().unwrap_err();
        assert!(matches!(err, SuggestError::InvalidInput { .. }));
    }

    #[test]
    fn test_serializes_as_code() {
        let json = serde_json::to_string(&AtoCategory::Dep).unwrap();
        assert_eq!(json, "\"DEP\"");
        let parsed: AtoCategory = serde_json::from_str("\"D10\"").unwrap();
        assert_eq!(parsed, AtoCategory::D10);
    }

    #[test]
    fn test_treatments() {
        assert_eq!(AtoCategory::D5.treatment(), CategoryTreatment::Immediate);
        assert_eq!(AtoCategory::D6.treatment(), CategoryTreatment::LowValuePool);
        assert_eq!(AtoCategory::Dep.treatment(), CategoryTreatment::DeclineInValue);
    }

    #[test]
    fn test_generic_categories() {
        assert!(AtoCategory::D5.is_generic());
        assert!(AtoCategory::D15.is_generic());
        assert!(!AtoCategory::D3.is_generic());
        assert_eq!(category_label(None), "Uncategorised");
    }
}
