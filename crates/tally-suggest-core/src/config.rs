use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::assets::ASSET_FLOOR;
use crate::error::SuggestError;
use crate::types::{Money, Rate};
use crate::SuggestResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One step of a progressive income tax scale. Covers incomes in
/// `(min_income, max_income]`; the first bracket also covers zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub min_income: Money,
    pub max_income: Option<Money>,
    pub rate: Rate,
}

/// Tunable thresholds and rates used by the benefit calculator and rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub brackets: Vec<TaxBracket>,
    /// Floor below which an item is written off immediately and never pooled.
    pub instant_write_off_threshold: Money,
    /// Ceiling (exclusive) for low-value pool eligibility.
    pub pool_threshold: Money,
    /// Amount at or above which an immediate write-off is a compliance flag.
    pub large_asset_threshold: Money,
    pub pool_first_year: bool,
    pub pool_first_year_rate: Rate,
    pub pool_subsequent_rate: Rate,
    pub generic_depreciation_rate: Rate,
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// 2024-25 resident individual rates.
pub fn default_brackets() -> Vec<TaxBracket> {
    vec![
        TaxBracket {
            min_income: Decimal::ZERO,
            max_income: Some(dec!(18_200)),
            rate: Decimal::ZERO,
        },
        TaxBracket {
            min_income: dec!(18_200),
            max_income: Some(dec!(45_000)),
            rate: dec!(0.16),
        },
        TaxBracket {
            min_income: dec!(45_000),
            max_income: Some(dec!(135_000)),
            rate: dec!(0.30),
        },
        TaxBracket {
            min_income: dec!(135_000),
            max_income: Some(dec!(190_000)),
            rate: dec!(0.37),
        },
        TaxBracket {
            min_income: dec!(190_000),
            max_income: None,
            rate: dec!(0.45),
        },
    ]
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            brackets: default_brackets(),
            instant_write_off_threshold: dec!(300),
            pool_threshold: dec!(1_000),
            large_asset_threshold: dec!(5_000),
            pool_first_year: true,
            pool_first_year_rate: dec!(0.1875),
            pool_subsequent_rate: dec!(0.375),
            generic_depreciation_rate: dec!(0.20),
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

impl EngineConfig {
    pub fn validate(&self) -> SuggestResult<()> {
        validate_brackets(&self.brackets)?;

        if self.instant_write_off_threshold <= Decimal::ZERO {
            return Err(invalid(
                "instant_write_off_threshold",
                "Instant write-off threshold must be positive",
            ));
        }
        if self.pool_threshold <= self.instant_write_off_threshold {
            return Err(invalid(
                "pool_threshold",
                "Pool threshold must exceed the instant write-off threshold",
            ));
        }
        // depreciation rules classify everything at or above the pool threshold
        if self.pool_threshold < ASSET_FLOOR {
            return Err(invalid(
                "pool_threshold",
                "Pool threshold cannot be below the depreciable asset floor of $300",
            ));
        }
        if self.large_asset_threshold < self.pool_threshold {
            return Err(invalid(
                "large_asset_threshold",
                "Large asset threshold cannot be below the pool threshold",
            ));
        }

        for (field, rate) in [
            ("pool_first_year_rate", self.pool_first_year_rate),
            ("pool_subsequent_rate", self.pool_subsequent_rate),
            ("generic_depreciation_rate", self.generic_depreciation_rate),
        ] {
            check_rate(field, rate)?;
        }
        Ok(())
    }
}

fn validate_brackets(brackets: &[TaxBracket]) -> SuggestResult<()> {
    let first = brackets
        .first()
        .ok_or_else(|| invalid("brackets", "At least one tax bracket is required"))?;
    if first.min_income != Decimal::ZERO {
        return Err(invalid("brackets", "First bracket must start at zero income"));
    }

    for (i, bracket) in brackets.iter().enumerate() {
        check_rate("brackets.rate", bracket.rate)?;
        let is_last = i + 1 == brackets.len();
        match (bracket.max_income, is_last) {
            (None, true) => {}
            (None, false) => {
                return Err(invalid(
                    "brackets",
                    "Only the last bracket may be open-ended",
                ));
            }
            (Some(_), true) => {
                return Err(invalid("brackets", "Last bracket must be open-ended"));
            }
            (Some(max), false) => {
                if max <= bracket.min_income {
                    return Err(invalid(
                        "brackets",
                        "Bracket upper bound must exceed its lower bound",
                    ));
                }
                if brackets[i + 1].min_income != max {
                    return Err(invalid(
                        "brackets",
                        "Brackets must be contiguous and in ascending order",
                    ));
                }
            }
        }
    }
    Ok(())
}

pub(crate) fn check_rate(field: &str, rate: Rate) -> SuggestResult<()> {
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(invalid(field, "Rate must be between 0 and 1"));
    }
    Ok(())
}

fn invalid(field: &str, reason: &str) -> SuggestError {
    SuggestError::InvalidInput {
        field: field.into(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        EngineConfig::default().validate().unwrap();
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"large_asset_threshold": "2500"}"#).unwrap();
        assert_eq!(config.large_asset_threshold, dec!(2500));
        assert_eq!(config.pool_threshold, dec!(1000));
        assert_eq!(config.brackets.len(), 5);
    }

    #[test]
    fn test_rejects_inverted_thresholds() {
        let config = EngineConfig {
            pool_threshold: dec!(200),
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_pool_threshold_below_asset_floor() {
        let config = EngineConfig {
            instant_write_off_threshold: dec!(100),
            pool_threshold: dec!(200),
            large_asset_threshold: dec!(200),
            ..EngineConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            SuggestError::InvalidInput { ref field, .. } if field == "pool_threshold"
        ));

        let at_floor = EngineConfig {
            instant_write_off_threshold: dec!(100),
            pool_threshold: ASSET_FLOOR,
            large_asset_threshold: ASSET_FLOOR,
            ..EngineConfig::default()
        };
        at_floor.validate().unwrap();
    }

    #[test]
    fn test_rejects_gap_between_brackets() {
        let mut config = EngineConfig::default();
        config.brackets[2].min_income = dec!(50_000);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_closed_last_bracket() {
        let mut config = EngineConfig::default();
        config.brackets[4].max_income = Some(dec!(1_000_000));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_rate_above_one() {
        let config = EngineConfig {
            pool_first_year_rate: dec!(1.5),
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
