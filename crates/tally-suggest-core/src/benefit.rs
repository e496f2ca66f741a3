use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::categories::{AtoCategory, CategoryTreatment};
use crate::config::{check_rate, EngineConfig, TaxBracket};
use crate::error::SuggestError;
use crate::types::{Money, Rate};
use crate::SuggestResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// The deduction regime an amount is claimed under, with its parameters
/// resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeductionTreatment {
    Immediate,
    LowValuePool { first_year: bool },
    DeclineInValue { rate: Rate },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenefitComparison {
    pub current_benefit: Money,
    pub suggested_benefit: Money,
    /// `suggested_benefit - current_benefit`. Negative means the current
    /// treatment is already the better one.
    pub difference: Money,
}

// ---------------------------------------------------------------------------
// Bracket lookup
// ---------------------------------------------------------------------------

/// Marginal rate of the bracket that contains `taxable_income`.
pub fn marginal_rate(taxable_income: Money, brackets: &[TaxBracket]) -> SuggestResult<Rate> {
    if taxable_income < Decimal::ZERO {
        return Err(SuggestError::InvalidInput {
            field: "taxable_income".into(),
            reason: "Taxable income cannot be negative".into(),
        });
    }

    brackets
        .iter()
        .find(|b| match b.max_income {
            Some(max) => taxable_income <= max,
            None => true,
        })
        .map(|b| b.rate)
        .ok_or_else(|| {
            SuggestError::CalculationError(format!(
                "No tax bracket covers taxable income {}",
                taxable_income
            ))
        })
}

// ---------------------------------------------------------------------------
// Treatments
// ---------------------------------------------------------------------------

/// Resolve the treatment a category implies. Decline-in-value categories use
/// the generic depreciation rate; callers that know the asset pass an explicit
/// [`DeductionTreatment::DeclineInValue`] instead.
pub fn treatment_for(
    category: AtoCategory,
    first_year: bool,
    config: &EngineConfig,
) -> DeductionTreatment {
    match category.treatment() {
        CategoryTreatment::Immediate => DeductionTreatment::Immediate,
        CategoryTreatment::LowValuePool => DeductionTreatment::LowValuePool { first_year },
        CategoryTreatment::DeclineInValue => DeductionTreatment::DeclineInValue {
            rate: config.generic_depreciation_rate,
        },
    }
}

/// Portion of `amount` deductible this year under `treatment`.
pub fn deductible_amount(amount: Money, treatment: DeductionTreatment, config: &EngineConfig) -> Money {
    match treatment {
        DeductionTreatment::Immediate => amount,
        DeductionTreatment::LowValuePool { first_year: true } => {
            amount * config.pool_first_year_rate
        }
        DeductionTreatment::LowValuePool { first_year: false } => {
            amount * config.pool_subsequent_rate
        }
        DeductionTreatment::DeclineInValue { rate } => amount * rate,
    }
}

// ---------------------------------------------------------------------------
// Benefit
// ---------------------------------------------------------------------------

/// Tax saved by claiming `amount` under `treatment` at `rate`, rounded to
/// cents.
pub fn calculate_treatment_tax_benefit(
    amount: Money,
    treatment: DeductionTreatment,
    rate: Rate,
    config: &EngineConfig,
) -> SuggestResult<Money> {
    validate_amount(amount)?;
    check_rate("marginal_rate", rate)?;
    if let DeductionTreatment::DeclineInValue { rate: dep_rate } = treatment {
        check_rate("depreciation_rate", dep_rate)?;
    }

    let benefit = deductible_amount(amount, treatment, config) * rate;
    Ok(to_cents(benefit))
}

/// Tax saved by claiming `amount` under `category` for a taxpayer on
/// `taxable_income`.
pub fn calculate_category_tax_benefit(
    amount: Money,
    category: AtoCategory,
    taxable_income: Money,
    first_year: bool,
    config: &EngineConfig,
) -> SuggestResult<Money> {
    let rate = marginal_rate(taxable_income, &config.brackets)?;
    calculate_treatment_tax_benefit(amount, treatment_for(category, first_year, config), rate, config)
}

/// Compare the current and suggested treatments of the same amount.
///
/// `current` of `None` means the amount is not being claimed at all.
/// `prior_year_rate`, when given, replaces the marginal rate for the current
/// treatment (the amount was claimed in an earlier year at that rate).
pub fn compare_treatments(
    amount: Money,
    current: Option<DeductionTreatment>,
    suggested: DeductionTreatment,
    taxable_income: Money,
    prior_year_rate: Option<Rate>,
    config: &EngineConfig,
) -> SuggestResult<BenefitComparison> {
    validate_amount(amount)?;
    let rate = marginal_rate(taxable_income, &config.brackets)?;

    let current_benefit = match current {
        Some(treatment) => {
            calculate_treatment_tax_benefit(amount, treatment, prior_year_rate.unwrap_or(rate), config)?
        }
        None => Decimal::ZERO,
    };
    let suggested_benefit = calculate_treatment_tax_benefit(amount, suggested, rate, config)?;

    Ok(BenefitComparison {
        current_benefit,
        suggested_benefit,
        difference: suggested_benefit - current_benefit,
    })
}

/// Category-level wrapper over [`compare_treatments`].
pub fn compare_tax_benefits(
    amount: Money,
    current: Option<AtoCategory>,
    suggested: AtoCategory,
    taxable_income: Money,
    first_year: bool,
    prior_year_rate: Option<Rate>,
    config: &EngineConfig,
) -> SuggestResult<BenefitComparison> {
    compare_treatments(
        amount,
        current.map(|c| treatment_for(c, first_year, config)),
        treatment_for(suggested, first_year, config),
        taxable_income,
        prior_year_rate,
        config,
    )
}

fn validate_amount(amount: Money) -> SuggestResult<()> {
    if amount < Decimal::ZERO {
        return Err(SuggestError::InvalidInput {
            field: "amount".into(),
            reason: "Amount cannot be negative".into(),
        });
    }
    Ok(())
}

pub(crate) fn to_cents(value: Money) -> Money {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
