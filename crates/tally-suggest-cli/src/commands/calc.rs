use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use tally_suggest_core::assets;
use tally_suggest_core::benefit::{self, compare_tax_benefits};
use tally_suggest_core::{AtoCategory, EngineConfig};

use crate::input;

/// Arguments for asset classification
#[derive(Args)]
pub struct ClassifyAssetArgs {
    /// Item description (vendor and/or product)
    #[arg(long)]
    pub description: String,

    /// Purchase amount in dollars
    #[arg(long)]
    pub amount: Decimal,
}

/// Arguments for a single-category benefit calculation
#[derive(Args)]
pub struct BenefitArgs {
    /// Amount claimed
    #[arg(long)]
    pub amount: Decimal,

    /// ATO category code (D1..D15, DEP)
    #[arg(long)]
    pub category: AtoCategory,

    /// Taxable income of the taxpayer
    #[arg(long)]
    pub income: Decimal,

    /// Use the subsequent-year pool rate instead of the first-year rate
    #[arg(long)]
    pub subsequent_year: bool,

    /// Engine configuration (JSON or YAML)
    #[arg(long)]
    pub config: Option<String>,
}

/// Arguments for comparing two categories
#[derive(Args)]
pub struct CompareArgs {
    /// Amount claimed
    #[arg(long)]
    pub amount: Decimal,

    /// Current ATO category code; omit for an unclaimed amount
    #[arg(long)]
    pub current: Option<AtoCategory>,

    /// Suggested ATO category code
    #[arg(long)]
    pub suggested: AtoCategory,

    /// Taxable income of the taxpayer
    #[arg(long)]
    pub income: Decimal,

    /// Use the subsequent-year pool rate instead of the first-year rate
    #[arg(long)]
    pub subsequent_year: bool,

    /// Marginal rate the current treatment was claimed at (e.g. 0.325)
    #[arg(long)]
    pub prior_year_rate: Option<Decimal>,

    /// Engine configuration (JSON or YAML)
    #[arg(long)]
    pub config: Option<String>,
}

fn load_config(path: Option<&str>) -> Result<EngineConfig, Box<dyn std::error::Error>> {
    match path {
        Some(p) => input::file::read_config(p),
        None => Ok(EngineConfig::default()),
    }
}

pub fn run_classify_asset(args: ClassifyAssetArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let asset = assets::is_depreciable_asset(&args.description, args.amount);
    Ok(serde_json::json!({
        "description": args.description,
        "amount": args.amount,
        "depreciable": asset.is_some(),
        "asset": asset,
    }))
}

pub fn run_benefit(args: BenefitArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let config = load_config(args.config.as_deref())?;
    let first_year = !args.subsequent_year;

    let rate = benefit::marginal_rate(args.income, &config.brackets)?;
    let treatment = benefit::treatment_for(args.category, first_year, &config);
    let tax_benefit = benefit::calculate_category_tax_benefit(
        args.amount,
        args.category,
        args.income,
        first_year,
        &config,
    )?;

    Ok(serde_json::json!({
        "category": args.category,
        "treatment": treatment,
        "marginal_rate": rate,
        "deductible_amount": benefit::deductible_amount(args.amount, treatment, &config),
        "tax_benefit": tax_benefit,
    }))
}

pub fn run_compare(args: CompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let config = load_config(args.config.as_deref())?;
    let result = compare_tax_benefits(
        args.amount,
        args.current,
        args.suggested,
        args.income,
        !args.subsequent_year,
        args.prior_year_rate,
        &config,
    )?;
    Ok(serde_json::to_value(result)?)
}
