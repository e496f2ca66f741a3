mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::calc::{BenefitArgs, ClassifyAssetArgs, CompareArgs};
use commands::review::{ApplyArgs, ReviewArgs};
use commands::suggest::{FilterArgs, GenerateArgs, SuggestionsArgs};

/// Tax deduction re-categorization suggestions
#[derive(Parser)]
#[command(
    name = "tally-suggest",
    version,
    about = "Tax deduction re-categorization suggestions",
    long_about = "Evaluates already-categorised expenses and assets against the deduction \
                  rules, proposes re-categorisations ranked by tax impact, and tracks their \
                  review. Input is JSON on --input or stdin; set RUST_LOG for diagnostics."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate ranked suggestions for a set of records
    Generate(GenerateArgs),
    /// Summarise a suggestion list
    Analytics(SuggestionsArgs),
    /// Render a suggestion list as a plain-text report
    Export(SuggestionsArgs),
    /// Filter a suggestion list by status, type and priority
    Filter(FilterArgs),
    /// Accept, reject, ignore or reset one suggestion
    Review(ReviewArgs),
    /// Show the category change applying a suggestion would make
    Apply(ApplyArgs),
    /// Classify an item as a depreciable asset
    ClassifyAsset(ClassifyAssetArgs),
    /// Tax benefit of claiming an amount under one category
    Benefit(BenefitArgs),
    /// Compare the tax benefit of two categories
    Compare(CompareArgs),
    /// List the rule catalog and recategorisation keywords
    Rules,
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn fail(e: Box<dyn std::error::Error>) -> ! {
    eprintln!("{}: {}", "error".red().bold(), e);
    process::exit(1);
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Generate(args) => commands::suggest::run_generate(args),
        Commands::Analytics(args) => commands::suggest::run_analytics(args),
        Commands::Export(args) => match commands::suggest::run_export(args) {
            Ok(report) => {
                print!("{}", report);
                return;
            }
            Err(e) => fail(e),
        },
        Commands::Filter(args) => commands::suggest::run_filter(args),
        Commands::Review(args) => commands::review::run_review(args),
        Commands::Apply(args) => commands::review::run_apply(args),
        Commands::ClassifyAsset(args) => commands::calc::run_classify_asset(args),
        Commands::Benefit(args) => commands::calc::run_benefit(args),
        Commands::Compare(args) => commands::calc::run_compare(args),
        Commands::Rules => commands::suggest::run_rules(),
        Commands::Version => {
            println!("tally-suggest {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => fail(e),
    }
}
