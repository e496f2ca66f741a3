use rust_decimal::{Decimal, RoundingStrategy};

use crate::categories::category_label;
use crate::suggestion::Suggestion;
use crate::types::Money;

pub const REPORT_TITLE: &str = "Tax Categorisation Suggestions Report";

/// `$1,234.56` / `-$12.50`. Plain dollars, no locale handling.
pub fn format_currency(amount: Money) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded < Decimal::ZERO;
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}${}.{}", if negative { "-" } else { "" }, grouped, cents)
}

/// Render suggestions, in the order given, as a plain-text report.
pub fn export_suggestions_report(suggestions: &[Suggestion]) -> String {
    let mut out = String::new();
    out.push_str(REPORT_TITLE);
    out.push('\n');
    out.push_str(&"=".repeat(REPORT_TITLE.len()));
    out.push('\n');

    if suggestions.is_empty() {
        out.push_str("No suggestions.\n");
        return out;
    }

    for s in suggestions {
        out.push_str(&format!(
            "{} | {} -> {} | {}\n",
            s.item_description,
            category_label(s.current_category),
            s.suggested_category,
            format_currency(s.tax_impact)
        ));
    }

    let total: Money = suggestions.iter().map(|s| s.tax_impact).sum();
    out.push_str(&format!(
        "Total: {} suggestion(s), net tax impact {}\n",
        suggestions.len(),
        format_currency(total)
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(dec!(0)), "$0.00");
        assert_eq!(format_currency(dec!(5.5)), "$5.50");
        assert_eq!(format_currency(dec!(999.999)), "$1,000.00");
        assert_eq!(format_currency(dec!(1234567.891)), "$1,234,567.89");
        assert_eq!(format_currency(dec!(-12.5)), "-$12.50");
        assert_eq!(format_currency(dec!(-337.5)), "-$337.50");
        assert_eq!(format_currency(dec!(100000)), "$100,000.00");
    }

    #[test]
    fn test_empty_report() {
        let report = export_suggestions_report(&[]);
        assert_eq!(
            report,
            format!("{}\n{}\nNo suggestions.\n", REPORT_TITLE, "=".repeat(REPORT_TITLE.len()))
        );
    }
}
