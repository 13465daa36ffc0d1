//! Monthly summary formatting

use crate::models::Money;
use crate::services::summary::MonthlySummary;

const BAR_WIDTH: usize = 20;

/// Create a simple bar chart representation
pub fn format_bar(value: Money, max_value: Money, width: usize) -> String {
    if !max_value.is_positive() || !value.is_positive() {
        return " ".repeat(width);
    }

    let filled = ((value.cents() as f64 / max_value.cents() as f64) * width as f64).round() as usize;
    let filled = filled.min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Format a separator line
fn separator(width: usize) -> String {
    "─".repeat(width)
}

/// Format a month's totals and its expense breakdown
pub fn format_monthly_summary(summary: &MonthlySummary, symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Summary for {:04}-{:02}\n",
        summary.year, summary.month
    ));
    output.push_str(&separator(56));
    output.push('\n');
    output.push_str(&format!(
        "  Income:   {:>14}\n",
        summary.total_income.format_with_symbol(symbol)
    ));
    output.push_str(&format!(
        "  Expenses: {:>14}\n",
        summary.total_expense.format_with_symbol(symbol)
    ));
    output.push_str(&format!(
        "  Net:      {:>14}\n",
        summary.net.format_with_symbol(symbol)
    ));

    if summary.by_category.is_empty() {
        return output;
    }

    output.push('\n');
    output.push_str("Expenses by category\n");
    output.push_str(&separator(56));
    output.push('\n');

    let name_width = summary
        .by_category
        .iter()
        .map(|g| g.name.chars().count())
        .max()
        .unwrap_or(8)
        .max(8);
    let largest = summary.by_category[0].total;

    for group in &summary.by_category {
        output.push_str(&format!(
            "  {:<name_width$}  {:>12}  {}\n",
            group.name,
            group.total.format_with_symbol(symbol),
            format_bar(group.total, largest, BAR_WIDTH),
            name_width = name_width,
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CategoryId;
    use crate::services::summary::CategorySpending;

    #[test]
    fn test_format_bar() {
        let bar = format_bar(Money::from_cents(50), Money::from_cents(100), 10);
        assert_eq!(bar, "█████░░░░░");
        assert_eq!(format_bar(Money::zero(), Money::zero(), 4), "    ");
    }

    #[test]
    fn test_format_monthly_summary() {
        let summary = MonthlySummary {
            month: 3,
            year: 2025,
            total_income: Money::from_cents(500000),
            total_expense: Money::from_cents(17500),
            net: Money::from_cents(482500),
            by_category: vec![
                CategorySpending {
                    category_id: CategoryId::new(),
                    name: "Fuel".into(),
                    icon: "local_gas_station".into(),
                    color: "#6B7280".into(),
                    total: Money::from_cents(10000),
                },
                CategorySpending {
                    category_id: CategoryId::new(),
                    name: "Food".into(),
                    icon: "restaurant".into(),
                    color: "#6B7280".into(),
                    total: Money::from_cents(7500),
                },
            ],
        };

        let output = format_monthly_summary(&summary, "$");
        assert!(output.contains("Summary for 2025-03"));
        assert!(output.contains("$5000.00"));
        assert!(output.contains("$4825.00"));
        assert!(output.find("Fuel").unwrap() < output.find("Food").unwrap());
    }
}
