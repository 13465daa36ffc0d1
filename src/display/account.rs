//! Account display formatting
//!
//! Formats accounts for terminal output in table and detail views.

use crate::models::Money;
use crate::services::account::AccountSummary;

/// Format a list of accounts with balances as a table
pub fn format_account_list(summaries: &[AccountSummary], symbol: &str) -> String {
    if summaries.is_empty() {
        return "No accounts found.\n".to_string();
    }

    // Calculate column widths
    let name_width = summaries
        .iter()
        .map(|s| s.account.name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    let type_width = summaries
        .iter()
        .map(|s| s.account.account_type.to_string().len())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:<type_width$}  {:>14}  {}\n",
        "Name",
        "Type",
        "Balance",
        "Status",
        name_width = name_width,
        type_width = type_width,
    ));
    output.push_str(&separator(name_width, type_width));

    for summary in summaries {
        let status = if summary.account.active { "" } else { "Inactive" };

        output.push_str(&format!(
            "{:<name_width$}  {:<type_width$}  {:>14}  {}\n",
            summary.account.name,
            summary.account.account_type,
            summary.balance.format_with_symbol(symbol),
            status,
            name_width = name_width,
            type_width = type_width,
        ));
    }

    // Inactive accounts still hold money, so they count toward the total
    let total: Money = summaries.iter().map(|s| s.balance).sum();

    output.push_str(&separator(name_width, type_width));
    output.push_str(&format!(
        "{:<name_width$}  {:<type_width$}  {:>14}\n",
        "TOTAL",
        "",
        total.format_with_symbol(symbol),
        name_width = name_width,
        type_width = type_width,
    ));

    output
}

fn separator(name_width: usize, type_width: usize) -> String {
    format!(
        "{:-<name_width$}  {:-<type_width$}  {:->14}  {:-<8}\n",
        "",
        "",
        "",
        "",
        name_width = name_width,
        type_width = type_width,
    )
}

/// Format a single account's details
pub fn format_account_details(summary: &AccountSummary, symbol: &str) -> String {
    let account = &summary.account;

    let mut output = String::new();

    output.push_str(&format!("Account: {}\n", account.name));
    output.push_str(&format!("  Type:     {}\n", account.account_type));
    output.push_str(&format!("  ID:       {}\n", account.id));
    output.push_str(&format!(
        "  Active:   {}\n",
        if account.active { "Yes" } else { "No" }
    ));
    output.push_str(&format!("  Icon:     {}\n", account.icon));
    output.push_str(&format!("  Color:    {}\n", account.color));
    output.push('\n');
    output.push_str(&format!(
        "  Initial Balance: {}\n",
        account.initial_balance.format_with_symbol(symbol)
    ));
    output.push_str(&format!(
        "  Current Balance: {}\n",
        summary.balance.format_with_symbol(symbol)
    ));

    output.push('\n');
    output.push_str(&format!(
        "  Created:  {}\n",
        account.created_at.format("%Y-%m-%d %H:%M UTC")
    ));
    output.push_str(&format!(
        "  Modified: {}\n",
        account.updated_at.format("%Y-%m-%d %H:%M UTC")
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Account, AccountType, UserId};

    fn summary(name: &str, balance: i64, active: bool) -> AccountSummary {
        let mut account = Account::new(UserId::from("alice"), name, AccountType::Checking);
        account.active = active;
        AccountSummary {
            account,
            balance: Money::from_cents(balance),
        }
    }

    #[test]
    fn test_format_account_list() {
        let summaries = vec![
            summary("Checking", 100000, true),
            summary("Old Savings", -2550, false),
        ];

        let output = format_account_list(&summaries, "$");
        assert!(output.contains("Checking"));
        assert!(output.contains("Inactive"));
        assert!(output.contains("-$25.50"));
        assert!(output.contains("TOTAL"));
        assert!(output.contains("$974.50"));
    }

    #[test]
    fn test_format_empty_list() {
        assert!(format_account_list(&[], "$").contains("No accounts found"));
    }

    #[test]
    fn test_format_account_details() {
        let output = format_account_details(&summary("My Account", 1000, true), "R$");

        assert!(output.contains("My Account"));
        assert!(output.contains("Checking"));
        assert!(output.contains("Current Balance: R$10.00"));
    }
}
