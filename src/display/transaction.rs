//! Transaction display formatting
//!
//! Register and detail views for transactions. Account and category names
//! are looked up by the caller and passed in, so these functions stay pure.

use std::collections::HashMap;

use crate::models::{AccountId, CategoryId, Transaction, TransactionKind};

/// Names used when rendering a register
#[derive(Debug, Default)]
pub struct NameLookup {
    pub accounts: HashMap<AccountId, String>,
    pub categories: HashMap<CategoryId, String>,
}

impl NameLookup {
    fn account(&self, id: AccountId) -> String {
        self.accounts
            .get(&id)
            .cloned()
            .unwrap_or_else(|| id.to_string())
    }

    fn category(&self, id: Option<CategoryId>) -> String {
        match id {
            Some(id) => self
                .categories
                .get(&id)
                .cloned()
                .unwrap_or_else(|| id.to_string()),
            None => "-".to_string(),
        }
    }
}

fn kind_marker(kind: TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Income => "+",
        TransactionKind::Expense => "-",
        TransactionKind::Transfer => "⇄",
    }
}

/// Format one register row
pub fn format_transaction_row(txn: &Transaction, names: &NameLookup, symbol: &str) -> String {
    let account = match txn.destination_account_id {
        Some(destination) => format!(
            "{} → {}",
            names.account(txn.source_account_id),
            names.account(destination)
        ),
        None => names.account(txn.source_account_id),
    };

    format!(
        "{:12} {} {} {:24} {:20} {:16} {:>12}",
        txn.id.to_string(),
        txn.date.format("%Y-%m-%d"),
        kind_marker(txn.kind),
        truncate(&txn.description, 24),
        truncate(&account, 20),
        truncate(&names.category(txn.category_id), 16),
        txn.amount.format_with_symbol(symbol)
    )
}

/// Format a list of transactions as a register
pub fn format_transaction_register(
    transactions: &[Transaction],
    names: &NameLookup,
    symbol: &str,
) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:12} {:10}   {:24} {:20} {:16} {:>12}\n",
        "ID", "Date", "Description", "Account", "Category", "Amount"
    ));
    output.push_str(&"-".repeat(102));
    output.push('\n');

    for txn in transactions {
        output.push_str(&format_transaction_row(txn, names, symbol));
        output.push('\n');
    }

    output
}

/// Format transaction details for display
pub fn format_transaction_details(txn: &Transaction, names: &NameLookup, symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!("Kind:        {}\n", txn.kind));
    output.push_str(&format!("Date:        {}\n", txn.date.format("%Y-%m-%d")));
    output.push_str(&format!(
        "Amount:      {}\n",
        txn.amount.format_with_symbol(symbol)
    ));
    output.push_str(&format!("Description: {}\n", txn.description));
    output.push_str(&format!(
        "Account:     {}\n",
        names.account(txn.source_account_id)
    ));

    if let Some(destination) = txn.destination_account_id {
        output.push_str(&format!("Destination: {}\n", names.account(destination)));
    }

    match txn.category_id {
        Some(_) => output.push_str(&format!(
            "Category:    {}\n",
            names.category(txn.category_id)
        )),
        None => output.push_str("Category:    (uncategorized)\n"),
    }

    if !txn.notes.is_empty() {
        output.push_str(&format!("Notes:       {}\n", txn.notes));
    }

    output
}

/// Pad or cut a string to exactly `max_len` characters
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        format!("{:width$}", s, width = max_len)
    } else {
        let cut: String = s.chars().take(max_len - 3).collect();
        format!("{}...", cut)
    }
}
