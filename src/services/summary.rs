//! Monthly summary
//!
//! Income and expense totals for one calendar month, with expenses broken
//! down by category.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{TallyError, TallyResult};
use crate::models::{CategoryId, Money, TransactionKind, UserId};
use crate::storage::Storage;

use super::transaction::{TransactionFilter, TransactionService};

/// Expense total of one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySpending {
    pub category_id: CategoryId,
    pub name: String,
    pub icon: String,
    pub color: String,
    pub total: Money,
}

/// Totals for one month
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlySummary {
    pub month: u32,
    pub year: i32,
    pub total_income: Money,
    pub total_expense: Money,
    /// Income minus expense
    pub net: Money,
    /// Categorized expenses, largest first; uncategorized spending is only
    /// in `total_expense`
    pub by_category: Vec<CategorySpending>,
}

/// First and last day of a month
pub fn month_bounds(month: u32, year: i32) -> TallyResult<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| TallyError::InvalidInput(format!("no such month: {}-{}", year, month)))?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(|| TallyError::InvalidInput(format!("year out of range: {}", year)))?;

    let end = next
        .pred_opt()
        .ok_or_else(|| TallyError::InvalidInput(format!("year out of range: {}", year)))?;
    Ok((start, end))
}

/// Compute `owner`'s summary for `month` of `year`
///
/// Transfers move money between the owner's own accounts and count as
/// neither income nor expense.
pub fn monthly_summary(
    storage: &Storage,
    owner: &UserId,
    month: u32,
    year: i32,
) -> TallyResult<MonthlySummary> {
    let (start, end) = month_bounds(month, year)?;
    let transactions = TransactionService::new(storage)
        .list(owner, &TransactionFilter::new().date_range(start, end))?;

    let mut total_income = Money::zero();
    let mut total_expense = Money::zero();
    let mut per_category: HashMap<CategoryId, Money> = HashMap::new();

    for txn in &transactions {
        match txn.kind {
            TransactionKind::Income => total_income += txn.amount,
            TransactionKind::Expense => {
                total_expense += txn.amount;
                if let Some(category_id) = txn.category_id {
                    *per_category.entry(category_id).or_default() += txn.amount;
                }
            }
            TransactionKind::Transfer => {}
        }
    }

    let mut by_category = Vec::with_capacity(per_category.len());
    for (category_id, total) in per_category {
        if let Some(category) = storage.categories.get(category_id)? {
            by_category.push(CategorySpending {
                category_id,
                name: category.name,
                icon: category.icon,
                color: category.color,
                total,
            });
        }
    }
    by_category.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.name.cmp(&b.name)));

    Ok(MonthlySummary {
        month,
        year,
        total_income,
        total_expense,
        net: total_income - total_expense,
        by_category,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::TallyPaths;
    use crate::models::{Account, AccountType, Category, CategoryKind};
    use crate::services::transaction::CreateTransactionInput;
    use tempfile::TempDir;

    fn alice() -> UserId {
        UserId::from("alice")
    }

    fn record(
        storage: &Storage,
        kind: TransactionKind,
        account: &Account,
        category: Option<&Category>,
        cents: i64,
        date: NaiveDate,
    ) {
        let destination = if kind == TransactionKind::Transfer {
            let other = Account::new(alice(), format!("Other {}", cents), AccountType::Savings);
            storage.accounts.insert_unique(other.clone()).unwrap();
            Some(other.id)
        } else {
            None
        };

        TransactionService::new(storage)
            .create(
                &alice(),
                CreateTransactionInput {
                    kind,
                    source_account_id: account.id,
                    destination_account_id: destination,
                    category_id: category.map(|c| c.id),
                    description: "entry".into(),
                    amount: Money::from_cents(cents),
                    date,
                    notes: None,
                },
            )
            .unwrap();
    }

    #[test]
    fn test_month_bounds() {
        let (start, end) = month_bounds(2, 2024).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

        let (_, end) = month_bounds(12, 2025).unwrap();
        assert_eq!(end, NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());

        assert!(matches!(month_bounds(13, 2025), Err(TallyError::InvalidInput(_))));
    }

    #[test]
    fn test_summary_totals_and_groups() {
        let temp_dir = TempDir::new().unwrap();
        let storage = Storage::new(TallyPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();

        let wallet = Account::new(alice(), "Wallet", AccountType::Cash);
        storage.accounts.insert_unique(wallet.clone()).unwrap();
        let food = Category::new(alice(), "Food", CategoryKind::Expense);
        let fuel = Category::new(alice(), "Fuel", CategoryKind::Expense);
        storage.categories.insert_unique(food.clone()).unwrap();
        storage.categories.insert_unique(fuel.clone()).unwrap();

        let in_march = |day| NaiveDate::from_ymd_opt(2025, 3, day).unwrap();
        record(&storage, TransactionKind::Income, &wallet, None, 500000, in_march(5));
        record(&storage, TransactionKind::Expense, &wallet, Some(&food), 3000, in_march(6));
        record(&storage, TransactionKind::Expense, &wallet, Some(&food), 4500, in_march(20));
        record(&storage, TransactionKind::Expense, &wallet, Some(&fuel), 10000, in_march(31));
        record(&storage, TransactionKind::Expense, &wallet, None, 999, in_march(1));
        record(&storage, TransactionKind::Transfer, &wallet, None, 20000, in_march(15));
        // Outside the month
        record(
            &storage,
            TransactionKind::Expense,
            &wallet,
            Some(&food),
            7777,
            NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
        );

        let summary = monthly_summary(&storage, &alice(), 3, 2025).unwrap();

        assert_eq!(summary.month, 3);
        assert_eq!(summary.year, 2025);
        assert_eq!(summary.total_income.cents(), 500000);
        assert_eq!(summary.total_expense.cents(), 3000 + 4500 + 10000 + 999);
        assert_eq!(summary.net.cents(), 500000 - 18499);

        let groups: Vec<_> = summary
            .by_category
            .iter()
            .map(|g| (g.name.as_str(), g.total.cents()))
            .collect();
        assert_eq!(groups, vec![("Fuel", 10000), ("Food", 7500)]);
        assert_eq!(summary.by_category[0].icon, "more_horiz");
    }

    #[test]
    fn test_empty_month() {
        let temp_dir = TempDir::new().unwrap();
        let storage = Storage::new(TallyPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();

        let summary = monthly_summary(&storage, &alice(), 1, 2025).unwrap();
        assert!(summary.total_income.is_zero());
        assert!(summary.net.is_zero());
        assert!(summary.by_category.is_empty());
    }
}
