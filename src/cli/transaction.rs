//! Transaction CLI commands
//!
//! Implements CLI commands for transaction management and the monthly
//! summary.

use chrono::Datelike;
use clap::Subcommand;

use crate::config::Settings;
use crate::display::summary::format_monthly_summary;
use crate::display::transaction::{
    format_transaction_details, format_transaction_register, NameLookup,
};
use crate::error::{TallyError, TallyResult};
use crate::models::{CategoryId, TransactionKind, UserId};
use crate::services::{
    monthly_summary, AccountService, CategoryService, CreateTransactionInput, TransactionFilter,
    TransactionPatch, TransactionService,
};
use crate::storage::Storage;

use super::{parse_amount, parse_date};

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Record a new transaction
    Add {
        /// income, expense or transfer
        kind: String,
        /// Account name or ID (the source of a transfer)
        account: String,
        /// Positive amount (e.g., "45.99")
        #[arg(allow_hyphen_values = true)]
        amount: String,
        /// Short description
        description: String,
        /// Receiving account of a transfer
        #[arg(long)]
        to: Option<String>,
        /// Category name or ID
        #[arg(short, long)]
        category: Option<String>,
        /// Transaction date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Free-form notes
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// List transactions, newest first
    List {
        /// Filter by kind
        #[arg(short, long)]
        kind: Option<String>,
        /// Filter by account name or ID
        #[arg(short, long)]
        account: Option<String>,
        /// Filter by category name or ID
        #[arg(short = 'C', long)]
        category: Option<String>,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
    /// Show transaction details
    Show {
        /// Transaction ID
        id: String,
    },
    /// Change a transaction; the result is validated as a whole
    Edit {
        /// Transaction ID
        id: String,
        #[arg(short, long)]
        kind: Option<String>,
        /// New source account
        #[arg(short, long)]
        account: Option<String>,
        /// New transfer destination
        #[arg(long, conflicts_with = "clear_to")]
        to: Option<String>,
        /// Remove the transfer destination
        #[arg(long)]
        clear_to: bool,
        #[arg(short, long, conflicts_with = "clear_category")]
        category: Option<String>,
        /// Remove the category
        #[arg(long)]
        clear_category: bool,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        amount: Option<String>,
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: String,
    },
    /// Income, expenses and spending by category for one month
    Summary {
        /// Month (1-12), defaults to the current month
        #[arg(short, long)]
        month: Option<u32>,
        /// Year, defaults to the current year
        #[arg(short, long)]
        year: Option<i32>,
    },
}

fn parse_kind(kind: &str) -> TallyResult<TransactionKind> {
    TransactionKind::parse(kind).ok_or_else(|| {
        TallyError::InvalidInput(format!(
            "Invalid transaction kind: '{}'. Use income, expense or transfer",
            kind
        ))
    })
}

/// Handle a transaction command
pub fn handle_transaction_command(
    storage: &Storage,
    settings: &Settings,
    owner: &UserId,
    cmd: TransactionCommands,
) -> TallyResult<()> {
    let service = TransactionService::new(storage);
    let account_service = AccountService::new(storage);
    let category_service = CategoryService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    let resolve_category = |identifier: &str| -> TallyResult<CategoryId> {
        Ok(category_service.resolve(owner, identifier, None)?.id)
    };

    match cmd {
        TransactionCommands::Add {
            kind,
            account,
            amount,
            description,
            to,
            category,
            date,
            notes,
        } => {
            let source = account_service.resolve(owner, &account)?;
            let destination = match to {
                Some(to) => Some(account_service.resolve(owner, &to)?.id),
                None => None,
            };
            let category_id = category.as_deref().map(resolve_category).transpose()?;
            let date = match date {
                Some(date) => parse_date(&date)?,
                None => chrono::Local::now().date_naive(),
            };

            let txn = service.create(
                owner,
                CreateTransactionInput {
                    kind: parse_kind(&kind)?,
                    source_account_id: source.id,
                    destination_account_id: destination,
                    category_id,
                    description,
                    amount: parse_amount(&amount)?,
                    date,
                    notes,
                },
            )?;

            println!("Created transaction:");
            println!("  ID:     {}", txn.id);
            println!("  Kind:   {}", txn.kind);
            println!("  Date:   {}", txn.date);
            println!("  Amount: {}", txn.amount.format_with_symbol(symbol));

            let balance = account_service.balance(owner, source.id)?;
            println!(
                "  {} balance: {}",
                source.name,
                balance.format_with_symbol(symbol)
            );
        }

        TransactionCommands::List {
            kind,
            account,
            category,
            from,
            to,
            limit,
        } => {
            let mut filter = TransactionFilter::new().limit(limit);

            if let Some(kind) = kind {
                filter = filter.kind(parse_kind(&kind)?);
            }
            if let Some(account) = account {
                filter = filter.account(account_service.resolve(owner, &account)?.id);
            }
            if let Some(category) = category {
                filter = filter.category(resolve_category(&category)?);
            }
            if let Some(from) = from {
                filter.start_date = Some(parse_date(&from)?);
            }
            if let Some(to) = to {
                filter.end_date = Some(parse_date(&to)?);
            }

            let transactions = service.list(owner, &filter)?;
            let names = name_lookup(&account_service, &category_service, owner)?;

            print!(
                "{}",
                format_transaction_register(&transactions, &names, symbol)
            );
            println!("\nShowing {} transactions", transactions.len());
        }

        TransactionCommands::Show { id } => {
            let txn = service.find(owner, &id)?;
            let names = name_lookup(&account_service, &category_service, owner)?;
            print!("{}", format_transaction_details(&txn, &names, symbol));
        }

        TransactionCommands::Edit {
            id,
            kind,
            account,
            to,
            clear_to,
            category,
            clear_category,
            description,
            amount,
            date,
            notes,
        } => {
            let txn = service.find(owner, &id)?;

            let mut patch = TransactionPatch {
                kind: kind.as_deref().map(parse_kind).transpose()?,
                description,
                amount: amount.as_deref().map(parse_amount).transpose()?,
                date: date.as_deref().map(parse_date).transpose()?,
                notes,
                ..Default::default()
            };
            if let Some(account) = account {
                patch.source_account_id = Some(account_service.resolve(owner, &account)?.id);
            }
            if clear_to {
                patch.destination_account_id = Some(None);
            } else if let Some(to) = to {
                patch.destination_account_id =
                    Some(Some(account_service.resolve(owner, &to)?.id));
            }
            if clear_category {
                patch.category_id = Some(None);
            } else if let Some(category) = category {
                patch.category_id = Some(Some(resolve_category(&category)?));
            }

            if patch.is_empty() {
                println!("No changes specified.");
                return Ok(());
            }

            let updated = service.update(owner, txn.id, patch)?;
            println!("Updated transaction: {}", updated.id);
        }

        TransactionCommands::Delete { id } => {
            let txn = service.find(owner, &id)?;
            let deleted = service.delete(owner, txn.id)?;
            println!(
                "Deleted transaction: {} ({} {})",
                deleted.id,
                deleted.date,
                deleted.amount.format_with_symbol(symbol)
            );
        }

        TransactionCommands::Summary { month, year } => {
            let today = chrono::Local::now().date_naive();
            let summary = monthly_summary(
                storage,
                owner,
                month.unwrap_or_else(|| today.month()),
                year.unwrap_or_else(|| today.year()),
            )?;
            print!("{}", format_monthly_summary(&summary, symbol));
        }
    }

    Ok(())
}

fn name_lookup(
    accounts: &AccountService<'_>,
    categories: &CategoryService<'_>,
    owner: &UserId,
) -> TallyResult<NameLookup> {
    Ok(NameLookup {
        accounts: accounts
            .list(owner, true)?
            .into_iter()
            .map(|a| (a.id, a.name))
            .collect(),
        categories: categories
            .list(owner)?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect(),
    })
}
