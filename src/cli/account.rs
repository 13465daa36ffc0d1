//! Account CLI commands
//!
//! Implements CLI commands for account management.

use clap::Subcommand;

use crate::config::Settings;
use crate::display::account::{format_account_details, format_account_list};
use crate::error::{TallyError, TallyResult};
use crate::models::{AccountType, UserId};
use crate::services::{AccountService, AccountSummary, CreateAccountInput};
use crate::storage::Storage;

use super::parse_amount;

/// Account subcommands
#[derive(Subcommand)]
pub enum AccountCommands {
    /// Create a new account
    Create {
        /// Account name
        name: String,
        /// Account type (cash, checking, savings, credit, debit, investment, other)
        #[arg(short = 't', long, default_value = "cash")]
        account_type: String,
        /// Initial balance (e.g., "1000.00" or "1000")
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        balance: String,
        /// Display icon
        #[arg(long)]
        icon: Option<String>,
        /// Display color (#RRGGBB)
        #[arg(long)]
        color: Option<String>,
    },
    /// List accounts with their current balances
    List {
        /// Include inactive accounts
        #[arg(short, long)]
        all: bool,
    },
    /// Show account details
    Show {
        /// Account name or ID
        account: String,
    },
    /// Hide an account from day-to-day use
    Deactivate {
        /// Account name or ID
        account: String,
    },
    /// Bring back an inactive account
    Activate {
        /// Account name or ID
        account: String,
    },
    /// Delete an account with no transactions
    Delete {
        /// Account name or ID
        account: String,
    },
}

/// Handle an account command
pub fn handle_account_command(
    storage: &Storage,
    settings: &Settings,
    owner: &UserId,
    cmd: AccountCommands,
) -> TallyResult<()> {
    let service = AccountService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        AccountCommands::Create {
            name,
            account_type,
            balance,
            icon,
            color,
        } => {
            let account_type = AccountType::parse(&account_type).ok_or_else(|| {
                TallyError::InvalidInput(format!(
                    "Invalid account type: '{}'. Valid types: cash, checking, savings, credit, debit, investment, other",
                    account_type
                ))
            })?;

            let account = service.create(
                owner,
                CreateAccountInput {
                    name,
                    account_type,
                    initial_balance: parse_amount(&balance)?,
                    icon,
                    color,
                },
            )?;

            println!("Created account: {}", account.name);
            println!("  Type:            {}", account.account_type);
            println!(
                "  Initial Balance: {}",
                account.initial_balance.format_with_symbol(symbol)
            );
            println!("  ID:              {}", account.id);
        }

        AccountCommands::List { all } => {
            let summaries = service.list_with_balances(owner, all)?;
            print!("{}", format_account_list(&summaries, symbol));
        }

        AccountCommands::Show { account } => {
            let account = service.resolve(owner, &account)?;
            let balance = service.balance(owner, account.id)?;
            print!(
                "{}",
                format_account_details(&AccountSummary { account, balance }, symbol)
            );
        }

        AccountCommands::Deactivate { account } => {
            let found = service.resolve(owner, &account)?;
            let updated = service.deactivate(owner, found.id)?;
            println!("Deactivated account: {}", updated.name);
        }

        AccountCommands::Activate { account } => {
            let found = service.resolve(owner, &account)?;
            let updated = service.reactivate(owner, found.id)?;
            println!("Activated account: {}", updated.name);
        }

        AccountCommands::Delete { account } => {
            let found = service.resolve(owner, &account)?;
            let deleted = service.delete(owner, found.id)?;
            println!("Deleted account: {}", deleted.name);
        }
    }

    Ok(())
}
