use anyhow::Result;
use clap::{Parser, Subcommand};

use tally::cli::{
    handle_account_command, handle_billing_command, handle_category_command,
    handle_subscription_command, handle_transaction_command, require_user,
};
use tally::config::{paths::TallyPaths, settings::Settings};
use tally::storage::Storage;

#[derive(Parser)]
#[command(
    name = "tally",
    version,
    about = "Personal finance ledger with PRO subscriptions",
    long_about = "Tally records accounts, categories and transactions for each user, \
                  derives balances and monthly summaries from them, and tracks the \
                  PRO subscription that unlocks premium features."
)]
struct Cli {
    /// The user to act as
    #[arg(long, global = true, env = "TALLY_USER")]
    user: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Account management commands
    #[command(subcommand)]
    Account(tally::cli::AccountCommands),

    /// Category management commands
    #[command(subcommand)]
    Category(tally::cli::CategoryCommands),

    /// Transaction management commands
    #[command(subcommand, alias = "txn")]
    Transaction(tally::cli::TransactionCommands),

    /// PRO subscription commands
    #[command(subcommand, alias = "sub")]
    Subscription(tally::cli::SubscriptionCommands),

    /// Payment event log commands
    #[command(subcommand)]
    Billing(tally::cli::BillingCommands),

    /// Initialize the data directory and default categories
    Init,

    /// Show current configuration and paths
    Config,
}

fn init_logging(settings: &Settings) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = TallyPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    init_logging(&settings);

    // Initialize storage
    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Account(cmd)) => {
            let owner = require_user(cli.user)?;
            handle_account_command(&storage, &settings, &owner, cmd)?;
        }
        Some(Commands::Category(cmd)) => {
            let owner = require_user(cli.user)?;
            handle_category_command(&storage, &owner, cmd)?;
        }
        Some(Commands::Transaction(cmd)) => {
            let owner = require_user(cli.user)?;
            handle_transaction_command(&storage, &settings, &owner, cmd)?;
        }
        Some(Commands::Subscription(cmd)) => {
            let owner = require_user(cli.user)?;
            handle_subscription_command(&storage, &settings, &owner, cmd)?;
        }
        Some(Commands::Billing(cmd)) => {
            let owner = require_user(cli.user)?;
            handle_billing_command(&storage, &settings, &owner, cmd)?;
        }
        Some(Commands::Init) => {
            println!("Initializing Tally at: {}", paths.base_dir().display());
            let seeded = tally::storage::initialize_storage(&storage)?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            if seeded > 0 {
                println!();
                println!("{} default categories have been created:", seeded);
                println!("  - Income (Salary, Investments, Gifts, Other income)");
                println!("  - Expense (Food, Fuel, Transport, Housing, Shopping, Health,");
                println!("    Education, Leisure, Clothing, Other)");
            }
            println!();
            println!("Run 'tally --user <name> category list' to see all categories.");
        }
        Some(Commands::Config) => {
            println!("Tally Configuration");
            println!("===================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol: {}", settings.currency_symbol);
            println!("  Log level:       {}", settings.log_level);
            println!(
                "  Monthly plan:    {} days ({})",
                settings.billing.monthly_days, settings.billing.monthly_product_id
            );
            println!(
                "  Yearly plan:     {} days ({})",
                settings.billing.yearly_days, settings.billing.yearly_product_id
            );
        }
        None => {
            println!("Tally - personal finance ledger");
            println!();
            println!("Run 'tally --help' for usage information.");
            println!("Run 'tally init' to set up the data directory.");
        }
    }

    Ok(())
}
