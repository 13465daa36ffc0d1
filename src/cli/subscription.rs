//! Subscription CLI commands
//!
//! The purchase flow as the app backend drives it: record an intent,
//! verify the store purchase, and ask for the current entitlement.

use clap::Subcommand;

use crate::config::Settings;
use crate::display::subscription::{
    format_entitlement, format_subscription_details, format_subscription_list,
};
use crate::error::{TallyError, TallyResult};
use crate::models::{Plan, UserId};
use crate::services::{EntitlementResolver, PurchaseVerification, SubscriptionService};
use crate::storage::Storage;

use super::parse_instant;

/// Subscription subcommands
#[derive(Subcommand)]
pub enum SubscriptionCommands {
    /// Record that a purchase was started
    Intent {
        /// monthly or yearly (mensal / anual also accepted)
        plan: String,
        /// Store product id; defaults to the configured one for the plan
        #[arg(long)]
        product: Option<String>,
    },
    /// Activate PRO for a purchase the store has verified
    Verify {
        /// Store purchase token
        #[arg(long)]
        token: String,
        /// monthly or yearly (mensal / anual also accepted)
        #[arg(long)]
        plan: String,
        /// Store product id
        #[arg(long)]
        product: Option<String>,
        /// Store order id
        #[arg(long)]
        order: Option<String>,
        /// Verification time (RFC 3339), defaults to now
        #[arg(long)]
        at: Option<String>,
    },
    /// Cancel a subscription; access lasts until it expires
    Cancel {
        /// Subscription ID
        id: String,
        /// Cancellation time (RFC 3339), defaults to now
        #[arg(long)]
        at: Option<String>,
    },
    /// Show whether PRO is currently active
    Status {
        /// Check at this time (RFC 3339) instead of now
        #[arg(long)]
        at: Option<String>,
    },
    /// List your subscriptions, newest first
    List,
    /// Show subscription details
    Show {
        /// Subscription ID
        id: String,
    },
}

fn parse_plan(plan: &str) -> TallyResult<Plan> {
    Plan::parse(plan).ok_or_else(|| {
        TallyError::InvalidInput(format!(
            "Invalid plan: '{}'. Use monthly or yearly",
            plan
        ))
    })
}

/// Handle a subscription command
pub fn handle_subscription_command(
    storage: &Storage,
    settings: &Settings,
    owner: &UserId,
    cmd: SubscriptionCommands,
) -> TallyResult<()> {
    let service = SubscriptionService::new(storage, &settings.billing);

    match cmd {
        SubscriptionCommands::Intent { plan, product } => {
            let subscription = service.create_intent(owner, parse_plan(&plan)?, product)?;
            println!("Recorded purchase intent: {}", subscription.id);
            println!("  Plan:    {}", subscription.plan);
            println!("  Product: {}", subscription.product_id);
        }

        SubscriptionCommands::Verify {
            token,
            plan,
            product,
            order,
            at,
        } => {
            let outcome = service.verify_purchase(
                owner,
                PurchaseVerification {
                    purchase_token: token,
                    product_id: product,
                    plan: parse_plan(&plan)?,
                    order_id: order,
                    verified_at: parse_instant(at.as_deref())?,
                },
            )?;

            if outcome.replayed {
                println!("Purchase already processed; nothing changed.");
            } else {
                println!("PRO activated.");
            }
            print!(
                "{}",
                format_subscription_details(&outcome.subscription, chrono::Utc::now())
            );
        }

        SubscriptionCommands::Cancel { id, at } => {
            let found = service.find(owner, &id)?;
            let now = parse_instant(at.as_deref())?;
            let canceled = service.cancel(owner, found.id, now)?;
            println!("Canceled subscription: {}", canceled.id);
            if let Some(expires_at) = canceled.expires_at {
                println!(
                    "  PRO stays active until {}",
                    expires_at.format("%Y-%m-%d %H:%M UTC")
                );
            }
        }

        SubscriptionCommands::Status { at } => {
            let now = parse_instant(at.as_deref())?;
            let entitlement = EntitlementResolver::new(storage).check(owner, now)?;
            print!("{}", format_entitlement(&entitlement));
        }

        SubscriptionCommands::List => {
            let subscriptions = service.list(owner)?;
            print!(
                "{}",
                format_subscription_list(&subscriptions, chrono::Utc::now())
            );
        }

        SubscriptionCommands::Show { id } => {
            let subscription = service.find(owner, &id)?;
            print!(
                "{}",
                format_subscription_details(&subscription, chrono::Utc::now())
            );
        }
    }

    Ok(())
}
