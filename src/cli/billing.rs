//! Billing CLI commands
//!
//! Records raw store notifications into the payment event log and shows
//! what has been logged.

use clap::Subcommand;

use crate::config::Settings;
use crate::display::subscription::format_payment_events;
use crate::error::{TallyError, TallyResult};
use crate::models::{SubscriptionId, UserId};
use crate::services::{BillingService, SubscriptionService};
use crate::storage::Storage;

/// Billing subcommands
#[derive(Subcommand)]
pub enum BillingCommands {
    /// Record an inbound billing event
    Record {
        /// Event name (e.g. "rtdn")
        name: String,
        /// Payload; stored as JSON when it parses, as text otherwise
        payload: String,
        /// Link the event to one of your subscriptions
        #[arg(long)]
        subscription: Option<String>,
    },
    /// Show the most recent events
    Log {
        /// Number of events to show
        #[arg(short = 'n', long, default_value = "20")]
        count: usize,
    },
}

/// Handle a billing command
pub fn handle_billing_command(
    storage: &Storage,
    settings: &Settings,
    owner: &UserId,
    cmd: BillingCommands,
) -> TallyResult<()> {
    let service = BillingService::new(storage);

    match cmd {
        BillingCommands::Record {
            name,
            payload,
            subscription,
        } => {
            if name.trim().is_empty() {
                return Err(TallyError::InvalidInput("event name cannot be empty".into()));
            }

            let subscription_id: Option<SubscriptionId> = match subscription {
                Some(identifier) => Some(
                    SubscriptionService::new(storage, &settings.billing)
                        .find(owner, &identifier)?
                        .id,
                ),
                None => None,
            };

            let event = service.record_raw(name.trim(), &payload, subscription_id)?;
            println!("Recorded event: {} ({})", event.event_name, event.id);
        }

        BillingCommands::Log { count } => {
            print!("{}", format_payment_events(&service.recent(count)?));
        }
    }

    Ok(())
}
