//! Subscription and entitlement formatting

use chrono::{DateTime, Utc};

use crate::models::{PaymentEvent, Subscription};
use crate::services::entitlement::Entitlement;

fn format_instant(at: Option<DateTime<Utc>>) -> String {
    at.map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Format subscriptions as a table, with status as of `now`
pub fn format_subscription_list(subscriptions: &[Subscription], now: DateTime<Utc>) -> String {
    if subscriptions.is_empty() {
        return "No subscriptions found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:12} {:8} {:9} {:20} {:20} {}\n",
        "ID", "Plan", "Status", "Started", "Expires", "Renews"
    ));
    output.push_str(&"-".repeat(80));
    output.push('\n');

    for sub in subscriptions {
        output.push_str(&format!(
            "{:12} {:8} {:9} {:20} {:20} {}\n",
            sub.id.to_string(),
            sub.plan.to_string(),
            sub.effective_status(now).as_str(),
            format_instant(sub.started_at),
            format_instant(sub.expires_at),
            if sub.auto_renew { "yes" } else { "no" }
        ));
    }

    output
}

/// Format one subscription's details
pub fn format_subscription_details(sub: &Subscription, now: DateTime<Utc>) -> String {
    let mut output = String::new();

    output.push_str(&format!("Subscription: {}\n", sub.id));
    output.push_str(&format!("  Plan:       {}\n", sub.plan));
    output.push_str(&format!("  Status:     {}\n", sub.effective_status(now)));
    output.push_str(&format!("  Product:    {}\n", sub.product_id));
    if let Some(order_id) = &sub.order_id {
        output.push_str(&format!("  Order:      {}\n", order_id));
    }
    output.push_str(&format!("  Started:    {}\n", format_instant(sub.started_at)));
    output.push_str(&format!("  Expires:    {}\n", format_instant(sub.expires_at)));
    if sub.canceled_at.is_some() {
        output.push_str(&format!(
            "  Canceled:   {}\n",
            format_instant(sub.canceled_at)
        ));
    }
    output.push_str(&format!(
        "  Auto-renew: {}\n",
        if sub.auto_renew { "Yes" } else { "No" }
    ));

    output
}

/// One-line answer to "do I have PRO?"
pub fn format_entitlement(entitlement: &Entitlement) -> String {
    match (entitlement.entitled, entitlement.plan) {
        (true, Some(plan)) => format!(
            "PRO: active ({} plan, until {})\n",
            plan,
            format_instant(entitlement.expires_at)
        ),
        (false, Some(plan)) => format!(
            "PRO: inactive (last {} plan ended {})\n",
            plan,
            format_instant(entitlement.expires_at)
        ),
        _ => "PRO: inactive\n".to_string(),
    }
}

/// Format payment events, one per line
pub fn format_payment_events(events: &[PaymentEvent]) -> String {
    if events.is_empty() {
        return "No payment events recorded.\n".to_string();
    }

    let mut output = String::new();
    for event in events {
        let subscription = event
            .subscription_id
            .map(|id| id.to_string())
            .unwrap_or_default();
        output.push_str(&format!("{}  {}\n", event, subscription));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Plan, UserId};
    use chrono::{Duration, TimeZone};

    fn active_at(at: DateTime<Utc>) -> Subscription {
        let mut sub = Subscription::pending(UserId::from("alice"), Plan::Monthly, "pro");
        sub.activate("tok", None, at, Duration::days(30)).unwrap();
        sub
    }

    #[test]
    fn test_list_reports_expiry_at_read_time() {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let sub = active_at(start);

        let now_active = format_subscription_list(&[sub.clone()], start);
        assert!(now_active.contains("active"));

        let later = format_subscription_list(&[sub], start + Duration::days(30));
        assert!(later.contains("expired"));
    }

    #[test]
    fn test_format_entitlement() {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let entitled = Entitlement {
            entitled: true,
            plan: Some(Plan::Yearly),
            expires_at: Some(start),
        };
        assert!(format_entitlement(&entitled).starts_with("PRO: active (Yearly plan"));

        let none = Entitlement {
            entitled: false,
            plan: None,
            expires_at: None,
        };
        assert_eq!(format_entitlement(&none), "PRO: inactive\n");
    }
}
