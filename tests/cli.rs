//! End-to-end tests for the `tally` binary

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn tally(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("tally").unwrap();
    cmd.env("TALLY_DATA_DIR", dir.path())
        .env_remove("TALLY_USER")
        .env_remove("RUST_LOG");
    cmd
}

fn as_user(dir: &TempDir, user: &str) -> Command {
    let mut cmd = tally(dir);
    cmd.env("TALLY_USER", user);
    cmd
}

fn initialized() -> TempDir {
    let dir = TempDir::new().unwrap();
    tally(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("14 default categories"));
    dir
}

#[test]
fn test_init_is_idempotent() {
    let dir = initialized();
    tally(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("default categories").not());
}

#[test]
fn test_user_is_required() {
    let dir = initialized();
    tally(&dir)
        .args(["account", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("TALLY_USER"));
}

#[test]
fn test_balance_follows_transactions() {
    let dir = initialized();

    as_user(&dir, "alice")
        .args(["account", "create", "Wallet", "--balance", "100"])
        .assert()
        .success();
    as_user(&dir, "alice")
        .args(["account", "create", "Savings", "-t", "savings"])
        .assert()
        .success();

    as_user(&dir, "alice")
        .args([
            "transaction", "add", "expense", "Wallet", "12.50", "Lunch", "-c", "Food", "-d",
            "2025-03-02",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wallet balance: $87.50"));

    as_user(&dir, "alice")
        .args([
            "txn", "add", "transfer", "Wallet", "20", "To savings", "--to", "Savings", "-d",
            "2025-03-03",
        ])
        .assert()
        .success();

    as_user(&dir, "alice")
        .args(["account", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("$67.50"))
        .stdout(predicate::str::contains("$20.00"))
        .stdout(predicate::str::contains("$87.50"));

    as_user(&dir, "alice")
        .args(["transaction", "summary", "--month", "3", "--year", "2025"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Food"))
        .stdout(predicate::str::contains("-$12.50"));
}

#[test]
fn test_invalid_transaction_reports_every_violation() {
    let dir = initialized();
    as_user(&dir, "alice")
        .args(["account", "create", "Wallet"])
        .assert()
        .success();

    as_user(&dir, "alice")
        .args(["transaction", "add", "transfer", "Wallet", "-5", "Oops"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("amount"))
        .stderr(predicate::str::contains("destination_account"));
}

#[test]
fn test_over_precise_amount_rejected() {
    let dir = initialized();
    as_user(&dir, "alice")
        .args(["account", "create", "Wallet"])
        .assert()
        .success();

    as_user(&dir, "alice")
        .args(["transaction", "add", "expense", "Wallet", "1.999", "Coffee"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("two decimal places"));
}

#[test]
fn test_accounts_are_private() {
    let dir = initialized();
    as_user(&dir, "alice")
        .args(["account", "create", "Wallet"])
        .assert()
        .success();

    as_user(&dir, "bob")
        .args(["account", "show", "Wallet"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Account not found"));
}

#[test]
fn test_account_with_transactions_cannot_be_deleted() {
    let dir = initialized();
    as_user(&dir, "alice")
        .args(["account", "create", "Wallet"])
        .assert()
        .success();
    as_user(&dir, "alice")
        .args(["transaction", "add", "income", "Wallet", "50", "Gift"])
        .assert()
        .success();

    as_user(&dir, "alice")
        .args(["account", "delete", "Wallet"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("referenced by 1 transaction"));
}

#[test]
fn test_default_categories_are_read_only() {
    let dir = initialized();
    as_user(&dir, "alice")
        .args(["category", "rename", "Food", "Groceries"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("default category"));
}

#[test]
fn test_purchase_flow() {
    let dir = initialized();

    as_user(&dir, "alice")
        .args(["subscription", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PRO: inactive"));

    as_user(&dir, "alice")
        .args([
            "subscription", "verify", "--token", "tok-1", "--plan", "anual", "--at",
            "2025-01-01T00:00:00Z",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("PRO activated"))
        .stdout(predicate::str::contains("2026-01-01 00:00 UTC"));

    as_user(&dir, "alice")
        .args([
            "sub", "verify", "--token", "tok-1", "--plan", "anual", "--at",
            "2025-01-05T00:00:00Z",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("already processed"));

    as_user(&dir, "alice")
        .args(["sub", "status", "--at", "2025-12-31T23:59:59Z"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PRO: active (Yearly plan"));

    as_user(&dir, "alice")
        .args(["sub", "status", "--at", "2026-01-01T00:00:00Z"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PRO: inactive"));

    as_user(&dir, "bob")
        .args(["sub", "verify", "--token", "tok-1", "--plan", "monthly"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already"));

    as_user(&dir, "alice")
        .args(["billing", "log"])
        .assert()
        .success()
        .stdout(predicate::str::contains("purchase.verified"))
        .stdout(predicate::str::contains("purchase.replayed"));
}

#[test]
fn test_billing_record_keeps_non_json_payload() {
    let dir = initialized();
    as_user(&dir, "alice")
        .args(["billing", "record", "rtdn", "{not json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recorded event: rtdn"));

    let log = std::fs::read_to_string(dir.path().join("data/payment_events.log")).unwrap();
    assert!(log.contains(r#""payload":"{not json""#));
}
