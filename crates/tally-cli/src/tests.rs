//! CLI command tests

use chrono::{Duration, Utc};
use tally_core::Database;

use crate::commands;

#[test]
fn test_add_and_list_transactions() {
    let db = Database::in_memory().unwrap();

    commands::cmd_add(
        &db,
        "local",
        "expense",
        12.5,
        "Food",
        Some("2026-03-01"),
        "USD",
        Some("lunch"),
    )
    .unwrap();

    assert_eq!(db.count_transactions("local").unwrap(), 1);
    commands::cmd_transactions(&db, "local", 20).unwrap();
}

#[test]
fn test_add_rejects_bad_kind() {
    let db = Database::in_memory().unwrap();

    let result = commands::cmd_add(&db, "local", "transfer", 10.0, "Misc", None, "USD", None);
    assert!(result.is_err());
    assert_eq!(db.count_transactions("local").unwrap(), 0);
}

#[test]
fn test_add_rejects_bad_date() {
    let db = Database::in_memory().unwrap();

    let result = commands::cmd_add(
        &db,
        "local",
        "expense",
        10.0,
        "Misc",
        Some("03/01/2026"),
        "USD",
        None,
    );
    assert!(result.is_err());
}

#[test]
fn test_bill_workflow() {
    let db = Database::in_memory().unwrap();
    let today = Utc::now().date_naive();

    commands::cmd_bills_add(&db, "local", "Rent", 900.0, &today.to_string(), "USD").unwrap();
    commands::cmd_bills_list(&db, "local").unwrap();

    // Due today: the check creates exactly one notification
    commands::cmd_notify_check(&db, "local").unwrap();
    assert_eq!(db.count_unread_notifications("local").unwrap(), 1);

    // Re-running inside the window creates nothing new
    commands::cmd_notify_check(&db, "local").unwrap();
    assert_eq!(db.count_unread_notifications("local").unwrap(), 1);

    let bills = db.list_bills("local").unwrap();
    commands::cmd_bills_pay(&db, "local", bills[0].id).unwrap();
    assert!(db.list_unpaid_bills("local").unwrap().is_empty());
}

#[test]
fn test_analyze_runs_on_seeded_data() {
    let db = Database::in_memory().unwrap();
    let base = Utc::now().date_naive() - Duration::days(30);

    for (i, amount) in [2000.0, 2050.0].iter().enumerate() {
        commands::cmd_add(
            &db,
            "local",
            "income",
            *amount,
            "Salary",
            Some(&(base + Duration::days(i as i64 * 14)).to_string()),
            "USD",
            None,
        )
        .unwrap();
    }
    commands::cmd_add(&db, "local", "expense", 150.0, "Food", None, "USD", None).unwrap();

    commands::cmd_analyze(&db, "local", 30, 50).unwrap();
}
