//! End-to-end tests over the store, the analyzer, and the scheduler

use chrono::{Duration, NaiveDate, TimeZone, Utc};

use tally_core::{
    BillClassification, BillNotificationScheduler, BillStatus, Database, ExpenseAnalyzer, NewBill,
    NewTransaction, TransactionKind,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn seed_transaction(
    db: &Database,
    user: &str,
    kind: TransactionKind,
    category: &str,
    amount: f64,
    day: u32,
) {
    db.insert_transaction(
        user,
        &NewTransaction {
            kind,
            amount,
            category: category.to_string(),
            date: date(2026, 2, day),
            currency: "USD".to_string(),
            description: None,
        },
    )
    .unwrap();
}

#[test]
fn analysis_over_stored_window() {
    let db = Database::in_memory().unwrap();

    // A month of activity: salary twice, rent, groceries, one big outlier
    seed_transaction(&db, "u1", TransactionKind::Income, "Salary", 3000.0, 1);
    seed_transaction(&db, "u1", TransactionKind::Income, "Salary", 3100.0, 15);
    seed_transaction(&db, "u1", TransactionKind::Expense, "Rent", 1200.0, 2);
    seed_transaction(&db, "u1", TransactionKind::Expense, "Groceries", 80.0, 5);
    seed_transaction(&db, "u1", TransactionKind::Expense, "Groceries", 95.0, 12);
    seed_transaction(&db, "u1", TransactionKind::Expense, "Groceries", 70.0, 19);

    let transactions = db.list_recent_transactions("u1", 50).unwrap();
    assert_eq!(transactions.len(), 6);

    let report = ExpenseAnalyzer::new(transactions).report(30);

    // Rent dominates expenses: 1200 of 1445 = 83%
    let rent = report
        .spending
        .iter()
        .find(|p| p.category == "Rent")
        .unwrap();
    assert!(rent.is_high_spending);
    assert!(report
        .recommendations
        .iter()
        .any(|r| r.category == "Rent"));

    let income = report.income.unwrap();
    assert!(income.stable); // CV of 3000/3100 is about 1.6%

    let sum: f64 = report.spending.iter().map(|p| p.percentage).sum();
    assert!((sum - 100.0).abs() < 1e-9);
}

#[test]
fn analysis_of_empty_store_is_neutral() {
    let db = Database::in_memory().unwrap();

    let transactions = db.list_recent_transactions("nobody", 50).unwrap();
    let report = ExpenseAnalyzer::new(transactions).report(30);

    assert!(report.spending.is_empty());
    assert!(report.anomalies.is_empty());
    assert!(report.recommendations.is_empty());
    assert!(report.income.is_none());
    assert_eq!(report.forecast, 0.0);
}

#[test]
fn notification_lifecycle_across_a_due_day() {
    let db = Database::in_memory().unwrap();

    let bill_id = db
        .insert_bill(
            "u1",
            &NewBill {
                title: "Internet".to_string(),
                amount: 55.0,
                currency: "USD".to_string(),
                due_date: date(2026, 3, 10),
            },
        )
        .unwrap();

    let scheduler = BillNotificationScheduler::new(&db);

    // Day before, morning: due-tomorrow fires once
    let t0 = Utc.with_ymd_and_hms(2026, 3, 9, 8, 0, 0).unwrap();
    let outcome = scheduler.run("u1", t0).unwrap();
    assert_eq!(outcome.created.len(), 1);
    assert_eq!(
        outcome.created[0].notification_type,
        Some(BillClassification::DueTomorrow)
    );

    // Same day, an hour later: suppressed
    let outcome = scheduler.run("u1", t0 + Duration::hours(1)).unwrap();
    assert!(outcome.created.is_empty());
    assert_eq!(outcome.deduped, 1);

    // Due day: new classification, new notification
    let t1 = Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap();
    let outcome = scheduler.run("u1", t1).unwrap();
    assert_eq!(outcome.created.len(), 1);
    assert_eq!(
        outcome.created[0].notification_type,
        Some(BillClassification::DueToday)
    );

    // User confirms from the dropdown; the bill records the acknowledgment
    let n = &outcome.created[0];
    db.confirm_notification("u1", n.id, t1 + Duration::minutes(2))
        .unwrap();
    assert!(db.get_bill("u1", bill_id).unwrap().last_acknowledged_at.is_some());

    // Paying the bill ends the notification lifecycle for good
    db.set_bill_status("u1", bill_id, BillStatus::Paid).unwrap();
    let t2 = Utc.with_ymd_and_hms(2026, 3, 12, 9, 0, 0).unwrap();
    let outcome = scheduler.run("u1", t2).unwrap();
    assert!(outcome.created.is_empty());
}

#[test]
fn overdue_messages_count_days() {
    let db = Database::in_memory().unwrap();

    db.insert_bill(
        "u1",
        &NewBill {
            title: "Water".to_string(),
            amount: 30.0,
            currency: "USD".to_string(),
            due_date: date(2026, 3, 7),
        },
    )
    .unwrap();

    let now = Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();
    let outcome = BillNotificationScheduler::new(&db).run("u1", now).unwrap();

    assert_eq!(outcome.created.len(), 1);
    assert!(outcome.created[0].message.contains("3 days ago"));
    assert_eq!(
        outcome.created[0].notification_type,
        Some(BillClassification::Overdue)
    );
}

#[test]
fn dashboard_reflects_scheduler_output() {
    let db = Database::in_memory().unwrap();
    let today = date(2026, 3, 10);

    seed_transaction(&db, "u1", TransactionKind::Income, "Salary", 2500.0, 1);
    db.insert_bill(
        "u1",
        &NewBill {
            title: "Rent".to_string(),
            amount: 900.0,
            currency: "USD".to_string(),
            due_date: today,
        },
    )
    .unwrap();

    let now = Utc.with_ymd_and_hms(2026, 3, 10, 10, 0, 0).unwrap();
    BillNotificationScheduler::new(&db).run("u1", now).unwrap();

    let stats = db.dashboard_stats("u1", today).unwrap();
    assert_eq!(stats.pending_bills, 1);
    assert_eq!(stats.unread_notifications, 1);
    assert_eq!(stats.overdue_bills, 0);
}
