//! Bill management and notification commands

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};

use tally_core::{
    days_until_due, BillNotificationScheduler, BillStatus, Database, NewBill,
};

pub fn cmd_bills_add(
    db: &Database,
    user: &str,
    title: &str,
    amount: f64,
    due: &str,
    currency: &str,
) -> Result<()> {
    let due_date = NaiveDate::parse_from_str(due, "%Y-%m-%d")
        .context("Invalid --due format (use YYYY-MM-DD)")?;

    let id = db.insert_bill(
        user,
        &NewBill {
            title: title.to_string(),
            amount,
            currency: currency.to_string(),
            due_date,
        },
    )?;

    println!("✅ Added bill '{}' due {} (id {})", title, due_date, id);
    Ok(())
}

pub fn cmd_bills_list(db: &Database, user: &str) -> Result<()> {
    let bills = db.list_bills(user)?;

    if bills.is_empty() {
        println!("No bills yet.");
        return Ok(());
    }

    let now = Utc::now();
    println!(
        "{:<6} {:<20} {:>12}  {:<12} {:<10} {}",
        "ID", "TITLE", "AMOUNT", "DUE", "STATUS", ""
    );
    for bill in &bills {
        let urgency = if bill.status == BillStatus::Paid {
            String::new()
        } else {
            match days_until_due(bill.due_date, now) {
                d if d < 0 => format!("⚠ {} day(s) overdue", -d),
                0 => "⚠ due today".to_string(),
                1 => "due tomorrow".to_string(),
                d => format!("due in {} days", d),
            }
        };
        println!(
            "{:<6} {:<20} {:>9.2} {}  {:<12} {:<10} {}",
            bill.id,
            bill.title,
            bill.amount,
            bill.currency,
            bill.due_date.to_string(),
            bill.status.as_str(),
            urgency
        );
    }

    Ok(())
}

pub fn cmd_bills_pay(db: &Database, user: &str, id: i64) -> Result<()> {
    db.set_bill_status(user, id, BillStatus::Paid)?;
    println!("✅ Bill {} marked as paid", id);
    Ok(())
}

pub fn cmd_notify_check(db: &Database, user: &str) -> Result<()> {
    let scheduler = BillNotificationScheduler::new(db);
    let outcome = scheduler.run(user, Utc::now())?;

    for notification in &outcome.created {
        println!("🔔 {}: {}", notification.title, notification.message);
    }

    println!(
        "{} created, {} suppressed by the 12h window, {} failed",
        outcome.created.len(),
        outcome.deduped,
        outcome.failed
    );

    Ok(())
}

pub fn cmd_notify_list(db: &Database, user: &str, all: bool) -> Result<()> {
    let notifications = db.list_notifications(user, !all)?;

    if notifications.is_empty() {
        println!("No {}notifications.", if all { "" } else { "unread " });
        return Ok(());
    }

    for n in &notifications {
        let marker = if n.read { " " } else { "●" };
        println!(
            "{} [{:<7}] {} - {} ({})",
            marker,
            n.severity.as_str(),
            n.title,
            n.message,
            n.created_at.format("%Y-%m-%d %H:%M")
        );
    }

    Ok(())
}
