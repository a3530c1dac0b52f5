//! Dashboard summary command

use anyhow::Result;
use chrono::Utc;

use tally_core::Database;

pub fn cmd_status(db: &Database, user: &str) -> Result<()> {
    let stats = db.dashboard_stats(user, Utc::now().date_naive())?;

    println!("📒 Tally status for {}", user);
    println!("   Database: {}", db.path());
    println!();
    println!("   Transactions:  {}", stats.total_transactions);
    println!("   Total income:  {:.2}", stats.total_income);
    println!("   Total spent:   {:.2}", stats.total_expenses);
    println!("   Pending bills: {}", stats.pending_bills);
    if stats.overdue_bills > 0 {
        println!("   Overdue bills: {} ⚠", stats.overdue_bills);
    }
    println!("   Unread notifications: {}", stats.unread_notifications);

    Ok(())
}
