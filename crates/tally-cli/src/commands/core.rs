//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `cmd_init` - Initialize the database
//! - `cmd_add` - Record a transaction
//! - `cmd_transactions` - List recent transactions

use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};

use tally_core::{Database, NewTransaction, TransactionKind};

/// Open database with encryption by default, or unencrypted if --no-encrypt
pub fn open_db(db_path: &Path, no_encrypt: bool) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path is not valid UTF-8")?;
    if no_encrypt {
        Database::new_unencrypted(path_str).context("Failed to open database (unencrypted)")
    } else {
        Database::new(path_str).context("Failed to open database")
    }
}

pub fn cmd_init(db_path: &Path, no_encrypt: bool) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let _db = open_db(db_path, no_encrypt)?;

    if no_encrypt {
        println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
    } else {
        println!("   🔒 Encryption: ENABLED");
    }

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Record a transaction: tally add --kind expense --amount 12.50 --category Food");
    println!("  2. Add a bill:           tally bills add --title Rent --amount 900 --due 2026-04-01");
    println!("  3. Start the web UI:     tally serve");

    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn cmd_add(
    db: &Database,
    user: &str,
    kind: &str,
    amount: f64,
    category: &str,
    date: Option<&str>,
    currency: &str,
    description: Option<&str>,
) -> Result<()> {
    let kind: TransactionKind = kind
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))
        .context("Use --kind income or --kind expense")?;

    if amount < 0.0 {
        bail!("Amount must be non-negative (use --kind expense for outgoing money)");
    }

    let date = match date {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .context("Invalid --date format (use YYYY-MM-DD)")?,
        None => Utc::now().date_naive(),
    };

    let id = db.insert_transaction(
        user,
        &NewTransaction {
            kind,
            amount,
            category: category.to_string(),
            date,
            currency: currency.to_string(),
            description: description.map(|s| s.to_string()),
        },
    )?;

    println!(
        "✅ Recorded {} of {:.2} {} in {} (id {})",
        kind, amount, currency, category, id
    );

    Ok(())
}

pub fn cmd_transactions(db: &Database, user: &str, limit: i64) -> Result<()> {
    let transactions = db.list_recent_transactions(user, limit)?;

    if transactions.is_empty() {
        println!("No transactions recorded yet.");
        return Ok(());
    }

    println!(
        "{:<6} {:<12} {:<8} {:>12}  {:<16} {}",
        "ID", "DATE", "KIND", "AMOUNT", "CATEGORY", "NOTE"
    );
    for tx in &transactions {
        println!(
            "{:<6} {:<12} {:<8} {:>9.2} {}  {:<16} {}",
            tx.id,
            tx.date.to_string(),
            tx.kind.as_str(),
            tx.amount,
            tx.currency,
            tx.category,
            tx.description.as_deref().unwrap_or("")
        );
    }
    println!();
    println!("{} transaction(s)", transactions.len());

    Ok(())
}
