//! Database access layer with connection pooling and migrations
//!
//! This module is organized by domain:
//! - `transactions` - Income/expense record operations
//! - `bills` - Bill lifecycle and due-date queries
//! - `notifications` - Notification creation with dedup, read/confirm mutations
//!
//! Every table carries a `user_id` column; the identity itself comes from an
//! external provider and is opaque to this layer.

use chrono::{DateTime, NaiveDate, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;
use serde::Serialize;
use tracing::info;

use crate::error::{Error, Result};

mod bills;
mod notifications;
mod transactions;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Environment variable for database encryption key
pub const DB_KEY_ENV: &str = "TALLY_DB_KEY";

/// Derive an encryption key from a passphrase using Argon2
///
/// Uses a fixed application salt so the same passphrase always produces the
/// same key, regardless of database path. This allows moving/renaming/
/// restoring the database freely.
fn derive_key(passphrase: &str) -> Result<String> {
    use argon2::{password_hash::SaltString, Argon2, PasswordHasher};

    // Fixed application salt - changing this would invalidate all existing
    // encrypted databases
    const APP_SALT: &[u8; 16] = b"tally-salt-v1-00";

    let salt = SaltString::encode_b64(APP_SALT)
        .map_err(|e| Error::Encryption(format!("Failed to create salt: {}", e)))?;

    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(passphrase.as_bytes(), &salt)
        .map_err(|e| Error::Encryption(format!("Failed to derive key: {}", e)))?;

    let hash_str = hash
        .hash
        .ok_or_else(|| Error::Encryption("No hash output".to_string()))?;
    Ok(hex::encode(hash_str.as_bytes()))
}

/// Parse a SQLite datetime string into a DateTime<Utc>
pub(crate) fn parse_datetime(s: &str) -> DateTime<Utc> {
    // Stored as "YYYY-MM-DD HH:MM:SS"
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.and_utc())
        .unwrap_or_else(|_| Utc::now())
}

/// Parse a SQLite date string into a NaiveDate
pub(crate) fn parse_date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap_or_else(|_| Utc::now().date_naive())
}

/// Format a timestamp the way this layer stores it
pub(crate) fn format_datetime(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Summary counters for the dashboard view
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub total_transactions: i64,
    pub total_income: f64,
    pub total_expenses: f64,
    pub pending_bills: i64,
    pub overdue_bills: i64,
    pub unread_notifications: i64,
}

/// Database wrapper with connection pooling
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    /// Path to the database file
    db_path: String,
}

impl Database {
    /// Create a new database connection pool with encryption
    ///
    /// Requires `TALLY_DB_KEY` environment variable to be set. The database
    /// will be encrypted using SQLCipher with a key derived from the
    /// passphrase via Argon2.
    ///
    /// Returns an error if `TALLY_DB_KEY` is not set. Use
    /// `new_unencrypted()` for development/testing without encryption.
    pub fn new(path: &str) -> Result<Self> {
        let encryption_key = std::env::var(DB_KEY_ENV).ok();
        match encryption_key {
            Some(key) => Self::new_with_key(path, Some(&key)),
            None => Err(Error::Encryption(format!(
                "Database encryption required. Set {} environment variable with your passphrase, \
                or use --no-encrypt for unencrypted databases (not recommended for production).",
                DB_KEY_ENV
            ))),
        }
    }

    /// Create a new unencrypted database connection pool
    ///
    /// WARNING: This creates an unencrypted database. Only use for
    /// development or testing. For production, use `new()` with
    /// `TALLY_DB_KEY` set.
    pub fn new_unencrypted(path: &str) -> Result<Self> {
        Self::new_with_key(path, None)
    }

    /// Create a new database with an explicit encryption key
    pub fn new_with_key(path: &str, passphrase: Option<&str>) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path);

        let pool = if let Some(pass) = passphrase {
            let key = derive_key(pass)?;
            let key_pragma = format!("PRAGMA key = 'x\"{}\"';", key);

            // Set the key on every new connection
            let manager = manager.with_init(move |conn| {
                conn.execute_batch(&key_pragma)?;
                Ok(())
            });

            Pool::builder().max_size(10).build(manager)?
        } else {
            Pool::builder().max_size(10).build(manager)?
        };

        let db = Self {
            pool,
            db_path: path.to_string(),
        };
        db.run_migrations()?;

        Ok(db)
    }

    /// Get the path to the database file
    pub fn path(&self) -> &str {
        &self.db_path
    }

    /// Create an in-memory database (for testing)
    ///
    /// Note: Uses a temporary file rather than `:memory:` because SQLCipher
    /// has issues with in-memory databases in the connection pool.
    pub fn in_memory() -> Result<Self> {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = format!(
            "{}/tally_test_{}_{}.db",
            std::env::temp_dir().display(),
            std::process::id(),
            id
        );

        // Remove any existing file
        let _ = std::fs::remove_file(&path);

        Self::new_unencrypted(&path)
    }

    /// Get a connection from the pool
    pub fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    /// Run database migrations
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            -- Enable foreign keys
            PRAGMA foreign_keys = ON;

            -- WAL mode: readers don't block writers. Creates -wal and -shm
            -- sidecar files alongside the database.
            PRAGMA journal_mode = WAL;

            -- Synchronous NORMAL: safe for most power-loss scenarios
            PRAGMA synchronous = NORMAL;

            -- Income/expense records
            CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY,
                user_id TEXT NOT NULL,
                kind TEXT NOT NULL,                        -- income, expense
                amount REAL NOT NULL,
                category TEXT NOT NULL,
                date DATE NOT NULL,
                currency TEXT NOT NULL DEFAULT 'USD',
                description TEXT,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_transactions_user_date ON transactions(user_id, date);

            -- Payable obligations
            CREATE TABLE IF NOT EXISTS bills (
                id INTEGER PRIMARY KEY,
                user_id TEXT NOT NULL,
                title TEXT NOT NULL,
                amount REAL NOT NULL,
                currency TEXT NOT NULL DEFAULT 'USD',
                due_date DATE NOT NULL,
                status TEXT NOT NULL DEFAULT 'pending',    -- pending, paid, overdue
                last_acknowledged_at DATETIME,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_bills_user_status ON bills(user_id, status);
            CREATE INDEX IF NOT EXISTS idx_bills_due_date ON bills(due_date);

            -- Notifications; rows double as the dedup record for the
            -- (bill_id, notification_type) rate limit
            CREATE TABLE IF NOT EXISTS notifications (
                id INTEGER PRIMARY KEY,
                user_id TEXT NOT NULL,
                title TEXT NOT NULL,
                message TEXT NOT NULL,
                severity TEXT NOT NULL,                    -- info, success, warning, error
                read BOOLEAN NOT NULL DEFAULT FALSE,
                confirmed BOOLEAN NOT NULL DEFAULT FALSE,
                confirmed_at DATETIME,
                created_at DATETIME NOT NULL,
                bill_id INTEGER REFERENCES bills(id),
                due_date DATE,
                requires_confirmation BOOLEAN NOT NULL DEFAULT FALSE,
                notification_type TEXT                     -- due-tomorrow, due-today, overdue
            );

            CREATE INDEX IF NOT EXISTS idx_notifications_user_created ON notifications(user_id, created_at);
            CREATE INDEX IF NOT EXISTS idx_notifications_dedup ON notifications(bill_id, notification_type, created_at);
            "#,
        )?;

        Ok(())
    }

    /// Summary counters for a user's dashboard
    pub fn dashboard_stats(&self, user_id: &str, today: NaiveDate) -> Result<DashboardStats> {
        let conn = self.conn()?;

        let total_transactions: i64 = conn.query_row(
            "SELECT COUNT(*) FROM transactions WHERE user_id = ?",
            params![user_id],
            |row| row.get(0),
        )?;

        let total_income: f64 = conn.query_row(
            "SELECT COALESCE(SUM(amount), 0) FROM transactions WHERE user_id = ? AND kind = 'income'",
            params![user_id],
            |row| row.get(0),
        )?;

        let total_expenses: f64 = conn.query_row(
            "SELECT COALESCE(SUM(amount), 0) FROM transactions WHERE user_id = ? AND kind = 'expense'",
            params![user_id],
            |row| row.get(0),
        )?;

        let pending_bills: i64 = conn.query_row(
            "SELECT COUNT(*) FROM bills WHERE user_id = ? AND status != 'paid'",
            params![user_id],
            |row| row.get(0),
        )?;

        // Derived from the due date, not the stored status
        let overdue_bills: i64 = conn.query_row(
            "SELECT COUNT(*) FROM bills WHERE user_id = ? AND status != 'paid' AND due_date < ?",
            params![user_id, today.to_string()],
            |row| row.get(0),
        )?;

        let unread_notifications: i64 = conn.query_row(
            "SELECT COUNT(*) FROM notifications WHERE user_id = ? AND read = FALSE",
            params![user_id],
            |row| row.get(0),
        )?;

        Ok(DashboardStats {
            total_transactions,
            total_income,
            total_expenses,
            pending_bills,
            overdue_bills,
            unread_notifications,
        })
    }

    /// Clear all data for a user (tests and resets)
    pub fn clear_user(&self, user_id: &str) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "DELETE FROM notifications WHERE user_id = ?",
            params![user_id],
        )?;
        conn.execute("DELETE FROM bills WHERE user_id = ?", params![user_id])?;
        conn.execute(
            "DELETE FROM transactions WHERE user_id = ?",
            params![user_id],
        )?;
        info!(user_id, "Cleared user data");
        Ok(())
    }
}
