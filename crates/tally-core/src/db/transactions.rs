//! Transaction operations

use rusqlite::params;

use super::{parse_date, parse_datetime, Database};
use crate::error::Result;
use crate::models::{NewTransaction, Transaction, TransactionKind};

impl Database {
    /// Record a transaction for a user
    pub fn insert_transaction(&self, user_id: &str, tx: &NewTransaction) -> Result<i64> {
        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT INTO transactions (user_id, kind, amount, category, date, currency, description)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                user_id,
                tx.kind.as_str(),
                tx.amount,
                tx.category,
                tx.date.to_string(),
                tx.currency,
                tx.description,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// The user's most recent transactions, returned in chronological order
    ///
    /// The analytics trend computation splits the series in half in the
    /// order given, so the bounded window is fetched newest-first and then
    /// reversed.
    pub fn list_recent_transactions(&self, user_id: &str, limit: i64) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT id, user_id, kind, amount, category, date, currency, description, created_at
            FROM transactions
            WHERE user_id = ?
            ORDER BY date DESC, id DESC
            LIMIT ?
            "#,
        )?;

        let mut transactions = stmt
            .query_map(params![user_id, limit], |row| self.row_to_transaction(row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        transactions.reverse();
        Ok(transactions)
    }

    /// Count a user's transactions
    pub fn count_transactions(&self, user_id: &str) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM transactions WHERE user_id = ?",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn row_to_transaction(&self, row: &rusqlite::Row) -> rusqlite::Result<Transaction> {
        let kind_str: String = row.get(2)?;
        let date_str: String = row.get(5)?;
        let created_at_str: String = row.get(8)?;

        Ok(Transaction {
            id: row.get(0)?,
            user_id: row.get(1)?,
            kind: kind_str.parse().unwrap_or(TransactionKind::Expense),
            amount: row.get(3)?,
            category: row.get(4)?,
            date: parse_date(&date_str),
            currency: row.get(6)?,
            description: row.get(7)?,
            created_at: parse_datetime(&created_at_str),
        })
    }
}
