//! Bill operations

use chrono::{DateTime, Utc};
use rusqlite::params;

use super::{format_datetime, parse_date, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Bill, BillStatus, NewBill};

impl Database {
    /// Record a bill for a user (status starts as pending)
    pub fn insert_bill(&self, user_id: &str, bill: &NewBill) -> Result<i64> {
        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT INTO bills (user_id, title, amount, currency, due_date)
            VALUES (?, ?, ?, ?, ?)
            "#,
            params![
                user_id,
                bill.title,
                bill.amount,
                bill.currency,
                bill.due_date.to_string(),
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Get a single bill, scoped to its owner
    pub fn get_bill(&self, user_id: &str, id: i64) -> Result<Bill> {
        let conn = self.conn()?;

        conn.query_row(
            r#"
            SELECT id, user_id, title, amount, currency, due_date, status, last_acknowledged_at, created_at
            FROM bills
            WHERE user_id = ? AND id = ?
            "#,
            params![user_id, id],
            |row| self.row_to_bill(row),
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound(format!("bill {}", id)),
            other => other.into(),
        })
    }

    /// The user's non-paid bills, ordered by due date
    pub fn list_unpaid_bills(&self, user_id: &str) -> Result<Vec<Bill>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT id, user_id, title, amount, currency, due_date, status, last_acknowledged_at, created_at
            FROM bills
            WHERE user_id = ? AND status != 'paid'
            ORDER BY due_date, id
            "#,
        )?;

        let bills = stmt
            .query_map(params![user_id], |row| self.row_to_bill(row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(bills)
    }

    /// All bills for a user, newest due date first
    pub fn list_bills(&self, user_id: &str) -> Result<Vec<Bill>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT id, user_id, title, amount, currency, due_date, status, last_acknowledged_at, created_at
            FROM bills
            WHERE user_id = ?
            ORDER BY due_date DESC, id DESC
            "#,
        )?;

        let bills = stmt
            .query_map(params![user_id], |row| self.row_to_bill(row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(bills)
    }

    /// Update a bill's payment status
    pub fn set_bill_status(&self, user_id: &str, id: i64, status: BillStatus) -> Result<()> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE bills SET status = ? WHERE user_id = ? AND id = ?",
            params![status.as_str(), user_id, id],
        )?;
        if updated == 0 {
            return Err(Error::NotFound(format!("bill {}", id)));
        }
        Ok(())
    }

    /// Stamp the bill as acknowledged by the user (set when a notification
    /// for it is confirmed)
    pub fn acknowledge_bill(&self, user_id: &str, id: i64, at: DateTime<Utc>) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "UPDATE bills SET last_acknowledged_at = ? WHERE user_id = ? AND id = ?",
            params![format_datetime(at), user_id, id],
        )?;
        Ok(())
    }

    /// Every user id with at least one bill, for the periodic sweep
    pub fn list_user_ids(&self) -> Result<Vec<String>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare("SELECT DISTINCT user_id FROM bills ORDER BY user_id")?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;

        Ok(ids)
    }

    fn row_to_bill(&self, row: &rusqlite::Row) -> rusqlite::Result<Bill> {
        let due_date_str: String = row.get(5)?;
        let status_str: String = row.get(6)?;
        let acknowledged_str: Option<String> = row.get(7)?;
        let created_at_str: String = row.get(8)?;

        Ok(Bill {
            id: row.get(0)?,
            user_id: row.get(1)?,
            title: row.get(2)?,
            amount: row.get(3)?,
            currency: row.get(4)?,
            due_date: parse_date(&due_date_str),
            status: status_str.parse().unwrap_or(BillStatus::Pending),
            last_acknowledged_at: acknowledged_str.map(|s| parse_datetime(&s)),
            created_at: parse_datetime(&created_at_str),
        })
    }
}
