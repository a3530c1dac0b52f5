//! Notification operations
//!
//! Notification rows double as the dedup record for the bill rate limit:
//! creation checks for a recent `(bill_id, notification_type)` row and
//! inserts inside a single immediate transaction, so concurrent scheduler
//! runs cannot both create one within the window.

use chrono::{DateTime, Utc};
use rusqlite::{params, TransactionBehavior};

use super::{format_datetime, parse_date, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{NewNotification, Notification, NotificationSeverity};

impl Database {
    /// Create a notification unless a matching one exists in the window
    ///
    /// Returns the created notification, or `None` when a notification for
    /// the same `(bill_id, notification_type)` was already created at or
    /// after `window_start`. The existence check and the insert run inside
    /// one IMMEDIATE transaction - the check-and-set is atomic against
    /// concurrent callers.
    ///
    /// `now` becomes the stored `created_at`, so dedup arithmetic follows
    /// the caller's clock.
    pub fn create_notification_if_absent(
        &self,
        user_id: &str,
        notification: &NewNotification,
        now: DateTime<Utc>,
        window_start: DateTime<Utc>,
    ) -> Result<Option<Notification>> {
        let mut conn = self.conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let existing = tx.query_row(
            r#"
            SELECT id FROM notifications
            WHERE user_id = ?
              AND bill_id IS ?
              AND notification_type IS ?
              AND created_at >= ?
            LIMIT 1
            "#,
            params![
                user_id,
                notification.bill_id,
                notification.notification_type.map(|c| c.as_str()),
                format_datetime(window_start),
            ],
            |row| row.get::<_, i64>(0),
        );

        match existing {
            Ok(_) => {
                tx.commit()?;
                return Ok(None);
            }
            Err(rusqlite::Error::QueryReturnedNoRows) => {}
            Err(e) => return Err(e.into()),
        }

        tx.execute(
            r#"
            INSERT INTO notifications
                (user_id, title, message, severity, created_at, bill_id, due_date,
                 requires_confirmation, notification_type)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                user_id,
                notification.title,
                notification.message,
                notification.severity.as_str(),
                format_datetime(now),
                notification.bill_id,
                notification.due_date.map(|d| d.to_string()),
                notification.requires_confirmation,
                notification.notification_type.map(|c| c.as_str()),
            ],
        )?;

        let id = tx.last_insert_rowid();
        tx.commit()?;

        self.get_notification(user_id, id).map(Some)
    }

    /// Is there a notification for this dedup key at or after `window_start`?
    pub fn has_recent_notification(
        &self,
        user_id: &str,
        bill_id: i64,
        notification_type: &str,
        window_start: DateTime<Utc>,
    ) -> Result<bool> {
        let conn = self.conn()?;

        let result = conn.query_row(
            r#"
            SELECT 1 FROM notifications
            WHERE user_id = ? AND bill_id = ? AND notification_type = ? AND created_at >= ?
            LIMIT 1
            "#,
            params![
                user_id,
                bill_id,
                notification_type,
                format_datetime(window_start)
            ],
            |_| Ok(()),
        );

        match result {
            Ok(()) => Ok(true),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Get a single notification, scoped to its owner
    pub fn get_notification(&self, user_id: &str, id: i64) -> Result<Notification> {
        let conn = self.conn()?;

        conn.query_row(
            r#"
            SELECT id, user_id, title, message, severity, read, confirmed, confirmed_at,
                   created_at, bill_id, due_date, requires_confirmation, notification_type
            FROM notifications
            WHERE user_id = ? AND id = ?
            "#,
            params![user_id, id],
            |row| self.row_to_notification(row),
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => {
                Error::NotFound(format!("notification {}", id))
            }
            other => other.into(),
        })
    }

    /// List a user's notifications, newest first
    pub fn list_notifications(&self, user_id: &str, unread_only: bool) -> Result<Vec<Notification>> {
        let conn = self.conn()?;

        let sql = if unread_only {
            r#"
            SELECT id, user_id, title, message, severity, read, confirmed, confirmed_at,
                   created_at, bill_id, due_date, requires_confirmation, notification_type
            FROM notifications
            WHERE user_id = ? AND read = FALSE
            ORDER BY created_at DESC, id DESC
            "#
        } else {
            r#"
            SELECT id, user_id, title, message, severity, read, confirmed, confirmed_at,
                   created_at, bill_id, due_date, requires_confirmation, notification_type
            FROM notifications
            WHERE user_id = ?
            ORDER BY created_at DESC, id DESC
            "#
        };

        let mut stmt = conn.prepare(sql)?;
        let notifications = stmt
            .query_map(params![user_id], |row| self.row_to_notification(row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(notifications)
    }

    /// Mark a notification as read
    pub fn mark_notification_read(&self, user_id: &str, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE notifications SET read = TRUE WHERE user_id = ? AND id = ?",
            params![user_id, id],
        )?;
        if updated == 0 {
            return Err(Error::NotFound(format!("notification {}", id)));
        }
        Ok(())
    }

    /// Mark a notification as read and confirmed, and stamp the linked bill
    /// as acknowledged
    pub fn confirm_notification(&self, user_id: &str, id: i64, at: DateTime<Utc>) -> Result<()> {
        let notification = self.get_notification(user_id, id)?;

        let conn = self.conn()?;
        conn.execute(
            r#"
            UPDATE notifications
            SET read = TRUE, confirmed = TRUE, confirmed_at = ?
            WHERE user_id = ? AND id = ?
            "#,
            params![format_datetime(at), user_id, id],
        )?;
        drop(conn);

        if let Some(bill_id) = notification.bill_id {
            self.acknowledge_bill(user_id, bill_id, at)?;
        }

        Ok(())
    }

    /// Count a user's unread notifications
    pub fn count_unread_notifications(&self, user_id: &str) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM notifications WHERE user_id = ? AND read = FALSE",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn row_to_notification(&self, row: &rusqlite::Row) -> rusqlite::Result<Notification> {
        let severity_str: String = row.get(4)?;
        let confirmed_at_str: Option<String> = row.get(7)?;
        let created_at_str: String = row.get(8)?;
        let due_date_str: Option<String> = row.get(10)?;
        let type_str: Option<String> = row.get(12)?;

        Ok(Notification {
            id: row.get(0)?,
            user_id: row.get(1)?,
            title: row.get(2)?,
            message: row.get(3)?,
            severity: severity_str.parse().unwrap_or(NotificationSeverity::Info),
            read: row.get(5)?,
            confirmed: row.get(6)?,
            confirmed_at: confirmed_at_str.map(|s| parse_datetime(&s)),
            created_at: parse_datetime(&created_at_str),
            bill_id: row.get(9)?,
            due_date: due_date_str.map(|s| parse_date(&s)),
            requires_confirmation: row.get(11)?,
            notification_type: type_str.and_then(|s| s.parse().ok()),
        })
    }
}
