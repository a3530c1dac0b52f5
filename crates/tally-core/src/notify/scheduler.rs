//! Bill notification scheduling with rate-limited deduplication

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use crate::db::Database;
use crate::error::Result;
use crate::models::{Bill, NewNotification, Notification};

use super::classify::classify;

/// Rolling window during which a `(bill, classification)` pair may be
/// notified at most once
pub const DEDUP_WINDOW_HOURS: i64 = 12;

/// Delivery seam for newly created notifications (toast text, sound trigger)
///
/// Invoked exactly once per created notification, never for deduped ones.
/// Delivery mechanics live outside the core.
pub trait AlertSink: Send + Sync {
    fn alert(&self, notification: &Notification);
}

/// Sink that surfaces alerts through the log stream
pub struct LogAlertSink;

impl AlertSink for LogAlertSink {
    fn alert(&self, notification: &Notification) {
        tracing::info!(
            severity = notification.severity.as_str(),
            bill_id = notification.bill_id,
            "{}",
            notification.message
        );
    }
}

/// Outcome of a notification check over a bill snapshot
#[derive(Debug, Default)]
pub struct CheckOutcome {
    /// Notifications created by this run, in bill order
    pub created: Vec<Notification>,
    /// Bills classified but suppressed by the dedup window
    pub deduped: usize,
    /// Bills whose notification write failed (retried on the next run)
    pub failed: usize,
}

/// Decides which bill notifications to emit
///
/// The clock is caller-supplied so due-date classification and the dedup
/// window are deterministic under test. Dedup state is the persisted
/// notification records themselves: the store checks for a recent
/// `(bill, classification)` row and inserts inside a single transaction, so
/// two concurrent triggers (login hook and periodic timer) cannot both pass
/// the check. A failed write records nothing, leaving the pair eligible for
/// the next run.
pub struct BillNotificationScheduler<'a> {
    db: &'a Database,
    window: Duration,
    sink: Option<&'a dyn AlertSink>,
}

impl<'a> BillNotificationScheduler<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self {
            db,
            window: Duration::hours(DEDUP_WINDOW_HOURS),
            sink: None,
        }
    }

    /// Override the dedup window (tests, mostly)
    pub fn with_window(db: &'a Database, window: Duration) -> Self {
        Self {
            db,
            window,
            sink: None,
        }
    }

    /// Attach a delivery sink for newly created notifications
    pub fn with_sink(mut self, sink: &'a dyn AlertSink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Classify every bill in the snapshot and emit notifications for the
    /// ones that pass the dedup check
    ///
    /// Each bill is handled independently: a failed write is logged and
    /// counted, and the remaining bills are still processed.
    pub fn check_all(
        &self,
        user_id: &str,
        bills: &[Bill],
        now: DateTime<Utc>,
    ) -> Result<CheckOutcome> {
        let window_start = now - self.window;
        let mut outcome = CheckOutcome::default();

        for bill in bills {
            let Some(alert) = classify(bill, now) else {
                continue;
            };

            let new = NewNotification {
                title: alert.title,
                message: alert.message,
                severity: alert.severity,
                bill_id: Some(bill.id),
                due_date: Some(bill.due_date),
                requires_confirmation: true,
                notification_type: Some(alert.classification),
            };

            match self
                .db
                .create_notification_if_absent(user_id, &new, now, window_start)
            {
                Ok(Some(notification)) => {
                    debug!(
                        bill_id = bill.id,
                        classification = alert.classification.as_str(),
                        "Bill notification created"
                    );
                    if let Some(sink) = self.sink {
                        sink.alert(&notification);
                    }
                    outcome.created.push(notification);
                }
                Ok(None) => {
                    outcome.deduped += 1;
                }
                Err(e) => {
                    warn!(
                        bill_id = bill.id,
                        classification = alert.classification.as_str(),
                        error = %e,
                        "Failed to create bill notification"
                    );
                    outcome.failed += 1;
                }
            }
        }

        Ok(outcome)
    }

    /// Fetch the user's non-paid bills and run `check_all` over them
    pub fn run(&self, user_id: &str, now: DateTime<Utc>) -> Result<CheckOutcome> {
        let bills = self.db.list_unpaid_bills(user_id)?;
        self.check_all(user_id, &bills, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BillStatus, NewBill};
    use crate::notify::BillClassification;
    use chrono::{NaiveDate, TimeZone};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSink(AtomicUsize);

    impl AlertSink for CountingSink {
        fn alert(&self, _notification: &Notification) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn noon(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    fn seed_bill(db: &Database, user: &str, title: &str, due: NaiveDate) -> i64 {
        db.insert_bill(
            user,
            &NewBill {
                title: title.to_string(),
                amount: 60.0,
                currency: "USD".to_string(),
                due_date: due,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_check_all_creates_one_notification_per_bill() {
        let db = Database::in_memory().unwrap();
        let now = noon(2026, 3, 10);

        seed_bill(&db, "u1", "Rent", NaiveDate::from_ymd_opt(2026, 3, 10).unwrap());
        seed_bill(&db, "u1", "Internet", NaiveDate::from_ymd_opt(2026, 3, 11).unwrap());
        // Out of every classification window
        seed_bill(&db, "u1", "Insurance", NaiveDate::from_ymd_opt(2026, 3, 20).unwrap());

        let scheduler = BillNotificationScheduler::new(&db);
        let outcome = scheduler.run("u1", now).unwrap();

        assert_eq!(outcome.created.len(), 2);
        assert_eq!(outcome.deduped, 0);
        assert_eq!(outcome.failed, 0);

        let types: Vec<_> = outcome
            .created
            .iter()
            .filter_map(|n| n.notification_type)
            .collect();
        assert!(types.contains(&BillClassification::DueToday));
        assert!(types.contains(&BillClassification::DueTomorrow));
    }

    #[test]
    fn test_second_run_within_window_is_deduped() {
        let db = Database::in_memory().unwrap();
        let now = noon(2026, 3, 10);

        seed_bill(&db, "u1", "Rent", NaiveDate::from_ymd_opt(2026, 3, 10).unwrap());

        let scheduler = BillNotificationScheduler::new(&db);

        let first = scheduler.run("u1", now).unwrap();
        assert_eq!(first.created.len(), 1);

        // One minute later: still inside the window
        let second = scheduler.run("u1", now + Duration::minutes(1)).unwrap();
        assert_eq!(second.created.len(), 0);
        assert_eq!(second.deduped, 1);

        // One hour later: same
        let third = scheduler.run("u1", now + Duration::hours(1)).unwrap();
        assert_eq!(third.created.len(), 0);
        assert_eq!(third.deduped, 1);
    }

    #[test]
    fn test_run_after_window_elapses_creates_again() {
        let db = Database::in_memory().unwrap();
        let now = noon(2026, 3, 10);

        seed_bill(&db, "u1", "Rent", NaiveDate::from_ymd_opt(2026, 3, 10).unwrap());

        let scheduler = BillNotificationScheduler::new(&db);
        assert_eq!(scheduler.run("u1", now).unwrap().created.len(), 1);

        // 13 hours later, same calendar day gone - the bill is now overdue,
        // which is a different classification and a fresh window anyway
        let later = now + Duration::hours(13);
        let outcome = scheduler.run("u1", later).unwrap();
        assert_eq!(outcome.created.len(), 1);
        assert_eq!(
            outcome.created[0].notification_type,
            Some(BillClassification::Overdue)
        );
    }

    #[test]
    fn test_same_classification_after_window_creates_again() {
        let db = Database::in_memory().unwrap();
        // Early morning so 13 hours later is still the due day
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 5, 0, 0).unwrap();

        seed_bill(&db, "u1", "Rent", NaiveDate::from_ymd_opt(2026, 3, 10).unwrap());

        let scheduler = BillNotificationScheduler::new(&db);
        assert_eq!(scheduler.run("u1", now).unwrap().created.len(), 1);

        let later = now + Duration::hours(13);
        let outcome = scheduler.run("u1", later).unwrap();
        assert_eq!(outcome.created.len(), 1);
        assert_eq!(
            outcome.created[0].notification_type,
            Some(BillClassification::DueToday)
        );
    }

    #[test]
    fn test_paid_bill_is_skipped_entirely() {
        let db = Database::in_memory().unwrap();
        let now = noon(2026, 3, 10);

        let id = seed_bill(&db, "u1", "Rent", NaiveDate::from_ymd_opt(2026, 3, 9).unwrap());
        db.set_bill_status("u1", id, BillStatus::Paid).unwrap();

        let scheduler = BillNotificationScheduler::new(&db);
        let outcome = scheduler.run("u1", now).unwrap();
        assert!(outcome.created.is_empty());
    }

    #[test]
    fn test_sink_invoked_once_per_created_notification() {
        let db = Database::in_memory().unwrap();
        let now = noon(2026, 3, 10);

        seed_bill(&db, "u1", "Rent", NaiveDate::from_ymd_opt(2026, 3, 10).unwrap());
        seed_bill(&db, "u1", "Internet", NaiveDate::from_ymd_opt(2026, 3, 11).unwrap());

        let sink = CountingSink(AtomicUsize::new(0));
        let scheduler = BillNotificationScheduler::new(&db).with_sink(&sink);

        scheduler.run("u1", now).unwrap();
        assert_eq!(sink.0.load(Ordering::SeqCst), 2);

        // Deduped run must not re-alert
        scheduler.run("u1", now + Duration::minutes(5)).unwrap();
        assert_eq!(sink.0.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_users_are_scoped_independently() {
        let db = Database::in_memory().unwrap();
        let now = noon(2026, 3, 10);

        seed_bill(&db, "u1", "Rent", NaiveDate::from_ymd_opt(2026, 3, 10).unwrap());
        seed_bill(&db, "u2", "Rent", NaiveDate::from_ymd_opt(2026, 3, 10).unwrap());

        let scheduler = BillNotificationScheduler::new(&db);
        assert_eq!(scheduler.run("u1", now).unwrap().created.len(), 1);

        // u2's identical bill is untouched by u1's dedup record
        assert_eq!(scheduler.run("u2", now).unwrap().created.len(), 1);
    }
}
