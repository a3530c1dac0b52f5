//! Bill Notifications
//!
//! Classifies bills by urgency relative to the current date and decides,
//! with rate-limited deduplication, which notifications to emit:
//!
//! - **Classification** - due-tomorrow / due-today / overdue from the due date
//! - **Dedup** - at most one notification per `(bill, classification)` per
//!   rolling 12-hour window, enforced atomically at the store
//! - **Delivery** - an [`AlertSink`] is invoked once per newly created
//!   notification
//!
//! The clock is always caller-supplied so scheduling is deterministic under
//! test.

pub mod classify;
pub mod scheduler;

pub use classify::{classify, days_until_due, BillAlert, BillClassification};
pub use scheduler::{
    AlertSink, BillNotificationScheduler, CheckOutcome, LogAlertSink, DEDUP_WINDOW_HOURS,
};
