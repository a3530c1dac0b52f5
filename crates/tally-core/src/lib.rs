//! Tally Core Library
//!
//! Shared functionality for the Tally personal finance tracker:
//! - Database access and migrations (per-user transactions, bills, notifications)
//! - Expense analytics (spending patterns, anomalies, recommendations,
//!   income stability, expense forecasting)
//! - Bill notification scheduling with rate-limited deduplication

pub mod analytics;
pub mod db;
pub mod error;
pub mod models;
pub mod notify;

pub use analytics::{
    AnalysisReport, CategorySpending, ExpenseAnalyzer, IncomeStability, IncomeTrend,
    Recommendation, RecommendationPriority,
};
pub use db::{DashboardStats, Database};
pub use error::{Error, Result};
pub use models::{
    Bill, BillStatus, NewBill, NewNotification, NewTransaction, Notification,
    NotificationSeverity, Transaction, TransactionKind,
};
pub use notify::{
    classify, days_until_due, AlertSink, BillAlert, BillClassification,
    BillNotificationScheduler, CheckOutcome, LogAlertSink, DEDUP_WINDOW_HOURS,
};
