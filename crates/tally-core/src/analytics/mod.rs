//! Expense Analytics
//!
//! Statistical analysis over a snapshot of transactions:
//!
//! - **Spending patterns** - per-category breakdown with high-spending flags
//! - **Anomaly detection** - amounts more than 2 standard deviations off the mean
//! - **Savings recommendations** - high-spending categories and small-expense churn
//! - **Income stability** - coefficient of variation plus a half-over-half trend
//! - **Expense forecast** - least-squares projection of expense volume
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tally_core::analytics::ExpenseAnalyzer;
//!
//! let transactions = db.list_recent_transactions("user-1", 50)?;
//! let report = ExpenseAnalyzer::new(transactions).report(30);
//! ```

pub mod analyzer;
pub mod types;

pub use analyzer::ExpenseAnalyzer;
pub use types::{
    AnalysisReport, CategorySpending, IncomeStability, IncomeTrend, Recommendation,
    RecommendationPriority,
};
