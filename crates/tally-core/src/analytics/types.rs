//! Result types produced by the expense analyzer

use serde::{Deserialize, Serialize};

use crate::models::Transaction;

/// Per-category expense breakdown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySpending {
    pub category: String,
    /// Total expense amount in this category
    pub amount: f64,
    /// Share of total expenses, 0-100
    pub percentage: f64,
    /// True when the category takes more than 30% of total expenses
    pub is_high_spending: bool,
}

/// Priority of a savings recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationPriority {
    High,
    Medium,
}

impl RecommendationPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
        }
    }
}

impl std::fmt::Display for RecommendationPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A savings recommendation for the user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: String,
    pub message: String,
    pub priority: RecommendationPriority,
}

/// Direction of income over the analyzed window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncomeTrend {
    Increasing,
    Decreasing,
    Stable,
}

impl IncomeTrend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Increasing => "increasing",
            Self::Decreasing => "decreasing",
            Self::Stable => "stable",
        }
    }
}

impl std::fmt::Display for IncomeTrend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Income dispersion summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeStability {
    /// Coefficient of variation below 0.15
    pub stable: bool,
    /// Coefficient of variation as a percentage
    pub variability_percent: f64,
    pub trend: IncomeTrend,
}

/// Everything the analyzer can say about a transaction snapshot
///
/// Ephemeral - recomputed from the current snapshot on every call, never
/// cached or persisted by the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub spending: Vec<CategorySpending>,
    pub anomalies: Vec<Transaction>,
    pub recommendations: Vec<Recommendation>,
    pub income: Option<IncomeStability>,
    /// Days past the end of the snapshot the forecast targets
    pub forecast_days: u32,
    /// OLS-projected expense amount at the forecast horizon (unclamped)
    pub forecast: f64,
}
