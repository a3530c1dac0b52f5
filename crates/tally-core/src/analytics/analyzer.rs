//! Expense analytics over a transaction snapshot
//!
//! Pure functions of an in-memory snapshot: category breakdown, statistical
//! anomaly detection, savings recommendations, income stability scoring, and
//! a short-horizon expense forecast. No I/O, no caching - callers fetch a
//! bounded recent window from the store and hand it over.

use std::collections::HashMap;

use crate::models::{Transaction, TransactionKind};

use super::types::{
    AnalysisReport, CategorySpending, IncomeStability, IncomeTrend, Recommendation,
    RecommendationPriority,
};

/// Share of total expenses above which a category counts as high-spending
const HIGH_SPENDING_PERCENT: f64 = 30.0;

/// Amounts below this count as "small" transactions
const SMALL_EXPENSE_CUTOFF: f64 = 10.0;

/// Fraction of all transactions that must be small expenses before the
/// bundling recommendation fires
const SMALL_EXPENSE_SHARE: f64 = 0.2;

/// Deviation from the mean, in population standard deviations, beyond which
/// a transaction is anomalous
const ANOMALY_SIGMA: f64 = 2.0;

/// Coefficient of variation below which income counts as stable
const STABLE_CV: f64 = 0.15;

/// Percent change between income halves beyond which the trend moves off
/// stable
const TREND_PERCENT: f64 = 5.0;

/// Analyzes a snapshot of transactions
///
/// Order of the snapshot is irrelevant to every computation except the
/// income trend, which splits the income series into halves in the order
/// given: callers must pass transactions in chronological order for the
/// trend to be meaningful. `Database::list_recent_transactions` returns rows
/// that way.
pub struct ExpenseAnalyzer {
    transactions: Vec<Transaction>,
}

impl ExpenseAnalyzer {
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Self { transactions }
    }

    /// Per-category expense breakdown with high-spending flags
    ///
    /// Empty when there are no expenses - percentages are undefined against
    /// a zero total.
    pub fn spending_patterns(&self) -> Vec<CategorySpending> {
        let mut totals: HashMap<&str, f64> = HashMap::new();
        let mut order: Vec<&str> = Vec::new();

        for tx in &self.transactions {
            if tx.kind != TransactionKind::Expense {
                continue;
            }
            if !totals.contains_key(tx.category.as_str()) {
                order.push(tx.category.as_str());
            }
            *totals.entry(tx.category.as_str()).or_insert(0.0) += tx.amount;
        }

        let total: f64 = totals.values().sum();
        if total <= 0.0 {
            return Vec::new();
        }

        // First-seen order keeps output deterministic for a given snapshot
        order
            .into_iter()
            .map(|category| {
                let amount = totals[category];
                let percentage = amount / total * 100.0;
                CategorySpending {
                    category: category.to_string(),
                    amount,
                    percentage,
                    is_high_spending: percentage > HIGH_SPENDING_PERCENT,
                }
            })
            .collect()
    }

    /// Transactions whose amount deviates from the mean of the whole
    /// snapshot (income and expense combined) by more than two population
    /// standard deviations
    pub fn detect_anomalies(&self) -> Vec<Transaction> {
        if self.transactions.is_empty() {
            return Vec::new();
        }

        let amounts: Vec<f64> = self.transactions.iter().map(|t| t.amount).collect();
        let mean = amounts.iter().sum::<f64>() / amounts.len() as f64;
        let variance =
            amounts.iter().map(|a| (a - mean).powi(2)).sum::<f64>() / amounts.len() as f64;
        let std_dev = variance.sqrt();

        self.transactions
            .iter()
            .filter(|t| (t.amount - mean).abs() > ANOMALY_SIGMA * std_dev)
            .cloned()
            .collect()
    }

    /// Savings recommendations from the spending breakdown plus a check for
    /// frequent small expenses
    pub fn savings_recommendations(&self) -> Vec<Recommendation> {
        let mut recommendations = Vec::new();

        for pattern in self.spending_patterns() {
            if pattern.percentage > HIGH_SPENDING_PERCENT {
                recommendations.push(Recommendation {
                    message: format!(
                        "Consider reducing spending in {} as it represents {:.1}% of your expenses",
                        pattern.category, pattern.percentage
                    ),
                    category: pattern.category,
                    priority: RecommendationPriority::High,
                });
            }
        }

        // Frequent small expenses, measured against the whole snapshot
        let small_expenses = self
            .transactions
            .iter()
            .filter(|t| t.kind == TransactionKind::Expense && t.amount < SMALL_EXPENSE_CUTOFF)
            .count();

        if small_expenses as f64 > self.transactions.len() as f64 * SMALL_EXPENSE_SHARE {
            recommendations.push(Recommendation {
                category: "Small Expenses".to_string(),
                message: "You have many small transactions. Consider bundling purchases to reduce \
                          impulse spending."
                    .to_string(),
                priority: RecommendationPriority::Medium,
            });
        }

        recommendations
    }

    /// Income dispersion and trend, or `None` with fewer than two income
    /// transactions
    pub fn income_stability(&self) -> Option<IncomeStability> {
        let incomes: Vec<f64> = self
            .transactions
            .iter()
            .filter(|t| t.kind == TransactionKind::Income)
            .map(|t| t.amount)
            .collect();

        if incomes.len() < 2 {
            return None;
        }

        let cv = coefficient_of_variation(&incomes);

        Some(IncomeStability {
            stable: cv < STABLE_CV,
            variability_percent: cv * 100.0,
            trend: income_trend(&incomes),
        })
    }

    /// OLS forecast of expense volume `days_ahead` past the snapshot
    ///
    /// Fits `amount = a + b * index` over expense transactions in their
    /// given order and evaluates at `count + days_ahead`. The raw fitted
    /// value is returned unclamped, so a falling trend can predict a
    /// negative amount. With no expense transactions the forecast is 0.0;
    /// with exactly one it is that transaction's amount.
    pub fn predict_future_expenses(&self, days_ahead: u32) -> f64 {
        let amounts: Vec<f64> = self
            .transactions
            .iter()
            .filter(|t| t.kind == TransactionKind::Expense)
            .map(|t| t.amount)
            .collect();

        match amounts.len() {
            0 => 0.0,
            1 => amounts[0],
            n => {
                let n_f = n as f64;
                let sum_x: f64 = (0..n).map(|i| i as f64).sum();
                let sum_y: f64 = amounts.iter().sum();
                let sum_xy: f64 = amounts.iter().enumerate().map(|(i, y)| i as f64 * y).sum();
                let sum_xx: f64 = (0..n).map(|i| (i as f64).powi(2)).sum();

                let slope = (n_f * sum_xy - sum_x * sum_y) / (n_f * sum_xx - sum_x * sum_x);
                let intercept = (sum_y - slope * sum_x) / n_f;

                intercept + slope * (n_f + days_ahead as f64)
            }
        }
    }

    /// Full analysis bundle for dashboard display
    pub fn report(&self, forecast_days: u32) -> AnalysisReport {
        AnalysisReport {
            spending: self.spending_patterns(),
            anomalies: self.detect_anomalies(),
            recommendations: self.savings_recommendations(),
            income: self.income_stability(),
            forecast_days,
            forecast: self.predict_future_expenses(forecast_days),
        }
    }
}

/// Population standard deviation divided by the mean; 0 when the mean is 0
fn coefficient_of_variation(values: &[f64]) -> f64 {
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    if mean == 0.0 {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt() / mean
}

/// Compares the means of the first and second halves of the series
fn income_trend(values: &[f64]) -> IncomeTrend {
    let mid = values.len() / 2;
    let (first, second) = values.split_at(mid);

    let first_mean = first.iter().sum::<f64>() / first.len() as f64;
    let second_mean = second.iter().sum::<f64>() / second.len() as f64;

    if first_mean == 0.0 {
        return IncomeTrend::Stable;
    }

    let percent_change = (second_mean - first_mean) / first_mean * 100.0;

    if percent_change > TREND_PERCENT {
        IncomeTrend::Increasing
    } else if percent_change < -TREND_PERCENT {
        IncomeTrend::Decreasing
    } else {
        IncomeTrend::Stable
    }
}
