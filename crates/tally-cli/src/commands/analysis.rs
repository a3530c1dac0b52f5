//! Expense analytics report command

use anyhow::Result;

use tally_core::{Database, ExpenseAnalyzer, IncomeTrend};

pub fn cmd_analyze(db: &Database, user: &str, days_ahead: u32, limit: i64) -> Result<()> {
    let transactions = db.list_recent_transactions(user, limit)?;

    if transactions.is_empty() {
        println!("Nothing to analyze yet - record some transactions first.");
        return Ok(());
    }

    let count = transactions.len();
    let report = ExpenseAnalyzer::new(transactions).report(days_ahead);

    println!("📊 Analysis over the last {} transaction(s)", count);
    println!();

    if report.spending.is_empty() {
        println!("No expenses in the window.");
    } else {
        println!("Spending by category:");
        for pattern in &report.spending {
            println!(
                "  {:<18} {:>10.2}  {:>5.1}%{}",
                pattern.category,
                pattern.amount,
                pattern.percentage,
                if pattern.is_high_spending { "  ← high" } else { "" }
            );
        }
        println!();
    }

    if !report.anomalies.is_empty() {
        println!("Unusual transactions (>2σ from the mean):");
        for tx in &report.anomalies {
            println!("  {} {:.2} {} in {}", tx.date, tx.amount, tx.currency, tx.category);
        }
        println!();
    }

    if !report.recommendations.is_empty() {
        println!("Recommendations:");
        for rec in &report.recommendations {
            println!("  [{:<6}] {}", rec.priority.as_str(), rec.message);
        }
        println!();
    }

    match &report.income {
        Some(income) => {
            let trend = match income.trend {
                IncomeTrend::Increasing => "trending up",
                IncomeTrend::Decreasing => "trending down",
                IncomeTrend::Stable => "steady",
            };
            println!(
                "Income: {} ({}), variability {:.1}%",
                if income.stable { "stable" } else { "variable" },
                trend,
                income.variability_percent
            );
        }
        None => println!("Income: not enough income transactions to assess"),
    }

    println!(
        "Forecast: {:.2} expected expense volume {} day(s) out",
        report.forecast, report.forecast_days
    );

    Ok(())
}
