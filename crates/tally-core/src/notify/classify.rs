//! Due-date classification for bills

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Bill, BillStatus, NotificationSeverity};

/// Urgency bucket for a bill relative to the current date
///
/// Doubles as the dedup key part: one notification per
/// `(bill, classification)` within the rate-limit window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BillClassification {
    DueTomorrow,
    DueToday,
    Overdue,
}

impl BillClassification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DueTomorrow => "due-tomorrow",
            Self::DueToday => "due-today",
            Self::Overdue => "overdue",
        }
    }
}

impl std::str::FromStr for BillClassification {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "due-tomorrow" => Ok(Self::DueTomorrow),
            "due-today" => Ok(Self::DueToday),
            "overdue" => Ok(Self::Overdue),
            _ => Err(format!("Unknown bill classification: {}", s)),
        }
    }
}

impl std::fmt::Display for BillClassification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classification result with the notification content it implies
#[derive(Debug, Clone)]
pub struct BillAlert {
    pub classification: BillClassification,
    pub severity: NotificationSeverity,
    pub title: String,
    pub message: String,
}

/// Whole days until the due date, partial days rounding toward the future
///
/// The due date is taken as midnight UTC, so a bill due "tomorrow" yields 1
/// for any clock time today, 0 once the due day starts, and negative values
/// once it has passed.
pub fn days_until_due(due_date: NaiveDate, now: DateTime<Utc>) -> i64 {
    let due = due_date.and_hms_opt(0, 0, 0).unwrap().and_utc();
    let seconds = (due - now).num_seconds();
    (seconds as f64 / 86_400.0).ceil() as i64
}

/// Classify a bill by urgency relative to `now`
///
/// Paid bills never classify. Urgency is derived from the due date alone for
/// every other bill, regardless of the stored status. Bills due more than
/// one day out yield `None`.
pub fn classify(bill: &Bill, now: DateTime<Utc>) -> Option<BillAlert> {
    if bill.status == BillStatus::Paid {
        return None;
    }

    let days_diff = days_until_due(bill.due_date, now);

    match days_diff {
        1 => Some(BillAlert {
            classification: BillClassification::DueTomorrow,
            severity: NotificationSeverity::Warning,
            title: "Bill Due Tomorrow".to_string(),
            message: format!(
                "{} is due tomorrow ({:.2} {})",
                bill.title, bill.amount, bill.currency
            ),
        }),
        0 => Some(BillAlert {
            classification: BillClassification::DueToday,
            severity: NotificationSeverity::Error,
            title: "Bill Due Today".to_string(),
            message: format!(
                "{} is due today ({:.2} {})",
                bill.title, bill.amount, bill.currency
            ),
        }),
        d if d < 0 => {
            let days_late = d.abs();
            Some(BillAlert {
                classification: BillClassification::Overdue,
                severity: NotificationSeverity::Error,
                title: "Overdue Bill".to_string(),
                message: format!(
                    "{} was due {} day{} ago",
                    bill.title,
                    days_late,
                    if days_late == 1 { "" } else { "s" }
                ),
            })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn bill(due_date: NaiveDate, status: BillStatus) -> Bill {
        Bill {
            id: 1,
            user_id: "u1".to_string(),
            title: "Electricity".to_string(),
            amount: 85.5,
            currency: "USD".to_string(),
            due_date,
            status,
            last_acknowledged_at: None,
            created_at: Utc::now(),
        }
    }

    fn noon(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_days_until_due_rounds_toward_future() {
        let now = noon(2026, 3, 10);
        assert_eq!(
            days_until_due(NaiveDate::from_ymd_opt(2026, 3, 11).unwrap(), now),
            1
        );
        assert_eq!(
            days_until_due(NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(), now),
            0
        );
        assert_eq!(
            days_until_due(NaiveDate::from_ymd_opt(2026, 3, 9).unwrap(), now),
            -1
        );
        assert_eq!(
            days_until_due(NaiveDate::from_ymd_opt(2026, 3, 13).unwrap(), now),
            3
        );
    }

    #[test]
    fn test_classify_due_tomorrow() {
        let now = noon(2026, 3, 10);
        let b = bill(NaiveDate::from_ymd_opt(2026, 3, 11).unwrap(), BillStatus::Pending);

        let alert = classify(&b, now).unwrap();
        assert_eq!(alert.classification, BillClassification::DueTomorrow);
        assert_eq!(alert.severity, NotificationSeverity::Warning);
        assert!(alert.message.contains("due tomorrow"));
        assert!(alert.message.contains("85.50 USD"));
    }

    #[test]
    fn test_classify_due_today() {
        let now = noon(2026, 3, 10);
        let b = bill(NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(), BillStatus::Pending);

        let alert = classify(&b, now).unwrap();
        assert_eq!(alert.classification, BillClassification::DueToday);
        assert_eq!(alert.severity, NotificationSeverity::Error);
    }

    #[test]
    fn test_classify_overdue_plural() {
        let now = noon(2026, 3, 10);
        let b = bill(NaiveDate::from_ymd_opt(2026, 3, 7).unwrap(), BillStatus::Pending);

        let alert = classify(&b, now).unwrap();
        assert_eq!(alert.classification, BillClassification::Overdue);
        assert!(alert.message.contains("3 days ago"));
    }

    #[test]
    fn test_classify_overdue_singular() {
        let now = noon(2026, 3, 10);
        let b = bill(NaiveDate::from_ymd_opt(2026, 3, 9).unwrap(), BillStatus::Pending);

        let alert = classify(&b, now).unwrap();
        assert!(alert.message.contains("1 day ago"));
        assert!(!alert.message.contains("days ago"));
    }

    #[test]
    fn test_classify_paid_bill_never_notifies() {
        let now = noon(2026, 3, 10);
        let b = bill(NaiveDate::from_ymd_opt(2026, 3, 9).unwrap(), BillStatus::Paid);
        assert!(classify(&b, now).is_none());
    }

    #[test]
    fn test_classify_far_future_bill() {
        let now = noon(2026, 3, 10);
        let b = bill(NaiveDate::from_ymd_opt(2026, 3, 15).unwrap(), BillStatus::Pending);
        assert!(classify(&b, now).is_none());
    }

    #[test]
    fn test_classify_stored_overdue_status_still_classifies() {
        // Stored status is advisory; urgency comes from the due date
        let now = noon(2026, 3, 10);
        let b = bill(NaiveDate::from_ymd_opt(2026, 3, 8).unwrap(), BillStatus::Overdue);

        let alert = classify(&b, now).unwrap();
        assert_eq!(alert.classification, BillClassification::Overdue);
        assert!(alert.message.contains("2 days ago"));
    }
}
