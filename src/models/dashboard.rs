use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::assessment::Assessment;
use crate::models::payment::{Payment, PaymentStatus};
use crate::models::student::{Student, StudentStatus};

/// Entries of each kind the activity feed keeps.
pub const RECENT_ACTIVITY_PER_KIND: usize = 3;

/// Headline counters of the trainer dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub total_students: usize,
    pub active_students: usize,
    pub overdue_students: usize,
    /// Sum of paid payments billed for the current month.
    pub monthly_revenue_cents: i64,
    pub month: String,
}

impl DashboardSummary {
    pub fn compute(students: &[Student], payments: &[Payment], today: NaiveDate) -> Self {
        let month = today.format("%Y-%m").to_string();

        let monthly_revenue_cents = payments
            .iter()
            .filter(|p| p.status == PaymentStatus::Paid && p.reference_month.starts_with(&month))
            .map(|p| p.amount_cents)
            .sum();

        Self {
            total_students: students.len(),
            active_students: count_status(students, StudentStatus::Active),
            overdue_students: count_status(students, StudentStatus::Overdue),
            monthly_revenue_cents,
            month,
        }
    }
}

fn count_status(students: &[Student], status: StudentStatus) -> usize {
    students.iter().filter(|s| s.status == status).count()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Assessment,
    Payment,
}

/// One line of the dashboard's recent activity feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityItem {
    pub id: Uuid,
    pub kind: ActivityKind,
    pub student_id: Uuid,
    pub student_name: String,
    /// Payments only.
    pub amount_cents: Option<i64>,
    pub occurred_at: DateTime<Utc>,
}

/// The latest logged assessments and payments merged into one feed, newest first.
/// Entries whose student is not in `students` are dropped.
pub fn recent_activity(
    students: &[Student],
    assessments: &[Assessment],
    payments: &[Payment],
) -> Vec<ActivityItem> {
    let names: HashMap<Uuid, &str> = students.iter().map(|s| (s.id, s.name.as_str())).collect();
    let item = |id, kind, student_id: Uuid, amount_cents, occurred_at| {
        names.get(&student_id).map(|name| ActivityItem {
            id,
            kind,
            student_id,
            student_name: name.to_string(),
            amount_cents,
            occurred_at,
        })
    };

    let mut latest_assessments: Vec<ActivityItem> = assessments
        .iter()
        .filter_map(|a| item(a.id, ActivityKind::Assessment, a.student_id, None, a.created_at))
        .collect();
    let mut latest_payments: Vec<ActivityItem> = payments
        .iter()
        .filter_map(|p| {
            item(p.id, ActivityKind::Payment, p.student_id, Some(p.amount_cents), p.created_at)
        })
        .collect();

    let mut feed = Vec::with_capacity(RECENT_ACTIVITY_PER_KIND * 2);
    for items in [&mut latest_assessments, &mut latest_payments] {
        items.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
        items.truncate(RECENT_ACTIVITY_PER_KIND);
        feed.append(items);
    }
    feed.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
    feed
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    fn student(status: StudentStatus) -> Student {
        Student {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            name: "S".to_string(),
            email: None,
            phone: None,
            status,
            goal: None,
            start_date: None,
            notes: None,
            created_at: Utc::now(),
        }
    }

    fn payment(amount_cents: i64, status: PaymentStatus, month: &str) -> Payment {
        Payment {
            id: Uuid::new_v4(),
            student_id: Uuid::nil(),
            paid_on: None,
            amount_cents,
            status,
            reference_month: month.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_compute_summary() {
        let students = vec![
            student(StudentStatus::Active),
            student(StudentStatus::Active),
            student(StudentStatus::Overdue),
            student(StudentStatus::Inactive),
        ];
        let payments = vec![
            payment(15_000, PaymentStatus::Paid, "2024-03"),
            payment(12_000, PaymentStatus::Paid, "2024-03"),
            payment(9_000, PaymentStatus::Pending, "2024-03"),
            payment(20_000, PaymentStatus::Paid, "2024-02"),
        ];
        let today = NaiveDate::from_ymd_opt(2024, 3, 18).unwrap();

        assert_eq!(
            DashboardSummary::compute(&students, &payments, today),
            DashboardSummary {
                total_students: 4,
                active_students: 2,
                overdue_students: 1,
                monthly_revenue_cents: 27_000,
                month: "2024-03".to_string(),
            }
        );
    }

    fn logged(student_id: Uuid, minutes_ago: i64) -> Assessment {
        Assessment {
            id: Uuid::new_v4(),
            student_id,
            assessed_on: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            weight_kg: None,
            body_fat_percent: None,
            max_bench_press_kg: None,
            max_squat_kg: None,
            notes: None,
            created_at: Utc::now() - chrono::Duration::minutes(minutes_ago),
        }
    }

    #[test]
    fn test_recent_activity_keeps_three_of_each_newest_first() {
        let ana = student(StudentStatus::Active);
        let assessments: Vec<_> = [50, 10, 40, 30].iter().map(|m| logged(ana.id, *m)).collect();
        let payments: Vec<_> = [5, 45, 25, 60]
            .iter()
            .map(|m| Payment {
                student_id: ana.id,
                created_at: Utc::now() - chrono::Duration::minutes(*m),
                ..payment(10_000, PaymentStatus::Paid, "2024-03")
            })
            .collect();

        let feed = recent_activity(&[ana.clone()], &assessments, &payments);

        assert_eq!(feed.len(), 6);
        assert!(feed.windows(2).all(|w| w[0].occurred_at >= w[1].occurred_at));
        let kinds: Vec<_> = feed.iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ActivityKind::Payment,
                ActivityKind::Assessment,
                ActivityKind::Payment,
                ActivityKind::Assessment,
                ActivityKind::Assessment,
                ActivityKind::Payment,
            ]
        );
        // the oldest of each kind fell off
        assert!(!feed.iter().any(|i| i.id == assessments[0].id || i.id == payments[3].id));
        assert!(feed.iter().all(|i| i.student_name == ana.name));
        assert_eq!(feed[0].amount_cents, Some(10_000));
        assert_eq!(feed[1].amount_cents, None);
    }

    #[test]
    fn test_recent_activity_skips_unknown_students() {
        let ana = student(StudentStatus::Active);
        let feed = recent_activity(&[ana], &[logged(Uuid::new_v4(), 1)], &[]);
        assert!(feed.is_empty());
    }

    #[test]
    fn test_compute_empty() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let summary = DashboardSummary::compute(&[], &[], today);
        assert_eq!(summary.total_students, 0);
        assert_eq!(summary.monthly_revenue_cents, 0);
    }
}
