use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A physical assessment logged for a student. Every measurement is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Assessment {
    pub id: Uuid,
    pub student_id: Uuid,
    pub assessed_on: NaiveDate,
    pub weight_kg: Option<f64>,
    pub body_fat_percent: Option<f64>,
    pub max_bench_press_kg: Option<f64>,
    pub max_squat_kg: Option<f64>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Oldest first, the order a weight chart reads them in.
pub fn chronological(assessments: &mut [Assessment]) {
    assessments.sort_by(|a, b| {
        a.assessed_on
            .cmp(&b.assessed_on)
            .then_with(|| a.created_at.cmp(&b.created_at))
    });
}
