use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

pub const DEFAULT_SETS: i32 = 3;
pub const DEFAULT_REPS: i32 = 12;
pub const DEFAULT_REST_SECONDS: i32 = 60;
pub const DEFAULT_WEEKLY_SESSIONS: i32 = 3;

/// One stored row of a student's plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct WorkoutAssignment {
    pub id: Uuid,
    pub student_id: Uuid,
    pub exercise_id: Uuid,
    pub position: i32,
    pub sets: i32,
    pub reps: i32,
    pub rest_seconds: i32,
    pub weekly_sessions: i32,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A row about to be written by a plan replacement. The student is supplied by the
/// replacement call and the position by the row's index in the submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NewWorkoutAssignment {
    pub exercise_id: Uuid,
    #[validate(range(min = 1))]
    pub sets: i32,
    #[validate(range(min = 1))]
    pub reps: i32,
    #[validate(range(min = 1))]
    pub rest_seconds: i32,
    #[validate(range(min = 1, max = 7))]
    pub weekly_sessions: i32,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

/// Blank notes are stored as NULL.
pub fn normalize_notes(notes: &str) -> Option<String> {
    let trimmed = notes.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
