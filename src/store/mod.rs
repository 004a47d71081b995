//! Data Store boundary.
//!
//! Every read or write of trainer-owned rows takes the owner's user id; implementations
//! must only ever see students whose `user_id` equals it.

pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    Assessment, Exercise, NewWorkoutAssignment, Payment, Student, WorkoutAssignment,
};

pub use postgres::PgStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("constraint violated: {0}")]
    Constraint(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("store call timed out")]
    Timeout,
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl StoreError {
    /// Whether repeating the same call may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Unavailable(_) | StoreError::Timeout)
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => StoreError::Unavailable(err.to_string()),
            sqlx::Error::Database(ref db) => {
                let code = db.code().map(|c| c.into_owned());
                let message = db.message().to_string();
                match code.as_deref() {
                    // unique_violation
                    Some("23505") => StoreError::Conflict(message),
                    // foreign_key_violation, check_violation, not_null_violation
                    Some("23503") | Some("23514") | Some("23502") => StoreError::Constraint(message),
                    // serialization_failure, deadlock_detected
                    Some("40001") | Some("40P01") => StoreError::Unavailable(message),
                    _ => StoreError::Database(err),
                }
            }
            other => StoreError::Database(other),
        }
    }
}

/// Digest of an ordered submission, recorded with its idempotency key.
pub fn submission_fingerprint(rows: &[NewWorkoutAssignment]) -> String {
    let mut context = md5::Context::new();
    for row in rows {
        context.consume(format!(
            "{}|{}|{}|{}|{}|{:?}\n",
            row.exercise_id, row.sets, row.reps, row.rest_seconds, row.weekly_sessions, row.notes
        ));
    }
    format!("{:x}", context.compute())
}

#[async_trait]
pub trait WorkoutPlanStore: Send + Sync {
    /// Whole catalog ordered by muscle group, then name.
    async fn list_exercises(&self) -> Result<Vec<Exercise>, StoreError>;

    /// The student's plan in position order. Empty for unknown or foreign students.
    async fn list_assignments(
        &self,
        owner: Uuid,
        student_id: Uuid,
    ) -> Result<Vec<WorkoutAssignment>, StoreError>;

    /// Atomically replaces the student's plan with `rows`. Either every old row is
    /// gone and every new row is visible, or nothing changed.
    ///
    /// A previously seen `idempotency_key` for the same student and the same rows returns
    /// the current plan without writing; the same key with other rows or another student
    /// is a `Conflict`. `NotFound` when the student does not belong to `owner`.
    async fn replace_plan(
        &self,
        owner: Uuid,
        student_id: Uuid,
        idempotency_key: Uuid,
        rows: &[NewWorkoutAssignment],
    ) -> Result<Vec<WorkoutAssignment>, StoreError>;
}

#[async_trait]
pub trait RosterStore: Send + Sync {
    /// The owner's students ordered by name.
    async fn list_students(&self, owner: Uuid) -> Result<Vec<Student>, StoreError>;

    async fn get_student(&self, owner: Uuid, student_id: Uuid) -> Result<Option<Student>, StoreError>;

    /// Payments of the owner's students, newest first.
    async fn list_payments(&self, owner: Uuid) -> Result<Vec<Payment>, StoreError>;

    /// Assessments of the owner's students, latest assessment date first.
    async fn list_assessments(&self, owner: Uuid) -> Result<Vec<Assessment>, StoreError>;
}
