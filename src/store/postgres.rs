use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use tracing::debug;
use uuid::Uuid;

use crate::models::{
    Assessment, Exercise, NewWorkoutAssignment, Payment, PaymentStatus, Student, StudentStatus,
    WorkoutAssignment,
};
use crate::store::{submission_fingerprint, RosterStore, StoreError, WorkoutPlanStore};

const ASSIGNMENT_COLUMNS: &str =
    "id, student_id, exercise_id, position, sets, reps, rest_seconds, weekly_sessions, notes, created_at";

/// How long an idempotency key can be replayed before it is pruned.
pub const DEFAULT_KEY_RETENTION: Duration = Duration::from_secs(24 * 60 * 60);

/// PostgreSQL implementation of the Data Store traits.
#[derive(Debug, Clone)]
pub struct PgStore {
    db: PgPool,
    key_retention: Duration,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self {
            db,
            key_retention: DEFAULT_KEY_RETENTION,
        }
    }

    pub fn with_key_retention(mut self, retention: Duration) -> Self {
        self.key_retention = retention;
        self
    }
}

#[derive(FromRow)]
struct StudentRecord {
    id: Uuid,
    user_id: Uuid,
    name: String,
    email: Option<String>,
    phone: Option<String>,
    status: String,
    goal: Option<String>,
    start_date: Option<NaiveDate>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<StudentRecord> for Student {
    type Error = StoreError;

    fn try_from(record: StudentRecord) -> Result<Self, Self::Error> {
        let status: StudentStatus = record
            .status
            .parse()
            .map_err(|err| StoreError::Constraint(format!("student {}: {err}", record.id)))?;

        Ok(Student {
            id: record.id,
            user_id: record.user_id,
            name: record.name,
            email: record.email,
            phone: record.phone,
            status,
            goal: record.goal,
            start_date: record.start_date,
            notes: record.notes,
            created_at: record.created_at,
        })
    }
}

#[derive(FromRow)]
struct PaymentRecord {
    id: Uuid,
    student_id: Uuid,
    paid_on: Option<NaiveDate>,
    amount_cents: i64,
    status: String,
    reference_month: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<PaymentRecord> for Payment {
    type Error = StoreError;

    fn try_from(record: PaymentRecord) -> Result<Self, Self::Error> {
        let status: PaymentStatus = record
            .status
            .parse()
            .map_err(|err| StoreError::Constraint(format!("payment {}: {err}", record.id)))?;

        Ok(Payment {
            id: record.id,
            student_id: record.student_id,
            paid_on: record.paid_on,
            amount_cents: record.amount_cents,
            status,
            reference_month: record.reference_month,
            created_at: record.created_at,
        })
    }
}

#[async_trait]
impl WorkoutPlanStore for PgStore {
    async fn list_exercises(&self) -> Result<Vec<Exercise>, StoreError> {
        let exercises = sqlx::query_as::<_, Exercise>(
            "SELECT id, name, muscle_group, description FROM exercises ORDER BY muscle_group, name",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(exercises)
    }

    async fn list_assignments(
        &self,
        owner: Uuid,
        student_id: Uuid,
    ) -> Result<Vec<WorkoutAssignment>, StoreError> {
        let assignments = sqlx::query_as::<_, WorkoutAssignment>(
            "SELECT wa.id, wa.student_id, wa.exercise_id, wa.position, wa.sets, wa.reps,
                    wa.rest_seconds, wa.weekly_sessions, wa.notes, wa.created_at
             FROM workout_assignments wa
             JOIN students s ON s.id = wa.student_id
             WHERE wa.student_id = $1 AND s.user_id = $2
             ORDER BY wa.position",
        )
        .bind(student_id)
        .bind(owner)
        .fetch_all(&self.db)
        .await?;

        Ok(assignments)
    }

    async fn replace_plan(
        &self,
        owner: Uuid,
        student_id: Uuid,
        idempotency_key: Uuid,
        rows: &[NewWorkoutAssignment],
    ) -> Result<Vec<WorkoutAssignment>, StoreError> {
        // Dropping `tx` on any early return rolls the whole replacement back.
        let mut tx = self.db.begin().await?;

        // Row lock serialises concurrent replacements of the same plan.
        sqlx::query("SELECT id FROM students WHERE id = $1 AND user_id = $2 FOR UPDATE")
            .bind(student_id)
            .bind(owner)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(StoreError::NotFound)?;

        // Pruned under the student lock so pruning never races another replacement.
        sqlx::query(
            "DELETE FROM plan_commits
             WHERE student_id = $1 AND committed_at < NOW() - make_interval(secs => $2)",
        )
        .bind(student_id)
        .bind(self.key_retention.as_secs_f64())
        .execute(&mut *tx)
        .await?;

        let fingerprint = submission_fingerprint(rows);
        let recorded = sqlx::query(
            "INSERT INTO plan_commits (idempotency_key, student_id, fingerprint) VALUES ($1, $2, $3)
             ON CONFLICT (idempotency_key) DO NOTHING",
        )
        .bind(idempotency_key)
        .bind(student_id)
        .bind(&fingerprint)
        .execute(&mut *tx)
        .await?;

        if recorded.rows_affected() == 0 {
            let (previous_student, previous_fingerprint): (Uuid, String) = sqlx::query_as(
                "SELECT student_id, fingerprint FROM plan_commits WHERE idempotency_key = $1",
            )
            .bind(idempotency_key)
            .fetch_one(&mut *tx)
            .await?;

            if previous_student != student_id {
                return Err(StoreError::Conflict(format!(
                    "idempotency key {idempotency_key} was used for another student"
                )));
            }
            if previous_fingerprint != fingerprint {
                return Err(StoreError::Conflict(format!(
                    "idempotency key {idempotency_key} was used for a different plan"
                )));
            }

            let current = sqlx::query_as::<_, WorkoutAssignment>(&format!(
                "SELECT {ASSIGNMENT_COLUMNS} FROM workout_assignments WHERE student_id = $1 ORDER BY position"
            ))
            .bind(student_id)
            .fetch_all(&mut *tx)
            .await?;

            tx.commit().await?;
            debug!(%student_id, %idempotency_key, "replayed plan replacement");
            return Ok(current);
        }

        sqlx::query("DELETE FROM workout_assignments WHERE student_id = $1")
            .bind(student_id)
            .execute(&mut *tx)
            .await?;

        let mut inserted = Vec::with_capacity(rows.len());
        if !rows.is_empty() {
            let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
                "INSERT INTO workout_assignments \
                 (student_id, exercise_id, position, sets, reps, rest_seconds, weekly_sessions, notes) ",
            );
            builder.push_values(rows.iter().enumerate(), |mut b, (position, row)| {
                b.push_bind(student_id)
                    .push_bind(row.exercise_id)
                    .push_bind(position as i32)
                    .push_bind(row.sets)
                    .push_bind(row.reps)
                    .push_bind(row.rest_seconds)
                    .push_bind(row.weekly_sessions)
                    .push_bind(row.notes.clone());
            });
            builder.push(" RETURNING ");
            builder.push(ASSIGNMENT_COLUMNS);

            inserted = builder
                .build_query_as::<WorkoutAssignment>()
                .fetch_all(&mut *tx)
                .await?;
            inserted.sort_by_key(|a| a.position);
        }

        tx.commit().await?;
        Ok(inserted)
    }
}

#[async_trait]
impl RosterStore for PgStore {
    async fn list_students(&self, owner: Uuid) -> Result<Vec<Student>, StoreError> {
        let records = sqlx::query_as::<_, StudentRecord>(
            "SELECT id, user_id, name, email, phone, status, goal, start_date, notes, created_at
             FROM students WHERE user_id = $1 ORDER BY name",
        )
        .bind(owner)
        .fetch_all(&self.db)
        .await?;

        records.into_iter().map(Student::try_from).collect()
    }

    async fn get_student(&self, owner: Uuid, student_id: Uuid) -> Result<Option<Student>, StoreError> {
        let record = sqlx::query_as::<_, StudentRecord>(
            "SELECT id, user_id, name, email, phone, status, goal, start_date, notes, created_at
             FROM students WHERE id = $1 AND user_id = $2",
        )
        .bind(student_id)
        .bind(owner)
        .fetch_optional(&self.db)
        .await?;

        record.map(Student::try_from).transpose()
    }

    async fn list_payments(&self, owner: Uuid) -> Result<Vec<Payment>, StoreError> {
        let records = sqlx::query_as::<_, PaymentRecord>(
            "SELECT p.id, p.student_id, p.paid_on, p.amount_cents, p.status, p.reference_month, p.created_at
             FROM payments p
             JOIN students s ON s.id = p.student_id
             WHERE s.user_id = $1
             ORDER BY p.created_at DESC",
        )
        .bind(owner)
        .fetch_all(&self.db)
        .await?;

        records.into_iter().map(Payment::try_from).collect()
    }

    async fn list_assessments(&self, owner: Uuid) -> Result<Vec<Assessment>, StoreError> {
        let assessments = sqlx::query_as::<_, Assessment>(
            "SELECT a.id, a.student_id, a.assessed_on, a.weight_kg, a.body_fat_percent,
                    a.max_bench_press_kg, a.max_squat_kg, a.notes, a.created_at
             FROM assessments a
             JOIN students s ON s.id = a.student_id
             WHERE s.user_id = $1
             ORDER BY a.assessed_on DESC, a.created_at DESC",
        )
        .bind(owner)
        .fetch_all(&self.db)
        .await?;

        Ok(assessments)
    }
}
