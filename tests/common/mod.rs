#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use chrono::{Duration as ChronoDuration, NaiveDate, Utc};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;
use uuid::Uuid;

use trainer_desk::api::{create_routes, AppState};
use trainer_desk::auth::{SessionGate, TrainerSession};
use trainer_desk::config::PlanConfig;
use trainer_desk::models::*;
use trainer_desk::services::{RosterService, WorkoutPlanService};
use trainer_desk::store::{submission_fingerprint, RosterStore, StoreError, WorkoutPlanStore};

pub const TEST_SECRET: &str = "test_secret";

static INIT: Once = Once::new();

/// Initialize test logging
pub fn init_test_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init();
    });
}

/// Plan settings that keep retry tests fast.
pub fn fast_plan_config() -> PlanConfig {
    PlanConfig {
        commit_backoff: Duration::from_millis(1),
        commit_timeout: Duration::from_millis(500),
        ..PlanConfig::default()
    }
}

#[derive(Default)]
struct StoreState {
    exercises: Vec<Exercise>,
    students: Vec<Student>,
    payments: Vec<Payment>,
    assessments: Vec<Assessment>,
    plans: HashMap<Uuid, Vec<WorkoutAssignment>>,
    /// idempotency key -> (student, submission fingerprint)
    commits: HashMap<Uuid, (Uuid, String)>,
    fail_catalog: bool,
    fail_inserts: bool,
    transient_failures: u32,
    lost_acks: u32,
    replace_calls: u32,
    replace_delay: Option<Duration>,
}

/// Data Store double. Replacements are all-or-nothing like the PostgreSQL adapter, and
/// failures can be injected per call.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog(catalog: Vec<Exercise>) -> Self {
        let store = Self::new();
        store.state.lock().unwrap().exercises = catalog;
        store
    }

    pub fn add_student(&self, student: Student) -> Student {
        self.state.lock().unwrap().students.push(student.clone());
        student
    }

    pub fn add_payment(&self, payment: Payment) {
        self.state.lock().unwrap().payments.push(payment);
    }

    pub fn add_assessment(&self, assessment: Assessment) {
        self.state.lock().unwrap().assessments.push(assessment);
    }

    /// Plan present before any commit of the test.
    pub fn seed_plan(&self, student_id: Uuid, rows: &[NewWorkoutAssignment]) {
        let plan = materialize(student_id, rows);
        self.state.lock().unwrap().plans.insert(student_id, plan);
    }

    pub fn plan_of(&self, student_id: Uuid) -> Vec<WorkoutAssignment> {
        self.state
            .lock()
            .unwrap()
            .plans
            .get(&student_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn fail_catalog(&self) {
        self.state.lock().unwrap().fail_catalog = true;
    }

    /// Every insert fails after the delete, inside the transaction.
    pub fn fail_inserts(&self) {
        self.state.lock().unwrap().fail_inserts = true;
    }

    /// The next `n` replacements fail before touching the plan.
    pub fn fail_next_replacements(&self, n: u32) {
        self.state.lock().unwrap().transient_failures = n;
    }

    /// The next `n` replacements are applied but report a dropped connection.
    pub fn lose_next_acks(&self, n: u32) {
        self.state.lock().unwrap().lost_acks = n;
    }

    pub fn delay_replacements(&self, delay: Duration) {
        self.state.lock().unwrap().replace_delay = Some(delay);
    }

    pub fn replace_calls(&self) -> u32 {
        self.state.lock().unwrap().replace_calls
    }
}

fn materialize(student_id: Uuid, rows: &[NewWorkoutAssignment]) -> Vec<WorkoutAssignment> {
    rows.iter()
        .enumerate()
        .map(|(position, row)| WorkoutAssignment {
            id: Uuid::new_v4(),
            student_id,
            exercise_id: row.exercise_id,
            position: position as i32,
            sets: row.sets,
            reps: row.reps,
            rest_seconds: row.rest_seconds,
            weekly_sessions: row.weekly_sessions,
            notes: row.notes.clone(),
            created_at: Utc::now(),
        })
        .collect()
}

fn owns(state: &StoreState, owner: Uuid, student_id: Uuid) -> bool {
    state
        .students
        .iter()
        .any(|s| s.id == student_id && s.user_id == owner)
}

#[async_trait]
impl WorkoutPlanStore for InMemoryStore {
    async fn list_exercises(&self) -> Result<Vec<Exercise>, StoreError> {
        let state = self.state.lock().unwrap();
        if state.fail_catalog {
            return Err(StoreError::Unavailable("catalog offline".into()));
        }
        let mut catalog = state.exercises.clone();
        sort_catalog(&mut catalog);
        Ok(catalog)
    }

    async fn list_assignments(
        &self,
        owner: Uuid,
        student_id: Uuid,
    ) -> Result<Vec<WorkoutAssignment>, StoreError> {
        let state = self.state.lock().unwrap();
        if !owns(&state, owner, student_id) {
            return Ok(Vec::new());
        }
        Ok(state.plans.get(&student_id).cloned().unwrap_or_default())
    }

    async fn replace_plan(
        &self,
        owner: Uuid,
        student_id: Uuid,
        idempotency_key: Uuid,
        rows: &[NewWorkoutAssignment],
    ) -> Result<Vec<WorkoutAssignment>, StoreError> {
        let delay = self.state.lock().unwrap().replace_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state.lock().unwrap();
        state.replace_calls += 1;

        if state.transient_failures > 0 {
            state.transient_failures -= 1;
            return Err(StoreError::Unavailable("connection reset".into()));
        }

        if !owns(&state, owner, student_id) {
            return Err(StoreError::NotFound);
        }

        let fingerprint = submission_fingerprint(rows);
        if let Some((previous, recorded)) = state.commits.get(&idempotency_key) {
            if *previous != student_id {
                return Err(StoreError::Conflict(format!(
                    "idempotency key {idempotency_key} was used for another student"
                )));
            }
            if *recorded != fingerprint {
                return Err(StoreError::Conflict(format!(
                    "idempotency key {idempotency_key} was used for a different plan"
                )));
            }
            return Ok(state.plans.get(&student_id).cloned().unwrap_or_default());
        }

        if rows.iter().any(|r| !state.exercises.iter().any(|e| e.id == r.exercise_id)) {
            return Err(StoreError::Constraint("unknown exercise".into()));
        }

        // Delete then insert; a failed insert rolls the delete back.
        let previous = state.plans.remove(&student_id);
        if state.fail_inserts {
            if let Some(previous) = previous {
                state.plans.insert(student_id, previous);
            }
            return Err(StoreError::Constraint("insert rejected".into()));
        }

        let plan = materialize(student_id, rows);
        state.plans.insert(student_id, plan.clone());
        state.commits.insert(idempotency_key, (student_id, fingerprint));

        if state.lost_acks > 0 {
            state.lost_acks -= 1;
            return Err(StoreError::Unavailable("response lost".into()));
        }

        Ok(plan)
    }
}

#[async_trait]
impl RosterStore for InMemoryStore {
    async fn list_students(&self, owner: Uuid) -> Result<Vec<Student>, StoreError> {
        let state = self.state.lock().unwrap();
        let mut students: Vec<Student> = state
            .students
            .iter()
            .filter(|s| s.user_id == owner)
            .cloned()
            .collect();
        students.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(students)
    }

    async fn get_student(&self, owner: Uuid, student_id: Uuid) -> Result<Option<Student>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .students
            .iter()
            .find(|s| s.id == student_id && s.user_id == owner)
            .cloned())
    }

    async fn list_payments(&self, owner: Uuid) -> Result<Vec<Payment>, StoreError> {
        let state = self.state.lock().unwrap();
        let mut payments: Vec<Payment> = state
            .payments
            .iter()
            .filter(|p| owns(&state, owner, p.student_id))
            .cloned()
            .collect();
        payments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(payments)
    }

    async fn list_assessments(&self, owner: Uuid) -> Result<Vec<Assessment>, StoreError> {
        let state = self.state.lock().unwrap();
        let mut assessments: Vec<Assessment> = state
            .assessments
            .iter()
            .filter(|a| owns(&state, owner, a.student_id))
            .cloned()
            .collect();
        assessments.sort_by(|a, b| {
            b.assessed_on
                .cmp(&a.assessed_on)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(assessments)
    }
}

/// Mock data generators
pub struct MockDataGenerator;

impl MockDataGenerator {
    pub fn exercise(name: &str, muscle_group: &str) -> Exercise {
        Exercise {
            id: Uuid::new_v4(),
            name: name.to_string(),
            muscle_group: muscle_group.to_string(),
            description: None,
        }
    }

    pub fn catalog() -> Vec<Exercise> {
        vec![
            Self::exercise("Bench", "Chest"),
            Self::exercise("Squat", "Legs"),
            Self::exercise("Cable Fly", "Chest"),
            Self::exercise("Row", "Back"),
        ]
    }

    pub fn student(owner: Uuid, status: StudentStatus) -> Student {
        Student {
            id: Uuid::new_v4(),
            user_id: owner,
            name: Name().fake(),
            email: Some(SafeEmail().fake()),
            phone: None,
            status,
            goal: Some("Hypertrophy".to_string()),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 15),
            notes: None,
            created_at: Utc::now() - ChronoDuration::days((1..365).fake::<i64>()),
        }
    }

    pub fn named_student(owner: Uuid, name: &str, status: StudentStatus) -> Student {
        Student {
            name: name.to_string(),
            ..Self::student(owner, status)
        }
    }

    pub fn payment(student_id: Uuid, status: PaymentStatus, month: &str, amount_cents: i64) -> Payment {
        Payment {
            id: Uuid::new_v4(),
            student_id,
            paid_on: None,
            amount_cents,
            status,
            reference_month: month.to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn assessment(student_id: Uuid, assessed_on: NaiveDate, weight_kg: f64) -> Assessment {
        Assessment {
            id: Uuid::new_v4(),
            student_id,
            assessed_on,
            weight_kg: Some(weight_kg),
            body_fat_percent: Some((12.0..30.0).fake()),
            max_bench_press_kg: None,
            max_squat_kg: None,
            notes: None,
            created_at: Utc::now(),
        }
    }

    pub fn row(exercise_id: Uuid) -> NewWorkoutAssignment {
        NewWorkoutAssignment {
            exercise_id,
            sets: DEFAULT_SETS,
            reps: DEFAULT_REPS,
            rest_seconds: DEFAULT_REST_SECONDS,
            weekly_sessions: DEFAULT_WEEKLY_SESSIONS,
            notes: None,
        }
    }
}

pub fn session(owner: Uuid) -> TrainerSession {
    TrainerSession {
        user_id: owner,
        email: "coach@example.com".to_string(),
    }
}

/// `Authorization` header value for `owner`.
pub fn bearer(owner: Uuid) -> String {
    let token = SessionGate::new(TEST_SECRET)
        .issue_token(owner, "coach@example.com")
        .unwrap();
    format!("Bearer {token}")
}

pub fn test_app(store: Arc<InMemoryStore>, config: PlanConfig) -> Router {
    let state = AppState {
        plan_service: WorkoutPlanService::new(store.clone(), config),
        roster_service: RosterService::new(store.clone(), store),
        gate: SessionGate::new(TEST_SECRET),
    };
    create_routes(state)
}
