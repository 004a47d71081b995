use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::auth::TrainerSession;
use crate::errors::RosterError;
use crate::models::{
    chronological, recent_activity, ActivityItem, Assessment, DashboardSummary, Payment,
    PaymentStatus, Student, StudentDetails, StudentFilter, StudentStatus,
};
use crate::store::{RosterStore, WorkoutPlanStore};

/// Read side of the trainer's desk: students, payments, assessments and the dashboard.
#[derive(Clone)]
pub struct RosterService {
    store: Arc<dyn RosterStore>,
    plans: Arc<dyn WorkoutPlanStore>,
}

impl RosterService {
    pub fn new(store: Arc<dyn RosterStore>, plans: Arc<dyn WorkoutPlanStore>) -> Self {
        Self { store, plans }
    }

    /// Owned students ordered by name, narrowed by `filter`.
    pub async fn list_students(
        &self,
        session: &TrainerSession,
        filter: &StudentFilter,
    ) -> Result<Vec<Student>, RosterError> {
        let students = self.store.list_students(session.user_id).await?;
        Ok(students.into_iter().filter(|s| filter.matches(s)).collect())
    }

    pub async fn get_student(
        &self,
        session: &TrainerSession,
        student_id: Uuid,
    ) -> Result<Student, RosterError> {
        self.store
            .get_student(session.user_id, student_id)
            .await?
            .ok_or(RosterError::StudentNotFound(student_id))
    }

    /// Students flagged overdue, most recently registered first.
    pub async fn overdue_students(
        &self,
        session: &TrainerSession,
    ) -> Result<Vec<Student>, RosterError> {
        let mut overdue: Vec<Student> = self
            .store
            .list_students(session.user_id)
            .await?
            .into_iter()
            .filter(|s| s.status == StudentStatus::Overdue)
            .collect();
        overdue.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(overdue)
    }

    /// Payments newest first, optionally restricted to one status.
    pub async fn payments(
        &self,
        session: &TrainerSession,
        status: Option<PaymentStatus>,
    ) -> Result<Vec<Payment>, RosterError> {
        let payments = self.store.list_payments(session.user_id).await?;
        Ok(payments
            .into_iter()
            .filter(|p| status.map_or(true, |s| p.status == s))
            .collect())
    }

    #[tracing::instrument(skip(self, session), fields(owner = %session.user_id))]
    pub async fn dashboard(
        &self,
        session: &TrainerSession,
        today: NaiveDate,
    ) -> Result<DashboardSummary, RosterError> {
        let (students, payments) = tokio::try_join!(
            self.store.list_students(session.user_id),
            self.store.list_payments(session.user_id),
        )?;
        Ok(DashboardSummary::compute(&students, &payments, today))
    }

    /// Assessments latest first, optionally for one student only.
    pub async fn assessments(
        &self,
        session: &TrainerSession,
        student_id: Option<Uuid>,
    ) -> Result<Vec<Assessment>, RosterError> {
        let assessments = self.store.list_assessments(session.user_id).await?;
        Ok(assessments
            .into_iter()
            .filter(|a| student_id.map_or(true, |id| a.student_id == id))
            .collect())
    }

    /// Latest assessments and payments merged into one feed, newest first.
    pub async fn recent_activity(
        &self,
        session: &TrainerSession,
    ) -> Result<Vec<ActivityItem>, RosterError> {
        let (students, assessments, payments) = tokio::try_join!(
            self.store.list_students(session.user_id),
            self.store.list_assessments(session.user_id),
            self.store.list_payments(session.user_id),
        )?;
        Ok(recent_activity(&students, &assessments, &payments))
    }

    /// The student with their plan, assessment history and payments.
    #[tracing::instrument(skip(self, session), fields(owner = %session.user_id))]
    pub async fn student_details(
        &self,
        session: &TrainerSession,
        student_id: Uuid,
    ) -> Result<StudentDetails, RosterError> {
        let student = self.get_student(session, student_id).await?;

        let (plan, assessments, payments) = tokio::try_join!(
            self.plans.list_assignments(session.user_id, student_id),
            self.store.list_assessments(session.user_id),
            self.store.list_payments(session.user_id),
        )?;

        let mut assessments: Vec<Assessment> = assessments
            .into_iter()
            .filter(|a| a.student_id == student_id)
            .collect();
        chronological(&mut assessments);

        Ok(StudentDetails {
            student,
            plan,
            assessments,
            payments: payments
                .into_iter()
                .filter(|p| p.student_id == student_id)
                .collect(),
        })
    }
}
