use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::get,
    Extension, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use super::AppState;
use crate::auth::TrainerSession;
use crate::errors::RosterError;
use crate::models::{Student, StudentDetails, StudentFilter, StudentStatus};

#[derive(Debug, Deserialize)]
pub struct StudentQuery {
    pub search: Option<String>,
    /// `active`, `inactive` or `overdue`; blank or `all` means any.
    pub status: Option<String>,
}

impl StudentQuery {
    pub fn into_filter(self) -> Result<StudentFilter, RosterError> {
        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") | Some("all") => None,
            Some(value) => Some(
                value
                    .parse::<StudentStatus>()
                    .map_err(|err| RosterError::InvalidFilter(err.to_string()))?,
            ),
        };

        Ok(StudentFilter {
            search: self.search,
            status,
        })
    }
}

pub fn student_routes() -> Router<AppState> {
    Router::new()
        .route("/students", get(list_students))
        .route("/students/:student_id", get(get_student))
}

pub async fn list_students(
    State(state): State<AppState>,
    Extension(session): Extension<TrainerSession>,
    Query(query): Query<StudentQuery>,
) -> Result<Json<Vec<Student>>, RosterError> {
    let filter = query.into_filter()?;
    let students = state.roster_service.list_students(&session, &filter).await?;
    Ok(Json(students))
}

/// Student page: the student, their plan, assessments and payments.
pub async fn get_student(
    State(state): State<AppState>,
    Extension(session): Extension<TrainerSession>,
    Path(student_id): Path<Uuid>,
) -> Result<Json<StudentDetails>, RosterError> {
    let details = state
        .roster_service
        .student_details(&session, student_id)
        .await?;
    Ok(Json(details))
}
