use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Extension, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use super::AppState;
use crate::auth::TrainerSession;
use crate::errors::RosterError;
use crate::models::Assessment;

#[derive(Debug, Deserialize)]
pub struct AssessmentQuery {
    pub student_id: Option<Uuid>,
}

pub fn assessment_routes() -> Router<AppState> {
    Router::new().route("/assessments", get(list_assessments))
}

pub async fn list_assessments(
    State(state): State<AppState>,
    Extension(session): Extension<TrainerSession>,
    Query(query): Query<AssessmentQuery>,
) -> Result<Json<Vec<Assessment>>, RosterError> {
    let assessments = state
        .roster_service
        .assessments(&session, query.student_id)
        .await?;
    Ok(Json(assessments))
}
