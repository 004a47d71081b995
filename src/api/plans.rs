use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Extension, Router,
};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use super::AppState;
use crate::auth::TrainerSession;
use crate::errors::PlanError;
use crate::models::{DraftField, WorkoutAssignment};

pub const IDEMPOTENCY_KEY_HEADER: &str = "idempotency-key";

/// One entry of a replacement plan. Omitted numbers keep the editor defaults.
#[derive(Debug, Deserialize)]
pub struct PlanEntry {
    pub exercise_id: Uuid,
    pub sets: Option<i32>,
    pub reps: Option<i32>,
    pub rest_seconds: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReplacePlanRequest {
    pub assignments: Vec<PlanEntry>,
}

/// Malformed plan bodies, rendered in the same JSON shape as the other API errors.
#[derive(Debug, Error)]
pub enum PlanBodyRejection {
    #[error(transparent)]
    Json(#[from] JsonRejection),
}

impl IntoResponse for PlanBodyRejection {
    fn into_response(self) -> Response {
        let PlanBodyRejection::Json(rejection) = self;
        (
            rejection.status(),
            Json(json!({
                "error": "Invalid request body",
                "message": rejection.body_text(),
            })),
        )
            .into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub student_id: Uuid,
    pub assignments: Vec<WorkoutAssignment>,
}

pub fn plan_routes() -> Router<AppState> {
    Router::new().route(
        "/students/:student_id/plan",
        get(get_plan).put(replace_plan),
    )
}

pub async fn get_plan(
    State(state): State<AppState>,
    Extension(session): Extension<TrainerSession>,
    Path(student_id): Path<Uuid>,
) -> Result<Json<PlanResponse>, Response> {
    state
        .roster_service
        .get_student(&session, student_id)
        .await
        .map_err(IntoResponse::into_response)?;

    let assignments = state
        .plan_service
        .current_plan(&session, student_id)
        .await
        .map_err(IntoResponse::into_response)?;

    Ok(Json(PlanResponse {
        student_id,
        assignments,
    }))
}

/// Replace-all commit of the student's plan.
pub async fn replace_plan(
    State(state): State<AppState>,
    Extension(session): Extension<TrainerSession>,
    Path(student_id): Path<Uuid>,
    headers: HeaderMap,
    WithRejection(Json(request), _): WithRejection<Json<ReplacePlanRequest>, PlanBodyRejection>,
) -> Result<Json<PlanResponse>, Response> {
    // Unknown and foreign students are a 404 whatever the body holds.
    state
        .roster_service
        .get_student(&session, student_id)
        .await
        .map_err(IntoResponse::into_response)?;

    let idempotency_key = idempotency_key(&headers)?;

    let mut editor = state
        .plan_service
        .open_editor(&session, student_id)
        .await
        .map_err(IntoResponse::into_response)?;

    for entry in request.assignments {
        let index = editor
            .add_exercise_by_id(entry.exercise_id)
            .map_err(|err| PlanError::from(err).into_response())?;

        let fields = [
            entry.sets.map(DraftField::Sets),
            entry.reps.map(DraftField::Reps),
            entry.rest_seconds.map(DraftField::RestSeconds),
            entry.notes.map(DraftField::Notes),
        ];
        for field in fields.into_iter().flatten() {
            editor
                .update_field(index, field)
                .map_err(|err| PlanError::from(err).into_response())?;
        }
    }

    let assignments = state
        .plan_service
        .commit(&session, &mut editor, idempotency_key)
        .await
        .map_err(IntoResponse::into_response)?;

    Ok(Json(PlanResponse {
        student_id,
        assignments,
    }))
}

fn idempotency_key(headers: &HeaderMap) -> Result<Option<Uuid>, Response> {
    let Some(value) = headers.get(IDEMPOTENCY_KEY_HEADER) else {
        return Ok(None);
    };

    value
        .to_str()
        .ok()
        .and_then(|v| Uuid::parse_str(v.trim()).ok())
        .map(Some)
        .ok_or_else(|| {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "Invalid idempotency key",
                    "message": "Idempotency-Key must be a UUID",
                })),
            )
                .into_response()
        })
}
