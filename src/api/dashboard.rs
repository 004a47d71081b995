use axum::{extract::State, response::Json, routing::get, Extension, Router};
use chrono::Utc;

use super::AppState;
use crate::auth::TrainerSession;
use crate::errors::RosterError;
use crate::models::{ActivityItem, DashboardSummary, Student};

pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(get_dashboard))
        .route("/dashboard/overdue", get(get_overdue_students))
        .route("/dashboard/activity", get(get_recent_activity))
}

pub async fn get_dashboard(
    State(state): State<AppState>,
    Extension(session): Extension<TrainerSession>,
) -> Result<Json<DashboardSummary>, RosterError> {
    let today = Utc::now().date_naive();
    let summary = state.roster_service.dashboard(&session, today).await?;
    Ok(Json(summary))
}

pub async fn get_overdue_students(
    State(state): State<AppState>,
    Extension(session): Extension<TrainerSession>,
) -> Result<Json<Vec<Student>>, RosterError> {
    let students = state.roster_service.overdue_students(&session).await?;
    Ok(Json(students))
}

pub async fn get_recent_activity(
    State(state): State<AppState>,
    Extension(session): Extension<TrainerSession>,
) -> Result<Json<Vec<ActivityItem>>, RosterError> {
    let activity = state.roster_service.recent_activity(&session).await?;
    Ok(Json(activity))
}
