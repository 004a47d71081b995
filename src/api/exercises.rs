use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Extension, Router,
};
use serde::Deserialize;

use super::AppState;
use crate::auth::TrainerSession;
use crate::errors::PlanError;
use crate::models::{CatalogFilter, CatalogPage};

#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    /// Muscle group to show; missing, blank or `all` shows the whole catalog.
    pub muscle_group: Option<String>,
}

pub fn exercise_routes() -> Router<AppState> {
    Router::new().route("/exercises", get(list_exercises))
}

pub async fn list_exercises(
    State(state): State<AppState>,
    Extension(session): Extension<TrainerSession>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<CatalogPage>, PlanError> {
    let filter = CatalogFilter::from_query(query.muscle_group.as_deref());
    let page = state.plan_service.catalog(&session, &filter).await?;
    Ok(Json(page))
}
