use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use super::assessments::assessment_routes;
use super::dashboard::dashboard_routes;
use super::exercises::exercise_routes;
use super::health::health_check;
use super::payments::payment_routes;
use super::plans::plan_routes;
use super::students::student_routes;
use super::AppState;
use crate::auth::{cors_layer, jwt_auth_middleware};

pub fn create_routes(state: AppState) -> Router {
    // Every /api route requires a signed-in trainer.
    let api = Router::new()
        .merge(exercise_routes())
        .merge(student_routes())
        .merge(plan_routes())
        .merge(dashboard_routes())
        .merge(payment_routes())
        .merge(assessment_routes())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state)
}
