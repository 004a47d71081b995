// API routes and handlers

pub mod assessments;
pub mod dashboard;
pub mod exercises;
pub mod health;
pub mod payments;
pub mod plans;
pub mod routes;
pub mod students;

use axum::extract::FromRef;

use crate::auth::SessionGate;
use crate::services::{RosterService, WorkoutPlanService};

#[derive(Clone)]
pub struct AppState {
    pub plan_service: WorkoutPlanService,
    pub roster_service: RosterService,
    pub gate: SessionGate,
}

impl FromRef<AppState> for SessionGate {
    fn from_ref(state: &AppState) -> Self {
        state.gate.clone()
    }
}

pub use routes::create_routes;
