use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::models::EditorError;
use crate::store::StoreError;

/// Outcome of a workout plan operation that did not succeed.
#[derive(Error, Debug)]
pub enum PlanError {
    #[error(transparent)]
    Editor(#[from] EditorError),
    #[error("student {0} not found")]
    StudentNotFound(Uuid),
    #[error("exercise catalog could not be loaded: {0}")]
    CatalogUnavailable(#[source] StoreError),
    #[error("plan may be inconsistent, re-fetch to confirm (after {attempts} attempt(s)): {source}")]
    CommitFailed {
        attempts: u32,
        #[source]
        source: StoreError,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl PlanError {
    pub fn is_retryable(&self) -> bool {
        match self {
            PlanError::CatalogUnavailable(_) => true,
            PlanError::CommitFailed { source, .. } | PlanError::Store(source) => source.is_transient(),
            PlanError::Editor(_) | PlanError::StudentNotFound(_) => false,
        }
    }
}

impl IntoResponse for PlanError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            PlanError::Editor(EditorError::EmptyPlan) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "Empty plan")
            }
            PlanError::Editor(EditorError::InvalidDraft { .. }) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "Invalid assignment")
            }
            PlanError::Editor(EditorError::UnknownExercise(_)) => {
                (StatusCode::BAD_REQUEST, "Unknown exercise")
            }
            PlanError::Editor(EditorError::Closed(_)) => (StatusCode::CONFLICT, "Editor closed"),
            PlanError::StudentNotFound(_) => (StatusCode::NOT_FOUND, "Student not found"),
            PlanError::CatalogUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "Catalog unavailable")
            }
            PlanError::CommitFailed { source, .. } => store_status(source, "Plan not saved"),
            PlanError::Store(source) => store_status(source, "Store error"),
        };

        let body = Json(json!({
            "error": error_message,
            "message": self.to_string(),
            "retryable": self.is_retryable(),
        }));

        (status, body).into_response()
    }
}

/// Outcome of a roster or dashboard read that did not succeed.
#[derive(Error, Debug)]
pub enum RosterError {
    #[error("student {0} not found")]
    StudentNotFound(Uuid),
    #[error("invalid filter: {0}")]
    InvalidFilter(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for RosterError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            RosterError::StudentNotFound(_) => (StatusCode::NOT_FOUND, "Student not found"),
            RosterError::InvalidFilter(_) => (StatusCode::BAD_REQUEST, "Invalid filter"),
            RosterError::Store(source) => store_status(source, "Store error"),
        };

        let body = Json(json!({
            "error": error_message,
            "message": self.to_string(),
        }));

        (status, body).into_response()
    }
}

fn store_status(error: &StoreError, fallback: &'static str) -> (StatusCode, &'static str) {
    match error {
        StoreError::NotFound => (StatusCode::NOT_FOUND, "Not found"),
        StoreError::Conflict(_) => (StatusCode::CONFLICT, "Conflict"),
        StoreError::Constraint(_) => (StatusCode::UNPROCESSABLE_ENTITY, "Constraint violated"),
        StoreError::Unavailable(_) | StoreError::Timeout => {
            (StatusCode::SERVICE_UNAVAILABLE, "Store unavailable")
        }
        StoreError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, fallback),
    }
}
