use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Extension, Router,
};
use serde::Deserialize;

use super::AppState;
use crate::auth::TrainerSession;
use crate::errors::RosterError;
use crate::models::{Payment, PaymentStatus};

#[derive(Debug, Deserialize)]
pub struct PaymentQuery {
    pub status: Option<String>,
}

pub fn payment_routes() -> Router<AppState> {
    Router::new().route("/payments", get(list_payments))
}

pub async fn list_payments(
    State(state): State<AppState>,
    Extension(session): Extension<TrainerSession>,
    Query(query): Query<PaymentQuery>,
) -> Result<Json<Vec<Payment>>, RosterError> {
    let status = match query.status.as_deref().map(str::trim) {
        None | Some("") | Some("all") => None,
        Some(value) => Some(
            value
                .parse::<PaymentStatus>()
                .map_err(|err| RosterError::InvalidFilter(err.to_string()))?,
        ),
    };

    let payments = state.roster_service.payments(&session, status).await?;
    Ok(Json(payments))
}
