use crate::core::validator::validate;
use crate::core::Submission;
use crate::server::response::{ApiError, Health, NotFound, SendSuccess, ServerInfo};
use crate::server::AppState;
use crate::utils::error::RelayError;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

pub async fn send_email(
    State(state): State<AppState>,
    payload: Result<Json<Submission>, JsonRejection>,
) -> Result<Json<SendSuccess>, ApiError> {
    let expose = state.environment.exposes_error_details();

    let Json(raw) = payload.map_err(|rejection| {
        ApiError::new(
            RelayError::InvalidPayload {
                message: rejection.body_text(),
            },
            expose,
        )
    })?;

    let submission = validate(&raw).map_err(|e| ApiError::new(e, expose))?;

    tracing::info!("Relaying support query to {}", state.dispatcher.operator());
    let receipt = state
        .dispatcher
        .dispatch(&submission)
        .await
        .map_err(|e| ApiError::new(e, expose))?;

    Ok(Json(SendSuccess::from(receipt)))
}

pub async fn index(State(state): State<AppState>) -> Json<ServerInfo> {
    Json(ServerInfo::new(state.environment.as_str()))
}

pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

pub async fn not_found() -> NotFound {
    NotFound::default()
}
