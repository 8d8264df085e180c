// handler/workers.rs
use std::sync::Arc;

use axum::{
    response::IntoResponse,
    routing::{get, put},
    Extension, Json, Router,
};
use validator::Validate;

use crate::{
    db::{bookingdb::BookingExt, workerdb::WorkerExt},
    dtos::{workerdtos::UpdateAvailabilityDto, ApiResponse},
    error::HttpError,
    middleware::JWTAuthMiddleware,
    models::usermodel::UserRole,
    AppState,
};

pub fn workers_handler() -> Router {
    Router::new()
        .route("/availability", put(update_availability))
        .route("/jobs", get(get_assigned_jobs))
}

pub async fn update_availability(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Json(body): Json<UpdateAvailabilityDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    if auth.user.role != UserRole::Worker {
        return Err(HttpError::forbidden("Only workers can set availability"));
    }

    app_state
        .db_client
        .get_worker_profile(auth.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Worker profile not found"))?;

    let profile = app_state
        .db_client
        .set_worker_availability(auth.user.id, body.is_available)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success("Availability updated", profile)))
}

pub async fn get_assigned_jobs(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    if auth.user.role != UserRole::Worker {
        return Err(HttpError::forbidden("Only workers have assigned jobs"));
    }

    let bookings = app_state
        .db_client
        .list_bookings_for_worker(auth.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success("Assigned jobs retrieved", bookings)))
}
