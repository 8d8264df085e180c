// handler/bookings.rs
use std::sync::Arc;

use axum::{
    extract::Path,
    response::IntoResponse,
    routing::{get, patch, post},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::bookingdb::BookingExt,
    dtos::{
        bookingdtos::{CancelBookingDto, CreateBookingDto, RescheduleBookingDto, TransitionDto},
        ApiResponse,
    },
    error::HttpError,
    middleware::JWTAuthMiddleware,
    models::{
        bookingmodel::BookingEvent,
        usermodel::UserRole,
    },
    AppState,
};

pub fn bookings_handler() -> Router {
    Router::new()
        .route("/", post(create_booking))
        .route("/", get(list_bookings))
        .route("/:booking_id", get(get_booking))
        .route("/:booking_id/accept", post(accept_booking))
        .route("/:booking_id/mark-reached", post(mark_reached))
        .route("/:booking_id/start-work", post(start_work))
        .route("/:booking_id/complete", post(complete_booking))
        .route("/:booking_id/cancel", patch(cancel_booking))
        .route("/:booking_id/reschedule", patch(reschedule_booking))
}

pub async fn create_booking(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Json(body): Json<CreateBookingDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let booking = app_state
        .booking_service
        .create_booking(&auth.user, body)
        .await?;

    Ok(Json(ApiResponse::success("Booking created", booking)))
}

pub async fn get_booking(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Path(booking_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let booking = app_state.booking_service.get_booking(booking_id).await?;

    let allowed = match auth.user.role {
        UserRole::Admin => true,
        UserRole::Customer => booking.customer_id == auth.user.id,
        UserRole::Worker => booking.employee_id == Some(auth.user.id),
    };
    if !allowed {
        return Err(HttpError::forbidden("You are not a party to this booking"));
    }

    Ok(Json(ApiResponse::success("Booking retrieved", booking)))
}

pub async fn list_bookings(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    let bookings = match auth.user.role {
        UserRole::Admin => app_state.db_client.list_bookings().await,
        UserRole::Customer => {
            app_state
                .db_client
                .list_bookings_for_customer(auth.user.id)
                .await
        }
        UserRole::Worker => {
            app_state
                .db_client
                .list_bookings_for_worker(auth.user.id)
                .await
        }
    }
    .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success("Bookings retrieved", bookings)))
}

pub async fn accept_booking(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Path(booking_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let booking = app_state
        .booking_service
        .apply_transition(booking_id, BookingEvent::Accept, &auth.user, None)
        .await?;

    Ok(Json(ApiResponse::success("Booking accepted", booking)))
}

pub async fn mark_reached(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Path(booking_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let booking = app_state
        .booking_service
        .apply_transition(booking_id, BookingEvent::MarkReached, &auth.user, None)
        .await?;

    Ok(Json(ApiResponse::success("Arrival recorded", booking)))
}

pub async fn start_work(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Path(booking_id): Path<Uuid>,
    Json(body): Json<TransitionDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let booking = app_state
        .booking_service
        .apply_transition(
            booking_id,
            BookingEvent::StartWork,
            &auth.user,
            body.before_photos,
        )
        .await?;

    Ok(Json(ApiResponse::success("Work started", booking)))
}

pub async fn complete_booking(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Path(booking_id): Path<Uuid>,
    Json(body): Json<TransitionDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let booking = app_state
        .booking_service
        .complete(booking_id, &auth.user, body.after_photos)
        .await?;

    Ok(Json(ApiResponse::success("Booking completed", booking)))
}

pub async fn cancel_booking(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Path(booking_id): Path<Uuid>,
    Json(body): Json<CancelBookingDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let booking = app_state
        .booking_service
        .cancel(booking_id, body.reason, body.cancelled_by, &auth.user)
        .await?;

    Ok(Json(ApiResponse::success("Booking cancelled", booking)))
}

pub async fn reschedule_booking(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Path(booking_id): Path<Uuid>,
    Json(body): Json<RescheduleBookingDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let booking = app_state
        .booking_service
        .reschedule(booking_id, body.booking_date, body.booking_time, &auth.user)
        .await?;

    Ok(Json(ApiResponse::success("Booking rescheduled", booking)))
}
