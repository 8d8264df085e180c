// handler/payments.rs
use std::sync::Arc;

use axum::{
    response::IntoResponse,
    routing::post,
    Extension, Json, Router,
};
use validator::Validate;

use crate::{
    db::bookingdb::BookingExt,
    dtos::{
        paymentdtos::{CreateOrderDto, VerifyPaymentDto},
        ApiResponse,
    },
    error::HttpError,
    middleware::JWTAuthMiddleware,
    models::bookingmodel::{PaymentMethod, PaymentStatus},
    AppState,
};

pub fn payments_handler() -> Router {
    Router::new()
        .route("/order", post(create_order))
        .route("/verify", post(verify_payment))
}

pub async fn create_order(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Json(body): Json<CreateOrderDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let booking = app_state
        .booking_service
        .get_booking(body.booking_id)
        .await?;

    if booking.customer_id != auth.user.id {
        return Err(HttpError::forbidden("You are not a party to this booking"));
    }
    if booking.payment_method != PaymentMethod::Online {
        return Err(HttpError::bad_request("Booking is not payable online"));
    }
    if booking.payment_status == PaymentStatus::Paid {
        return Err(HttpError::bad_request("Booking is already paid"));
    }

    let order = app_state
        .payment_service
        .create_order(booking.id, booking.total_price)
        .await?;

    // The booking now awaits gateway confirmation.
    let _ = app_state
        .db_client
        .set_payment_status(booking.id, PaymentStatus::Pending)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success("Payment order created", order)))
}

pub async fn verify_payment(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Json(body): Json<VerifyPaymentDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let booking = app_state
        .booking_service
        .get_booking(body.booking_id)
        .await?;

    if booking.customer_id != auth.user.id {
        return Err(HttpError::forbidden("You are not a party to this booking"));
    }

    app_state
        .payment_service
        .verify_signature(&body.order_id, &body.payment_id, &body.signature)?;

    let updated = app_state
        .db_client
        .set_payment_status(booking.id, PaymentStatus::Paid)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Booking not found"))?;

    Ok(Json(ApiResponse::success("Payment confirmed", updated)))
}
