// service/error.rs
use axum::http::StatusCode;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    error::HttpError,
    models::bookingmodel::{BookingEvent, BookingStatus},
};

#[derive(Error, Debug)]
pub enum ServiceError {
    // OTP gate
    #[error("OTP was requested too recently, retry in {retry_after_secs}s")]
    OtpRateLimited { retry_after_secs: i64 },

    #[error("No OTP challenge exists for this phone number")]
    OtpNotFound,

    #[error("OTP has expired, request a new one")]
    OtpExpired,

    #[error("Too many incorrect attempts, request a new OTP")]
    OtpAttemptsExceeded,

    #[error("Incorrect OTP")]
    OtpInvalid,

    #[error("Phone number is not verified")]
    PhoneNotVerified,

    // Pricing / promo
    #[error("Promo code {0} is invalid")]
    InvalidPromoCode(String),

    #[error("Promo code {0} is not valid yet")]
    PromoNotYetValid(String),

    #[error("Promo code {0} has expired")]
    PromoExpired(String),

    #[error("Order subtotal is below the promo minimum of {required} paise")]
    PromoMinOrderValue { required: i64 },

    #[error("Promo code {0} has reached its usage limit")]
    PromoUsageLimitExceeded(String),

    #[error("Wallet amount exceeds the payable subtotal")]
    InvalidWalletAmount,

    // Wallet ledger
    #[error("Insufficient wallet balance")]
    InsufficientWalletBalance,

    // Slot capacity
    #[error("The selected slot is fully booked")]
    SlotUnavailable,

    // Matching / assignment
    #[error("Booking {0} already has a worker assigned")]
    AlreadyAssigned(Uuid),

    #[error("No eligible workers available for this booking")]
    NoEligibleWorkers,

    #[error("Worker {0} has not completed verification")]
    WorkerNotVerified(Uuid),

    #[error("Worker {0} not found")]
    WorkerNotFound(Uuid),

    // Lifecycle
    #[error("Booking {0} not found")]
    BookingNotFound(Uuid),

    #[error("Cannot {event} a booking in status {from}", event = .event.to_str(), from = .from.to_str())]
    InvalidStatus {
        from: BookingStatus,
        event: BookingEvent,
    },

    #[error("Booking {0} is already cancelled")]
    AlreadyCancelled(Uuid),

    #[error("Completed bookings cannot be cancelled")]
    CannotCancelCompleted(Uuid),

    #[error("User {0} not found")]
    UserNotFound(Uuid),

    #[error("Payment gateway error: {0}")]
    PaymentGateway(String),

    #[error("Invalid payment signature")]
    PaymentSignatureInvalid,

    #[error("Notification error: {0}")]
    Notification(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ServiceError {
    /// Stable machine-readable code, part of the API contract.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::OtpRateLimited { .. } => "rate_limited",
            ServiceError::OtpNotFound => "otp_not_found",
            ServiceError::OtpExpired => "otp_expired",
            ServiceError::OtpAttemptsExceeded => "otp_attempts_exceeded",
            ServiceError::OtpInvalid => "otp_invalid",
            ServiceError::PhoneNotVerified => "phone_not_verified",
            ServiceError::InvalidPromoCode(_) => "invalid_promo_code",
            ServiceError::PromoNotYetValid(_) => "promo_not_yet_valid",
            ServiceError::PromoExpired(_) => "promo_expired",
            ServiceError::PromoMinOrderValue { .. } => "promo_min_order_value",
            ServiceError::PromoUsageLimitExceeded(_) => "promo_usage_limit_exceeded",
            ServiceError::InvalidWalletAmount => "invalid_wallet_amount",
            ServiceError::InsufficientWalletBalance => "insufficient_wallet_balance",
            ServiceError::SlotUnavailable => "slot_unavailable",
            ServiceError::AlreadyAssigned(_) => "already_assigned",
            ServiceError::NoEligibleWorkers => "no_eligible_workers",
            ServiceError::WorkerNotVerified(_) => "worker_not_verified",
            ServiceError::WorkerNotFound(_) => "worker_not_found",
            ServiceError::BookingNotFound(_) => "booking_not_found",
            ServiceError::InvalidStatus { .. } => "invalid_status",
            ServiceError::AlreadyCancelled(_) => "already_cancelled",
            ServiceError::CannotCancelCompleted(_) => "cannot_cancel_completed",
            ServiceError::UserNotFound(_) => "user_not_found",
            ServiceError::PaymentGateway(_) => "payment_gateway_error",
            ServiceError::PaymentSignatureInvalid => "payment_signature_invalid",
            ServiceError::Notification(_) => "notification_error",
            ServiceError::Validation(_) => "validation_error",
            ServiceError::Database(_) => "internal_error",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::OtpRateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            ServiceError::PhoneNotVerified => StatusCode::FORBIDDEN,
            ServiceError::NoEligibleWorkers
            | ServiceError::BookingNotFound(_)
            | ServiceError::WorkerNotFound(_)
            | ServiceError::UserNotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::PaymentGateway(_)
            | ServiceError::Notification(_)
            | ServiceError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<ServiceError> for HttpError {
    fn from(error: ServiceError) -> Self {
        let code = error.code();
        let status = error.status_code();
        HttpError::with_code(error.to_string(), status, code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precondition_errors_map_to_stable_codes() {
        assert_eq!(ServiceError::SlotUnavailable.code(), "slot_unavailable");
        assert_eq!(
            ServiceError::InsufficientWalletBalance.code(),
            "insufficient_wallet_balance"
        );
        assert_eq!(
            ServiceError::OtpRateLimited { retry_after_secs: 30 }.code(),
            "rate_limited"
        );
    }

    #[test]
    fn http_mapping_keeps_code_and_status() {
        let err: HttpError = ServiceError::PhoneNotVerified.into();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
        assert_eq!(err.error_code.as_deref(), Some("phone_not_verified"));

        let err: HttpError = ServiceError::OtpRateLimited { retry_after_secs: 45 }.into();
        assert_eq!(err.status, StatusCode::TOO_MANY_REQUESTS);

        let err: HttpError = ServiceError::NoEligibleWorkers.into();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}
