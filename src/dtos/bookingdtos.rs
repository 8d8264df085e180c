// dtos/bookingdtos.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::bookingmodel::{CancelledBy, PaymentMethod, TimeSlot};

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateBookingDto {
    pub service_id: Uuid,

    pub booking_date: NaiveDate,

    pub booking_time: TimeSlot,

    #[validate(length(min = 5, max = 500, message = "Address must be between 5 and 500 characters"))]
    pub customer_address: String,

    #[validate(length(max = 120, message = "Location must be at most 120 characters"))]
    pub customer_location: Option<String>,

    #[validate(range(min = 0, message = "Base price must not be negative"))]
    pub base_price: i64,

    #[validate(range(min = 0, message = "Addon price must not be negative"))]
    pub addon_price: i64,

    #[validate(range(min = 0, message = "Discount must not be negative"))]
    pub discount_amount: i64,

    #[validate(range(min = 0, message = "Wallet amount must not be negative"))]
    pub wallet_amount: i64,

    #[serde(default)]
    #[validate(range(min = 0, message = "Platform fee must not be negative"))]
    pub platform_fee: i64,

    #[validate(length(min = 1, max = 40, message = "Promo code must be between 1 and 40 characters"))]
    pub promo_code: Option<String>,

    pub payment_method: Option<PaymentMethod>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TransitionDto {
    pub before_photos: Option<Vec<String>>,
    pub after_photos: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CancelBookingDto {
    #[validate(length(min = 3, max = 500, message = "Reason must be between 3 and 500 characters"))]
    pub reason: String,

    pub cancelled_by: CancelledBy,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct RescheduleBookingDto {
    pub booking_date: NaiveDate,
    pub booking_time: TimeSlot,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct AssignWorkerDto {
    pub employee_id: Uuid,
}
