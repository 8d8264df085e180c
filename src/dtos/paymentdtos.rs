// dtos/paymentdtos.rs
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateOrderDto {
    pub booking_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct VerifyPaymentDto {
    pub booking_id: Uuid,

    #[validate(length(min = 1, message = "Order id is required"))]
    pub order_id: String,

    #[validate(length(min = 1, message = "Payment id is required"))]
    pub payment_id: String,

    #[validate(length(equal = 64, message = "Signature must be 64 hex characters"))]
    pub signature: String,
}
