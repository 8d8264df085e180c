// dtos/promodtos.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::promomodel::DiscountType;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreatePromoDto {
    #[validate(length(min = 3, max = 40, message = "Code must be between 3 and 40 characters"))]
    pub code: String,

    pub discount_type: DiscountType,

    #[validate(range(min = 1, message = "Discount value must be positive"))]
    pub discount_value: i64,

    #[validate(range(min = 1, message = "Max discount must be positive"))]
    pub max_discount: Option<i64>,

    #[validate(range(min = 0, message = "Minimum order value must not be negative"))]
    pub min_order_value: i64,

    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: Option<DateTime<Utc>>,

    #[validate(range(min = 1, message = "Usage cap must be positive"))]
    pub max_usage: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UpdatePromoDto {
    pub is_active: Option<bool>,

    #[validate(range(min = 1, message = "Usage cap must be positive"))]
    pub max_usage: Option<i32>,

    pub valid_until: Option<DateTime<Utc>>,
}
