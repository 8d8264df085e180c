// dtos/workerdtos.rs
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::dtos::authdtos::validate_phone;
use crate::models::workermodel::ApprovalStatus;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateWorkerDto {
    #[validate(custom = "validate_phone")]
    pub phone: String,

    #[validate(length(min = 1, max = 120, message = "Name must be between 1 and 120 characters"))]
    pub full_name: String,

    pub skills: Vec<Uuid>,

    #[validate(length(min = 1, max = 120, message = "Location is required"))]
    pub location: String,

    #[validate(range(min = 0, max = 50, message = "Experience must be between 0 and 50 years"))]
    pub experience_years: i32,

    #[validate(range(min = 1, max = 50, message = "Capacity must be between 1 and 50"))]
    pub max_capacity: i32,

    pub approval_status: ApprovalStatus,
    pub id_verified: bool,
    pub skills_verified: bool,
    pub background_check_status: ApprovalStatus,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UpdateAvailabilityDto {
    pub is_available: bool,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreditWalletDto {
    pub user_id: Uuid,

    #[validate(range(min = 1, message = "Amount must be positive"))]
    pub amount: i64,

    #[validate(length(min = 3, max = 200, message = "Description must be between 3 and 200 characters"))]
    pub description: String,
}
