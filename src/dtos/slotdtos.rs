// dtos/slotdtos.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::bookingmodel::TimeSlot;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateSlotDto {
    pub service_id: Uuid,

    pub date: NaiveDate,

    pub time_slot: TimeSlot,

    #[validate(range(min = 1, max = 1000, message = "Capacity must be between 1 and 1000"))]
    pub total_capacity: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListSlotsQuery {
    pub date: Option<NaiveDate>,
}
