// service/slot_service.rs
use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    db::{db::DBClient, slotdb::SlotExt},
    models::bookingmodel::TimeSlot,
    service::error::ServiceError,
};

/// Capacity bookkeeping per (service, date, window). No slot row means the
/// window is unconstrained: reservations there are implicit no-ops.
#[derive(Debug, Clone)]
pub struct SlotService {
    db_client: Arc<DBClient>,
}

impl SlotService {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        Self { db_client }
    }

    /// Take one unit of capacity. The increment is a guarded single-row
    /// update, so two racing reservations on the last unit resolve to one
    /// winner and one `slot_unavailable`.
    pub async fn reserve(
        &self,
        service_id: Uuid,
        date: NaiveDate,
        time_slot: TimeSlot,
    ) -> Result<(), ServiceError> {
        let existing = self.db_client.get_slot(service_id, date, time_slot).await?;

        match existing {
            None => Ok(()), // unconstrained window
            Some(slot) if !slot.has_capacity() => Err(ServiceError::SlotUnavailable),
            Some(_) => {
                // The read above can go stale under contention; the guarded
                // increment is the authoritative check.
                let reserved = self
                    .db_client
                    .try_reserve_slot(service_id, date, time_slot)
                    .await?;
                if reserved.is_some() {
                    Ok(())
                } else {
                    Err(ServiceError::SlotUnavailable)
                }
            }
        }
    }

    /// Give one unit back (cancel, or the old side of a reschedule).
    pub async fn release(
        &self,
        service_id: Uuid,
        date: NaiveDate,
        time_slot: TimeSlot,
    ) -> Result<(), ServiceError> {
        let _ = self.db_client.release_slot(service_id, date, time_slot).await?;
        Ok(())
    }

    /// Reschedule move, all-or-nothing: reserve the new window first and only
    /// then release the old one, so a full target leaves the original
    /// reservation untouched.
    pub async fn move_reservation(
        &self,
        service_id: Uuid,
        old_date: NaiveDate,
        old_time: TimeSlot,
        new_date: NaiveDate,
        new_time: TimeSlot,
    ) -> Result<(), ServiceError> {
        if old_date == new_date && old_time == new_time {
            return Ok(());
        }

        self.reserve(service_id, new_date, new_time).await?;

        if let Err(e) = self.release(service_id, old_date, old_time).await {
            // Compensate the half-done move before surfacing the failure.
            let _ = self.release(service_id, new_date, new_time).await;
            return Err(e);
        }

        Ok(())
    }
}
