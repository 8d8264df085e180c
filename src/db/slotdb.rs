// db/slotdb.rs
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::bookingmodel::{Slot, TimeSlot};

#[async_trait]
pub trait SlotExt {
    async fn get_slot(
        &self,
        service_id: Uuid,
        date: NaiveDate,
        time_slot: TimeSlot,
    ) -> Result<Option<Slot>, Error>;

    /// Guarded single-row increment: matches only while capacity remains, so
    /// concurrent reservations serialize on the row and the count can never
    /// pass total_capacity. Returns None when the guard matched no row.
    async fn try_reserve_slot(
        &self,
        service_id: Uuid,
        date: NaiveDate,
        time_slot: TimeSlot,
    ) -> Result<Option<Slot>, Error>;

    /// Decrement with a floor of zero; flips the slot back to available.
    async fn release_slot(
        &self,
        service_id: Uuid,
        date: NaiveDate,
        time_slot: TimeSlot,
    ) -> Result<Option<Slot>, Error>;

    async fn create_slot(
        &self,
        service_id: Uuid,
        date: NaiveDate,
        time_slot: TimeSlot,
        total_capacity: i32,
    ) -> Result<Slot, Error>;

    async fn list_slots(&self, date: Option<NaiveDate>) -> Result<Vec<Slot>, Error>;
}

#[async_trait]
impl SlotExt for DBClient {
    async fn get_slot(
        &self,
        service_id: Uuid,
        date: NaiveDate,
        time_slot: TimeSlot,
    ) -> Result<Option<Slot>, Error> {
        sqlx::query_as::<_, Slot>(
            "SELECT * FROM slots WHERE service_id = $1 AND date = $2 AND time_slot = $3",
        )
        .bind(service_id)
        .bind(date)
        .bind(time_slot)
        .fetch_optional(&self.pool)
        .await
    }

    async fn try_reserve_slot(
        &self,
        service_id: Uuid,
        date: NaiveDate,
        time_slot: TimeSlot,
    ) -> Result<Option<Slot>, Error> {
        sqlx::query_as::<_, Slot>(
            r#"
            UPDATE slots
            SET booked_count = booked_count + 1,
                is_available = (booked_count + 1 < total_capacity),
                updated_at = NOW()
            WHERE service_id = $1 AND date = $2 AND time_slot = $3
              AND booked_count < total_capacity
            RETURNING *
            "#,
        )
        .bind(service_id)
        .bind(date)
        .bind(time_slot)
        .fetch_optional(&self.pool)
        .await
    }

    async fn release_slot(
        &self,
        service_id: Uuid,
        date: NaiveDate,
        time_slot: TimeSlot,
    ) -> Result<Option<Slot>, Error> {
        sqlx::query_as::<_, Slot>(
            r#"
            UPDATE slots
            SET booked_count = GREATEST(booked_count - 1, 0),
                is_available = TRUE,
                updated_at = NOW()
            WHERE service_id = $1 AND date = $2 AND time_slot = $3
            RETURNING *
            "#,
        )
        .bind(service_id)
        .bind(date)
        .bind(time_slot)
        .fetch_optional(&self.pool)
        .await
    }

    async fn create_slot(
        &self,
        service_id: Uuid,
        date: NaiveDate,
        time_slot: TimeSlot,
        total_capacity: i32,
    ) -> Result<Slot, Error> {
        sqlx::query_as::<_, Slot>(
            r#"
            INSERT INTO slots (service_id, date, time_slot, total_capacity)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (service_id, date, time_slot) DO UPDATE SET
                total_capacity = EXCLUDED.total_capacity,
                is_available = (slots.booked_count < EXCLUDED.total_capacity),
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(service_id)
        .bind(date)
        .bind(time_slot)
        .bind(total_capacity)
        .fetch_one(&self.pool)
        .await
    }

    async fn list_slots(&self, date: Option<NaiveDate>) -> Result<Vec<Slot>, Error> {
        match date {
            Some(date) => {
                sqlx::query_as::<_, Slot>(
                    "SELECT * FROM slots WHERE date = $1 ORDER BY date, time_slot",
                )
                .bind(date)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, Slot>("SELECT * FROM slots ORDER BY date, time_slot")
                    .fetch_all(&self.pool)
                    .await
            }
        }
    }
}
