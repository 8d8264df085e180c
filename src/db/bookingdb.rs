// db/bookingdb.rs
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::bookingmodel::{
    Booking, BookingStatus, CancelledBy, PaymentMethod, PaymentStatus, TimeSlot,
};

/// Column values for a new booking row. Prices arrive here already resolved
/// by the pricing layer; nothing in this struct is client-authoritative.
#[derive(Debug, Clone)]
pub struct NewBookingRecord {
    pub customer_id: Uuid,
    pub service_id: Uuid,
    pub booking_date: NaiveDate,
    pub booking_time: TimeSlot,
    pub customer_address: String,
    pub customer_location: String,
    pub base_price: i64,
    pub addon_price: i64,
    pub discount_amount: i64,
    pub wallet_amount: i64,
    pub platform_fee: i64,
    pub total_price: i64,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
    pub promo_code: Option<String>,
}

#[async_trait]
pub trait BookingExt {
    async fn create_booking(&self, record: NewBookingRecord) -> Result<Booking, Error>;

    async fn get_booking(&self, booking_id: Uuid) -> Result<Option<Booking>, Error>;

    async fn list_bookings_for_customer(&self, customer_id: Uuid) -> Result<Vec<Booking>, Error>;

    async fn list_bookings_for_worker(&self, employee_id: Uuid) -> Result<Vec<Booking>, Error>;

    async fn list_bookings(&self) -> Result<Vec<Booking>, Error>;

    /// Guarded assignment: only matches while the lifecycle still allows an
    /// assign (pending or assigned, not deleted).
    async fn assign_worker(
        &self,
        booking_id: Uuid,
        employee_id: Uuid,
    ) -> Result<Option<Booking>, Error>;

    /// Field-reporting transitions (accept / reached / in_progress). Guarded
    /// in SQL against the terminal states so racing callers cannot revive a
    /// cancelled or completed booking.
    async fn transition_booking(
        &self,
        booking_id: Uuid,
        to: BookingStatus,
        before_photos: Option<Vec<String>>,
    ) -> Result<Option<Booking>, Error>;

    async fn complete_booking(
        &self,
        booking_id: Uuid,
        after_photos: Option<Vec<String>>,
        mark_cod_paid: bool,
    ) -> Result<Option<Booking>, Error>;

    async fn cancel_booking(
        &self,
        booking_id: Uuid,
        reason: String,
        cancelled_by: CancelledBy,
    ) -> Result<Option<Booking>, Error>;

    async fn reschedule_booking(
        &self,
        booking_id: Uuid,
        booking_date: NaiveDate,
        booking_time: TimeSlot,
        reset_to_pending: bool,
    ) -> Result<Option<Booking>, Error>;

    async fn set_payment_status(
        &self,
        booking_id: Uuid,
        status: PaymentStatus,
    ) -> Result<Option<Booking>, Error>;

    async fn soft_delete_booking(&self, booking_id: Uuid) -> Result<Option<Booking>, Error>;

    async fn hard_delete_booking(&self, booking_id: Uuid) -> Result<u64, Error>;
}

#[async_trait]
impl BookingExt for DBClient {
    async fn create_booking(&self, record: NewBookingRecord) -> Result<Booking, Error> {
        sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings
                (customer_id, service_id, booking_date, booking_time, customer_address,
                 customer_location, base_price, addon_price, discount_amount, wallet_amount,
                 platform_fee, total_price, payment_status, payment_method, promo_code)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING *
            "#,
        )
        .bind(record.customer_id)
        .bind(record.service_id)
        .bind(record.booking_date)
        .bind(record.booking_time)
        .bind(record.customer_address)
        .bind(record.customer_location)
        .bind(record.base_price)
        .bind(record.addon_price)
        .bind(record.discount_amount)
        .bind(record.wallet_amount)
        .bind(record.platform_fee)
        .bind(record.total_price)
        .bind(record.payment_status)
        .bind(record.payment_method)
        .bind(record.promo_code)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_booking(&self, booking_id: Uuid) -> Result<Option<Booking>, Error> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1 AND is_deleted = FALSE")
            .bind(booking_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn list_bookings_for_customer(&self, customer_id: Uuid) -> Result<Vec<Booking>, Error> {
        sqlx::query_as::<_, Booking>(
            r#"
            SELECT * FROM bookings
            WHERE customer_id = $1 AND is_deleted = FALSE
            ORDER BY created_at DESC
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn list_bookings_for_worker(&self, employee_id: Uuid) -> Result<Vec<Booking>, Error> {
        sqlx::query_as::<_, Booking>(
            r#"
            SELECT * FROM bookings
            WHERE employee_id = $1 AND is_deleted = FALSE
            ORDER BY booking_date ASC, created_at DESC
            "#,
        )
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn list_bookings(&self) -> Result<Vec<Booking>, Error> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE is_deleted = FALSE ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
    }

    async fn assign_worker(
        &self,
        booking_id: Uuid,
        employee_id: Uuid,
    ) -> Result<Option<Booking>, Error> {
        sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET employee_id = $2,
                status = 'assigned',
                assigned_at = NOW(),
                updated_at = NOW()
            WHERE id = $1
              AND status IN ('pending', 'assigned')
              AND is_deleted = FALSE
            RETURNING *
            "#,
        )
        .bind(booking_id)
        .bind(employee_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn transition_booking(
        &self,
        booking_id: Uuid,
        to: BookingStatus,
        before_photos: Option<Vec<String>>,
    ) -> Result<Option<Booking>, Error> {
        let timestamp_column = match to {
            BookingStatus::Accepted => "accepted_at",
            BookingStatus::Reached => "reached_at",
            BookingStatus::InProgress => "started_at",
            _ => return Err(Error::Protocol("unsupported transition target".into())),
        };

        let sql = format!(
            r#"
            UPDATE bookings
            SET status = $2,
                {timestamp_column} = NOW(),
                before_photos = COALESCE($3, before_photos),
                updated_at = NOW()
            WHERE id = $1
              AND status NOT IN ('completed', 'cancelled')
              AND is_deleted = FALSE
            RETURNING *
            "#
        );

        sqlx::query_as::<_, Booking>(&sql)
            .bind(booking_id)
            .bind(to)
            .bind(before_photos)
            .fetch_optional(&self.pool)
            .await
    }

    async fn complete_booking(
        &self,
        booking_id: Uuid,
        after_photos: Option<Vec<String>>,
        mark_cod_paid: bool,
    ) -> Result<Option<Booking>, Error> {
        sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET status = 'completed',
                completed_at = NOW(),
                after_photos = COALESCE($2, after_photos),
                payment_status = CASE WHEN $3 THEN 'paid'::payment_status ELSE payment_status END,
                updated_at = NOW()
            WHERE id = $1
              AND status <> 'cancelled'
              AND is_deleted = FALSE
            RETURNING *
            "#,
        )
        .bind(booking_id)
        .bind(after_photos)
        .bind(mark_cod_paid)
        .fetch_optional(&self.pool)
        .await
    }

    async fn cancel_booking(
        &self,
        booking_id: Uuid,
        reason: String,
        cancelled_by: CancelledBy,
    ) -> Result<Option<Booking>, Error> {
        sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET status = 'cancelled',
                cancelled_at = NOW(),
                cancellation_reason = $2,
                cancelled_by = $3,
                updated_at = NOW()
            WHERE id = $1
              AND status NOT IN ('completed', 'cancelled')
              AND is_deleted = FALSE
            RETURNING *
            "#,
        )
        .bind(booking_id)
        .bind(reason)
        .bind(cancelled_by)
        .fetch_optional(&self.pool)
        .await
    }

    async fn reschedule_booking(
        &self,
        booking_id: Uuid,
        booking_date: NaiveDate,
        booking_time: TimeSlot,
        reset_to_pending: bool,
    ) -> Result<Option<Booking>, Error> {
        sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET booking_date = $2,
                booking_time = $3,
                status = CASE WHEN $4 THEN 'pending'::booking_status ELSE status END,
                employee_id = CASE WHEN $4 THEN NULL ELSE employee_id END,
                assigned_at = CASE WHEN $4 THEN NULL ELSE assigned_at END,
                updated_at = NOW()
            WHERE id = $1
              AND status NOT IN ('completed', 'cancelled')
              AND is_deleted = FALSE
            RETURNING *
            "#,
        )
        .bind(booking_id)
        .bind(booking_date)
        .bind(booking_time)
        .bind(reset_to_pending)
        .fetch_optional(&self.pool)
        .await
    }

    async fn set_payment_status(
        &self,
        booking_id: Uuid,
        status: PaymentStatus,
    ) -> Result<Option<Booking>, Error> {
        sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET payment_status = $2, updated_at = NOW()
            WHERE id = $1 AND is_deleted = FALSE
            RETURNING *
            "#,
        )
        .bind(booking_id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await
    }

    async fn soft_delete_booking(&self, booking_id: Uuid) -> Result<Option<Booking>, Error> {
        sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET is_deleted = TRUE, updated_at = NOW()
            WHERE id = $1 AND is_deleted = FALSE
            RETURNING *
            "#,
        )
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn hard_delete_booking(&self, booking_id: Uuid) -> Result<u64, Error> {
        // Only rows that were already soft-deleted may be removed for real.
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1 AND is_deleted = TRUE")
            .bind(booking_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
