// service/booking_service.rs
use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    db::{
        bookingdb::{BookingExt, NewBookingRecord},
        db::DBClient,
        promodb::PromoExt,
        userdb::UserExt,
        workerdb::WorkerExt,
    },
    dtos::bookingdtos::CreateBookingDto,
    models::{
        bookingmodel::{Booking, BookingEvent, BookingStatus, CancelledBy, PaymentMethod, PaymentStatus, TimeSlot},
        usermodel::{User, UserRole},
    },
    service::{
        error::ServiceError,
        notification_service::NotificationService,
        pricing_service::PricingService,
        slot_service::SlotService,
        wallet_service::WalletService,
    },
};

/// Owner of the booking lifecycle. Creation runs the compensating sequence
/// (reserve slot → debit wallet → increment promo → insert); the transitions
/// apply the guard table and emit one customer notification each.
#[derive(Debug, Clone)]
pub struct BookingService {
    db_client: Arc<DBClient>,
    pricing_service: Arc<PricingService>,
    wallet_service: Arc<WalletService>,
    slot_service: Arc<SlotService>,
    notification_service: Arc<NotificationService>,
}

impl BookingService {
    pub fn new(
        db_client: Arc<DBClient>,
        pricing_service: Arc<PricingService>,
        wallet_service: Arc<WalletService>,
        slot_service: Arc<SlotService>,
        notification_service: Arc<NotificationService>,
    ) -> Self {
        Self {
            db_client,
            pricing_service,
            wallet_service,
            slot_service,
            notification_service,
        }
    }

    pub async fn create_booking(
        &self,
        customer: &User,
        body: CreateBookingDto,
    ) -> Result<Booking, ServiceError> {
        if !customer.can_create_bookings() {
            return Err(ServiceError::PhoneNotVerified);
        }

        // Authoritative pricing: a referenced promo overrides any
        // client-submitted discount figure.
        let gross = body.base_price + body.addon_price;
        let (discount, promo_code) = match body.promo_code.as_deref() {
            Some(code) => {
                let promo = self.pricing_service.resolve_promo(code, gross).await?;
                (promo.discount_for(gross), Some(promo.code))
            }
            None => (body.discount_amount, None),
        };

        let totals = self
            .pricing_service
            .compute_total(body.base_price, body.addon_price, discount, body.wallet_amount)?;

        // 1. Capacity first: nothing to unwind if the slot is full.
        self.slot_service
            .reserve(body.service_id, body.booking_date, body.booking_time)
            .await?;

        // 2. Wallet debit, compensating the reservation on refusal.
        if totals.wallet_amount > 0 {
            if let Err(e) = self
                .wallet_service
                .debit(
                    customer.id,
                    totals.wallet_amount,
                    "Wallet applied to booking".to_string(),
                    None,
                )
                .await
            {
                self.compensate_slot(body.service_id, body.booking_date, body.booking_time)
                    .await;
                return Err(e);
            }
        }

        // 3. Promo usage, guarded against its cap a second time in SQL for
        // requests racing past the validation read.
        if let Some(code) = promo_code.as_deref() {
            match self.db_client.try_increment_promo_usage(code).await {
                Ok(true) => {}
                Ok(false) => {
                    self.unwind_creation(customer.id, totals.wallet_amount, &body).await;
                    return Err(ServiceError::PromoUsageLimitExceeded(code.to_string()));
                }
                Err(e) => {
                    self.unwind_creation(customer.id, totals.wallet_amount, &body).await;
                    return Err(e.into());
                }
            }
        }

        let (payment_method, payment_status) = match settlement_for(&body, totals.total_price) {
            Ok(settlement) => settlement,
            Err(e) => {
                self.unwind_creation(customer.id, totals.wallet_amount, &body).await;
                return Err(e);
            }
        };

        let record = NewBookingRecord {
            customer_id: customer.id,
            service_id: body.service_id,
            booking_date: body.booking_date,
            booking_time: body.booking_time,
            customer_address: body.customer_address.clone(),
            customer_location: body.customer_location.clone().unwrap_or_default(),
            base_price: body.base_price,
            addon_price: body.addon_price,
            discount_amount: totals.discount_amount,
            wallet_amount: totals.wallet_amount,
            platform_fee: body.platform_fee,
            total_price: totals.total_price,
            payment_status,
            payment_method,
            promo_code,
        };

        let booking = match self.db_client.create_booking(record).await {
            Ok(booking) => booking,
            Err(e) => {
                self.unwind_creation(customer.id, totals.wallet_amount, &body).await;
                return Err(e.into());
            }
        };

        self.notify_status_change(&booking, BookingStatus::Pending);

        Ok(booking)
    }

    /// Field transitions reported by the assigned worker: accept, reached,
    /// start-work. Permissive guards, see the status table.
    pub async fn apply_transition(
        &self,
        booking_id: Uuid,
        event: BookingEvent,
        actor: &User,
        before_photos: Option<Vec<String>>,
    ) -> Result<Booking, ServiceError> {
        let to = match event {
            BookingEvent::Accept => BookingStatus::Accepted,
            BookingEvent::MarkReached => BookingStatus::Reached,
            BookingEvent::StartWork => BookingStatus::InProgress,
            _ => {
                return Err(ServiceError::Validation(
                    "Unsupported transition event".to_string(),
                ))
            }
        };

        let booking = self.authorized_booking(booking_id, actor).await?;

        if !booking.status.allows(event) {
            return Err(ServiceError::InvalidStatus {
                from: booking.status,
                event,
            });
        }

        let old_status = booking.status;
        let updated = self
            .db_client
            .transition_booking(booking_id, to, before_photos)
            .await?
            .ok_or(ServiceError::InvalidStatus {
                from: booking.status,
                event,
            })?;

        self.notify_status_change(&updated, old_status);

        Ok(updated)
    }

    pub async fn complete(
        &self,
        booking_id: Uuid,
        actor: &User,
        after_photos: Option<Vec<String>>,
    ) -> Result<Booking, ServiceError> {
        let booking = self.authorized_booking(booking_id, actor).await?;

        if !booking.status.allows(BookingEvent::Complete) {
            return Err(ServiceError::InvalidStatus {
                from: booking.status,
                event: BookingEvent::Complete,
            });
        }

        // Cash jobs settle on completion.
        let mark_cod_paid = booking.payment_method == PaymentMethod::Cod
            && booking.payment_status == PaymentStatus::Pending;

        let old_status = booking.status;
        let updated = self
            .db_client
            .complete_booking(booking_id, after_photos, mark_cod_paid)
            .await?
            .ok_or(ServiceError::InvalidStatus {
                from: booking.status,
                event: BookingEvent::Complete,
            })?;

        if let Some(worker_id) = updated.employee_id {
            self.db_client.recompute_current_jobs(worker_id).await?;
        }

        self.notify_status_change(&updated, old_status);
        self.send_receipt(&updated);

        Ok(updated)
    }

    pub async fn cancel(
        &self,
        booking_id: Uuid,
        reason: String,
        cancelled_by: CancelledBy,
        actor: &User,
    ) -> Result<Booking, ServiceError> {
        let booking = self.authorized_booking(booking_id, actor).await?;

        match booking.status {
            BookingStatus::Cancelled => return Err(ServiceError::AlreadyCancelled(booking_id)),
            BookingStatus::Completed => return Err(ServiceError::CannotCancelCompleted(booking_id)),
            _ => {}
        }

        let old_status = booking.status;
        let updated = self
            .db_client
            .cancel_booking(booking_id, reason, cancelled_by)
            .await?
            // The guard lost a race; whoever won has already cancelled it.
            .ok_or(ServiceError::AlreadyCancelled(booking_id))?;

        self.slot_service
            .release(updated.service_id, updated.booking_date, updated.booking_time)
            .await?;

        if updated.wallet_amount > 0 {
            self.wallet_service
                .refund(
                    updated.customer_id,
                    updated.wallet_amount,
                    "Refund for cancelled booking".to_string(),
                    Some(updated.id),
                )
                .await?;
        }

        if let Some(worker_id) = updated.employee_id {
            self.db_client.recompute_current_jobs(worker_id).await?;
        }

        self.notify_status_change(&updated, old_status);

        Ok(updated)
    }

    /// Move a booking to a new window. All-or-nothing on capacity: the new
    /// window is reserved before the old one is released. An assigned booking
    /// drops back to pending so assignment runs again for the new window.
    pub async fn reschedule(
        &self,
        booking_id: Uuid,
        new_date: NaiveDate,
        new_time: TimeSlot,
        actor: &User,
    ) -> Result<Booking, ServiceError> {
        let booking = self.authorized_booking(booking_id, actor).await?;

        if !booking.status.allows(BookingEvent::Reschedule) {
            return Err(ServiceError::InvalidStatus {
                from: booking.status,
                event: BookingEvent::Reschedule,
            });
        }

        self.slot_service
            .move_reservation(
                booking.service_id,
                booking.booking_date,
                booking.booking_time,
                new_date,
                new_time,
            )
            .await?;

        let reset_to_pending = booking.status == BookingStatus::Assigned;
        let displaced_worker = if reset_to_pending { booking.employee_id } else { None };

        let old_status = booking.status;
        let updated = self
            .db_client
            .reschedule_booking(booking_id, new_date, new_time, reset_to_pending)
            .await?
            .ok_or(ServiceError::BookingNotFound(booking_id))?;

        if let Some(worker_id) = displaced_worker {
            self.db_client.recompute_current_jobs(worker_id).await?;
        }

        if updated.status != old_status {
            self.notify_status_change(&updated, old_status);
        }

        Ok(updated)
    }

    pub async fn get_booking(&self, booking_id: Uuid) -> Result<Booking, ServiceError> {
        self.db_client
            .get_booking(booking_id)
            .await?
            .ok_or(ServiceError::BookingNotFound(booking_id))
    }

    /// Soft delete, or hard delete a row that is already soft-deleted.
    pub async fn delete_booking(&self, booking_id: Uuid) -> Result<(), ServiceError> {
        if self.db_client.soft_delete_booking(booking_id).await?.is_some() {
            return Ok(());
        }
        let removed = self.db_client.hard_delete_booking(booking_id).await?;
        if removed == 0 {
            return Err(ServiceError::BookingNotFound(booking_id));
        }
        Ok(())
    }

    async fn authorized_booking(
        &self,
        booking_id: Uuid,
        actor: &User,
    ) -> Result<Booking, ServiceError> {
        let booking = self
            .db_client
            .get_booking(booking_id)
            .await?
            .ok_or(ServiceError::BookingNotFound(booking_id))?;

        let allowed = match actor.role {
            UserRole::Admin => true,
            UserRole::Customer => booking.customer_id == actor.id,
            UserRole::Worker => booking.employee_id == Some(actor.id),
        };

        if !allowed {
            return Err(ServiceError::Validation(
                "You are not a party to this booking".to_string(),
            ));
        }

        Ok(booking)
    }

    async fn compensate_slot(&self, service_id: Uuid, date: NaiveDate, time_slot: TimeSlot) {
        if let Err(e) = self.slot_service.release(service_id, date, time_slot).await {
            tracing::error!("Failed to release slot during compensation: {}", e);
        }
    }

    async fn unwind_creation(&self, customer_id: Uuid, wallet_amount: i64, body: &CreateBookingDto) {
        if wallet_amount > 0 {
            if let Err(e) = self
                .wallet_service
                .refund(
                    customer_id,
                    wallet_amount,
                    "Refund for failed booking creation".to_string(),
                    None,
                )
                .await
            {
                tracing::error!("Failed to refund wallet during compensation: {}", e);
            }
        }
        self.compensate_slot(body.service_id, body.booking_date, body.booking_time)
            .await;
    }

    fn notify_status_change(&self, booking: &Booking, old_status: BookingStatus) {
        let notifier = self.notification_service.clone();
        let db_client = self.db_client.clone();
        let booking = booking.clone();

        tokio::spawn(async move {
            match db_client.get_user(booking.customer_id).await {
                Ok(Some(customer)) => {
                    if let Err(e) = notifier
                        .notify_booking_status_changed(&customer, &booking, old_status)
                        .await
                    {
                        tracing::warn!("Status notification for booking {} failed: {}", booking.id, e);
                    }
                }
                Ok(None) => {}
                Err(e) => tracing::error!("Could not load customer for notification: {}", e),
            }
        });
    }

    fn send_receipt(&self, booking: &Booking) {
        let notifier = self.notification_service.clone();
        let db_client = self.db_client.clone();
        let booking = booking.clone();

        tokio::spawn(async move {
            if let Ok(Some(customer)) = db_client.get_user(booking.customer_id).await {
                if let Err(e) = notifier.notify_booking_receipt(&customer, &booking).await {
                    tracing::warn!("Receipt email for booking {} failed: {}", booking.id, e);
                }
            }
        });
    }
}

/// Initial settlement state: a wallet-covered booking is paid up front, cash
/// settles at completion, online waits for the gateway.
fn settlement_for(
    body: &CreateBookingDto,
    total_price: i64,
) -> Result<(PaymentMethod, PaymentStatus), ServiceError> {
    if total_price == 0 && body.wallet_amount > 0 {
        return Ok((PaymentMethod::Wallet, PaymentStatus::Paid));
    }

    match body.payment_method {
        Some(PaymentMethod::Online) => Ok((PaymentMethod::Online, PaymentStatus::Unpaid)),
        Some(PaymentMethod::Wallet) => Err(ServiceError::Validation(
            "Wallet amount does not cover the booking total".to_string(),
        )),
        _ => Ok((PaymentMethod::Cod, PaymentStatus::Pending)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtos::bookingdtos::CreateBookingDto;

    fn dto(wallet_amount: i64, payment_method: Option<PaymentMethod>) -> CreateBookingDto {
        CreateBookingDto {
            service_id: Uuid::new_v4(),
            booking_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            booking_time: TimeSlot::Morning,
            customer_address: "12 MG Road".to_string(),
            customer_location: Some("indiranagar".to_string()),
            base_price: 50_000,
            addon_price: 0,
            discount_amount: 0,
            wallet_amount,
            platform_fee: 0,
            promo_code: None,
            payment_method,
        }
    }

    #[test]
    fn wallet_covering_total_settles_immediately() {
        let (method, status) = settlement_for(&dto(50_000, None), 0).unwrap();
        assert_eq!(method, PaymentMethod::Wallet);
        assert_eq!(status, PaymentStatus::Paid);
    }

    #[test]
    fn cod_waits_for_completion() {
        let (method, status) = settlement_for(&dto(0, Some(PaymentMethod::Cod)), 50_000).unwrap();
        assert_eq!(method, PaymentMethod::Cod);
        assert_eq!(status, PaymentStatus::Pending);
    }

    #[test]
    fn online_waits_for_the_gateway() {
        let (method, status) = settlement_for(&dto(0, Some(PaymentMethod::Online)), 50_000).unwrap();
        assert_eq!(method, PaymentMethod::Online);
        assert_eq!(status, PaymentStatus::Unpaid);
    }

    #[test]
    fn wallet_method_with_a_balance_due_is_rejected() {
        assert!(settlement_for(&dto(10_000, Some(PaymentMethod::Wallet)), 40_000).is_err());
    }
}
