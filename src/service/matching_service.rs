// service/matching_service.rs
use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::{bookingdb::BookingExt, db::DBClient, userdb::UserExt, workerdb::WorkerExt},
    models::{
        bookingmodel::{Booking, BookingEvent},
        workermodel::WorkerProfile,
    },
    service::{error::ServiceError, notification_service::NotificationService},
};

#[derive(Debug, Clone)]
pub struct RankedWorker {
    pub profile: WorkerProfile,
    pub score: f64,
}

/// Picks technicians for bookings. Auto-assignment applies the full
/// eligibility predicate and a deterministic priority ranking; manual
/// assignment is the admin override that checks verification only.
#[derive(Debug, Clone)]
pub struct MatchingService {
    db_client: Arc<DBClient>,
    notification_service: Arc<NotificationService>,
}

impl MatchingService {
    pub fn new(db_client: Arc<DBClient>, notification_service: Arc<NotificationService>) -> Self {
        Self {
            db_client,
            notification_service,
        }
    }

    /// Eligible workers ranked by priority score, highest first. The sort is
    /// stable over the candidates' creation order, so equal scores resolve
    /// the same way on every run.
    pub async fn find_eligible(
        &self,
        service_id: Uuid,
        customer_location: &str,
    ) -> Result<Vec<RankedWorker>, ServiceError> {
        let candidates = self.db_client.get_assignable_workers(service_id).await?;

        let mut ranked: Vec<RankedWorker> = candidates
            .into_iter()
            .filter(|worker| worker.is_eligible_for(service_id))
            .map(|profile| {
                let score = profile.priority_score(customer_location);
                RankedWorker { profile, score }
            })
            .collect();

        ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap());

        Ok(ranked)
    }

    pub async fn auto_assign(&self, booking_id: Uuid) -> Result<Booking, ServiceError> {
        let booking = self
            .db_client
            .get_booking(booking_id)
            .await?
            .ok_or(ServiceError::BookingNotFound(booking_id))?;

        if booking.employee_id.is_some() {
            return Err(ServiceError::AlreadyAssigned(booking_id));
        }
        if !booking.status.allows(BookingEvent::Assign) {
            return Err(ServiceError::InvalidStatus {
                from: booking.status,
                event: BookingEvent::Assign,
            });
        }

        let ranked = self
            .find_eligible(booking.service_id, &booking.customer_location)
            .await?;

        let best = ranked.first().ok_or(ServiceError::NoEligibleWorkers)?;

        self.commit_assignment(&booking, best.profile.user_id, None).await
    }

    /// Admin override: the verification predicate still applies, but
    /// availability and load are deliberately not re-checked, and an already
    /// assigned booking may be handed to a different worker.
    pub async fn manual_assign(
        &self,
        booking_id: Uuid,
        worker_user_id: Uuid,
    ) -> Result<Booking, ServiceError> {
        let booking = self
            .db_client
            .get_booking(booking_id)
            .await?
            .ok_or(ServiceError::BookingNotFound(booking_id))?;

        if !booking.status.allows(BookingEvent::Assign) {
            return Err(ServiceError::InvalidStatus {
                from: booking.status,
                event: BookingEvent::Assign,
            });
        }

        let profile = self
            .db_client
            .get_worker_profile(worker_user_id)
            .await?
            .ok_or(ServiceError::WorkerNotFound(worker_user_id))?;

        if !profile.is_verified() {
            return Err(ServiceError::WorkerNotVerified(worker_user_id));
        }

        let previous_worker = booking.employee_id.filter(|prev| *prev != worker_user_id);

        self.commit_assignment(&booking, worker_user_id, previous_worker).await
    }

    async fn commit_assignment(
        &self,
        booking: &Booking,
        worker_user_id: Uuid,
        displaced_worker: Option<Uuid>,
    ) -> Result<Booking, ServiceError> {
        let old_status = booking.status;

        let updated = self
            .db_client
            .assign_worker(booking.id, worker_user_id)
            .await?
            .ok_or(ServiceError::InvalidStatus {
                from: booking.status,
                event: BookingEvent::Assign,
            })?;

        // current_jobs is derived: recount for the new assignee, and for the
        // worker this booking was taken away from on a reassignment.
        self.db_client.recompute_current_jobs(worker_user_id).await?;
        if let Some(prev) = displaced_worker {
            self.db_client.recompute_current_jobs(prev).await?;
        }

        let customer = self.db_client.get_user(updated.customer_id).await?;
        let worker = self.db_client.get_user(worker_user_id).await?;

        let notifier = self.notification_service.clone();
        let booking_for_notify = updated.clone();
        tokio::spawn(async move {
            if let Some(customer) = customer {
                if let Err(e) = notifier
                    .notify_booking_status_changed(&customer, &booking_for_notify, old_status)
                    .await
                {
                    tracing::warn!("Assignment notification to customer failed: {}", e);
                }
            }
            if let Some(worker) = worker {
                if let Err(e) = notifier
                    .notify_worker_assigned(&worker, &booking_for_notify)
                    .await
                {
                    tracing::warn!("Assignment notification to worker failed: {}", e);
                }
            }
        });

        Ok(updated)
    }
}
