// service/background_jobs.rs
use std::sync::Arc;

use tokio::time::{interval, Duration};
use uuid::Uuid;

use crate::{service::error::ServiceError, AppState};

/// Periodic sweep that auto-assigns workers to pending bookings the admin has
/// not picked up manually. A booking with no eligible worker simply stays
/// pending until the next pass.
pub async fn start_auto_assign_job(app_state: Arc<AppState>) {
    let mut ticker = interval(Duration::from_secs(120));

    loop {
        ticker.tick().await;

        let pending: Result<Vec<Uuid>, sqlx::Error> = sqlx::query_scalar(
            r#"
            SELECT id FROM bookings
            WHERE status = 'pending'
              AND employee_id IS NULL
              AND is_deleted = FALSE
            ORDER BY created_at ASC
            LIMIT 50
            "#,
        )
        .fetch_all(&app_state.db_client.pool)
        .await;

        let pending = match pending {
            Ok(pending) => pending,
            Err(e) => {
                tracing::error!("Auto-assign sweep query failed: {}", e);
                continue;
            }
        };

        if pending.is_empty() {
            continue;
        }

        tracing::info!("Auto-assign sweep: {} pending bookings", pending.len());

        for booking_id in pending {
            match app_state.matching_service.auto_assign(booking_id).await {
                Ok(booking) => {
                    tracing::info!(
                        "Auto-assigned booking {} to worker {:?}",
                        booking.id,
                        booking.employee_id
                    );
                }
                Err(ServiceError::NoEligibleWorkers) => {
                    tracing::debug!("No eligible workers yet for booking {}", booking_id);
                }
                // Lost a race with a concurrent manual assignment.
                Err(ServiceError::AlreadyAssigned(_)) => {}
                Err(e) => {
                    tracing::error!("Auto-assign for booking {} failed: {}", booking_id, e);
                }
            }
        }
    }
}
