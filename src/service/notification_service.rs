// service/notification_service.rs
use std::sync::Arc;

use serde_json::json;
use tokio::time::{sleep, Duration};
use uuid::Uuid;

use crate::{
    config::Config,
    db::{db::DBClient, notificationdb::NotificationExt},
    models::{
        bookingmodel::{Booking, BookingStatus},
        notificationmodel::NotificationChannel,
        usermodel::User,
    },
    service::error::ServiceError,
};

const MAX_RETRIES: u32 = 3;
const RETRY_DELAY_MS: u64 = 1000;

/// Delivery boundary for SMS and transactional email. Everything here is
/// best-effort: callers spawn these futures and a failed delivery only
/// produces a log line, never a failed state transition.
#[derive(Debug, Clone)]
pub struct NotificationService {
    db_client: Arc<DBClient>,
    config: Config,
    http: reqwest::Client,
}

impl NotificationService {
    pub fn new(db_client: Arc<DBClient>, config: Config) -> Self {
        Self {
            db_client,
            config,
            http: reqwest::Client::new(),
        }
    }

    /// OTP delivery. No notification row is written: the recipient may not
    /// have a profile yet.
    pub async fn send_otp_sms(&self, phone: &str, code: &str) -> Result<(), ServiceError> {
        let message = format!("{} is your HomeServe verification code. Valid for 5 minutes.", code);
        self.send_sms(phone, &message).await
    }

    /// Customer-facing status update: one notification per transition.
    pub async fn notify_booking_status_changed(
        &self,
        customer: &User,
        booking: &Booking,
        old_status: BookingStatus,
    ) -> Result<(), ServiceError> {
        let message = match booking.status {
            BookingStatus::Pending => "Your booking is confirmed and awaiting assignment.".to_string(),
            BookingStatus::Assigned => "A technician has been assigned to your booking.".to_string(),
            BookingStatus::Accepted => "Your technician has accepted the job.".to_string(),
            BookingStatus::Reached => "Your technician has arrived.".to_string(),
            BookingStatus::InProgress => "Work on your booking has started.".to_string(),
            BookingStatus::Completed => "Your booking is complete. Thank you!".to_string(),
            BookingStatus::Cancelled => "Your booking has been cancelled.".to_string(),
        };

        self.store(
            customer.id,
            "booking_status_changed",
            Some(booking.id),
            Some(json!({
                "old_status": old_status,
                "new_status": booking.status,
                "booking_date": booking.booking_date,
                "booking_time": booking.booking_time,
            })),
            &message,
        )
        .await;

        self.send_sms(&customer.phone, &message).await
    }

    /// Assignment fan-out: the worker gets the job sheet, the customer gets
    /// the status update separately.
    pub async fn notify_worker_assigned(
        &self,
        worker: &User,
        booking: &Booking,
    ) -> Result<(), ServiceError> {
        let (window_start, window_end) = booking.booking_time.window();
        let message = format!(
            "New job assigned for {} ({}-{}). Address: {}",
            booking.booking_date, window_start, window_end, booking.customer_address
        );

        self.store(
            worker.id,
            "job_assigned",
            Some(booking.id),
            Some(json!({
                "booking_date": booking.booking_date,
                "booking_time": booking.booking_time,
            })),
            &message,
        )
        .await;

        self.send_sms(&worker.phone, &message).await
    }

    async fn store(
        &self,
        user_id: Uuid,
        kind: &str,
        booking_id: Option<Uuid>,
        payload: Option<serde_json::Value>,
        message: &str,
    ) {
        if let Err(e) = self
            .db_client
            .store_notification(
                user_id,
                kind.to_string(),
                NotificationChannel::Sms,
                booking_id,
                payload,
                message.to_string(),
            )
            .await
        {
            tracing::error!("Failed to persist notification for {}: {}", user_id, e);
        }
    }

    async fn send_sms(&self, phone: &str, message: &str) -> Result<(), ServiceError> {
        let payload = json!({
            "to": phone,
            "body": message,
        });

        let mut last_error = None;

        for attempt in 1..=MAX_RETRIES {
            let result = self
                .http
                .post(&self.config.sms_gateway_url)
                .header("Authorization", format!("Bearer {}", self.config.sms_gateway_key))
                .json(&payload)
                .send()
                .await;

            match result {
                Ok(response) if response.status().is_success() => {
                    tracing::info!("SMS dispatched to {}", phone);
                    return Ok(());
                }
                Ok(response) => {
                    last_error = Some(format!("gateway returned {}", response.status()));
                }
                Err(e) => {
                    last_error = Some(e.to_string());
                }
            }

            if attempt < MAX_RETRIES {
                let delay = RETRY_DELAY_MS * 2_u64.pow(attempt - 1);
                sleep(Duration::from_millis(delay)).await;
            }
        }

        Err(ServiceError::Notification(format!(
            "SMS delivery to {} failed after {} attempts: {}",
            phone,
            MAX_RETRIES,
            last_error.unwrap_or_else(|| "unknown error".to_string())
        )))
    }

    /// Completion receipt for customers who shared an email address.
    pub async fn notify_booking_receipt(
        &self,
        customer: &User,
        booking: &Booking,
    ) -> Result<(), ServiceError> {
        let Some(email) = customer.email.as_deref() else {
            return Ok(());
        };

        let html_body = format!(
            "<p>Hi {},</p>\
             <p>Your booking on {} ({}) is complete.</p>\
             <p>Total paid: ₹{:.2}</p>",
            customer.full_name.as_deref().unwrap_or("there"),
            booking.booking_date,
            booking.booking_time.to_str(),
            crate::models::walletmodels::paise_to_rupees(booking.total_price)
        );

        self.send_email(email, "Your HomeServe booking receipt", &html_body)
            .await
    }

    async fn send_email(
        &self,
        to_email: &str,
        subject: &str,
        html_body: &str,
    ) -> Result<(), ServiceError> {
        if !to_email.contains('@') {
            return Err(ServiceError::Notification(format!(
                "Invalid email address: {}",
                to_email
            )));
        }

        let payload = json!({
            "from": self.config.mail_from,
            "to": to_email,
            "subject": subject,
            "html": html_body,
        });

        let response = self
            .http
            .post(&self.config.mail_api_url)
            .header("Authorization", format!("Bearer {}", self.config.mail_api_key))
            .json(&payload)
            .send()
            .await
            .map_err(|e| ServiceError::Notification(format!("Mail API error: {}", e)))?;

        if response.status().is_success() {
            tracing::info!("Email sent to {}", to_email);
            Ok(())
        } else {
            Err(ServiceError::Notification(format!(
                "Mail API returned {}",
                response.status()
            )))
        }
    }
}
