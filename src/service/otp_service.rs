// service/otp_service.rs
use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio::time::interval;

use crate::{
    db::{db::DBClient, otpdb::OtpExt, userdb::UserExt},
    models::otpmodel::{ChallengeState, OtpPurpose, OTP_TTL_MINUTES},
    models::usermodel::User,
    service::{error::ServiceError, notification_service::NotificationService},
    utils::otp_generator,
};

/// The identity gate: issues, throttles, and verifies per-phone one-time
/// codes. Codes are stored hashed and are single use.
#[derive(Debug, Clone)]
pub struct OtpService {
    db_client: Arc<DBClient>,
    notification_service: Arc<NotificationService>,
}

impl OtpService {
    pub fn new(db_client: Arc<DBClient>, notification_service: Arc<NotificationService>) -> Self {
        Self {
            db_client,
            notification_service,
        }
    }

    /// Issue (or reissue) the active challenge for a phone. A prior challenge
    /// younger than the resend cooldown is a hard 429; otherwise the new code
    /// replaces it and the attempt counter resets.
    pub async fn request_challenge(&self, phone: &str, purpose: OtpPurpose) -> Result<(), ServiceError> {
        let now = Utc::now();

        if let Some(existing) = self.db_client.get_challenge(phone).await? {
            if let Some(retry_after_secs) = existing.seconds_until_resend(now) {
                return Err(ServiceError::OtpRateLimited { retry_after_secs });
            }
        }

        let code = otp_generator::generate_otp();
        let code_hash = otp_generator::hash_otp(&code);
        let expires_at = now + Duration::minutes(OTP_TTL_MINUTES);

        self.db_client
            .upsert_challenge(phone, &code_hash, purpose, expires_at)
            .await?;

        // Delivery is best-effort: the challenge stays valid either way, and
        // the code is logged so support can recover a stuck signup.
        let notifier = self.notification_service.clone();
        let phone_owned = phone.to_string();
        let code_owned = code.clone();
        tokio::spawn(async move {
            if let Err(e) = notifier.send_otp_sms(&phone_owned, &code_owned).await {
                tracing::warn!(
                    "OTP dispatch to {} failed ({}); code {} held for manual recovery",
                    phone_owned,
                    e,
                    code_owned
                );
            }
        });

        Ok(())
    }

    /// Verify a submitted code. On success the challenge is deleted (single
    /// use) and the customer profile is found or created with the phone
    /// marked verified. Returns the profile and whether it was just created.
    pub async fn verify_challenge(
        &self,
        phone: &str,
        code: &str,
        purpose: OtpPurpose,
        full_name: Option<String>,
        email: Option<String>,
    ) -> Result<(User, bool), ServiceError> {
        let challenge = self
            .db_client
            .get_challenge(phone)
            .await?
            .ok_or(ServiceError::OtpNotFound)?;

        if challenge.purpose != purpose {
            return Err(ServiceError::OtpNotFound);
        }

        match challenge.state(Utc::now()) {
            ChallengeState::AttemptsExhausted => return Err(ServiceError::OtpAttemptsExceeded),
            ChallengeState::Expired => return Err(ServiceError::OtpExpired),
            ChallengeState::Usable => {}
        }

        if !otp_generator::verify_otp(code, &challenge.code_hash) {
            // The cap is enforced on entry, so the counter only moves here;
            // once it reaches the limit every later attempt is refused above.
            self.db_client.increment_attempts(challenge.id).await?;
            return Err(ServiceError::OtpInvalid);
        }

        self.db_client.delete_challenge(challenge.id).await?;

        let existing = self.db_client.get_user_by_phone(phone).await?;
        match existing {
            Some(user) => {
                let mut user = if !user.phone_verified {
                    self.db_client.mark_phone_verified(user.id).await?
                } else {
                    user
                };
                if full_name.is_some() || email.is_some() {
                    user = self
                        .db_client
                        .update_profile(user.id, full_name, email)
                        .await?;
                }
                Ok((user, false))
            }
            None => {
                let user = self
                    .db_client
                    .create_verified_customer(phone, full_name, email)
                    .await?;
                Ok((user, true))
            }
        }
    }

    /// Hourly reaper for expired challenges.
    pub fn start_cleanup_task(&self) {
        let db_client = self.db_client.clone();

        tokio::spawn(async move {
            let mut ticker = interval(std::time::Duration::from_secs(3600));

            loop {
                ticker.tick().await;

                match db_client.cleanup_expired_challenges().await {
                    Ok(count) if count > 0 => {
                        tracing::info!("Cleaned up {} expired OTP challenges", count);
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::error!("Failed to clean up expired OTP challenges: {}", e);
                    }
                }
            }
        });
    }
}
