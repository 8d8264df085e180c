// models/otpmodel.rs
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Codes stay valid for five minutes after issue.
pub const OTP_TTL_MINUTES: i64 = 5;
/// A challenge dies after five failed attempts and stays dead until reissued.
pub const OTP_MAX_ATTEMPTS: i32 = 5;
/// Minimum gap between two OTP requests for the same phone.
pub const OTP_RESEND_COOLDOWN_SECS: i64 = 45;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "otp_purpose", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OtpPurpose {
    Login,
    PhoneUpdate,
}

/// The single active challenge for a phone number. A new request replaces the
/// previous row; the code itself is never stored, only its sha256.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OtpChallenge {
    pub id: Uuid,
    pub phone: String,
    pub code_hash: String,
    pub purpose: OtpPurpose,
    pub expires_at: DateTime<Utc>,
    pub attempts: i32,
    pub last_sent_at: DateTime<Utc>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Outcome of checking a stored challenge against the clock and attempt
/// counter, before the submitted code is even looked at.
#[derive(Debug, PartialEq)]
pub enum ChallengeState {
    Usable,
    Expired,
    AttemptsExhausted,
}

impl OtpChallenge {
    pub fn state(&self, now: DateTime<Utc>) -> ChallengeState {
        if self.attempts >= OTP_MAX_ATTEMPTS {
            return ChallengeState::AttemptsExhausted;
        }
        if now > self.expires_at {
            return ChallengeState::Expired;
        }
        ChallengeState::Usable
    }

    /// Resend throttle: a fresh request within the cooldown window is refused.
    pub fn seconds_until_resend(&self, now: DateTime<Utc>) -> Option<i64> {
        let elapsed = now.signed_duration_since(self.last_sent_at);
        let cooldown = Duration::seconds(OTP_RESEND_COOLDOWN_SECS);
        if elapsed < cooldown {
            Some((cooldown - elapsed).num_seconds().max(1))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn challenge(attempts: i32, age_secs: i64) -> OtpChallenge {
        let now = Utc::now();
        OtpChallenge {
            id: Uuid::new_v4(),
            phone: "9999999999".to_string(),
            code_hash: "deadbeef".to_string(),
            purpose: OtpPurpose::Login,
            expires_at: now - Duration::seconds(age_secs) + Duration::minutes(OTP_TTL_MINUTES),
            attempts,
            last_sent_at: now - Duration::seconds(age_secs),
            created_at: Some(now - Duration::seconds(age_secs)),
        }
    }

    #[test]
    fn fresh_challenge_is_usable() {
        assert_eq!(challenge(0, 0).state(Utc::now()), ChallengeState::Usable);
    }

    #[test]
    fn challenge_expires_after_ttl() {
        let c = challenge(0, OTP_TTL_MINUTES * 60 + 1);
        assert_eq!(c.state(Utc::now()), ChallengeState::Expired);
    }

    #[test]
    fn attempts_cap_is_terminal_even_before_expiry() {
        // Exhaustion outranks expiry: a correct code on the 6th try must
        // still be refused.
        let c = challenge(OTP_MAX_ATTEMPTS, 10);
        assert_eq!(c.state(Utc::now()), ChallengeState::AttemptsExhausted);
    }

    #[test]
    fn resend_blocked_inside_cooldown() {
        let c = challenge(0, 10);
        let wait = c.seconds_until_resend(Utc::now()).expect("should be throttled");
        assert!(wait > 0 && wait <= OTP_RESEND_COOLDOWN_SECS);
    }

    #[test]
    fn resend_allowed_after_cooldown() {
        let c = challenge(0, OTP_RESEND_COOLDOWN_SECS + 1);
        assert_eq!(c.seconds_until_resend(Utc::now()), None);
    }
}
