// db/otpdb.rs
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::otpmodel::{OtpChallenge, OtpPurpose};

#[async_trait]
pub trait OtpExt {
    async fn get_challenge(&self, phone: &str) -> Result<Option<OtpChallenge>, Error>;

    /// One active challenge per phone: a new request replaces any prior row,
    /// resetting the attempt counter.
    async fn upsert_challenge(
        &self,
        phone: &str,
        code_hash: &str,
        purpose: OtpPurpose,
        expires_at: DateTime<Utc>,
    ) -> Result<OtpChallenge, Error>;

    async fn increment_attempts(&self, challenge_id: Uuid) -> Result<i32, Error>;

    async fn delete_challenge(&self, challenge_id: Uuid) -> Result<(), Error>;

    async fn cleanup_expired_challenges(&self) -> Result<u64, Error>;
}

#[async_trait]
impl OtpExt for DBClient {
    async fn get_challenge(&self, phone: &str) -> Result<Option<OtpChallenge>, Error> {
        sqlx::query_as::<_, OtpChallenge>("SELECT * FROM otp_challenges WHERE phone = $1")
            .bind(phone)
            .fetch_optional(&self.pool)
            .await
    }

    async fn upsert_challenge(
        &self,
        phone: &str,
        code_hash: &str,
        purpose: OtpPurpose,
        expires_at: DateTime<Utc>,
    ) -> Result<OtpChallenge, Error> {
        sqlx::query_as::<_, OtpChallenge>(
            r#"
            INSERT INTO otp_challenges (phone, code_hash, purpose, expires_at, attempts, last_sent_at)
            VALUES ($1, $2, $3, $4, 0, NOW())
            ON CONFLICT (phone) DO UPDATE SET
                code_hash = EXCLUDED.code_hash,
                purpose = EXCLUDED.purpose,
                expires_at = EXCLUDED.expires_at,
                attempts = 0,
                last_sent_at = NOW(),
                created_at = NOW()
            RETURNING *
            "#,
        )
        .bind(phone)
        .bind(code_hash)
        .bind(purpose)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await
    }

    async fn increment_attempts(&self, challenge_id: Uuid) -> Result<i32, Error> {
        sqlx::query_scalar::<_, i32>(
            "UPDATE otp_challenges SET attempts = attempts + 1 WHERE id = $1 RETURNING attempts",
        )
        .bind(challenge_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn delete_challenge(&self, challenge_id: Uuid) -> Result<(), Error> {
        sqlx::query("DELETE FROM otp_challenges WHERE id = $1")
            .bind(challenge_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn cleanup_expired_challenges(&self) -> Result<u64, Error> {
        let result = sqlx::query("DELETE FROM otp_challenges WHERE expires_at < NOW()")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
