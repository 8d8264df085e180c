// db/userdb.rs
use async_trait::async_trait;
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::usermodel::{User, UserRole};

#[async_trait]
pub trait UserExt {
    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>, Error>;
    async fn get_user_by_phone(&self, phone: &str) -> Result<Option<User>, Error>;

    /// Create a customer profile with a verified phone. Used by the OTP
    /// verify path for first-time callers.
    async fn create_verified_customer(
        &self,
        phone: &str,
        full_name: Option<String>,
        email: Option<String>,
    ) -> Result<User, Error>;

    async fn create_user(
        &self,
        phone: &str,
        full_name: Option<String>,
        email: Option<String>,
        role: UserRole,
    ) -> Result<User, Error>;

    async fn mark_phone_verified(&self, user_id: Uuid) -> Result<User, Error>;

    async fn update_profile(
        &self,
        user_id: Uuid,
        full_name: Option<String>,
        email: Option<String>,
    ) -> Result<User, Error>;
}

#[async_trait]
impl UserExt for DBClient {
    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>, Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_user_by_phone(&self, phone: &str) -> Result<Option<User>, Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE phone = $1")
            .bind(phone)
            .fetch_optional(&self.pool)
            .await
    }

    async fn create_verified_customer(
        &self,
        phone: &str,
        full_name: Option<String>,
        email: Option<String>,
    ) -> Result<User, Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (phone, full_name, email, role, phone_verified)
            VALUES ($1, $2, $3, 'customer', TRUE)
            RETURNING *
            "#,
        )
        .bind(phone)
        .bind(full_name)
        .bind(email)
        .fetch_one(&self.pool)
        .await
    }

    async fn create_user(
        &self,
        phone: &str,
        full_name: Option<String>,
        email: Option<String>,
        role: UserRole,
    ) -> Result<User, Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (phone, full_name, email, role)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(phone)
        .bind(full_name)
        .bind(email)
        .bind(role)
        .fetch_one(&self.pool)
        .await
    }

    async fn mark_phone_verified(&self, user_id: Uuid) -> Result<User, Error> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET phone_verified = TRUE, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_profile(
        &self,
        user_id: Uuid,
        full_name: Option<String>,
        email: Option<String>,
    ) -> Result<User, Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET full_name = COALESCE($2, full_name),
                email = COALESCE($3, email),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(full_name)
        .bind(email)
        .fetch_one(&self.pool)
        .await
    }
}
