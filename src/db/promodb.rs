// db/promodb.rs
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Error;

use super::db::DBClient;
use crate::models::promomodel::{DiscountType, PromoCode};

#[async_trait]
pub trait PromoExt {
    async fn get_promo_by_code(&self, code: &str) -> Result<Option<PromoCode>, Error>;

    async fn list_promos(&self) -> Result<Vec<PromoCode>, Error>;

    async fn create_promo(
        &self,
        code: String,
        discount_type: DiscountType,
        discount_value: i64,
        max_discount: Option<i64>,
        min_order_value: i64,
        valid_from: Option<DateTime<Utc>>,
        valid_until: Option<DateTime<Utc>>,
        max_usage: Option<i32>,
    ) -> Result<PromoCode, Error>;

    async fn update_promo(
        &self,
        code: &str,
        is_active: Option<bool>,
        max_usage: Option<i32>,
        valid_until: Option<DateTime<Utc>>,
    ) -> Result<Option<PromoCode>, Error>;

    /// The one and only place usage_count moves, guarded against the cap so
    /// two concurrent bookings cannot push it past max_usage.
    async fn try_increment_promo_usage(&self, code: &str) -> Result<bool, Error>;
}

#[async_trait]
impl PromoExt for DBClient {
    async fn get_promo_by_code(&self, code: &str) -> Result<Option<PromoCode>, Error> {
        sqlx::query_as::<_, PromoCode>("SELECT * FROM promo_codes WHERE code = $1")
            .bind(code.to_uppercase())
            .fetch_optional(&self.pool)
            .await
    }

    async fn list_promos(&self) -> Result<Vec<PromoCode>, Error> {
        sqlx::query_as::<_, PromoCode>("SELECT * FROM promo_codes ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
    }

    async fn create_promo(
        &self,
        code: String,
        discount_type: DiscountType,
        discount_value: i64,
        max_discount: Option<i64>,
        min_order_value: i64,
        valid_from: Option<DateTime<Utc>>,
        valid_until: Option<DateTime<Utc>>,
        max_usage: Option<i32>,
    ) -> Result<PromoCode, Error> {
        sqlx::query_as::<_, PromoCode>(
            r#"
            INSERT INTO promo_codes
                (code, discount_type, discount_value, max_discount, min_order_value,
                 valid_from, valid_until, max_usage)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(code.to_uppercase())
        .bind(discount_type)
        .bind(discount_value)
        .bind(max_discount)
        .bind(min_order_value)
        .bind(valid_from)
        .bind(valid_until)
        .bind(max_usage)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_promo(
        &self,
        code: &str,
        is_active: Option<bool>,
        max_usage: Option<i32>,
        valid_until: Option<DateTime<Utc>>,
    ) -> Result<Option<PromoCode>, Error> {
        sqlx::query_as::<_, PromoCode>(
            r#"
            UPDATE promo_codes
            SET is_active = COALESCE($2, is_active),
                max_usage = COALESCE($3, max_usage),
                valid_until = COALESCE($4, valid_until),
                updated_at = NOW()
            WHERE code = $1
            RETURNING *
            "#,
        )
        .bind(code.to_uppercase())
        .bind(is_active)
        .bind(max_usage)
        .bind(valid_until)
        .fetch_optional(&self.pool)
        .await
    }

    async fn try_increment_promo_usage(&self, code: &str) -> Result<bool, Error> {
        let updated = sqlx::query_scalar::<_, i32>(
            r#"
            UPDATE promo_codes
            SET usage_count = usage_count + 1, updated_at = NOW()
            WHERE code = $1
              AND is_active = TRUE
              AND (max_usage IS NULL OR usage_count < max_usage)
            RETURNING usage_count
            "#,
        )
        .bind(code.to_uppercase())
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated.is_some())
    }
}
