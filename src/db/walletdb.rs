// db/walletdb.rs
use async_trait::async_trait;
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::walletmodels::{TransactionType, WalletTransaction};

#[async_trait]
pub trait WalletExt {
    async fn get_wallet_balance(&self, user_id: Uuid) -> Result<Option<i64>, Error>;

    /// Single guarded read-modify-write on the user row: the balance can
    /// never go below zero, even under concurrent debits racing on a stale
    /// read. Returns the new balance, or None when the guard rejected.
    async fn try_adjust_balance(&self, user_id: Uuid, delta: i64) -> Result<Option<i64>, Error>;

    async fn record_wallet_transaction(
        &self,
        user_id: Uuid,
        amount: i64,
        transaction_type: TransactionType,
        description: String,
        booking_id: Option<Uuid>,
    ) -> Result<WalletTransaction, Error>;

    async fn get_wallet_transactions(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<WalletTransaction>, Error>;
}

#[async_trait]
impl WalletExt for DBClient {
    async fn get_wallet_balance(&self, user_id: Uuid) -> Result<Option<i64>, Error> {
        sqlx::query_scalar::<_, i64>("SELECT wallet_balance FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn try_adjust_balance(&self, user_id: Uuid, delta: i64) -> Result<Option<i64>, Error> {
        sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE users
            SET wallet_balance = wallet_balance + $2, updated_at = NOW()
            WHERE id = $1 AND wallet_balance + $2 >= 0
            RETURNING wallet_balance
            "#,
        )
        .bind(user_id)
        .bind(delta)
        .fetch_optional(&self.pool)
        .await
    }

    async fn record_wallet_transaction(
        &self,
        user_id: Uuid,
        amount: i64,
        transaction_type: TransactionType,
        description: String,
        booking_id: Option<Uuid>,
    ) -> Result<WalletTransaction, Error> {
        sqlx::query_as::<_, WalletTransaction>(
            r#"
            INSERT INTO wallet_transactions (user_id, amount, transaction_type, description, booking_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(amount)
        .bind(transaction_type)
        .bind(description)
        .bind(booking_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_wallet_transactions(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<WalletTransaction>, Error> {
        sqlx::query_as::<_, WalletTransaction>(
            r#"
            SELECT * FROM wallet_transactions
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }
}
