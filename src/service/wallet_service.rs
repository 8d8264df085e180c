// service/wallet_service.rs
use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::{db::DBClient, walletdb::WalletExt},
    models::walletmodels::TransactionType,
    service::error::ServiceError,
};

/// Append-only wallet ledger. Every balance movement is a guarded
/// read-modify-write on the user row followed by a transaction row, so the
/// balance can never go negative and the ledger always explains it.
#[derive(Debug, Clone)]
pub struct WalletService {
    db_client: Arc<DBClient>,
}

impl WalletService {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        Self { db_client }
    }

    pub async fn balance(&self, user_id: Uuid) -> Result<i64, ServiceError> {
        self.db_client
            .get_wallet_balance(user_id)
            .await?
            .ok_or(ServiceError::UserNotFound(user_id))
    }

    pub async fn debit(
        &self,
        user_id: Uuid,
        amount: i64,
        description: String,
        booking_id: Option<Uuid>,
    ) -> Result<i64, ServiceError> {
        if amount <= 0 {
            return Err(ServiceError::Validation(
                "Debit amount must be positive".to_string(),
            ));
        }

        let new_balance = self
            .db_client
            .try_adjust_balance(user_id, -amount)
            .await?
            .ok_or(ServiceError::InsufficientWalletBalance)?;

        self.db_client
            .record_wallet_transaction(user_id, amount, TransactionType::Debit, description, booking_id)
            .await?;

        Ok(new_balance)
    }

    pub async fn credit(
        &self,
        user_id: Uuid,
        amount: i64,
        description: String,
        booking_id: Option<Uuid>,
    ) -> Result<i64, ServiceError> {
        self.apply_credit(user_id, amount, TransactionType::Credit, description, booking_id)
            .await
    }

    /// Money returned after a cancel. Same direction as a credit but kept as
    /// its own transaction type so the ledger reads honestly.
    pub async fn refund(
        &self,
        user_id: Uuid,
        amount: i64,
        description: String,
        booking_id: Option<Uuid>,
    ) -> Result<i64, ServiceError> {
        self.apply_credit(user_id, amount, TransactionType::Refund, description, booking_id)
            .await
    }

    async fn apply_credit(
        &self,
        user_id: Uuid,
        amount: i64,
        transaction_type: TransactionType,
        description: String,
        booking_id: Option<Uuid>,
    ) -> Result<i64, ServiceError> {
        if amount <= 0 {
            return Err(ServiceError::Validation(
                "Credit amount must be positive".to_string(),
            ));
        }

        let new_balance = self
            .db_client
            .try_adjust_balance(user_id, amount)
            .await?
            .ok_or(ServiceError::UserNotFound(user_id))?;

        self.db_client
            .record_wallet_transaction(user_id, amount, transaction_type, description, booking_id)
            .await?;

        Ok(new_balance)
    }
}
