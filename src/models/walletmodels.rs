// models/walletmodels.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "transaction_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Credit,
    Debit,
    Refund,
}

impl TransactionType {
    /// Sign of this entry in the balance reconciliation: the signed sum of a
    /// user's transactions must equal their wallet_balance.
    pub fn sign(&self) -> i64 {
        match self {
            TransactionType::Credit | TransactionType::Refund => 1,
            TransactionType::Debit => -1,
        }
    }
}

/// Append-only ledger entry. `amount` is always positive; direction comes
/// from the transaction type.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct WalletTransaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: i64, // in paise
    pub transaction_type: TransactionType,
    pub description: String,
    pub booking_id: Option<Uuid>,
    pub created_at: Option<DateTime<Utc>>,
}

impl WalletTransaction {
    pub fn amount_in_rupees(&self) -> f64 {
        self.amount as f64 / 100.0
    }
}

pub fn rupees_to_paise(rupees: f64) -> i64 {
    (rupees * 100.0).round() as i64
}

pub fn paise_to_rupees(paise: i64) -> f64 {
    paise as f64 / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paise_conversion_round_trips() {
        assert_eq!(rupees_to_paise(499.99), 49999);
        assert_eq!(paise_to_rupees(49999), 499.99);

        let tx = WalletTransaction {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            amount: 49999,
            transaction_type: TransactionType::Credit,
            description: "top-up".to_string(),
            booking_id: None,
            created_at: None,
        };
        assert_eq!(tx.amount_in_rupees(), 499.99);
    }

    #[test]
    fn refunds_count_as_credits_in_reconciliation() {
        assert_eq!(TransactionType::Credit.sign(), 1);
        assert_eq!(TransactionType::Refund.sign(), 1);
        assert_eq!(TransactionType::Debit.sign(), -1);
    }
}
