// models/usermodel.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Customer,
    Worker,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub phone: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub role: UserRole,
    pub phone_verified: bool,
    /// Stored-value balance in paise. The signed sum of the user's wallet
    /// transactions must always equal this field.
    pub wallet_balance: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// A profile can create bookings only after OTP verification of its phone.
    pub fn can_create_bookings(&self) -> bool {
        self.phone_verified && self.role == UserRole::Customer
    }

    pub fn needs_profile_completion(&self) -> bool {
        self.full_name.is_none() || self.email.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer(phone_verified: bool) -> User {
        User {
            id: Uuid::new_v4(),
            phone: "9999999999".to_string(),
            full_name: Some("Asha Rao".to_string()),
            email: None,
            role: UserRole::Customer,
            phone_verified,
            wallet_balance: 0,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn unverified_customer_cannot_book() {
        assert!(!customer(false).can_create_bookings());
        assert!(customer(true).can_create_bookings());
    }

    #[test]
    fn missing_email_needs_completion() {
        assert!(customer(true).needs_profile_completion());
    }
}
