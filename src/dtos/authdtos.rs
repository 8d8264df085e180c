// dtos/authdtos.rs
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::{
    otpmodel::OtpPurpose,
    usermodel::{User, UserRole},
};

fn phone_regex() -> &'static Regex {
    static PHONE_RE: OnceLock<Regex> = OnceLock::new();
    PHONE_RE.get_or_init(|| Regex::new(r"^\+?[0-9]{10,14}$").expect("valid phone regex"))
}

pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if phone_regex().is_match(phone) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_phone"))
    }
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct RequestOtpDto {
    #[validate(custom = "validate_phone")]
    pub phone: String,

    pub purpose: Option<OtpPurpose>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct VerifyOtpDto {
    #[validate(custom = "validate_phone")]
    pub phone: String,

    #[validate(length(equal = 6, message = "OTP must be 6 digits"))]
    pub code: String,

    pub purpose: Option<OtpPurpose>,

    #[validate(length(min = 1, max = 120, message = "Name must be between 1 and 120 characters"))]
    pub full_name: Option<String>,

    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FilterUserDto {
    pub id: Uuid,
    pub phone: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub role: UserRole,
    pub phone_verified: bool,
    pub wallet_balance: i64,
}

impl FilterUserDto {
    pub fn filter_user(user: &User) -> Self {
        FilterUserDto {
            id: user.id,
            phone: user.phone.clone(),
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            role: user.role,
            phone_verified: user.phone_verified,
            wallet_balance: user.wallet_balance,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyOtpResponseDto {
    pub status: String,
    pub token: String,
    pub profile: FilterUserDto,
    pub is_new_user: bool,
    pub needs_profile_completion: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_validation_accepts_common_formats() {
        assert!(validate_phone("9999999999").is_ok());
        assert!(validate_phone("+919999999999").is_ok());
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("not-a-phone").is_err());
    }
}
