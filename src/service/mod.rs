pub mod background_jobs;
pub mod booking_service;
pub mod error;
pub mod matching_service;
pub mod notification_service;
pub mod otp_service;
pub mod payment_service;
pub mod pricing_service;
pub mod slot_service;
pub mod wallet_service;
