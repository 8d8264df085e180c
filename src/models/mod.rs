pub mod bookingmodel;
pub mod notificationmodel;
pub mod otpmodel;
pub mod promomodel;
pub mod usermodel;
pub mod walletmodels;
pub mod workermodel;
