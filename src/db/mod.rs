pub mod bookingdb;
pub mod db;
pub mod migrations;
pub mod notificationdb;
pub mod otpdb;
pub mod promodb;
pub mod slotdb;
pub mod userdb;
pub mod walletdb;
pub mod workerdb;
