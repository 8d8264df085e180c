// models/notificationmodel.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "notification_channel", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NotificationChannel {
    Sms,
    Email,
}

/// A dispatched (or attempted) notification, persisted for the in-app feed.
/// Delivery itself is best-effort; a failed send still leaves a row.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: String,
    pub channel: NotificationChannel,
    pub booking_id: Option<Uuid>,
    pub payload: Option<serde_json::Value>,
    pub message: String,
    pub created_at: Option<DateTime<Utc>>,
}
