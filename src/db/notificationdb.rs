// db/notificationdb.rs
use async_trait::async_trait;
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::notificationmodel::{Notification, NotificationChannel};

#[async_trait]
pub trait NotificationExt {
    async fn store_notification(
        &self,
        user_id: Uuid,
        kind: String,
        channel: NotificationChannel,
        booking_id: Option<Uuid>,
        payload: Option<serde_json::Value>,
        message: String,
    ) -> Result<Notification, Error>;
}

#[async_trait]
impl NotificationExt for DBClient {
    async fn store_notification(
        &self,
        user_id: Uuid,
        kind: String,
        channel: NotificationChannel,
        booking_id: Option<Uuid>,
        payload: Option<serde_json::Value>,
        message: String,
    ) -> Result<Notification, Error> {
        sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications (user_id, kind, channel, booking_id, payload, message)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(kind)
        .bind(channel)
        .bind(booking_id)
        .bind(payload)
        .bind(message)
        .fetch_one(&self.pool)
        .await
    }
}
