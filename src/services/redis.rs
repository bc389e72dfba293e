//! Redis service publishing view invalidation messages

use chrono::{DateTime, Utc};
use redis::{AsyncCommands, Client};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Message published after a record changed, so cached views can be refreshed
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Invalidation {
    pub entity: &'static str,
    pub id: Uuid,
    pub status: Option<String>,
    pub at: DateTime<Utc>,
}

impl Invalidation {
    pub fn new(entity: &'static str, id: Uuid, status: Option<String>) -> Self {
        Self {
            entity,
            id,
            status,
            at: Utc::now(),
        }
    }
}

#[derive(Clone)]
pub struct RedisService {
    client: Client,
    channel: String,
}

impl RedisService {
    /// Create a new Redis service
    pub async fn new(url: &str, channel: &str) -> AppResult<Self> {
        let client = Client::open(url)
            .map_err(|e| AppError::Internal(format!("Failed to create Redis client: {}", e)))?;

        // Test connection
        let mut conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to connect to Redis: {}", e)))?;

        redis::cmd("PING")
            .query_async::<_, String>(&mut conn)
            .await
            .map_err(|e| AppError::Internal(format!("Redis connection test failed: {}", e)))?;

        Ok(Self {
            client,
            channel: channel.to_string(),
        })
    }

    async fn publish(&self, message: &Invalidation) -> AppResult<usize> {
        let payload = serde_json::to_string(message)
            .map_err(|e| AppError::Internal(format!("Failed to serialize invalidation: {}", e)))?;

        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to get Redis connection: {}", e)))?;

        let receivers: usize = conn
            .publish(&self.channel, payload)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to publish invalidation: {}", e)))?;

        Ok(receivers)
    }

    /// Publish an invalidation; failures are logged and never fail the caller
    pub async fn invalidate(&self, message: Invalidation) {
        match self.publish(&message).await {
            Ok(receivers) => tracing::debug!(
                entity = message.entity,
                id = %message.id,
                receivers,
                "Published view invalidation"
            ),
            Err(e) => tracing::warn!(
                entity = message.entity,
                id = %message.id,
                "View invalidation not delivered: {}",
                e
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalidation_payload_shape() {
        let id = Uuid::new_v4();
        let message = Invalidation::new("borrow_request", id, Some("approved".to_string()));
        let json: serde_json::Value = serde_json::to_value(&message).unwrap();
        assert_eq!(json["entity"], "borrow_request");
        assert_eq!(json["id"], id.to_string());
        assert_eq!(json["status"], "approved");
        assert!(json["at"].is_string());
    }
}
