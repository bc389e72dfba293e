//! Inventory service

use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::inventory::{CreateInventoryItem, InventoryItem, InventoryQuery, UpdateInventoryItem},
    repository::Repository,
    services::redis::{Invalidation, RedisService},
};

#[derive(Clone)]
pub struct InventoryService {
    repository: Repository,
    redis: RedisService,
}

impl InventoryService {
    pub fn new(repository: Repository, redis: RedisService) -> Self {
        Self { repository, redis }
    }

    pub async fn list(&self, query: &InventoryQuery) -> AppResult<Vec<InventoryItem>> {
        self.repository.inventory.list(query).await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<InventoryItem> {
        self.repository.inventory.get_by_id(id).await
    }

    pub async fn create(&self, data: CreateInventoryItem) -> AppResult<InventoryItem> {
        data.validate()?;
        self.repository.labs.get_by_id(data.lab_id).await?;
        let item = self.repository.inventory.create(&data).await?;
        tracing::info!(item_id = %item.id, lab_id = %item.lab_id, "Inventory item created");
        Ok(item)
    }

    pub async fn update(&self, id: Uuid, data: UpdateInventoryItem) -> AppResult<InventoryItem> {
        data.validate()?;
        if let Some(lab_id) = data.lab_id {
            self.repository.labs.get_by_id(lab_id).await?;
        }
        let item = self.repository.inventory.update(id, &data).await?;
        if data.status.is_some() {
            tracing::info!(item_id = %item.id, status = %item.status, "Inventory status set by administrator");
        }
        self.redis
            .invalidate(Invalidation::new("inventory_item", item.id, Some(item.status.to_string())))
            .await;
        Ok(item)
    }

    /// Delete an item that was never part of a borrow request
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.repository.inventory.get_by_id(id).await?;
        if self.repository.inventory.is_linked(id).await? {
            return Err(AppError::Conflict(
                "Item is linked to borrow requests; retire it instead".to_string(),
            ));
        }
        self.repository.inventory.delete(id).await?;
        tracing::info!(item_id = %id, "Inventory item deleted");
        Ok(())
    }
}
