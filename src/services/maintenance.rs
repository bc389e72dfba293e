//! Maintenance records service

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::{InventoryStatus, MaintenanceStatus},
        maintenance::{MaintenanceQuery, MaintenanceRecord, OpenMaintenance, ResolveMaintenance},
    },
    repository::Repository,
    services::redis::{Invalidation, RedisService},
};

#[derive(Clone)]
pub struct MaintenanceService {
    repository: Repository,
    redis: RedisService,
}

impl MaintenanceService {
    pub fn new(repository: Repository, redis: RedisService) -> Self {
        Self { repository, redis }
    }

    pub async fn list(&self, query: &MaintenanceQuery) -> AppResult<Vec<MaintenanceRecord>> {
        self.repository.maintenance.list(query).await
    }

    /// Open a record and take the item out of circulation
    pub async fn open(&self, reported_by: Uuid, data: OpenMaintenance) -> AppResult<MaintenanceRecord> {
        data.validate()?;

        let mut tx = self.repository.begin().await?;
        let item = self.repository.inventory.lock(&mut *tx, data.item_id).await?;
        if item.status != InventoryStatus::Available {
            return Err(AppError::InvalidState(format!(
                "Item {} is {}, only available items can enter maintenance",
                item.id, item.status
            )));
        }

        let record = self
            .repository
            .maintenance
            .insert(&mut *tx, item.id, reported_by, data.description.trim(), Utc::now())
            .await?;
        self.repository
            .inventory
            .set_status(&mut *tx, item.id, InventoryStatus::Maintenance)
            .await?;
        tx.commit().await?;

        tracing::info!(record_id = %record.id, item_id = %item.id, "Maintenance opened");
        self.redis
            .invalidate(Invalidation::new(
                "inventory_item",
                item.id,
                Some(InventoryStatus::Maintenance.to_string()),
            ))
            .await;
        Ok(record)
    }

    /// Close a record and return the item to circulation if it is still under repair
    pub async fn resolve(&self, id: Uuid, resolved_by: Uuid, data: ResolveMaintenance) -> AppResult<MaintenanceRecord> {
        let mut tx = self.repository.begin().await?;
        let record = self.repository.maintenance.lock(&mut *tx, id).await?;
        if record.status == MaintenanceStatus::Resolved {
            return Err(AppError::InvalidState(format!("Maintenance record {} is already resolved", id)));
        }

        let resolution = data.resolution.as_deref().map(str::trim).filter(|r| !r.is_empty());
        let record = self
            .repository
            .maintenance
            .resolve(&mut *tx, id, resolved_by, resolution, Utc::now())
            .await?;

        let item = self.repository.inventory.lock(&mut *tx, record.item_id).await?;
        let restored = item.status.after_maintenance();
        if let Some(status) = restored {
            self.repository
                .inventory
                .set_status(&mut *tx, item.id, status)
                .await?;
        }
        tx.commit().await?;

        match restored {
            Some(status) => {
                tracing::info!(record_id = %record.id, item_id = %item.id, "Maintenance resolved");
                self.redis
                    .invalidate(Invalidation::new("inventory_item", item.id, Some(status.to_string())))
                    .await;
            }
            None => tracing::info!(
                record_id = %record.id,
                item_id = %item.id,
                status = %item.status,
                "Maintenance resolved, item status kept"
            ),
        }
        Ok(record)
    }
}
