//! Repository layer for database operations
//!
//! Methods taking `&mut PgConnection` are meant to run inside a transaction
//! opened by the calling service; the others use the pool directly.

pub mod borrow_requests;
pub mod clearance;
pub mod inventory;
pub mod labs;
pub mod maintenance;
pub mod procurement;
pub mod profiles;

use sqlx::{Pool, Postgres, Transaction};

use crate::error::AppResult;

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub labs: labs::LabsRepository,
    pub profiles: profiles::ProfilesRepository,
    pub inventory: inventory::InventoryRepository,
    pub borrow_requests: borrow_requests::BorrowRequestsRepository,
    pub maintenance: maintenance::MaintenanceRepository,
    pub procurement: procurement::ProcurementRepository,
    pub clearance: clearance::ClearanceRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            labs: labs::LabsRepository::new(pool.clone()),
            profiles: profiles::ProfilesRepository::new(pool.clone()),
            inventory: inventory::InventoryRepository::new(pool.clone()),
            borrow_requests: borrow_requests::BorrowRequestsRepository::new(pool.clone()),
            maintenance: maintenance::MaintenanceRepository::new(pool.clone()),
            procurement: procurement::ProcurementRepository::new(pool.clone()),
            clearance: clearance::ClearanceRepository::new(pool.clone()),
            pool,
        }
    }

    /// Start a transaction on the shared pool
    pub async fn begin(&self) -> AppResult<Transaction<'static, Postgres>> {
        Ok(self.pool.begin().await?)
    }

    /// Round-trip to the database (readiness probe)
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
