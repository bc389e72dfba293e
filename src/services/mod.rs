//! Business logic services

pub mod borrow_requests;
pub mod clearance;
pub mod inventory;
pub mod labs;
pub mod maintenance;
pub mod procurement;
pub mod profiles;
pub mod redis;

use crate::{config::AuthConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub profiles: profiles::ProfilesService,
    pub labs: labs::LabsService,
    pub inventory: inventory::InventoryService,
    pub borrow_requests: borrow_requests::BorrowRequestsService,
    pub maintenance: maintenance::MaintenanceService,
    pub procurement: procurement::ProcurementService,
    pub clearance: clearance::ClearanceService,
    pub redis: redis::RedisService,
    pub repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig, redis_service: redis::RedisService) -> Self {
        Self {
            profiles: profiles::ProfilesService::new(repository.clone(), auth_config),
            labs: labs::LabsService::new(repository.clone()),
            inventory: inventory::InventoryService::new(repository.clone(), redis_service.clone()),
            borrow_requests: borrow_requests::BorrowRequestsService::new(
                repository.clone(),
                redis_service.clone(),
            ),
            maintenance: maintenance::MaintenanceService::new(repository.clone(), redis_service.clone()),
            procurement: procurement::ProcurementService::new(repository.clone()),
            clearance: clearance::ClearanceService::new(repository.clone()),
            redis: redis_service,
            repository,
        }
    }
}
