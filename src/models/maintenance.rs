//! Maintenance record model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::enums::MaintenanceStatus;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct MaintenanceRecord {
    pub id: Uuid,
    pub item_id: Uuid,
    pub reported_by: Uuid,
    pub description: String,
    pub status: MaintenanceStatus,
    pub resolution: Option<String>,
    pub opened_at: DateTime<Utc>,
    pub resolved_by: Option<Uuid>,
    pub resolved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MaintenanceQuery {
    pub item_id: Option<Uuid>,
    pub status: Option<MaintenanceStatus>,
}

/// Open a maintenance record for an item
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct OpenMaintenance {
    pub item_id: Uuid,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ResolveMaintenance {
    pub resolution: Option<String>,
}
