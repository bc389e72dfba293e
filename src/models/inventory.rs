//! Inventory item model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::enums::InventoryStatus;

/// Equipment unit
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct InventoryItem {
    pub id: Uuid,
    pub lab_id: Uuid,
    pub name: String,
    pub category: Option<String>,
    pub serial_number: Option<String>,
    pub status: InventoryStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Inventory query parameters
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct InventoryQuery {
    pub lab_id: Option<Uuid>,
    pub status: Option<InventoryStatus>,
    pub category: Option<String>,
}

/// Create inventory item request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateInventoryItem {
    pub lab_id: Uuid,
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    pub category: Option<String>,
    pub serial_number: Option<String>,
    pub notes: Option<String>,
}

/// Update inventory item request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateInventoryItem {
    pub lab_id: Option<Uuid>,
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    pub category: Option<String>,
    pub serial_number: Option<String>,
    pub status: Option<InventoryStatus>,
    pub notes: Option<String>,
}
