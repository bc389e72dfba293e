//! Procurement request model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::enums::ProcurementStatus;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ProcurementRequest {
    pub id: Uuid,
    pub lab_id: Uuid,
    pub requested_by: Uuid,
    pub item_name: String,
    pub quantity: i32,
    #[schema(value_type = String, example = "1250.00")]
    pub estimated_cost: Decimal,
    pub justification: String,
    pub status: ProcurementStatus,
    pub decided_by: Option<Uuid>,
    pub decided_at: Option<DateTime<Utc>>,
    pub decision_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProcurementQuery {
    pub lab_id: Option<Uuid>,
    pub status: Option<ProcurementStatus>,
}

/// File a procurement request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProcurementRequest {
    pub lab_id: Uuid,
    #[validate(length(min = 1, message = "Item name is required"))]
    pub item_name: String,
    #[validate(range(min = 1, message = "Quantity must be positive"))]
    pub quantity: i32,
    #[schema(value_type = String, example = "1250.00")]
    pub estimated_cost: Decimal,
    #[validate(length(min = 1, message = "Justification is required"))]
    pub justification: String,
}

/// Move a procurement request along its lifecycle
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProcurementStatus {
    pub status: ProcurementStatus,
    pub notes: Option<String>,
}
