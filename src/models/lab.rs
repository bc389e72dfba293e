//! Laboratory model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Laboratory of the network
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Lab {
    pub id: Uuid,
    /// Short unique code, e.g. `EEE-2`
    pub code: String,
    pub name: String,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create lab request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateLab {
    #[validate(length(min = 1, max = 32, message = "Code must be 1-32 characters"))]
    pub code: String,
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    pub location: Option<String>,
}

/// Update lab request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateLab {
    #[validate(length(min = 1, max = 32, message = "Code must be 1-32 characters"))]
    pub code: Option<String>,
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    pub location: Option<String>,
}
