//! Maintenance endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::maintenance::{MaintenanceQuery, MaintenanceRecord, OpenMaintenance, ResolveMaintenance},
};

use super::AuthenticatedUser;

/// List maintenance records
#[utoipa::path(
    get,
    path = "/maintenance",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(MaintenanceQuery),
    responses(
        (status = 200, description = "Maintenance records", body = Vec<MaintenanceRecord>),
        (status = 403, description = "Staff only")
    )
)]
pub async fn list_maintenance(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<MaintenanceQuery>,
) -> AppResult<Json<Vec<MaintenanceRecord>>> {
    claims.require_staff()?;

    let records = state.services.maintenance.list(&query).await?;
    Ok(Json(records))
}

/// Open a maintenance record for an available item
#[utoipa::path(
    post,
    path = "/maintenance",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    request_body = OpenMaintenance,
    responses(
        (status = 201, description = "Record opened, item under maintenance", body = MaintenanceRecord),
        (status = 404, description = "Item not found"),
        (status = 409, description = "Item is not available")
    )
)]
pub async fn open_maintenance(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<OpenMaintenance>,
) -> AppResult<(StatusCode, Json<MaintenanceRecord>)> {
    claims.require_lab_staff_or_admin()?;

    let record = state.services.maintenance.open(claims.profile_id, data).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Resolve a maintenance record
#[utoipa::path(
    post,
    path = "/maintenance/{id}/resolve",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Maintenance record ID")
    ),
    request_body = ResolveMaintenance,
    responses(
        (status = 200, description = "Record resolved, item available", body = MaintenanceRecord),
        (status = 404, description = "Record not found"),
        (status = 409, description = "Record already resolved")
    )
)]
pub async fn resolve_maintenance(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(data): Json<ResolveMaintenance>,
) -> AppResult<Json<MaintenanceRecord>> {
    claims.require_lab_staff_or_admin()?;

    let record = state.services.maintenance.resolve(id, claims.profile_id, data).await?;
    Ok(Json(record))
}
