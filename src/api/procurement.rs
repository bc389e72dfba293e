//! Procurement endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::procurement::{
        CreateProcurementRequest, ProcurementQuery, ProcurementRequest, UpdateProcurementStatus,
    },
};

use super::AuthenticatedUser;

/// List procurement requests
#[utoipa::path(
    get,
    path = "/procurement",
    tag = "procurement",
    security(("bearer_auth" = [])),
    params(ProcurementQuery),
    responses(
        (status = 200, description = "Procurement requests", body = Vec<ProcurementRequest>),
        (status = 403, description = "Staff only")
    )
)]
pub async fn list_procurement(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<ProcurementQuery>,
) -> AppResult<Json<Vec<ProcurementRequest>>> {
    claims.require_staff()?;

    let requests = state.services.procurement.list(&query).await?;
    Ok(Json(requests))
}

/// File a procurement request
#[utoipa::path(
    post,
    path = "/procurement",
    tag = "procurement",
    security(("bearer_auth" = [])),
    request_body = CreateProcurementRequest,
    responses(
        (status = 201, description = "Request filed as pending", body = ProcurementRequest),
        (status = 400, description = "Invalid quantity or cost"),
        (status = 404, description = "Lab not found")
    )
)]
pub async fn create_procurement(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateProcurementRequest>,
) -> AppResult<(StatusCode, Json<ProcurementRequest>)> {
    claims.require_lab_staff_or_admin()?;

    let request = state.services.procurement.create(claims.profile_id, data).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

/// Move a procurement request to its next status
#[utoipa::path(
    put,
    path = "/procurement/{id}/status",
    tag = "procurement",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Procurement request ID")
    ),
    request_body = UpdateProcurementStatus,
    responses(
        (status = 200, description = "Status changed", body = ProcurementRequest),
        (status = 404, description = "Request not found"),
        (status = 409, description = "Transition not allowed")
    )
)]
pub async fn update_procurement_status(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateProcurementStatus>,
) -> AppResult<Json<ProcurementRequest>> {
    claims.require_admin()?;

    let request = state
        .services
        .procurement
        .update_status(id, claims.profile_id, data)
        .await?;
    Ok(Json(request))
}
