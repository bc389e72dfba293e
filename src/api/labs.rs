//! Lab endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::lab::{CreateLab, Lab, UpdateLab},
};

use super::AuthenticatedUser;

/// List labs
#[utoipa::path(
    get,
    path = "/labs",
    tag = "labs",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Labs ordered by name", body = Vec<Lab>)
    )
)]
pub async fn list_labs(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Lab>>> {
    let labs = state.services.labs.list().await?;
    Ok(Json(labs))
}

/// Get a lab
#[utoipa::path(
    get,
    path = "/labs/{id}",
    tag = "labs",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Lab ID")
    ),
    responses(
        (status = 200, description = "Lab", body = Lab),
        (status = 404, description = "Lab not found")
    )
)]
pub async fn get_lab(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Lab>> {
    let lab = state.services.labs.get(id).await?;
    Ok(Json(lab))
}

/// Create a lab
#[utoipa::path(
    post,
    path = "/labs",
    tag = "labs",
    security(("bearer_auth" = [])),
    request_body = CreateLab,
    responses(
        (status = 201, description = "Lab created", body = Lab),
        (status = 409, description = "Lab code already exists")
    )
)]
pub async fn create_lab(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateLab>,
) -> AppResult<(StatusCode, Json<Lab>)> {
    claims.require_admin()?;

    let lab = state.services.labs.create(data).await?;
    Ok((StatusCode::CREATED, Json(lab)))
}

/// Update a lab
#[utoipa::path(
    put,
    path = "/labs/{id}",
    tag = "labs",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Lab ID")
    ),
    request_body = UpdateLab,
    responses(
        (status = 200, description = "Lab updated", body = Lab),
        (status = 404, description = "Lab not found"),
        (status = 409, description = "Lab code already exists")
    )
)]
pub async fn update_lab(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateLab>,
) -> AppResult<Json<Lab>> {
    claims.require_admin()?;

    let lab = state.services.labs.update(id, data).await?;
    Ok(Json(lab))
}

/// Delete a lab
#[utoipa::path(
    delete,
    path = "/labs/{id}",
    tag = "labs",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Lab ID")
    ),
    responses(
        (status = 204, description = "Lab deleted"),
        (status = 404, description = "Lab not found"),
        (status = 409, description = "Lab is still referenced")
    )
)]
pub async fn delete_lab(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    claims.require_admin()?;

    state.services.labs.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
