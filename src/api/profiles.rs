//! Profile management endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        clearance::Fine,
        profile::{CreateProfile, Profile, ProfileQuery, UpdateProfile},
    },
};

use super::AuthenticatedUser;

/// List profiles
#[utoipa::path(
    get,
    path = "/profiles",
    tag = "profiles",
    security(("bearer_auth" = [])),
    params(ProfileQuery),
    responses(
        (status = 200, description = "Profiles", body = Vec<Profile>),
        (status = 403, description = "Administrator privileges required")
    )
)]
pub async fn list_profiles(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<ProfileQuery>,
) -> AppResult<Json<Vec<Profile>>> {
    claims.require_admin()?;

    let profiles = state.services.profiles.list(&query).await?;
    Ok(Json(profiles))
}

/// Get a profile by ID
#[utoipa::path(
    get,
    path = "/profiles/{id}",
    tag = "profiles",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Profile ID")
    ),
    responses(
        (status = 200, description = "Profile", body = Profile),
        (status = 403, description = "Not allowed to read this profile"),
        (status = 404, description = "Profile not found")
    )
)]
pub async fn get_profile(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Profile>> {
    claims.require_self_or_staff(id)?;

    let profile = state.services.profiles.get_by_id(id).await?;
    Ok(Json(profile))
}

/// Create a profile
#[utoipa::path(
    post,
    path = "/profiles",
    tag = "profiles",
    security(("bearer_auth" = [])),
    request_body = CreateProfile,
    responses(
        (status = 201, description = "Profile created", body = Profile),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn create_profile(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateProfile>,
) -> AppResult<(StatusCode, Json<Profile>)> {
    claims.require_admin()?;

    let profile = state.services.profiles.create(data).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// Update a profile (role, lab, activation, reliability score, password)
#[utoipa::path(
    put,
    path = "/profiles/{id}",
    tag = "profiles",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Profile ID")
    ),
    request_body = UpdateProfile,
    responses(
        (status = 200, description = "Profile updated", body = Profile),
        (status = 404, description = "Profile not found")
    )
)]
pub async fn update_profile(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateProfile>,
) -> AppResult<Json<Profile>> {
    claims.require_admin()?;

    let profile = state.services.profiles.update(id, data).await?;
    tracing::info!(profile_id = %id, updated_by = %claims.profile_id, "Profile updated");
    Ok(Json(profile))
}

/// Fines of a student
#[utoipa::path(
    get,
    path = "/profiles/{id}/fines",
    tag = "clearance",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Student profile ID")
    ),
    responses(
        (status = 200, description = "Fines, newest first", body = Vec<Fine>),
        (status = 403, description = "Students can only read their own fines")
    )
)]
pub async fn list_profile_fines(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<Fine>>> {
    claims.require_self_or_staff(id)?;

    let fines = state.services.clearance.fines_of(id).await?;
    Ok(Json(fines))
}
