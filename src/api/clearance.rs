//! Clearance, certificate and fine endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::clearance::{ClearanceCertificate, CreateFine, EligibilityReport, Fine},
};

use super::AuthenticatedUser;

/// Clearance eligibility of a student
#[utoipa::path(
    get,
    path = "/clearance/{student_id}",
    tag = "clearance",
    security(("bearer_auth" = [])),
    params(
        ("student_id" = Uuid, Path, description = "Student profile ID")
    ),
    responses(
        (status = 200, description = "Outstanding equipment per lab and unpaid fines", body = EligibilityReport),
        (status = 403, description = "Students can only read their own report"),
        (status = 404, description = "Student not found")
    )
)]
pub async fn get_eligibility(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(student_id): Path<Uuid>,
) -> AppResult<Json<EligibilityReport>> {
    claims.require_self_or_staff(student_id)?;

    let report = state.services.clearance.eligibility(student_id).await?;
    Ok(Json(report))
}

/// Issue a clearance certificate
#[utoipa::path(
    post,
    path = "/clearance/{student_id}/certificate",
    tag = "clearance",
    security(("bearer_auth" = [])),
    params(
        ("student_id" = Uuid, Path, description = "Student profile ID")
    ),
    responses(
        (status = 201, description = "Certificate issued", body = ClearanceCertificate),
        (status = 403, description = "Administrators and department heads only"),
        (status = 409, description = "Student is not eligible")
    )
)]
pub async fn issue_certificate(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(student_id): Path<Uuid>,
) -> AppResult<(StatusCode, Json<ClearanceCertificate>)> {
    let certificate = state
        .services
        .clearance
        .issue_certificate(student_id, &claims)
        .await?;
    Ok((StatusCode::CREATED, Json(certificate)))
}

/// Verify a certificate by its printed code
#[utoipa::path(
    get,
    path = "/certificates/{code}",
    tag = "clearance",
    params(
        ("code" = String, Path, description = "Verification code")
    ),
    responses(
        (status = 200, description = "Certificate is genuine", body = ClearanceCertificate),
        (status = 404, description = "Unknown code")
    )
)]
pub async fn verify_certificate(
    State(state): State<crate::AppState>,
    Path(code): Path<String>,
) -> AppResult<Json<ClearanceCertificate>> {
    let certificate = state.services.clearance.verify_certificate(&code).await?;
    Ok(Json(certificate))
}

/// Issue a fine to a student
#[utoipa::path(
    post,
    path = "/fines",
    tag = "clearance",
    security(("bearer_auth" = [])),
    request_body = CreateFine,
    responses(
        (status = 201, description = "Fine issued", body = Fine),
        (status = 400, description = "Invalid amount or target"),
        (status = 403, description = "Administrator privileges required")
    )
)]
pub async fn issue_fine(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateFine>,
) -> AppResult<(StatusCode, Json<Fine>)> {
    claims.require_admin()?;

    let fine = state.services.clearance.issue_fine(claims.profile_id, data).await?;
    Ok((StatusCode::CREATED, Json(fine)))
}

/// Mark a fine paid
#[utoipa::path(
    post,
    path = "/fines/{id}/pay",
    tag = "clearance",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Fine ID")
    ),
    responses(
        (status = 200, description = "Fine paid", body = Fine),
        (status = 404, description = "Fine not found"),
        (status = 409, description = "Fine already paid")
    )
)]
pub async fn pay_fine(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Fine>> {
    claims.require_admin()?;

    let fine = state.services.clearance.pay_fine(id).await?;
    Ok(Json(fine))
}
