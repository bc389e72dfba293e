//! Borrow request endpoints: submission, reads and the approval workflow

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::borrow_request::{
        ApproveBorrowRequest, BorrowRequest, BorrowRequestDetails, BorrowRequestQuery,
        CreateBorrowRequest, RejectBorrowRequest,
    },
};

use super::AuthenticatedUser;

/// List borrow requests (students only see their own)
#[utoipa::path(
    get,
    path = "/borrow-requests",
    tag = "borrow-requests",
    security(("bearer_auth" = [])),
    params(BorrowRequestQuery),
    responses(
        (status = 200, description = "Borrow requests, newest first", body = Vec<BorrowRequest>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_borrow_requests(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<BorrowRequestQuery>,
) -> AppResult<Json<Vec<BorrowRequest>>> {
    let requests = state.services.borrow_requests.list(&claims, query).await?;
    Ok(Json(requests))
}

/// Requests waiting on the caller's approval
#[utoipa::path(
    get,
    path = "/borrow-requests/actionable",
    tag = "borrow-requests",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Requests at the caller's stage, oldest first", body = Vec<BorrowRequest>)
    )
)]
pub async fn list_actionable(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<BorrowRequest>>> {
    let requests = state.services.borrow_requests.actionable(&claims).await?;
    Ok(Json(requests))
}

/// Get a borrow request with its items
#[utoipa::path(
    get,
    path = "/borrow-requests/{id}",
    tag = "borrow-requests",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Borrow request ID")
    ),
    responses(
        (status = 200, description = "Borrow request details", body = BorrowRequestDetails),
        (status = 403, description = "Request belongs to another student"),
        (status = 404, description = "Borrow request not found")
    )
)]
pub async fn get_borrow_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<BorrowRequestDetails>> {
    let details = state.services.borrow_requests.get(id, &claims).await?;
    Ok(Json(details))
}

/// Submit a borrow request
#[utoipa::path(
    post,
    path = "/borrow-requests",
    tag = "borrow-requests",
    security(("bearer_auth" = [])),
    request_body = CreateBorrowRequest,
    responses(
        (status = 201, description = "Request submitted at stage 1", body = BorrowRequestDetails),
        (status = 400, description = "Invalid purpose, time window or items"),
        (status = 403, description = "Only students submit requests"),
        (status = 404, description = "Lab or item not found"),
        (status = 409, description = "An item is not available")
    )
)]
pub async fn submit_borrow_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateBorrowRequest>,
) -> AppResult<(StatusCode, Json<BorrowRequestDetails>)> {
    let details = state.services.borrow_requests.submit(&claims, data).await?;
    Ok((StatusCode::CREATED, Json(details)))
}

/// Approve a request at its current stage
#[utoipa::path(
    post,
    path = "/borrow-requests/{id}/approve",
    tag = "borrow-requests",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Borrow request ID")
    ),
    request_body = ApproveBorrowRequest,
    responses(
        (status = 200, description = "Approval recorded", body = BorrowRequest),
        (status = 403, description = "Role cannot act at the current stage"),
        (status = 404, description = "Borrow request not found"),
        (status = 409, description = "Request is no longer pending approval"),
        (status = 422, description = "Request stage is outside the approval chain")
    )
)]
pub async fn approve_borrow_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    body: Option<Json<ApproveBorrowRequest>>,
) -> AppResult<Json<BorrowRequest>> {
    let notes = body.and_then(|Json(b)| b.notes);
    let request = state.services.borrow_requests.approve(id, &claims, notes).await?;
    Ok(Json(request))
}

/// Reject a request at its current stage
#[utoipa::path(
    post,
    path = "/borrow-requests/{id}/reject",
    tag = "borrow-requests",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Borrow request ID")
    ),
    request_body = RejectBorrowRequest,
    responses(
        (status = 200, description = "Request rejected", body = BorrowRequest),
        (status = 400, description = "Missing rejection reason"),
        (status = 403, description = "Role cannot act at the current stage"),
        (status = 404, description = "Borrow request not found"),
        (status = 409, description = "Request is no longer pending approval")
    )
)]
pub async fn reject_borrow_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(body): Json<RejectBorrowRequest>,
) -> AppResult<Json<BorrowRequest>> {
    let request = state.services.borrow_requests.reject(id, &claims, body.reason).await?;
    Ok(Json(request))
}

/// Hand approved equipment over to the student
#[utoipa::path(
    post,
    path = "/borrow-requests/{id}/handover",
    tag = "borrow-requests",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Borrow request ID")
    ),
    responses(
        (status = 200, description = "Equipment handed over", body = BorrowRequest),
        (status = 403, description = "Lab staff only"),
        (status = 409, description = "Request is not approved")
    )
)]
pub async fn hand_over_borrow_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<BorrowRequest>> {
    let request = state.services.borrow_requests.hand_over(id, &claims).await?;
    Ok(Json(request))
}

/// Take equipment back
#[utoipa::path(
    post,
    path = "/borrow-requests/{id}/return",
    tag = "borrow-requests",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Borrow request ID")
    ),
    responses(
        (status = 200, description = "Equipment returned", body = BorrowRequest),
        (status = 403, description = "Lab staff only"),
        (status = 409, description = "Request is not handed over")
    )
)]
pub async fn return_borrow_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<BorrowRequest>> {
    let request = state.services.borrow_requests.mark_returned(id, &claims).await?;
    Ok(Json(request))
}
