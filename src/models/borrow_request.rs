//! Borrow request model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::enums::InventoryStatus;

/// Borrow request status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "varchar", rename_all = "snake_case")]
pub enum RequestStatus {
    Submitted,
    Stage1Pending,
    Stage1Approved,
    Stage2Pending,
    Stage2Approved,
    Stage3Pending,
    Approved,
    Rejected,
    HandedOver,
    Returned,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Submitted => "submitted",
            RequestStatus::Stage1Pending => "stage1_pending",
            RequestStatus::Stage1Approved => "stage1_approved",
            RequestStatus::Stage2Pending => "stage2_pending",
            RequestStatus::Stage2Approved => "stage2_approved",
            RequestStatus::Stage3Pending => "stage3_pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
            RequestStatus::HandedOver => "handed_over",
            RequestStatus::Returned => "returned",
        }
    }

    /// Still waiting on at least one approval stage
    pub fn in_approval_chain(&self) -> bool {
        matches!(
            self,
            RequestStatus::Submitted
                | RequestStatus::Stage1Pending
                | RequestStatus::Stage1Approved
                | RequestStatus::Stage2Pending
                | RequestStatus::Stage2Approved
                | RequestStatus::Stage3Pending
        )
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Borrow request row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BorrowRequest {
    pub id: Uuid,
    pub requester_id: Uuid,
    pub lab_id: Uuid,
    pub purpose: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: RequestStatus,
    /// 1-3 while in the approval chain, 4 once fully approved
    pub current_stage: i16,

    pub stage1_approver_id: Option<Uuid>,
    pub stage1_approved_at: Option<DateTime<Utc>>,
    pub stage1_notes: Option<String>,

    pub stage2_oic_approver_id: Option<Uuid>,
    pub stage2_oic_approved_at: Option<DateTime<Utc>>,
    pub stage2_oic_notes: Option<String>,

    pub stage2_asst_approver_id: Option<Uuid>,
    pub stage2_asst_approved_at: Option<DateTime<Utc>>,
    pub stage2_asst_notes: Option<String>,

    pub stage3_approver_id: Option<Uuid>,
    pub stage3_approved_at: Option<DateTime<Utc>>,
    pub stage3_notes: Option<String>,

    pub rejected_by: Option<Uuid>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub rejection_stage: Option<i16>,
    pub rejection_reason: Option<String>,

    pub handed_over_by: Option<Uuid>,
    pub handed_over_at: Option<DateTime<Utc>>,
    pub returned_by: Option<Uuid>,
    pub returned_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BorrowRequest {
    /// Fresh request as created by a student submission
    pub fn new_submission(
        requester_id: Uuid,
        lab_id: Uuid,
        purpose: String,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            requester_id,
            lab_id,
            purpose,
            start_time,
            end_time,
            status: RequestStatus::Submitted,
            current_stage: 1,
            stage1_approver_id: None,
            stage1_approved_at: None,
            stage1_notes: None,
            stage2_oic_approver_id: None,
            stage2_oic_approved_at: None,
            stage2_oic_notes: None,
            stage2_asst_approver_id: None,
            stage2_asst_approved_at: None,
            stage2_asst_notes: None,
            stage3_approver_id: None,
            stage3_approved_at: None,
            stage3_notes: None,
            rejected_by: None,
            rejected_at: None,
            rejection_stage: None,
            rejection_reason: None,
            handed_over_by: None,
            handed_over_at: None,
            returned_by: None,
            returned_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Item linked to a request, joined with its inventory row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BorrowRequestItem {
    pub request_id: Uuid,
    pub item_id: Uuid,
    pub name: String,
    pub serial_number: Option<String>,
    pub status: InventoryStatus,
}

/// Request with its items, as returned by the API
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BorrowRequestDetails {
    #[serde(flatten)]
    pub request: BorrowRequest,
    pub items: Vec<BorrowRequestItem>,
    /// Whether the caller may approve or reject at the current stage
    pub can_act: bool,
}

/// Borrow request query parameters
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BorrowRequestQuery {
    pub status: Option<RequestStatus>,
    pub lab_id: Option<Uuid>,
    pub requester_id: Option<Uuid>,
}

/// Student submission
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBorrowRequest {
    pub lab_id: Uuid,
    #[validate(length(min = 1, max = 2000, message = "Purpose is required"))]
    pub purpose: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[validate(length(min = 1, message = "At least one item is required"))]
    pub item_ids: Vec<Uuid>,
}

/// Approval body
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ApproveBorrowRequest {
    pub notes: Option<String>,
}

/// Rejection body
#[derive(Debug, Deserialize, ToSchema)]
pub struct RejectBorrowRequest {
    pub reason: String,
}
