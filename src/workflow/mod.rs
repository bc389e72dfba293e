//! Borrow request approval workflow
//!
//! Pure state machine over [`BorrowRequest`](crate::models::borrow_request::BorrowRequest)
//! values. Nothing in here touches the database: services load a request
//! under a row lock, apply one transition and persist the result in the same
//! transaction.

pub mod approval;
pub mod stage;
pub mod transition;

use thiserror::Error;
use uuid::Uuid;

use crate::models::{borrow_request::RequestStatus, profile::Role};

pub use approval::{ApprovalSet, ApprovalSlot};
pub use stage::{may_act, stage_for_role, Stage};
pub use transition::{approve, hand_over, mark_returned, reject, Transition};

/// The profile performing a workflow action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub role: Role,
}

impl Actor {
    pub fn new(id: Uuid, role: Role) -> Self {
        Self { id, role }
    }
}

/// Errors raised by workflow transitions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("Role {role} cannot act on a request at stage {stage}")]
    Unauthorized { role: Role, stage: i16 },

    #[error("Request is {actual}, expected {expected}")]
    InvalidState {
        expected: &'static str,
        actual: RequestStatus,
    },

    #[error("Stage {0} is outside the approval chain")]
    InvalidStage(i16),

    #[error("The {0} approval for this stage has already been recorded")]
    SlotAlreadyFilled(ApprovalSlot),

    #[error("Role {0} is not lab staff")]
    NotLabStaff(Role),

    #[error("A rejection reason is required")]
    MissingReason,
}
