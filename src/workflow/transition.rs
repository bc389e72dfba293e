//! Transitions of the borrow request state machine

use chrono::{DateTime, Utc};

use super::{
    approval::{record_slot, ApprovalSet, ApprovalSlot},
    stage::{may_act, Stage},
    Actor, WorkflowError,
};
use crate::models::{
    borrow_request::{BorrowRequest, RequestStatus},
    enums::InventoryStatus,
};

/// Outcome of one applied transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from_status: RequestStatus,
    pub to_status: RequestStatus,
    pub from_stage: i16,
    pub to_stage: i16,
    /// Status every linked inventory item takes as a side effect
    pub inventory: Option<InventoryStatus>,
}

impl Transition {
    fn between(before: (RequestStatus, i16), request: &BorrowRequest) -> Self {
        Self {
            from_status: before.0,
            to_status: request.status,
            from_stage: before.1,
            to_stage: request.current_stage,
            inventory: None,
        }
    }

    pub fn advanced(&self) -> bool {
        self.to_stage > self.from_stage
    }
}

fn status_after(stage: Stage, satisfied: bool) -> RequestStatus {
    match (stage, satisfied) {
        (Stage::LabStaff, true) => RequestStatus::Stage1Approved,
        (Stage::LabStaff, false) => RequestStatus::Stage1Pending,
        (Stage::Oversight, true) => RequestStatus::Stage2Approved,
        (Stage::Oversight, false) => RequestStatus::Stage2Pending,
        (Stage::Department, true) | (Stage::Complete, _) => RequestStatus::Approved,
        (Stage::Department, false) => RequestStatus::Stage3Pending,
    }
}

fn ensure_router(request: &BorrowRequest, actor: Actor) -> Result<(), WorkflowError> {
    if may_act(actor.role, request.current_stage) {
        Ok(())
    } else {
        Err(WorkflowError::Unauthorized {
            role: actor.role,
            stage: request.current_stage,
        })
    }
}

fn ensure_in_chain(request: &BorrowRequest) -> Result<(), WorkflowError> {
    if request.status.in_approval_chain() {
        Ok(())
    } else {
        Err(WorkflowError::InvalidState {
            expected: "pending approval",
            actual: request.status,
        })
    }
}

/// Record `actor`'s approval at the request's current stage.
///
/// The stage advances only once its approval set is satisfied; at stage 2 a
/// single oversight signature leaves the request `stage2_pending`.
pub fn approve(
    request: &mut BorrowRequest,
    actor: Actor,
    notes: Option<String>,
    now: DateTime<Utc>,
) -> Result<Transition, WorkflowError> {
    ensure_router(request, actor)?;
    ensure_in_chain(request)?;

    let stage = Stage::try_from(request.current_stage)?;
    if stage == Stage::Complete {
        return Err(WorkflowError::InvalidStage(request.current_stage));
    }

    let slot = ApprovalSlot::for_role(actor.role, stage).ok_or(WorkflowError::Unauthorized {
        role: actor.role,
        stage: request.current_stage,
    })?;
    if ApprovalSet::of(request, stage).has(slot) {
        return Err(WorkflowError::SlotAlreadyFilled(slot));
    }

    let before = (request.status, request.current_stage);
    let notes = notes.filter(|n| !n.trim().is_empty());
    record_slot(request, slot, actor.id, now, notes);

    let satisfied = ApprovalSet::of(request, stage).is_satisfied();
    request.status = status_after(stage, satisfied);
    if satisfied {
        request.current_stage = stage.next().number();
    }
    request.updated_at = now;

    Ok(Transition::between(before, request))
}

/// Reject the request at its current stage. Terminal.
pub fn reject(
    request: &mut BorrowRequest,
    actor: Actor,
    reason: &str,
    now: DateTime<Utc>,
) -> Result<Transition, WorkflowError> {
    ensure_router(request, actor)?;
    ensure_in_chain(request)?;
    if reason.trim().is_empty() {
        return Err(WorkflowError::MissingReason);
    }

    let before = (request.status, request.current_stage);
    request.status = RequestStatus::Rejected;
    request.rejected_by = Some(actor.id);
    request.rejected_at = Some(now);
    request.rejection_stage = Some(request.current_stage);
    request.rejection_reason = Some(reason.to_string());
    request.updated_at = now;

    Ok(Transition::between(before, request))
}

fn ensure_lab_staff(actor: Actor) -> Result<(), WorkflowError> {
    if actor.role.is_lab_staff() {
        Ok(())
    } else {
        Err(WorkflowError::NotLabStaff(actor.role))
    }
}

/// Give approved equipment to the student; linked items become `borrowed`
pub fn hand_over(
    request: &mut BorrowRequest,
    actor: Actor,
    now: DateTime<Utc>,
) -> Result<Transition, WorkflowError> {
    ensure_lab_staff(actor)?;
    if request.status != RequestStatus::Approved {
        return Err(WorkflowError::InvalidState {
            expected: "approved",
            actual: request.status,
        });
    }

    let before = (request.status, request.current_stage);
    request.status = RequestStatus::HandedOver;
    request.handed_over_by = Some(actor.id);
    request.handed_over_at = Some(now);
    request.updated_at = now;

    Ok(Transition {
        inventory: Some(InventoryStatus::Borrowed),
        ..Transition::between(before, request)
    })
}

/// Take equipment back; linked items become `available`
pub fn mark_returned(
    request: &mut BorrowRequest,
    actor: Actor,
    now: DateTime<Utc>,
) -> Result<Transition, WorkflowError> {
    ensure_lab_staff(actor)?;
    if request.status != RequestStatus::HandedOver {
        return Err(WorkflowError::InvalidState {
            expected: "handed_over",
            actual: request.status,
        });
    }

    let before = (request.status, request.current_stage);
    request.status = RequestStatus::Returned;
    request.returned_by = Some(actor.id);
    request.returned_at = Some(now);
    request.updated_at = now;

    Ok(Transition {
        inventory: Some(InventoryStatus::Available),
        ..Transition::between(before, request)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::Role;
    use uuid::Uuid;

    fn request() -> BorrowRequest {
        let now = Utc::now();
        BorrowRequest::new_submission(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "Oscilloscope practice".to_string(),
            now + chrono::Duration::days(1),
            now + chrono::Duration::days(2),
            now,
        )
    }

    fn actor(role: Role) -> Actor {
        Actor::new(Uuid::new_v4(), role)
    }

    #[test]
    fn stage_one_advances_immediately() {
        let mut req = request();
        let t = approve(&mut req, actor(Role::LabEngineer), Some("fine".into()), Utc::now()).unwrap();
        assert_eq!(t.from_status, RequestStatus::Submitted);
        assert_eq!(t.to_status, RequestStatus::Stage1Approved);
        assert_eq!((t.from_stage, t.to_stage), (1, 2));
        assert!(t.advanced());
        assert_eq!(req.stage1_notes.as_deref(), Some("fine"));
    }

    #[test]
    fn stage_two_waits_for_both_signatures_in_either_order() {
        let mut req = request();
        approve(&mut req, actor(Role::LabAssistant), None, Utc::now()).unwrap();

        let t = approve(&mut req, actor(Role::AsstOicCenLabs), None, Utc::now()).unwrap();
        assert_eq!(t.to_status, RequestStatus::Stage2Pending);
        assert_eq!(req.current_stage, 2);
        assert!(req.stage2_asst_approver_id.is_some());
        assert!(req.stage2_oic_approver_id.is_none());

        let t = approve(&mut req, actor(Role::OicCenLabs), None, Utc::now()).unwrap();
        assert_eq!(t.to_status, RequestStatus::Stage2Approved);
        assert_eq!(req.current_stage, 3);
    }

    #[test]
    fn same_oversight_role_cannot_sign_twice() {
        let mut req = request();
        approve(&mut req, actor(Role::LabAssistant), None, Utc::now()).unwrap();
        approve(&mut req, actor(Role::OicCenLabs), None, Utc::now()).unwrap();

        let err = approve(&mut req, actor(Role::OicCenLabs), None, Utc::now()).unwrap_err();
        assert_eq!(err, WorkflowError::SlotAlreadyFilled(ApprovalSlot::Oic));
        assert_eq!(req.status, RequestStatus::Stage2Pending);
    }

    #[test]
    fn wrong_role_is_unauthorized_for_approve_and_reject() {
        let mut req = request();
        for role in [Role::Student, Role::OicCenLabs, Role::Hod, Role::Admin] {
            let err = approve(&mut req, actor(role), None, Utc::now()).unwrap_err();
            assert!(matches!(err, WorkflowError::Unauthorized { stage: 1, .. }));
            let err = reject(&mut req, actor(role), "no", Utc::now()).unwrap_err();
            assert!(matches!(err, WorkflowError::Unauthorized { stage: 1, .. }));
        }
        assert_eq!(req.status, RequestStatus::Submitted);
    }

    #[test]
    fn rejection_requires_reason_and_is_terminal() {
        let mut req = request();
        let err = reject(&mut req, actor(Role::LabEngineer), "   ", Utc::now()).unwrap_err();
        assert_eq!(err, WorkflowError::MissingReason);

        let t = reject(&mut req, actor(Role::LabEngineer), "Lab closed that week", Utc::now()).unwrap();
        assert_eq!(t.to_status, RequestStatus::Rejected);
        assert_eq!(req.rejection_stage, Some(1));
        assert_eq!(req.current_stage, 1);

        let err = approve(&mut req, actor(Role::LabEngineer), None, Utc::now()).unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidState { actual: RequestStatus::Rejected, .. }));
    }

    #[test]
    fn completed_chain_admits_no_approver() {
        let mut req = request();
        approve(&mut req, actor(Role::LabEngineer), None, Utc::now()).unwrap();
        approve(&mut req, actor(Role::OicCenLabs), None, Utc::now()).unwrap();
        approve(&mut req, actor(Role::AsstOicCenLabs), None, Utc::now()).unwrap();
        let t = approve(&mut req, actor(Role::ProHod), None, Utc::now()).unwrap();
        assert_eq!(t.to_status, RequestStatus::Approved);
        assert_eq!(req.current_stage, 4);

        let err = approve(&mut req, actor(Role::Hod), None, Utc::now()).unwrap_err();
        assert!(matches!(err, WorkflowError::Unauthorized { stage: 4, .. }));
    }

    #[test]
    fn corrupt_stage_is_never_actionable() {
        let mut req = request();
        req.current_stage = 7;
        let err = approve(&mut req, actor(Role::LabEngineer), None, Utc::now()).unwrap_err();
        assert!(matches!(err, WorkflowError::Unauthorized { stage: 7, .. }));
    }

    #[test]
    fn handover_and_return_gate_on_status_and_role() {
        let mut req = request();
        let err = hand_over(&mut req, actor(Role::LabEngineer), Utc::now()).unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidState { expected: "approved", .. }));

        req.status = RequestStatus::Approved;
        req.current_stage = 4;
        let err = hand_over(&mut req, actor(Role::Hod), Utc::now()).unwrap_err();
        assert_eq!(err, WorkflowError::NotLabStaff(Role::Hod));

        let t = hand_over(&mut req, actor(Role::LabEngineer), Utc::now()).unwrap();
        assert_eq!(t.inventory, Some(InventoryStatus::Borrowed));
        assert!(hand_over(&mut req, actor(Role::LabEngineer), Utc::now()).is_err());

        let t = mark_returned(&mut req, actor(Role::LabAssistant), Utc::now()).unwrap();
        assert_eq!(t.to_status, RequestStatus::Returned);
        assert_eq!(t.inventory, Some(InventoryStatus::Available));
        assert!(mark_returned(&mut req, actor(Role::LabAssistant), Utc::now()).is_err());
    }
}
