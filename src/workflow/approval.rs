//! Approval sets: which approver slots a stage needs and which are filled

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::stage::Stage;
use crate::models::{borrow_request::BorrowRequest, profile::Role};

/// One approver column group on a borrow request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalSlot {
    LabStaff,
    Oic,
    AsstOic,
    Department,
}

impl ApprovalSlot {
    /// Slot a role signs at `stage`; the two oversight roles are not interchangeable
    pub fn for_role(role: Role, stage: Stage) -> Option<ApprovalSlot> {
        match (stage, role) {
            (Stage::LabStaff, Role::LabEngineer | Role::LabAssistant) => Some(ApprovalSlot::LabStaff),
            (Stage::Oversight, Role::OicCenLabs) => Some(ApprovalSlot::Oic),
            (Stage::Oversight, Role::AsstOicCenLabs) => Some(ApprovalSlot::AsstOic),
            (Stage::Department, Role::Hod | Role::ProHod) => Some(ApprovalSlot::Department),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalSlot::LabStaff => "lab_staff",
            ApprovalSlot::Oic => "oic",
            ApprovalSlot::AsstOic => "asst_oic",
            ApprovalSlot::Department => "department",
        }
    }
}

impl std::fmt::Display for ApprovalSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Required and received approvals for one stage of one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalSet {
    required: &'static [ApprovalSlot],
    received: Vec<ApprovalSlot>,
}

impl ApprovalSet {
    pub fn required_for(stage: Stage) -> &'static [ApprovalSlot] {
        match stage {
            Stage::LabStaff => &[ApprovalSlot::LabStaff],
            Stage::Oversight => &[ApprovalSlot::Oic, ApprovalSlot::AsstOic],
            Stage::Department => &[ApprovalSlot::Department],
            Stage::Complete => &[],
        }
    }

    /// Read the set for `stage` off the request's approver columns
    pub fn of(request: &BorrowRequest, stage: Stage) -> Self {
        let required = Self::required_for(stage);
        let received = required
            .iter()
            .copied()
            .filter(|slot| slot_approver(request, *slot).is_some())
            .collect();
        Self { required, received }
    }

    pub fn has(&self, slot: ApprovalSlot) -> bool {
        self.received.contains(&slot)
    }

    pub fn is_satisfied(&self) -> bool {
        self.required.iter().all(|slot| self.has(*slot))
    }

    pub fn missing(&self) -> Vec<ApprovalSlot> {
        self.required
            .iter()
            .copied()
            .filter(|slot| !self.has(*slot))
            .collect()
    }
}

/// Approver recorded in a slot, if any
pub fn slot_approver(request: &BorrowRequest, slot: ApprovalSlot) -> Option<Uuid> {
    match slot {
        ApprovalSlot::LabStaff => request.stage1_approver_id,
        ApprovalSlot::Oic => request.stage2_oic_approver_id,
        ApprovalSlot::AsstOic => request.stage2_asst_approver_id,
        ApprovalSlot::Department => request.stage3_approver_id,
    }
}

/// Fill a slot's approver, timestamp and notes columns
pub(crate) fn record_slot(
    request: &mut BorrowRequest,
    slot: ApprovalSlot,
    approver: Uuid,
    at: DateTime<Utc>,
    notes: Option<String>,
) {
    match slot {
        ApprovalSlot::LabStaff => {
            request.stage1_approver_id = Some(approver);
            request.stage1_approved_at = Some(at);
            request.stage1_notes = notes;
        }
        ApprovalSlot::Oic => {
            request.stage2_oic_approver_id = Some(approver);
            request.stage2_oic_approved_at = Some(at);
            request.stage2_oic_notes = notes;
        }
        ApprovalSlot::AsstOic => {
            request.stage2_asst_approver_id = Some(approver);
            request.stage2_asst_approved_at = Some(at);
            request.stage2_asst_notes = notes;
        }
        ApprovalSlot::Department => {
            request.stage3_approver_id = Some(approver);
            request.stage3_approved_at = Some(at);
            request.stage3_notes = notes;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> BorrowRequest {
        let now = Utc::now();
        BorrowRequest::new_submission(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "Circuits lab".to_string(),
            now,
            now + chrono::Duration::hours(2),
            now,
        )
    }

    #[test]
    fn oversight_needs_both_slots() {
        let mut req = request();
        assert!(!ApprovalSet::of(&req, Stage::Oversight).is_satisfied());

        record_slot(&mut req, ApprovalSlot::Oic, Uuid::new_v4(), Utc::now(), None);
        let set = ApprovalSet::of(&req, Stage::Oversight);
        assert!(set.has(ApprovalSlot::Oic));
        assert!(!set.is_satisfied());
        assert_eq!(set.missing(), vec![ApprovalSlot::AsstOic]);

        record_slot(&mut req, ApprovalSlot::AsstOic, Uuid::new_v4(), Utc::now(), Some("ok".into()));
        assert!(ApprovalSet::of(&req, Stage::Oversight).is_satisfied());
        assert_eq!(req.stage2_asst_notes.as_deref(), Some("ok"));
    }

    #[test]
    fn single_slot_stages() {
        let mut req = request();
        assert_eq!(ApprovalSet::of(&req, Stage::LabStaff).missing(), vec![ApprovalSlot::LabStaff]);
        record_slot(&mut req, ApprovalSlot::LabStaff, Uuid::new_v4(), Utc::now(), None);
        assert!(ApprovalSet::of(&req, Stage::LabStaff).is_satisfied());
        assert!(ApprovalSet::of(&req, Stage::Complete).is_satisfied());
    }

    #[test]
    fn slots_are_role_specific() {
        assert_eq!(ApprovalSlot::for_role(Role::OicCenLabs, Stage::Oversight), Some(ApprovalSlot::Oic));
        assert_eq!(
            ApprovalSlot::for_role(Role::AsstOicCenLabs, Stage::Oversight),
            Some(ApprovalSlot::AsstOic)
        );
        assert_eq!(ApprovalSlot::for_role(Role::OicCenLabs, Stage::LabStaff), None);
        assert_eq!(ApprovalSlot::for_role(Role::ProHod, Stage::Department), Some(ApprovalSlot::Department));
        assert_eq!(ApprovalSlot::for_role(Role::Admin, Stage::Department), None);
    }
}
