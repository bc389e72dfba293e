//! End-to-end borrow request scenarios over the pure workflow API.
//!
//! Inventory is simulated in memory by applying each transition's
//! inventory effect to every linked item, as the service does in SQL.

use std::collections::HashMap;

use chrono::{Duration, Utc};
use uuid::Uuid;

use labclear_server::{
    models::{
        borrow_request::{BorrowRequest, RequestStatus},
        enums::InventoryStatus,
        profile::Role,
    },
    workflow::{self, may_act, Actor, Transition, WorkflowError},
};

struct Desk {
    request: BorrowRequest,
    items: HashMap<Uuid, InventoryStatus>,
}

impl Desk {
    fn new(item_count: usize) -> Self {
        let now = Utc::now();
        let request = BorrowRequest::new_submission(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "Control systems lab work".to_string(),
            now + Duration::days(1),
            now + Duration::days(3),
            now,
        );
        let items = (0..item_count)
            .map(|_| (Uuid::new_v4(), InventoryStatus::Available))
            .collect();
        Self { request, items }
    }

    fn apply(&mut self, transition: Transition) {
        if let Some(status) = transition.inventory {
            for item in self.items.values_mut() {
                *item = status;
            }
        }
    }

    fn approve(&mut self, role: Role) -> Result<Transition, WorkflowError> {
        let t = workflow::approve(&mut self.request, actor(role), None, Utc::now())?;
        self.apply(t);
        Ok(t)
    }

    fn reject(&mut self, role: Role, reason: &str) -> Result<Transition, WorkflowError> {
        let t = workflow::reject(&mut self.request, actor(role), reason, Utc::now())?;
        self.apply(t);
        Ok(t)
    }

    fn hand_over(&mut self, role: Role) -> Result<Transition, WorkflowError> {
        let t = workflow::hand_over(&mut self.request, actor(role), Utc::now())?;
        self.apply(t);
        Ok(t)
    }

    fn mark_returned(&mut self, role: Role) -> Result<Transition, WorkflowError> {
        let t = workflow::mark_returned(&mut self.request, actor(role), Utc::now())?;
        self.apply(t);
        Ok(t)
    }

    fn all_items(&self, status: InventoryStatus) -> bool {
        self.items.values().all(|s| *s == status)
    }
}

fn actor(role: Role) -> Actor {
    Actor::new(Uuid::new_v4(), role)
}

#[test]
fn happy_path_moves_items_out_and_back() {
    let mut desk = Desk::new(2);
    assert_eq!(desk.request.status, RequestStatus::Submitted);
    assert!(desk.all_items(InventoryStatus::Available));

    let mut stages = vec![desk.request.current_stage];

    desk.approve(Role::LabAssistant).unwrap();
    assert_eq!(desk.request.status, RequestStatus::Stage1Approved);
    stages.push(desk.request.current_stage);

    desk.approve(Role::OicCenLabs).unwrap();
    assert_eq!(desk.request.status, RequestStatus::Stage2Pending);
    stages.push(desk.request.current_stage);

    desk.approve(Role::AsstOicCenLabs).unwrap();
    assert_eq!(desk.request.status, RequestStatus::Stage2Approved);
    stages.push(desk.request.current_stage);

    desk.approve(Role::Hod).unwrap();
    assert_eq!(desk.request.status, RequestStatus::Approved);
    stages.push(desk.request.current_stage);

    assert_eq!(stages, vec![1, 2, 2, 3, 4]);
    assert!(stages.windows(2).all(|w| w[0] <= w[1]));

    desk.hand_over(Role::LabAssistant).unwrap();
    assert_eq!(desk.request.status, RequestStatus::HandedOver);
    assert!(desk.all_items(InventoryStatus::Borrowed));

    desk.mark_returned(Role::LabEngineer).unwrap();
    assert_eq!(desk.request.status, RequestStatus::Returned);
    assert!(desk.all_items(InventoryStatus::Available));
    assert_eq!(desk.request.current_stage, 4);
}

#[test]
fn oversight_pair_may_sign_in_either_order() {
    let mut desk = Desk::new(1);
    desk.approve(Role::LabEngineer).unwrap();

    let first = desk.approve(Role::AsstOicCenLabs).unwrap();
    assert!(!first.advanced());
    assert_eq!(desk.request.status, RequestStatus::Stage2Pending);
    assert!(desk.request.stage2_oic_approver_id.is_none());

    let second = desk.approve(Role::OicCenLabs).unwrap();
    assert!(second.advanced());
    assert_eq!(desk.request.status, RequestStatus::Stage2Approved);
    assert!(desk.request.stage2_oic_approver_id.is_some());
    assert!(desk.request.stage2_asst_approver_id.is_some());
}

#[test]
fn rejection_by_assistant_oic_is_terminal() {
    let mut desk = Desk::new(1);
    desk.approve(Role::LabAssistant).unwrap();

    let reason = "  Equipment needed for calibration  ";
    desk.reject(Role::AsstOicCenLabs, reason).unwrap();

    assert_eq!(desk.request.status, RequestStatus::Rejected);
    assert_eq!(desk.request.rejection_stage, Some(2));
    assert_eq!(desk.request.current_stage, 2);
    assert_eq!(desk.request.rejection_reason.as_deref(), Some(reason));

    assert!(desk.approve(Role::Hod).is_err());
    assert!(matches!(
        desk.approve(Role::OicCenLabs),
        Err(WorkflowError::InvalidState { .. })
    ));
    assert!(matches!(
        desk.hand_over(Role::LabAssistant),
        Err(WorkflowError::InvalidState { .. })
    ));
    assert!(desk.all_items(InventoryStatus::Available));
}

#[test]
fn roles_outside_the_router_are_always_refused() {
    for stage_roles in [
        (1, Role::LabEngineer),
        (2, Role::OicCenLabs),
        (3, Role::ProHod),
    ] {
        let (target, advancing) = stage_roles;
        let mut desk = Desk::new(1);
        // Walk the request up to `target`
        while desk.request.current_stage < target {
            let next = match desk.request.current_stage {
                1 => Role::LabAssistant,
                _ if desk.request.stage2_oic_approver_id.is_none() => Role::OicCenLabs,
                _ => Role::AsstOicCenLabs,
            };
            desk.approve(next).unwrap();
        }

        for role in Role::ALL {
            if may_act(role, target) {
                continue;
            }
            let before = desk.request.clone();
            assert!(
                matches!(desk.approve(role), Err(WorkflowError::Unauthorized { .. })),
                "{} approved at stage {}",
                role,
                target
            );
            assert!(
                matches!(desk.reject(role, "no"), Err(WorkflowError::Unauthorized { .. })),
                "{} rejected at stage {}",
                role,
                target
            );
            assert_eq!(desk.request.status, before.status);
            assert_eq!(desk.request.current_stage, before.current_stage);
        }

        assert!(may_act(advancing, target));
    }
}

#[test]
fn handover_and_return_require_their_predecessor_status() {
    let mut desk = Desk::new(3);

    assert!(matches!(
        desk.hand_over(Role::LabEngineer),
        Err(WorkflowError::InvalidState { .. })
    ));
    assert!(matches!(
        desk.mark_returned(Role::LabEngineer),
        Err(WorkflowError::InvalidState { .. })
    ));

    for role in [Role::LabAssistant, Role::OicCenLabs, Role::AsstOicCenLabs, Role::Hod] {
        desk.approve(role).unwrap();
    }

    assert!(matches!(
        desk.hand_over(Role::Hod),
        Err(WorkflowError::NotLabStaff(Role::Hod))
    ));

    desk.hand_over(Role::LabEngineer).unwrap();
    assert!(matches!(
        desk.hand_over(Role::LabEngineer),
        Err(WorkflowError::InvalidState { .. })
    ));
    assert!(desk.all_items(InventoryStatus::Borrowed));

    desk.mark_returned(Role::LabAssistant).unwrap();
    assert!(matches!(
        desk.mark_returned(Role::LabAssistant),
        Err(WorkflowError::InvalidState { .. })
    ));
    assert!(desk.all_items(InventoryStatus::Available));
}
