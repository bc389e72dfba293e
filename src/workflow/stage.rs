//! Stage router: which roles may act at which approval stage

use serde::Serialize;

use super::WorkflowError;
use crate::models::profile::Role;

/// Approval checkpoints of a borrow request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Lab engineer or lab assistant
    LabStaff = 1,
    /// OIC and Assistant OIC of the central labs, both required
    Oversight = 2,
    /// Head of department or pro-HoD
    Department = 3,
    /// Approval chain finished
    Complete = 4,
}

impl Stage {
    pub fn number(self) -> i16 {
        self as i16
    }

    /// Roles allowed to approve or reject at this stage
    pub fn approvers(self) -> &'static [Role] {
        match self {
            Stage::LabStaff => &[Role::LabEngineer, Role::LabAssistant],
            Stage::Oversight => &[Role::OicCenLabs, Role::AsstOicCenLabs],
            Stage::Department => &[Role::Hod, Role::ProHod],
            Stage::Complete => &[],
        }
    }

    pub fn next(self) -> Stage {
        match self {
            Stage::LabStaff => Stage::Oversight,
            Stage::Oversight => Stage::Department,
            Stage::Department | Stage::Complete => Stage::Complete,
        }
    }
}

impl TryFrom<i16> for Stage {
    type Error = WorkflowError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Stage::LabStaff),
            2 => Ok(Stage::Oversight),
            3 => Ok(Stage::Department),
            4 => Ok(Stage::Complete),
            other => Err(WorkflowError::InvalidStage(other)),
        }
    }
}

/// Whether `role` may approve or reject a request sitting at `current_stage`.
///
/// Total over all inputs: unknown stages and the completed stage admit nobody.
pub fn may_act(role: Role, current_stage: i16) -> bool {
    Stage::try_from(current_stage)
        .map(|stage| stage.approvers().contains(&role))
        .unwrap_or(false)
}

/// The stage a role approves at, if any
pub fn stage_for_role(role: Role) -> Option<Stage> {
    [Stage::LabStaff, Stage::Oversight, Stage::Department]
        .into_iter()
        .find(|stage| stage.approvers().contains(&role))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn router_table() {
        assert!(may_act(Role::LabEngineer, 1));
        assert!(may_act(Role::LabAssistant, 1));
        assert!(may_act(Role::OicCenLabs, 2));
        assert!(may_act(Role::AsstOicCenLabs, 2));
        assert!(may_act(Role::Hod, 3));
        assert!(may_act(Role::ProHod, 3));

        assert!(!may_act(Role::Hod, 1));
        assert!(!may_act(Role::LabEngineer, 2));
        assert!(!may_act(Role::OicCenLabs, 3));
        assert!(!may_act(Role::Student, 1));
        assert!(!may_act(Role::Admin, 1));
        assert!(!may_act(Role::SuperAdmin, 3));
    }

    #[test]
    fn router_is_total() {
        for role in Role::ALL {
            for stage in [-1, 0, 4, 5, i16::MAX, i16::MIN] {
                assert!(!may_act(role, stage), "{role} must not act at stage {stage}");
            }
        }
    }

    #[test]
    fn every_role_has_at_most_one_stage() {
        assert_eq!(stage_for_role(Role::LabAssistant), Some(Stage::LabStaff));
        assert_eq!(stage_for_role(Role::AsstOicCenLabs), Some(Stage::Oversight));
        assert_eq!(stage_for_role(Role::ProHod), Some(Stage::Department));
        assert_eq!(stage_for_role(Role::Student), None);
        assert_eq!(stage_for_role(Role::Admin), None);
    }

    #[test]
    fn stage_numbers() {
        assert_eq!(Stage::try_from(2).unwrap(), Stage::Oversight);
        assert_eq!(Stage::Department.next(), Stage::Complete);
        assert_eq!(Stage::Complete.number(), 4);
        assert!(matches!(Stage::try_from(9), Err(WorkflowError::InvalidStage(9))));
    }
}
