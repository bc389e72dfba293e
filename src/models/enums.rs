//! Shared status enums stored as VARCHAR columns

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ---------------------------------------------------------------------------
// InventoryStatus
// ---------------------------------------------------------------------------

/// Status of a single equipment unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "varchar", rename_all = "snake_case")]
pub enum InventoryStatus {
    Available,
    Borrowed,
    Maintenance,
    Lost,
    Retired,
}

impl InventoryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InventoryStatus::Available => "available",
            InventoryStatus::Borrowed => "borrowed",
            InventoryStatus::Maintenance => "maintenance",
            InventoryStatus::Lost => "lost",
            InventoryStatus::Retired => "retired",
        }
    }

    /// Status to restore when a maintenance record closes; items an admin
    /// moved on (lost, retired) while under repair keep their status
    pub fn after_maintenance(&self) -> Option<Self> {
        matches!(self, InventoryStatus::Maintenance).then_some(InventoryStatus::Available)
    }
}

impl std::fmt::Display for InventoryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// MaintenanceStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "varchar", rename_all = "snake_case")]
pub enum MaintenanceStatus {
    Open,
    Resolved,
}

impl MaintenanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaintenanceStatus::Open => "open",
            MaintenanceStatus::Resolved => "resolved",
        }
    }
}

// ---------------------------------------------------------------------------
// ProcurementStatus
// ---------------------------------------------------------------------------

/// Procurement request lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "varchar", rename_all = "snake_case")]
pub enum ProcurementStatus {
    Pending,
    Approved,
    Rejected,
    Ordered,
    Received,
}

impl ProcurementStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcurementStatus::Pending => "pending",
            ProcurementStatus::Approved => "approved",
            ProcurementStatus::Rejected => "rejected",
            ProcurementStatus::Ordered => "ordered",
            ProcurementStatus::Received => "received",
        }
    }

    /// Whether an administrator may move a request from `self` to `next`
    pub fn can_transition_to(&self, next: ProcurementStatus) -> bool {
        use ProcurementStatus::*;
        matches!(
            (self, next),
            (Pending, Approved) | (Pending, Rejected) | (Approved, Ordered) | (Ordered, Received)
        )
    }

    /// Decisions are the transitions out of `pending`
    pub fn is_decision(&self) -> bool {
        matches!(self, ProcurementStatus::Approved | ProcurementStatus::Rejected)
    }
}

impl std::fmt::Display for ProcurementStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ProcurementStatus::*;

    #[test]
    fn procurement_follows_its_graph() {
        assert!(Pending.can_transition_to(Approved));
        assert!(Pending.can_transition_to(Rejected));
        assert!(Approved.can_transition_to(Ordered));
        assert!(Ordered.can_transition_to(Received));

        assert!(!Pending.can_transition_to(Ordered));
        assert!(!Rejected.can_transition_to(Approved));
        assert!(!Received.can_transition_to(Pending));
        assert!(!Approved.can_transition_to(Approved));
    }

    #[test]
    fn only_items_still_in_maintenance_are_restored() {
        assert_eq!(InventoryStatus::Maintenance.after_maintenance(), Some(InventoryStatus::Available));
        assert_eq!(InventoryStatus::Lost.after_maintenance(), None);
        assert_eq!(InventoryStatus::Retired.after_maintenance(), None);
        assert_eq!(InventoryStatus::Available.after_maintenance(), None);
    }

    #[test]
    fn statuses_serialize_as_snake_case() {
        assert_eq!(serde_json::to_string(&InventoryStatus::Maintenance).unwrap(), "\"maintenance\"");
        assert_eq!(serde_json::to_string(&ProcurementStatus::Received).unwrap(), "\"received\"");
    }
}
