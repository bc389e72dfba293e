//! Data models for LabClear

pub mod borrow_request;
pub mod clearance;
pub mod enums;
pub mod inventory;
pub mod lab;
pub mod maintenance;
pub mod procurement;
pub mod profile;

// Re-export commonly used types
pub use borrow_request::{BorrowRequest, BorrowRequestDetails, RequestStatus};
pub use enums::{InventoryStatus, MaintenanceStatus, ProcurementStatus};
pub use inventory::InventoryItem;
pub use lab::Lab;
pub use profile::{Profile, ProfileClaims, Role};
