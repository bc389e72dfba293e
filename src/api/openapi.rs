//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{
    auth, borrow_requests, clearance, health, inventory, labs, maintenance, procurement, profiles,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "LabClear API",
        version = "1.0.0",
        description = "Laboratory equipment borrowing, approval and clearance REST API"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::me,
        // Profiles
        profiles::list_profiles,
        profiles::get_profile,
        profiles::create_profile,
        profiles::update_profile,
        profiles::list_profile_fines,
        // Labs
        labs::list_labs,
        labs::get_lab,
        labs::create_lab,
        labs::update_lab,
        labs::delete_lab,
        // Inventory
        inventory::list_inventory,
        inventory::get_inventory_item,
        inventory::create_inventory_item,
        inventory::update_inventory_item,
        inventory::delete_inventory_item,
        // Borrow requests
        borrow_requests::list_borrow_requests,
        borrow_requests::list_actionable,
        borrow_requests::get_borrow_request,
        borrow_requests::submit_borrow_request,
        borrow_requests::approve_borrow_request,
        borrow_requests::reject_borrow_request,
        borrow_requests::hand_over_borrow_request,
        borrow_requests::return_borrow_request,
        // Maintenance
        maintenance::list_maintenance,
        maintenance::open_maintenance,
        maintenance::resolve_maintenance,
        // Procurement
        procurement::list_procurement,
        procurement::create_procurement,
        procurement::update_procurement_status,
        // Clearance
        clearance::get_eligibility,
        clearance::issue_certificate,
        clearance::verify_certificate,
        clearance::issue_fine,
        clearance::pay_fine,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            // Profiles
            crate::models::profile::Role,
            crate::models::profile::Profile,
            crate::models::profile::CreateProfile,
            crate::models::profile::UpdateProfile,
            // Labs
            crate::models::lab::Lab,
            crate::models::lab::CreateLab,
            crate::models::lab::UpdateLab,
            // Inventory
            crate::models::enums::InventoryStatus,
            crate::models::inventory::InventoryItem,
            crate::models::inventory::CreateInventoryItem,
            crate::models::inventory::UpdateInventoryItem,
            // Borrow requests
            crate::models::borrow_request::RequestStatus,
            crate::models::borrow_request::BorrowRequest,
            crate::models::borrow_request::BorrowRequestItem,
            crate::models::borrow_request::BorrowRequestDetails,
            crate::models::borrow_request::CreateBorrowRequest,
            crate::models::borrow_request::ApproveBorrowRequest,
            crate::models::borrow_request::RejectBorrowRequest,
            // Maintenance
            crate::models::enums::MaintenanceStatus,
            crate::models::maintenance::MaintenanceRecord,
            crate::models::maintenance::OpenMaintenance,
            crate::models::maintenance::ResolveMaintenance,
            // Procurement
            crate::models::enums::ProcurementStatus,
            crate::models::procurement::ProcurementRequest,
            crate::models::procurement::CreateProcurementRequest,
            crate::models::procurement::UpdateProcurementStatus,
            // Clearance
            crate::models::clearance::Fine,
            crate::models::clearance::CreateFine,
            crate::models::clearance::OutstandingRequest,
            crate::models::clearance::LabOutstanding,
            crate::models::clearance::EligibilityReport,
            crate::models::clearance::ClearanceCertificate,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "profiles", description = "Profile management"),
        (name = "labs", description = "Laboratories"),
        (name = "inventory", description = "Equipment inventory"),
        (name = "borrow-requests", description = "Borrow requests and approval workflow"),
        (name = "maintenance", description = "Equipment maintenance"),
        (name = "procurement", description = "Procurement requests"),
        (name = "clearance", description = "Clearance, certificates and fines")
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` scheme referenced by secured paths
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
