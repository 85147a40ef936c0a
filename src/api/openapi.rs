//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, dashboard, health, records, requests, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Custodia API",
        version = "1.0.0",
        description = "Record Custody and Lending Management REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
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
        // Records
        records::list_records,
        records::get_record,
        records::create_record,
        records::update_record,
        records::delete_record,
        records::import_records,
        records::list_held_records,
        // Requests
        requests::create_borrow_request,
        requests::create_return_request,
        requests::list_requests,
        requests::list_my_requests,
        requests::list_incoming_requests,
        requests::update_request_status,
        requests::confirm_return,
        requests::approve_request,
        requests::reject_request,
        requests::confirm_receipt,
        // Users
        users::list_users,
        users::get_user,
        users::create_user,
        users::update_user,
        users::delete_user,
        // Dashboard
        dashboard::get_dashboard,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            // Records
            crate::models::record::Record,
            crate::models::record::RecordSummary,
            crate::models::record::CreateRecord,
            crate::models::record::UpdateRecord,
            crate::models::record::ImportRecordRow,
            records::ImportRequest,
            records::ImportResponse,
            // Requests
            crate::models::request::Request,
            crate::models::request::RequestDetails,
            crate::models::request::CreateRequest,
            crate::models::request::UpdateRequestStatus,
            crate::models::request::PeerDecision,
            // Users
            crate::models::user::UserPublic,
            crate::models::user::UserSummary,
            crate::models::user::CreateUser,
            crate::models::user::UpdateUser,
            // Enums
            crate::models::enums::RecordStatus,
            crate::models::enums::RequestStatus,
            crate::models::enums::RequestType,
            crate::models::enums::Role,
            // Dashboard
            dashboard::AdminDashboard,
            dashboard::ManagerDashboard,
            dashboard::UserDashboard,
            dashboard::DashboardResponse,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "records", description = "Record catalog management"),
        (name = "requests", description = "Borrow/return request workflow"),
        (name = "users", description = "User management"),
        (name = "dashboard", description = "Role-scoped dashboards")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
