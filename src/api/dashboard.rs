//! Role-scoped dashboard endpoint

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppResult, models::enums::Role};

use super::AuthenticatedUser;

/// Admin overview counts
#[derive(Serialize, ToSchema)]
pub struct AdminDashboard {
    pub total_users: i64,
    pub total_records: i64,
    pub available_records: i64,
    pub borrowed_records: i64,
    /// Pending requests in the management pool
    pub pending_requests: i64,
}

/// Record-manager worklist counts (management-pool requests only)
#[derive(Serialize, ToSchema)]
pub struct ManagerDashboard {
    pub pending_borrow: i64,
    pub pending_return: i64,
    pub awaiting_confirmation: i64,
    pub searching: i64,
    pub not_traceable: i64,
}

/// A user's own counts
#[derive(Serialize, ToSchema)]
pub struct UserDashboard {
    pub my_pending_requests: i64,
    pub records_held: i64,
    /// Pending peer requests addressed to this user as holder
    pub incoming_requests: i64,
}

/// Dashboard payload, shaped by the caller's role
#[derive(Serialize, ToSchema)]
#[serde(untagged)]
pub enum DashboardResponse {
    Admin(AdminDashboard),
    Manager(ManagerDashboard),
    User(UserDashboard),
}

/// Role-scoped dashboard
#[utoipa::path(
    get,
    path = "/dashboard",
    tag = "dashboard",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Counts for the caller's role", body = DashboardResponse)
    )
)]
pub async fn get_dashboard(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<DashboardResponse>> {
    let dashboard = match claims.role {
        Role::Admin => DashboardResponse::Admin(state.services.dashboard.admin().await?),
        Role::RecordManager => DashboardResponse::Manager(state.services.dashboard.manager().await?),
        Role::User => DashboardResponse::User(state.services.dashboard.user(claims.user_id).await?),
    };
    Ok(Json(dashboard))
}
