//! Request (lending transaction) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::enums::{RequestStatus, RequestTarget, RequestType};
use super::record::RecordSummary;
use super::user::UserSummary;

/// Request model from database.
///
/// Invariant: `request_type == BorrowFromUser` iff `target_user` is set.
/// Requests are never deleted; they form the audit trail of every
/// possession change.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Request {
    pub id: i32,
    pub user_id: i32,
    pub record_id: i32,
    pub status: RequestStatus,
    pub request_type: RequestType,
    pub target_user: Option<i32>,
    pub message: Option<String>,
    pub admin_response: Option<String>,
    pub processed_by: Option<i32>,
    pub processed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Request {
    /// Routing target as a tagged variant rather than a nullable column
    pub fn target(&self) -> RequestTarget {
        RequestTarget::from_db(self.target_user)
    }
}

/// Request with user and record summaries for display
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RequestDetails {
    pub id: i32,
    pub status: RequestStatus,
    pub request_type: RequestType,
    pub target_user: Option<i32>,
    pub message: Option<String>,
    pub admin_response: Option<String>,
    pub processed_by: Option<i32>,
    pub processed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub user: UserSummary,
    pub record: RecordSummary,
}

/// Create borrow/return request payload
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRequest {
    pub record_id: i32,
    #[validate(length(max = 1000))]
    pub message: Option<String>,
}

/// Management status update payload
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateRequestStatus {
    pub status: RequestStatus,
    #[validate(length(max = 1000))]
    pub admin_response: Option<String>,
}

/// Peer approve/reject payload (optional note to the requester)
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct PeerDecision {
    #[validate(length(max = 1000))]
    pub response: Option<String>,
}

/// Query parameters for listing management-pool requests
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct RequestQuery {
    pub status: Option<RequestStatus>,
    pub request_type: Option<RequestType>,
}
