//! Shared domain enums for records, requests, and roles

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ---------------------------------------------------------------------------
// RecordStatus
// ---------------------------------------------------------------------------

/// Possession state of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "record_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    Available,
    Borrowed,
}

impl std::fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            RecordStatus::Available => "available",
            RecordStatus::Borrowed => "borrowed",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// RequestStatus
// ---------------------------------------------------------------------------

/// Status of a lending/return request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "request_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    HandedOver,
    Searching,
    NotTraceable,
    AwaitingConfirmation,
}

impl RequestStatus {
    /// Rejected requests can never transition again
    pub fn is_terminal_rejection(&self) -> bool {
        matches!(self, RequestStatus::Rejected)
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
            RequestStatus::HandedOver => "handed_over",
            RequestStatus::Searching => "searching",
            RequestStatus::NotTraceable => "not_traceable",
            RequestStatus::AwaitingConfirmation => "awaiting_confirmation",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// RequestType
// ---------------------------------------------------------------------------

/// Kind of transaction a request represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "request_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    Borrow,
    Return,
    BorrowFromUser,
}

impl std::fmt::Display for RequestType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            RequestType::Borrow => "borrow",
            RequestType::Return => "return",
            RequestType::BorrowFromUser => "borrow_from_user",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// RequestTarget
// ---------------------------------------------------------------------------

/// Where a request is routed for resolution.
///
/// Stored as a nullable `target_user` column: NULL means the management
/// pool (record managers and admins), a user id means that specific holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestTarget {
    ManagementPool,
    Holder(i32),
}

impl RequestTarget {
    pub fn from_db(target_user: Option<i32>) -> Self {
        match target_user {
            None => RequestTarget::ManagementPool,
            Some(id) => RequestTarget::Holder(id),
        }
    }

    pub fn as_db(&self) -> Option<i32> {
        match self {
            RequestTarget::ManagementPool => None,
            RequestTarget::Holder(id) => Some(*id),
        }
    }

    pub fn is_management_pool(&self) -> bool {
        matches!(self, RequestTarget::ManagementPool)
    }
}

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// User role determining which workflows a caller may drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    RecordManager,
    Admin,
}

impl Role {
    /// Record managers and admins form the management pool
    pub fn is_management(&self) -> bool {
        matches!(self, Role::RecordManager | Role::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Role::User => "user",
            Role::RecordManager => "record_manager",
            Role::Admin => "admin",
        };
        write!(f, "{}", label)
    }
}
