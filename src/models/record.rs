//! Record model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::enums::RecordStatus;

/// Record model from database.
///
/// Invariant: `status == Borrowed` iff `current_holder` is set iff
/// `borrowed_date` is set. The `version` column backs the optimistic
/// check applied on every possession mutation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Record {
    pub id: i32,
    pub title: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub status: RecordStatus,
    pub current_holder: Option<i32>,
    pub borrowed_date: Option<DateTime<Utc>>,
    pub return_date: Option<DateTime<Utc>>,
    /// Importer-defined key-value bag, opaque to the lending engine
    #[schema(value_type = Object)]
    pub metadata: serde_json::Value,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record {
    pub fn is_held_by(&self, user_id: i32) -> bool {
        self.current_holder == Some(user_id)
    }
}

/// Abbreviated record for embedding in request listings
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RecordSummary {
    pub id: i32,
    pub title: String,
    pub category: Option<String>,
    pub status: RecordStatus,
}

/// Create record payload
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRecord {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(max = 100))]
    pub category: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub metadata: Option<serde_json::Value>,
}

/// Update record payload (partial)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateRecord {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[validate(length(max = 100))]
    pub category: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = Object)]
    pub metadata: Option<serde_json::Value>,
}

/// One row produced by the external bulk importer.
///
/// Imported records always start available with no holder.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ImportRecordRow {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    pub category: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub metadata: Option<serde_json::Value>,
}

/// Query parameters for listing records
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct RecordQuery {
    pub status: Option<RecordStatus>,
    pub category: Option<String>,
    pub search: Option<String>,
}
