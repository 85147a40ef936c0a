//! Record catalog endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::record::{CreateRecord, ImportRecordRow, Record, RecordQuery, UpdateRecord},
};

use super::AuthenticatedUser;

/// Bulk import request: the full row set produced by the external importer
#[derive(Deserialize, ToSchema)]
pub struct ImportRequest {
    pub records: Vec<ImportRecordRow>,
}

/// Bulk import response
#[derive(Serialize, ToSchema)]
pub struct ImportResponse {
    /// Number of records in the replaced collection
    pub imported: usize,
}

/// List records
#[utoipa::path(
    get,
    path = "/records",
    tag = "records",
    security(("bearer_auth" = [])),
    params(RecordQuery),
    responses(
        (status = 200, description = "Records", body = Vec<Record>)
    )
)]
pub async fn list_records(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<RecordQuery>,
) -> AppResult<Json<Vec<Record>>> {
    let records = state.services.records.list(&query).await?;
    Ok(Json(records))
}

/// Get a single record
#[utoipa::path(
    get,
    path = "/records/{id}",
    tag = "records",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Record ID")),
    responses(
        (status = 200, description = "Record", body = Record),
        (status = 404, description = "Record not found")
    )
)]
pub async fn get_record(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Record>> {
    let record = state.services.records.get(id).await?;
    Ok(Json(record))
}

/// Create a record
#[utoipa::path(
    post,
    path = "/records",
    tag = "records",
    security(("bearer_auth" = [])),
    request_body = CreateRecord,
    responses(
        (status = 201, description = "Record created", body = Record),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Management role required")
    )
)]
pub async fn create_record(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(payload): Json<CreateRecord>,
) -> AppResult<(StatusCode, Json<Record>)> {
    claims.require_management()?;

    let record = state.services.records.create(&payload).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Update a record's descriptive fields
#[utoipa::path(
    put,
    path = "/records/{id}",
    tag = "records",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Record ID")),
    request_body = UpdateRecord,
    responses(
        (status = 200, description = "Record updated", body = Record),
        (status = 404, description = "Record not found")
    )
)]
pub async fn update_record(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateRecord>,
) -> AppResult<Json<Record>> {
    claims.require_management()?;

    let record = state.services.records.update(id, &payload).await?;
    Ok(Json(record))
}

/// Delete a record (admin only)
#[utoipa::path(
    delete,
    path = "/records/{id}",
    tag = "records",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Record ID")),
    responses(
        (status = 204, description = "Record deleted"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Record not found")
    )
)]
pub async fn delete_record(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_admin()?;

    state.services.records.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Replace the record collection with importer output
#[utoipa::path(
    post,
    path = "/records/import",
    tag = "records",
    security(("bearer_auth" = [])),
    request_body = ImportRequest,
    responses(
        (status = 200, description = "Collection replaced", body = ImportResponse),
        (status = 400, description = "Invalid rows"),
        (status = 403, description = "Management role required")
    )
)]
pub async fn import_records(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(payload): Json<ImportRequest>,
) -> AppResult<Json<ImportResponse>> {
    claims.require_management()?;

    let imported = state.services.records.import_replace(&payload.records).await?;
    Ok(Json(ImportResponse { imported }))
}

/// Records currently held by the authenticated user
#[utoipa::path(
    get,
    path = "/records/held",
    tag = "records",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Held records", body = Vec<Record>)
    )
)]
pub async fn list_held_records(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Record>>> {
    let records = state.services.records.list_held_by(claims.user_id).await?;
    Ok(Json(records))
}
