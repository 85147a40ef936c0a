//! Request workflow endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::request::{
        CreateRequest, PeerDecision, Request, RequestDetails, RequestQuery, UpdateRequestStatus,
    },
};

use super::AuthenticatedUser;

/// Create a borrow request.
///
/// Routing is decided server-side: an unheld record produces a
/// management-pool request, a held record a peer request targeting the
/// current holder.
#[utoipa::path(
    post,
    path = "/requests/borrow",
    tag = "requests",
    security(("bearer_auth" = [])),
    request_body = CreateRequest,
    responses(
        (status = 201, description = "Request created", body = Request),
        (status = 404, description = "Record not found"),
        (status = 409, description = "Already holder or duplicate pending request")
    )
)]
pub async fn create_borrow_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(payload): Json<CreateRequest>,
) -> AppResult<(StatusCode, Json<Request>)> {
    payload.validate()?;

    let request = state
        .services
        .requests
        .create_borrow(claims.user_id, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(request)))
}

/// Create a return request for a currently held record
#[utoipa::path(
    post,
    path = "/requests/return",
    tag = "requests",
    security(("bearer_auth" = [])),
    request_body = CreateRequest,
    responses(
        (status = 201, description = "Request created", body = Request),
        (status = 404, description = "Record not found"),
        (status = 409, description = "Caller does not hold the record")
    )
)]
pub async fn create_return_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(payload): Json<CreateRequest>,
) -> AppResult<(StatusCode, Json<Request>)> {
    payload.validate()?;

    let request = state
        .services
        .requests
        .create_return(claims.user_id, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(request)))
}

/// List management-pool requests, filterable by status and type
#[utoipa::path(
    get,
    path = "/requests",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(RequestQuery),
    responses(
        (status = 200, description = "Management-pool requests", body = Vec<RequestDetails>),
        (status = 403, description = "Management role required")
    )
)]
pub async fn list_requests(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<RequestQuery>,
) -> AppResult<Json<Vec<RequestDetails>>> {
    claims.require_management()?;

    let requests = state.services.requests.list_pool(&query).await?;
    Ok(Json(requests))
}

/// List the authenticated user's own requests
#[utoipa::path(
    get,
    path = "/requests/mine",
    tag = "requests",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own requests", body = Vec<RequestDetails>)
    )
)]
pub async fn list_my_requests(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<RequestDetails>>> {
    let requests = state.services.requests.list_mine(claims.user_id).await?;
    Ok(Json(requests))
}

/// List peer requests addressed to the authenticated user as holder
#[utoipa::path(
    get,
    path = "/requests/incoming",
    tag = "requests",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Incoming peer requests", body = Vec<RequestDetails>)
    )
)]
pub async fn list_incoming_requests(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<RequestDetails>>> {
    let requests = state.services.requests.list_incoming(claims.user_id).await?;
    Ok(Json(requests))
}

/// Management sets a new status on a pool borrow request.
///
/// Setting handed_over is stored as awaiting_confirmation: the record only
/// becomes borrowed once the requester confirms receipt.
#[utoipa::path(
    put,
    path = "/requests/{id}",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Request ID")),
    request_body = UpdateRequestStatus,
    responses(
        (status = 200, description = "Request updated", body = Request),
        (status = 403, description = "Management role required"),
        (status = 404, description = "Request not found"),
        (status = 409, description = "Illegal transition")
    )
)]
pub async fn update_request_status(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateRequestStatus>,
) -> AppResult<Json<Request>> {
    claims.require_management()?;
    payload.validate()?;

    let request = state
        .services
        .requests
        .update_status(id, claims.user_id, &payload)
        .await?;
    Ok(Json(request))
}

/// Management confirms a pending return; the record becomes available
#[utoipa::path(
    put,
    path = "/requests/{id}/confirm-return",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Return confirmed", body = Request),
        (status = 403, description = "Management role required"),
        (status = 409, description = "Not a pending return request")
    )
)]
pub async fn confirm_return(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Request>> {
    claims.require_management()?;

    let request = state
        .services
        .requests
        .confirm_return(id, claims.user_id)
        .await?;
    Ok(Json(request))
}

/// Holder approves a peer borrow request; possession transfers immediately
#[utoipa::path(
    put,
    path = "/requests/{id}/approve",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Request ID")),
    request_body = PeerDecision,
    responses(
        (status = 200, description = "Request approved", body = Request),
        (status = 403, description = "Caller is not the targeted holder"),
        (status = 409, description = "Request is not pending")
    )
)]
pub async fn approve_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    payload: Option<Json<PeerDecision>>,
) -> AppResult<Json<Request>> {
    let decision = payload.map(|Json(d)| d).unwrap_or_default();
    decision.validate()?;

    let request = state
        .services
        .requests
        .peer_approve(id, claims.user_id, decision.response.as_deref())
        .await?;
    Ok(Json(request))
}

/// Holder rejects a peer borrow request
#[utoipa::path(
    put,
    path = "/requests/{id}/reject",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Request ID")),
    request_body = PeerDecision,
    responses(
        (status = 200, description = "Request rejected", body = Request),
        (status = 403, description = "Caller is not the targeted holder"),
        (status = 409, description = "Request is not pending")
    )
)]
pub async fn reject_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    payload: Option<Json<PeerDecision>>,
) -> AppResult<Json<Request>> {
    let decision = payload.map(|Json(d)| d).unwrap_or_default();
    decision.validate()?;

    let request = state
        .services
        .requests
        .peer_reject(id, claims.user_id, decision.response.as_deref())
        .await?;
    Ok(Json(request))
}

/// Borrower confirms physical receipt after a management handover
#[utoipa::path(
    put,
    path = "/requests/{id}/confirm-receipt",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Receipt confirmed", body = Request),
        (status = 403, description = "Caller is not the requester"),
        (status = 409, description = "Request is not awaiting confirmation")
    )
)]
pub async fn confirm_receipt(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Request>> {
    let request = state
        .services
        .requests
        .confirm_receipt(id, claims.user_id)
        .await?;
    Ok(Json(request))
}
