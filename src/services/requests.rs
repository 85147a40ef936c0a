//! Request workflow service.
//!
//! Orchestrates the lifecycle engine: resolves routing for new requests,
//! runs every status change through the central transition table, and
//! persists the outcome (request row, and record possession when the
//! transition carries an effect).

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    lifecycle::{self, Action, Actor},
    models::{
        request::{CreateRequest, Request, RequestDetails, RequestQuery, UpdateRequestStatus},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct RequestsService {
    repository: Repository,
}

impl RequestsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create a borrow request; routing decides pool vs. peer target.
    pub async fn create_borrow(&self, user_id: i32, payload: &CreateRequest) -> AppResult<Request> {
        let record = self.repository.records.get_by_id(payload.record_id).await?;
        let (request_type, target) = lifecycle::resolve_borrow(&record, user_id)?;

        if self.repository.requests.has_pending(user_id, record.id).await? {
            return Err(AppError::Conflict(
                "You already have a pending request for this record".to_string(),
            ));
        }

        let request = self
            .repository
            .requests
            .create(user_id, record.id, request_type, target, payload.message.as_deref())
            .await?;

        tracing::info!(
            request_id = request.id,
            record_id = record.id,
            user_id,
            request_type = %request.request_type,
            "borrow request created"
        );
        Ok(request)
    }

    /// Create a return request; only the current holder may file one.
    pub async fn create_return(&self, user_id: i32, payload: &CreateRequest) -> AppResult<Request> {
        let record = self.repository.records.get_by_id(payload.record_id).await?;
        let (request_type, target) = lifecycle::resolve_return(&record, user_id)?;

        if self.repository.requests.has_pending(user_id, record.id).await? {
            return Err(AppError::Conflict(
                "You already have a pending request for this record".to_string(),
            ));
        }

        let request = self
            .repository
            .requests
            .create(user_id, record.id, request_type, target, payload.message.as_deref())
            .await?;

        tracing::info!(request_id = request.id, record_id = record.id, user_id, "return request created");
        Ok(request)
    }

    /// Management sets a new status on a pool borrow request.
    pub async fn update_status(
        &self,
        id: i32,
        acting_user: i32,
        payload: &UpdateRequestStatus,
    ) -> AppResult<Request> {
        self.execute(
            id,
            Actor::Management { user_id: acting_user },
            Action::SetStatus(payload.status),
            payload.admin_response.as_deref(),
        )
        .await
    }

    /// Management confirms a pending return; the record becomes available.
    pub async fn confirm_return(&self, id: i32, acting_user: i32) -> AppResult<Request> {
        self.execute(id, Actor::Management { user_id: acting_user }, Action::ConfirmReturn, None)
            .await
    }

    /// Current holder approves a peer borrow request; possession transfers
    /// immediately.
    pub async fn peer_approve(
        &self,
        id: i32,
        acting_user: i32,
        response: Option<&str>,
    ) -> AppResult<Request> {
        self.execute(id, Actor::Peer { user_id: acting_user }, Action::Approve, response)
            .await
    }

    /// Current holder rejects a peer borrow request.
    pub async fn peer_reject(
        &self,
        id: i32,
        acting_user: i32,
        response: Option<&str>,
    ) -> AppResult<Request> {
        self.execute(id, Actor::Peer { user_id: acting_user }, Action::Reject, response)
            .await
    }

    /// Borrower acknowledges physical receipt after a pool handover.
    pub async fn confirm_receipt(&self, id: i32, acting_user: i32) -> AppResult<Request> {
        self.execute(id, Actor::Requester { user_id: acting_user }, Action::ConfirmReceipt, None)
            .await
    }

    /// Validate a transition and persist its outcome.
    ///
    /// The record effect is applied first under the optimistic version
    /// check; a losing racer fails there with Conflict before the request
    /// row is touched, so no partial mutation survives.
    async fn execute(
        &self,
        id: i32,
        actor: Actor,
        action: Action,
        response: Option<&str>,
    ) -> AppResult<Request> {
        let request = self.repository.requests.get_by_id(id).await?;
        let outcome = lifecycle::validate(&request, actor, action)?;

        if let Some(effect) = outcome.record_effect {
            let record = self.repository.records.get_by_id(request.record_id).await?;
            self.repository
                .records
                .apply_effect(record.id, record.version, effect)
                .await?;
        }

        let acting_user = match actor {
            Actor::Management { user_id } | Actor::Peer { user_id } | Actor::Requester { user_id } => user_id,
        };
        let response = outcome.response_override.or(response);

        let updated = self
            .repository
            .requests
            .apply_transition(id, outcome.next_status, response, acting_user, Utc::now())
            .await?;

        tracing::info!(
            request_id = id,
            from = %request.status,
            to = %updated.status,
            acting_user,
            "request transition applied"
        );
        Ok(updated)
    }

    /// Management-pool listing with optional status/type filters
    pub async fn list_pool(&self, query: &RequestQuery) -> AppResult<Vec<RequestDetails>> {
        self.repository.requests.list_pool(query).await
    }

    /// A user's own requests
    pub async fn list_mine(&self, user_id: i32) -> AppResult<Vec<RequestDetails>> {
        self.repository.requests.list_by_user(user_id).await
    }

    /// Peer requests addressed to a user as holder
    pub async fn list_incoming(&self, user_id: i32) -> AppResult<Vec<RequestDetails>> {
        self.repository.requests.list_incoming(user_id).await
    }
}
