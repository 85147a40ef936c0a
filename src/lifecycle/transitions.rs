//! Central transition table for request statuses.
//!
//! Every status change in the system goes through [`validate`]: it takes
//! the request as currently stored, the acting party, and the attempted
//! action, and either returns the outcome to persist or the error to
//! surface. Keeping the table in one place guarantees the terminal-rejected
//! rule and the handed_over rewrite are enforced identically on every path.

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::{RequestStatus, RequestTarget, RequestType},
        request::Request,
    },
};

/// Fixed response stored when a handover is initiated; the borrower must
/// acknowledge physical receipt before the record is marked borrowed.
pub const HANDOVER_CONFIRMATION_PROMPT: &str =
    "Record handed over. Please confirm receipt to complete the borrow.";

/// Party attempting a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    /// A record manager or admin working the management pool
    Management { user_id: i32 },
    /// The current holder of a record, acting on a peer request
    Peer { user_id: i32 },
    /// The user who created the request
    Requester { user_id: i32 },
}

/// Attempted transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Management sets a new status on a pool borrow request
    SetStatus(RequestStatus),
    /// Management confirms a pending return
    ConfirmReturn,
    /// Peer holder approves a borrow-from-user request
    Approve,
    /// Peer holder rejects a borrow-from-user request
    Reject,
    /// Requester acknowledges physical receipt after a handover
    ConfirmReceipt,
}

/// Possession change to apply to the record alongside the status change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordEffect {
    /// Record becomes borrowed by `holder`; borrowed_date is set to now
    Borrow { holder: i32 },
    /// Record becomes available; holder and borrowed_date are cleared,
    /// return_date is set to now
    Release,
}

/// Validated result of a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionOutcome {
    pub next_status: RequestStatus,
    pub record_effect: Option<RecordEffect>,
    /// When set, overwrites admin_response regardless of caller input
    pub response_override: Option<&'static str>,
}

/// Statuses management may set on a pool borrow request
const MANAGEMENT_SETTABLE: &[RequestStatus] = &[
    RequestStatus::Rejected,
    RequestStatus::HandedOver,
    RequestStatus::Searching,
    RequestStatus::NotTraceable,
];

/// States from which management may still act on a pool borrow request.
/// Searching is the one intermediate state: a record being looked for can
/// still be handed over, declared untraceable, or rejected.
const MANAGEMENT_ACTIONABLE: &[RequestStatus] = &[RequestStatus::Pending, RequestStatus::Searching];

/// Validate a transition attempt against the current request row.
pub fn validate(request: &Request, actor: Actor, action: Action) -> AppResult<TransitionOutcome> {
    // Terminal guard applies to every path
    if request.status.is_terminal_rejection() {
        return Err(AppError::Conflict(
            "Request was already rejected and cannot be changed".to_string(),
        ));
    }

    match (actor, action) {
        (Actor::Management { .. }, Action::SetStatus(new_status)) => {
            management_set_status(request, new_status)
        }

        (Actor::Management { .. }, Action::ConfirmReturn) => {
            if request.request_type != RequestType::Return
                || request.status != RequestStatus::Pending
            {
                return Err(AppError::Conflict(
                    "Only a pending return request can be confirmed".to_string(),
                ));
            }
            Ok(TransitionOutcome {
                next_status: RequestStatus::Approved,
                record_effect: Some(RecordEffect::Release),
                response_override: None,
            })
        }

        (Actor::Peer { user_id }, Action::Approve) => {
            peer_guard(request, user_id)?;
            Ok(TransitionOutcome {
                next_status: RequestStatus::Approved,
                // Possession transfers immediately on peer approval; the
                // physical handover step only exists on the pool path.
                record_effect: Some(RecordEffect::Borrow {
                    holder: request.user_id,
                }),
                response_override: None,
            })
        }

        (Actor::Peer { user_id }, Action::Reject) => {
            peer_guard(request, user_id)?;
            Ok(TransitionOutcome {
                next_status: RequestStatus::Rejected,
                record_effect: None,
                response_override: None,
            })
        }

        (Actor::Requester { user_id }, Action::ConfirmReceipt) => {
            if request.status != RequestStatus::AwaitingConfirmation {
                return Err(AppError::Conflict(
                    "Request is not awaiting receipt confirmation".to_string(),
                ));
            }
            if request.user_id != user_id {
                return Err(AppError::Authorization(
                    "Only the requesting user can confirm receipt".to_string(),
                ));
            }
            Ok(TransitionOutcome {
                next_status: RequestStatus::Approved,
                record_effect: Some(RecordEffect::Borrow {
                    holder: request.user_id,
                }),
                response_override: None,
            })
        }

        _ => Err(AppError::BadRequest(
            "Action is not available to this actor".to_string(),
        )),
    }
}

fn management_set_status(
    request: &Request,
    new_status: RequestStatus,
) -> AppResult<TransitionOutcome> {
    if request.request_type == RequestType::Return {
        return Err(AppError::Conflict(
            "Return requests are resolved via confirm-return".to_string(),
        ));
    }
    if !request.target().is_management_pool() {
        return Err(AppError::Conflict(
            "Request is routed to its current holder, not the management pool".to_string(),
        ));
    }
    if !MANAGEMENT_SETTABLE.contains(&new_status) {
        return Err(AppError::Validation(format!(
            "Status '{}' cannot be set on a borrow request",
            new_status
        )));
    }
    if !MANAGEMENT_ACTIONABLE.contains(&request.status) {
        return Err(AppError::Conflict(format!(
            "Request in status '{}' cannot be updated",
            request.status
        )));
    }

    // A handover is not complete until the borrower acknowledges receipt;
    // store awaiting_confirmation and prompt the borrower.
    if new_status == RequestStatus::HandedOver {
        return Ok(TransitionOutcome {
            next_status: RequestStatus::AwaitingConfirmation,
            record_effect: None,
            response_override: Some(HANDOVER_CONFIRMATION_PROMPT),
        });
    }

    Ok(TransitionOutcome {
        next_status: new_status,
        record_effect: None,
        response_override: None,
    })
}

fn peer_guard(request: &Request, acting_user: i32) -> AppResult<()> {
    if request.request_type != RequestType::BorrowFromUser {
        return Err(AppError::Conflict(
            "Request is not a peer-to-peer borrow request".to_string(),
        ));
    }
    match request.target() {
        RequestTarget::Holder(holder) if holder == acting_user => {}
        _ => {
            return Err(AppError::Authorization(
                "Only the targeted holder can decide this request".to_string(),
            ));
        }
    }
    if request.status != RequestStatus::Pending {
        return Err(AppError::Conflict("Request is not pending".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn request(
        request_type: RequestType,
        status: RequestStatus,
        target_user: Option<i32>,
    ) -> Request {
        Request {
            id: 10,
            user_id: 7,
            record_id: 1,
            status,
            request_type,
            target_user,
            message: None,
            admin_response: None,
            processed_by: None,
            processed_at: None,
            created_at: Utc::now(),
        }
    }

    const MANAGER: Actor = Actor::Management { user_id: 99 };

    #[test]
    fn rejected_is_terminal_for_every_actor_and_action() {
        let pool = request(RequestType::Borrow, RequestStatus::Rejected, None);
        let peer = request(RequestType::BorrowFromUser, RequestStatus::Rejected, Some(3));

        let attempts = [
            (pool.clone(), MANAGER, Action::SetStatus(RequestStatus::Searching)),
            (pool.clone(), MANAGER, Action::SetStatus(RequestStatus::HandedOver)),
            (pool, MANAGER, Action::ConfirmReturn),
            (peer.clone(), Actor::Peer { user_id: 3 }, Action::Approve),
            (peer.clone(), Actor::Peer { user_id: 3 }, Action::Reject),
            (peer, Actor::Requester { user_id: 7 }, Action::ConfirmReceipt),
        ];
        for (req, actor, action) in attempts {
            let err = validate(&req, actor, action).unwrap_err();
            assert!(matches!(err, AppError::Conflict(_)), "{:?}", action);
        }
    }

    #[test]
    fn handed_over_is_rewritten_to_awaiting_confirmation() {
        let req = request(RequestType::Borrow, RequestStatus::Pending, None);
        let out = validate(&req, MANAGER, Action::SetStatus(RequestStatus::HandedOver)).unwrap();
        assert_eq!(out.next_status, RequestStatus::AwaitingConfirmation);
        assert_eq!(out.response_override, Some(HANDOVER_CONFIRMATION_PROMPT));
        // No possession change until the borrower confirms receipt
        assert_eq!(out.record_effect, None);
    }

    #[test]
    fn management_can_set_searching_not_traceable_and_rejected() {
        let req = request(RequestType::Borrow, RequestStatus::Pending, None);
        for status in [
            RequestStatus::Searching,
            RequestStatus::NotTraceable,
            RequestStatus::Rejected,
        ] {
            let out = validate(&req, MANAGER, Action::SetStatus(status)).unwrap();
            assert_eq!(out.next_status, status);
            assert_eq!(out.record_effect, None);
        }
    }

    #[test]
    fn management_can_still_act_on_a_searching_request() {
        let req = request(RequestType::Borrow, RequestStatus::Searching, None);
        let out = validate(&req, MANAGER, Action::SetStatus(RequestStatus::HandedOver)).unwrap();
        assert_eq!(out.next_status, RequestStatus::AwaitingConfirmation);

        let out = validate(&req, MANAGER, Action::SetStatus(RequestStatus::NotTraceable)).unwrap();
        assert_eq!(out.next_status, RequestStatus::NotTraceable);
    }

    #[test]
    fn management_cannot_set_arbitrary_statuses() {
        let req = request(RequestType::Borrow, RequestStatus::Pending, None);
        for status in [
            RequestStatus::Pending,
            RequestStatus::Approved,
            RequestStatus::AwaitingConfirmation,
        ] {
            let err = validate(&req, MANAGER, Action::SetStatus(status)).unwrap_err();
            assert!(matches!(err, AppError::Validation(_)), "{}", status);
        }
    }

    #[test]
    fn management_cannot_touch_peer_routed_requests() {
        let req = request(RequestType::BorrowFromUser, RequestStatus::Pending, Some(3));
        let err = validate(&req, MANAGER, Action::SetStatus(RequestStatus::Rejected)).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn management_cannot_update_a_request_awaiting_confirmation() {
        let req = request(RequestType::Borrow, RequestStatus::AwaitingConfirmation, None);
        let err = validate(&req, MANAGER, Action::SetStatus(RequestStatus::Rejected)).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn confirm_return_approves_and_releases_the_record() {
        let req = request(RequestType::Return, RequestStatus::Pending, None);
        let out = validate(&req, MANAGER, Action::ConfirmReturn).unwrap();
        assert_eq!(out.next_status, RequestStatus::Approved);
        assert_eq!(out.record_effect, Some(RecordEffect::Release));
    }

    #[test]
    fn confirm_return_requires_a_pending_return_request() {
        let borrow = request(RequestType::Borrow, RequestStatus::Pending, None);
        let err = validate(&borrow, MANAGER, Action::ConfirmReturn).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let approved = request(RequestType::Return, RequestStatus::Approved, None);
        let err = validate(&approved, MANAGER, Action::ConfirmReturn).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn peer_approval_transfers_possession_to_the_requester() {
        let req = request(RequestType::BorrowFromUser, RequestStatus::Pending, Some(3));
        let out = validate(&req, Actor::Peer { user_id: 3 }, Action::Approve).unwrap();
        assert_eq!(out.next_status, RequestStatus::Approved);
        assert_eq!(out.record_effect, Some(RecordEffect::Borrow { holder: 7 }));
    }

    #[test]
    fn peer_rejection_has_no_record_effect() {
        let req = request(RequestType::BorrowFromUser, RequestStatus::Pending, Some(3));
        let out = validate(&req, Actor::Peer { user_id: 3 }, Action::Reject).unwrap();
        assert_eq!(out.next_status, RequestStatus::Rejected);
        assert_eq!(out.record_effect, None);
    }

    #[test]
    fn non_target_peer_is_forbidden() {
        let req = request(RequestType::BorrowFromUser, RequestStatus::Pending, Some(3));
        let err = validate(&req, Actor::Peer { user_id: 4 }, Action::Approve).unwrap_err();
        assert!(matches!(err, AppError::Authorization(_)));
    }

    #[test]
    fn peer_decision_requires_pending_status() {
        let req = request(RequestType::BorrowFromUser, RequestStatus::Approved, Some(3));
        let err = validate(&req, Actor::Peer { user_id: 3 }, Action::Approve).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn confirm_receipt_completes_a_pool_handover() {
        let req = request(RequestType::Borrow, RequestStatus::AwaitingConfirmation, None);
        let out = validate(&req, Actor::Requester { user_id: 7 }, Action::ConfirmReceipt).unwrap();
        assert_eq!(out.next_status, RequestStatus::Approved);
        assert_eq!(out.record_effect, Some(RecordEffect::Borrow { holder: 7 }));
    }

    #[test]
    fn confirm_receipt_requires_the_requesting_user() {
        let req = request(RequestType::Borrow, RequestStatus::AwaitingConfirmation, None);
        let err =
            validate(&req, Actor::Requester { user_id: 8 }, Action::ConfirmReceipt).unwrap_err();
        assert!(matches!(err, AppError::Authorization(_)));
    }

    #[test]
    fn confirm_receipt_requires_awaiting_confirmation() {
        let req = request(RequestType::Borrow, RequestStatus::Pending, None);
        let err =
            validate(&req, Actor::Requester { user_id: 7 }, Action::ConfirmReceipt).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }
}
