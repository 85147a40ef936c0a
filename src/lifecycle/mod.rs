//! Request/Record lifecycle engine.
//!
//! Pure decision logic for the lending workflow: where a new request is
//! routed ([`routing`]) and which status transitions are legal for which
//! actor ([`transitions`]). No I/O happens here; the services layer feeds
//! these functions the current rows and persists the outcomes.

pub mod routing;
pub mod transitions;

pub use routing::{resolve_borrow, resolve_return};
pub use transitions::{
    validate, Action, Actor, RecordEffect, TransitionOutcome, HANDOVER_CONFIRMATION_PROMPT,
};
