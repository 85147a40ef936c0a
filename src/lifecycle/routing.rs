//! Routing resolver: decides a new request's type and target.
//!
//! Borrow requests against an unheld record go to the management pool;
//! against a held record they become peer-to-peer requests targeting the
//! current holder. Return requests always go to the management pool, and
//! only the current holder may file one.

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::{RequestTarget, RequestType},
        record::Record,
    },
};

/// Resolve type and target for a borrow request.
///
/// The NotFound and duplicate-pending preconditions are checked by the
/// service layer before this runs; this function only needs the record row.
pub fn resolve_borrow(record: &Record, requester_id: i32) -> AppResult<(RequestType, RequestTarget)> {
    if record.is_held_by(requester_id) {
        return Err(AppError::Conflict(format!(
            "You already hold record '{}'",
            record.title
        )));
    }

    match record.current_holder {
        None => Ok((RequestType::Borrow, RequestTarget::ManagementPool)),
        Some(holder) => Ok((RequestType::BorrowFromUser, RequestTarget::Holder(holder))),
    }
}

/// Resolve type and target for a return request.
///
/// Returns are always physically handled by the management pool, and only
/// the current holder of the record may file one.
pub fn resolve_return(record: &Record, requester_id: i32) -> AppResult<(RequestType, RequestTarget)> {
    if !record.is_held_by(requester_id) {
        return Err(AppError::Conflict(format!(
            "You do not currently hold record '{}'",
            record.title
        )));
    }

    Ok((RequestType::Return, RequestTarget::ManagementPool))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::RecordStatus;
    use chrono::Utc;

    fn record(holder: Option<i32>) -> Record {
        let now = Utc::now();
        Record {
            id: 1,
            title: "Pension file 42".to_string(),
            category: Some("pension".to_string()),
            description: None,
            status: if holder.is_some() {
                RecordStatus::Borrowed
            } else {
                RecordStatus::Available
            },
            current_holder: holder,
            borrowed_date: holder.map(|_| now),
            return_date: None,
            metadata: serde_json::json!({}),
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn borrow_of_unheld_record_routes_to_management_pool() {
        let (rt, target) = resolve_borrow(&record(None), 7).unwrap();
        assert_eq!(rt, RequestType::Borrow);
        assert_eq!(target, RequestTarget::ManagementPool);
    }

    #[test]
    fn borrow_of_held_record_routes_to_holder() {
        let (rt, target) = resolve_borrow(&record(Some(3)), 7).unwrap();
        assert_eq!(rt, RequestType::BorrowFromUser);
        assert_eq!(target, RequestTarget::Holder(3));
    }

    #[test]
    fn borrow_by_current_holder_is_a_conflict() {
        let err = resolve_borrow(&record(Some(7)), 7).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn return_by_holder_routes_to_management_pool() {
        let (rt, target) = resolve_return(&record(Some(7)), 7).unwrap();
        assert_eq!(rt, RequestType::Return);
        assert_eq!(target, RequestTarget::ManagementPool);
    }

    #[test]
    fn return_by_non_holder_is_a_conflict() {
        let err = resolve_return(&record(Some(3)), 7).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let err = resolve_return(&record(None), 7).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }
}
