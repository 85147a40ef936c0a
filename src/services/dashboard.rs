//! Dashboard aggregation service.
//!
//! Read-only projections over the record and request stores. Management
//! views count only management-pool requests (target_user IS NULL) so
//! peer-to-peer traffic never inflates management workload.

use crate::{
    api::dashboard::{AdminDashboard, ManagerDashboard, UserDashboard},
    error::AppResult,
    models::enums::{RecordStatus, RequestStatus, RequestType},
    repository::Repository,
};

#[derive(Clone)]
pub struct DashboardService {
    repository: Repository,
}

impl DashboardService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Admin overview: user/record totals plus pending pool workload
    pub async fn admin(&self) -> AppResult<AdminDashboard> {
        Ok(AdminDashboard {
            total_users: self.repository.users.count_total().await?,
            total_records: self.repository.records.count_total().await?,
            available_records: self
                .repository
                .records
                .count_by_status(RecordStatus::Available)
                .await?,
            borrowed_records: self
                .repository
                .records
                .count_by_status(RecordStatus::Borrowed)
                .await?,
            pending_requests: self
                .repository
                .requests
                .count_pool(RequestStatus::Pending, None)
                .await?,
        })
    }

    /// Record-manager worklist counts, per pool request state
    pub async fn manager(&self) -> AppResult<ManagerDashboard> {
        let requests = &self.repository.requests;
        Ok(ManagerDashboard {
            pending_borrow: requests
                .count_pool(RequestStatus::Pending, Some(RequestType::Borrow))
                .await?,
            pending_return: requests
                .count_pool(RequestStatus::Pending, Some(RequestType::Return))
                .await?,
            awaiting_confirmation: requests
                .count_pool(RequestStatus::AwaitingConfirmation, None)
                .await?,
            searching: requests.count_pool(RequestStatus::Searching, None).await?,
            not_traceable: requests
                .count_pool(RequestStatus::NotTraceable, None)
                .await?,
        })
    }

    /// A user's own view: pending requests, held records, incoming peer
    /// requests awaiting their decision
    pub async fn user(&self, user_id: i32) -> AppResult<UserDashboard> {
        Ok(UserDashboard {
            my_pending_requests: self
                .repository
                .requests
                .count_by_user(user_id, RequestStatus::Pending)
                .await?,
            records_held: self.repository.records.count_held_by(user_id).await?,
            incoming_requests: self
                .repository
                .requests
                .count_incoming_pending(user_id)
                .await?,
        })
    }
}
