//! Business logic services

pub mod dashboard;
pub mod records;
pub mod requests;
pub mod users;

use crate::{config::AuthConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub users: users::UsersService,
    pub records: records::RecordsService,
    pub requests: requests::RequestsService,
    pub dashboard: dashboard::DashboardService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig) -> Self {
        Self {
            users: users::UsersService::new(repository.clone(), auth_config),
            records: records::RecordsService::new(repository.clone()),
            requests: requests::RequestsService::new(repository.clone()),
            dashboard: dashboard::DashboardService::new(repository),
        }
    }
}
