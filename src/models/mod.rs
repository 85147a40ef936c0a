//! Domain models

pub mod enums;
pub mod record;
pub mod request;
pub mod user;
