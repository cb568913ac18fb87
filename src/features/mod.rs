pub mod auth;
pub mod dashboard;
pub mod jobs;
pub mod lots;
pub mod reservations;
pub mod users;
