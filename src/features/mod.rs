pub mod admin;
pub mod articles;
pub mod auth;
pub mod categories;
pub mod forum;
pub mod import_jobs;
pub mod rate_limits;
pub mod search;
