pub mod audit_logs;
pub mod auth;
pub mod departments;
pub mod health;
pub mod job_portal;
pub mod leave;
pub mod personnel;
pub mod recruitment;
pub mod self_service;
pub mod stubs;
pub mod users;
