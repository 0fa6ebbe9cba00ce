use moka::future::Cache;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::auth::JwtService;
use crate::handlers::leave::reports::LeaveSummaryReport;
use crate::handlers::personnel::PersonnelStats;
use crate::handlers::recruitment::DashboardSummary;

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Cache for expensive report queries
    pub cache: Cache<String, CachedData>,
    /// Token signing service
    pub jwt: JwtService,
}

/// Cached data types
#[derive(Clone, Debug)]
pub enum CachedData {
    PersonnelStats(PersonnelStats),
    LeaveSummary(LeaveSummaryReport),
    RecruitmentDashboard(DashboardSummary),
}

/// API response wrapper
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            message: message.into(),
            success: true,
        }
    }
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Short machine-readable error code
    pub error: String,
    /// Human-readable message
    pub message: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::auth::login,
        crate::handlers::auth::register_applicant,
        crate::handlers::personnel::get_personnel_list,
        crate::handlers::personnel::create_personnel,
        crate::handlers::personnel::get_personnel,
        crate::handlers::leave::applications::create_leave_application,
        crate::handlers::leave::applications::approve_leave_application,
        crate::handlers::leave::adjustments::create_leave_adjustment,
        crate::handlers::job_portal::get_open_positions,
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            common::Pagination,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Login, registration and session endpoints"),
        (name = "personnel", description = "Personnel records management"),
        (name = "leave", description = "Leave applications and the credit ledger"),
        (name = "job-portal", description = "Public recruitment portal"),
        (name = "recruitment", description = "Recruitment administration"),
        (name = "system", description = "User, department and audit administration"),
    ),
    info(
        title = "Kawani HRIS API",
        description = "Human resource information system covering personnel records, leave management, recruitment and system administration",
        version = "0.1.0",
    )
)]
pub struct ApiDoc;
