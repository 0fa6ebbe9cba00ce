use crate::auth::middleware::require_auth;
use crate::handlers::{
    audit_logs::get_audit_logs,
    auth::{change_password, login, logout, me, refresh, register_applicant},
    departments::{
        create_department, delete_department, get_department, get_departments, update_department,
    },
    health::health_check,
    job_portal::{
        apply_to_position, get_my_applications, get_open_position, get_open_positions,
        get_portal_profile, update_portal_profile, withdraw_application,
    },
    leave::adjustments::{create_leave_adjustment, get_leave_adjustments},
    leave::applications::{
        approve_leave_application, cancel_leave_application, create_leave_application,
        get_leave_application, get_leave_applications, reject_leave_application,
        update_leave_application,
    },
    leave::balances::{
        get_leave_balance, get_leave_balances, initialize_leave_balances, update_leave_balance,
    },
    leave::monetization::{
        approve_monetization_request, create_monetization_request, get_monetization_requests,
        reject_monetization_request,
    },
    leave::reports::{get_balance_report, get_leave_summary},
    leave::types::{create_leave_type, delete_leave_type, get_leave_types, update_leave_type},
    personnel::{
        add_employment_history, create_personnel, delete_personnel, delete_personnel_document,
        get_employment_history, get_membership, get_personnel, get_personnel_documents,
        get_personnel_list, get_personnel_stats, update_membership, update_personnel,
        upload_personnel_document,
    },
    recruitment::{
        create_job_posting, delete_job_posting, get_dashboard, get_job_posting, get_job_postings,
        get_pipeline_applications, set_posting_status, update_application_status,
        update_job_posting,
    },
    self_service::{
        get_my_documents, get_my_leave_applications, get_my_leave_balances, get_my_notifications,
        get_my_profile, mark_notification_read, update_my_profile,
    },
    stubs,
    users::{create_user, delete_user, get_user, get_users, reset_password, update_user},
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
///
/// The public router carries login, registration and the job portal listing;
/// every other route sits behind the bearer-token layer.
pub fn create_router(state: AppState) -> Router {
    let public = Router::new()
        // Health check
        .route("/health", get(health_check))
        // Session endpoints
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/auth/register", post(register_applicant))
        .route("/api/v1/auth/refresh", post(refresh))
        // Public job portal
        .route("/api/v1/jobs", get(get_open_positions))
        .route("/api/v1/jobs/:position_id", get(get_open_position));

    let protected = Router::new()
        // Session endpoints
        .route("/api/v1/auth/me", get(me))
        .route("/api/v1/auth/change-password", post(change_password))
        .route("/api/v1/auth/logout", post(logout))
        // User administration
        .route("/api/v1/users", post(create_user))
        .route("/api/v1/users", get(get_users))
        .route("/api/v1/users/:user_id", get(get_user))
        .route("/api/v1/users/:user_id", put(update_user))
        .route("/api/v1/users/:user_id", delete(delete_user))
        .route("/api/v1/users/:user_id/reset-password", post(reset_password))
        // Departments
        .route("/api/v1/departments", post(create_department))
        .route("/api/v1/departments", get(get_departments))
        .route("/api/v1/departments/:department_id", get(get_department))
        .route("/api/v1/departments/:department_id", put(update_department))
        .route("/api/v1/departments/:department_id", delete(delete_department))
        // Personnel records
        .route("/api/v1/personnel", post(create_personnel))
        .route("/api/v1/personnel", get(get_personnel_list))
        .route("/api/v1/personnel/stats", get(get_personnel_stats))
        .route("/api/v1/personnel/:personnel_id", get(get_personnel))
        .route("/api/v1/personnel/:personnel_id", put(update_personnel))
        .route("/api/v1/personnel/:personnel_id", delete(delete_personnel))
        .route("/api/v1/personnel/:personnel_id/membership", get(get_membership))
        .route("/api/v1/personnel/:personnel_id/membership", put(update_membership))
        .route(
            "/api/v1/personnel/:personnel_id/employment-history",
            get(get_employment_history),
        )
        .route(
            "/api/v1/personnel/:personnel_id/employment-history",
            post(add_employment_history),
        )
        .route(
            "/api/v1/personnel/:personnel_id/documents",
            get(get_personnel_documents),
        )
        .route(
            "/api/v1/personnel/:personnel_id/documents",
            post(upload_personnel_document),
        )
        .route(
            "/api/v1/personnel/:personnel_id/documents/:document_id",
            delete(delete_personnel_document),
        )
        // Leave management
        .route("/api/v1/leave/types", get(get_leave_types))
        .route("/api/v1/leave/types", post(create_leave_type))
        .route("/api/v1/leave/types/:leave_type_id", put(update_leave_type))
        .route("/api/v1/leave/types/:leave_type_id", delete(delete_leave_type))
        .route("/api/v1/leave/balances", get(get_leave_balances))
        .route("/api/v1/leave/balances/initialize", post(initialize_leave_balances))
        .route("/api/v1/leave/balances/:balance_id", get(get_leave_balance))
        .route("/api/v1/leave/balances/:balance_id", put(update_leave_balance))
        .route("/api/v1/leave/applications", get(get_leave_applications))
        .route("/api/v1/leave/applications", post(create_leave_application))
        .route("/api/v1/leave/applications/:application_id", get(get_leave_application))
        .route("/api/v1/leave/applications/:application_id", put(update_leave_application))
        .route(
            "/api/v1/leave/applications/:application_id",
            delete(cancel_leave_application),
        )
        .route(
            "/api/v1/leave/applications/:application_id/approve",
            post(approve_leave_application),
        )
        .route(
            "/api/v1/leave/applications/:application_id/reject",
            post(reject_leave_application),
        )
        .route("/api/v1/leave/adjustments", get(get_leave_adjustments))
        .route("/api/v1/leave/adjustments", post(create_leave_adjustment))
        .route("/api/v1/leave/monetization", get(get_monetization_requests))
        .route("/api/v1/leave/monetization", post(create_monetization_request))
        .route(
            "/api/v1/leave/monetization/:request_id/approve",
            post(approve_monetization_request),
        )
        .route(
            "/api/v1/leave/monetization/:request_id/reject",
            post(reject_monetization_request),
        )
        .route("/api/v1/leave/reports/summary", get(get_leave_summary))
        .route("/api/v1/leave/reports/balances", get(get_balance_report))
        // Recruitment administration
        .route("/api/v1/recruitment/postings", get(get_job_postings))
        .route("/api/v1/recruitment/postings", post(create_job_posting))
        .route("/api/v1/recruitment/postings/:posting_id", get(get_job_posting))
        .route("/api/v1/recruitment/postings/:posting_id", put(update_job_posting))
        .route("/api/v1/recruitment/postings/:posting_id", delete(delete_job_posting))
        .route(
            "/api/v1/recruitment/postings/:posting_id/status",
            post(set_posting_status),
        )
        .route("/api/v1/recruitment/applications", get(get_pipeline_applications))
        .route(
            "/api/v1/recruitment/applications/:application_id/status",
            put(update_application_status),
        )
        .route("/api/v1/recruitment/dashboard", get(get_dashboard))
        // Applicant portal (authenticated side)
        .route("/api/v1/jobs/:position_id/apply", post(apply_to_position))
        .route("/api/v1/portal/profile", get(get_portal_profile))
        .route("/api/v1/portal/profile", put(update_portal_profile))
        .route("/api/v1/portal/applications", get(get_my_applications))
        .route(
            "/api/v1/portal/applications/:application_id/withdraw",
            post(withdraw_application),
        )
        // Employee self-service
        .route("/api/v1/me/profile", get(get_my_profile))
        .route("/api/v1/me/profile", put(update_my_profile))
        .route("/api/v1/me/documents", get(get_my_documents))
        .route("/api/v1/me/leave-balances", get(get_my_leave_balances))
        .route("/api/v1/me/leave-applications", get(get_my_leave_applications))
        .route("/api/v1/me/notifications", get(get_my_notifications))
        .route(
            "/api/v1/me/notifications/:notification_id/read",
            post(mark_notification_read),
        )
        // System administration
        .route("/api/v1/audit-logs", get(get_audit_logs))
        // Module placeholders
        .route("/api/v1/payroll", get(stubs::payroll))
        .route("/api/v1/timekeeping", get(stubs::timekeeping))
        .route("/api/v1/performance", get(stubs::performance))
        .route("/api/v1/health-wellness", get(stubs::health_wellness))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    public
        .merge(protected)
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
