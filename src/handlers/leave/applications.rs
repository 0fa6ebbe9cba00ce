use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use chrono::{Datelike, NaiveDate};
use common::{Pagination, PaginationQuery};
use model::entities::leave_application::{self, LeaveStatus};
use model::entities::user::Role;
use model::entities::{leave_balance, leave_type, notification, personnel};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::ToSchema;

use crate::auth::{require_role, CurrentUser};
use crate::error::ApiError;
use crate::handlers::audit_logs;
use crate::handlers::leave::balances::remaining_credits;
use crate::handlers::leave::reports::SUMMARY_CACHE_KEY;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Inclusive day count between two dates. Both endpoints count.
pub fn inclusive_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

/// Resolve the personnel record a caller is filing for. Employees may only
/// file for themselves; HR and Admin may name any personnel.
async fn resolve_personnel<C: ConnectionTrait>(
    conn: &C,
    current: &CurrentUser,
    requested: Option<i32>,
) -> Result<personnel::Model, ApiError> {
    match (current.role, requested) {
        (Role::Admin | Role::Hr, Some(personnel_id)) => personnel::Entity::find_by_id(personnel_id)
            .one(conn)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Personnel {} not found", personnel_id))),
        _ => personnel::Entity::find()
            .filter(personnel::Column::UserId.eq(current.id))
            .one(conn)
            .await?
            .ok_or_else(|| ApiError::NotFound("No personnel record for this account".to_string())),
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LeaveApplicationResponse {
    pub id: i32,
    pub personnel_id: i32,
    pub personnel_name: Option<String>,
    pub leave_type_id: i32,
    pub leave_type_name: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_days: i32,
    pub reason: Option<String>,
    pub supporting_document: Option<String>,
    pub status: String,
    pub request_date: chrono::NaiveDateTime,
    pub approved_by: Option<i32>,
    pub approval_date: Option<chrono::NaiveDateTime>,
    pub approval_comments: Option<String>,
}

impl LeaveApplicationResponse {
    pub fn new(
        model: leave_application::Model,
        personnel_name: Option<String>,
        leave_type_name: Option<String>,
    ) -> Self {
        Self {
            id: model.id,
            personnel_id: model.personnel_id,
            personnel_name,
            leave_type_id: model.leave_type_id,
            leave_type_name,
            start_date: model.start_date,
            end_date: model.end_date,
            total_days: model.total_days,
            reason: model.reason,
            supporting_document: model.supporting_document,
            status: model.status.as_str().to_string(),
            request_date: model.request_date,
            approved_by: model.approved_by,
            approval_date: model.approval_date,
            approval_comments: model.approval_comments,
        }
    }
}

async fn to_response(
    state: &AppState,
    model: leave_application::Model,
) -> Result<LeaveApplicationResponse, ApiError> {
    let person = personnel::Entity::find_by_id(model.personnel_id)
        .one(&state.db)
        .await?
        .map(|p| format!("{} {}", p.first_name, p.last_name));
    let type_name = leave_type::Entity::find_by_id(model.leave_type_id)
        .one(&state.db)
        .await?
        .map(|t| t.leave_type_name);
    Ok(LeaveApplicationResponse::new(model, person, type_name))
}

/// Filters accepted by the application listing
#[derive(Debug, Deserialize, ToSchema)]
pub struct LeaveApplicationQuery {
    pub status: Option<String>,
    pub personnel_id: Option<i32>,
    pub leave_type_id: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LeaveApplicationListResponse {
    pub applications: Vec<LeaveApplicationResponse>,
    pub pagination: Pagination,
}

/// List leave applications
///
/// Employees see only their own; HR and Admin see everything.
#[utoipa::path(
    get,
    path = "/api/v1/leave/applications",
    tag = "leave",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Applications retrieved successfully", body = ApiResponse<LeaveApplicationListResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_leave_applications(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(pagination): Query<PaginationQuery>,
    Query(filter): Query<LeaveApplicationQuery>,
) -> Result<Json<ApiResponse<LeaveApplicationListResponse>>, ApiError> {
    trace!("Entering get_leave_applications function");
    require_role(&current, &[Role::Admin, Role::Hr, Role::Employee])?;

    let mut query = leave_application::Entity::find();

    if current.role == Role::Employee {
        let own = personnel::Entity::find()
            .filter(personnel::Column::UserId.eq(current.id))
            .one(&state.db)
            .await?
            .ok_or_else(|| ApiError::NotFound("No personnel record for this account".to_string()))?;
        query = query.filter(leave_application::Column::PersonnelId.eq(own.id));
    } else if let Some(personnel_id) = filter.personnel_id {
        query = query.filter(leave_application::Column::PersonnelId.eq(personnel_id));
    }

    if let Some(status) = &filter.status {
        let status = status.parse::<LeaveStatus>().map_err(ApiError::Validation)?;
        query = query.filter(leave_application::Column::Status.eq(status));
    }
    if let Some(leave_type_id) = filter.leave_type_id {
        query = query.filter(leave_application::Column::LeaveTypeId.eq(leave_type_id));
    }
    if let Some(start) = filter.start_date {
        query = query.filter(leave_application::Column::StartDate.gte(start));
    }
    if let Some(end) = filter.end_date {
        query = query.filter(leave_application::Column::StartDate.lte(end));
    }

    let paginator = query
        .order_by_desc(leave_application::Column::RequestDate)
        .paginate(&state.db, pagination.limit());
    let total = paginator.num_items().await?;
    let rows = paginator.fetch_page(pagination.page_index()).await?;

    let mut applications = Vec::with_capacity(rows.len());
    for row in rows {
        applications.push(to_response(&state, row).await?);
    }

    debug!("Retrieved {} of {} leave applications", applications.len(), total);
    Ok(Json(ApiResponse::new(
        LeaveApplicationListResponse {
            applications,
            pagination: Pagination::new(&pagination, total),
        },
        "Leave applications retrieved successfully",
    )))
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateLeaveApplicationRequest {
    /// HR and Admin may file on behalf of any personnel; employees file for
    /// themselves and this field is ignored.
    pub personnel_id: Option<i32>,
    pub leave_type_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: Option<String>,
    pub supporting_document: Option<String>,
}

/// File a leave application
///
/// The day count is the inclusive span of the date range. Filing checks the
/// remaining balance for the start date's year but does not debit it; credits
/// move only on approval.
#[utoipa::path(
    post,
    path = "/api/v1/leave/applications",
    tag = "leave",
    request_body = CreateLeaveApplicationRequest,
    responses(
        (status = 201, description = "Application filed", body = ApiResponse<LeaveApplicationResponse>),
        (status = 400, description = "Invalid request or insufficient balance", body = ErrorResponse),
        (status = 404, description = "Personnel or leave type not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_leave_application(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<CreateLeaveApplicationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<LeaveApplicationResponse>>), ApiError> {
    trace!("Entering create_leave_application function");
    require_role(&current, &[Role::Admin, Role::Hr, Role::Employee])?;

    if request.end_date < request.start_date {
        return Err(ApiError::Validation(
            "End date cannot be before start date".to_string(),
        ));
    }

    let person = resolve_personnel(&state.db, &current, request.personnel_id).await?;

    let lt = leave_type::Entity::find_by_id(request.leave_type_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!("Leave type {} not found", request.leave_type_id))
        })?;
    if !lt.is_active {
        return Err(ApiError::Validation(format!(
            "Leave type {} is inactive",
            lt.leave_type_name
        )));
    }
    if lt.requires_document && request.supporting_document.is_none() {
        return Err(ApiError::Validation(format!(
            "{} requires a supporting document",
            lt.leave_type_name
        )));
    }

    let total_days = inclusive_days(request.start_date, request.end_date);
    if let Some(max_days) = lt.max_days {
        if total_days > max_days as i64 {
            return Err(ApiError::Validation(format!(
                "{} allows at most {} days per application",
                lt.leave_type_name, max_days
            )));
        }
    }

    let year = request.start_date.year();
    let balance = leave_balance::Entity::find()
        .filter(leave_balance::Column::PersonnelId.eq(person.id))
        .filter(leave_balance::Column::LeaveTypeId.eq(lt.id))
        .filter(leave_balance::Column::Year.eq(year))
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            ApiError::Validation(format!(
                "No leave balance initialized for {} in {}",
                lt.leave_type_name, year
            ))
        })?;

    let remaining = remaining_credits(&balance);
    if remaining < Decimal::from(total_days) {
        return Err(ApiError::Validation(format!(
            "Insufficient balance: {} credits remaining, {} requested",
            remaining, total_days
        )));
    }

    let created = leave_application::ActiveModel {
        personnel_id: Set(person.id),
        leave_type_id: Set(lt.id),
        start_date: Set(request.start_date),
        end_date: Set(request.end_date),
        total_days: Set(total_days as i32),
        reason: Set(request.reason.clone()),
        supporting_document: Set(request.supporting_document.clone()),
        status: Set(LeaveStatus::Pending),
        request_date: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    audit_logs::record(
        &state.db,
        Some(current.id),
        "CREATE",
        "leave_applications",
        Some(created.id.to_string()),
        Some(format!(
            "Filed {} days of {} starting {}",
            total_days, lt.leave_type_name, request.start_date
        )),
    )
    .await;

    state.cache.invalidate(SUMMARY_CACHE_KEY).await;

    info!(
        "Leave application {} filed for personnel {}",
        created.id, person.id
    );
    let response = to_response(&state, created).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            response,
            "Leave application filed successfully",
        )),
    ))
}

/// Get a leave application by ID
#[utoipa::path(
    get,
    path = "/api/v1/leave/applications/{application_id}",
    tag = "leave",
    params(("application_id" = i32, Path, description = "Application ID")),
    responses(
        (status = 200, description = "Application retrieved", body = ApiResponse<LeaveApplicationResponse>),
        (status = 404, description = "Application not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_leave_application(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(application_id): Path<i32>,
) -> Result<Json<ApiResponse<LeaveApplicationResponse>>, ApiError> {
    trace!("Entering get_leave_application for id: {}", application_id);

    let model = find_visible(&state, &current, application_id).await?;
    let response = to_response(&state, model).await?;
    Ok(Json(ApiResponse::new(
        response,
        "Leave application retrieved successfully",
    )))
}

/// Fetch an application, restricting employees to their own records.
async fn find_visible(
    state: &AppState,
    current: &CurrentUser,
    application_id: i32,
) -> Result<leave_application::Model, ApiError> {
    let model = leave_application::Entity::find_by_id(application_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!("Leave application {} not found", application_id))
        })?;

    if current.role == Role::Employee {
        let own = personnel::Entity::find()
            .filter(personnel::Column::UserId.eq(current.id))
            .one(&state.db)
            .await?;
        if own.map(|p| p.id) != Some(model.personnel_id) {
            // Hidden, not forbidden: do not confirm the record exists
            return Err(ApiError::NotFound(format!(
                "Leave application {} not found",
                application_id
            )));
        }
    }

    Ok(model)
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateLeaveApplicationRequest {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub reason: Option<String>,
    pub supporting_document: Option<String>,
}

/// Amend a pending leave application
///
/// Only pending applications can change; the day count is recomputed from
/// the amended range.
#[utoipa::path(
    put,
    path = "/api/v1/leave/applications/{application_id}",
    tag = "leave",
    params(("application_id" = i32, Path, description = "Application ID")),
    request_body = UpdateLeaveApplicationRequest,
    responses(
        (status = 200, description = "Application updated", body = ApiResponse<LeaveApplicationResponse>),
        (status = 400, description = "Application is not pending", body = ErrorResponse),
        (status = 404, description = "Application not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_leave_application(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(application_id): Path<i32>,
    Json(request): Json<UpdateLeaveApplicationRequest>,
) -> Result<Json<ApiResponse<LeaveApplicationResponse>>, ApiError> {
    trace!("Entering update_leave_application for id: {}", application_id);

    let model = find_visible(&state, &current, application_id).await?;
    if model.status != LeaveStatus::Pending {
        return Err(ApiError::Validation(
            "Only pending applications can be amended".to_string(),
        ));
    }

    let start = request.start_date.unwrap_or(model.start_date);
    let end = request.end_date.unwrap_or(model.end_date);
    if end < start {
        return Err(ApiError::Validation(
            "End date cannot be before start date".to_string(),
        ));
    }

    let mut active: leave_application::ActiveModel = model.into();
    active.start_date = Set(start);
    active.end_date = Set(end);
    active.total_days = Set(inclusive_days(start, end) as i32);
    if let Some(reason) = request.reason {
        active.reason = Set(Some(reason));
    }
    if let Some(document) = request.supporting_document {
        active.supporting_document = Set(Some(document));
    }

    let updated = active.update(&state.db).await?;

    info!("Leave application {} amended", application_id);
    let response = to_response(&state, updated).await?;
    Ok(Json(ApiResponse::new(
        response,
        "Leave application updated successfully",
    )))
}

/// Cancel a pending leave application
#[utoipa::path(
    delete,
    path = "/api/v1/leave/applications/{application_id}",
    tag = "leave",
    params(("application_id" = i32, Path, description = "Application ID")),
    responses(
        (status = 200, description = "Application cancelled", body = ApiResponse<i32>),
        (status = 400, description = "Application is not pending", body = ErrorResponse),
        (status = 404, description = "Application not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn cancel_leave_application(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(application_id): Path<i32>,
) -> Result<Json<ApiResponse<i32>>, ApiError> {
    trace!("Entering cancel_leave_application for id: {}", application_id);

    let model = find_visible(&state, &current, application_id).await?;
    if model.status != LeaveStatus::Pending {
        return Err(ApiError::Validation(
            "Only pending applications can be cancelled".to_string(),
        ));
    }

    model.delete(&state.db).await?;

    audit_logs::record(
        &state.db,
        Some(current.id),
        "DELETE",
        "leave_applications",
        Some(application_id.to_string()),
        None,
    )
    .await;

    state.cache.invalidate(SUMMARY_CACHE_KEY).await;

    info!("Leave application {} cancelled", application_id);
    Ok(Json(ApiResponse::new(
        application_id,
        "Leave application cancelled successfully",
    )))
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct DecisionRequest {
    pub comments: Option<String>,
}

/// Approve a pending leave application
///
/// Approval and the ledger debit happen in one transaction: the application
/// flips to Approved and `used_credits` on the matching balance row grows by
/// `total_days`. If the balance row is missing or the remaining credits no
/// longer cover the span, nothing changes.
#[utoipa::path(
    post,
    path = "/api/v1/leave/applications/{application_id}/approve",
    tag = "leave",
    params(("application_id" = i32, Path, description = "Application ID")),
    request_body = DecisionRequest,
    responses(
        (status = 200, description = "Application approved", body = ApiResponse<LeaveApplicationResponse>),
        (status = 400, description = "Not pending or insufficient balance", body = ErrorResponse),
        (status = 403, description = "Insufficient role", body = ErrorResponse),
        (status = 404, description = "Application not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn approve_leave_application(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(application_id): Path<i32>,
    Json(request): Json<DecisionRequest>,
) -> Result<Json<ApiResponse<LeaveApplicationResponse>>, ApiError> {
    trace!("Entering approve_leave_application for id: {}", application_id);
    require_role(&current, &[Role::Admin, Role::Hr])?;

    let model = leave_application::Entity::find_by_id(application_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!("Leave application {} not found", application_id))
        })?;
    if model.status != LeaveStatus::Pending {
        return Err(ApiError::Validation(
            "Only pending applications can be approved".to_string(),
        ));
    }

    let year = model.start_date.year();
    let txn = state.db.begin().await?;

    let balance = leave_balance::Entity::find()
        .filter(leave_balance::Column::PersonnelId.eq(model.personnel_id))
        .filter(leave_balance::Column::LeaveTypeId.eq(model.leave_type_id))
        .filter(leave_balance::Column::Year.eq(year))
        .one(&txn)
        .await?
        .ok_or_else(|| {
            ApiError::Validation(format!("No leave balance initialized for {}", year))
        })?;

    let debit = Decimal::from(model.total_days);
    if remaining_credits(&balance) < debit {
        warn!(
            "Approval rejected for application {}: balance exhausted",
            application_id
        );
        return Err(ApiError::Validation(
            "Remaining credits no longer cover this application".to_string(),
        ));
    }

    let new_used = balance.used_credits + debit;
    let mut balance_active: leave_balance::ActiveModel = balance.into();
    balance_active.used_credits = Set(new_used);
    balance_active.last_updated = Set(chrono::Utc::now().naive_utc());
    balance_active.update(&txn).await?;

    let personnel_id = model.personnel_id;
    let mut active: leave_application::ActiveModel = model.into();
    active.status = Set(LeaveStatus::Approved);
    active.approved_by = Set(Some(current.id));
    active.approval_date = Set(Some(chrono::Utc::now().naive_utc()));
    active.approval_comments = Set(request.comments.clone());
    let updated = active.update(&txn).await?;

    notify_applicant(&txn, personnel_id, application_id, "approved").await?;
    audit_logs::record(
        &txn,
        Some(current.id),
        "APPROVE",
        "leave_applications",
        Some(application_id.to_string()),
        Some(format!("Debited {} credits", updated.total_days)),
    )
    .await;

    txn.commit().await?;

    state.cache.invalidate(SUMMARY_CACHE_KEY).await;

    info!(
        "Leave application {} approved by {}",
        application_id, current.username
    );
    let response = to_response(&state, updated).await?;
    Ok(Json(ApiResponse::new(
        response,
        "Leave application approved successfully",
    )))
}

/// Reject a pending leave application. The ledger is untouched.
#[utoipa::path(
    post,
    path = "/api/v1/leave/applications/{application_id}/reject",
    tag = "leave",
    params(("application_id" = i32, Path, description = "Application ID")),
    request_body = DecisionRequest,
    responses(
        (status = 200, description = "Application rejected", body = ApiResponse<LeaveApplicationResponse>),
        (status = 400, description = "Application is not pending", body = ErrorResponse),
        (status = 403, description = "Insufficient role", body = ErrorResponse),
        (status = 404, description = "Application not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn reject_leave_application(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(application_id): Path<i32>,
    Json(request): Json<DecisionRequest>,
) -> Result<Json<ApiResponse<LeaveApplicationResponse>>, ApiError> {
    trace!("Entering reject_leave_application for id: {}", application_id);
    require_role(&current, &[Role::Admin, Role::Hr])?;

    let model = leave_application::Entity::find_by_id(application_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!("Leave application {} not found", application_id))
        })?;
    if model.status != LeaveStatus::Pending {
        return Err(ApiError::Validation(
            "Only pending applications can be rejected".to_string(),
        ));
    }

    let personnel_id = model.personnel_id;
    let txn = state.db.begin().await?;

    let mut active: leave_application::ActiveModel = model.into();
    active.status = Set(LeaveStatus::Rejected);
    active.approved_by = Set(Some(current.id));
    active.approval_date = Set(Some(chrono::Utc::now().naive_utc()));
    active.approval_comments = Set(request.comments.clone());
    let updated = active.update(&txn).await?;

    notify_applicant(&txn, personnel_id, application_id, "rejected").await?;
    audit_logs::record(
        &txn,
        Some(current.id),
        "REJECT",
        "leave_applications",
        Some(application_id.to_string()),
        None,
    )
    .await;

    txn.commit().await?;

    state.cache.invalidate(SUMMARY_CACHE_KEY).await;

    info!(
        "Leave application {} rejected by {}",
        application_id, current.username
    );
    let response = to_response(&state, updated).await?;
    Ok(Json(ApiResponse::new(
        response,
        "Leave application rejected",
    )))
}

/// Notify the employee behind a personnel record about a decision.
async fn notify_applicant<C: ConnectionTrait>(
    conn: &C,
    personnel_id: i32,
    application_id: i32,
    decision: &str,
) -> Result<(), ApiError> {
    let Some(person) = personnel::Entity::find_by_id(personnel_id).one(conn).await? else {
        return Ok(());
    };

    notification::ActiveModel {
        user_id: Set(person.user_id),
        notification_type: Set("leave_application".to_string()),
        message: Set(format!("Your leave application has been {}", decision)),
        is_read: Set(false),
        related_id: Set(Some(application_id.to_string())),
        related_table: Set(Some("leave_applications".to_string())),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(conn)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_count_is_inclusive() {
        let start = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 3, 4).unwrap();
        assert_eq!(inclusive_days(start, end), 3);
        assert_eq!(inclusive_days(start, start), 1);
    }
}
