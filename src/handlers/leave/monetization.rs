use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use chrono::Datelike;
use common::{Pagination, PaginationQuery};
use model::entities::leave_monetization::{self, MonetizationStatus};
use model::entities::user::Role;
use model::entities::{leave_balance, leave_type, notification, personnel};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};
use utoipa::ToSchema;

use crate::auth::{require_role, CurrentUser};
use crate::error::ApiError;
use crate::handlers::audit_logs;
use crate::handlers::leave::balances::remaining_credits;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

#[derive(Debug, Serialize, ToSchema)]
pub struct MonetizationResponse {
    pub id: i32,
    pub personnel_id: i32,
    pub leave_type_id: i32,
    pub days_to_monetize: i32,
    pub status: String,
    #[schema(value_type = Option<String>)]
    pub amount: Option<Decimal>,
    pub request_date: chrono::NaiveDateTime,
    pub approved_by: Option<i32>,
    pub approval_date: Option<chrono::NaiveDateTime>,
}

impl From<leave_monetization::Model> for MonetizationResponse {
    fn from(model: leave_monetization::Model) -> Self {
        Self {
            id: model.id,
            personnel_id: model.personnel_id,
            leave_type_id: model.leave_type_id,
            days_to_monetize: model.days_to_monetize,
            status: model.status.as_str().to_string(),
            amount: model.amount,
            request_date: model.request_date,
            approved_by: model.approved_by,
            approval_date: model.approval_date,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct MonetizationQuery {
    pub status: Option<String>,
    pub personnel_id: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MonetizationListResponse {
    pub requests: Vec<MonetizationResponse>,
    pub pagination: Pagination,
}

/// List monetization requests
///
/// Employees see only their own requests.
#[utoipa::path(
    get,
    path = "/api/v1/leave/monetization",
    tag = "leave",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Requests retrieved successfully", body = ApiResponse<MonetizationListResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_monetization_requests(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(pagination): Query<PaginationQuery>,
    Query(filter): Query<MonetizationQuery>,
) -> Result<Json<ApiResponse<MonetizationListResponse>>, ApiError> {
    trace!("Entering get_monetization_requests function");
    require_role(&current, &[Role::Admin, Role::Hr, Role::Employee])?;

    let mut query = leave_monetization::Entity::find();

    if current.role == Role::Employee {
        let own = personnel::Entity::find()
            .filter(personnel::Column::UserId.eq(current.id))
            .one(&state.db)
            .await?
            .ok_or_else(|| ApiError::NotFound("No personnel record for this account".to_string()))?;
        query = query.filter(leave_monetization::Column::PersonnelId.eq(own.id));
    } else if let Some(personnel_id) = filter.personnel_id {
        query = query.filter(leave_monetization::Column::PersonnelId.eq(personnel_id));
    }

    if let Some(status) = &filter.status {
        let status = status
            .parse::<MonetizationStatus>()
            .map_err(ApiError::Validation)?;
        query = query.filter(leave_monetization::Column::Status.eq(status));
    }

    let paginator = query
        .order_by_desc(leave_monetization::Column::RequestDate)
        .paginate(&state.db, pagination.limit());
    let total = paginator.num_items().await?;
    let requests = paginator
        .fetch_page(pagination.page_index())
        .await?
        .into_iter()
        .map(MonetizationResponse::from)
        .collect::<Vec<_>>();

    debug!("Retrieved {} of {} monetization requests", requests.len(), total);
    Ok(Json(ApiResponse::new(
        MonetizationListResponse {
            requests,
            pagination: Pagination::new(&pagination, total),
        },
        "Monetization requests retrieved successfully",
    )))
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateMonetizationRequest {
    pub leave_type_id: i32,
    pub days_to_monetize: i32,
}

/// Request monetization of unused leave credits
///
/// Filed against the caller's own personnel record. The payout amount stays
/// empty until an approver sets it.
#[utoipa::path(
    post,
    path = "/api/v1/leave/monetization",
    tag = "leave",
    request_body = CreateMonetizationRequest,
    responses(
        (status = 201, description = "Request filed", body = ApiResponse<MonetizationResponse>),
        (status = 400, description = "Invalid request or insufficient credits", body = ErrorResponse),
        (status = 404, description = "Personnel or leave type not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_monetization_request(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<CreateMonetizationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<MonetizationResponse>>), ApiError> {
    trace!("Entering create_monetization_request function");
    require_role(&current, &[Role::Admin, Role::Hr, Role::Employee])?;

    if request.days_to_monetize <= 0 {
        return Err(ApiError::Validation(
            "Days to monetize must be positive".to_string(),
        ));
    }

    let person = personnel::Entity::find()
        .filter(personnel::Column::UserId.eq(current.id))
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("No personnel record for this account".to_string()))?;

    let lt = leave_type::Entity::find_by_id(request.leave_type_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!("Leave type {} not found", request.leave_type_id))
        })?;

    let year = chrono::Utc::now().date_naive().year();
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

    if remaining_credits(&balance) < Decimal::from(request.days_to_monetize) {
        return Err(ApiError::Validation(
            "Not enough remaining credits to monetize".to_string(),
        ));
    }

    let created = leave_monetization::ActiveModel {
        personnel_id: Set(person.id),
        leave_type_id: Set(lt.id),
        days_to_monetize: Set(request.days_to_monetize),
        status: Set(MonetizationStatus::Pending),
        amount: Set(None),
        request_date: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    audit_logs::record(
        &state.db,
        Some(current.id),
        "CREATE",
        "leave_monetizations",
        Some(created.id.to_string()),
        Some(format!(
            "Requested monetization of {} {} days",
            request.days_to_monetize, lt.leave_type_name
        )),
    )
    .await;

    info!(
        "Monetization request {} filed for personnel {}",
        created.id, person.id
    );
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            MonetizationResponse::from(created),
            "Monetization request filed successfully",
        )),
    ))
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct MonetizationDecisionRequest {
    /// Payout set by the approver; ignored on rejection.
    #[schema(value_type = Option<String>)]
    pub amount: Option<Decimal>,
}

/// Approve a monetization request and set its payout
///
/// Approval debits the current-year balance's used credits by the monetized
/// days inside one transaction.
#[utoipa::path(
    post,
    path = "/api/v1/leave/monetization/{request_id}/approve",
    tag = "leave",
    params(("request_id" = i32, Path, description = "Monetization request ID")),
    request_body = MonetizationDecisionRequest,
    responses(
        (status = 200, description = "Request approved", body = ApiResponse<MonetizationResponse>),
        (status = 400, description = "Not pending or insufficient credits", body = ErrorResponse),
        (status = 403, description = "Insufficient role", body = ErrorResponse),
        (status = 404, description = "Request not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn approve_monetization_request(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(request_id): Path<i32>,
    Json(request): Json<MonetizationDecisionRequest>,
) -> Result<Json<ApiResponse<MonetizationResponse>>, ApiError> {
    trace!("Entering approve_monetization_request for id: {}", request_id);
    require_role(&current, &[Role::Admin, Role::Hr])?;

    let model = leave_monetization::Entity::find_by_id(request_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!("Monetization request {} not found", request_id))
        })?;
    if model.status != MonetizationStatus::Pending {
        return Err(ApiError::Validation(
            "Only pending requests can be approved".to_string(),
        ));
    }

    let year = model.request_date.year();
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

    let debit = Decimal::from(model.days_to_monetize);
    if remaining_credits(&balance) < debit {
        return Err(ApiError::Validation(
            "Remaining credits no longer cover this request".to_string(),
        ));
    }

    let new_used = balance.used_credits + debit;
    let mut balance_active: leave_balance::ActiveModel = balance.into();
    balance_active.used_credits = Set(new_used);
    balance_active.last_updated = Set(chrono::Utc::now().naive_utc());
    balance_active.update(&txn).await?;

    let personnel_id = model.personnel_id;
    let mut active: leave_monetization::ActiveModel = model.into();
    active.status = Set(MonetizationStatus::Approved);
    active.amount = Set(request.amount);
    active.approved_by = Set(Some(current.id));
    active.approval_date = Set(Some(chrono::Utc::now().naive_utc()));
    let updated = active.update(&txn).await?;

    notify_requester(&txn, personnel_id, request_id, "approved").await?;
    audit_logs::record(
        &txn,
        Some(current.id),
        "APPROVE",
        "leave_monetizations",
        Some(request_id.to_string()),
        Some(format!("Debited {} credits", updated.days_to_monetize)),
    )
    .await;

    txn.commit().await?;

    info!(
        "Monetization request {} approved by {}",
        request_id, current.username
    );
    Ok(Json(ApiResponse::new(
        MonetizationResponse::from(updated),
        "Monetization request approved successfully",
    )))
}

/// Reject a pending monetization request
#[utoipa::path(
    post,
    path = "/api/v1/leave/monetization/{request_id}/reject",
    tag = "leave",
    params(("request_id" = i32, Path, description = "Monetization request ID")),
    responses(
        (status = 200, description = "Request rejected", body = ApiResponse<MonetizationResponse>),
        (status = 400, description = "Request is not pending", body = ErrorResponse),
        (status = 403, description = "Insufficient role", body = ErrorResponse),
        (status = 404, description = "Request not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn reject_monetization_request(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(request_id): Path<i32>,
) -> Result<Json<ApiResponse<MonetizationResponse>>, ApiError> {
    trace!("Entering reject_monetization_request for id: {}", request_id);
    require_role(&current, &[Role::Admin, Role::Hr])?;

    let model = leave_monetization::Entity::find_by_id(request_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!("Monetization request {} not found", request_id))
        })?;
    if model.status != MonetizationStatus::Pending {
        return Err(ApiError::Validation(
            "Only pending requests can be rejected".to_string(),
        ));
    }

    let personnel_id = model.personnel_id;
    let txn = state.db.begin().await?;

    let mut active: leave_monetization::ActiveModel = model.into();
    active.status = Set(MonetizationStatus::Rejected);
    active.approved_by = Set(Some(current.id));
    active.approval_date = Set(Some(chrono::Utc::now().naive_utc()));
    let updated = active.update(&txn).await?;

    notify_requester(&txn, personnel_id, request_id, "rejected").await?;
    audit_logs::record(
        &txn,
        Some(current.id),
        "REJECT",
        "leave_monetizations",
        Some(request_id.to_string()),
        None,
    )
    .await;

    txn.commit().await?;

    info!(
        "Monetization request {} rejected by {}",
        request_id, current.username
    );
    Ok(Json(ApiResponse::new(
        MonetizationResponse::from(updated),
        "Monetization request rejected",
    )))
}

async fn notify_requester<C: ConnectionTrait>(
    conn: &C,
    personnel_id: i32,
    request_id: i32,
    decision: &str,
) -> Result<(), ApiError> {
    let Some(person) = personnel::Entity::find_by_id(personnel_id).one(conn).await? else {
        return Ok(());
    };

    notification::ActiveModel {
        user_id: Set(person.user_id),
        notification_type: Set("leave_monetization".to_string()),
        message: Set(format!(
            "Your leave monetization request has been {}",
            decision
        )),
        is_read: Set(false),
        related_id: Set(Some(request_id.to_string())),
        related_table: Set(Some("leave_monetizations".to_string())),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(conn)
    .await?;

    Ok(())
}
