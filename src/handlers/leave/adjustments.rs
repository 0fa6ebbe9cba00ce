use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use common::{Pagination, PaginationQuery};
use model::entities::leave_adjustment::{self, AdjustmentType};
use model::entities::user::Role;
use model::entities::{leave_balance, leave_type};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::ToSchema;

use crate::auth::{require_role, CurrentUser};
use crate::error::ApiError;
use crate::handlers::audit_logs;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

#[derive(Debug, Serialize, ToSchema)]
pub struct LeaveAdjustmentResponse {
    pub id: i32,
    pub personnel_id: i32,
    pub leave_type_id: i32,
    pub year: i32,
    pub adjustment_type: String,
    #[schema(value_type = String)]
    pub adjustment_amount: Decimal,
    #[schema(value_type = String)]
    pub previous_balance: Decimal,
    #[schema(value_type = String)]
    pub new_balance: Decimal,
    pub reason: String,
    pub created_by: i32,
    pub created_at: chrono::NaiveDateTime,
}

impl From<leave_adjustment::Model> for LeaveAdjustmentResponse {
    fn from(model: leave_adjustment::Model) -> Self {
        Self {
            id: model.id,
            personnel_id: model.personnel_id,
            leave_type_id: model.leave_type_id,
            year: model.year,
            adjustment_type: model.adjustment_type.as_str().to_string(),
            adjustment_amount: model.adjustment_amount,
            previous_balance: model.previous_balance,
            new_balance: model.new_balance,
            reason: model.reason,
            created_by: model.created_by,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LeaveAdjustmentQuery {
    pub personnel_id: Option<i32>,
    pub leave_type_id: Option<i32>,
    pub year: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LeaveAdjustmentListResponse {
    pub adjustments: Vec<LeaveAdjustmentResponse>,
    pub pagination: Pagination,
}

/// List leave adjustments
#[utoipa::path(
    get,
    path = "/api/v1/leave/adjustments",
    tag = "leave",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Adjustments retrieved successfully", body = ApiResponse<LeaveAdjustmentListResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_leave_adjustments(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(pagination): Query<PaginationQuery>,
    Query(filter): Query<LeaveAdjustmentQuery>,
) -> Result<Json<ApiResponse<LeaveAdjustmentListResponse>>, ApiError> {
    trace!("Entering get_leave_adjustments function");
    require_role(&current, &[Role::Admin, Role::Hr])?;

    let mut query = leave_adjustment::Entity::find();
    if let Some(personnel_id) = filter.personnel_id {
        query = query.filter(leave_adjustment::Column::PersonnelId.eq(personnel_id));
    }
    if let Some(leave_type_id) = filter.leave_type_id {
        query = query.filter(leave_adjustment::Column::LeaveTypeId.eq(leave_type_id));
    }
    if let Some(year) = filter.year {
        query = query.filter(leave_adjustment::Column::Year.eq(year));
    }

    let paginator = query
        .order_by_desc(leave_adjustment::Column::CreatedAt)
        .paginate(&state.db, pagination.limit());
    let total = paginator.num_items().await?;
    let adjustments = paginator
        .fetch_page(pagination.page_index())
        .await?
        .into_iter()
        .map(LeaveAdjustmentResponse::from)
        .collect::<Vec<_>>();

    debug!("Retrieved {} of {} adjustments", adjustments.len(), total);
    Ok(Json(ApiResponse::new(
        LeaveAdjustmentListResponse {
            adjustments,
            pagination: Pagination::new(&pagination, total),
        },
        "Leave adjustments retrieved successfully",
    )))
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateLeaveAdjustmentRequest {
    pub personnel_id: i32,
    pub leave_type_id: i32,
    pub year: i32,
    /// "increase" or "decrease"
    pub adjustment_type: String,
    #[schema(value_type = String)]
    pub amount: Decimal,
    pub reason: String,
}

/// Record a manual credit adjustment
///
/// The adjustment row and the balance update land in one transaction. The
/// row carries the before/after totals, and a decrease that would push the
/// total below zero is rejected.
#[utoipa::path(
    post,
    path = "/api/v1/leave/adjustments",
    tag = "leave",
    request_body = CreateLeaveAdjustmentRequest,
    responses(
        (status = 201, description = "Adjustment recorded", body = ApiResponse<LeaveAdjustmentResponse>),
        (status = 400, description = "Invalid request or negative result", body = ErrorResponse),
        (status = 403, description = "Insufficient role", body = ErrorResponse),
        (status = 404, description = "Balance row not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_leave_adjustment(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<CreateLeaveAdjustmentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<LeaveAdjustmentResponse>>), ApiError> {
    trace!("Entering create_leave_adjustment function");
    require_role(&current, &[Role::Admin, Role::Hr])?;

    let adjustment_type = request
        .adjustment_type
        .parse::<AdjustmentType>()
        .map_err(ApiError::Validation)?;
    if request.amount <= Decimal::ZERO {
        return Err(ApiError::Validation(
            "Adjustment amount must be positive".to_string(),
        ));
    }
    if request.reason.trim().is_empty() {
        return Err(ApiError::Validation(
            "A reason is required for adjustments".to_string(),
        ));
    }

    leave_type::Entity::find_by_id(request.leave_type_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!("Leave type {} not found", request.leave_type_id))
        })?;

    let txn = state.db.begin().await?;

    let balance = leave_balance::Entity::find()
        .filter(leave_balance::Column::PersonnelId.eq(request.personnel_id))
        .filter(leave_balance::Column::LeaveTypeId.eq(request.leave_type_id))
        .filter(leave_balance::Column::Year.eq(request.year))
        .one(&txn)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!(
                "No balance row for personnel {} in {}",
                request.personnel_id, request.year
            ))
        })?;

    let previous = balance.total_credits;
    let new_total = match adjustment_type {
        AdjustmentType::Increase => previous + request.amount,
        AdjustmentType::Decrease => previous - request.amount,
    };
    if new_total < Decimal::ZERO {
        warn!(
            "Adjustment rejected: total would drop to {} for personnel {}",
            new_total, request.personnel_id
        );
        return Err(ApiError::Validation(
            "Adjustment would make total credits negative".to_string(),
        ));
    }

    let mut balance_active: leave_balance::ActiveModel = balance.into();
    balance_active.total_credits = Set(new_total);
    balance_active.last_updated = Set(chrono::Utc::now().naive_utc());
    balance_active.update(&txn).await?;

    let created = leave_adjustment::ActiveModel {
        personnel_id: Set(request.personnel_id),
        leave_type_id: Set(request.leave_type_id),
        year: Set(request.year),
        adjustment_type: Set(adjustment_type),
        adjustment_amount: Set(request.amount),
        previous_balance: Set(previous),
        new_balance: Set(new_total),
        reason: Set(request.reason.clone()),
        created_by: Set(current.id),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    audit_logs::record(
        &txn,
        Some(current.id),
        "ADJUST",
        "leave_balances",
        Some(created.id.to_string()),
        Some(format!(
            "{} {} credits: {} -> {}",
            adjustment_type.as_str(),
            request.amount,
            previous,
            new_total
        )),
    )
    .await;

    txn.commit().await?;

    info!(
        "Adjustment {} recorded for personnel {} by {}",
        created.id, request.personnel_id, current.username
    );
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            LeaveAdjustmentResponse::from(created),
            "Leave adjustment recorded successfully",
        )),
    ))
}
