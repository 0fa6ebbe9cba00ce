use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use chrono::Datelike;
use common::{Pagination, PaginationQuery};
use model::entities::user::Role;
use model::entities::{leave_balance, leave_type, personnel};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};
use utoipa::ToSchema;

use crate::auth::{require_role, CurrentUser};
use crate::error::ApiError;
use crate::handlers::audit_logs;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Credits still available on a ledger row.
pub fn remaining_credits(balance: &leave_balance::Model) -> Decimal {
    balance.total_credits + balance.earned_credits - balance.used_credits
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LeaveBalanceResponse {
    pub id: i32,
    pub personnel_id: i32,
    pub leave_type_id: i32,
    pub leave_type_name: Option<String>,
    pub year: i32,
    #[schema(value_type = String)]
    pub total_credits: Decimal,
    #[schema(value_type = String)]
    pub used_credits: Decimal,
    #[schema(value_type = String)]
    pub earned_credits: Decimal,
    #[schema(value_type = String)]
    pub remaining_credits: Decimal,
    pub last_updated: chrono::NaiveDateTime,
}

impl LeaveBalanceResponse {
    pub fn new(model: leave_balance::Model, leave_type_name: Option<String>) -> Self {
        let remaining = remaining_credits(&model);
        Self {
            id: model.id,
            personnel_id: model.personnel_id,
            leave_type_id: model.leave_type_id,
            leave_type_name,
            year: model.year,
            total_credits: model.total_credits,
            used_credits: model.used_credits,
            earned_credits: model.earned_credits,
            remaining_credits: remaining,
            last_updated: model.last_updated,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LeaveBalanceQuery {
    pub personnel_id: Option<i32>,
    pub leave_type_id: Option<i32>,
    pub year: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LeaveBalanceListResponse {
    pub balances: Vec<LeaveBalanceResponse>,
    pub pagination: Pagination,
}

/// List leave balances
#[utoipa::path(
    get,
    path = "/api/v1/leave/balances",
    tag = "leave",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Balances retrieved successfully", body = ApiResponse<LeaveBalanceListResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_leave_balances(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(pagination): Query<PaginationQuery>,
    Query(filter): Query<LeaveBalanceQuery>,
) -> Result<Json<ApiResponse<LeaveBalanceListResponse>>, ApiError> {
    trace!("Entering get_leave_balances function");
    require_role(&current, &[Role::Admin, Role::Hr])?;

    let mut query = leave_balance::Entity::find();
    if let Some(personnel_id) = filter.personnel_id {
        query = query.filter(leave_balance::Column::PersonnelId.eq(personnel_id));
    }
    if let Some(leave_type_id) = filter.leave_type_id {
        query = query.filter(leave_balance::Column::LeaveTypeId.eq(leave_type_id));
    }
    if let Some(year) = filter.year {
        query = query.filter(leave_balance::Column::Year.eq(year));
    }

    let paginator = query
        .order_by_desc(leave_balance::Column::Year)
        .order_by_asc(leave_balance::Column::PersonnelId)
        .paginate(&state.db, pagination.limit());
    let total = paginator.num_items().await?;
    let rows = paginator.fetch_page(pagination.page_index()).await?;

    let type_names: std::collections::HashMap<i32, String> = leave_type::Entity::find()
        .all(&state.db)
        .await?
        .into_iter()
        .map(|t| (t.id, t.leave_type_name))
        .collect();

    let balances = rows
        .into_iter()
        .map(|row| {
            let name = type_names.get(&row.leave_type_id).cloned();
            LeaveBalanceResponse::new(row, name)
        })
        .collect::<Vec<_>>();

    debug!("Retrieved {} of {} leave balances", balances.len(), total);
    Ok(Json(ApiResponse::new(
        LeaveBalanceListResponse {
            balances,
            pagination: Pagination::new(&pagination, total),
        },
        "Leave balances retrieved successfully",
    )))
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct InitializeBalancesRequest {
    /// Defaults to the current year.
    pub year: Option<i32>,
    pub leave_type_id: i32,
    #[schema(value_type = String)]
    pub total_credits: Decimal,
    /// Limit initialization to these personnel; omitted means everyone.
    pub personnel_ids: Option<Vec<i32>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InitializeBalancesResponse {
    pub year: i32,
    pub created: usize,
    pub skipped: usize,
}

/// Initialize yearly balance rows
///
/// Creates one ledger row per personnel for the given leave type and year.
/// Personnel that already have a row for that triple are skipped, so the
/// call is safe to repeat.
#[utoipa::path(
    post,
    path = "/api/v1/leave/balances/initialize",
    tag = "leave",
    request_body = InitializeBalancesRequest,
    responses(
        (status = 201, description = "Balances initialized", body = ApiResponse<InitializeBalancesResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Leave type not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn initialize_leave_balances(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<InitializeBalancesRequest>,
) -> Result<(StatusCode, Json<ApiResponse<InitializeBalancesResponse>>), ApiError> {
    trace!("Entering initialize_leave_balances function");
    require_role(&current, &[Role::Admin, Role::Hr])?;

    if request.total_credits < Decimal::ZERO {
        return Err(ApiError::Validation(
            "Total credits cannot be negative".to_string(),
        ));
    }

    let lt = leave_type::Entity::find_by_id(request.leave_type_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!("Leave type {} not found", request.leave_type_id))
        })?;

    let year = request
        .year
        .unwrap_or_else(|| chrono::Utc::now().date_naive().year());

    let mut people = personnel::Entity::find();
    if let Some(ids) = &request.personnel_ids {
        people = people.filter(personnel::Column::Id.is_in(ids.clone()));
    }
    let people = people.all(&state.db).await?;

    let existing: std::collections::HashSet<i32> = leave_balance::Entity::find()
        .filter(leave_balance::Column::LeaveTypeId.eq(lt.id))
        .filter(leave_balance::Column::Year.eq(year))
        .all(&state.db)
        .await?
        .into_iter()
        .map(|b| b.personnel_id)
        .collect();

    let now = chrono::Utc::now().naive_utc();
    let txn = state.db.begin().await?;

    let mut created = 0;
    let mut skipped = 0;
    for person in &people {
        if existing.contains(&person.id) {
            skipped += 1;
            continue;
        }
        leave_balance::ActiveModel {
            personnel_id: Set(person.id),
            leave_type_id: Set(lt.id),
            year: Set(year),
            total_credits: Set(request.total_credits),
            used_credits: Set(Decimal::ZERO),
            earned_credits: Set(Decimal::ZERO),
            last_updated: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        created += 1;
    }

    audit_logs::record(
        &txn,
        Some(current.id),
        "CREATE",
        "leave_balances",
        None,
        Some(format!(
            "Initialized {} {} balances for {} ({} skipped)",
            created, lt.leave_type_name, year, skipped
        )),
    )
    .await;

    txn.commit().await?;

    info!(
        "Initialized {} balances for leave type {} in {}",
        created, lt.leave_type_name, year
    );
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            InitializeBalancesResponse {
                year,
                created,
                skipped,
            },
            "Leave balances initialized successfully",
        )),
    ))
}

/// Get a single balance row
#[utoipa::path(
    get,
    path = "/api/v1/leave/balances/{balance_id}",
    tag = "leave",
    params(("balance_id" = i32, Path, description = "Balance ID")),
    responses(
        (status = 200, description = "Balance retrieved successfully", body = ApiResponse<LeaveBalanceResponse>),
        (status = 404, description = "Balance not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_leave_balance(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(balance_id): Path<i32>,
) -> Result<Json<ApiResponse<LeaveBalanceResponse>>, ApiError> {
    trace!("Entering get_leave_balance for id: {}", balance_id);
    require_role(&current, &[Role::Admin, Role::Hr])?;

    let model = leave_balance::Entity::find_by_id(balance_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Leave balance {} not found", balance_id)))?;

    let type_name = leave_type::Entity::find_by_id(model.leave_type_id)
        .one(&state.db)
        .await?
        .map(|t| t.leave_type_name);

    Ok(Json(ApiResponse::new(
        LeaveBalanceResponse::new(model, type_name),
        "Leave balance retrieved successfully",
    )))
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateLeaveBalanceRequest {
    #[schema(value_type = Option<String>)]
    pub earned_credits: Option<Decimal>,
}

/// Update earned credits on a balance row
///
/// Only `earned_credits` can be edited directly. Total credits move through
/// adjustments and used credits through approvals, each leaving an audit
/// trail of its own.
#[utoipa::path(
    put,
    path = "/api/v1/leave/balances/{balance_id}",
    tag = "leave",
    params(("balance_id" = i32, Path, description = "Balance ID")),
    request_body = UpdateLeaveBalanceRequest,
    responses(
        (status = 200, description = "Balance updated successfully", body = ApiResponse<LeaveBalanceResponse>),
        (status = 404, description = "Balance not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_leave_balance(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(balance_id): Path<i32>,
    Json(request): Json<UpdateLeaveBalanceRequest>,
) -> Result<Json<ApiResponse<LeaveBalanceResponse>>, ApiError> {
    trace!("Entering update_leave_balance for id: {}", balance_id);
    require_role(&current, &[Role::Admin, Role::Hr])?;

    let model = leave_balance::Entity::find_by_id(balance_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Leave balance {} not found", balance_id)))?;

    let mut active: leave_balance::ActiveModel = model.into();
    if let Some(earned) = request.earned_credits {
        if earned < Decimal::ZERO {
            return Err(ApiError::Validation(
                "Earned credits cannot be negative".to_string(),
            ));
        }
        active.earned_credits = Set(earned);
    }
    active.last_updated = Set(chrono::Utc::now().naive_utc());
    let updated = active.update(&state.db).await?;

    audit_logs::record(
        &state.db,
        Some(current.id),
        "UPDATE",
        "leave_balances",
        Some(balance_id.to_string()),
        None,
    )
    .await;

    let type_name = leave_type::Entity::find_by_id(updated.leave_type_id)
        .one(&state.db)
        .await?
        .map(|t| t.leave_type_name);

    info!("Leave balance {} updated", balance_id);
    Ok(Json(ApiResponse::new(
        LeaveBalanceResponse::new(updated, type_name),
        "Leave balance updated successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balance(total: i64, used: i64, earned: i64) -> leave_balance::Model {
        leave_balance::Model {
            id: 1,
            personnel_id: 1,
            leave_type_id: 1,
            year: 2026,
            total_credits: Decimal::from(total),
            used_credits: Decimal::from(used),
            earned_credits: Decimal::from(earned),
            last_updated: chrono::Utc::now().naive_utc(),
        }
    }

    #[test]
    fn remaining_counts_earned_credits() {
        assert_eq!(remaining_credits(&balance(15, 4, 2)), Decimal::from(13));
        assert_eq!(remaining_credits(&balance(5, 5, 0)), Decimal::ZERO);
    }
}
