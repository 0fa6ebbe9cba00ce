use axum::{
    extract::{Query, State},
    response::Json,
    Extension,
};
use chrono::NaiveDate;
use common::{Pagination, PaginationQuery};
use model::entities::audit_log;
use model::entities::user::Role;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace, warn};
use utoipa::ToSchema;

use crate::auth::{require_role, CurrentUser};
use crate::error::ApiError;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Insert an audit trail row. Failures are logged and swallowed so the
/// audited operation itself never fails on trail writes.
pub async fn record<C: ConnectionTrait>(
    conn: &C,
    user_id: Option<i32>,
    action_type: &str,
    table_affected: &str,
    record_id: Option<String>,
    details: Option<String>,
) {
    let row = audit_log::ActiveModel {
        user_id: Set(user_id),
        action_type: Set(action_type.to_string()),
        table_affected: Set(table_affected.to_string()),
        record_id: Set(record_id),
        action_details: Set(details),
        timestamp: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    };

    if let Err(e) = row.insert(conn).await {
        warn!(
            "Failed to write audit log for {} on {}: {}",
            action_type, table_affected, e
        );
    }
}

/// Filters accepted by the audit log listing
#[derive(Debug, Deserialize, ToSchema)]
pub struct AuditLogQuery {
    pub user_id: Option<i32>,
    pub action_type: Option<String>,
    pub table_affected: Option<String>,
    pub record_id: Option<String>,
    /// Inclusive lower bound (YYYY-MM-DD)
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound (YYYY-MM-DD)
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuditLogResponse {
    pub id: i32,
    pub user_id: Option<i32>,
    pub action_type: String,
    pub table_affected: String,
    pub record_id: Option<String>,
    pub action_details: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub timestamp: chrono::NaiveDateTime,
}

impl From<audit_log::Model> for AuditLogResponse {
    fn from(model: audit_log::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            action_type: model.action_type,
            table_affected: model.table_affected,
            record_id: model.record_id,
            action_details: model.action_details,
            ip_address: model.ip_address,
            user_agent: model.user_agent,
            timestamp: model.timestamp,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuditLogListResponse {
    pub logs: Vec<AuditLogResponse>,
    pub pagination: Pagination,
}

/// List the audit trail, newest first
#[utoipa::path(
    get,
    path = "/api/v1/audit-logs",
    tag = "system",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Audit logs retrieved successfully", body = ApiResponse<AuditLogListResponse>),
        (status = 403, description = "Insufficient role", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_audit_logs(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(pagination): Query<PaginationQuery>,
    Query(filter): Query<AuditLogQuery>,
) -> Result<Json<ApiResponse<AuditLogListResponse>>, ApiError> {
    trace!("Entering get_audit_logs function");
    require_role(&current, &[Role::Admin])?;

    let mut query = audit_log::Entity::find();
    if let Some(user_id) = filter.user_id {
        query = query.filter(audit_log::Column::UserId.eq(user_id));
    }
    if let Some(action_type) = &filter.action_type {
        query = query.filter(audit_log::Column::ActionType.eq(action_type.clone()));
    }
    if let Some(table) = &filter.table_affected {
        query = query.filter(audit_log::Column::TableAffected.eq(table.clone()));
    }
    if let Some(record_id) = &filter.record_id {
        query = query.filter(audit_log::Column::RecordId.eq(record_id.clone()));
    }
    if let Some(start) = filter.start_date {
        query = query.filter(
            audit_log::Column::Timestamp.gte(start.and_hms_opt(0, 0, 0).unwrap_or_default()),
        );
    }
    if let Some(end) = filter.end_date {
        query = query.filter(
            audit_log::Column::Timestamp.lte(end.and_hms_opt(23, 59, 59).unwrap_or_default()),
        );
    }

    let paginator = query
        .order_by_desc(audit_log::Column::Timestamp)
        .paginate(&state.db, pagination.limit());
    let total = paginator.num_items().await?;
    let logs = paginator.fetch_page(pagination.page_index()).await?;

    debug!("Retrieved {} of {} audit log rows", logs.len(), total);
    Ok(Json(ApiResponse::new(
        AuditLogListResponse {
            logs: logs.into_iter().map(AuditLogResponse::from).collect(),
            pagination: Pagination::new(&pagination, total),
        },
        "Audit logs retrieved successfully",
    )))
}
