use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use model::entities::user::Role;
use model::entities::{leave_application, leave_balance, leave_type};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::ToSchema;

use crate::auth::{require_role, CurrentUser};
use crate::error::ApiError;
use crate::handlers::audit_logs;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

#[derive(Debug, Serialize, ToSchema)]
pub struct LeaveTypeResponse {
    pub id: i32,
    pub leave_type_name: String,
    pub description: Option<String>,
    pub requires_document: bool,
    pub max_days: Option<i32>,
    pub is_active: bool,
}

impl From<leave_type::Model> for LeaveTypeResponse {
    fn from(model: leave_type::Model) -> Self {
        Self {
            id: model.id,
            leave_type_name: model.leave_type_name,
            description: model.description,
            requires_document: model.requires_document,
            max_days: model.max_days,
            is_active: model.is_active,
        }
    }
}

/// List leave types, active and inactive alike
#[utoipa::path(
    get,
    path = "/api/v1/leave/types",
    tag = "leave",
    responses(
        (status = 200, description = "Leave types retrieved successfully", body = ApiResponse<Vec<LeaveTypeResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_leave_types(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<Vec<LeaveTypeResponse>>>, ApiError> {
    trace!("Entering get_leave_types function");
    require_role(&current, &[Role::Admin, Role::Hr, Role::Employee])?;

    let types = leave_type::Entity::find()
        .order_by_asc(leave_type::Column::LeaveTypeName)
        .all(&state.db)
        .await?
        .into_iter()
        .map(LeaveTypeResponse::from)
        .collect::<Vec<_>>();

    debug!("Retrieved {} leave types", types.len());
    Ok(Json(ApiResponse::new(
        types,
        "Leave types retrieved successfully",
    )))
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateLeaveTypeRequest {
    pub leave_type_name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub requires_document: bool,
    pub max_days: Option<i32>,
}

/// Create a leave type
#[utoipa::path(
    post,
    path = "/api/v1/leave/types",
    tag = "leave",
    request_body = CreateLeaveTypeRequest,
    responses(
        (status = 201, description = "Leave type created", body = ApiResponse<LeaveTypeResponse>),
        (status = 409, description = "Name already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_leave_type(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<CreateLeaveTypeRequest>,
) -> Result<(StatusCode, Json<ApiResponse<LeaveTypeResponse>>), ApiError> {
    trace!("Entering create_leave_type function");
    require_role(&current, &[Role::Admin, Role::Hr])?;

    if request.leave_type_name.trim().is_empty() {
        return Err(ApiError::Validation(
            "Leave type name is required".to_string(),
        ));
    }
    if let Some(max_days) = request.max_days {
        if max_days <= 0 {
            return Err(ApiError::Validation(
                "Maximum days must be positive".to_string(),
            ));
        }
    }

    let existing = leave_type::Entity::find()
        .filter(leave_type::Column::LeaveTypeName.eq(request.leave_type_name.clone()))
        .one(&state.db)
        .await?;
    if existing.is_some() {
        return Err(ApiError::Conflict(
            "Leave type name already exists".to_string(),
        ));
    }

    let created = leave_type::ActiveModel {
        leave_type_name: Set(request.leave_type_name.clone()),
        description: Set(request.description.clone()),
        requires_document: Set(request.requires_document),
        max_days: Set(request.max_days),
        is_active: Set(true),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    audit_logs::record(
        &state.db,
        Some(current.id),
        "CREATE",
        "leave_types",
        Some(created.id.to_string()),
        Some(format!("Created leave type {}", created.leave_type_name)),
    )
    .await;

    info!("Leave type {} created", created.leave_type_name);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            LeaveTypeResponse::from(created),
            "Leave type created successfully",
        )),
    ))
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateLeaveTypeRequest {
    pub leave_type_name: Option<String>,
    pub description: Option<String>,
    pub requires_document: Option<bool>,
    pub max_days: Option<i32>,
    pub is_active: Option<bool>,
}

/// Update a leave type
#[utoipa::path(
    put,
    path = "/api/v1/leave/types/{leave_type_id}",
    tag = "leave",
    params(("leave_type_id" = i32, Path, description = "Leave type ID")),
    request_body = UpdateLeaveTypeRequest,
    responses(
        (status = 200, description = "Leave type updated", body = ApiResponse<LeaveTypeResponse>),
        (status = 404, description = "Leave type not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_leave_type(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(leave_type_id): Path<i32>,
    Json(request): Json<UpdateLeaveTypeRequest>,
) -> Result<Json<ApiResponse<LeaveTypeResponse>>, ApiError> {
    trace!("Entering update_leave_type for id: {}", leave_type_id);
    require_role(&current, &[Role::Admin, Role::Hr])?;

    let model = leave_type::Entity::find_by_id(leave_type_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Leave type {} not found", leave_type_id)))?;

    let mut active: leave_type::ActiveModel = model.into();
    if let Some(name) = request.leave_type_name {
        if name.trim().is_empty() {
            return Err(ApiError::Validation(
                "Leave type name is required".to_string(),
            ));
        }
        active.leave_type_name = Set(name);
    }
    if let Some(description) = request.description {
        active.description = Set(Some(description));
    }
    if let Some(requires_document) = request.requires_document {
        active.requires_document = Set(requires_document);
    }
    if let Some(max_days) = request.max_days {
        if max_days <= 0 {
            return Err(ApiError::Validation(
                "Maximum days must be positive".to_string(),
            ));
        }
        active.max_days = Set(Some(max_days));
    }
    if let Some(is_active) = request.is_active {
        active.is_active = Set(is_active);
    }

    let updated = active.update(&state.db).await?;

    audit_logs::record(
        &state.db,
        Some(current.id),
        "UPDATE",
        "leave_types",
        Some(leave_type_id.to_string()),
        None,
    )
    .await;

    info!("Leave type {} updated", updated.leave_type_name);
    Ok(Json(ApiResponse::new(
        LeaveTypeResponse::from(updated),
        "Leave type updated successfully",
    )))
}

/// Delete or deactivate a leave type
///
/// A type referenced by any balance or application is deactivated instead of
/// removed so the history behind it stays readable.
#[utoipa::path(
    delete,
    path = "/api/v1/leave/types/{leave_type_id}",
    tag = "leave",
    params(("leave_type_id" = i32, Path, description = "Leave type ID")),
    responses(
        (status = 200, description = "Leave type deleted or deactivated", body = ApiResponse<i32>),
        (status = 404, description = "Leave type not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_leave_type(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(leave_type_id): Path<i32>,
) -> Result<Json<ApiResponse<i32>>, ApiError> {
    trace!("Entering delete_leave_type for id: {}", leave_type_id);
    require_role(&current, &[Role::Admin, Role::Hr])?;

    let model = leave_type::Entity::find_by_id(leave_type_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Leave type {} not found", leave_type_id)))?;

    let balances = leave_balance::Entity::find()
        .filter(leave_balance::Column::LeaveTypeId.eq(leave_type_id))
        .count(&state.db)
        .await?;
    let applications = leave_application::Entity::find()
        .filter(leave_application::Column::LeaveTypeId.eq(leave_type_id))
        .count(&state.db)
        .await?;

    let message = if balances > 0 || applications > 0 {
        let name = model.leave_type_name.clone();
        let mut active: leave_type::ActiveModel = model.into();
        active.is_active = Set(false);
        active.update(&state.db).await?;
        warn!("Leave type {} deactivated, history retained", name);
        "Leave type deactivated; existing records reference it"
    } else {
        let name = model.leave_type_name.clone();
        model.delete(&state.db).await?;
        warn!("Leave type {} deleted by {}", name, current.username);
        "Leave type deleted successfully"
    };

    audit_logs::record(
        &state.db,
        Some(current.id),
        "DELETE",
        "leave_types",
        Some(leave_type_id.to_string()),
        None,
    )
    .await;

    Ok(Json(ApiResponse::new(leave_type_id, message)))
}
