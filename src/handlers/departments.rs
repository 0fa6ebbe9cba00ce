use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use common::{Pagination, PaginationQuery};
use model::entities::user::Role;
use model::entities::{department, job_posting, personnel, user};
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
pub struct DepartmentResponse {
    pub id: i32,
    pub department_name: String,
    pub description: Option<String>,
    pub department_head: Option<i32>,
    pub department_head_name: Option<String>,
    pub parent_department_id: Option<i32>,
    pub personnel_count: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DepartmentListResponse {
    pub departments: Vec<DepartmentResponse>,
    pub pagination: Pagination,
}

async fn to_response(
    state: &AppState,
    model: department::Model,
) -> Result<DepartmentResponse, ApiError> {
    let head_name = match model.department_head {
        Some(head_id) => user::Entity::find_by_id(head_id)
            .one(&state.db)
            .await?
            .map(|u| u.username),
        None => None,
    };
    let personnel_count = personnel::Entity::find()
        .filter(personnel::Column::DepartmentId.eq(model.id))
        .count(&state.db)
        .await?;

    Ok(DepartmentResponse {
        id: model.id,
        department_name: model.department_name,
        description: model.description,
        department_head: model.department_head,
        department_head_name: head_name,
        parent_department_id: model.parent_department_id,
        personnel_count,
    })
}

/// List departments
#[utoipa::path(
    get,
    path = "/api/v1/departments",
    tag = "system",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Departments retrieved successfully", body = ApiResponse<DepartmentListResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_departments(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<DepartmentListResponse>>, ApiError> {
    trace!("Entering get_departments function");
    require_role(&current, &[Role::Admin, Role::Hr, Role::Employee])?;

    let paginator = department::Entity::find()
        .order_by_asc(department::Column::DepartmentName)
        .paginate(&state.db, pagination.limit());
    let total = paginator.num_items().await?;
    let rows = paginator.fetch_page(pagination.page_index()).await?;

    let mut departments = Vec::with_capacity(rows.len());
    for row in rows {
        departments.push(to_response(&state, row).await?);
    }

    debug!("Retrieved {} of {} departments", departments.len(), total);
    Ok(Json(ApiResponse::new(
        DepartmentListResponse {
            departments,
            pagination: Pagination::new(&pagination, total),
        },
        "Departments retrieved successfully",
    )))
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateDepartmentRequest {
    pub department_name: String,
    pub description: Option<String>,
    pub department_head: Option<i32>,
    pub parent_department_id: Option<i32>,
}

/// Create a department
#[utoipa::path(
    post,
    path = "/api/v1/departments",
    tag = "system",
    request_body = CreateDepartmentRequest,
    responses(
        (status = 201, description = "Department created successfully", body = ApiResponse<DepartmentResponse>),
        (status = 409, description = "Department name already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_department(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<CreateDepartmentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<DepartmentResponse>>), ApiError> {
    trace!("Entering create_department function");
    require_role(&current, &[Role::Admin])?;

    if request.department_name.trim().is_empty() {
        return Err(ApiError::Validation(
            "Department name is required".to_string(),
        ));
    }

    let existing = department::Entity::find()
        .filter(department::Column::DepartmentName.eq(request.department_name.clone()))
        .one(&state.db)
        .await?;
    if existing.is_some() {
        return Err(ApiError::Conflict(
            "Department name already exists".to_string(),
        ));
    }

    if let Some(parent_id) = request.parent_department_id {
        department::Entity::find_by_id(parent_id)
            .one(&state.db)
            .await?
            .ok_or_else(|| ApiError::Validation("Parent department not found".to_string()))?;
    }

    let created = department::ActiveModel {
        department_name: Set(request.department_name.clone()),
        description: Set(request.description.clone()),
        department_head: Set(request.department_head),
        parent_department_id: Set(request.parent_department_id),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    audit_logs::record(
        &state.db,
        Some(current.id),
        "CREATE",
        "departments",
        Some(created.id.to_string()),
        Some(format!("Created department {}", created.department_name)),
    )
    .await;

    info!("Department {} created", created.department_name);
    let response = to_response(&state, created).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            response,
            "Department created successfully",
        )),
    ))
}

/// Get a department by ID
#[utoipa::path(
    get,
    path = "/api/v1/departments/{department_id}",
    tag = "system",
    params(("department_id" = i32, Path, description = "Department ID")),
    responses(
        (status = 200, description = "Department retrieved successfully", body = ApiResponse<DepartmentResponse>),
        (status = 404, description = "Department not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_department(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(department_id): Path<i32>,
) -> Result<Json<ApiResponse<DepartmentResponse>>, ApiError> {
    trace!("Entering get_department for department_id: {}", department_id);
    require_role(&current, &[Role::Admin, Role::Hr, Role::Employee])?;

    let model = department::Entity::find_by_id(department_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Department {} not found", department_id)))?;

    let response = to_response(&state, model).await?;
    Ok(Json(ApiResponse::new(
        response,
        "Department retrieved successfully",
    )))
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateDepartmentRequest {
    pub department_name: Option<String>,
    pub description: Option<String>,
    pub department_head: Option<i32>,
    pub parent_department_id: Option<i32>,
}

/// Update a department
#[utoipa::path(
    put,
    path = "/api/v1/departments/{department_id}",
    tag = "system",
    params(("department_id" = i32, Path, description = "Department ID")),
    request_body = UpdateDepartmentRequest,
    responses(
        (status = 200, description = "Department updated successfully", body = ApiResponse<DepartmentResponse>),
        (status = 404, description = "Department not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_department(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(department_id): Path<i32>,
    Json(request): Json<UpdateDepartmentRequest>,
) -> Result<Json<ApiResponse<DepartmentResponse>>, ApiError> {
    trace!("Entering update_department for department_id: {}", department_id);
    require_role(&current, &[Role::Admin])?;

    let model = department::Entity::find_by_id(department_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Department {} not found", department_id)))?;

    if let Some(parent_id) = request.parent_department_id {
        if parent_id == department_id {
            return Err(ApiError::Validation(
                "A department cannot be its own parent".to_string(),
            ));
        }
    }

    let mut active: department::ActiveModel = model.into();
    if let Some(name) = request.department_name {
        active.department_name = Set(name);
    }
    if let Some(description) = request.description {
        active.description = Set(Some(description));
    }
    if let Some(head) = request.department_head {
        active.department_head = Set(Some(head));
    }
    if let Some(parent_id) = request.parent_department_id {
        active.parent_department_id = Set(Some(parent_id));
    }

    let updated = active.update(&state.db).await?;

    audit_logs::record(
        &state.db,
        Some(current.id),
        "UPDATE",
        "departments",
        Some(department_id.to_string()),
        None,
    )
    .await;

    info!("Department {} updated", updated.department_name);
    let response = to_response(&state, updated).await?;
    Ok(Json(ApiResponse::new(
        response,
        "Department updated successfully",
    )))
}

/// Delete a department
///
/// Rejected while any personnel or job posting still points at it.
#[utoipa::path(
    delete,
    path = "/api/v1/departments/{department_id}",
    tag = "system",
    params(("department_id" = i32, Path, description = "Department ID")),
    responses(
        (status = 200, description = "Department deleted", body = ApiResponse<i32>),
        (status = 400, description = "Department still has personnel", body = ErrorResponse),
        (status = 404, description = "Department not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_department(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(department_id): Path<i32>,
) -> Result<Json<ApiResponse<i32>>, ApiError> {
    trace!("Entering delete_department for department_id: {}", department_id);
    require_role(&current, &[Role::Admin])?;

    let model = department::Entity::find_by_id(department_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Department {} not found", department_id)))?;

    let members = personnel::Entity::find()
        .filter(personnel::Column::DepartmentId.eq(department_id))
        .count(&state.db)
        .await?;
    if members > 0 {
        return Err(ApiError::Validation(format!(
            "Department still has {} personnel assigned",
            members
        )));
    }

    let postings = job_posting::Entity::find()
        .filter(job_posting::Column::DepartmentId.eq(department_id))
        .count(&state.db)
        .await?;
    if postings > 0 {
        return Err(ApiError::Validation(format!(
            "Department still has {} job postings attached",
            postings
        )));
    }

    let name = model.department_name.clone();
    model.delete(&state.db).await?;

    audit_logs::record(
        &state.db,
        Some(current.id),
        "DELETE",
        "departments",
        Some(department_id.to_string()),
        Some(format!("Deleted department {}", name)),
    )
    .await;

    warn!("Department {} deleted by {}", name, current.username);
    Ok(Json(ApiResponse::new(
        department_id,
        "Department deleted successfully",
    )))
}
