use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use common::{Pagination, PaginationQuery};
use model::entities::user::{self, Role, UserStatus};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::ToSchema;

use crate::auth::{
    hash_password, is_valid_email, require_role, validate_password_strength, CurrentUser,
};
use crate::error::ApiError;
use crate::handlers::audit_logs;
use crate::handlers::auth::UserInfo;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Filters accepted by the user listing
#[derive(Debug, Deserialize, ToSchema)]
pub struct UserListQuery {
    pub role: Option<String>,
    pub status: Option<String>,
    /// Matches against username and email
    pub search: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserListResponse {
    pub users: Vec<UserInfo>,
    pub pagination: Pagination,
}

/// List login accounts
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "system",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Users retrieved successfully", body = ApiResponse<UserListResponse>),
        (status = 403, description = "Insufficient role", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_users(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(pagination): Query<PaginationQuery>,
    Query(filter): Query<UserListQuery>,
) -> Result<Json<ApiResponse<UserListResponse>>, ApiError> {
    trace!("Entering get_users function");
    require_role(&current, &[Role::Admin])?;

    let mut query = user::Entity::find();
    if let Some(role) = &filter.role {
        let role = role
            .parse::<Role>()
            .map_err(ApiError::Validation)?;
        query = query.filter(user::Column::Role.eq(role));
    }
    if let Some(status) = &filter.status {
        let status = status
            .parse::<UserStatus>()
            .map_err(ApiError::Validation)?;
        query = query.filter(user::Column::Status.eq(status));
    }
    if let Some(search) = &filter.search {
        let pattern = format!("%{}%", search);
        query = query.filter(
            user::Column::Username
                .like(pattern.clone())
                .or(user::Column::Email.like(pattern)),
        );
    }

    let paginator = query
        .order_by_asc(user::Column::Username)
        .paginate(&state.db, pagination.limit());
    let total = paginator.num_items().await?;
    let users = paginator.fetch_page(pagination.page_index()).await?;

    debug!("Retrieved {} of {} users", users.len(), total);
    Ok(Json(ApiResponse::new(
        UserListResponse {
            users: users.into_iter().map(UserInfo::from).collect(),
            pagination: Pagination::new(&pagination, total),
        },
        "Users retrieved successfully",
    )))
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    /// One of Admin, HR, Employee, Applicant
    pub role: String,
}

/// Create a login account
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "system",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created successfully", body = ApiResponse<UserInfo>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Username or email already taken", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn create_user(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserInfo>>), ApiError> {
    trace!("Entering create_user function");
    require_role(&current, &[Role::Admin])?;

    let role = request
        .role
        .parse::<Role>()
        .map_err(ApiError::Validation)?;
    if !is_valid_email(&request.email) {
        return Err(ApiError::Validation("Invalid email address".to_string()));
    }
    validate_password_strength(&request.password)?;

    let taken = user::Entity::find()
        .filter(
            user::Column::Username
                .eq(request.username.clone())
                .or(user::Column::Email.eq(request.email.clone())),
        )
        .one(&state.db)
        .await?;
    if taken.is_some() {
        return Err(ApiError::Conflict(
            "Username or email already taken".to_string(),
        ));
    }

    let now = chrono::Utc::now().naive_utc();
    let created = user::ActiveModel {
        username: Set(request.username.clone()),
        email: Set(request.email.clone()),
        password_hash: Set(hash_password(&request.password)?),
        role: Set(role),
        status: Set(UserStatus::Active),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    audit_logs::record(
        &state.db,
        Some(current.id),
        "CREATE",
        "users",
        Some(created.id.to_string()),
        Some(format!("Created {} account {}", request.role, created.username)),
    )
    .await;

    info!("User {} created with role {}", created.username, request.role);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            UserInfo::from(created),
            "User created successfully",
        )),
    ))
}

/// Get a single account by ID
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}",
    tag = "system",
    params(("user_id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User retrieved successfully", body = ApiResponse<UserInfo>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(user_id): Path<i32>,
) -> Result<Json<ApiResponse<UserInfo>>, ApiError> {
    trace!("Entering get_user function for user_id: {}", user_id);
    require_role(&current, &[Role::Admin])?;

    let user_model = user::Entity::find_by_id(user_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User {} not found", user_id)))?;

    Ok(Json(ApiResponse::new(
        UserInfo::from(user_model),
        "User retrieved successfully",
    )))
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
    pub profile_picture: Option<String>,
}

/// Update an account's email, role, status or picture
#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}",
    tag = "system",
    params(("user_id" = i32, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated successfully", body = ApiResponse<UserInfo>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn update_user(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(user_id): Path<i32>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserInfo>>, ApiError> {
    trace!("Entering update_user function for user_id: {}", user_id);
    require_role(&current, &[Role::Admin])?;

    let user_model = user::Entity::find_by_id(user_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User {} not found", user_id)))?;

    let mut active: user::ActiveModel = user_model.into();
    if let Some(email) = request.email {
        if !is_valid_email(&email) {
            return Err(ApiError::Validation("Invalid email address".to_string()));
        }
        active.email = Set(email);
    }
    if let Some(role) = request.role {
        active.role = Set(role.parse::<Role>().map_err(ApiError::Validation)?);
    }
    if let Some(status) = request.status {
        active.status = Set(status
            .parse::<UserStatus>()
            .map_err(ApiError::Validation)?);
    }
    if let Some(picture) = request.profile_picture {
        active.profile_picture = Set(Some(picture));
    }
    active.updated_at = Set(chrono::Utc::now().naive_utc());

    let updated = active.update(&state.db).await?;

    audit_logs::record(
        &state.db,
        Some(current.id),
        "UPDATE",
        "users",
        Some(user_id.to_string()),
        None,
    )
    .await;

    info!("User {} updated", updated.username);
    Ok(Json(ApiResponse::new(
        UserInfo::from(updated),
        "User updated successfully",
    )))
}

/// Deactivate an account
///
/// The row is kept so audit history and foreign keys stay intact; the account
/// simply can no longer log in.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{user_id}",
    tag = "system",
    params(("user_id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deactivated", body = ApiResponse<UserInfo>),
        (status = 400, description = "Cannot deactivate own account", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(user_id): Path<i32>,
) -> Result<Json<ApiResponse<UserInfo>>, ApiError> {
    trace!("Entering delete_user function for user_id: {}", user_id);
    require_role(&current, &[Role::Admin])?;

    if user_id == current.id {
        return Err(ApiError::Validation(
            "Cannot deactivate your own account".to_string(),
        ));
    }

    let user_model = user::Entity::find_by_id(user_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User {} not found", user_id)))?;

    let mut active: user::ActiveModel = user_model.into();
    active.status = Set(UserStatus::Inactive);
    active.updated_at = Set(chrono::Utc::now().naive_utc());
    let updated = active.update(&state.db).await?;

    audit_logs::record(
        &state.db,
        Some(current.id),
        "DELETE",
        "users",
        Some(user_id.to_string()),
        Some("Account deactivated".to_string()),
    )
    .await;

    warn!("User {} deactivated by {}", updated.username, current.username);
    Ok(Json(ApiResponse::new(
        UserInfo::from(updated),
        "User deactivated successfully",
    )))
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ResetPasswordRequest {
    pub new_password: String,
}

/// Reset another account's password
#[utoipa::path(
    post,
    path = "/api/v1/users/{user_id}/reset-password",
    tag = "system",
    params(("user_id" = i32, Path, description = "User ID")),
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset", body = ApiResponse<UserInfo>),
        (status = 400, description = "Weak password", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn reset_password(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(user_id): Path<i32>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<Json<ApiResponse<UserInfo>>, ApiError> {
    trace!("Entering reset_password function for user_id: {}", user_id);
    require_role(&current, &[Role::Admin])?;
    validate_password_strength(&request.new_password)?;

    let user_model = user::Entity::find_by_id(user_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User {} not found", user_id)))?;

    let mut active: user::ActiveModel = user_model.into();
    active.password_hash = Set(hash_password(&request.new_password)?);
    active.updated_at = Set(chrono::Utc::now().naive_utc());
    let updated = active.update(&state.db).await?;

    audit_logs::record(
        &state.db,
        Some(current.id),
        "UPDATE",
        "users",
        Some(user_id.to_string()),
        Some("Password reset by administrator".to_string()),
    )
    .await;

    info!("Password reset for user {}", updated.username);
    Ok(Json(ApiResponse::new(
        UserInfo::from(updated),
        "Password reset successfully",
    )))
}
