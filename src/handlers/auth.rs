use axum::{extract::State, http::StatusCode, response::Json, Extension};
use model::entities::user::{Role, UserStatus};
use model::entities::{job_applicant, personnel, user};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::ToSchema;

use crate::auth::{
    hash_password, is_valid_email, validate_password_strength, verify_password, CurrentUser,
};
use crate::error::ApiError;
use crate::handlers::audit_logs;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Public account info attached to login and profile responses
#[derive(Debug, Serialize, ToSchema)]
pub struct UserInfo {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub role: String,
    pub status: String,
    pub profile_picture: Option<String>,
}

impl From<user::Model> for UserInfo {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            role: model.role.as_str().to_string(),
            status: model.status.as_str().to_string(),
            profile_picture: model.profile_picture,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub refresh_token: String,
    pub user: UserInfo,
}

/// Issue a fresh access/refresh token pair for a user.
fn issue_tokens(state: &AppState, account: user::Model) -> Result<LoginResponse, ApiError> {
    let token = state
        .jwt
        .generate_token(&account)
        .map_err(|e| ApiError::Internal(format!("token generation failed: {e}")))?;
    let refresh_token = state
        .jwt
        .generate_refresh_token(&account)
        .map_err(|e| ApiError::Internal(format!("token generation failed: {e}")))?;
    Ok(LoginResponse {
        token,
        refresh_token,
        user: UserInfo::from(account),
    })
}

/// Authenticate with username and password
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    trace!("Entering login function");
    debug!("Login attempt for username: {}", request.username);

    let user_model = user::Entity::find()
        .filter(user::Column::Username.eq(request.username.clone()))
        .one(&state.db)
        .await?;

    // Unknown username and wrong password answer identically
    let Some(user_model) = user_model else {
        warn!("Login failed: unknown username {}", request.username);
        return Err(ApiError::InvalidCredentials);
    };

    if !verify_password(&request.password, &user_model.password_hash) {
        warn!("Login failed: wrong password for {}", request.username);
        return Err(ApiError::InvalidCredentials);
    }

    if user_model.status != UserStatus::Active {
        warn!("Login rejected for inactive account {}", request.username);
        return Err(ApiError::Forbidden("Account is inactive".to_string()));
    }

    audit_logs::record(
        &state.db,
        Some(user_model.id),
        "LOGIN",
        "users",
        Some(user_model.id.to_string()),
        None,
    )
    .await;

    info!("User {} logged in", user_model.username);
    let response = issue_tokens(&state, user_model)?;
    Ok(Json(ApiResponse::new(response, "Login successful")))
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Exchange a refresh token for a fresh token pair
///
/// The account is re-checked on every exchange so deactivating a user also
/// cuts off their refresh tokens.
#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh",
    tag = "auth",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Token refreshed", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid or expired refresh token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    trace!("Entering refresh function");

    let claims = state
        .jwt
        .validate_refresh_token(&request.refresh_token)
        .map_err(|e| {
            warn!("Refresh rejected: {}", e);
            ApiError::InvalidToken
        })?;

    let user_model = user::Entity::find_by_id(claims.sub)
        .one(&state.db)
        .await?
        .ok_or(ApiError::InvalidToken)?;

    if user_model.status != UserStatus::Active {
        warn!("Refresh rejected for inactive account {}", user_model.username);
        return Err(ApiError::InvalidToken);
    }

    debug!("Refreshed tokens for user {}", user_model.username);
    let response = issue_tokens(&state, user_model)?;
    Ok(Json(ApiResponse::new(response, "Token refreshed")))
}

/// Acknowledge a logout
///
/// Tokens are stateless, so this only records the event for the audit trail.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Logged out", body = ApiResponse<i32>),
        (status = 401, description = "Authentication required", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn logout(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<i32>>, ApiError> {
    audit_logs::record(
        &state.db,
        Some(current.id),
        "LOGOUT",
        "users",
        Some(current.id.to_string()),
        None,
    )
    .await;

    info!("User {} logged out", current.username);
    Ok(Json(ApiResponse::new(current.id, "Logged out successfully")))
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
    pub phone: Option<String>,
}

/// Register a job portal account
///
/// Creates an Applicant-role login together with its portal profile in a
/// single transaction and returns a token so the caller is logged in
/// immediately.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<LoginResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Username or email already taken", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn register_applicant(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<LoginResponse>>), ApiError> {
    trace!("Entering register_applicant function");

    if !is_valid_email(&request.email) {
        return Err(ApiError::Validation("Invalid email address".to_string()));
    }
    validate_password_strength(&request.password)?;
    if request.username.trim().is_empty()
        || request.first_name.trim().is_empty()
        || request.last_name.trim().is_empty()
    {
        return Err(ApiError::Validation(
            "Username, first name and last name are required".to_string(),
        ));
    }

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

    let password_hash = hash_password(&request.password)?;
    let now = chrono::Utc::now().naive_utc();

    let txn = state.db.begin().await?;

    let account = user::ActiveModel {
        username: Set(request.username.clone()),
        email: Set(request.email.clone()),
        password_hash: Set(password_hash),
        role: Set(Role::Applicant),
        status: Set(UserStatus::Active),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    job_applicant::ActiveModel {
        user_id: Set(account.id),
        first_name: Set(request.first_name.clone()),
        last_name: Set(request.last_name.clone()),
        middle_name: Set(request.middle_name.clone()),
        email: Set(request.email.clone()),
        phone: Set(request.phone.clone()),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    audit_logs::record(
        &txn,
        Some(account.id),
        "REGISTER",
        "users",
        Some(account.id.to_string()),
        Some("Applicant self-registration".to_string()),
    )
    .await;

    txn.commit().await?;

    info!("Applicant account {} registered", account.username);
    let response = issue_tokens(&state, account)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(response, "Account created successfully")),
    ))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub user: UserInfo,
    pub personnel_id: Option<i32>,
}

/// Return the authenticated caller's account
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "auth",
    responses(
        (status = 200, description = "Profile retrieved successfully", body = ApiResponse<ProfileResponse>),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn me(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<ProfileResponse>>, ApiError> {
    trace!("Entering me function for user {}", current.id);

    let user_model = user::Entity::find_by_id(current.id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Account no longer exists".to_string()))?;

    let personnel_id = personnel::Entity::find()
        .filter(personnel::Column::UserId.eq(current.id))
        .one(&state.db)
        .await?
        .map(|p| p.id);

    Ok(Json(ApiResponse::new(
        ProfileResponse {
            user: UserInfo::from(user_model),
            personnel_id,
        },
        "Profile retrieved successfully",
    )))
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Change the caller's own password
#[utoipa::path(
    post,
    path = "/api/v1/auth/change-password",
    tag = "auth",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = ApiResponse<UserInfo>),
        (status = 400, description = "Weak password", body = ErrorResponse),
        (status = 401, description = "Wrong current password", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn change_password(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<UserInfo>>, ApiError> {
    trace!("Entering change_password function for user {}", current.id);

    let user_model = user::Entity::find_by_id(current.id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Account no longer exists".to_string()))?;

    if !verify_password(&request.current_password, &user_model.password_hash) {
        warn!("Password change rejected for user {}", current.id);
        return Err(ApiError::InvalidCredentials);
    }
    validate_password_strength(&request.new_password)?;

    let mut active: user::ActiveModel = user_model.into();
    active.password_hash = Set(hash_password(&request.new_password)?);
    active.updated_at = Set(chrono::Utc::now().naive_utc());
    let updated = active.update(&state.db).await?;

    audit_logs::record(
        &state.db,
        Some(current.id),
        "UPDATE",
        "users",
        Some(current.id.to_string()),
        Some("Password changed".to_string()),
    )
    .await;

    info!("Password changed for user {}", updated.username);
    Ok(Json(ApiResponse::new(
        UserInfo::from(updated),
        "Password changed successfully",
    )))
}
