//! Employee self-service: own profile, 201-file documents, leave data and
//! notifications. Everything here is scoped to the authenticated account.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    Extension,
};
use chrono::Datelike;
use model::entities::user::Role;
use model::entities::{
    department, employee_document, leave_application, leave_balance, leave_type, notification,
    personnel,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, instrument, trace};
use utoipa::ToSchema;

use crate::auth::{require_role, CurrentUser};
use crate::error::ApiError;
use crate::handlers::leave::applications::LeaveApplicationResponse;
use crate::handlers::leave::balances::LeaveBalanceResponse;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

async fn own_personnel(state: &AppState, current: &CurrentUser) -> Result<personnel::Model, ApiError> {
    personnel::Entity::find()
        .filter(personnel::Column::UserId.eq(current.id))
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("No personnel record for this account".to_string()))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MyProfileResponse {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
    pub date_of_birth: Option<chrono::NaiveDate>,
    pub gender: Option<String>,
    pub civil_status: Option<String>,
    pub contact_number: Option<String>,
    pub address: Option<String>,
    pub department_name: Option<String>,
    pub designation: Option<String>,
    pub employment_type: String,
    pub date_hired: Option<chrono::NaiveDate>,
}

/// Get the caller's personnel profile
#[utoipa::path(
    get,
    path = "/api/v1/me/profile",
    tag = "personnel",
    responses(
        (status = 200, description = "Profile retrieved successfully", body = ApiResponse<MyProfileResponse>),
        (status = 404, description = "No personnel record", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_my_profile(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<MyProfileResponse>>, ApiError> {
    trace!("Entering get_my_profile function");
    require_role(&current, &[Role::Admin, Role::Hr, Role::Employee])?;

    let person = own_personnel(&state, &current).await?;
    let department_name = match person.department_id {
        Some(department_id) => department::Entity::find_by_id(department_id)
            .one(&state.db)
            .await?
            .map(|d| d.department_name),
        None => None,
    };

    Ok(Json(ApiResponse::new(
        MyProfileResponse {
            id: person.id,
            first_name: person.first_name,
            last_name: person.last_name,
            middle_name: person.middle_name,
            date_of_birth: person.date_of_birth,
            gender: person.gender,
            civil_status: person.civil_status,
            contact_number: person.contact_number,
            address: person.address,
            department_name,
            designation: person.designation,
            employment_type: person.employment_type,
            date_hired: person.date_hired,
        },
        "Profile retrieved successfully",
    )))
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateMyProfileRequest {
    pub contact_number: Option<String>,
    pub address: Option<String>,
    pub civil_status: Option<String>,
}

/// Update the caller's own contact details
///
/// Employees may change only contact number, address and civil status; the
/// rest of the record belongs to HR.
#[utoipa::path(
    put,
    path = "/api/v1/me/profile",
    tag = "personnel",
    request_body = UpdateMyProfileRequest,
    responses(
        (status = 200, description = "Profile updated successfully", body = ApiResponse<MyProfileResponse>),
        (status = 404, description = "No personnel record", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_my_profile(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<UpdateMyProfileRequest>,
) -> Result<Json<ApiResponse<MyProfileResponse>>, ApiError> {
    trace!("Entering update_my_profile function");
    require_role(&current, &[Role::Admin, Role::Hr, Role::Employee])?;

    let person = own_personnel(&state, &current).await?;
    let mut active: personnel::ActiveModel = person.into();
    if let Some(contact_number) = request.contact_number {
        active.contact_number = Set(Some(contact_number));
    }
    if let Some(address) = request.address {
        active.address = Set(Some(address));
    }
    if let Some(civil_status) = request.civil_status {
        active.civil_status = Set(Some(civil_status));
    }
    active.updated_at = Set(chrono::Utc::now().naive_utc());
    active.update(&state.db).await?;

    info!("Personnel profile updated by user {}", current.id);
    get_my_profile(State(state), Extension(current)).await
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MyDocumentResponse {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub file_url: String,
    pub file_type: String,
    pub file_size: i64,
    pub category: String,
    pub created_at: chrono::NaiveDateTime,
}

/// List the caller's 201-file documents
///
/// Documents HR marked private stay hidden from the employee.
#[utoipa::path(
    get,
    path = "/api/v1/me/documents",
    tag = "personnel",
    responses(
        (status = 200, description = "Documents retrieved successfully", body = ApiResponse<Vec<MyDocumentResponse>>),
        (status = 404, description = "No personnel record", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_my_documents(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<Vec<MyDocumentResponse>>>, ApiError> {
    trace!("Entering get_my_documents function");
    require_role(&current, &[Role::Admin, Role::Hr, Role::Employee])?;

    let person = own_personnel(&state, &current).await?;
    let documents = employee_document::Entity::find()
        .filter(employee_document::Column::PersonnelId.eq(person.id))
        .filter(employee_document::Column::IsPrivate.eq(false))
        .order_by_desc(employee_document::Column::CreatedAt)
        .all(&state.db)
        .await?
        .into_iter()
        .map(|d| MyDocumentResponse {
            id: d.id,
            title: d.title,
            description: d.description,
            file_url: d.file_url,
            file_type: d.file_type,
            file_size: d.file_size,
            category: d.category,
            created_at: d.created_at,
        })
        .collect::<Vec<_>>();

    debug!("Retrieved {} documents", documents.len());
    Ok(Json(ApiResponse::new(
        documents,
        "Documents retrieved successfully",
    )))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct MyBalancesQuery {
    /// Defaults to the current year.
    pub year: Option<i32>,
}

/// View the caller's leave balances for a year
#[utoipa::path(
    get,
    path = "/api/v1/me/leave-balances",
    tag = "leave",
    responses(
        (status = 200, description = "Balances retrieved successfully", body = ApiResponse<Vec<LeaveBalanceResponse>>),
        (status = 404, description = "No personnel record", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_my_leave_balances(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<MyBalancesQuery>,
) -> Result<Json<ApiResponse<Vec<LeaveBalanceResponse>>>, ApiError> {
    trace!("Entering get_my_leave_balances function");
    require_role(&current, &[Role::Admin, Role::Hr, Role::Employee])?;

    let person = own_personnel(&state, &current).await?;
    let year = query
        .year
        .unwrap_or_else(|| chrono::Utc::now().date_naive().year());

    let rows = leave_balance::Entity::find()
        .filter(leave_balance::Column::PersonnelId.eq(person.id))
        .filter(leave_balance::Column::Year.eq(year))
        .all(&state.db)
        .await?;

    let type_names: HashMap<i32, String> = leave_type::Entity::find()
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

    debug!("Retrieved {} balances for {}", balances.len(), year);
    Ok(Json(ApiResponse::new(
        balances,
        "Leave balances retrieved successfully",
    )))
}

/// View the caller's leave applications
#[utoipa::path(
    get,
    path = "/api/v1/me/leave-applications",
    tag = "leave",
    responses(
        (status = 200, description = "Applications retrieved successfully", body = ApiResponse<Vec<LeaveApplicationResponse>>),
        (status = 404, description = "No personnel record", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_my_leave_applications(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<Vec<LeaveApplicationResponse>>>, ApiError> {
    trace!("Entering get_my_leave_applications function");
    require_role(&current, &[Role::Admin, Role::Hr, Role::Employee])?;

    let person = own_personnel(&state, &current).await?;
    let rows = leave_application::Entity::find()
        .filter(leave_application::Column::PersonnelId.eq(person.id))
        .order_by_desc(leave_application::Column::RequestDate)
        .all(&state.db)
        .await?;

    let type_names: HashMap<i32, String> = leave_type::Entity::find()
        .all(&state.db)
        .await?
        .into_iter()
        .map(|t| (t.id, t.leave_type_name))
        .collect();

    let name = format!("{} {}", person.first_name, person.last_name);
    let applications = rows
        .into_iter()
        .map(|row| {
            let type_name = type_names.get(&row.leave_type_id).cloned();
            LeaveApplicationResponse::new(row, Some(name.clone()), type_name)
        })
        .collect::<Vec<_>>();

    debug!("Retrieved {} applications", applications.len());
    Ok(Json(ApiResponse::new(
        applications,
        "Leave applications retrieved successfully",
    )))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NotificationResponse {
    pub id: i32,
    pub notification_type: String,
    pub message: String,
    pub is_read: bool,
    pub related_id: Option<String>,
    pub related_table: Option<String>,
    pub created_at: chrono::NaiveDateTime,
}

impl From<notification::Model> for NotificationResponse {
    fn from(model: notification::Model) -> Self {
        Self {
            id: model.id,
            notification_type: model.notification_type,
            message: model.message,
            is_read: model.is_read,
            related_id: model.related_id,
            related_table: model.related_table,
            created_at: model.created_at,
        }
    }
}

/// List the caller's notifications, newest first
#[utoipa::path(
    get,
    path = "/api/v1/me/notifications",
    tag = "personnel",
    responses(
        (status = 200, description = "Notifications retrieved successfully", body = ApiResponse<Vec<NotificationResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_my_notifications(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<Vec<NotificationResponse>>>, ApiError> {
    trace!("Entering get_my_notifications function");

    let notifications = notification::Entity::find()
        .filter(notification::Column::UserId.eq(current.id))
        .order_by_desc(notification::Column::CreatedAt)
        .all(&state.db)
        .await?
        .into_iter()
        .map(NotificationResponse::from)
        .collect::<Vec<_>>();

    debug!("Retrieved {} notifications", notifications.len());
    Ok(Json(ApiResponse::new(
        notifications,
        "Notifications retrieved successfully",
    )))
}

/// Mark one of the caller's notifications as read
///
/// Another user's notification answers 404, never 403.
#[utoipa::path(
    post,
    path = "/api/v1/me/notifications/{notification_id}/read",
    tag = "personnel",
    params(("notification_id" = i32, Path, description = "Notification ID")),
    responses(
        (status = 200, description = "Notification marked read", body = ApiResponse<NotificationResponse>),
        (status = 404, description = "Notification not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn mark_notification_read(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(notification_id): Path<i32>,
) -> Result<Json<ApiResponse<NotificationResponse>>, ApiError> {
    trace!("Entering mark_notification_read for id: {}", notification_id);

    let model = notification::Entity::find_by_id(notification_id)
        .filter(notification::Column::UserId.eq(current.id))
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!("Notification {} not found", notification_id))
        })?;

    let mut active: notification::ActiveModel = model.into();
    active.is_read = Set(true);
    let updated = active.update(&state.db).await?;

    Ok(Json(ApiResponse::new(
        NotificationResponse::from(updated),
        "Notification marked as read",
    )))
}
