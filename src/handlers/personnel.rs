use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use chrono::NaiveDate;
use common::{Pagination, PaginationQuery};
use model::entities::user::{Role, UserStatus};
use model::entities::{department, employee_document, employment_history, personnel, user};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::ToSchema;

use crate::auth::{
    hash_password, is_valid_email, require_role, validate_password_strength, CurrentUser,
};
use crate::error::ApiError;
use crate::handlers::audit_logs;
use crate::schemas::{ApiResponse, AppState, CachedData, ErrorResponse};

const STATS_CACHE_KEY: &str = "personnel:stats";

#[derive(Debug, Serialize, ToSchema)]
pub struct PersonnelResponse {
    pub id: i32,
    pub user_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub civil_status: Option<String>,
    pub contact_number: Option<String>,
    pub address: Option<String>,
    pub department_id: Option<i32>,
    pub department_name: Option<String>,
    pub designation: Option<String>,
    pub employment_type: String,
    pub date_hired: Option<NaiveDate>,
    pub salary: Decimal,
}

impl PersonnelResponse {
    fn new(model: personnel::Model, department_name: Option<String>) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            first_name: model.first_name,
            last_name: model.last_name,
            middle_name: model.middle_name,
            date_of_birth: model.date_of_birth,
            gender: model.gender,
            civil_status: model.civil_status,
            contact_number: model.contact_number,
            address: model.address,
            department_id: model.department_id,
            department_name,
            designation: model.designation,
            employment_type: model.employment_type,
            date_hired: model.date_hired,
            salary: model.salary,
        }
    }
}

async fn with_department(
    state: &AppState,
    model: personnel::Model,
) -> Result<PersonnelResponse, ApiError> {
    let department_name = match model.department_id {
        Some(dept_id) => department::Entity::find_by_id(dept_id)
            .one(&state.db)
            .await?
            .map(|d| d.department_name),
        None => None,
    };
    Ok(PersonnelResponse::new(model, department_name))
}

/// Filters accepted by the personnel listing
#[derive(Debug, Deserialize, ToSchema)]
pub struct PersonnelListQuery {
    /// Matches first and last name
    pub search: Option<String>,
    pub department_id: Option<i32>,
    pub employment_type: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PersonnelListResponse {
    pub personnel: Vec<PersonnelResponse>,
    pub pagination: Pagination,
}

/// List personnel records
#[utoipa::path(
    get,
    path = "/api/v1/personnel",
    tag = "personnel",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Personnel retrieved successfully", body = ApiResponse<PersonnelListResponse>),
        (status = 403, description = "Insufficient role", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_personnel_list(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(pagination): Query<PaginationQuery>,
    Query(filter): Query<PersonnelListQuery>,
) -> Result<Json<ApiResponse<PersonnelListResponse>>, ApiError> {
    trace!("Entering get_personnel_list function");
    require_role(&current, &[Role::Admin, Role::Hr])?;

    let mut query = personnel::Entity::find();
    if let Some(search) = &filter.search {
        let pattern = format!("%{}%", search);
        query = query.filter(
            personnel::Column::FirstName
                .like(pattern.clone())
                .or(personnel::Column::LastName.like(pattern)),
        );
    }
    if let Some(dept_id) = filter.department_id {
        query = query.filter(personnel::Column::DepartmentId.eq(dept_id));
    }
    if let Some(employment_type) = &filter.employment_type {
        query = query.filter(personnel::Column::EmploymentType.eq(employment_type.clone()));
    }

    let paginator = query
        .order_by_asc(personnel::Column::LastName)
        .paginate(&state.db, pagination.limit());
    let total = paginator.num_items().await?;
    let rows = paginator.fetch_page(pagination.page_index()).await?;

    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        records.push(with_department(&state, row).await?);
    }

    debug!("Retrieved {} of {} personnel records", records.len(), total);
    Ok(Json(ApiResponse::new(
        PersonnelListResponse {
            personnel: records,
            pagination: Pagination::new(&pagination, total),
        },
        "Personnel retrieved successfully",
    )))
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreatePersonnelRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub civil_status: Option<String>,
    pub contact_number: Option<String>,
    pub address: Option<String>,
    pub department_id: Option<i32>,
    pub designation: Option<String>,
    pub employment_type: String,
    pub date_hired: Option<NaiveDate>,
    pub salary: Decimal,
}

/// Create a personnel record
///
/// Creates the Employee-role login and the HR profile in one transaction;
/// a failure at either step leaves no orphan account.
#[utoipa::path(
    post,
    path = "/api/v1/personnel",
    tag = "personnel",
    request_body = CreatePersonnelRequest,
    responses(
        (status = 201, description = "Personnel created successfully", body = ApiResponse<PersonnelResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Username or email already taken", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn create_personnel(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<CreatePersonnelRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PersonnelResponse>>), ApiError> {
    trace!("Entering create_personnel function");
    require_role(&current, &[Role::Admin, Role::Hr])?;

    if !is_valid_email(&request.email) {
        return Err(ApiError::Validation("Invalid email address".to_string()));
    }
    validate_password_strength(&request.password)?;
    if request.salary < Decimal::ZERO {
        return Err(ApiError::Validation("Salary cannot be negative".to_string()));
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

    if let Some(dept_id) = request.department_id {
        department::Entity::find_by_id(dept_id)
            .one(&state.db)
            .await?
            .ok_or_else(|| ApiError::Validation("Department not found".to_string()))?;
    }

    let now = chrono::Utc::now().naive_utc();
    let txn = state.db.begin().await?;

    let account = user::ActiveModel {
        username: Set(request.username.clone()),
        email: Set(request.email.clone()),
        password_hash: Set(hash_password(&request.password)?),
        role: Set(Role::Employee),
        status: Set(UserStatus::Active),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let created = personnel::ActiveModel {
        user_id: Set(account.id),
        first_name: Set(request.first_name.clone()),
        last_name: Set(request.last_name.clone()),
        middle_name: Set(request.middle_name.clone()),
        date_of_birth: Set(request.date_of_birth),
        gender: Set(request.gender.clone()),
        civil_status: Set(request.civil_status.clone()),
        contact_number: Set(request.contact_number.clone()),
        address: Set(request.address.clone()),
        department_id: Set(request.department_id),
        designation: Set(request.designation.clone()),
        employment_type: Set(request.employment_type.clone()),
        date_hired: Set(request.date_hired),
        salary: Set(request.salary),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    audit_logs::record(
        &txn,
        Some(current.id),
        "CREATE",
        "personnel",
        Some(created.id.to_string()),
        Some(format!(
            "Created personnel record for {} {}",
            request.first_name, request.last_name
        )),
    )
    .await;

    txn.commit().await?;
    state.cache.invalidate(STATS_CACHE_KEY).await;

    info!(
        "Personnel record {} created for user {}",
        created.id, account.username
    );
    let response = with_department(&state, created).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(response, "Personnel created successfully")),
    ))
}

/// Get a personnel record by ID
#[utoipa::path(
    get,
    path = "/api/v1/personnel/{personnel_id}",
    tag = "personnel",
    params(("personnel_id" = i32, Path, description = "Personnel ID")),
    responses(
        (status = 200, description = "Personnel retrieved successfully", body = ApiResponse<PersonnelResponse>),
        (status = 404, description = "Personnel not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_personnel(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(personnel_id): Path<i32>,
) -> Result<Json<ApiResponse<PersonnelResponse>>, ApiError> {
    trace!("Entering get_personnel for personnel_id: {}", personnel_id);
    require_role(&current, &[Role::Admin, Role::Hr])?;

    let model = personnel::Entity::find_by_id(personnel_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Personnel {} not found", personnel_id)))?;

    let response = with_department(&state, model).await?;
    Ok(Json(ApiResponse::new(
        response,
        "Personnel retrieved successfully",
    )))
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdatePersonnelRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub middle_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub civil_status: Option<String>,
    pub contact_number: Option<String>,
    pub address: Option<String>,
    pub department_id: Option<i32>,
    pub designation: Option<String>,
    pub employment_type: Option<String>,
    pub date_hired: Option<NaiveDate>,
    pub salary: Option<Decimal>,
}

/// Update a personnel record
#[utoipa::path(
    put,
    path = "/api/v1/personnel/{personnel_id}",
    tag = "personnel",
    params(("personnel_id" = i32, Path, description = "Personnel ID")),
    request_body = UpdatePersonnelRequest,
    responses(
        (status = 200, description = "Personnel updated successfully", body = ApiResponse<PersonnelResponse>),
        (status = 404, description = "Personnel not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn update_personnel(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(personnel_id): Path<i32>,
    Json(request): Json<UpdatePersonnelRequest>,
) -> Result<Json<ApiResponse<PersonnelResponse>>, ApiError> {
    trace!("Entering update_personnel for personnel_id: {}", personnel_id);
    require_role(&current, &[Role::Admin, Role::Hr])?;

    let model = personnel::Entity::find_by_id(personnel_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Personnel {} not found", personnel_id)))?;

    if let Some(salary) = request.salary {
        if salary < Decimal::ZERO {
            return Err(ApiError::Validation("Salary cannot be negative".to_string()));
        }
    }
    if let Some(dept_id) = request.department_id {
        department::Entity::find_by_id(dept_id)
            .one(&state.db)
            .await?
            .ok_or_else(|| ApiError::Validation("Department not found".to_string()))?;
    }

    let mut active: personnel::ActiveModel = model.into();
    if let Some(v) = request.first_name {
        active.first_name = Set(v);
    }
    if let Some(v) = request.last_name {
        active.last_name = Set(v);
    }
    if let Some(v) = request.middle_name {
        active.middle_name = Set(Some(v));
    }
    if let Some(v) = request.date_of_birth {
        active.date_of_birth = Set(Some(v));
    }
    if let Some(v) = request.gender {
        active.gender = Set(Some(v));
    }
    if let Some(v) = request.civil_status {
        active.civil_status = Set(Some(v));
    }
    if let Some(v) = request.contact_number {
        active.contact_number = Set(Some(v));
    }
    if let Some(v) = request.address {
        active.address = Set(Some(v));
    }
    if let Some(v) = request.department_id {
        active.department_id = Set(Some(v));
    }
    if let Some(v) = request.designation {
        active.designation = Set(Some(v));
    }
    if let Some(v) = request.employment_type {
        active.employment_type = Set(v);
    }
    if let Some(v) = request.date_hired {
        active.date_hired = Set(Some(v));
    }
    if let Some(v) = request.salary {
        active.salary = Set(v);
    }
    active.updated_at = Set(chrono::Utc::now().naive_utc());

    let updated = active.update(&state.db).await?;

    audit_logs::record(
        &state.db,
        Some(current.id),
        "UPDATE",
        "personnel",
        Some(personnel_id.to_string()),
        None,
    )
    .await;
    state.cache.invalidate(STATS_CACHE_KEY).await;

    info!("Personnel record {} updated", personnel_id);
    let response = with_department(&state, updated).await?;
    Ok(Json(ApiResponse::new(
        response,
        "Personnel updated successfully",
    )))
}

/// Delete a personnel record and its login account
#[utoipa::path(
    delete,
    path = "/api/v1/personnel/{personnel_id}",
    tag = "personnel",
    params(("personnel_id" = i32, Path, description = "Personnel ID")),
    responses(
        (status = 200, description = "Personnel deleted", body = ApiResponse<i32>),
        (status = 404, description = "Personnel not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_personnel(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(personnel_id): Path<i32>,
) -> Result<Json<ApiResponse<i32>>, ApiError> {
    trace!("Entering delete_personnel for personnel_id: {}", personnel_id);
    require_role(&current, &[Role::Admin])?;

    let model = personnel::Entity::find_by_id(personnel_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Personnel {} not found", personnel_id)))?;

    let user_id = model.user_id;
    let txn = state.db.begin().await?;

    // Deleting the user cascades to the personnel row and its children
    if let Some(account) = user::Entity::find_by_id(user_id).one(&txn).await? {
        account.delete(&txn).await?;
    } else {
        model.delete(&txn).await?;
    }

    audit_logs::record(
        &txn,
        Some(current.id),
        "DELETE",
        "personnel",
        Some(personnel_id.to_string()),
        None,
    )
    .await;

    txn.commit().await?;
    state.cache.invalidate(STATS_CACHE_KEY).await;

    warn!(
        "Personnel record {} deleted by {}",
        personnel_id, current.username
    );
    Ok(Json(ApiResponse::new(
        personnel_id,
        "Personnel deleted successfully",
    )))
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DepartmentHeadcount {
    pub department_id: Option<i32>,
    pub department_name: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EmploymentTypeCount {
    pub employment_type: String,
    pub count: u64,
}

/// Workforce snapshot used by the dashboard
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PersonnelStats {
    pub total: u64,
    pub by_department: Vec<DepartmentHeadcount>,
    pub by_employment_type: Vec<EmploymentTypeCount>,
}

/// Workforce statistics
///
/// Served from cache for up to five minutes; any personnel mutation
/// invalidates the entry.
#[utoipa::path(
    get,
    path = "/api/v1/personnel/stats",
    tag = "personnel",
    responses(
        (status = 200, description = "Statistics retrieved successfully", body = ApiResponse<PersonnelStats>),
        (status = 403, description = "Insufficient role", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_personnel_stats(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<PersonnelStats>>, ApiError> {
    trace!("Entering get_personnel_stats function");
    require_role(&current, &[Role::Admin, Role::Hr])?;

    if let Some(CachedData::PersonnelStats(stats)) = state.cache.get(STATS_CACHE_KEY).await {
        debug!("Serving personnel stats from cache");
        return Ok(Json(ApiResponse::new(
            stats,
            "Statistics retrieved successfully",
        )));
    }

    let all = personnel::Entity::find().all(&state.db).await?;
    let departments = department::Entity::find().all(&state.db).await?;
    let total = all.len() as u64;

    let mut by_department: Vec<DepartmentHeadcount> = Vec::new();
    for dept in &departments {
        let count = all
            .iter()
            .filter(|p| p.department_id == Some(dept.id))
            .count() as u64;
        by_department.push(DepartmentHeadcount {
            department_id: Some(dept.id),
            department_name: dept.department_name.clone(),
            count,
        });
    }
    let unassigned = all.iter().filter(|p| p.department_id.is_none()).count() as u64;
    if unassigned > 0 {
        by_department.push(DepartmentHeadcount {
            department_id: None,
            department_name: "Unassigned".to_string(),
            count: unassigned,
        });
    }

    let mut by_employment_type: Vec<EmploymentTypeCount> = Vec::new();
    for p in &all {
        match by_employment_type
            .iter_mut()
            .find(|e| e.employment_type == p.employment_type)
        {
            Some(entry) => entry.count += 1,
            None => by_employment_type.push(EmploymentTypeCount {
                employment_type: p.employment_type.clone(),
                count: 1,
            }),
        }
    }

    let stats = PersonnelStats {
        total,
        by_department,
        by_employment_type,
    };

    state
        .cache
        .insert(
            STATS_CACHE_KEY.to_string(),
            CachedData::PersonnelStats(stats.clone()),
        )
        .await;

    Ok(Json(ApiResponse::new(
        stats,
        "Statistics retrieved successfully",
    )))
}

/// Government membership numbers on file
#[derive(Debug, Serialize, ToSchema)]
pub struct MembershipResponse {
    pub personnel_id: i32,
    pub gsis_number: Option<String>,
    pub pagibig_number: Option<String>,
    pub philhealth_number: Option<String>,
    pub sss_number: Option<String>,
    pub tin_number: Option<String>,
}

impl From<personnel::Model> for MembershipResponse {
    fn from(model: personnel::Model) -> Self {
        Self {
            personnel_id: model.id,
            gsis_number: model.gsis_number,
            pagibig_number: model.pagibig_number,
            philhealth_number: model.philhealth_number,
            sss_number: model.sss_number,
            tin_number: model.tin_number,
        }
    }
}

/// Get membership numbers for a personnel record
#[utoipa::path(
    get,
    path = "/api/v1/personnel/{personnel_id}/membership",
    tag = "personnel",
    params(("personnel_id" = i32, Path, description = "Personnel ID")),
    responses(
        (status = 200, description = "Membership data retrieved", body = ApiResponse<MembershipResponse>),
        (status = 404, description = "Personnel not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_membership(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(personnel_id): Path<i32>,
) -> Result<Json<ApiResponse<MembershipResponse>>, ApiError> {
    trace!("Entering get_membership for personnel_id: {}", personnel_id);
    require_role(&current, &[Role::Admin, Role::Hr])?;

    let model = personnel::Entity::find_by_id(personnel_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Personnel {} not found", personnel_id)))?;

    Ok(Json(ApiResponse::new(
        MembershipResponse::from(model),
        "Membership data retrieved successfully",
    )))
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateMembershipRequest {
    pub gsis_number: Option<String>,
    pub pagibig_number: Option<String>,
    pub philhealth_number: Option<String>,
    pub sss_number: Option<String>,
    pub tin_number: Option<String>,
}

/// Update membership numbers for a personnel record
#[utoipa::path(
    put,
    path = "/api/v1/personnel/{personnel_id}/membership",
    tag = "personnel",
    params(("personnel_id" = i32, Path, description = "Personnel ID")),
    request_body = UpdateMembershipRequest,
    responses(
        (status = 200, description = "Membership data updated", body = ApiResponse<MembershipResponse>),
        (status = 404, description = "Personnel not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn update_membership(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(personnel_id): Path<i32>,
    Json(request): Json<UpdateMembershipRequest>,
) -> Result<Json<ApiResponse<MembershipResponse>>, ApiError> {
    trace!("Entering update_membership for personnel_id: {}", personnel_id);
    require_role(&current, &[Role::Admin, Role::Hr])?;

    let model = personnel::Entity::find_by_id(personnel_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Personnel {} not found", personnel_id)))?;

    let mut active: personnel::ActiveModel = model.into();
    if let Some(v) = request.gsis_number {
        active.gsis_number = Set(Some(v));
    }
    if let Some(v) = request.pagibig_number {
        active.pagibig_number = Set(Some(v));
    }
    if let Some(v) = request.philhealth_number {
        active.philhealth_number = Set(Some(v));
    }
    if let Some(v) = request.sss_number {
        active.sss_number = Set(Some(v));
    }
    if let Some(v) = request.tin_number {
        active.tin_number = Set(Some(v));
    }
    active.updated_at = Set(chrono::Utc::now().naive_utc());

    let updated = active.update(&state.db).await?;

    audit_logs::record(
        &state.db,
        Some(current.id),
        "UPDATE",
        "personnel",
        Some(personnel_id.to_string()),
        Some("Membership data updated".to_string()),
    )
    .await;

    info!("Membership data updated for personnel {}", personnel_id);
    Ok(Json(ApiResponse::new(
        MembershipResponse::from(updated),
        "Membership data updated successfully",
    )))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EmploymentHistoryResponse {
    pub id: i32,
    pub personnel_id: i32,
    pub organization: String,
    pub position: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub employment_type: String,
}

impl From<employment_history::Model> for EmploymentHistoryResponse {
    fn from(model: employment_history::Model) -> Self {
        Self {
            id: model.id,
            personnel_id: model.personnel_id,
            organization: model.organization,
            position: model.position,
            start_date: model.start_date,
            end_date: model.end_date,
            employment_type: model.employment_type,
        }
    }
}

/// List a personnel record's employment history
#[utoipa::path(
    get,
    path = "/api/v1/personnel/{personnel_id}/employment-history",
    tag = "personnel",
    params(("personnel_id" = i32, Path, description = "Personnel ID")),
    responses(
        (status = 200, description = "Employment history retrieved", body = ApiResponse<Vec<EmploymentHistoryResponse>>),
        (status = 404, description = "Personnel not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_employment_history(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(personnel_id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<EmploymentHistoryResponse>>>, ApiError> {
    trace!("Entering get_employment_history for personnel_id: {}", personnel_id);
    require_role(&current, &[Role::Admin, Role::Hr])?;

    personnel::Entity::find_by_id(personnel_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Personnel {} not found", personnel_id)))?;

    let rows = employment_history::Entity::find()
        .filter(employment_history::Column::PersonnelId.eq(personnel_id))
        .order_by_desc(employment_history::Column::StartDate)
        .all(&state.db)
        .await?;

    Ok(Json(ApiResponse::new(
        rows.into_iter()
            .map(EmploymentHistoryResponse::from)
            .collect(),
        "Employment history retrieved successfully",
    )))
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateEmploymentHistoryRequest {
    pub organization: String,
    pub position: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub employment_type: String,
}

/// Add an employment history entry
#[utoipa::path(
    post,
    path = "/api/v1/personnel/{personnel_id}/employment-history",
    tag = "personnel",
    params(("personnel_id" = i32, Path, description = "Personnel ID")),
    request_body = CreateEmploymentHistoryRequest,
    responses(
        (status = 201, description = "Entry added", body = ApiResponse<EmploymentHistoryResponse>),
        (status = 400, description = "Invalid date range", body = ErrorResponse),
        (status = 404, description = "Personnel not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn add_employment_history(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(personnel_id): Path<i32>,
    Json(request): Json<CreateEmploymentHistoryRequest>,
) -> Result<(StatusCode, Json<ApiResponse<EmploymentHistoryResponse>>), ApiError> {
    trace!("Entering add_employment_history for personnel_id: {}", personnel_id);
    require_role(&current, &[Role::Admin, Role::Hr])?;

    personnel::Entity::find_by_id(personnel_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Personnel {} not found", personnel_id)))?;

    if let Some(end) = request.end_date {
        if end < request.start_date {
            return Err(ApiError::Validation(
                "End date cannot be before start date".to_string(),
            ));
        }
    }

    let created = employment_history::ActiveModel {
        personnel_id: Set(personnel_id),
        organization: Set(request.organization.clone()),
        position: Set(request.position.clone()),
        start_date: Set(request.start_date),
        end_date: Set(request.end_date),
        employment_type: Set(request.employment_type.clone()),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    info!(
        "Employment history entry {} added for personnel {}",
        created.id, personnel_id
    );
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            EmploymentHistoryResponse::from(created),
            "Employment history entry added successfully",
        )),
    ))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EmployeeDocumentResponse {
    pub id: i32,
    pub personnel_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub file_url: String,
    pub file_type: String,
    pub file_size: i64,
    pub category: String,
    pub is_private: bool,
    pub created_at: chrono::NaiveDateTime,
}

impl From<employee_document::Model> for EmployeeDocumentResponse {
    fn from(model: employee_document::Model) -> Self {
        Self {
            id: model.id,
            personnel_id: model.personnel_id,
            title: model.title,
            description: model.description,
            file_url: model.file_url,
            file_type: model.file_type,
            file_size: model.file_size,
            category: model.category,
            is_private: model.is_private,
            created_at: model.created_at,
        }
    }
}

/// List a personnel record's 201-file documents, private ones included
#[utoipa::path(
    get,
    path = "/api/v1/personnel/{personnel_id}/documents",
    tag = "personnel",
    params(("personnel_id" = i32, Path, description = "Personnel ID")),
    responses(
        (status = 200, description = "Documents retrieved successfully", body = ApiResponse<Vec<EmployeeDocumentResponse>>),
        (status = 404, description = "Personnel not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_personnel_documents(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(personnel_id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<EmployeeDocumentResponse>>>, ApiError> {
    trace!("Entering get_personnel_documents for personnel_id: {}", personnel_id);
    require_role(&current, &[Role::Admin, Role::Hr])?;

    personnel::Entity::find_by_id(personnel_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Personnel {} not found", personnel_id)))?;

    let documents = employee_document::Entity::find()
        .filter(employee_document::Column::PersonnelId.eq(personnel_id))
        .order_by_desc(employee_document::Column::CreatedAt)
        .all(&state.db)
        .await?
        .into_iter()
        .map(EmployeeDocumentResponse::from)
        .collect::<Vec<_>>();

    debug!("Retrieved {} documents", documents.len());
    Ok(Json(ApiResponse::new(
        documents,
        "Documents retrieved successfully",
    )))
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UploadDocumentRequest {
    pub title: String,
    pub description: Option<String>,
    pub file_url: String,
    pub file_type: String,
    pub file_size: i64,
    pub category: String,
    #[serde(default)]
    pub is_private: bool,
}

/// Attach a document to a personnel record
#[utoipa::path(
    post,
    path = "/api/v1/personnel/{personnel_id}/documents",
    tag = "personnel",
    params(("personnel_id" = i32, Path, description = "Personnel ID")),
    request_body = UploadDocumentRequest,
    responses(
        (status = 201, description = "Document attached", body = ApiResponse<EmployeeDocumentResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Personnel not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn upload_personnel_document(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(personnel_id): Path<i32>,
    Json(request): Json<UploadDocumentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<EmployeeDocumentResponse>>), ApiError> {
    trace!("Entering upload_personnel_document for personnel_id: {}", personnel_id);
    require_role(&current, &[Role::Admin, Role::Hr])?;

    personnel::Entity::find_by_id(personnel_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Personnel {} not found", personnel_id)))?;

    if request.title.trim().is_empty() || request.file_url.trim().is_empty() {
        return Err(ApiError::Validation(
            "Title and file URL are required".to_string(),
        ));
    }
    if request.file_size < 0 {
        return Err(ApiError::Validation(
            "File size cannot be negative".to_string(),
        ));
    }

    let created = employee_document::ActiveModel {
        personnel_id: Set(personnel_id),
        title: Set(request.title.clone()),
        description: Set(request.description.clone()),
        file_url: Set(request.file_url.clone()),
        file_type: Set(request.file_type.clone()),
        file_size: Set(request.file_size),
        category: Set(request.category.clone()),
        is_private: Set(request.is_private),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    audit_logs::record(
        &state.db,
        Some(current.id),
        "CREATE",
        "employee_documents",
        Some(created.id.to_string()),
        Some(format!("Attached document {}", created.title)),
    )
    .await;

    info!(
        "Document {} attached to personnel {}",
        created.id, personnel_id
    );
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            EmployeeDocumentResponse::from(created),
            "Document attached successfully",
        )),
    ))
}

/// Remove a document from a personnel record
#[utoipa::path(
    delete,
    path = "/api/v1/personnel/{personnel_id}/documents/{document_id}",
    tag = "personnel",
    params(
        ("personnel_id" = i32, Path, description = "Personnel ID"),
        ("document_id" = i32, Path, description = "Document ID")
    ),
    responses(
        (status = 200, description = "Document removed", body = ApiResponse<i32>),
        (status = 404, description = "Document not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_personnel_document(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((personnel_id, document_id)): Path<(i32, i32)>,
) -> Result<Json<ApiResponse<i32>>, ApiError> {
    trace!("Entering delete_personnel_document for document_id: {}", document_id);
    require_role(&current, &[Role::Admin, Role::Hr])?;

    let model = employee_document::Entity::find_by_id(document_id)
        .filter(employee_document::Column::PersonnelId.eq(personnel_id))
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Document {} not found", document_id)))?;

    model.delete(&state.db).await?;

    audit_logs::record(
        &state.db,
        Some(current.id),
        "DELETE",
        "employee_documents",
        Some(document_id.to_string()),
        None,
    )
    .await;

    warn!(
        "Document {} removed from personnel {} by {}",
        document_id, personnel_id, current.username
    );
    Ok(Json(ApiResponse::new(
        document_id,
        "Document removed successfully",
    )))
}
