//! Public job portal and applicant self-service endpoints. The position
//! listing is unauthenticated; everything else requires an Applicant login.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use common::{Pagination, PaginationQuery};
use model::entities::job_application::{self, ApplicationStatus};
use model::entities::job_posting::{self, PostingStatus};
use model::entities::user::Role;
use model::entities::{application_document, department, job_applicant};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, instrument, trace};
use utoipa::ToSchema;

use crate::auth::{require_role, CurrentUser};
use crate::error::ApiError;
use crate::handlers::audit_logs;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

#[derive(Debug, Serialize, ToSchema)]
pub struct OpenPositionResponse {
    pub id: i32,
    pub position_title: String,
    pub department_name: Option<String>,
    pub job_description: String,
    pub qualifications: String,
    pub technical_competencies: Option<String>,
    pub salary_range: Option<String>,
    pub employment_type: Option<String>,
    pub num_vacancies: i32,
    pub application_deadline: chrono::NaiveDate,
}

impl OpenPositionResponse {
    fn new(model: job_posting::Model, department_name: Option<String>) -> Self {
        Self {
            id: model.id,
            position_title: model.position_title,
            department_name,
            job_description: model.job_description,
            qualifications: model.qualifications,
            technical_competencies: model.technical_competencies,
            salary_range: model.salary_range,
            employment_type: model.employment_type,
            num_vacancies: model.num_vacancies,
            application_deadline: model.application_deadline,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OpenPositionListResponse {
    pub positions: Vec<OpenPositionResponse>,
    pub pagination: Pagination,
}

/// List open positions
///
/// Public. Shows only Published postings whose deadline has not passed.
#[utoipa::path(
    get,
    path = "/api/v1/jobs",
    tag = "job-portal",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Open positions retrieved successfully", body = ApiResponse<OpenPositionListResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_open_positions(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<OpenPositionListResponse>>, ApiError> {
    trace!("Entering get_open_positions function");

    let today = chrono::Utc::now().date_naive();
    let paginator = job_posting::Entity::find()
        .filter(job_posting::Column::PostingStatus.eq(PostingStatus::Published))
        .filter(job_posting::Column::ApplicationDeadline.gte(today))
        .order_by_asc(job_posting::Column::ApplicationDeadline)
        .paginate(&state.db, pagination.limit());
    let total = paginator.num_items().await?;
    let rows = paginator.fetch_page(pagination.page_index()).await?;

    let departments: HashMap<i32, String> = department::Entity::find()
        .all(&state.db)
        .await?
        .into_iter()
        .map(|d| (d.id, d.department_name))
        .collect();

    let positions = rows
        .into_iter()
        .map(|row| {
            let name = departments.get(&row.department_id).cloned();
            OpenPositionResponse::new(row, name)
        })
        .collect::<Vec<_>>();

    debug!("Retrieved {} of {} open positions", positions.len(), total);
    Ok(Json(ApiResponse::new(
        OpenPositionListResponse {
            positions,
            pagination: Pagination::new(&pagination, total),
        },
        "Open positions retrieved successfully",
    )))
}

/// Get one open position
///
/// Public. Draft, closed, filled and past-deadline postings answer 404 here.
#[utoipa::path(
    get,
    path = "/api/v1/jobs/{position_id}",
    tag = "job-portal",
    params(("position_id" = i32, Path, description = "Position ID")),
    responses(
        (status = 200, description = "Position retrieved successfully", body = ApiResponse<OpenPositionResponse>),
        (status = 404, description = "Position not found or not open", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_open_position(
    State(state): State<AppState>,
    Path(position_id): Path<i32>,
) -> Result<Json<ApiResponse<OpenPositionResponse>>, ApiError> {
    trace!("Entering get_open_position for id: {}", position_id);

    let today = chrono::Utc::now().date_naive();
    let model = job_posting::Entity::find_by_id(position_id)
        .filter(job_posting::Column::PostingStatus.eq(PostingStatus::Published))
        .filter(job_posting::Column::ApplicationDeadline.gte(today))
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Position {} not found", position_id)))?;

    let department_name = department::Entity::find_by_id(model.department_id)
        .one(&state.db)
        .await?
        .map(|d| d.department_name);

    Ok(Json(ApiResponse::new(
        OpenPositionResponse::new(model, department_name),
        "Position retrieved successfully",
    )))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApplicantProfileResponse {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub current_employer: Option<String>,
    pub highest_education: Option<String>,
    pub resume_path: Option<String>,
}

impl From<job_applicant::Model> for ApplicantProfileResponse {
    fn from(model: job_applicant::Model) -> Self {
        Self {
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            middle_name: model.middle_name,
            email: model.email,
            phone: model.phone,
            current_employer: model.current_employer,
            highest_education: model.highest_education,
            resume_path: model.resume_path,
        }
    }
}

async fn own_profile(state: &AppState, current: &CurrentUser) -> Result<job_applicant::Model, ApiError> {
    job_applicant::Entity::find()
        .filter(job_applicant::Column::UserId.eq(current.id))
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("No applicant profile for this account".to_string()))
}

/// Get the caller's applicant profile
#[utoipa::path(
    get,
    path = "/api/v1/portal/profile",
    tag = "job-portal",
    responses(
        (status = 200, description = "Profile retrieved successfully", body = ApiResponse<ApplicantProfileResponse>),
        (status = 404, description = "No applicant profile", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_portal_profile(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<ApplicantProfileResponse>>, ApiError> {
    trace!("Entering get_portal_profile function");
    require_role(&current, &[Role::Applicant])?;

    let profile = own_profile(&state, &current).await?;
    Ok(Json(ApiResponse::new(
        ApplicantProfileResponse::from(profile),
        "Profile retrieved successfully",
    )))
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateApplicantProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub middle_name: Option<String>,
    pub phone: Option<String>,
    pub current_employer: Option<String>,
    pub highest_education: Option<String>,
    pub resume_path: Option<String>,
}

/// Update the caller's applicant profile
#[utoipa::path(
    put,
    path = "/api/v1/portal/profile",
    tag = "job-portal",
    request_body = UpdateApplicantProfileRequest,
    responses(
        (status = 200, description = "Profile updated successfully", body = ApiResponse<ApplicantProfileResponse>),
        (status = 404, description = "No applicant profile", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_portal_profile(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<UpdateApplicantProfileRequest>,
) -> Result<Json<ApiResponse<ApplicantProfileResponse>>, ApiError> {
    trace!("Entering update_portal_profile function");
    require_role(&current, &[Role::Applicant])?;

    let profile = own_profile(&state, &current).await?;
    let mut active: job_applicant::ActiveModel = profile.into();

    if let Some(first_name) = request.first_name {
        active.first_name = Set(first_name);
    }
    if let Some(last_name) = request.last_name {
        active.last_name = Set(last_name);
    }
    if let Some(middle_name) = request.middle_name {
        active.middle_name = Set(Some(middle_name));
    }
    if let Some(phone) = request.phone {
        active.phone = Set(Some(phone));
    }
    if let Some(employer) = request.current_employer {
        active.current_employer = Set(Some(employer));
    }
    if let Some(education) = request.highest_education {
        active.highest_education = Set(Some(education));
    }
    if let Some(resume) = request.resume_path {
        active.resume_path = Set(Some(resume));
    }

    let updated = active.update(&state.db).await?;

    info!("Applicant profile {} updated", updated.id);
    Ok(Json(ApiResponse::new(
        ApplicantProfileResponse::from(updated),
        "Profile updated successfully",
    )))
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct DocumentAttachment {
    pub document_type: String,
    pub document_path: String,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ApplyRequest {
    pub cover_letter: Option<String>,
    #[serde(default)]
    pub documents: Vec<DocumentAttachment>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MyApplicationResponse {
    pub id: i32,
    pub position_id: i32,
    pub position_title: Option<String>,
    pub status: String,
    pub application_date: chrono::NaiveDateTime,
    pub remarks: Option<String>,
    pub withdrawn_date: Option<chrono::NaiveDateTime>,
}

impl MyApplicationResponse {
    fn new(model: job_application::Model, position_title: Option<String>) -> Self {
        Self {
            id: model.id,
            position_id: model.position_id,
            position_title,
            status: model.status.as_str().to_string(),
            application_date: model.application_date,
            remarks: model.remarks,
            withdrawn_date: model.withdrawn_date,
        }
    }
}

/// Apply to an open position
///
/// One live application per posting per applicant; a withdrawn application
/// does not block re-applying.
#[utoipa::path(
    post,
    path = "/api/v1/jobs/{position_id}/apply",
    tag = "job-portal",
    params(("position_id" = i32, Path, description = "Position ID")),
    request_body = ApplyRequest,
    responses(
        (status = 201, description = "Application submitted", body = ApiResponse<MyApplicationResponse>),
        (status = 400, description = "Position not open for applications", body = ErrorResponse),
        (status = 404, description = "Position not found", body = ErrorResponse),
        (status = 409, description = "Already applied to this position", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn apply_to_position(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(position_id): Path<i32>,
    Json(request): Json<ApplyRequest>,
) -> Result<(StatusCode, Json<ApiResponse<MyApplicationResponse>>), ApiError> {
    trace!("Entering apply_to_position for position: {}", position_id);
    require_role(&current, &[Role::Applicant])?;

    let profile = own_profile(&state, &current).await?;

    let posting = job_posting::Entity::find_by_id(position_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Position {} not found", position_id)))?;
    if posting.posting_status != PostingStatus::Published {
        return Err(ApiError::Validation(
            "Position is not open for applications".to_string(),
        ));
    }
    if posting.application_deadline < chrono::Utc::now().date_naive() {
        return Err(ApiError::Validation(
            "Application deadline has passed".to_string(),
        ));
    }

    let duplicate = job_application::Entity::find()
        .filter(job_application::Column::PositionId.eq(position_id))
        .filter(job_application::Column::ApplicantId.eq(profile.id))
        .filter(job_application::Column::Status.ne(ApplicationStatus::Withdrawn))
        .one(&state.db)
        .await?;
    if duplicate.is_some() {
        return Err(ApiError::Conflict(
            "You have already applied to this position".to_string(),
        ));
    }

    let now = chrono::Utc::now().naive_utc();
    let txn = state.db.begin().await?;

    let created = job_application::ActiveModel {
        position_id: Set(position_id),
        applicant_id: Set(profile.id),
        cover_letter: Set(request.cover_letter.clone()),
        status: Set(ApplicationStatus::Pending),
        application_date: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    for document in &request.documents {
        application_document::ActiveModel {
            application_id: Set(created.id),
            document_type: Set(document.document_type.clone()),
            document_path: Set(document.document_path.clone()),
            uploaded_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    audit_logs::record(
        &txn,
        Some(current.id),
        "CREATE",
        "job_applications",
        Some(created.id.to_string()),
        Some(format!("Applied to position {}", posting.position_title)),
    )
    .await;

    txn.commit().await?;
    state
        .cache
        .invalidate(crate::handlers::recruitment::DASHBOARD_CACHE_KEY)
        .await;

    info!(
        "Applicant {} applied to position {}",
        profile.id, position_id
    );
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            MyApplicationResponse::new(created, Some(posting.position_title)),
            "Application submitted successfully",
        )),
    ))
}

/// List the caller's own applications
#[utoipa::path(
    get,
    path = "/api/v1/portal/applications",
    tag = "job-portal",
    responses(
        (status = 200, description = "Applications retrieved successfully", body = ApiResponse<Vec<MyApplicationResponse>>),
        (status = 404, description = "No applicant profile", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_my_applications(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<Vec<MyApplicationResponse>>>, ApiError> {
    trace!("Entering get_my_applications function");
    require_role(&current, &[Role::Applicant])?;

    let profile = own_profile(&state, &current).await?;
    let rows = job_application::Entity::find()
        .filter(job_application::Column::ApplicantId.eq(profile.id))
        .order_by_desc(job_application::Column::ApplicationDate)
        .all(&state.db)
        .await?;

    let titles: HashMap<i32, String> = job_posting::Entity::find()
        .all(&state.db)
        .await?
        .into_iter()
        .map(|p| (p.id, p.position_title))
        .collect();

    let applications = rows
        .into_iter()
        .map(|row| {
            let title = titles.get(&row.position_id).cloned();
            MyApplicationResponse::new(row, title)
        })
        .collect::<Vec<_>>();

    debug!("Retrieved {} applications", applications.len());
    Ok(Json(ApiResponse::new(
        applications,
        "Applications retrieved successfully",
    )))
}

/// Withdraw one of the caller's applications
///
/// Allowed while the application is still in play; hired or rejected
/// applications cannot be withdrawn.
#[utoipa::path(
    post,
    path = "/api/v1/portal/applications/{application_id}/withdraw",
    tag = "job-portal",
    params(("application_id" = i32, Path, description = "Application ID")),
    responses(
        (status = 200, description = "Application withdrawn", body = ApiResponse<MyApplicationResponse>),
        (status = 400, description = "Application already decided", body = ErrorResponse),
        (status = 404, description = "Application not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn withdraw_application(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(application_id): Path<i32>,
) -> Result<Json<ApiResponse<MyApplicationResponse>>, ApiError> {
    trace!("Entering withdraw_application for id: {}", application_id);
    require_role(&current, &[Role::Applicant])?;

    let profile = own_profile(&state, &current).await?;
    let model = job_application::Entity::find_by_id(application_id)
        .filter(job_application::Column::ApplicantId.eq(profile.id))
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Application {} not found", application_id)))?;

    match model.status {
        ApplicationStatus::Withdrawn => {
            return Err(ApiError::Validation(
                "Application is already withdrawn".to_string(),
            ));
        }
        ApplicationStatus::Hired | ApplicationStatus::Rejected => {
            return Err(ApiError::Validation(
                "Application has already been decided".to_string(),
            ));
        }
        _ => {}
    }

    let position_id = model.position_id;
    let mut active: job_application::ActiveModel = model.into();
    active.status = Set(ApplicationStatus::Withdrawn);
    active.withdrawn_date = Set(Some(chrono::Utc::now().naive_utc()));
    let updated = active.update(&state.db).await?;

    audit_logs::record(
        &state.db,
        Some(current.id),
        "UPDATE",
        "job_applications",
        Some(application_id.to_string()),
        Some("Application withdrawn".to_string()),
    )
    .await;

    let title = job_posting::Entity::find_by_id(position_id)
        .one(&state.db)
        .await?
        .map(|p| p.position_title);

    state
        .cache
        .invalidate(crate::handlers::recruitment::DASHBOARD_CACHE_KEY)
        .await;

    info!("Application {} withdrawn", application_id);
    Ok(Json(ApiResponse::new(
        MyApplicationResponse::new(updated, title),
        "Application withdrawn successfully",
    )))
}
