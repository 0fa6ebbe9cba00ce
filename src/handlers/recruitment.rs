//! Recruitment administration: posting lifecycle, pipeline management and
//! the dashboard used by HR.

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
use model::entities::{application_document, department, job_applicant, notification};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, instrument, trace, warn};
use utoipa::ToSchema;

use crate::auth::{require_role, CurrentUser};
use crate::error::ApiError;
use crate::handlers::audit_logs;
use crate::schemas::{ApiResponse, AppState, CachedData, ErrorResponse};

pub const DASHBOARD_CACHE_KEY: &str = "recruitment:dashboard";

#[derive(Debug, Serialize, ToSchema)]
pub struct JobPostingResponse {
    pub id: i32,
    pub position_title: String,
    pub department_id: i32,
    pub department_name: Option<String>,
    pub job_description: String,
    pub qualifications: String,
    pub technical_competencies: Option<String>,
    pub salary_range: Option<String>,
    pub employment_type: Option<String>,
    pub num_vacancies: i32,
    pub application_deadline: chrono::NaiveDate,
    pub posting_status: String,
    pub application_count: u64,
    pub created_by: i32,
    pub created_at: chrono::NaiveDateTime,
}

async fn to_posting_response(
    state: &AppState,
    model: job_posting::Model,
) -> Result<JobPostingResponse, ApiError> {
    let department_name = department::Entity::find_by_id(model.department_id)
        .one(&state.db)
        .await?
        .map(|d| d.department_name);
    let application_count = job_application::Entity::find()
        .filter(job_application::Column::PositionId.eq(model.id))
        .count(&state.db)
        .await?;

    Ok(JobPostingResponse {
        id: model.id,
        position_title: model.position_title,
        department_id: model.department_id,
        department_name,
        job_description: model.job_description,
        qualifications: model.qualifications,
        technical_competencies: model.technical_competencies,
        salary_range: model.salary_range,
        employment_type: model.employment_type,
        num_vacancies: model.num_vacancies,
        application_deadline: model.application_deadline,
        posting_status: model.posting_status.as_str().to_string(),
        application_count,
        created_by: model.created_by,
        created_at: model.created_at,
    })
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct JobPostingQuery {
    pub status: Option<String>,
    pub department_id: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct JobPostingListResponse {
    pub postings: Vec<JobPostingResponse>,
    pub pagination: Pagination,
}

/// List job postings in any state
#[utoipa::path(
    get,
    path = "/api/v1/recruitment/postings",
    tag = "recruitment",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Postings retrieved successfully", body = ApiResponse<JobPostingListResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_job_postings(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(pagination): Query<PaginationQuery>,
    Query(filter): Query<JobPostingQuery>,
) -> Result<Json<ApiResponse<JobPostingListResponse>>, ApiError> {
    trace!("Entering get_job_postings function");
    require_role(&current, &[Role::Admin, Role::Hr])?;

    let mut query = job_posting::Entity::find();
    if let Some(status) = &filter.status {
        let status = status.parse::<PostingStatus>().map_err(ApiError::Validation)?;
        query = query.filter(job_posting::Column::PostingStatus.eq(status));
    }
    if let Some(department_id) = filter.department_id {
        query = query.filter(job_posting::Column::DepartmentId.eq(department_id));
    }

    let paginator = query
        .order_by_desc(job_posting::Column::CreatedAt)
        .paginate(&state.db, pagination.limit());
    let total = paginator.num_items().await?;
    let rows = paginator.fetch_page(pagination.page_index()).await?;

    let mut postings = Vec::with_capacity(rows.len());
    for row in rows {
        postings.push(to_posting_response(&state, row).await?);
    }

    debug!("Retrieved {} of {} postings", postings.len(), total);
    Ok(Json(ApiResponse::new(
        JobPostingListResponse {
            postings,
            pagination: Pagination::new(&pagination, total),
        },
        "Job postings retrieved successfully",
    )))
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateJobPostingRequest {
    pub position_title: String,
    pub department_id: i32,
    pub job_description: String,
    pub qualifications: String,
    pub technical_competencies: Option<String>,
    pub salary_range: Option<String>,
    pub employment_type: Option<String>,
    pub num_vacancies: Option<i32>,
    pub application_deadline: chrono::NaiveDate,
}

/// Create a job posting
///
/// New postings start as Draft and stay off the public portal until
/// published.
#[utoipa::path(
    post,
    path = "/api/v1/recruitment/postings",
    tag = "recruitment",
    request_body = CreateJobPostingRequest,
    responses(
        (status = 201, description = "Posting created", body = ApiResponse<JobPostingResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Department not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_job_posting(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<CreateJobPostingRequest>,
) -> Result<(StatusCode, Json<ApiResponse<JobPostingResponse>>), ApiError> {
    trace!("Entering create_job_posting function");
    require_role(&current, &[Role::Admin, Role::Hr])?;

    if request.position_title.trim().is_empty() {
        return Err(ApiError::Validation(
            "Position title is required".to_string(),
        ));
    }
    let num_vacancies = request.num_vacancies.unwrap_or(1);
    if num_vacancies <= 0 {
        return Err(ApiError::Validation(
            "Number of vacancies must be positive".to_string(),
        ));
    }

    department::Entity::find_by_id(request.department_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!("Department {} not found", request.department_id))
        })?;

    let now = chrono::Utc::now().naive_utc();
    let created = job_posting::ActiveModel {
        position_title: Set(request.position_title.clone()),
        department_id: Set(request.department_id),
        job_description: Set(request.job_description.clone()),
        qualifications: Set(request.qualifications.clone()),
        technical_competencies: Set(request.technical_competencies.clone()),
        salary_range: Set(request.salary_range.clone()),
        employment_type: Set(request.employment_type.clone()),
        num_vacancies: Set(num_vacancies),
        application_deadline: Set(request.application_deadline),
        posting_status: Set(PostingStatus::Draft),
        created_by: Set(current.id),
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
        "job_postings",
        Some(created.id.to_string()),
        Some(format!("Created posting {}", created.position_title)),
    )
    .await;
    state.cache.invalidate(DASHBOARD_CACHE_KEY).await;

    info!("Job posting {} created", created.position_title);
    let response = to_posting_response(&state, created).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(response, "Job posting created successfully")),
    ))
}

/// Get a job posting in any state
#[utoipa::path(
    get,
    path = "/api/v1/recruitment/postings/{posting_id}",
    tag = "recruitment",
    params(("posting_id" = i32, Path, description = "Posting ID")),
    responses(
        (status = 200, description = "Posting retrieved successfully", body = ApiResponse<JobPostingResponse>),
        (status = 404, description = "Posting not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_job_posting(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(posting_id): Path<i32>,
) -> Result<Json<ApiResponse<JobPostingResponse>>, ApiError> {
    trace!("Entering get_job_posting for id: {}", posting_id);
    require_role(&current, &[Role::Admin, Role::Hr])?;

    let model = job_posting::Entity::find_by_id(posting_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Posting {} not found", posting_id)))?;

    let response = to_posting_response(&state, model).await?;
    Ok(Json(ApiResponse::new(
        response,
        "Job posting retrieved successfully",
    )))
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateJobPostingRequest {
    pub position_title: Option<String>,
    pub job_description: Option<String>,
    pub qualifications: Option<String>,
    pub technical_competencies: Option<String>,
    pub salary_range: Option<String>,
    pub employment_type: Option<String>,
    pub num_vacancies: Option<i32>,
    pub application_deadline: Option<chrono::NaiveDate>,
}

/// Update a job posting's content
#[utoipa::path(
    put,
    path = "/api/v1/recruitment/postings/{posting_id}",
    tag = "recruitment",
    params(("posting_id" = i32, Path, description = "Posting ID")),
    request_body = UpdateJobPostingRequest,
    responses(
        (status = 200, description = "Posting updated", body = ApiResponse<JobPostingResponse>),
        (status = 404, description = "Posting not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_job_posting(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(posting_id): Path<i32>,
    Json(request): Json<UpdateJobPostingRequest>,
) -> Result<Json<ApiResponse<JobPostingResponse>>, ApiError> {
    trace!("Entering update_job_posting for id: {}", posting_id);
    require_role(&current, &[Role::Admin, Role::Hr])?;

    let model = job_posting::Entity::find_by_id(posting_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Posting {} not found", posting_id)))?;

    let mut active: job_posting::ActiveModel = model.into();
    if let Some(title) = request.position_title {
        active.position_title = Set(title);
    }
    if let Some(description) = request.job_description {
        active.job_description = Set(description);
    }
    if let Some(qualifications) = request.qualifications {
        active.qualifications = Set(qualifications);
    }
    if let Some(competencies) = request.technical_competencies {
        active.technical_competencies = Set(Some(competencies));
    }
    if let Some(salary_range) = request.salary_range {
        active.salary_range = Set(Some(salary_range));
    }
    if let Some(employment_type) = request.employment_type {
        active.employment_type = Set(Some(employment_type));
    }
    if let Some(num_vacancies) = request.num_vacancies {
        if num_vacancies <= 0 {
            return Err(ApiError::Validation(
                "Number of vacancies must be positive".to_string(),
            ));
        }
        active.num_vacancies = Set(num_vacancies);
    }
    if let Some(deadline) = request.application_deadline {
        active.application_deadline = Set(deadline);
    }
    active.updated_at = Set(chrono::Utc::now().naive_utc());

    let updated = active.update(&state.db).await?;

    audit_logs::record(
        &state.db,
        Some(current.id),
        "UPDATE",
        "job_postings",
        Some(posting_id.to_string()),
        None,
    )
    .await;

    info!("Job posting {} updated", updated.position_title);
    let response = to_posting_response(&state, updated).await?;
    Ok(Json(ApiResponse::new(
        response,
        "Job posting updated successfully",
    )))
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct PostingStatusRequest {
    /// Target state: "Published", "Closed" or "Filled".
    pub status: String,
}

/// Move a posting through its lifecycle
///
/// Draft postings can be published; published postings can be closed or
/// marked filled. Other transitions are rejected.
#[utoipa::path(
    post,
    path = "/api/v1/recruitment/postings/{posting_id}/status",
    tag = "recruitment",
    params(("posting_id" = i32, Path, description = "Posting ID")),
    request_body = PostingStatusRequest,
    responses(
        (status = 200, description = "Posting transitioned", body = ApiResponse<JobPostingResponse>),
        (status = 400, description = "Transition not allowed", body = ErrorResponse),
        (status = 404, description = "Posting not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn set_posting_status(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(posting_id): Path<i32>,
    Json(request): Json<PostingStatusRequest>,
) -> Result<Json<ApiResponse<JobPostingResponse>>, ApiError> {
    trace!("Entering set_posting_status for id: {}", posting_id);
    require_role(&current, &[Role::Admin, Role::Hr])?;

    let target = request
        .status
        .parse::<PostingStatus>()
        .map_err(ApiError::Validation)?;

    let model = job_posting::Entity::find_by_id(posting_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Posting {} not found", posting_id)))?;

    let allowed = matches!(
        (model.posting_status, target),
        (PostingStatus::Draft, PostingStatus::Published)
            | (PostingStatus::Published, PostingStatus::Closed)
            | (PostingStatus::Published, PostingStatus::Filled)
            | (PostingStatus::Closed, PostingStatus::Published)
    );
    if !allowed {
        warn!(
            "Rejected posting transition {} -> {} for posting {}",
            model.posting_status.as_str(),
            target.as_str(),
            posting_id
        );
        return Err(ApiError::Validation(format!(
            "Cannot move a {} posting to {}",
            model.posting_status.as_str(),
            target.as_str()
        )));
    }

    let mut active: job_posting::ActiveModel = model.into();
    active.posting_status = Set(target);
    active.updated_at = Set(chrono::Utc::now().naive_utc());
    let updated = active.update(&state.db).await?;

    audit_logs::record(
        &state.db,
        Some(current.id),
        "UPDATE",
        "job_postings",
        Some(posting_id.to_string()),
        Some(format!("Posting moved to {}", target.as_str())),
    )
    .await;
    state.cache.invalidate(DASHBOARD_CACHE_KEY).await;

    info!(
        "Job posting {} moved to {}",
        updated.position_title,
        target.as_str()
    );
    let response = to_posting_response(&state, updated).await?;
    Ok(Json(ApiResponse::new(
        response,
        "Job posting status updated successfully",
    )))
}

/// Delete a job posting
///
/// Postings with applications attached are part of the hiring record and
/// cannot be deleted; close them instead.
#[utoipa::path(
    delete,
    path = "/api/v1/recruitment/postings/{posting_id}",
    tag = "recruitment",
    params(("posting_id" = i32, Path, description = "Posting ID")),
    responses(
        (status = 200, description = "Posting deleted", body = ApiResponse<i32>),
        (status = 404, description = "Posting not found", body = ErrorResponse),
        (status = 409, description = "Posting has applications", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_job_posting(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(posting_id): Path<i32>,
) -> Result<Json<ApiResponse<i32>>, ApiError> {
    trace!("Entering delete_job_posting for id: {}", posting_id);
    require_role(&current, &[Role::Admin, Role::Hr])?;

    let model = job_posting::Entity::find_by_id(posting_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Posting {} not found", posting_id)))?;

    let attached = job_application::Entity::find()
        .filter(job_application::Column::PositionId.eq(posting_id))
        .count(&state.db)
        .await?;
    if attached > 0 {
        warn!(
            "Refusing to delete posting {} with {} applications",
            posting_id, attached
        );
        return Err(ApiError::Conflict(
            "Posting has applications and cannot be deleted".to_string(),
        ));
    }

    let title = model.position_title.clone();
    model.delete(&state.db).await?;

    audit_logs::record(
        &state.db,
        Some(current.id),
        "DELETE",
        "job_postings",
        Some(posting_id.to_string()),
        Some(format!("Deleted posting {}", title)),
    )
    .await;
    state.cache.invalidate(DASHBOARD_CACHE_KEY).await;

    info!("Job posting {} deleted", title);
    Ok(Json(ApiResponse::new(
        posting_id,
        "Job posting deleted successfully",
    )))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApplicationDocumentResponse {
    pub id: i32,
    pub document_type: String,
    pub document_path: String,
    pub uploaded_at: chrono::NaiveDateTime,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PipelineApplicationResponse {
    pub id: i32,
    pub position_id: i32,
    pub position_title: Option<String>,
    pub applicant_id: i32,
    pub applicant_name: Option<String>,
    pub applicant_email: Option<String>,
    pub cover_letter: Option<String>,
    pub status: String,
    pub application_date: chrono::NaiveDateTime,
    pub remarks: Option<String>,
    pub documents: Vec<ApplicationDocumentResponse>,
}

async fn to_pipeline_response(
    state: &AppState,
    model: job_application::Model,
) -> Result<PipelineApplicationResponse, ApiError> {
    let position_title = job_posting::Entity::find_by_id(model.position_id)
        .one(&state.db)
        .await?
        .map(|p| p.position_title);
    let applicant = job_applicant::Entity::find_by_id(model.applicant_id)
        .one(&state.db)
        .await?;
    let documents = application_document::Entity::find()
        .filter(application_document::Column::ApplicationId.eq(model.id))
        .all(&state.db)
        .await?
        .into_iter()
        .map(|d| ApplicationDocumentResponse {
            id: d.id,
            document_type: d.document_type,
            document_path: d.document_path,
            uploaded_at: d.uploaded_at,
        })
        .collect();

    Ok(PipelineApplicationResponse {
        id: model.id,
        position_id: model.position_id,
        position_title,
        applicant_id: model.applicant_id,
        applicant_name: applicant
            .as_ref()
            .map(|a| format!("{} {}", a.first_name, a.last_name)),
        applicant_email: applicant.map(|a| a.email),
        cover_letter: model.cover_letter,
        status: model.status.as_str().to_string(),
        application_date: model.application_date,
        remarks: model.remarks,
        documents,
    })
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PipelineQuery {
    pub position_id: Option<i32>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PipelineListResponse {
    pub applications: Vec<PipelineApplicationResponse>,
    pub pagination: Pagination,
}

/// List applications across the recruitment pipeline
#[utoipa::path(
    get,
    path = "/api/v1/recruitment/applications",
    tag = "recruitment",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Applications retrieved successfully", body = ApiResponse<PipelineListResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_pipeline_applications(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(pagination): Query<PaginationQuery>,
    Query(filter): Query<PipelineQuery>,
) -> Result<Json<ApiResponse<PipelineListResponse>>, ApiError> {
    trace!("Entering get_pipeline_applications function");
    require_role(&current, &[Role::Admin, Role::Hr])?;

    let mut query = job_application::Entity::find();
    if let Some(position_id) = filter.position_id {
        query = query.filter(job_application::Column::PositionId.eq(position_id));
    }
    if let Some(status) = &filter.status {
        let status = status
            .parse::<ApplicationStatus>()
            .map_err(ApiError::Validation)?;
        query = query.filter(job_application::Column::Status.eq(status));
    }

    let paginator = query
        .order_by_desc(job_application::Column::ApplicationDate)
        .paginate(&state.db, pagination.limit());
    let total = paginator.num_items().await?;
    let rows = paginator.fetch_page(pagination.page_index()).await?;

    let mut applications = Vec::with_capacity(rows.len());
    for row in rows {
        applications.push(to_pipeline_response(&state, row).await?);
    }

    debug!("Retrieved {} of {} pipeline applications", applications.len(), total);
    Ok(Json(ApiResponse::new(
        PipelineListResponse {
            applications,
            pagination: Pagination::new(&pagination, total),
        },
        "Applications retrieved successfully",
    )))
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateApplicationStatusRequest {
    pub status: String,
    pub remarks: Option<String>,
}

/// Advance an application through the pipeline
///
/// Withdrawn applications are owned by the candidate and cannot be moved.
/// The candidate is notified of every stage change.
#[utoipa::path(
    put,
    path = "/api/v1/recruitment/applications/{application_id}/status",
    tag = "recruitment",
    params(("application_id" = i32, Path, description = "Application ID")),
    request_body = UpdateApplicationStatusRequest,
    responses(
        (status = 200, description = "Application updated", body = ApiResponse<PipelineApplicationResponse>),
        (status = 400, description = "Invalid transition", body = ErrorResponse),
        (status = 404, description = "Application not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_application_status(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(application_id): Path<i32>,
    Json(request): Json<UpdateApplicationStatusRequest>,
) -> Result<Json<ApiResponse<PipelineApplicationResponse>>, ApiError> {
    trace!("Entering update_application_status for id: {}", application_id);
    require_role(&current, &[Role::Admin, Role::Hr])?;

    let target = request
        .status
        .parse::<ApplicationStatus>()
        .map_err(ApiError::Validation)?;
    if target == ApplicationStatus::Withdrawn {
        return Err(ApiError::Validation(
            "Only the applicant can withdraw an application".to_string(),
        ));
    }

    let model = job_application::Entity::find_by_id(application_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Application {} not found", application_id)))?;
    if model.status == ApplicationStatus::Withdrawn {
        return Err(ApiError::Validation(
            "Withdrawn applications cannot be moved".to_string(),
        ));
    }

    let applicant_id = model.applicant_id;
    let mut active: job_application::ActiveModel = model.into();
    active.status = Set(target);
    if let Some(remarks) = request.remarks {
        active.remarks = Set(Some(remarks));
    }
    let updated = active.update(&state.db).await?;

    if let Some(applicant) = job_applicant::Entity::find_by_id(applicant_id)
        .one(&state.db)
        .await?
    {
        notification::ActiveModel {
            user_id: Set(applicant.user_id),
            notification_type: Set("job_application".to_string()),
            message: Set(format!(
                "Your application status changed to {}",
                target.as_str()
            )),
            is_read: Set(false),
            related_id: Set(Some(application_id.to_string())),
            related_table: Set(Some("job_applications".to_string())),
            created_at: Set(chrono::Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(&state.db)
        .await?;
    }

    audit_logs::record(
        &state.db,
        Some(current.id),
        "UPDATE",
        "job_applications",
        Some(application_id.to_string()),
        Some(format!("Application moved to {}", target.as_str())),
    )
    .await;
    state.cache.invalidate(DASHBOARD_CACHE_KEY).await;

    info!(
        "Application {} moved to {} by {}",
        application_id,
        target.as_str(),
        current.username
    );
    let response = to_pipeline_response(&state, updated).await?;
    Ok(Json(ApiResponse::new(
        response,
        "Application status updated successfully",
    )))
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StatusCount {
    pub status: String,
    pub count: u64,
}

/// Headline numbers for the recruitment dashboard.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DashboardSummary {
    pub total_postings: u64,
    pub open_postings: u64,
    pub total_applications: u64,
    pub postings_by_status: Vec<StatusCount>,
    pub applications_by_status: Vec<StatusCount>,
}

/// Recruitment dashboard
///
/// Counts postings and applications by status. Cached; posting and pipeline
/// mutations invalidate it.
#[utoipa::path(
    get,
    path = "/api/v1/recruitment/dashboard",
    tag = "recruitment",
    responses(
        (status = 200, description = "Dashboard computed", body = ApiResponse<DashboardSummary>),
        (status = 403, description = "Insufficient role", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_dashboard(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<DashboardSummary>>, ApiError> {
    trace!("Entering get_dashboard function");
    require_role(&current, &[Role::Admin, Role::Hr])?;

    if let Some(CachedData::RecruitmentDashboard(summary)) =
        state.cache.get(DASHBOARD_CACHE_KEY).await
    {
        debug!("Recruitment dashboard served from cache");
        return Ok(Json(ApiResponse::new(
            summary,
            "Dashboard retrieved successfully",
        )));
    }

    let postings = job_posting::Entity::find().all(&state.db).await?;
    let applications = job_application::Entity::find().all(&state.db).await?;

    let mut postings_by_status: HashMap<&'static str, u64> = HashMap::new();
    for posting in &postings {
        *postings_by_status
            .entry(posting.posting_status.as_str())
            .or_insert(0) += 1;
    }
    let mut applications_by_status: HashMap<&'static str, u64> = HashMap::new();
    for application in &applications {
        *applications_by_status
            .entry(application.status.as_str())
            .or_insert(0) += 1;
    }

    let open_postings = postings
        .iter()
        .filter(|p| p.posting_status == PostingStatus::Published)
        .count() as u64;

    let mut postings_by_status: Vec<StatusCount> = postings_by_status
        .into_iter()
        .map(|(status, count)| StatusCount {
            status: status.to_string(),
            count,
        })
        .collect();
    postings_by_status.sort_by(|a, b| a.status.cmp(&b.status));
    let mut applications_by_status: Vec<StatusCount> = applications_by_status
        .into_iter()
        .map(|(status, count)| StatusCount {
            status: status.to_string(),
            count,
        })
        .collect();
    applications_by_status.sort_by(|a, b| a.status.cmp(&b.status));

    let summary = DashboardSummary {
        total_postings: postings.len() as u64,
        open_postings,
        total_applications: applications.len() as u64,
        postings_by_status,
        applications_by_status,
    };

    state
        .cache
        .insert(
            DASHBOARD_CACHE_KEY.to_string(),
            CachedData::RecruitmentDashboard(summary.clone()),
        )
        .await;

    debug!(
        "Dashboard computed over {} postings and {} applications",
        summary.total_postings, summary.total_applications
    );
    Ok(Json(ApiResponse::new(
        summary,
        "Dashboard retrieved successfully",
    )))
}
