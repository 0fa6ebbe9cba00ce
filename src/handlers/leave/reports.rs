use axum::{
    extract::{Query, State},
    response::Json,
    Extension,
};
use chrono::Datelike;
use model::entities::leave_application::{self, LeaveStatus};
use model::entities::user::Role;
use model::entities::{department, leave_balance, leave_type, personnel};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, instrument, trace};
use utoipa::ToSchema;

use crate::auth::{require_role, CurrentUser};
use crate::error::ApiError;
use crate::handlers::leave::balances::remaining_credits;
use crate::schemas::{ApiResponse, AppState, CachedData, ErrorResponse};

pub const SUMMARY_CACHE_KEY: &str = "leave:summary";

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LeaveTypeBreakdown {
    pub leave_type_id: i32,
    pub leave_type_name: String,
    pub total: u64,
    pub approved: u64,
    pub pending: u64,
    pub rejected: u64,
    pub days_approved: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PersonnelLeaveUsage {
    pub personnel_id: i32,
    pub personnel_name: String,
    pub applications: u64,
    pub days_approved: i64,
}

/// Aggregated view over every leave application on record.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LeaveSummaryReport {
    pub total_applications: u64,
    pub approved: u64,
    pub pending: u64,
    pub rejected: u64,
    pub by_leave_type: Vec<LeaveTypeBreakdown>,
    pub by_personnel: Vec<PersonnelLeaveUsage>,
}

/// Leave summary report
///
/// Counts applications by status and breaks them down per leave type and per
/// personnel. The result is cached; mutations on applications invalidate it.
#[utoipa::path(
    get,
    path = "/api/v1/leave/reports/summary",
    tag = "leave",
    responses(
        (status = 200, description = "Summary computed", body = ApiResponse<LeaveSummaryReport>),
        (status = 403, description = "Insufficient role", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_leave_summary(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<LeaveSummaryReport>>, ApiError> {
    trace!("Entering get_leave_summary function");
    require_role(&current, &[Role::Admin, Role::Hr])?;

    if let Some(CachedData::LeaveSummary(report)) = state.cache.get(SUMMARY_CACHE_KEY).await {
        debug!("Leave summary served from cache");
        return Ok(Json(ApiResponse::new(
            report,
            "Leave summary retrieved successfully",
        )));
    }

    let applications = leave_application::Entity::find().all(&state.db).await?;
    let type_names: HashMap<i32, String> = leave_type::Entity::find()
        .all(&state.db)
        .await?
        .into_iter()
        .map(|t| (t.id, t.leave_type_name))
        .collect();
    let personnel_names: HashMap<i32, String> = personnel::Entity::find()
        .all(&state.db)
        .await?
        .into_iter()
        .map(|p| (p.id, format!("{} {}", p.first_name, p.last_name)))
        .collect();

    let mut approved = 0;
    let mut pending = 0;
    let mut rejected = 0;
    let mut per_type: HashMap<i32, LeaveTypeBreakdown> = HashMap::new();
    let mut per_personnel: HashMap<i32, PersonnelLeaveUsage> = HashMap::new();

    for app in &applications {
        match app.status {
            LeaveStatus::Approved => approved += 1,
            LeaveStatus::Pending => pending += 1,
            LeaveStatus::Rejected => rejected += 1,
        }

        let type_entry = per_type.entry(app.leave_type_id).or_insert_with(|| {
            LeaveTypeBreakdown {
                leave_type_id: app.leave_type_id,
                leave_type_name: type_names
                    .get(&app.leave_type_id)
                    .cloned()
                    .unwrap_or_else(|| "Unknown".to_string()),
                total: 0,
                approved: 0,
                pending: 0,
                rejected: 0,
                days_approved: 0,
            }
        });
        type_entry.total += 1;
        match app.status {
            LeaveStatus::Approved => {
                type_entry.approved += 1;
                type_entry.days_approved += app.total_days as i64;
            }
            LeaveStatus::Pending => type_entry.pending += 1,
            LeaveStatus::Rejected => type_entry.rejected += 1,
        }

        let person_entry = per_personnel.entry(app.personnel_id).or_insert_with(|| {
            PersonnelLeaveUsage {
                personnel_id: app.personnel_id,
                personnel_name: personnel_names
                    .get(&app.personnel_id)
                    .cloned()
                    .unwrap_or_else(|| "Unknown".to_string()),
                applications: 0,
                days_approved: 0,
            }
        });
        person_entry.applications += 1;
        if app.status == LeaveStatus::Approved {
            person_entry.days_approved += app.total_days as i64;
        }
    }

    let mut by_leave_type: Vec<_> = per_type.into_values().collect();
    by_leave_type.sort_by_key(|b| b.leave_type_id);
    let mut by_personnel: Vec<_> = per_personnel.into_values().collect();
    by_personnel.sort_by_key(|p| p.personnel_id);

    let report = LeaveSummaryReport {
        total_applications: applications.len() as u64,
        approved,
        pending,
        rejected,
        by_leave_type,
        by_personnel,
    };

    state
        .cache
        .insert(
            SUMMARY_CACHE_KEY.to_string(),
            CachedData::LeaveSummary(report.clone()),
        )
        .await;

    debug!(
        "Leave summary computed over {} applications",
        report.total_applications
    );
    Ok(Json(ApiResponse::new(
        report,
        "Leave summary retrieved successfully",
    )))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BalanceReportQuery {
    /// Defaults to the current year.
    pub year: Option<i32>,
    pub department_id: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BalanceReportRow {
    pub personnel_id: i32,
    pub personnel_name: String,
    pub department_name: Option<String>,
    pub leave_type_name: String,
    #[schema(value_type = String)]
    pub total_credits: Decimal,
    #[schema(value_type = String)]
    pub used_credits: Decimal,
    #[schema(value_type = String)]
    pub earned_credits: Decimal,
    #[schema(value_type = String)]
    pub remaining_credits: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BalanceReport {
    pub year: i32,
    pub rows: Vec<BalanceReportRow>,
}

/// Leave balance report for a year
///
/// One row per ledger entry with names resolved, optionally narrowed to a
/// department.
#[utoipa::path(
    get,
    path = "/api/v1/leave/reports/balances",
    tag = "leave",
    responses(
        (status = 200, description = "Balance report computed", body = ApiResponse<BalanceReport>),
        (status = 403, description = "Insufficient role", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_balance_report(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<BalanceReportQuery>,
) -> Result<Json<ApiResponse<BalanceReport>>, ApiError> {
    trace!("Entering get_balance_report function");
    require_role(&current, &[Role::Admin, Role::Hr])?;

    let year = query
        .year
        .unwrap_or_else(|| chrono::Utc::now().date_naive().year());

    let balances = leave_balance::Entity::find()
        .filter(leave_balance::Column::Year.eq(year))
        .all(&state.db)
        .await?;
    let people: HashMap<i32, personnel::Model> = personnel::Entity::find()
        .all(&state.db)
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();
    let departments: HashMap<i32, String> = department::Entity::find()
        .all(&state.db)
        .await?
        .into_iter()
        .map(|d| (d.id, d.department_name))
        .collect();
    let type_names: HashMap<i32, String> = leave_type::Entity::find()
        .all(&state.db)
        .await?
        .into_iter()
        .map(|t| (t.id, t.leave_type_name))
        .collect();

    let mut rows = Vec::new();
    for balance in balances {
        let Some(person) = people.get(&balance.personnel_id) else {
            continue;
        };
        if let Some(wanted) = query.department_id {
            if person.department_id != Some(wanted) {
                continue;
            }
        }
        rows.push(BalanceReportRow {
            personnel_id: person.id,
            personnel_name: format!("{} {}", person.first_name, person.last_name),
            department_name: person
                .department_id
                .and_then(|id| departments.get(&id).cloned()),
            leave_type_name: type_names
                .get(&balance.leave_type_id)
                .cloned()
                .unwrap_or_else(|| "Unknown".to_string()),
            total_credits: balance.total_credits,
            used_credits: balance.used_credits,
            earned_credits: balance.earned_credits,
            remaining_credits: remaining_credits(&balance),
        });
    }
    rows.sort_by(|a, b| a.personnel_name.cmp(&b.personnel_name));

    debug!("Balance report for {} has {} rows", year, rows.len());
    Ok(Json(ApiResponse::new(
        BalanceReport { year, rows },
        "Balance report retrieved successfully",
    )))
}
