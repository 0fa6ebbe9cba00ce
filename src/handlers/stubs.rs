//! Placeholder endpoints for modules that are on the roadmap but not yet
//! built. They answer 200 so portal clients can probe availability.

use axum::response::Json;
use tracing::{instrument, trace};

use crate::schemas::ApiResponse;

#[derive(Debug, serde::Serialize, utoipa::ToSchema)]
pub struct ModulePlaceholder {
    pub module: String,
    pub available: bool,
}

fn placeholder(module: &str) -> Json<ApiResponse<ModulePlaceholder>> {
    Json(ApiResponse::new(
        ModulePlaceholder {
            module: module.to_string(),
            available: false,
        },
        format!("The {} module is not yet available", module),
    ))
}

#[instrument]
pub async fn payroll() -> Json<ApiResponse<ModulePlaceholder>> {
    trace!("Entering payroll stub");
    placeholder("payroll")
}

#[instrument]
pub async fn timekeeping() -> Json<ApiResponse<ModulePlaceholder>> {
    trace!("Entering timekeeping stub");
    placeholder("timekeeping")
}

#[instrument]
pub async fn performance() -> Json<ApiResponse<ModulePlaceholder>> {
    trace!("Entering performance stub");
    placeholder("performance")
}

#[instrument]
pub async fn health_wellness() -> Json<ApiResponse<ModulePlaceholder>> {
    trace!("Entering health_wellness stub");
    placeholder("health-wellness")
}
