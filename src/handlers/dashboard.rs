// src/handlers/dashboard.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{common::error::AppError, config::AppState, models::dashboard::DashboardSummary};

// GET /api/dashboard
#[utoipa::path(
    get,
    path = "/api/dashboard",
    tag = "Dashboard",
    responses((status = 200, description = "Indicadores generales", body = DashboardSummary)),
    security(("api_jwt" = []))
)]
pub async fn get_summary(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let summary = app_state.dashboard_service.get_summary().await?;
    Ok((StatusCode::OK, Json(summary)))
}
