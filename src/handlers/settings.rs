// src/handlers/settings.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::RequireAdmin,
    models::settings::{CompanyProfile, SaveProfilePayload},
};

// GET /api/settings
#[utoipa::path(
    get,
    path = "/api/settings",
    tag = "Settings",
    responses((status = 200, description = "Membrete de la empresa", body = CompanyProfile)),
    security(("api_jwt" = []))
)]
pub async fn get_settings(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let profile = app_state.settings_service.get_profile().await?;
    Ok((StatusCode::OK, Json(profile)))
}

// PUT /api/settings
#[utoipa::path(
    put,
    path = "/api/settings",
    tag = "Settings",
    request_body = SaveProfilePayload,
    responses(
        (status = 200, description = "Membrete guardado", body = CompanyProfile),
        (status = 400, description = "Datos inválidos"),
        (status = 403, description = "Solo administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_settings(
    State(app_state): State<AppState>,
    _admin: RequireAdmin,
    Json(payload): Json<SaveProfilePayload>,
) -> Result<impl IntoResponse, AppError> {
    let updated = app_state.settings_service.save_profile(payload).await?;
    Ok((StatusCode::OK, Json(updated)))
}
