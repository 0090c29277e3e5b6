// src/handlers/pipeline.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    models::pipeline::{AddObservationPayload, NewPipelineClient, PipelineClient, StageColumn, StageCounts},
};

// GET /api/pipeline
#[utoipa::path(
    get,
    path = "/api/pipeline",
    tag = "Pipeline",
    responses((status = 200, description = "Clientes agrupados por etapa", body = Vec<StageColumn>)),
    security(("api_jwt" = []))
)]
pub async fn get_board(State(app_state): State<AppState>) -> impl IntoResponse {
    Json(app_state.pipeline_service.board().await)
}

// GET /api/pipeline/counts
#[utoipa::path(
    get,
    path = "/api/pipeline/counts",
    tag = "Pipeline",
    responses((status = 200, description = "Clientes por etapa", body = StageCounts)),
    security(("api_jwt" = []))
)]
pub async fn get_stage_counts(State(app_state): State<AppState>) -> impl IntoResponse {
    Json(app_state.pipeline_service.stage_counts().await)
}

// POST /api/pipeline
#[utoipa::path(
    post,
    path = "/api/pipeline",
    tag = "Pipeline",
    request_body = NewPipelineClient,
    responses(
        (status = 201, description = "Cliente agregado en la primera etapa", body = PipelineClient),
        (status = 400, description = "Nombre vacío")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_pipeline_client(
    State(app_state): State<AppState>,
    Json(payload): Json<NewPipelineClient>,
) -> Result<impl IntoResponse, AppError> {
    let client = app_state.pipeline_service.create_client(payload).await?;
    Ok((StatusCode::CREATED, Json(client)))
}

// POST /api/pipeline/{id}/advance
#[utoipa::path(
    post,
    path = "/api/pipeline/{id}/advance",
    tag = "Pipeline",
    params(("id" = u64, Path, description = "ID en el pipeline")),
    responses(
        (status = 200, description = "Etapa siguiente; sin cambios en la última", body = PipelineClient),
        (status = 404, description = "Cliente no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn advance_stage(
    State(app_state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<impl IntoResponse, AppError> {
    let client = app_state.pipeline_service.advance(id).await?;
    Ok((StatusCode::OK, Json(client)))
}

// POST /api/pipeline/{id}/observations
#[utoipa::path(
    post,
    path = "/api/pipeline/{id}/observations",
    tag = "Pipeline",
    params(("id" = u64, Path, description = "ID en el pipeline")),
    request_body = AddObservationPayload,
    responses(
        (status = 200, description = "Observación agregada", body = PipelineClient),
        (status = 400, description = "Nota vacía"),
        (status = 404, description = "Cliente no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_observation(
    State(app_state): State<AppState>,
    Path(id): Path<u64>,
    Json(payload): Json<AddObservationPayload>,
) -> Result<impl IntoResponse, AppError> {
    let client = app_state.pipeline_service.add_observation(id, payload).await?;
    Ok((StatusCode::OK, Json(client)))
}
