// src/handlers/clients.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::client::{
        Client, ClientFilter, ClientSummary, HistoryEntry, NewClient, UpdateClientStatusPayload,
    },
};

// POST /api/clients
#[utoipa::path(
    post,
    path = "/api/clients",
    tag = "Clients",
    request_body = NewClient,
    responses(
        (status = 201, description = "Cliente registrado", body = Client),
        (status = 400, description = "Empresa o contacto vacío")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_client(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<NewClient>,
) -> Result<impl IntoResponse, AppError> {
    let client = app_state.client_service.create_client(payload, &user.name).await?;
    Ok((StatusCode::CREATED, Json(client)))
}

// GET /api/clients
#[utoipa::path(
    get,
    path = "/api/clients",
    tag = "Clients",
    params(ClientFilter),
    responses((status = 200, description = "Clientes filtrados", body = Vec<Client>)),
    security(("api_jwt" = []))
)]
pub async fn list_clients(
    State(app_state): State<AppState>,
    Query(filter): Query<ClientFilter>,
) -> Result<impl IntoResponse, AppError> {
    let clients = app_state.client_service.list_clients(&filter).await?;
    Ok((StatusCode::OK, Json(clients)))
}

// GET /api/clients/summary
#[utoipa::path(
    get,
    path = "/api/clients/summary",
    tag = "Clients",
    params(ClientFilter),
    responses((status = 200, description = "Métricas sobre los clientes filtrados", body = ClientSummary)),
    security(("api_jwt" = []))
)]
pub async fn client_summary(
    State(app_state): State<AppState>,
    Query(filter): Query<ClientFilter>,
) -> Result<impl IntoResponse, AppError> {
    let summary = app_state.client_service.summary(&filter).await?;
    Ok((StatusCode::OK, Json(summary)))
}

// GET /api/clients/history
#[utoipa::path(
    get,
    path = "/api/clients/history",
    tag = "Clients",
    responses((status = 200, description = "Historial completo, más reciente primero", body = Vec<HistoryEntry>)),
    security(("api_jwt" = []))
)]
pub async fn list_history(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let history = app_state.client_service.list_history().await?;
    Ok((StatusCode::OK, Json(history)))
}

// GET /api/clients/{id}
#[utoipa::path(
    get,
    path = "/api/clients/{id}",
    tag = "Clients",
    params(("id" = i64, Path, description = "ID del cliente")),
    responses(
        (status = 200, description = "Cliente", body = Client),
        (status = 404, description = "Cliente no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_client(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let client = app_state.client_service.get_client(id).await?;
    Ok((StatusCode::OK, Json(client)))
}

// PUT /api/clients/{id}/status
#[utoipa::path(
    put,
    path = "/api/clients/{id}/status",
    tag = "Clients",
    params(("id" = i64, Path, description = "ID del cliente")),
    request_body = UpdateClientStatusPayload,
    responses(
        (status = 200, description = "Estado actualizado", body = Client),
        (status = 404, description = "Cliente no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_client_status(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateClientStatusPayload>,
) -> Result<impl IntoResponse, AppError> {
    let client = app_state
        .client_service
        .update_status(id, payload.status, &user.name)
        .await?;
    Ok((StatusCode::OK, Json(client)))
}
