// src/handlers/finance.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    models::finance::{
        BalanceBuckets, ClientFinance, LedgerSummary, Movement, MovementWithBalance,
        NewClientFinance, NewMovement, RecordPaymentPayload,
    },
};

// =============================================================================
//  CLIENT SUB-LEDGER
// =============================================================================

// POST /api/finance/clients
#[utoipa::path(
    post,
    path = "/api/finance/clients",
    tag = "Finance",
    request_body = NewClientFinance,
    responses(
        (status = 201, description = "Registro creado", body = ClientFinance),
        (status = 400, description = "Datos inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn record_client_finance(
    State(app_state): State<AppState>,
    Json(payload): Json<NewClientFinance>,
) -> Result<impl IntoResponse, AppError> {
    let row = app_state.finance_service.record_client_finance(payload).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

// GET /api/finance/clients
#[utoipa::path(
    get,
    path = "/api/finance/clients",
    tag = "Finance",
    responses((status = 200, description = "Registros agrupados por saldo", body = BalanceBuckets)),
    security(("api_jwt" = []))
)]
pub async fn list_client_finance(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let buckets = app_state.finance_service.list_by_balance_bucket().await?;
    Ok((StatusCode::OK, Json(buckets)))
}

// PUT /api/finance/clients/{id}/payment
#[utoipa::path(
    put,
    path = "/api/finance/clients/{id}/payment",
    tag = "Finance",
    params(("id" = i64, Path, description = "ID del registro")),
    request_body = RecordPaymentPayload,
    responses(
        (status = 200, description = "Pagos actualizados", body = ClientFinance),
        (status = 404, description = "Registro no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn record_payment(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<RecordPaymentPayload>,
) -> Result<impl IntoResponse, AppError> {
    let row = app_state.finance_service.record_payment(id, payload).await?;
    Ok((StatusCode::OK, Json(row)))
}

// =============================================================================
//  COMPANY LEDGER
// =============================================================================

// POST /api/finance/movements
#[utoipa::path(
    post,
    path = "/api/finance/movements",
    tag = "Finance",
    request_body = NewMovement,
    responses(
        (status = 201, description = "Movimiento registrado", body = Movement),
        (status = 400, description = "Descripción vacía o monto no positivo")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_movement(
    State(app_state): State<AppState>,
    Json(payload): Json<NewMovement>,
) -> Result<impl IntoResponse, AppError> {
    let movement = app_state.finance_service.add_movement(payload).await?;
    Ok((StatusCode::CREATED, Json(movement)))
}

// GET /api/finance/movements
#[utoipa::path(
    get,
    path = "/api/finance/movements",
    tag = "Finance",
    responses((status = 200, description = "Movimientos con saldo acumulado", body = Vec<MovementWithBalance>)),
    security(("api_jwt" = []))
)]
pub async fn list_movements(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let movements = app_state.finance_service.list_movements().await?;
    Ok((StatusCode::OK, Json(movements)))
}

// GET /api/finance/summary
#[utoipa::path(
    get,
    path = "/api/finance/summary",
    tag = "Finance",
    responses((status = 200, description = "Ingresos, egresos y neto", body = LedgerSummary)),
    security(("api_jwt" = []))
)]
pub async fn ledger_summary(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let summary = app_state.finance_service.summary().await?;
    Ok((StatusCode::OK, Json(summary)))
}
