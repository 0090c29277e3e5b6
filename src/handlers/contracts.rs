// src/handlers/contracts.rs

use std::str::FromStr;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;

use crate::{
    common::error::AppError,
    config::AppState,
    models::contract::{
        Contract, ContractFilter, ContractForm, EvidenceUpload, NewContract, SignaturesPayload,
    },
};

const EVIDENCE_FIELD: &str = "evidence";

fn bad_field(field: &str, value: &str) -> AppError {
    AppError::BadRequest(format!("Invalid value for '{field}': '{value}'"))
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| bad_field(field, value))
}

// Enum fields arrive as their bare variant name.
fn parse_enum<T: DeserializeOwned>(field: &str, value: &str) -> Result<T, AppError> {
    serde_json::from_value(serde_json::Value::String(value.to_string())).map_err(|_| bad_field(field, value))
}

/// Reads the contract form; the `evidence` part is optional and an empty upload counts as absent.
async fn read_contract_form(
    mut multipart: Multipart,
) -> Result<(NewContract, Option<EvidenceUpload>), AppError> {
    let mut input = NewContract::default();
    let mut evidence = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == EVIDENCE_FIELD {
            let file_name = field
                .file_name()
                .map(str::to_string)
                .unwrap_or_else(|| "evidencia".to_string());
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            if !bytes.is_empty() {
                evidence = Some(EvidenceUpload { file_name, bytes: bytes.to_vec() });
            }
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        let trimmed = value.trim();

        match name.as_str() {
            "title" => input.title = value,
            "client" => input.client = value,
            "services" => input.services = value,
            "deliverables" => input.deliverables = value,
            "observations" => input.observations = value,
            _ if trimmed.is_empty() => {}
            "monto" => {
                input.monto = Decimal::from_str(trimmed).map_err(|_| bad_field("monto", trimmed))?
            }
            "status" => input.status = Some(parse_enum("status", trimmed)?),
            "startDate" => input.start_date = Some(parse_date("startDate", trimmed)?),
            "endDate" => input.end_date = Some(parse_date("endDate", trimmed)?),
            "paymentMethod" => input.payment_method = Some(value),
            other => tracing::debug!("Ignoring unknown contract form field '{}'", other),
        }
    }

    Ok((input, evidence))
}

// POST /api/contracts
#[utoipa::path(
    post,
    path = "/api/contracts",
    tag = "Contracts",
    request_body(content = ContractForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Contrato registrado", body = Contract),
        (status = 400, description = "Título, cliente o monto inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_contract(
    State(app_state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let (input, evidence) = read_contract_form(multipart).await?;
    let contract = app_state.contract_service.create_contract(input, evidence).await?;
    Ok((StatusCode::CREATED, Json(contract)))
}

// GET /api/contracts
#[utoipa::path(
    get,
    path = "/api/contracts",
    tag = "Contracts",
    params(ContractFilter),
    responses((status = 200, description = "Contratos filtrados", body = Vec<Contract>)),
    security(("api_jwt" = []))
)]
pub async fn list_contracts(
    State(app_state): State<AppState>,
    Query(filter): Query<ContractFilter>,
) -> Result<impl IntoResponse, AppError> {
    let contracts = app_state.contract_service.list_contracts(&filter).await?;
    Ok((StatusCode::OK, Json(contracts)))
}

// GET /api/contracts/{id}
#[utoipa::path(
    get,
    path = "/api/contracts/{id}",
    tag = "Contracts",
    params(("id" = i64, Path, description = "ID del contrato")),
    responses(
        (status = 200, description = "Contrato", body = Contract),
        (status = 404, description = "Contrato no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_contract(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let contract = app_state.contract_service.get_contract(id).await?;
    Ok((StatusCode::OK, Json(contract)))
}

// PUT /api/contracts/{id}/signatures
#[utoipa::path(
    put,
    path = "/api/contracts/{id}/signatures",
    tag = "Contracts",
    params(("id" = i64, Path, description = "ID del contrato")),
    request_body = SignaturesPayload,
    responses(
        (status = 200, description = "Firmas registradas; el documento se regenera", body = Contract),
        (status = 404, description = "Contrato no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_signatures(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<SignaturesPayload>,
) -> Result<impl IntoResponse, AppError> {
    let contract = app_state.contract_service.update_signatures(id, payload).await?;
    Ok((StatusCode::OK, Json(contract)))
}

// DELETE /api/contracts/{id}
#[utoipa::path(
    delete,
    path = "/api/contracts/{id}",
    tag = "Contracts",
    params(("id" = i64, Path, description = "ID del contrato")),
    responses((status = 204, description = "Contrato eliminado (o inexistente)")),
    security(("api_jwt" = []))
)]
pub async fn delete_contract(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    app_state.contract_service.delete_contract(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
