// src/handlers/documents.rs

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};

use crate::{common::error::AppError, config::AppState, services::document_service::DocumentService};

fn pdf_response(file_name: String, bytes: Vec<u8>) -> Response {
    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{file_name}\"")),
    ];
    (headers, bytes).into_response()
}

// GET /api/quotes/{number}/document
#[utoipa::path(
    get,
    path = "/api/quotes/{number}/document",
    tag = "Quotes",
    params(("number" = String, Path, description = "Número de cotización")),
    responses(
        (status = 200, description = "PDF de la cotización", content_type = "application/pdf"),
        (status = 404, description = "Cotización no encontrada"),
        (status = 500, description = "No se pudo generar el documento")
    ),
    security(("api_jwt" = []))
)]
pub async fn quote_document(
    State(app_state): State<AppState>,
    Path(number): Path<String>,
) -> Result<Response, AppError> {
    let bytes = app_state.quote_service.render_document(&number).await?;
    Ok(pdf_response(DocumentService::quote_file_name(&number), bytes))
}

// GET /api/contracts/{id}/document
#[utoipa::path(
    get,
    path = "/api/contracts/{id}/document",
    tag = "Contracts",
    params(("id" = i64, Path, description = "ID del contrato")),
    responses(
        (status = 200, description = "PDF del contrato", content_type = "application/pdf"),
        (status = 404, description = "Contrato no encontrado"),
        (status = 500, description = "No se pudo generar el documento")
    ),
    security(("api_jwt" = []))
)]
pub async fn contract_document(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let bytes = app_state.contract_service.render_document(id).await?;
    Ok(pdf_response(DocumentService::contract_file_name(id), bytes))
}
