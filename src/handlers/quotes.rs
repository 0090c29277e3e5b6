// src/handlers/quotes.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::{
        contract::Contract,
        quote::{
            NextQuoteNumber, Quote, QuoteInput, SetQuoteStatusPayload, ShareLinkResponse,
            ShareQuotePayload, TraceEntry,
        },
    },
};

// POST /api/quotes
#[utoipa::path(
    post,
    path = "/api/quotes",
    tag = "Quotes",
    request_body = QuoteInput,
    responses(
        (status = 201, description = "Cotización creada; el monto se recalcula", body = Quote),
        (status = 400, description = "Datos inválidos"),
        (status = 409, description = "El número ya existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_quote(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<QuoteInput>,
) -> Result<impl IntoResponse, AppError> {
    let quote = app_state.quote_service.create_quote(payload, &user.name).await?;
    Ok((StatusCode::CREATED, Json(quote)))
}

// POST /api/quotes/save
#[utoipa::path(
    post,
    path = "/api/quotes/save",
    tag = "Quotes",
    request_body = QuoteInput,
    responses(
        (status = 200, description = "Cotización guardada; reemplaza la existente con el mismo número", body = Quote),
        (status = 400, description = "Datos inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn save_quote(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<QuoteInput>,
) -> Result<impl IntoResponse, AppError> {
    let quote = app_state.quote_service.save_quote(payload, &user.name).await?;
    Ok((StatusCode::OK, Json(quote)))
}

// GET /api/quotes
#[utoipa::path(
    get,
    path = "/api/quotes",
    tag = "Quotes",
    responses((status = 200, description = "Cotizaciones; `decodeErrors` marca colecciones ilegibles", body = Vec<Quote>)),
    security(("api_jwt" = []))
)]
pub async fn list_quotes(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let quotes = app_state.quote_service.list_quotes().await?;
    Ok((StatusCode::OK, Json(quotes)))
}

// GET /api/quotes/next-number
#[utoipa::path(
    get,
    path = "/api/quotes/next-number",
    tag = "Quotes",
    responses((status = 200, description = "Número sugerido", body = NextQuoteNumber)),
    security(("api_jwt" = []))
)]
pub async fn next_quote_number(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let number = app_state.quote_service.next_quote_number().await?;
    Ok((StatusCode::OK, Json(NextQuoteNumber { number })))
}

// GET /api/quotes/trace
#[utoipa::path(
    get,
    path = "/api/quotes/trace",
    tag = "Quotes",
    responses((status = 200, description = "Trazabilidad, más reciente primero", body = Vec<TraceEntry>)),
    security(("api_jwt" = []))
)]
pub async fn list_trace(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let trace = app_state.quote_service.list_trace().await?;
    Ok((StatusCode::OK, Json(trace)))
}

// GET /api/quotes/{number}
#[utoipa::path(
    get,
    path = "/api/quotes/{number}",
    tag = "Quotes",
    params(("number" = String, Path, description = "Número de cotización")),
    responses(
        (status = 200, description = "Cotización", body = Quote),
        (status = 404, description = "Cotización no encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_quote(
    State(app_state): State<AppState>,
    Path(number): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let quote = app_state.quote_service.get_quote(&number).await?;
    Ok((StatusCode::OK, Json(quote)))
}

// PUT /api/quotes/{number}
#[utoipa::path(
    put,
    path = "/api/quotes/{number}",
    tag = "Quotes",
    params(("number" = String, Path, description = "Número de cotización")),
    request_body = QuoteInput,
    responses(
        (status = 200, description = "Cotización actualizada", body = Quote),
        (status = 404, description = "Cotización no encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_quote(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(number): Path<String>,
    Json(mut payload): Json<QuoteInput>,
) -> Result<impl IntoResponse, AppError> {
    // The path names the row; the body cannot move it.
    payload.number = number;
    let quote = app_state.quote_service.update_quote(payload, &user.name).await?;
    Ok((StatusCode::OK, Json(quote)))
}

// DELETE /api/quotes/{number}
#[utoipa::path(
    delete,
    path = "/api/quotes/{number}",
    tag = "Quotes",
    params(("number" = String, Path, description = "Número de cotización")),
    responses((status = 204, description = "Cotización eliminada (o inexistente)")),
    security(("api_jwt" = []))
)]
pub async fn delete_quote(
    State(app_state): State<AppState>,
    Path(number): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    app_state.quote_service.delete_quote(&number).await?;
    Ok(StatusCode::NO_CONTENT)
}

// POST /api/quotes/{number}/convert
#[utoipa::path(
    post,
    path = "/api/quotes/{number}/convert",
    tag = "Quotes",
    params(("number" = String, Path, description = "Número de cotización")),
    responses(
        (status = 201, description = "Contrato por firmar generado", body = Contract),
        (status = 404, description = "Cotización no encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn convert_quote(
    State(app_state): State<AppState>,
    Path(number): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let contract = app_state.quote_service.convert_to_contract(&number).await?;
    Ok((StatusCode::CREATED, Json(contract)))
}

// POST /api/quotes/{number}/share
#[utoipa::path(
    post,
    path = "/api/quotes/{number}/share",
    tag = "Quotes",
    params(("number" = String, Path, description = "Número de cotización")),
    request_body = ShareQuotePayload,
    responses(
        (status = 200, description = "Enlace de WhatsApp; la cotización queda como enviada", body = ShareLinkResponse),
        (status = 400, description = "Teléfono sin dígitos"),
        (status = 404, description = "Cotización no encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn share_quote(
    State(app_state): State<AppState>,
    Path(number): Path<String>,
    Json(payload): Json<ShareQuotePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let response = app_state.quote_service.share_quote(&number, &payload.phone).await?;
    Ok((StatusCode::OK, Json(response)))
}

// PUT /api/quotes/{number}/status
#[utoipa::path(
    put,
    path = "/api/quotes/{number}/status",
    tag = "Quotes",
    params(("number" = String, Path, description = "Número de cotización")),
    request_body = SetQuoteStatusPayload,
    responses(
        (status = 200, description = "Estado actualizado", body = Quote),
        (status = 404, description = "Cotización no encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn set_quote_status(
    State(app_state): State<AppState>,
    Path(number): Path<String>,
    Json(payload): Json<SetQuoteStatusPayload>,
) -> Result<impl IntoResponse, AppError> {
    let quote = app_state.quote_service.set_status(&number, payload.status).await?;
    Ok((StatusCode::OK, Json(quote)))
}

// POST /api/quotes/{number}/conditions
#[utoipa::path(
    post,
    path = "/api/quotes/{number}/conditions",
    tag = "Quotes",
    params(("number" = String, Path, description = "Número de cotización")),
    responses(
        (status = 200, description = "Condiciones de pago regeneradas desde el monto", body = Quote),
        (status = 404, description = "Cotización no encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn recalculate_conditions(
    State(app_state): State<AppState>,
    Path(number): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let quote = app_state.quote_service.recalculate_conditions(&number).await?;
    Ok((StatusCode::OK, Json(quote)))
}
