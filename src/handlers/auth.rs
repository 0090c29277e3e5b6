// src/handlers/auth.rs

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
    middleware::auth::{AuthenticatedUser, RequireAdmin},
    models::{
        auth::{AssignRolePayload, AuthResponse, LoginPayload, NewUserPayload, UserAccount},
        session::{Screen, SessionInfo},
    },
};

// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Sesión iniciada", body = AuthResponse),
        (status = 401, description = "Credenciales inválidas")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let (token, user) = app_state
        .auth_service
        .login(&payload.email, &payload.password)
        .await?;

    Ok((StatusCode::OK, Json(AuthResponse { token, user })))
}

// GET /api/session
#[utoipa::path(
    get,
    path = "/api/session",
    tag = "Auth",
    responses(
        (status = 200, description = "Usuario actual y pantallas disponibles", body = SessionInfo),
        (status = 401, description = "Token ausente o inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_session(AuthenticatedUser(user): AuthenticatedUser) -> Json<SessionInfo> {
    let screens = Screen::available_for(user.role);
    Json(SessionInfo { user, screens })
}

// =============================================================================
//  USERS (admin)
// =============================================================================

// GET /api/users
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses(
        (status = 200, description = "Usuarios registrados", body = Vec<UserAccount>),
        (status = 403, description = "Solo administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    _admin: RequireAdmin,
) -> Result<impl IntoResponse, AppError> {
    let users = app_state.auth_service.list_users().await?;
    Ok((StatusCode::OK, Json(users)))
}

// POST /api/users
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body = NewUserPayload,
    responses(
        (status = 201, description = "Usuario creado", body = UserAccount),
        (status = 400, description = "Datos inválidos"),
        (status = 409, description = "Nombre o e-mail ya registrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_user(
    State(app_state): State<AppState>,
    _admin: RequireAdmin,
    Json(payload): Json<NewUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    let user = app_state.auth_service.add_user(payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

// DELETE /api/users/{id}
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "ID del usuario")),
    responses((status = 204, description = "Usuario eliminado (o inexistente)")),
    security(("api_jwt" = []))
)]
pub async fn delete_user(
    State(app_state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    app_state.auth_service.delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// PUT /api/users/{id}/role
#[utoipa::path(
    put,
    path = "/api/users/{id}/role",
    tag = "Users",
    params(("id" = i64, Path, description = "ID del usuario")),
    request_body = AssignRolePayload,
    responses(
        (status = 200, description = "Rol asignado", body = UserAccount),
        (status = 404, description = "Usuario no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn assign_role(
    State(app_state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<i64>,
    Json(payload): Json<AssignRolePayload>,
) -> Result<impl IntoResponse, AppError> {
    let user = app_state.auth_service.assign_role(id, payload.role).await?;
    Ok((StatusCode::OK, Json(user)))
}
