// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::common::validation::not_blank;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

// Full row, hash included. Never serialized with the hash.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,

    #[serde(skip_serializing)]
    pub password_hash: String,

    pub role: Role,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// What the user listing and the session expose.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "admin")]
    pub name: String,
    #[schema(example = "admin@empresa.pe")]
    pub email: String,
    pub role: Role,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserAccount {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            last_login: user.last_login,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewUserPayload {
    #[validate(custom(function = "not_blank"))]
    #[schema(example = "mgarcia")]
    pub name: String,

    #[validate(email(message = "must be a valid e-mail address"))]
    #[schema(example = "mgarcia@empresa.pe")]
    pub email: String,

    #[validate(length(min = 1, message = "must not be empty"))]
    pub password: String,

    #[serde(default)]
    pub role: Option<Role>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginPayload {
    #[validate(custom(function = "not_blank"))]
    #[schema(example = "admin@empresa.pe")]
    pub email: String,

    #[validate(length(min = 1, message = "must not be empty"))]
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignRolePayload {
    pub role: Role,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user: UserAccount,
}

// JWT claims
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id
    pub role: Role,
    pub exp: usize,
    pub iat: usize,
}
