// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AdminBootstrap,
    db::UserRepository,
    models::auth::{Claims, NewUserPayload, Role, User, UserAccount},
};

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    pool: SqlitePool,
    jwt_secret: String,
    session_ttl_hours: i64,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        pool: SqlitePool,
        jwt_secret: String,
        session_ttl_hours: i64,
        bcrypt_cost: u32,
    ) -> Self {
        Self { user_repo, pool, jwt_secret, session_ttl_hours, bcrypt_cost }
    }

    pub async fn add_user(&self, input: NewUserPayload) -> Result<UserAccount, AppError> {
        input.validate()?;

        // Hashing stays off the async runtime
        let password = input.password.clone();
        let cost = self.bcrypt_cost;
        let password_hash = tokio::task::spawn_blocking(move || hash(&password, cost))
            .await
            .map_err(|e| anyhow::anyhow!("Hashing task failed: {}", e))??;

        let user = self
            .user_repo
            .create_user(
                &self.pool,
                input.name.trim(),
                input.email.trim(),
                &password_hash,
                input.role.unwrap_or_default(),
            )
            .await?;

        tracing::info!("User created: {} ({:?})", user.name, user.role);
        Ok(user.into())
    }

    /// Returns the user whose stored hash matches; stamps the login time.
    /// Unknown e-mail and wrong password both yield `InvalidCredentials`.
    pub async fn validate_user(&self, email: &str, password: &str) -> Result<UserAccount, AppError> {
        let user = self
            .user_repo
            .find_by_email(&self.pool, email.trim())
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        let is_password_valid =
            tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
                .await
                .map_err(|e| anyhow::anyhow!("Password verification task failed: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        let now = Utc::now();
        self.user_repo.touch_last_login(&self.pool, user.id, now).await?;

        let mut account = UserAccount::from(user);
        account.last_login = Some(now);
        Ok(account)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<(String, UserAccount), AppError> {
        let account = self.validate_user(email, password).await?;
        let token = self.create_token(&account)?;
        Ok((token, account))
    }

    pub async fn list_users(&self) -> Result<Vec<UserAccount>, AppError> {
        self.user_repo.list_accounts(&self.pool).await
    }

    /// Idempotent.
    pub async fn delete_user(&self, id: i64) -> Result<(), AppError> {
        let removed = self.user_repo.delete(&self.pool, id).await?;
        if removed > 0 {
            tracing::info!("User {} deleted", id);
        }
        Ok(())
    }

    pub async fn assign_role(&self, id: i64, role: Role) -> Result<UserAccount, AppError> {
        if self.user_repo.set_role(&self.pool, id, role).await? == 0 {
            return Err(AppError::NotFound(format!("User {id}")));
        }
        let user = self
            .user_repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {id}")))?;
        Ok(user.into())
    }

    /// Creates the configured admin when the store holds no users at all.
    pub async fn bootstrap_admin(&self, admin: &AdminBootstrap) -> Result<(), AppError> {
        if self.user_repo.count(&self.pool).await? > 0 {
            return Ok(());
        }
        self.add_user(NewUserPayload {
            name: admin.name.clone(),
            email: admin.email.clone(),
            password: admin.password.clone(),
            role: Some(Role::Admin),
        })
        .await?;
        tracing::info!("Bootstrap admin '{}' created", admin.name);
        Ok(())
    }

    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        let user_id: i64 = token_data.claims.sub.parse().map_err(|_| AppError::InvalidToken)?;

        // A deleted account invalidates its outstanding tokens.
        self.user_repo
            .find_by_id(&self.pool, user_id)
            .await?
            .ok_or(AppError::InvalidToken)
    }

    fn create_token(&self, account: &UserAccount) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::hours(self.session_ttl_hours);

        let claims = Claims {
            sub: account.id.to_string(),
            role: account.role,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}
