// src/db/user_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite, SqlitePool};

use crate::{
    common::error::AppError,
    models::auth::{Role, User, UserAccount},
};

// Responsible for every interaction with the 'users' table.
#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn ensure_schema(&self) -> Result<(), AppError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id            INTEGER PRIMARY KEY AUTOINCREMENT,
                name          TEXT NOT NULL UNIQUE,
                email         TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                role          TEXT NOT NULL DEFAULT 'user',
                last_login    TEXT,
                created_at    TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn create_user<'e, E>(
        &self,
        executor: E,
        name: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash, role, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, name, email, password_hash, role, last_login, created_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .bind(Utc::now())
        .fetch_one(executor)
        .await
        .map_err(|e| {
            // SQLite names the failing column: "UNIQUE constraint failed: users.email"
            let what = match &e {
                sqlx::Error::Database(db_err) if db_err.message().contains("users.email") => "E-mail",
                _ => "User name",
            };
            AppError::from_unique(e, what)
        })
    }

    pub async fn find_by_email<'e, E>(&self, executor: E, email: &str) -> Result<Option<User>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, role, last_login, created_at FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(executor)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: i64) -> Result<Option<User>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, role, last_login, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(user)
    }

    // Everything but the hash, insertion order.
    pub async fn list_accounts<'e, E>(&self, executor: E) -> Result<Vec<UserAccount>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let users = sqlx::query_as::<_, UserAccount>(
            "SELECT id, name, email, role, last_login, created_at FROM users ORDER BY id ASC",
        )
        .fetch_all(executor)
        .await?;
        Ok(users)
    }

    pub async fn count<'e, E>(&self, executor: E) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(executor)
            .await?;
        Ok(count)
    }

    pub async fn touch_last_login<'e, E>(
        &self,
        executor: E,
        id: i64,
        at: DateTime<Utc>,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query("UPDATE users SET last_login = ? WHERE id = ?")
            .bind(at)
            .bind(id)
            .execute(executor)
            .await?;
        Ok(())
    }

    /// Returns the number of rows changed (0 when the id is unknown).
    pub async fn set_role<'e, E>(&self, executor: E, id: i64, role: Role) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("UPDATE users SET role = ? WHERE id = ?")
            .bind(role)
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete<'e, E>(&self, executor: E, id: i64) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
