// src/db/settings_repo.rs

use sqlx::{Acquire, Executor, Sqlite, SqlitePool};
use validator::Validate;

use crate::{
    common::{db_utils::add_column_if_missing, error::AppError},
    models::settings::{CompanyProfile, SaveProfilePayload},
};

#[derive(Clone)]
pub struct SettingsRepository {
    pool: SqlitePool,
}

impl SettingsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn ensure_schema(&self) -> Result<(), AppError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS company (
                id      INTEGER PRIMARY KEY AUTOINCREMENT,
                name    TEXT NOT NULL,
                logo    TEXT,
                address TEXT NOT NULL DEFAULT '',
                phone   TEXT NOT NULL DEFAULT '',
                email   TEXT NOT NULL DEFAULT ''
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        add_column_if_missing(&self.pool, "company", "about_us TEXT NOT NULL DEFAULT ''").await?;
        add_column_if_missing(&self.pool, "company", "sales_text TEXT NOT NULL DEFAULT ''").await?;
        Ok(())
    }

    /// The stored profile, or the "not configured" default.
    pub async fn get_profile<'e, E>(&self, executor: E) -> Result<CompanyProfile, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let profile = sqlx::query_as::<_, CompanyProfile>(
            "SELECT name, logo, address, phone, email, about_us, sales_text FROM company LIMIT 1",
        )
        .fetch_optional(executor)
        .await?;

        Ok(profile.unwrap_or_default())
    }

    /// Replaces the single profile row.
    pub async fn save_profile<'a, A>(
        &self,
        conn: A,
        input: SaveProfilePayload,
    ) -> Result<CompanyProfile, AppError>
    where
        A: Acquire<'a, Database = Sqlite>,
    {
        input.validate()?;

        let mut tx = conn.begin().await?;

        sqlx::query("DELETE FROM company").execute(&mut *tx).await?;

        let profile = sqlx::query_as::<_, CompanyProfile>(
            r#"
            INSERT INTO company (name, logo, address, phone, email, about_us, sales_text)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING name, logo, address, phone, email, about_us, sales_text
            "#,
        )
        .bind(input.name.trim())
        .bind(input.logo.as_deref().map(str::trim).filter(|l| !l.is_empty()))
        .bind(&input.address)
        .bind(&input.phone)
        .bind(&input.email)
        .bind(&input.about_us)
        .bind(&input.sales_text)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!("Company profile saved: {}", profile.name);
        Ok(profile)
    }
}
