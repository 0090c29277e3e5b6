// src/db/client_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite, SqlitePool};

use crate::{
    common::error::AppError,
    models::client::{Client, ClientStatus, HistoryEntry, NewClient},
};

const CLIENT_COLUMNS: &str = "id, company_name, tax_id, address, phone, contact_name, contact_title, \
                              sector, status, created_by, created_at";

#[derive(Clone)]
pub struct ClientRepository {
    pool: SqlitePool,
}

impl ClientRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn ensure_schema(&self) -> Result<(), AppError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS clients (
                id            INTEGER PRIMARY KEY AUTOINCREMENT,
                company_name  TEXT NOT NULL,
                tax_id        TEXT NOT NULL DEFAULT '',
                address       TEXT NOT NULL DEFAULT '',
                phone         TEXT NOT NULL DEFAULT '',
                contact_name  TEXT NOT NULL,
                contact_title TEXT NOT NULL DEFAULT '',
                sector        TEXT NOT NULL,
                status        TEXT NOT NULL,
                created_by    TEXT NOT NULL,
                created_at    TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS client_history (
                id         INTEGER PRIMARY KEY AUTOINCREMENT,
                client_id  INTEGER NOT NULL,
                action     TEXT NOT NULL,
                user_name  TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // =========================================================================
    //  CLIENTS
    // =========================================================================

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        input: &NewClient,
        created_by: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Client, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sql = format!(
            r#"
            INSERT INTO clients (
                company_name, tax_id, address, phone, contact_name, contact_title,
                sector, status, created_by, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {CLIENT_COLUMNS}
            "#
        );

        let client = sqlx::query_as::<_, Client>(&sql)
            .bind(input.company_name.trim())
            .bind(&input.tax_id)
            .bind(&input.address)
            .bind(&input.phone)
            .bind(input.contact_name.trim())
            .bind(&input.contact_title)
            .bind(input.sector)
            .bind(input.status.unwrap_or_default())
            .bind(created_by)
            .bind(created_at)
            .fetch_one(executor)
            .await?;

        Ok(client)
    }

    pub async fn list_all<'e, E>(&self, executor: E) -> Result<Vec<Client>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sql = format!("SELECT {CLIENT_COLUMNS} FROM clients ORDER BY id ASC");
        let clients = sqlx::query_as::<_, Client>(&sql).fetch_all(executor).await?;
        Ok(clients)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: i64) -> Result<Option<Client>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sql = format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE id = ?");
        let client = sqlx::query_as::<_, Client>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(client)
    }

    // Company names are not unique; the newest record wins.
    pub async fn find_by_company_name<'e, E>(
        &self,
        executor: E,
        company_name: &str,
    ) -> Result<Option<Client>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sql = format!(
            "SELECT {CLIENT_COLUMNS} FROM clients WHERE company_name = ? ORDER BY id DESC LIMIT 1"
        );
        let client = sqlx::query_as::<_, Client>(&sql)
            .bind(company_name.trim())
            .fetch_optional(executor)
            .await?;
        Ok(client)
    }

    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        id: i64,
        status: ClientStatus,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("UPDATE clients SET status = ? WHERE id = ?")
            .bind(status)
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    // =========================================================================
    //  HISTORY (append-only)
    // =========================================================================

    pub async fn append_history<'e, E>(
        &self,
        executor: E,
        client_id: i64,
        action: &str,
        user_name: &str,
        created_at: DateTime<Utc>,
    ) -> Result<HistoryEntry, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let entry = sqlx::query_as::<_, HistoryEntry>(
            r#"
            INSERT INTO client_history (client_id, action, user_name, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, client_id, action, user_name, created_at
            "#,
        )
        .bind(client_id)
        .bind(action)
        .bind(user_name)
        .bind(created_at)
        .fetch_one(executor)
        .await?;
        Ok(entry)
    }

    pub async fn list_history<'e, E>(&self, executor: E) -> Result<Vec<HistoryEntry>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let entries = sqlx::query_as::<_, HistoryEntry>(
            "SELECT id, client_id, action, user_name, created_at FROM client_history ORDER BY id DESC",
        )
        .fetch_all(executor)
        .await?;
        Ok(entries)
    }
}
