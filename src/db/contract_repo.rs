// src/db/contract_repo.rs

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{sqlite::SqliteRow, Executor, FromRow, Row, Sqlite, SqlitePool};

use crate::{
    common::{db_utils::decimal_column, error::AppError},
    models::contract::{Contract, NewContract, DEFAULT_PAYMENT_METHOD},
};

const CONTRACT_COLUMNS: &str = "id, title, client, services, deliverables, monto, status, start_date, \
                                end_date, payment_method, evidence_path, client_signature, \
                                company_signature, observations, created_at";

impl<'r> FromRow<'r, SqliteRow> for Contract {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Contract {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            client: row.try_get("client")?,
            services: row.try_get("services")?,
            deliverables: row.try_get("deliverables")?,
            monto: decimal_column(row, "monto")?,
            status: row.try_get("status")?,
            start_date: row.try_get("start_date")?,
            end_date: row.try_get("end_date")?,
            payment_method: row.try_get("payment_method")?,
            evidence_path: row.try_get("evidence_path")?,
            client_signature: row.try_get("client_signature")?,
            company_signature: row.try_get("company_signature")?,
            observations: row.try_get("observations")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[derive(Clone)]
pub struct ContractRepository {
    pool: SqlitePool,
}

impl ContractRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn ensure_schema(&self) -> Result<(), AppError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS contracts (
                id                INTEGER PRIMARY KEY AUTOINCREMENT,
                title             TEXT NOT NULL,
                client            TEXT NOT NULL,
                services          TEXT NOT NULL DEFAULT '',
                deliverables      TEXT NOT NULL DEFAULT '',
                monto             TEXT NOT NULL,
                status            TEXT NOT NULL,
                start_date        TEXT NOT NULL,
                end_date          TEXT,
                payment_method    TEXT NOT NULL,
                evidence_path     TEXT,
                client_signature  TEXT,
                company_signature TEXT,
                observations      TEXT NOT NULL DEFAULT '',
                created_at        TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Missing status, start date and payment method fall back to Active, `today` and bank deposit.
    pub async fn insert<'e, E>(
        &self,
        executor: E,
        input: &NewContract,
        evidence_path: Option<&str>,
        today: NaiveDate,
        created_at: DateTime<Utc>,
    ) -> Result<Contract, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let payment_method = input
            .payment_method
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_PAYMENT_METHOD);

        let sql = format!(
            r#"
            INSERT INTO contracts (
                title, client, services, deliverables, monto, status, start_date, end_date,
                payment_method, evidence_path, observations, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {CONTRACT_COLUMNS}
            "#
        );

        let contract = sqlx::query_as::<_, Contract>(&sql)
            .bind(input.title.trim())
            .bind(input.client.trim())
            .bind(&input.services)
            .bind(&input.deliverables)
            .bind(input.monto.to_string())
            .bind(input.status.unwrap_or_default())
            .bind(input.start_date.unwrap_or(today))
            .bind(input.end_date)
            .bind(payment_method)
            .bind(evidence_path)
            .bind(&input.observations)
            .bind(created_at)
            .fetch_one(executor)
            .await?;

        Ok(contract)
    }

    pub async fn list_all<'e, E>(&self, executor: E) -> Result<Vec<Contract>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sql = format!("SELECT {CONTRACT_COLUMNS} FROM contracts ORDER BY id DESC");
        let contracts = sqlx::query_as::<_, Contract>(&sql).fetch_all(executor).await?;
        Ok(contracts)
    }

    pub async fn find<'e, E>(&self, executor: E, id: i64) -> Result<Option<Contract>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sql = format!("SELECT {CONTRACT_COLUMNS} FROM contracts WHERE id = ?");
        let contract = sqlx::query_as::<_, Contract>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(contract)
    }

    pub async fn update_signatures<'e, E>(
        &self,
        executor: E,
        id: i64,
        client_signature: Option<&str>,
        company_signature: Option<&str>,
    ) -> Result<Option<Contract>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sql = format!(
            "UPDATE contracts SET client_signature = ?, company_signature = ? WHERE id = ? \
             RETURNING {CONTRACT_COLUMNS}"
        );
        let contract = sqlx::query_as::<_, Contract>(&sql)
            .bind(client_signature)
            .bind(company_signature)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(contract)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: i64) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM contracts WHERE id = ?")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
