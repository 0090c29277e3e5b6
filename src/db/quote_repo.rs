// src/db/quote_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{sqlite::SqliteRow, Executor, FromRow, Row, Sqlite, SqlitePool};

use crate::{
    common::{
        db_utils::{add_column_if_missing, decimal_column, json_column},
        error::AppError,
    },
    models::quote::{
        Modality, Quote, QuoteStatus, TraceEntry, DEFAULT_HOURS_PER_DAY, DEFAULT_SESSIONS,
    },
};

const QUOTE_COLUMNS: &str = "number, client, tax_id, address, phone, contact, contact_title, sector, \
                             date, problem, services, deliverables, value_add, payment_conditions, \
                             monto, status, logo, created_by, hours_per_day, sessions, modality, \
                             requirements";

// ==========================================
// Row mapping
// ==========================================

impl<'r> FromRow<'r, SqliteRow> for Quote {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let number: String = row.try_get("number")?;
        let mut decode_errors = Vec::new();

        let services = recover(&number, "services", json_column(row, "services")?, &mut decode_errors);
        let deliverables =
            recover(&number, "deliverables", json_column(row, "deliverables")?, &mut decode_errors);
        let mut modality: Vec<Modality> =
            recover(&number, "modality", json_column(row, "modality")?, &mut decode_errors);
        if modality.is_empty() {
            modality.push(Modality::Presencial);
        }

        let hours_per_day: Option<i64> = row.try_get("hours_per_day")?;
        let sessions: Option<i64> = row.try_get("sessions")?;
        let requirements: Option<String> = row.try_get("requirements")?;

        let mut quote = Quote {
            client: row.try_get("client")?,
            tax_id: row.try_get("tax_id")?,
            address: row.try_get("address")?,
            phone: row.try_get("phone")?,
            contact: row.try_get("contact")?,
            contact_title: row.try_get("contact_title")?,
            sector: row.try_get("sector")?,
            date: row.try_get("date")?,
            problem: row.try_get("problem")?,
            services,
            deliverables,
            value_add: row.try_get("value_add")?,
            payment_conditions: row.try_get("payment_conditions")?,
            monto: decimal_column(row, "monto")?,
            status: row.try_get("status")?,
            hours_per_day: hours_per_day.unwrap_or(DEFAULT_HOURS_PER_DAY),
            sessions: sessions.unwrap_or(DEFAULT_SESSIONS),
            modality,
            requirements: requirements.unwrap_or_default(),
            logo: row.try_get("logo")?,
            created_by: row.try_get("created_by")?,
            total_hours: Decimal::ZERO,
            estimated_days: Decimal::ZERO,
            decode_errors,
            number,
        };
        if quote.refresh_derived().is_err() {
            let err = AppError::DecodeError { field: "services", message: "total hours out of range".into() };
            tracing::warn!("Quote {}: {}", quote.number, err);
            quote.decode_errors.push(err.to_string());
        }
        Ok(quote)
    }
}

impl<'r> FromRow<'r, SqliteRow> for TraceEntry {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(TraceEntry {
            id: row.try_get("id")?,
            number: row.try_get("number")?,
            monto: decimal_column(row, "monto")?,
            user_name: row.try_get("user_name")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

// A broken collection is listed empty and reported, never fatal.
fn recover<T>(
    number: &str,
    column: &'static str,
    decoded: Result<Vec<T>, serde_json::Error>,
    errors: &mut Vec<String>,
) -> Vec<T> {
    decoded.unwrap_or_else(|e| {
        let err = AppError::DecodeError { field: column, message: e.to_string() };
        tracing::warn!("Quote {}: {}", number, err);
        errors.push(err.to_string());
        Vec::new()
    })
}

fn encode_json<T: serde::Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string(value).map_err(|e| AppError::InternalServerError(e.into()))
}

// ==========================================
// Repository
// ==========================================

#[derive(Clone)]
pub struct QuoteRepository {
    pool: SqlitePool,
}

impl QuoteRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn ensure_schema(&self) -> Result<(), AppError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS quotes (
                number             TEXT PRIMARY KEY,
                client             TEXT NOT NULL,
                tax_id             TEXT NOT NULL DEFAULT '',
                address            TEXT NOT NULL DEFAULT '',
                phone              TEXT NOT NULL DEFAULT '',
                contact            TEXT NOT NULL DEFAULT '',
                contact_title      TEXT NOT NULL DEFAULT '',
                sector             TEXT NOT NULL DEFAULT '',
                date               TEXT NOT NULL,
                problem            TEXT NOT NULL DEFAULT '',
                services           TEXT NOT NULL DEFAULT '[]',
                deliverables       TEXT NOT NULL DEFAULT '[]',
                value_add          TEXT NOT NULL DEFAULT '',
                payment_conditions TEXT NOT NULL DEFAULT '',
                monto              TEXT NOT NULL DEFAULT '0',
                status             TEXT NOT NULL,
                logo               TEXT,
                created_by         TEXT NOT NULL DEFAULT ''
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        // Time & modality came later; older files get the columns added in place.
        add_column_if_missing(&self.pool, "quotes", "hours_per_day INTEGER DEFAULT 8").await?;
        add_column_if_missing(&self.pool, "quotes", "sessions INTEGER DEFAULT 1").await?;
        add_column_if_missing(&self.pool, "quotes", "modality TEXT DEFAULT '[\"Presencial\"]'").await?;
        add_column_if_missing(&self.pool, "quotes", "requirements TEXT DEFAULT ''").await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS quote_trace (
                id         INTEGER PRIMARY KEY AUTOINCREMENT,
                number     TEXT NOT NULL,
                monto      TEXT NOT NULL,
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
    //  QUOTES
    // =========================================================================

    pub async fn exists<'e, E>(&self, executor: E, number: &str) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM quotes WHERE number = ?")
            .bind(number)
            .fetch_optional(executor)
            .await?;
        Ok(found.is_some())
    }

    /// Inserts the quote, replacing every field of an existing row with the same number.
    pub async fn upsert<'e, E>(&self, executor: E, quote: &Quote) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let services = encode_json(&quote.services)?;
        let deliverables = encode_json(&quote.deliverables)?;
        let modality = encode_json(&quote.modality)?;

        let sql = format!(
            "INSERT OR REPLACE INTO quotes ({QUOTE_COLUMNS}) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        );

        sqlx::query(&sql)
            .bind(&quote.number)
            .bind(&quote.client)
            .bind(&quote.tax_id)
            .bind(&quote.address)
            .bind(&quote.phone)
            .bind(&quote.contact)
            .bind(&quote.contact_title)
            .bind(&quote.sector)
            .bind(quote.date)
            .bind(&quote.problem)
            .bind(services)
            .bind(deliverables)
            .bind(&quote.value_add)
            .bind(&quote.payment_conditions)
            .bind(quote.monto.to_string())
            .bind(quote.status)
            .bind(&quote.logo)
            .bind(&quote.created_by)
            .bind(quote.hours_per_day)
            .bind(quote.sessions)
            .bind(modality)
            .bind(&quote.requirements)
            .execute(executor)
            .await?;

        Ok(())
    }

    pub async fn find<'e, E>(&self, executor: E, number: &str) -> Result<Option<Quote>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sql = format!("SELECT {QUOTE_COLUMNS} FROM quotes WHERE number = ?");
        let quote = sqlx::query_as::<_, Quote>(&sql)
            .bind(number)
            .fetch_optional(executor)
            .await?;
        Ok(quote)
    }

    pub async fn list_all<'e, E>(&self, executor: E) -> Result<Vec<Quote>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sql = format!("SELECT {QUOTE_COLUMNS} FROM quotes ORDER BY number ASC");
        let quotes = sqlx::query_as::<_, Quote>(&sql).fetch_all(executor).await?;
        Ok(quotes)
    }

    pub async fn count<'e, E>(&self, executor: E) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quotes")
            .fetch_one(executor)
            .await?;
        Ok(count)
    }

    pub async fn set_status<'e, E>(
        &self,
        executor: E,
        number: &str,
        status: QuoteStatus,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("UPDATE quotes SET status = ? WHERE number = ?")
            .bind(status)
            .bind(number)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn set_payment_conditions<'e, E>(
        &self,
        executor: E,
        number: &str,
        text: &str,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("UPDATE quotes SET payment_conditions = ? WHERE number = ?")
            .bind(text)
            .bind(number)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete<'e, E>(&self, executor: E, number: &str) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM quotes WHERE number = ?")
            .bind(number)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    // =========================================================================
    //  TRACE (append-only)
    // =========================================================================

    pub async fn append_trace<'e, E>(
        &self,
        executor: E,
        number: &str,
        monto: Decimal,
        user_name: &str,
        created_at: DateTime<Utc>,
    ) -> Result<TraceEntry, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let entry = sqlx::query_as::<_, TraceEntry>(
            r#"
            INSERT INTO quote_trace (number, monto, user_name, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, number, monto, user_name, created_at
            "#,
        )
        .bind(number)
        .bind(monto.to_string())
        .bind(user_name)
        .bind(created_at)
        .fetch_one(executor)
        .await?;
        Ok(entry)
    }

    pub async fn list_trace<'e, E>(&self, executor: E) -> Result<Vec<TraceEntry>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let entries = sqlx::query_as::<_, TraceEntry>(
            "SELECT id, number, monto, user_name, created_at FROM quote_trace ORDER BY id DESC",
        )
        .fetch_all(executor)
        .await?;
        Ok(entries)
    }
}
