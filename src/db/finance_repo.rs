// src/db/finance_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{sqlite::SqliteRow, Executor, FromRow, Row, Sqlite, SqlitePool};

use crate::{
    common::{
        db_utils::{decimal_column, decimal_column_or_zero},
        error::AppError,
    },
    models::finance::{ClientFinance, Movement, MovementKind},
};

impl<'r> FromRow<'r, SqliteRow> for ClientFinance {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let total = decimal_column(row, "total")?;
        let advance = decimal_column_or_zero(row, "advance")?;
        let paid = decimal_column_or_zero(row, "paid")?;
        let balance = ClientFinance::compute_balance(total, advance, paid).ok_or_else(|| {
            sqlx::Error::ColumnDecode {
                index: "balance".to_string(),
                source: "balance out of range".into(),
            }
        })?;
        Ok(ClientFinance {
            id: row.try_get("id")?,
            client: row.try_get("client")?,
            total,
            advance,
            paid,
            date: row.try_get("date")?,
            balance,
        })
    }
}

impl<'r> FromRow<'r, SqliteRow> for Movement {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Movement {
            id: row.try_get("id")?,
            kind: row.try_get("kind")?,
            description: row.try_get("description")?,
            monto: decimal_column(row, "monto")?,
            date: row.try_get("date")?,
        })
    }
}

// =========================================================================
//  CLIENT SUB-LEDGER (finanzas_clientes)
// =========================================================================

#[derive(Clone)]
pub struct ClientFinanceRepository {
    pool: SqlitePool,
}

impl ClientFinanceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn ensure_schema(&self) -> Result<(), AppError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS client_finance (
                id      INTEGER PRIMARY KEY AUTOINCREMENT,
                client  TEXT NOT NULL,
                total   TEXT NOT NULL,
                advance TEXT NOT NULL DEFAULT '0',
                paid    TEXT NOT NULL DEFAULT '0',
                date    TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        client: &str,
        total: Decimal,
        advance: Decimal,
        paid: Decimal,
        date: NaiveDate,
    ) -> Result<ClientFinance, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row = sqlx::query_as::<_, ClientFinance>(
            r#"
            INSERT INTO client_finance (client, total, advance, paid, date)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, client, total, advance, paid, date
            "#,
        )
        .bind(client)
        .bind(total.to_string())
        .bind(advance.to_string())
        .bind(paid.to_string())
        .bind(date)
        .fetch_one(executor)
        .await?;
        Ok(row)
    }

    pub async fn list_all<'e, E>(&self, executor: E) -> Result<Vec<ClientFinance>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let rows = sqlx::query_as::<_, ClientFinance>(
            "SELECT id, client, total, advance, paid, date FROM client_finance ORDER BY date ASC, id ASC",
        )
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    /// Replaces the advance and paid amounts. `None` when the id is unknown.
    pub async fn set_payments<'e, E>(
        &self,
        executor: E,
        id: i64,
        advance: Decimal,
        paid: Decimal,
    ) -> Result<Option<ClientFinance>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row = sqlx::query_as::<_, ClientFinance>(
            r#"
            UPDATE client_finance SET advance = ?, paid = ? WHERE id = ?
            RETURNING id, client, total, advance, paid, date
            "#,
        )
        .bind(advance.to_string())
        .bind(paid.to_string())
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(row)
    }
}

// =========================================================================
//  COMPANY LEDGER (finanzas)
// =========================================================================

#[derive(Clone)]
pub struct LedgerRepository {
    pool: SqlitePool,
}

impl LedgerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn ensure_schema(&self) -> Result<(), AppError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS movements (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                kind        TEXT NOT NULL,
                description TEXT NOT NULL,
                monto       TEXT NOT NULL,
                date        TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        kind: MovementKind,
        description: &str,
        monto: Decimal,
        date: NaiveDate,
    ) -> Result<Movement, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let movement = sqlx::query_as::<_, Movement>(
            r#"
            INSERT INTO movements (kind, description, monto, date)
            VALUES (?, ?, ?, ?)
            RETURNING id, kind, description, monto, date
            "#,
        )
        .bind(kind)
        .bind(description)
        .bind(monto.to_string())
        .bind(date)
        .fetch_one(executor)
        .await?;
        Ok(movement)
    }

    // Ledger order: date, then insertion.
    pub async fn list_all<'e, E>(&self, executor: E) -> Result<Vec<Movement>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let movements = sqlx::query_as::<_, Movement>(
            "SELECT id, kind, description, monto, date FROM movements ORDER BY date ASC, id ASC",
        )
        .fetch_all(executor)
        .await?;
        Ok(movements)
    }
}
