// src/common/db_utils.rs

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

// ---
// Money columns: stored as TEXT so no float ever touches an amount
// ---

/// Reads a TEXT column holding a decimal amount.
pub(crate) fn decimal_column(row: &SqliteRow, column: &str) -> Result<Decimal, sqlx::Error> {
    let raw: String = row.try_get(column)?;
    Decimal::from_str(raw.trim()).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

/// Same as [`decimal_column`], but an absent or NULL value reads as zero.
pub(crate) fn decimal_column_or_zero(row: &SqliteRow, column: &str) -> Result<Decimal, sqlx::Error> {
    let raw: Option<String> = row.try_get(column)?;
    match raw {
        Some(raw) if !raw.trim().is_empty() => Decimal::from_str(raw.trim()).map_err(|e| {
            sqlx::Error::ColumnDecode {
                index: column.to_string(),
                source: Box::new(e),
            }
        }),
        _ => Ok(Decimal::ZERO),
    }
}

// ---
// Nested collections: strict typed JSON
// ---

/// Decodes a JSON-encoded collection column. The error is returned to the caller,
/// which decides how to surface it.
pub(crate) fn json_column<T: DeserializeOwned>(
    row: &SqliteRow,
    column: &str,
) -> Result<Result<Vec<T>, serde_json::Error>, sqlx::Error> {
    let raw: Option<String> = row.try_get(column)?;
    let raw = raw.unwrap_or_default();
    if raw.trim().is_empty() {
        return Ok(Ok(Vec::new()));
    }
    Ok(serde_json::from_str(&raw))
}

// ---
// Additive schema changes
// ---

/// Runs `ALTER TABLE <table> ADD COLUMN <definition>`; a "duplicate column" failure means the
/// column is already there and is swallowed.
pub(crate) async fn add_column_if_missing(
    pool: &SqlitePool,
    table: &str,
    definition: &str,
) -> Result<(), sqlx::Error> {
    let statement = format!("ALTER TABLE {table} ADD COLUMN {definition}");
    match sqlx::query(&statement).execute(pool).await {
        Ok(_) => {
            tracing::info!("Added column to {}: {}", table, definition);
            Ok(())
        }
        Err(sqlx::Error::Database(db_err)) if db_err.message().contains("duplicate column name") => {
            Ok(())
        }
        Err(e) => Err(e),
    }
}
