// src/db/store.rs

use std::{path::Path, str::FromStr, time::Duration};

use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};

use crate::common::error::AppError;

// One single-file database per bounded context.
pub const USERS_DB: &str = "usuarios.db";
pub const CLIENTS_DB: &str = "clientes.db";
pub const QUOTES_DB: &str = "cotizaciones.db";
pub const CONTRACTS_DB: &str = "contratos.db";
pub const CLIENT_FINANCE_DB: &str = "finanzas_clientes.db";
pub const LEDGER_DB: &str = "finanzas.db";
pub const SETTINGS_DB: &str = "configuracion.db";

/// Handles to every physical store.
#[derive(Clone)]
pub struct Stores {
    pub users: SqlitePool,
    pub clients: SqlitePool,
    pub quotes: SqlitePool,
    pub contracts: SqlitePool,
    pub client_finance: SqlitePool,
    pub ledger: SqlitePool,
    pub settings: SqlitePool,
}

impl Stores {
    /// Opens (creating when absent) the store files under `data_dir`.
    pub async fn open(data_dir: &Path) -> Result<Self, AppError> {
        tokio::fs::create_dir_all(data_dir).await?;

        let stores = Self {
            users: open_file(&data_dir.join(USERS_DB)).await?,
            clients: open_file(&data_dir.join(CLIENTS_DB)).await?,
            quotes: open_file(&data_dir.join(QUOTES_DB)).await?,
            contracts: open_file(&data_dir.join(CONTRACTS_DB)).await?,
            client_finance: open_file(&data_dir.join(CLIENT_FINANCE_DB)).await?,
            ledger: open_file(&data_dir.join(LEDGER_DB)).await?,
            settings: open_file(&data_dir.join(SETTINGS_DB)).await?,
        };

        tracing::info!("Stores opened under {}", data_dir.display());
        Ok(stores)
    }

    /// Private in-memory databases, one per store.
    pub async fn in_memory() -> Result<Self, AppError> {
        Ok(Self {
            users: open_memory().await?,
            clients: open_memory().await?,
            quotes: open_memory().await?,
            contracts: open_memory().await?,
            client_finance: open_memory().await?,
            ledger: open_memory().await?,
            settings: open_memory().await?,
        })
    }
}

async fn open_file(path: &Path) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .busy_timeout(Duration::from_secs(5));

    SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(3))
        .connect_with(options)
        .await
}

// A memory database lives as long as its connection, so the pool keeps exactly one forever.
async fn open_memory() -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?;

    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
}
