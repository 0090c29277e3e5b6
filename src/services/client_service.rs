// src/services/client_service.rs

use chrono::Utc;
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::ClientRepository,
    models::client::{Client, ClientFilter, ClientStatus, ClientSummary, HistoryEntry, NewClient},
};

pub const CREATION_ACTION: &str = "Creation";

#[derive(Clone)]
pub struct ClientService {
    repo: ClientRepository,
    pool: SqlitePool,
}

impl ClientService {
    pub fn new(repo: ClientRepository, pool: SqlitePool) -> Self {
        Self { repo, pool }
    }

    /// Inserts the client and its "Creation" history entry in one transaction.
    pub async fn create_client(&self, input: NewClient, user_name: &str) -> Result<Client, AppError> {
        input.validate()?;

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let client = self.repo.insert(&mut *tx, &input, user_name, now).await?;
        self.repo
            .append_history(&mut *tx, client.id, CREATION_ACTION, user_name, now)
            .await?;

        tx.commit().await?;

        tracing::info!("Client {} '{}' created by {}", client.id, client.company_name, user_name);
        Ok(client)
    }

    pub async fn list_clients(&self, filter: &ClientFilter) -> Result<Vec<Client>, AppError> {
        let clients = self.repo.list_all(&self.pool).await?;
        Ok(clients.into_iter().filter(|c| filter.matches(c)).collect())
    }

    pub async fn get_client(&self, id: i64) -> Result<Client, AppError> {
        self.repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Client {id}")))
    }

    /// Looks a client up by exact company name; `None` when unknown.
    pub async fn find_by_company_name(&self, company_name: &str) -> Result<Option<Client>, AppError> {
        self.repo.find_by_company_name(&self.pool, company_name).await
    }

    pub async fn summary(&self, filter: &ClientFilter) -> Result<ClientSummary, AppError> {
        let clients = self.list_clients(filter).await?;
        Ok(ClientSummary::from_clients(&clients))
    }

    pub async fn update_status(
        &self,
        id: i64,
        status: ClientStatus,
        user_name: &str,
    ) -> Result<Client, AppError> {
        let mut tx = self.pool.begin().await?;

        if self.repo.update_status(&mut *tx, id, status).await? == 0 {
            return Err(AppError::NotFound(format!("Client {id}")));
        }
        self.repo
            .append_history(&mut *tx, id, &format!("Status: {}", status.label()), user_name, Utc::now())
            .await?;
        let client = self
            .repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Client {id}")))?;

        tx.commit().await?;
        Ok(client)
    }

    /// Newest first.
    pub async fn list_history(&self) -> Result<Vec<HistoryEntry>, AppError> {
        self.repo.list_history(&self.pool).await
    }
}
