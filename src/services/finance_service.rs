// src/services/finance_service.rs

use chrono::Utc;
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::{ClientFinanceRepository, LedgerRepository},
    models::finance::{
        BalanceBuckets, ClientFinance, LedgerSummary, Movement, MovementWithBalance, NewClientFinance,
        NewMovement, RecordPaymentPayload,
    },
};

/// The two sub-ledgers live in separate stores and never reference each other.
#[derive(Clone)]
pub struct FinanceService {
    client_repo: ClientFinanceRepository,
    client_pool: SqlitePool,
    ledger_repo: LedgerRepository,
    ledger_pool: SqlitePool,
}

impl FinanceService {
    pub fn new(
        client_repo: ClientFinanceRepository,
        client_pool: SqlitePool,
        ledger_repo: LedgerRepository,
        ledger_pool: SqlitePool,
    ) -> Self {
        Self { client_repo, client_pool, ledger_repo, ledger_pool }
    }

    // =========================================================================
    //  CLIENT SUB-LEDGER
    // =========================================================================

    pub async fn record_client_finance(&self, input: NewClientFinance) -> Result<ClientFinance, AppError> {
        input.validate()?;

        let row = self
            .client_repo
            .insert(
                &self.client_pool,
                input.client.trim(),
                input.total,
                input.advance,
                input.paid,
                input.date.unwrap_or_else(|| Utc::now().date_naive()),
            )
            .await?;

        tracing::info!("Client finance {} recorded for {} (total {})", row.id, row.client, row.total);
        Ok(row)
    }

    /// Replaces the advance and paid amounts of one row.
    pub async fn record_payment(
        &self,
        id: i64,
        payload: RecordPaymentPayload,
    ) -> Result<ClientFinance, AppError> {
        payload.validate()?;

        let row = self
            .client_repo
            .set_payments(&self.client_pool, id, payload.advance, payload.paid)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Client finance {id}")))?;

        tracing::info!("Payment recorded on client finance {}: balance {}", id, row.balance);
        Ok(row)
    }

    pub async fn list_client_finance(&self) -> Result<Vec<ClientFinance>, AppError> {
        self.client_repo.list_all(&self.client_pool).await
    }

    pub async fn list_by_balance_bucket(&self) -> Result<BalanceBuckets, AppError> {
        let rows = self.list_client_finance().await?;
        Ok(BalanceBuckets::partition(rows))
    }

    // =========================================================================
    //  COMPANY LEDGER
    // =========================================================================

    pub async fn add_movement(&self, input: NewMovement) -> Result<Movement, AppError> {
        input.validate()?;

        let movement = self
            .ledger_repo
            .insert(
                &self.ledger_pool,
                input.kind,
                input.description.trim(),
                input.monto,
                input.date.unwrap_or_else(|| Utc::now().date_naive()),
            )
            .await?;

        tracing::info!("Movement {} ({:?}) recorded: {}", movement.id, movement.kind, movement.monto);
        Ok(movement)
    }

    pub async fn list_movements(&self) -> Result<Vec<MovementWithBalance>, AppError> {
        let movements = self.ledger_repo.list_all(&self.ledger_pool).await?;
        MovementWithBalance::running(movements)
    }

    /// Computed fresh on every call.
    pub async fn summary(&self) -> Result<LedgerSummary, AppError> {
        let movements = self.ledger_repo.list_all(&self.ledger_pool).await?;
        LedgerSummary::from_movements(&movements)
    }
}
