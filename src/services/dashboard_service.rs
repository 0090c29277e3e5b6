// src/services/dashboard_service.rs

use crate::{
    common::error::AppError,
    models::{
        client::ClientFilter,
        contract::{ContractFilter, ContractStatus},
        dashboard::{ContractStatusCount, DashboardSummary},
    },
    services::{
        client_service::ClientService, contract_service::ContractService,
        finance_service::FinanceService, pipeline_service::PipelineService,
        quote_service::QuoteService,
    },
};

const CONTRACT_STATUSES: [ContractStatus; 3] =
    [ContractStatus::Active, ContractStatus::Completed, ContractStatus::ToSign];

/// Read-only aggregates over the other components.
#[derive(Clone)]
pub struct DashboardService {
    clients: ClientService,
    quotes: QuoteService,
    contracts: ContractService,
    finance: FinanceService,
    pipeline: PipelineService,
}

impl DashboardService {
    pub fn new(
        clients: ClientService,
        quotes: QuoteService,
        contracts: ContractService,
        finance: FinanceService,
        pipeline: PipelineService,
    ) -> Self {
        Self { clients, quotes, contracts, finance, pipeline }
    }

    pub async fn get_summary(&self) -> Result<DashboardSummary, AppError> {
        let clients = self.clients.summary(&ClientFilter::default()).await?;
        let quote_count = self.quotes.count().await?;
        let contracts = self.contracts.list_contracts(&ContractFilter::default()).await?;
        let ledger = self.finance.summary().await?;
        let pipeline = self.pipeline.stage_counts().await;

        let contracts = CONTRACT_STATUSES
            .iter()
            .map(|&status| ContractStatusCount {
                status,
                count: contracts.iter().filter(|c| c.status == status).count(),
            })
            .collect();

        Ok(DashboardSummary {
            clients,
            quote_count: usize::try_from(quote_count).unwrap_or_default(),
            contracts,
            ledger,
            pipeline,
        })
    }
}
