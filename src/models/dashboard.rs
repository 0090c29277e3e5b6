// src/models/dashboard.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{
    client::ClientSummary,
    contract::ContractStatus,
    finance::LedgerSummary,
    pipeline::StageCounts,
};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContractStatusCount {
    pub status: ContractStatus,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub clients: ClientSummary,
    pub quote_count: usize,
    pub contracts: Vec<ContractStatusCount>,
    pub ledger: LedgerSummary,
    pub pipeline: StageCounts,
}
