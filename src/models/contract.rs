// src/models/contract.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::common::validation::{not_blank, positive_amount};

pub const DEFAULT_PAYMENT_METHOD: &str = "Depósito bancario";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type, ToSchema)]
pub enum ContractStatus {
    #[default]
    Active,
    Completed,
    ToSign,
}

impl ContractStatus {
    pub fn label(self) -> &'static str {
        match self {
            ContractStatus::Active => "Activo",
            ContractStatus::Completed => "Finalizado",
            ContractStatus::ToSign => "Por firmar",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Consultoría en procesos comerciales")]
    pub title: String,
    #[schema(example = "Acme S.A.C.")]
    pub client: String,
    pub services: String,
    pub deliverables: String,
    #[schema(example = "5000.00")]
    pub monto: Decimal,
    pub status: ContractStatus,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub payment_method: String,
    pub evidence_path: Option<String>,
    pub client_signature: Option<String>,
    pub company_signature: Option<String>,
    pub observations: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewContract {
    #[validate(custom(function = "not_blank"))]
    pub title: String,

    #[validate(custom(function = "not_blank"))]
    pub client: String,

    #[serde(default)]
    pub services: String,

    #[serde(default)]
    pub deliverables: String,

    #[validate(custom(function = "positive_amount"))]
    pub monto: Decimal,

    pub status: Option<ContractStatus>,

    pub start_date: Option<NaiveDate>,

    pub end_date: Option<NaiveDate>,

    pub payment_method: Option<String>,

    #[serde(default)]
    pub observations: String,
}

/// Multipart body of the contract form. Only used to describe the endpoint.
#[allow(dead_code)]
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct ContractForm {
    pub title: String,
    pub client: String,
    pub services: Option<String>,
    pub deliverables: Option<String>,
    #[schema(example = "5000.00")]
    pub monto: String,
    pub status: Option<ContractStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub payment_method: Option<String>,
    pub observations: Option<String>,
    #[schema(value_type = Option<String>, format = Binary)]
    pub evidence: Option<Vec<u8>>,
}

/// An uploaded payment-evidence file.
#[derive(Debug, Clone)]
pub struct EvidenceUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ContractFilter {
    /// Substring over client and title.
    pub search: Option<String>,
    pub status: Option<ContractStatus>,
}

impl ContractFilter {
    pub fn matches(&self, contract: &Contract) -> bool {
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            if !contract.client.to_lowercase().contains(&needle)
                && !contract.title.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        !self.status.is_some_and(|status| status != contract.status)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignaturesPayload {
    pub client_signature: Option<String>,
    pub company_signature: Option<String>,
}
