// src/services/contract_service.rs

use std::path::PathBuf;

use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::ContractRepository,
    models::contract::{Contract, ContractFilter, EvidenceUpload, NewContract, SignaturesPayload},
    services::{
        document_service::{sanitize_file_part, DocumentService},
        settings_service::SettingsService,
    },
};

#[derive(Clone)]
pub struct ContractService {
    repo: ContractRepository,
    pool: SqlitePool,
    evidence_dir: PathBuf,
    settings: SettingsService,
    documents: DocumentService,
}

impl ContractService {
    pub fn new(
        repo: ContractRepository,
        pool: SqlitePool,
        evidence_dir: PathBuf,
        settings: SettingsService,
        documents: DocumentService,
    ) -> Self {
        Self { repo, pool, evidence_dir, settings, documents }
    }

    pub async fn create_contract(
        &self,
        input: NewContract,
        evidence: Option<EvidenceUpload>,
    ) -> Result<Contract, AppError> {
        input.validate()?;

        let now = Utc::now();
        let today = now.date_naive();

        let evidence_path = match evidence {
            Some(upload) => Some(self.save_evidence(&input.client, today, upload).await?),
            None => None,
        };

        let inserted = self
            .repo
            .insert(&self.pool, &input, evidence_path.as_deref(), today, now)
            .await;
        let contract = match inserted {
            Ok(contract) => contract,
            Err(e) => {
                if let Some(path) = &evidence_path {
                    if let Err(remove_err) = tokio::fs::remove_file(path).await {
                        tracing::warn!("Evidence {} left behind: {}", path, remove_err);
                    }
                }
                return Err(e);
            }
        };

        tracing::info!("Contract {} created for {}", contract.id, contract.client);
        self.write_document_logged(&contract).await;

        Ok(contract)
    }

    /// `<client>_<YYYYMMDD>_<short id>_<file name>` under the evidence directory.
    async fn save_evidence(
        &self,
        client: &str,
        date: NaiveDate,
        upload: EvidenceUpload,
    ) -> Result<String, AppError> {
        let short_id: String = Uuid::new_v4().simple().to_string().chars().take(8).collect();
        let file_name = format!(
            "{}_{}_{}_{}",
            sanitize_file_part(client),
            date.format("%Y%m%d"),
            short_id,
            sanitize_file_part(&upload.file_name)
        );

        tokio::fs::create_dir_all(&self.evidence_dir).await?;
        let path = self.evidence_dir.join(file_name);
        tokio::fs::write(&path, &upload.bytes).await?;

        tracing::info!("Evidence stored at {}", path.display());
        Ok(path.to_string_lossy().into_owned())
    }

    pub async fn list_contracts(&self, filter: &ContractFilter) -> Result<Vec<Contract>, AppError> {
        let contracts = self.repo.list_all(&self.pool).await?;
        Ok(contracts.into_iter().filter(|c| filter.matches(c)).collect())
    }

    pub async fn get_contract(&self, id: i64) -> Result<Contract, AppError> {
        self.repo
            .find(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Contract {id}")))
    }

    pub async fn update_signatures(
        &self,
        id: i64,
        payload: SignaturesPayload,
    ) -> Result<Contract, AppError> {
        let clean = |s: Option<String>| s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let client_signature = clean(payload.client_signature);
        let company_signature = clean(payload.company_signature);

        let contract = self
            .repo
            .update_signatures(&self.pool, id, client_signature.as_deref(), company_signature.as_deref())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Contract {id}")))?;

        tracing::info!("Contract {} signatures updated", id);
        self.write_document_logged(&contract).await;

        Ok(contract)
    }

    /// Idempotent.
    pub async fn delete_contract(&self, id: i64) -> Result<(), AppError> {
        if self.repo.delete(&self.pool, id).await? > 0 {
            tracing::info!("Contract {} deleted", id);
        }
        Ok(())
    }

    pub async fn render_document(&self, id: i64) -> Result<Vec<u8>, AppError> {
        let contract = self.get_contract(id).await?;
        let profile = self.settings.get_profile().await?;
        self.documents
            .render(self.documents.contract_layout(&contract, &profile))
            .await
    }

    async fn write_document_logged(&self, contract: &Contract) {
        let result = async {
            let profile = self.settings.get_profile().await?;
            let layout = self.documents.contract_layout(contract, &profile);
            self.documents
                .write(layout, &DocumentService::contract_file_name(contract.id))
                .await
        }
        .await;

        if let Err(e) = result {
            tracing::warn!("Document for contract {} not generated: {}", contract.id, e);
        }
    }
}
