// src/services/quote_service.rs

use chrono::Utc;
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    common::{error::AppError, money::payment_conditions_text},
    db::{ContractRepository, QuoteRepository},
    models::{
        contract::{Contract, ContractStatus, NewContract},
        quote::{
            Modality, Quote, QuoteInput, QuoteStatus, ShareLinkResponse, TraceEntry,
            DEFAULT_HOURS_PER_DAY, DEFAULT_SESSIONS,
        },
    },
    services::{
        client_service::ClientService,
        document_service::DocumentService,
        settings_service::SettingsService,
        share_link::{quote_message, whatsapp_link},
    },
};

/// Precondition on the quote number for a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriteMode {
    Create,
    Update,
    Replace,
}

#[derive(Clone)]
pub struct QuoteService {
    repo: QuoteRepository,
    pool: SqlitePool,
    contract_repo: ContractRepository,
    contracts_pool: SqlitePool,
    clients: ClientService,
    settings: SettingsService,
    documents: DocumentService,
}

impl QuoteService {
    pub fn new(
        repo: QuoteRepository,
        pool: SqlitePool,
        contract_repo: ContractRepository,
        contracts_pool: SqlitePool,
        clients: ClientService,
        settings: SettingsService,
        documents: DocumentService,
    ) -> Self {
        Self { repo, pool, contract_repo, contracts_pool, clients, settings, documents }
    }

    /// Fails with `UniquenessViolation` when the number is taken.
    pub async fn create_quote(&self, input: QuoteInput, user_name: &str) -> Result<Quote, AppError> {
        self.store(input, user_name, WriteMode::Create).await
    }

    /// Fails with `NotFound` when the number is unknown.
    pub async fn update_quote(&self, input: QuoteInput, user_name: &str) -> Result<Quote, AppError> {
        self.store(input, user_name, WriteMode::Update).await
    }

    /// Last write wins: an existing row with the same number is replaced entirely.
    pub async fn save_quote(&self, input: QuoteInput, user_name: &str) -> Result<Quote, AppError> {
        self.store(input, user_name, WriteMode::Replace).await
    }

    async fn store(&self, input: QuoteInput, user_name: &str, mode: WriteMode) -> Result<Quote, AppError> {
        input.validate()?;

        let quote = self.build_quote(input, user_name).await?;
        let mut tx = self.pool.begin().await?;

        let exists = self.repo.exists(&mut *tx, &quote.number).await?;
        match mode {
            WriteMode::Create if exists => {
                return Err(AppError::UniquenessViolation(format!("Quote number '{}'", quote.number)));
            }
            WriteMode::Update if !exists => {
                return Err(AppError::NotFound(format!("Quote {}", quote.number)));
            }
            _ => {}
        }

        self.repo.upsert(&mut *tx, &quote).await?;
        self.repo
            .append_trace(&mut *tx, &quote.number, quote.monto, user_name, Utc::now())
            .await?;

        tx.commit().await?;

        tracing::info!(
            "Quote {} saved by {} (monto {}, replaced: {})",
            quote.number,
            user_name,
            quote.monto,
            exists
        );

        // The row is already committed; a failed document only gets logged.
        if let Err(e) = self.write_document(&quote).await {
            tracing::warn!("Document for quote {} not generated: {}", quote.number, e);
        }

        Ok(quote)
    }

    /// Normalizes the input into the row that gets stored.
    async fn build_quote(&self, input: QuoteInput, user_name: &str) -> Result<Quote, AppError> {
        let client_name = input.client.trim().to_string();

        let mut services = input.services;
        for line in &mut services {
            line.subtotal = line.computed_subtotal()?;
        }
        let deliverables = input.deliverables;
        let monto = Quote::compute_monto(&services, &deliverables)?;

        let payment_conditions = if input.payment_conditions.trim().is_empty() {
            payment_conditions_text(monto)?
        } else {
            input.payment_conditions
        };

        let modality = match input.modality {
            Some(modality) if !modality.is_empty() => modality,
            _ => vec![Modality::Presencial],
        };

        let mut quote = Quote {
            number: input.number.trim().to_string(),
            client: client_name.clone(),
            tax_id: input.tax_id,
            address: input.address,
            phone: input.phone,
            contact: input.contact,
            contact_title: input.contact_title,
            sector: input.sector,
            date: input.date.unwrap_or_else(|| Utc::now().date_naive()),
            problem: input.problem,
            services,
            deliverables,
            value_add: input.value_add,
            payment_conditions,
            monto,
            status: input.status.unwrap_or_default(),
            hours_per_day: input.hours_per_day.unwrap_or(DEFAULT_HOURS_PER_DAY),
            sessions: input.sessions.unwrap_or(DEFAULT_SESSIONS),
            modality,
            requirements: input.requirements,
            logo: input.logo.filter(|l| !l.trim().is_empty()),
            created_by: user_name.to_string(),
            total_hours: Default::default(),
            estimated_days: Default::default(),
            decode_errors: Vec::new(),
        };

        // Snapshot of the registry record at save time; later client edits do not propagate.
        if let Some(client) = self.clients.find_by_company_name(&client_name).await? {
            quote.tax_id = client.tax_id;
            quote.address = client.address;
            quote.phone = client.phone;
            quote.contact = client.contact_name;
            quote.contact_title = client.contact_title;
            quote.sector = client.sector.label().to_string();
        }

        quote.refresh_derived()?;
        Ok(quote)
    }

    pub async fn list_quotes(&self) -> Result<Vec<Quote>, AppError> {
        self.repo.list_all(&self.pool).await
    }

    pub async fn get_quote(&self, number: &str) -> Result<Quote, AppError> {
        self.repo
            .find(&self.pool, number)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quote {number}")))
    }

    /// Idempotent.
    pub async fn delete_quote(&self, number: &str) -> Result<(), AppError> {
        if self.repo.delete(&self.pool, number).await? > 0 {
            tracing::info!("Quote {} deleted", number);
        }
        Ok(())
    }

    pub async fn next_quote_number(&self) -> Result<String, AppError> {
        let count = self.repo.count(&self.pool).await?;
        Ok(format!("{:04}", count + 1))
    }

    pub async fn list_trace(&self) -> Result<Vec<TraceEntry>, AppError> {
        self.repo.list_trace(&self.pool).await
    }

    pub async fn count(&self) -> Result<i64, AppError> {
        self.repo.count(&self.pool).await
    }

    pub async fn set_status(&self, number: &str, status: QuoteStatus) -> Result<Quote, AppError> {
        if self.repo.set_status(&self.pool, number, status).await? == 0 {
            return Err(AppError::NotFound(format!("Quote {number}")));
        }
        tracing::info!("Quote {} status: {:?}", number, status);
        self.get_quote(number).await
    }

    /// Regenerates the default payment conditions from the stored amount.
    pub async fn recalculate_conditions(&self, number: &str) -> Result<Quote, AppError> {
        let quote = self.get_quote(number).await?;
        let text = payment_conditions_text(quote.monto)?;
        self.repo.set_payment_conditions(&self.pool, number, &text).await?;
        Ok(Quote { payment_conditions: text, ..quote })
    }

    /// Builds the messaging link for the quote and marks it as sent.
    pub async fn share_quote(&self, number: &str, phone: &str) -> Result<ShareLinkResponse, AppError> {
        let quote = self.get_quote(number).await?;
        let link = whatsapp_link(phone, &quote_message(&quote.client, &quote.number))?;

        self.repo.set_status(&self.pool, number, QuoteStatus::Sent).await?;
        tracing::info!("Quote {} shared", number);

        Ok(ShareLinkResponse { link, status: QuoteStatus::Sent })
    }

    /// Converts the quote into a contract awaiting signature.
    ///
    /// The quote status change stays in an open transaction while the contract row is written to
    /// the contract store. If that transaction then fails to commit, the contract is removed again.
    /// There is no guard against converting the same quote twice.
    pub async fn convert_to_contract(&self, number: &str) -> Result<Contract, AppError> {
        let mut tx = self.pool.begin().await?;

        let quote = self
            .repo
            .find(&mut *tx, number)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quote {number}")))?;

        self.repo.set_status(&mut *tx, number, QuoteStatus::Converted).await?;

        let input = NewContract {
            title: format!("Contrato derivado de {}", quote.number),
            client: quote.client.clone(),
            services: encode_lines(&quote.services)?,
            deliverables: encode_lines(&quote.deliverables)?,
            monto: quote.monto,
            status: Some(ContractStatus::ToSign),
            start_date: Some(quote.date),
            end_date: None,
            payment_method: None,
            observations: format!("Generado desde cotización {}", quote.number),
        };

        let now = Utc::now();
        let contract = self
            .contract_repo
            .insert(&self.contracts_pool, &input, None, now.date_naive(), now)
            .await?;

        if let Err(e) = tx.commit().await {
            tracing::warn!(
                "Quote {} not marked as converted, removing contract {}: {}",
                number,
                contract.id,
                e
            );
            self.contract_repo.delete(&self.contracts_pool, contract.id).await?;
            return Err(e.into());
        }

        tracing::info!("Quote {} converted into contract {}", number, contract.id);
        Ok(contract)
    }

    pub async fn render_document(&self, number: &str) -> Result<Vec<u8>, AppError> {
        let quote = self.get_quote(number).await?;
        let profile = self.settings.get_profile().await?;
        self.documents.render(self.documents.quote_layout(&quote, &profile)).await
    }

    async fn write_document(&self, quote: &Quote) -> Result<(), AppError> {
        let profile = self.settings.get_profile().await?;
        let layout = self.documents.quote_layout(quote, &profile);
        self.documents
            .write(layout, &DocumentService::quote_file_name(&quote.number))
            .await?;
        Ok(())
    }
}

fn encode_lines<T: serde::Serialize>(lines: &[T]) -> Result<String, AppError> {
    serde_json::to_string(lines).map_err(|e| AppError::InternalServerError(e.into()))
}
