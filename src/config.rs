// src/config.rs

use std::{env, path::PathBuf, sync::Arc};

use anyhow::Context;

use crate::{
    common::error::AppError,
    db::{
        ClientFinanceRepository, ClientRepository, ContractRepository, LedgerRepository,
        QuoteRepository, SettingsRepository, Stores, UserRepository,
    },
    services::{
        auth::AuthService, client_service::ClientService, contract_service::ContractService,
        dashboard_service::DashboardService, document_service::DocumentService,
        finance_service::FinanceService, pipeline_service::PipelineService,
        quote_service::QuoteService, settings_service::SettingsService,
    },
};

/// Credentials of the admin created when the user store is empty.
#[derive(Debug, Clone)]
pub struct AdminBootstrap {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub data_dir: PathBuf,
    pub documents_dir: PathBuf,
    pub evidence_dir: PathBuf,
    pub fonts_dir: PathBuf,
    pub font_family: String,
    pub signature_image: Option<PathBuf>,
    pub jwt_secret: String,
    pub session_ttl_hours: i64,
    pub bcrypt_cost: u32,
    pub admin: Option<AdminBootstrap>,
}

impl Config {
    /// Defaults for everything except the secret.
    pub fn with_defaults(data_dir: impl Into<PathBuf>, jwt_secret: impl Into<String>) -> Self {
        let data_dir = data_dir.into();
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            documents_dir: data_dir.join("documentos"),
            evidence_dir: data_dir.join("evidencias"),
            data_dir,
            fonts_dir: PathBuf::from("fonts"),
            font_family: "Roboto".to_string(),
            signature_image: None,
            jwt_secret: jwt_secret.into(),
            session_ttl_hours: 12,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            admin: None,
        }
    }

    /// Reads `.env` and the process environment. Only `JWT_SECRET` is required.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
        let data_dir = optional("CRM_DATA_DIR").unwrap_or_else(|| "data".to_string());
        let mut config = Self::with_defaults(data_dir, jwt_secret);

        if let Some(addr) = optional("CRM_BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Some(dir) = optional("CRM_DOCUMENTS_DIR") {
            config.documents_dir = dir.into();
        }
        if let Some(dir) = optional("CRM_EVIDENCE_DIR") {
            config.evidence_dir = dir.into();
        }
        if let Some(dir) = optional("CRM_FONTS_DIR") {
            config.fonts_dir = dir.into();
        }
        if let Some(family) = optional("CRM_FONT_FAMILY") {
            config.font_family = family;
        }
        config.signature_image = optional("CRM_SIGNATURE_IMAGE").map(PathBuf::from);

        if let Some(ttl) = optional("CRM_SESSION_TTL_HOURS") {
            config.session_ttl_hours = ttl.parse().context("CRM_SESSION_TTL_HOURS must be an integer")?;
        }
        if let Some(cost) = optional("CRM_BCRYPT_COST") {
            config.bcrypt_cost = cost.parse().context("CRM_BCRYPT_COST must be an integer")?;
        }

        config.admin = match (
            optional("CRM_ADMIN_NAME"),
            optional("CRM_ADMIN_EMAIL"),
            optional("CRM_ADMIN_PASSWORD"),
        ) {
            (Some(name), Some(email), Some(password)) => Some(AdminBootstrap { name, email, password }),
            _ => None,
        };

        Ok(config)
    }
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Everything a handler needs; cloned into each request by axum.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub stores: Stores,
    pub auth_service: AuthService,
    pub settings_service: SettingsService,
    pub client_service: ClientService,
    pub quote_service: QuoteService,
    pub contract_service: ContractService,
    pub finance_service: FinanceService,
    pub pipeline_service: PipelineService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        let config = Config::from_env()?;
        let stores = Stores::open(&config.data_dir).await?;
        let state = Self::build(config, stores).await?;

        tracing::info!("✅ Application state ready");
        Ok(state)
    }

    /// Wires the dependency graph over already opened stores and prepares their schemas.
    pub async fn build(config: Config, stores: Stores) -> Result<Self, AppError> {
        let user_repo = UserRepository::new(stores.users.clone());
        let client_repo = ClientRepository::new(stores.clients.clone());
        let quote_repo = QuoteRepository::new(stores.quotes.clone());
        let contract_repo = ContractRepository::new(stores.contracts.clone());
        let client_finance_repo = ClientFinanceRepository::new(stores.client_finance.clone());
        let ledger_repo = LedgerRepository::new(stores.ledger.clone());
        let settings_repo = SettingsRepository::new(stores.settings.clone());

        user_repo.ensure_schema().await?;
        client_repo.ensure_schema().await?;
        quote_repo.ensure_schema().await?;
        contract_repo.ensure_schema().await?;
        client_finance_repo.ensure_schema().await?;
        ledger_repo.ensure_schema().await?;
        settings_repo.ensure_schema().await?;

        let documents = DocumentService::new(&config);

        let auth_service = AuthService::new(
            user_repo,
            stores.users.clone(),
            config.jwt_secret.clone(),
            config.session_ttl_hours,
            config.bcrypt_cost,
        );
        let settings_service = SettingsService::new(settings_repo, stores.settings.clone());
        let client_service = ClientService::new(client_repo, stores.clients.clone());
        let quote_service = QuoteService::new(
            quote_repo,
            stores.quotes.clone(),
            contract_repo.clone(),
            stores.contracts.clone(),
            client_service.clone(),
            settings_service.clone(),
            documents.clone(),
        );
        let contract_service = ContractService::new(
            contract_repo,
            stores.contracts.clone(),
            config.evidence_dir.clone(),
            settings_service.clone(),
            documents,
        );
        let finance_service = FinanceService::new(
            client_finance_repo,
            stores.client_finance.clone(),
            ledger_repo,
            stores.ledger.clone(),
        );
        let pipeline_service = PipelineService::new();
        let dashboard_service = DashboardService::new(
            client_service.clone(),
            quote_service.clone(),
            contract_service.clone(),
            finance_service.clone(),
            pipeline_service.clone(),
        );

        if let Some(admin) = &config.admin {
            auth_service.bootstrap_admin(admin).await?;
        }

        Ok(Self {
            config: Arc::new(config),
            stores,
            auth_service,
            settings_service,
            client_service,
            quote_service,
            contract_service,
            finance_service,
            pipeline_service,
            dashboard_service,
        })
    }
}
