// src/db.rs

pub mod store;
pub use store::Stores;
pub mod user_repo;
pub use user_repo::UserRepository;
pub mod client_repo;
pub use client_repo::ClientRepository;
pub mod quote_repo;
pub use quote_repo::QuoteRepository;
pub mod contract_repo;
pub use contract_repo::ContractRepository;
pub mod finance_repo;
pub use finance_repo::{ClientFinanceRepository, LedgerRepository};
pub mod settings_repo;
pub use settings_repo::SettingsRepository;
