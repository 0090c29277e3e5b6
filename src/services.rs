// src/services.rs

pub mod auth;
pub mod client_service;
pub mod contract_service;
pub mod dashboard_service;
pub mod document_service;
pub mod finance_service;
pub mod pipeline_service;
pub mod quote_service;
pub mod settings_service;
pub mod share_link;
