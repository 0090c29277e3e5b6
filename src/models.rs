// src/models.rs

pub mod auth;
pub mod client;
pub mod contract;
pub mod dashboard;
pub mod finance;
pub mod pipeline;
pub mod quote;
pub mod session;
pub mod settings;
