// src/handlers.rs

pub mod auth;
pub mod clients;
pub mod contracts;
pub mod dashboard;
pub mod documents;
pub mod finance;
pub mod pipeline;
pub mod quotes;
pub mod settings;
