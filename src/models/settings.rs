// src/models/settings.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::common::validation::not_blank;

pub const UNCONFIGURED_COMPANY: &str = "Empresa no configurada";

/// Letterhead data shared by every document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    #[schema(example = "AX.IIA Consultores S.A.C.")]
    pub name: String,

    #[schema(example = "imagen/logo.png")]
    pub logo: Option<String>,

    #[schema(example = "Av. Arequipa 1234, Lima")]
    pub address: String,

    #[schema(example = "+51 1 234 5678")]
    pub phone: String,

    #[schema(example = "contacto@axiia.pe")]
    pub email: String,

    pub about_us: String,

    pub sales_text: String,
}

impl Default for CompanyProfile {
    fn default() -> Self {
        Self {
            name: UNCONFIGURED_COMPANY.to_string(),
            logo: None,
            address: String::new(),
            phone: String::new(),
            email: String::new(),
            about_us: String::new(),
            sales_text: String::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveProfilePayload {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    pub logo: Option<String>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub about_us: String,
    #[serde(default)]
    pub sales_text: String,
}
