// src/models/client.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::common::validation::not_blank;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
pub enum Sector {
    Technology,
    Health,
    Education,
    Finance,
    Industrial,
    Other,
}

impl Sector {
    pub fn label(self) -> &'static str {
        match self {
            Sector::Technology => "Tecnología",
            Sector::Health => "Salud",
            Sector::Education => "Educación",
            Sector::Finance => "Finanzas",
            Sector::Industrial => "Industrial",
            Sector::Other => "Otro",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type, ToSchema)]
pub enum ClientStatus {
    #[default]
    Prospect,
    WantsQuote,
    Signed,
    Inactive,
}

impl ClientStatus {
    pub fn label(self) -> &'static str {
        match self {
            ClientStatus::Prospect => "Prospecto",
            ClientStatus::WantsQuote => "Quiere cotización",
            ClientStatus::Signed => "Firmó contrato",
            ClientStatus::Inactive => "Inactivo",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Acme S.A.C.")]
    pub company_name: String,
    #[schema(example = "20123456789")]
    pub tax_id: String,
    pub address: String,
    #[schema(example = "+51 987 654 321")]
    pub phone: String,
    #[schema(example = "Jane Pérez")]
    pub contact_name: String,
    #[schema(example = "Gerente General")]
    pub contact_title: String,
    pub sector: Sector,
    pub status: ClientStatus,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewClient {
    #[validate(custom(function = "not_blank"))]
    #[schema(example = "Acme S.A.C.")]
    pub company_name: String,

    #[serde(default)]
    pub tax_id: String,

    #[serde(default)]
    pub address: String,

    #[serde(default)]
    pub phone: String,

    #[validate(custom(function = "not_blank"))]
    #[schema(example = "Jane Pérez")]
    pub contact_name: String,

    #[serde(default)]
    pub contact_title: String,

    pub sector: Sector,

    #[serde(default)]
    pub status: Option<ClientStatus>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ClientFilter {
    /// Case-insensitive substring over company name, contact and phone.
    pub search: Option<String>,
    pub status: Option<ClientStatus>,
    pub sector: Option<Sector>,
}

impl ClientFilter {
    pub fn matches(&self, client: &Client) -> bool {
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            let hit = [&client.company_name, &client.contact_name, &client.phone]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        if self.status.is_some_and(|status| status != client.status) {
            return false;
        }
        if self.sector.is_some_and(|sector| sector != client.sector) {
            return false;
        }
        true
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientSummary {
    pub total: usize,
    pub signed: usize,
    pub prospects: usize,
    pub wants_quote: usize,
}

impl ClientSummary {
    pub fn from_clients<'a>(clients: impl IntoIterator<Item = &'a Client>) -> Self {
        clients.into_iter().fold(Self::default(), |mut acc, client| {
            acc.total += 1;
            match client.status {
                ClientStatus::Signed => acc.signed += 1,
                ClientStatus::Prospect => acc.prospects += 1,
                ClientStatus::WantsQuote => acc.wants_quote += 1,
                ClientStatus::Inactive => {}
            }
            acc
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: i64,
    pub client_id: i64,
    #[schema(example = "Creation")]
    pub action: String,
    pub user_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClientStatusPayload {
    pub status: ClientStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(name: &str, contact: &str, phone: &str, sector: Sector, status: ClientStatus) -> Client {
        Client {
            id: 1,
            company_name: name.into(),
            tax_id: String::new(),
            address: String::new(),
            phone: phone.into(),
            contact_name: contact.into(),
            contact_title: String::new(),
            sector,
            status,
            created_by: "admin".into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn search_is_case_insensitive_over_three_fields() {
        let acme = client("Acme", "Jane", "555-0101", Sector::Technology, ClientStatus::Prospect);
        let by = |s: &str| ClientFilter { search: Some(s.into()), ..Default::default() };

        assert!(by("acm").matches(&acme));
        assert!(by("JANE").matches(&acme));
        assert!(by("0101").matches(&acme));
        assert!(!by("globex").matches(&acme));
    }

    #[test]
    fn filters_are_anded() {
        let acme = client("Acme", "Jane", "1", Sector::Technology, ClientStatus::Signed);
        let filter = ClientFilter {
            search: Some("acme".into()),
            status: Some(ClientStatus::Signed),
            sector: Some(Sector::Health),
        };
        assert!(!filter.matches(&acme));

        let filter = ClientFilter { sector: Some(Sector::Technology), ..filter };
        assert!(filter.matches(&acme));
    }

    #[test]
    fn summary_counts_by_status() {
        let clients = vec![
            client("A", "a", "", Sector::Other, ClientStatus::Signed),
            client("B", "b", "", Sector::Other, ClientStatus::Prospect),
            client("C", "c", "", Sector::Other, ClientStatus::Prospect),
            client("D", "d", "", Sector::Other, ClientStatus::Inactive),
        ];
        let summary = ClientSummary::from_clients(&clients);
        assert_eq!(
            summary,
            ClientSummary { total: 4, signed: 1, prospects: 2, wants_quote: 0 }
        );
    }
}
