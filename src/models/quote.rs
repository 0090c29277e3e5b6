// src/models/quote.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::common::{
    error::AppError,
    money::{amount_overflow, checked_sum, round2},
    validation::{non_negative_amount, not_blank},
};

pub const DEFAULT_HOURS_PER_DAY: i64 = 8;
pub const DEFAULT_SESSIONS: i64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type, ToSchema)]
pub enum QuoteStatus {
    #[default]
    Drafted,
    ToSend,
    Sent,
    Accepted,
    Rejected,
    Converted,
}

impl QuoteStatus {
    pub fn label(self) -> &'static str {
        match self {
            QuoteStatus::Drafted => "Redactado",
            QuoteStatus::ToSend => "Por enviar",
            QuoteStatus::Sent => "Enviado",
            QuoteStatus::Accepted => "Aceptada",
            QuoteStatus::Rejected => "Rechazada",
            QuoteStatus::Converted => "Convertida",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Modality {
    Presencial,
    Virtual,
}

// ==========================================
// Line items (stored as typed JSON)
// ==========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ServiceLine {
    #[schema(example = "Audit")]
    pub name: String,

    #[validate(custom(function = "non_negative_amount"))]
    #[schema(example = "10")]
    pub hours: Decimal,

    #[validate(custom(function = "non_negative_amount"))]
    #[schema(example = "50")]
    pub rate: Decimal,

    /// Always `hours * rate`; whatever the caller sends is overwritten.
    #[serde(default)]
    #[schema(read_only)]
    pub subtotal: Decimal,
}

impl ServiceLine {
    pub fn computed_subtotal(&self) -> Result<Decimal, AppError> {
        self.hours
            .checked_mul(self.rate)
            .ok_or_else(|| amount_overflow("services"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DeliverableLine {
    #[schema(example = "Informe de diagnóstico")]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[validate(custom(function = "non_negative_amount"))]
    #[schema(example = "300")]
    pub subtotal: Decimal,
}

// ==========================================
// Quote
// ==========================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    #[schema(example = "0001")]
    pub number: String,
    #[schema(example = "Acme S.A.C.")]
    pub client: String,
    pub tax_id: String,
    pub address: String,
    pub phone: String,
    pub contact: String,
    pub contact_title: String,
    pub sector: String,
    pub date: NaiveDate,
    pub problem: String,
    pub services: Vec<ServiceLine>,
    pub deliverables: Vec<DeliverableLine>,
    pub value_add: String,
    pub payment_conditions: String,
    #[schema(example = "500.00")]
    pub monto: Decimal,
    pub status: QuoteStatus,
    pub hours_per_day: i64,
    pub sessions: i64,
    pub modality: Vec<Modality>,
    pub requirements: String,
    pub logo: Option<String>,
    pub created_by: String,

    // Derived on read, never stored.
    #[schema(read_only)]
    pub total_hours: Decimal,
    #[schema(read_only)]
    pub estimated_days: Decimal,

    /// Stored collections that failed to decode. Those collections are listed empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub decode_errors: Vec<String>,
}

impl Quote {
    pub fn compute_monto(
        services: &[ServiceLine],
        deliverables: &[DeliverableLine],
    ) -> Result<Decimal, AppError> {
        let subtotals = services
            .iter()
            .map(ServiceLine::computed_subtotal)
            .collect::<Result<Vec<_>, _>>()?;
        let services = checked_sum(subtotals).ok_or_else(|| amount_overflow("services"))?;
        let deliverables = checked_sum(deliverables.iter().map(|d| d.subtotal))
            .ok_or_else(|| amount_overflow("deliverables"))?;

        services
            .checked_add(deliverables)
            .ok_or_else(|| amount_overflow("monto"))
    }

    pub fn compute_total_hours(services: &[ServiceLine]) -> Result<Decimal, AppError> {
        checked_sum(services.iter().map(|s| s.hours)).ok_or_else(|| amount_overflow("services"))
    }

    pub fn compute_estimated_days(total_hours: Decimal, hours_per_day: i64) -> Decimal {
        if hours_per_day <= 0 {
            return Decimal::ZERO;
        }
        round2(total_hours / Decimal::from(hours_per_day))
    }

    /// Refreshes the fields derived from the line items.
    pub fn refresh_derived(&mut self) -> Result<(), AppError> {
        self.total_hours = Self::compute_total_hours(&self.services)?;
        self.estimated_days = Self::compute_estimated_days(self.total_hours, self.hours_per_day);
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuoteInput {
    #[validate(custom(function = "not_blank"))]
    #[schema(example = "0001")]
    pub number: String,

    #[validate(custom(function = "not_blank"))]
    #[schema(example = "Acme S.A.C.")]
    pub client: String,

    // Contact snapshot; replaced by the registry record when the client is known.
    #[serde(default)]
    pub tax_id: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub contact_title: String,
    #[serde(default)]
    pub sector: String,

    pub date: Option<NaiveDate>,

    #[serde(default)]
    pub problem: String,

    #[serde(default)]
    #[validate(nested)]
    pub services: Vec<ServiceLine>,

    #[serde(default)]
    #[validate(nested)]
    pub deliverables: Vec<DeliverableLine>,

    #[serde(default)]
    pub value_add: String,

    /// Left empty, the default 50% advance / IGV text is generated from the amount.
    #[serde(default)]
    pub payment_conditions: String,

    /// Ignored: the amount is always recomputed from the line items.
    pub monto: Option<Decimal>,

    pub status: Option<QuoteStatus>,

    #[validate(range(min = 1, message = "must be at least 1"))]
    pub hours_per_day: Option<i64>,

    #[validate(range(min = 1, message = "must be at least 1"))]
    pub sessions: Option<i64>,

    pub modality: Option<Vec<Modality>>,

    #[serde(default)]
    pub requirements: String,

    pub logo: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TraceEntry {
    pub id: i64,
    pub number: String,
    pub monto: Decimal,
    pub user_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShareQuotePayload {
    #[validate(custom(function = "not_blank"))]
    #[schema(example = "+51 987 654 321")]
    pub phone: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShareLinkResponse {
    pub link: String,
    pub status: QuoteStatus,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetQuoteStatusPayload {
    pub status: QuoteStatus,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NextQuoteNumber {
    #[schema(example = "0004")]
    pub number: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn service(hours: &str, rate: &str) -> ServiceLine {
        ServiceLine { name: "s".into(), hours: dec(hours), rate: dec(rate), subtotal: dec("999") }
    }

    #[test]
    fn monto_ignores_submitted_service_subtotals() {
        let services = vec![service("10", "50"), service("2.5", "40")];
        let deliverables = vec![DeliverableLine {
            name: "d".into(),
            description: String::new(),
            subtotal: dec("120.50"),
        }];
        assert_eq!(Quote::compute_monto(&services, &deliverables).unwrap(), dec("720.50"));
    }

    #[test]
    fn monto_overflow_is_an_error() {
        let huge = dec("50000000000000000000000000000");
        let deliverables = vec![
            DeliverableLine { name: "a".into(), description: String::new(), subtotal: huge },
            DeliverableLine { name: "b".into(), description: String::new(), subtotal: huge },
        ];
        assert!(matches!(
            Quote::compute_monto(&[], &deliverables),
            Err(AppError::ValidationError(_))
        ));

        let line = service("50000000000000000000000000000", "10");
        assert!(matches!(line.computed_subtotal(), Err(AppError::ValidationError(_))));
    }

    #[test]
    fn estimated_days_round_to_two_places() {
        assert_eq!(Quote::compute_estimated_days(dec("10"), 3), dec("3.33"));
        assert_eq!(Quote::compute_estimated_days(dec("16"), 8), dec("2"));
    }

    #[test]
    fn unknown_line_fields_fail_decoding() {
        let raw = r#"[{"name":"x","hours":1,"rate":2,"colour":"red"}]"#;
        assert!(serde_json::from_str::<Vec<ServiceLine>>(raw).is_err());
    }
}
