// src/models/pipeline.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::common::validation::not_blank;

/// Fixed, totally ordered pipeline stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
pub enum Stage {
    InitialContact,
    ExploratoryMeeting,
    QuotePending,
    QuoteSent,
    ContractDone,
    InExecution,
    Completed,
}

impl Stage {
    pub const ALL: [Stage; 7] = [
        Stage::InitialContact,
        Stage::ExploratoryMeeting,
        Stage::QuotePending,
        Stage::QuoteSent,
        Stage::ContractDone,
        Stage::InExecution,
        Stage::Completed,
    ];

    pub fn first() -> Stage {
        Stage::InitialContact
    }

    /// `None` at the terminal stage.
    pub fn next(self) -> Option<Stage> {
        let index = Self::ALL.iter().position(|s| *s == self)?;
        Self::ALL.get(index + 1).copied()
    }

    pub fn is_terminal(self) -> bool {
        self.next().is_none()
    }

    pub fn label(self) -> &'static str {
        match self {
            Stage::InitialContact => "Contacto Inicial",
            Stage::ExploratoryMeeting => "Reunión Exploratoria",
            Stage::QuotePending => "Pendiente Cotización",
            Stage::QuoteSent => "Cotización Enviada",
            Stage::ContractDone => "Contrato Realizado",
            Stage::InExecution => "Proyecto En Ejecución",
            Stage::Completed => "Proyecto Completado",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    pub stage: Stage,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PipelineClient {
    pub id: u64,
    #[schema(example = "Jane Pérez")]
    pub name: String,
    #[schema(example = "Acme S.A.C.")]
    pub company: String,
    #[schema(example = "Referido")]
    pub source: String,
    pub observations: Vec<Observation>,
    pub stage: Stage,
    pub meeting_date: Option<NaiveDate>,
    pub quote_date: Option<NaiveDate>,
    pub contract_date: Option<NaiveDate>,
    /// Declared only; never computed.
    pub progress: u8,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewPipelineClient {
    #[validate(custom(function = "not_blank"))]
    pub name: String,

    #[serde(default)]
    pub company: String,

    #[serde(default)]
    pub source: String,

    #[serde(default)]
    pub initial_note: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddObservationPayload {
    pub stage: Stage,

    #[validate(custom(function = "not_blank"))]
    pub note: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StageColumn {
    pub stage: Stage,
    pub label: String,
    pub clients: Vec<PipelineClient>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StageCount {
    pub stage: Stage,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StageCounts {
    pub stages: Vec<StageCount>,
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_advance_in_order_and_stop_at_the_end() {
        let mut stage = Stage::first();
        let mut visited = vec![stage];
        while let Some(next) = stage.next() {
            assert!(next > stage);
            stage = next;
            visited.push(stage);
        }
        assert_eq!(visited, Stage::ALL.to_vec());
        assert!(Stage::Completed.is_terminal());
        assert!(!Stage::InExecution.is_terminal());
    }

    #[test]
    fn delivery_stages_carry_project_labels() {
        assert_eq!(Stage::InExecution.label(), "Proyecto En Ejecución");
        assert_eq!(Stage::Completed.label(), "Proyecto Completado");
    }
}
