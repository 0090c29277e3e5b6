// src/services/pipeline_service.rs

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;
use validator::Validate;

use crate::{
    common::error::AppError,
    models::pipeline::{
        AddObservationPayload, NewPipelineClient, Observation, PipelineClient, Stage, StageColumn,
        StageCount, StageCounts,
    },
};

const DEFAULT_FIRST_NOTE: &str = "Cliente registrado";

/// In-memory board. Lives as long as the process; nothing is persisted.
#[derive(Debug, Default)]
pub struct PipelineBoard {
    next_id: u64,
    clients: Vec<PipelineClient>,
}

impl PipelineBoard {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn find_mut(&mut self, id: u64) -> Result<&mut PipelineClient, AppError> {
        self.clients
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Pipeline client {id}")))
    }

    /// New clients start at the first stage with one observation.
    pub fn create(&mut self, input: &NewPipelineClient) -> PipelineClient {
        let note = match input.initial_note.trim() {
            "" => DEFAULT_FIRST_NOTE.to_string(),
            note => note.to_string(),
        };

        let client = PipelineClient {
            id: self.next_id(),
            name: input.name.trim().to_string(),
            company: input.company.trim().to_string(),
            source: input.source.trim().to_string(),
            observations: vec![Observation { stage: Stage::first(), note }],
            stage: Stage::first(),
            meeting_date: None,
            quote_date: None,
            contract_date: None,
            progress: 0,
        };
        self.clients.push(client.clone());
        client
    }

    pub fn get(&self, id: u64) -> Option<&PipelineClient> {
        self.clients.iter().find(|c| c.id == id)
    }

    /// Moves to the next stage and stamps its entry date. At the last stage nothing changes.
    pub fn advance(&mut self, id: u64, today: NaiveDate) -> Result<PipelineClient, AppError> {
        let client = self.find_mut(id)?;

        if let Some(next) = client.stage.next() {
            client.stage = next;
            match next {
                Stage::ExploratoryMeeting => client.meeting_date = Some(today),
                Stage::QuotePending => client.quote_date = Some(today),
                Stage::ContractDone => client.contract_date = Some(today),
                _ => {}
            }
        }

        Ok(client.clone())
    }

    /// Appends regardless of the current stage.
    pub fn add_observation(&mut self, id: u64, stage: Stage, note: &str) -> Result<PipelineClient, AppError> {
        let client = self.find_mut(id)?;
        client.observations.push(Observation { stage, note: note.trim().to_string() });
        Ok(client.clone())
    }

    pub fn board(&self) -> Vec<StageColumn> {
        Stage::ALL
            .iter()
            .map(|&stage| StageColumn {
                stage,
                label: stage.label().to_string(),
                clients: self.clients.iter().filter(|c| c.stage == stage).cloned().collect(),
            })
            .collect()
    }

    pub fn stage_counts(&self) -> StageCounts {
        let stages = Stage::ALL
            .iter()
            .map(|&stage| StageCount {
                stage,
                count: self.clients.iter().filter(|c| c.stage == stage).count(),
            })
            .collect();
        StageCounts { stages, total: self.clients.len() }
    }
}

#[derive(Clone, Default)]
pub struct PipelineService {
    board: Arc<RwLock<PipelineBoard>>,
}

impl PipelineService {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create_client(&self, input: NewPipelineClient) -> Result<PipelineClient, AppError> {
        input.validate()?;
        let client = self.board.write().await.create(&input);
        tracing::info!("Pipeline client {} '{}' added", client.id, client.name);
        Ok(client)
    }

    pub async fn get_client(&self, id: u64) -> Result<PipelineClient, AppError> {
        self.board
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Pipeline client {id}")))
    }

    pub async fn advance(&self, id: u64) -> Result<PipelineClient, AppError> {
        let client = self.board.write().await.advance(id, Utc::now().date_naive())?;
        tracing::info!("Pipeline client {} at stage {:?}", id, client.stage);
        Ok(client)
    }

    pub async fn add_observation(
        &self,
        id: u64,
        payload: AddObservationPayload,
    ) -> Result<PipelineClient, AppError> {
        payload.validate()?;
        self.board
            .write()
            .await
            .add_observation(id, payload.stage, &payload.note)
    }

    pub async fn board(&self) -> Vec<StageColumn> {
        self.board.read().await.board()
    }

    pub async fn stage_counts(&self) -> StageCounts {
        self.board.read().await.stage_counts()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_client(name: &str, note: &str) -> NewPipelineClient {
        NewPipelineClient {
            name: name.into(),
            company: "Acme".into(),
            source: "Referido".into(),
            initial_note: note.into(),
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    #[test]
    fn new_client_starts_at_first_stage_with_one_observation() {
        let mut board = PipelineBoard::default();
        let first = board.create(&new_client("Jane", ""));
        let second = board.create(&new_client("John", "Llamada inicial"));

        assert_eq!((first.id, second.id), (1, 2));
        assert_eq!(first.stage, Stage::InitialContact);
        assert_eq!(first.observations, vec![Observation {
            stage: Stage::InitialContact,
            note: DEFAULT_FIRST_NOTE.into()
        }]);
        assert_eq!(second.observations[0].note, "Llamada inicial");
    }

    #[test]
    fn advance_stamps_stage_dates() {
        let mut board = PipelineBoard::default();
        let id = board.create(&new_client("Jane", "")).id;

        let c = board.advance(id, day(1)).unwrap();
        assert_eq!(c.stage, Stage::ExploratoryMeeting);
        assert_eq!(c.meeting_date, Some(day(1)));

        let c = board.advance(id, day(2)).unwrap();
        assert_eq!(c.stage, Stage::QuotePending);
        assert_eq!(c.quote_date, Some(day(2)));

        let c = board.advance(id, day(3)).unwrap();
        assert_eq!(c.stage, Stage::QuoteSent);
        assert_eq!(c.quote_date, Some(day(2)));

        let c = board.advance(id, day(4)).unwrap();
        assert_eq!(c.stage, Stage::ContractDone);
        assert_eq!(c.contract_date, Some(day(4)));
        assert_eq!(c.progress, 0);
    }

    #[test]
    fn advance_at_terminal_stage_changes_nothing() {
        let mut board = PipelineBoard::default();
        let id = board.create(&new_client("Jane", "")).id;
        for d in 1..=6 {
            board.advance(id, day(d)).unwrap();
        }
        let before = board.get(id).cloned().unwrap();
        assert_eq!(before.stage, Stage::Completed);

        let after = board.advance(id, day(20)).unwrap();
        assert_eq!(after, before);
    }

    #[test]
    fn observations_can_target_past_stages() {
        let mut board = PipelineBoard::default();
        let id = board.create(&new_client("Jane", "")).id;
        board.advance(id, day(1)).unwrap();

        let c = board.add_observation(id, Stage::InitialContact, " Nota tardía ").unwrap();
        assert_eq!(c.observations.len(), 2);
        assert_eq!(c.observations[1], Observation {
            stage: Stage::InitialContact,
            note: "Nota tardía".into()
        });
    }

    #[test]
    fn unknown_id_is_not_found() {
        let mut board = PipelineBoard::default();
        assert!(matches!(board.advance(9, day(1)), Err(AppError::NotFound(_))));
        assert!(matches!(
            board.add_observation(9, Stage::QuoteSent, "x"),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn board_groups_clients_per_stage_in_order() {
        let mut board = PipelineBoard::default();
        let a = board.create(&new_client("A", "")).id;
        board.create(&new_client("B", ""));
        board.advance(a, day(1)).unwrap();

        let columns = board.board();
        assert_eq!(columns.len(), Stage::ALL.len());
        assert_eq!(columns[0].clients.len(), 1);
        assert_eq!(columns[1].clients[0].name, "A");

        let counts = board.stage_counts();
        assert_eq!(counts.total, 2);
        assert_eq!(counts.stages[0].count, 1);
        assert_eq!(counts.stages[1].count, 1);
        assert_eq!(counts.stages.iter().map(|s| s.count).sum::<usize>(), 2);
    }

    #[tokio::test]
    async fn blank_observation_is_rejected() {
        let service = PipelineService::new();
        let id = service.create_client(new_client("Jane", "")).await.unwrap().id;

        let result = service
            .add_observation(id, AddObservationPayload { stage: Stage::InitialContact, note: "  ".into() })
            .await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }
}
