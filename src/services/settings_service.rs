// src/services/settings_service.rs

use sqlx::SqlitePool;

use crate::{
    common::error::AppError,
    db::SettingsRepository,
    models::settings::{CompanyProfile, SaveProfilePayload},
};

#[derive(Clone)]
pub struct SettingsService {
    repo: SettingsRepository,
    pool: SqlitePool,
}

impl SettingsService {
    pub fn new(repo: SettingsRepository, pool: SqlitePool) -> Self {
        Self { repo, pool }
    }

    pub async fn get_profile(&self) -> Result<CompanyProfile, AppError> {
        self.repo.get_profile(&self.pool).await
    }

    pub async fn save_profile(&self, input: SaveProfilePayload) -> Result<CompanyProfile, AppError> {
        self.repo.save_profile(&self.pool, input).await
    }
}
