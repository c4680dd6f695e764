// src/services/settings_service.rs

use sqlx::{Acquire, Executor, Postgres};

use crate::{
    common::error::AppError,
    db::{field_config_repo::FieldConfigChanges, FieldConfigRepository, RankingRepository},
    models::{
        field_config::{DriverField, DriverFieldConfig},
        ranking::{RankingRule, RuleKey},
    },
};

/// Peso e flag de uma regra, já validados.
#[derive(Debug, Clone, Copy)]
pub struct RuleUpdate {
    pub key: RuleKey,
    pub weight: i32,
    pub enabled: bool,
}

#[derive(Clone)]
pub struct SettingsService {
    ranking_repo: RankingRepository,
    field_repo: FieldConfigRepository,
}

impl SettingsService {
    pub fn new(ranking_repo: RankingRepository, field_repo: FieldConfigRepository) -> Self {
        Self { ranking_repo, field_repo }
    }

    // =========================================================================
    //  REGRAS DE RANKING
    // =========================================================================

    pub async fn list_rules<'e, E>(&self, executor: E) -> Result<Vec<RankingRule>, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;
        self.ranking_repo.seed_defaults(&mut *tx).await?;
        let rules = self.ranking_repo.list(&mut *tx).await?;
        tx.commit().await?;
        Ok(rules)
    }

    pub async fn update_rules<'e, E>(
        &self,
        executor: E,
        updates: &[RuleUpdate],
    ) -> Result<Vec<RankingRule>, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;
        self.ranking_repo.seed_defaults(&mut *tx).await?;
        for update in updates {
            self.ranking_repo
                .upsert(&mut *tx, update.key, update.weight, update.enabled)
                .await?;
        }
        let rules = self.ranking_repo.list(&mut *tx).await?;
        tx.commit().await?;

        tracing::info!("⚖️ {} regras de ranking atualizadas", updates.len());
        Ok(rules)
    }

    // =========================================================================
    //  CAMPOS DO CADASTRO DE MOTORISTAS
    // =========================================================================

    pub async fn list_fields<'e, E>(&self, executor: E) -> Result<Vec<DriverFieldConfig>, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;
        self.field_repo.seed_defaults(&mut *tx).await?;
        let configs = self.field_repo.list(&mut *tx).await?;
        tx.commit().await?;
        Ok(configs)
    }

    pub async fn update_field<'e, E>(
        &self,
        executor: E,
        field: DriverField,
        changes: FieldConfigChanges<'_>,
    ) -> Result<DriverFieldConfig, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;
        self.field_repo.seed_defaults(&mut *tx).await?;
        let updated = self
            .field_repo
            .update(&mut *tx, field.key(), changes)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("Campo {}", field.key())))?;
        tx.commit().await?;
        Ok(updated)
    }
}
