// src/db/matching_repo.rs

use serde_json::Value;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::matching::{CompatibilityLevel, MatchStatus, VehicleMatch},
};

#[derive(Clone)]
pub struct MatchingRepository {
    pool: PgPool,
}

impl MatchingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Sugestões antigas são descartadas a cada novo cálculo
    pub async fn delete_suggested<'e, E>(&self, executor: E, embarque_id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "DELETE FROM vehicle_matches WHERE embarque_id = $1 AND status = 'suggested'",
        )
        .bind(embarque_id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        embarque_id: Uuid,
        driver_id: Uuid,
        score: i16,
        level: CompatibilityLevel,
        factors: &Value,
    ) -> Result<VehicleMatch, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let vehicle_match = sqlx::query_as::<_, VehicleMatch>(
            r#"
            INSERT INTO vehicle_matches (
                embarque_id, driver_id, compatibility_score, compatibility_level, factors
            )
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(embarque_id)
        .bind(driver_id)
        .bind(score)
        .bind(level)
        .bind(factors)
        .fetch_one(executor)
        .await?;

        Ok(vehicle_match)
    }

    pub async fn list_for_embarque<'e, E>(
        &self,
        executor: E,
        embarque_id: Uuid,
    ) -> Result<Vec<VehicleMatch>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let matches = sqlx::query_as::<_, VehicleMatch>(
            r#"
            SELECT * FROM vehicle_matches
            WHERE embarque_id = $1
            ORDER BY compatibility_score DESC, created_at ASC
            "#,
        )
        .bind(embarque_id)
        .fetch_all(executor)
        .await?;

        Ok(matches)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<VehicleMatch, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, VehicleMatch>("SELECT * FROM vehicle_matches WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("Match {}", id)))
    }

    /// Só depois de travar o embarque do match (ver `MatchingService`).
    pub async fn lock_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<VehicleMatch, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, VehicleMatch>("SELECT * FROM vehicle_matches WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("Match {}", id)))
    }

    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        status: MatchStatus,
    ) -> Result<VehicleMatch, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let vehicle_match = sqlx::query_as::<_, VehicleMatch>(
            r#"
            UPDATE vehicle_matches
            SET status = $1,
                offered_at = CASE WHEN $1 = 'offered'::match_status THEN NOW() ELSE offered_at END,
                updated_at = NOW()
            WHERE id = $2
            RETURNING *
            "#,
        )
        .bind(status)
        .bind(id)
        .fetch_one(executor)
        .await?;

        Ok(vehicle_match)
    }

    /// Encerra as sugestões/ofertas abertas do embarque, exceto `keep`.
    pub async fn supersede_open<'e, E>(
        &self,
        executor: E,
        embarque_id: Uuid,
        keep: Option<Uuid>,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE vehicle_matches
            SET status = 'superseded', updated_at = NOW()
            WHERE embarque_id = $1
              AND ($2::uuid IS NULL OR id <> $2)
              AND status IN ('suggested', 'offered')
            "#,
        )
        .bind(embarque_id)
        .bind(keep)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }
}
