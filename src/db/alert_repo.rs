// src/db/alert_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::alert::{NewAlert, OperationalAlert},
};

#[derive(Clone)]
pub struct AlertRepository {
    pool: PgPool,
}

impl AlertRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // Mais graves primeiro; dentro da mesma gravidade, os mais recentes
    pub async fn list<'e, E>(
        &self,
        executor: E,
        include_resolved: bool,
    ) -> Result<Vec<OperationalAlert>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let alerts = sqlx::query_as::<_, OperationalAlert>(
            r#"
            SELECT * FROM operational_alerts
            WHERE $1 OR resolved = FALSE
            ORDER BY severity DESC, created_at DESC
            "#,
        )
        .bind(include_resolved)
        .fetch_all(executor)
        .await?;

        Ok(alerts)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<OperationalAlert>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let alert = sqlx::query_as::<_, OperationalAlert>("SELECT * FROM operational_alerts WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(alert)
    }

    pub async fn create<'e, E>(&self, executor: E, input: &NewAlert) -> Result<OperationalAlert, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let alert = sqlx::query_as::<_, OperationalAlert>(
            r#"
            INSERT INTO operational_alerts (severity, title, description, embarque_id, kind)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(input.severity)
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.embarque_id)
        .bind(&input.kind)
        .fetch_one(executor)
        .await?;

        Ok(alert)
    }

    /// Insere só se não houver alerta aberto do mesmo tipo para o embarque,
    /// nem um resolvido depois da última alteração do embarque.
    pub async fn insert_if_absent<'e, E>(
        &self,
        executor: E,
        input: &NewAlert,
    ) -> Result<Option<OperationalAlert>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let alert = sqlx::query_as::<_, OperationalAlert>(
            r#"
            INSERT INTO operational_alerts (severity, title, description, embarque_id, kind)
            SELECT $1, $2, $3, $4, $5
            WHERE NOT EXISTS (
                SELECT 1
                FROM operational_alerts a
                JOIN embarques e ON e.id = a.embarque_id
                WHERE a.embarque_id = $4
                  AND a.kind = $5
                  AND a.resolved = TRUE
                  AND a.resolved_at >= e.updated_at
            )
            ON CONFLICT (embarque_id, kind) WHERE resolved = FALSE AND kind IS NOT NULL
            DO NOTHING
            RETURNING *
            "#,
        )
        .bind(input.severity)
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.embarque_id)
        .bind(&input.kind)
        .fetch_optional(executor)
        .await?;

        Ok(alert)
    }

    pub async fn resolve<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<OperationalAlert>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let alert = sqlx::query_as::<_, OperationalAlert>(
            r#"
            UPDATE operational_alerts
            SET resolved = TRUE, resolved_at = NOW()
            WHERE id = $1 AND resolved = FALSE
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(alert)
    }
}
