// src/db/embarque_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::embarque::{Embarque, EmbarqueStatus, NewEmbarque},
};

#[derive(Clone)]
pub struct EmbarqueRepository {
    pool: PgPool,
}

impl EmbarqueRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create<'e, E>(&self, executor: E, input: &NewEmbarque) -> Result<Embarque, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let embarque = sqlx::query_as::<_, Embarque>(
            r#"
            INSERT INTO embarques (
                origin, destination, cargo_type, total_value,
                pickup_window_start, pickup_window_end,
                delivery_window_start, delivery_window_end,
                email_content, needs_manual_review
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(&input.origin)
        .bind(&input.destination)
        .bind(&input.cargo_type)
        .bind(input.total_value)
        .bind(input.pickup_window_start)
        .bind(input.pickup_window_end)
        .bind(input.delivery_window_start)
        .bind(input.delivery_window_end)
        .bind(&input.email_content)
        .bind(input.needs_manual_review)
        .fetch_one(executor)
        .await?;

        Ok(embarque)
    }

    pub async fn list<'e, E>(
        &self,
        executor: E,
        status: Option<EmbarqueStatus>,
    ) -> Result<Vec<Embarque>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let embarques = sqlx::query_as::<_, Embarque>(
            r#"
            SELECT * FROM embarques
            WHERE ($1::embarque_status IS NULL OR status = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(status)
        .fetch_all(executor)
        .await?;

        Ok(embarques)
    }

    // Tudo que ainda não foi entregue nem cancelado
    pub async fn list_active<'e, E>(&self, executor: E) -> Result<Vec<Embarque>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let embarques = sqlx::query_as::<_, Embarque>(
            r#"
            SELECT * FROM embarques
            WHERE status NOT IN ('delivered', 'cancelled')
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(executor)
        .await?;

        Ok(embarques)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Embarque>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let embarque = sqlx::query_as::<_, Embarque>("SELECT * FROM embarques WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(embarque)
    }

    /// Busca com `FOR UPDATE`; só faz sentido dentro de uma transação.
    pub async fn lock_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Embarque, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Embarque>("SELECT * FROM embarques WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("Embarque {}", id)))
    }

    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        status: EmbarqueStatus,
    ) -> Result<Embarque, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let embarque = sqlx::query_as::<_, Embarque>(
            r#"
            UPDATE embarques
            SET status = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING *
            "#,
        )
        .bind(status)
        .bind(id)
        .fetch_one(executor)
        .await?;

        Ok(embarque)
    }

    pub async fn set_driver<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        driver_id: Option<Uuid>,
    ) -> Result<Embarque, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let embarque = sqlx::query_as::<_, Embarque>(
            r#"
            UPDATE embarques
            SET driver_id = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING *
            "#,
        )
        .bind(driver_id)
        .bind(id)
        .fetch_one(executor)
        .await?;

        Ok(embarque)
    }
}
