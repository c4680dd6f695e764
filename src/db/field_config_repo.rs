// src/db/field_config_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::{common::error::AppError, models::field_config::DriverFieldConfig};

#[derive(Clone)]
pub struct FieldConfigRepository {
    pool: PgPool,
}

/// Alterações parciais; `None` mantém o valor gravado.
#[derive(Debug, Default)]
pub struct FieldConfigChanges<'a> {
    pub label: Option<&'a str>,
    pub visible_in_card: Option<bool>,
    pub visible_in_table: Option<bool>,
    pub position: Option<i32>,
}

impl FieldConfigRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list<'e, E>(&self, executor: E) -> Result<Vec<DriverFieldConfig>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let configs = sqlx::query_as::<_, DriverFieldConfig>(
            "SELECT * FROM driver_field_config ORDER BY position ASC, field_key ASC",
        )
        .fetch_all(executor)
        .await?;

        Ok(configs)
    }

    pub async fn seed_defaults<'e, E>(&self, executor: E) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let defaults = DriverFieldConfig::defaults();
        let keys: Vec<String> = defaults.iter().map(|c| c.field_key.clone()).collect();
        let labels: Vec<String> = defaults.iter().map(|c| c.label.clone()).collect();
        let in_card: Vec<bool> = defaults.iter().map(|c| c.visible_in_card).collect();
        let in_table: Vec<bool> = defaults.iter().map(|c| c.visible_in_table).collect();
        let positions: Vec<i32> = defaults.iter().map(|c| c.position).collect();

        let result = sqlx::query(
            r#"
            INSERT INTO driver_field_config (field_key, label, visible_in_card, visible_in_table, position)
            SELECT * FROM UNNEST($1::text[], $2::text[], $3::bool[], $4::bool[], $5::int4[])
            ON CONFLICT (field_key) DO NOTHING
            "#,
        )
        .bind(&keys)
        .bind(&labels)
        .bind(&in_card)
        .bind(&in_table)
        .bind(&positions)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        field_key: &str,
        changes: FieldConfigChanges<'_>,
    ) -> Result<Option<DriverFieldConfig>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let config = sqlx::query_as::<_, DriverFieldConfig>(
            r#"
            UPDATE driver_field_config
            SET label = COALESCE($2, label),
                visible_in_card = COALESCE($3, visible_in_card),
                visible_in_table = COALESCE($4, visible_in_table),
                position = COALESCE($5, position)
            WHERE field_key = $1
            RETURNING *
            "#,
        )
        .bind(field_key)
        .bind(changes.label)
        .bind(changes.visible_in_card)
        .bind(changes.visible_in_table)
        .bind(changes.position)
        .fetch_optional(executor)
        .await?;

        Ok(config)
    }
}
