// src/db/ranking_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::ranking::{RankingRule, RuleKey},
};

#[derive(Clone)]
pub struct RankingRepository {
    pool: PgPool,
}

impl RankingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list<'e, E>(&self, executor: E) -> Result<Vec<RankingRule>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rules = sqlx::query_as::<_, RankingRule>("SELECT * FROM ranking_rules ORDER BY rule_key")
            .fetch_all(executor)
            .await?;

        Ok(rules)
    }

    // Cria as regras que faltam com o peso padrão; não mexe nas existentes
    pub async fn seed_defaults<'e, E>(&self, executor: E) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let keys: Vec<String> = RuleKey::ALL.iter().map(|k| k.as_str().to_string()).collect();
        let weights: Vec<i32> = RuleKey::ALL.iter().map(|k| k.default_weight()).collect();

        let result = sqlx::query(
            r#"
            INSERT INTO ranking_rules (rule_key, weight)
            SELECT * FROM UNNEST($1::text[], $2::int4[])
            ON CONFLICT (rule_key) DO NOTHING
            "#,
        )
        .bind(&keys)
        .bind(&weights)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn upsert<'e, E>(
        &self,
        executor: E,
        key: RuleKey,
        weight: i32,
        enabled: bool,
    ) -> Result<RankingRule, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rule = sqlx::query_as::<_, RankingRule>(
            r#"
            INSERT INTO ranking_rules (rule_key, weight, enabled)
            VALUES ($1, $2, $3)
            ON CONFLICT (rule_key)
            DO UPDATE SET
                weight = EXCLUDED.weight,
                enabled = EXCLUDED.enabled,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(key.as_str())
        .bind(weight)
        .bind(enabled)
        .fetch_one(executor)
        .await?;

        Ok(rule)
    }
}
