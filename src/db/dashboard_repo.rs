// src/db/dashboard_repo.rs

use sqlx::{Acquire, Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::dashboard::{DashboardSummary, SeverityCount, StatusCount},
};

#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_summary<'e, E>(&self, executor: E) -> Result<DashboardSummary, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        // Transação só para ter um retrato consistente dos contadores
        let mut tx = executor.begin().await?;

        // A. Embarques por status
        let embarques_by_status = sqlx::query_as::<_, StatusCount>(
            r#"
            SELECT status, COUNT(*) AS total
            FROM embarques
            GROUP BY status
            ORDER BY status
            "#,
        )
        .fetch_all(&mut *tx)
        .await?;

        // B. Alertas abertos por gravidade
        let unresolved_alerts = sqlx::query_as::<_, SeverityCount>(
            r#"
            SELECT severity, COUNT(*) AS total
            FROM operational_alerts
            WHERE resolved = FALSE
            GROUP BY severity
            ORDER BY severity DESC
            "#,
        )
        .fetch_all(&mut *tx)
        .await?;

        // C. Motoristas
        let (available_drivers, busy_drivers): (i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE availability_status = 'available'),
                COUNT(*) FILTER (WHERE availability_status = 'busy')
            FROM drivers
            "#,
        )
        .fetch_one(&mut *tx)
        .await?;

        // D. Matches em aberto
        let open_matches: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM vehicle_matches WHERE status IN ('suggested', 'offered')",
        )
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(DashboardSummary {
            embarques_by_status,
            unresolved_alerts,
            available_drivers,
            busy_drivers,
            open_matches,
        })
    }
}
