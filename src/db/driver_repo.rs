// src/db/driver_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::driver::{AvailabilityStatus, Driver, DriverHistory, NewDriver},
};

#[derive(Clone)]
pub struct DriverRepository {
    pool: PgPool,
}

impl DriverRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create<'e, E>(&self, executor: E, input: &NewDriver) -> Result<Driver, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let driver = sqlx::query_as::<_, Driver>(
            r#"
            INSERT INTO drivers (
                name, phone, truck_plate, vehicle_type, availability_status, current_location
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&input.name)
        .bind(&input.phone)
        .bind(&input.truck_plate)
        .bind(&input.vehicle_type)
        .bind(input.availability_status)
        .bind(&input.current_location)
        .fetch_one(executor)
        .await?;

        Ok(driver)
    }

    pub async fn list_all<'e, E>(&self, executor: E) -> Result<Vec<Driver>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let drivers = sqlx::query_as::<_, Driver>("SELECT * FROM drivers ORDER BY name ASC")
            .fetch_all(executor)
            .await?;

        Ok(drivers)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Driver>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let driver = sqlx::query_as::<_, Driver>("SELECT * FROM drivers WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(driver)
    }

    // Qualquer mudança de disponibilidade renova o last_update
    pub async fn update_availability<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        status: AvailabilityStatus,
        current_location: Option<&str>,
    ) -> Result<Option<Driver>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let driver = sqlx::query_as::<_, Driver>(
            r#"
            UPDATE drivers
            SET availability_status = $1,
                current_location = COALESCE($2, current_location),
                last_update = NOW()
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(status)
        .bind(current_location)
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(driver)
    }

    pub async fn histories<'e, E>(&self, executor: E) -> Result<Vec<DriverHistory>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // Recusas só contam para ofertas enviadas e recusadas de fato;
        // matches `superseded` foram fechados pelo sistema
        let histories = sqlx::query_as::<_, DriverHistory>(
            r#"
            SELECT
                d.id AS driver_id,
                (SELECT COUNT(*) FROM embarques e
                  WHERE e.driver_id = d.id AND e.status = 'delivered') AS completed_deliveries,
                (SELECT COUNT(*) FROM vehicle_matches m
                  WHERE m.driver_id = d.id AND m.status = 'accepted') AS accepted_offers,
                (SELECT COUNT(*) FROM vehicle_matches m
                  WHERE m.driver_id = d.id AND m.status = 'rejected'
                    AND m.offered_at IS NOT NULL) AS rejected_offers,
                (SELECT AVG(e.total_value)::float8 FROM vehicle_matches m
                   JOIN embarques e ON e.id = m.embarque_id
                  WHERE m.driver_id = d.id AND m.status = 'accepted') AS avg_accepted_value
            FROM drivers d
            "#,
        )
        .fetch_all(executor)
        .await?;

        Ok(histories)
    }
}
