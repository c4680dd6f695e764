// src/services/driver_service.rs

use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::{csv::Delimiter, error::AppError},
    db::{DriverRepository, FieldConfigRepository},
    models::{
        driver::{AvailabilityStatus, Driver, DriverFilter, NewDriver},
        field_config::{DriverView, FieldView},
    },
    services::field_view::{export_csv, project},
};

#[derive(Clone)]
pub struct DriverService {
    repo: DriverRepository,
    field_repo: FieldConfigRepository,
}

impl DriverService {
    pub fn new(repo: DriverRepository, field_repo: FieldConfigRepository) -> Self {
        Self { repo, field_repo }
    }

    pub async fn create<'e, E>(&self, executor: E, input: NewDriver) -> Result<Driver, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.create(executor, &input).await
    }

    pub async fn list<'e, E>(&self, executor: E, filter: &DriverFilter) -> Result<Vec<Driver>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let drivers = self.repo.list_all(executor).await?;
        Ok(filter.apply(drivers))
    }

    pub async fn update_availability<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        status: AvailabilityStatus,
        current_location: Option<&str>,
    ) -> Result<Driver, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let driver = self
            .repo
            .update_availability(executor, id, status, current_location)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("Motorista {}", id)))?;

        tracing::debug!("🚚 Motorista {} agora {}", id, status.as_str());
        Ok(driver)
    }

    /// Cartões ou linhas de tabela, conforme a configuração de campos.
    pub async fn views<'e, E>(
        &self,
        executor: E,
        view: FieldView,
        filter: &DriverFilter,
    ) -> Result<Vec<DriverView>, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;
        self.field_repo.seed_defaults(&mut *tx).await?;
        let configs = self.field_repo.list(&mut *tx).await?;
        let drivers = filter.apply(self.repo.list_all(&mut *tx).await?);
        tx.commit().await?;

        Ok(drivers.iter().map(|d| project(d, &configs, view)).collect())
    }

    pub async fn export<'e, E>(
        &self,
        executor: E,
        filter: &DriverFilter,
        delimiter: Delimiter,
    ) -> Result<String, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;
        self.field_repo.seed_defaults(&mut *tx).await?;
        let configs = self.field_repo.list(&mut *tx).await?;
        let drivers = filter.apply(self.repo.list_all(&mut *tx).await?);
        tx.commit().await?;

        tracing::info!("📄 Exportando {} motoristas", drivers.len());
        Ok(export_csv(&drivers, &configs, delimiter))
    }
}
