// src/services/embarque_service.rs

use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{DriverRepository, EmbarqueRepository, MatchingRepository},
    models::{
        dashboard::Board,
        driver::AvailabilityStatus,
        embarque::{Embarque, EmbarqueStatus, NewEmbarque},
    },
    services::board::build_board,
};

#[derive(Clone)]
pub struct EmbarqueService {
    repo: EmbarqueRepository,
    driver_repo: DriverRepository,
    matching_repo: MatchingRepository,
}

impl EmbarqueService {
    pub fn new(
        repo: EmbarqueRepository,
        driver_repo: DriverRepository,
        matching_repo: MatchingRepository,
    ) -> Self {
        Self { repo, driver_repo, matching_repo }
    }

    pub async fn create<'e, E>(&self, executor: E, input: NewEmbarque) -> Result<Embarque, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let embarque = self.repo.create(executor, &input).await?;
        tracing::info!("📦 Embarque {} criado ({} -> {})", embarque.id, embarque.origin, embarque.destination);
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
        self.repo.list(executor, status).await
    }

    pub async fn get<'e, E>(&self, executor: E, id: Uuid) -> Result<Embarque, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo
            .find_by_id(executor, id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("Embarque {}", id)))
    }

    pub async fn board<'e, E>(&self, executor: E, include_archived: bool) -> Result<Board, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let embarques = if include_archived {
            self.repo.list(&mut *tx, None).await?
        } else {
            self.repo.list_active(&mut *tx).await?
        };
        let drivers = self.driver_repo.list_all(&mut *tx).await?;

        tx.commit().await?;

        Ok(build_board(&embarques, &drivers, include_archived))
    }

    // --- TRANSIÇÃO ---

    pub async fn transition<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        next: EmbarqueStatus,
    ) -> Result<Embarque, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let current = self.repo.lock_by_id(&mut *tx, id).await?;

        if !current.status.can_transition_to(next) {
            return Err(AppError::InvalidTransition {
                from: current.status.as_str().to_string(),
                to: next.as_str().to_string(),
            });
        }

        if next == EmbarqueStatus::InTransit && current.driver_id.is_none() {
            return Err(AppError::DriverRequired);
        }

        let updated = self.repo.update_status(&mut *tx, id, next).await?;

        // Embarque encerrado libera o motorista e fecha as ofertas em aberto
        if next.is_archived() {
            if let Some(driver_id) = updated.driver_id {
                self.driver_repo
                    .update_availability(&mut *tx, driver_id, AvailabilityStatus::Available, None)
                    .await?;
            }
            let closed = self.matching_repo.supersede_open(&mut *tx, id, None).await?;
            if closed > 0 {
                tracing::debug!("{} matches do embarque {} encerrados", closed, id);
            }
        }

        tx.commit().await?;

        tracing::info!(
            "🔀 Embarque {}: {} -> {}",
            id,
            current.status.as_str(),
            next.as_str()
        );
        Ok(updated)
    }

    /// Atribuição direta pelo despachante, sem passar pelo matching.
    pub async fn assign_driver<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        driver_id: Uuid,
    ) -> Result<Embarque, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let current = self.repo.lock_by_id(&mut *tx, id).await?;
        if current.status.is_archived() {
            return Err(AppError::Conflict(format!(
                "Embarque {} está {}",
                id,
                current.status.as_str()
            )));
        }

        self.driver_repo
            .find_by_id(&mut *tx, driver_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("Motorista {}", driver_id)))?;

        if let Some(previous) = current.driver_id.filter(|p| *p != driver_id) {
            self.driver_repo
                .update_availability(&mut *tx, previous, AvailabilityStatus::Available, None)
                .await?;
        }

        self.driver_repo
            .update_availability(&mut *tx, driver_id, AvailabilityStatus::Busy, None)
            .await?;
        let updated = self.repo.set_driver(&mut *tx, id, Some(driver_id)).await?;

        tx.commit().await?;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures;
    use sqlx::PgPool;

    const TO_IN_TRANSIT: [EmbarqueStatus; 3] = [
        EmbarqueStatus::Sent,
        EmbarqueStatus::WaitingConfirmation,
        EmbarqueStatus::Confirmed,
    ];

    #[sqlx::test(migrations = "./migrations")]
    async fn delivery_releases_the_driver(pool: PgPool) {
        let state = fixtures::state(&pool);
        let driver = fixtures::driver(&state, "Ana", "Campinas - SP").await;
        let embarque = fixtures::embarque(&state, "Campinas - SP").await;
        let service = &state.embarque_service;

        service.assign_driver(&pool, embarque.id, driver.id).await.unwrap();
        let busy = service.driver_repo.find_by_id(&pool, driver.id).await.unwrap().unwrap();
        assert_eq!(busy.availability_status, AvailabilityStatus::Busy);

        for next in TO_IN_TRANSIT.into_iter().chain([EmbarqueStatus::InTransit, EmbarqueStatus::Delivered]) {
            service.transition(&pool, embarque.id, next).await.unwrap();
        }

        let released = service.driver_repo.find_by_id(&pool, driver.id).await.unwrap().unwrap();
        assert_eq!(released.availability_status, AvailabilityStatus::Available);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn in_transit_requires_a_driver(pool: PgPool) {
        let state = fixtures::state(&pool);
        let embarque = fixtures::embarque(&state, "Campinas - SP").await;
        let service = &state.embarque_service;

        for next in TO_IN_TRANSIT {
            service.transition(&pool, embarque.id, next).await.unwrap();
        }

        let result = service.transition(&pool, embarque.id, EmbarqueStatus::InTransit).await;
        assert!(matches!(result, Err(AppError::DriverRequired)));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn illegal_transition_keeps_status(pool: PgPool) {
        let state = fixtures::state(&pool);
        let embarque = fixtures::embarque(&state, "Campinas - SP").await;
        let service = &state.embarque_service;

        let result = service.transition(&pool, embarque.id, EmbarqueStatus::Delivered).await;
        assert!(matches!(result, Err(AppError::InvalidTransition { .. })));

        let unchanged = service.get(&pool, embarque.id).await.unwrap();
        assert_eq!(unchanged.status, EmbarqueStatus::New);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn new_embarque_lands_in_new_column(pool: PgPool) {
        let state = fixtures::state(&pool);
        let embarque = fixtures::embarque(&state, "Campinas - SP").await;

        let board = state.embarque_service.board(&pool, false).await.unwrap();
        let column = board
            .columns
            .iter()
            .find(|c| c.status == EmbarqueStatus::New)
            .unwrap();
        assert_eq!(column.cards[0].embarque_id, embarque.id);
    }
}
