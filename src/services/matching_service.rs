// src/services/matching_service.rs

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::{Acquire, Executor, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{DriverRepository, EmbarqueRepository, MatchingRepository, RankingRepository},
    models::{
        driver::{AvailabilityStatus, DriverHistory},
        embarque::{Embarque, EmbarqueStatus},
        matching::{GlobalMatch, MatchStatus, VehicleMatch},
        ranking::Weights,
    },
    services::scoring::{self, ScoringSettings},
};

#[derive(Clone)]
pub struct MatchingService {
    embarque_repo: EmbarqueRepository,
    driver_repo: DriverRepository,
    repo: MatchingRepository,
    ranking_repo: RankingRepository,
    settings: ScoringSettings,
    suggestion_limit: usize,
}

impl MatchingService {
    pub fn new(
        embarque_repo: EmbarqueRepository,
        driver_repo: DriverRepository,
        repo: MatchingRepository,
        ranking_repo: RankingRepository,
        settings: ScoringSettings,
        suggestion_limit: usize,
    ) -> Self {
        Self {
            embarque_repo,
            driver_repo,
            repo,
            ranking_repo,
            settings,
            suggestion_limit,
        }
    }

    // Sem regras gravadas usamos os pesos padrão
    async fn load_weights(&self, tx: &mut Transaction<'_, Postgres>) -> Result<Weights, AppError> {
        let rules = self.ranking_repo.list(&mut **tx).await?;
        if rules.is_empty() {
            Ok(Weights::default())
        } else {
            Ok(Weights::from_rules(&rules))
        }
    }

    async fn load_histories(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<HashMap<Uuid, DriverHistory>, AppError> {
        let histories = self.driver_repo.histories(&mut **tx).await?;
        Ok(histories.into_iter().map(|h| (h.driver_id, h)).collect())
    }

    // =========================================================================
    //  SUGESTÕES
    // =========================================================================

    /// Recalcula as sugestões do embarque e grava as melhores.
    pub async fn compute_suggestions<'e, E>(
        &self,
        executor: E,
        embarque_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<VehicleMatch>, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let embarque = self.embarque_repo.lock_by_id(&mut *tx, embarque_id).await?;
        if embarque.status.is_archived() {
            return Err(AppError::Conflict(format!(
                "Embarque {} está {}",
                embarque_id,
                embarque.status.as_str()
            )));
        }
        if embarque.driver_id.is_some() {
            return Err(AppError::Conflict(format!(
                "Embarque {} já tem motorista",
                embarque_id
            )));
        }

        let weights = self.load_weights(&mut tx).await?;
        let histories = self.load_histories(&mut tx).await?;
        let drivers = self.driver_repo.list_all(&mut *tx).await?;

        let ranked = scoring::rank(&embarque, &drivers, &histories, &weights, &self.settings, now);

        let removed = self.repo.delete_suggested(&mut *tx, embarque_id).await?;
        if removed > 0 {
            tracing::debug!("Descartadas {} sugestões antigas do embarque {}", removed, embarque_id);
        }

        let mut saved = Vec::with_capacity(self.suggestion_limit);
        for candidate in ranked.into_iter().take(self.suggestion_limit) {
            let factors = json!({
                "subScores": candidate.sub_scores,
                "weights": weights,
            });
            let vehicle_match = self
                .repo
                .insert(
                    &mut *tx,
                    embarque_id,
                    candidate.driver_id,
                    i16::from(candidate.score),
                    candidate.level,
                    &factors,
                )
                .await?;
            saved.push(vehicle_match);
        }

        tx.commit().await?;

        tracing::info!("🎯 {} sugestões gravadas para o embarque {}", saved.len(), embarque_id);
        Ok(saved)
    }

    pub async fn list_for_embarque<'e, E>(
        &self,
        executor: E,
        embarque_id: Uuid,
    ) -> Result<Vec<VehicleMatch>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.list_for_embarque(executor, embarque_id).await
    }

    /// Melhor motorista disponível para cada embarque ativo sem motorista.
    pub async fn global_matches<'e, E>(
        &self,
        executor: E,
        now: DateTime<Utc>,
    ) -> Result<Vec<GlobalMatch>, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;
        let weights = self.load_weights(&mut tx).await?;
        let histories = self.load_histories(&mut tx).await?;
        let embarques = self.embarque_repo.list_active(&mut *tx).await?;
        let drivers = self.driver_repo.list_all(&mut *tx).await?;
        tx.commit().await?;

        let available: Vec<_> = drivers
            .into_iter()
            .filter(|d| d.availability_status == AvailabilityStatus::Available)
            .collect();

        let mut result: Vec<GlobalMatch> = embarques
            .iter()
            .filter(|e| e.driver_id.is_none())
            .filter_map(|e| {
                scoring::rank(e, &available, &histories, &weights, &self.settings, now)
                    .into_iter()
                    .next()
                    .map(|best| GlobalMatch {
                        embarque_id: e.id,
                        origin: e.origin.clone(),
                        destination: e.destination.clone(),
                        best,
                    })
            })
            .collect();

        result.sort_by(|a, b| scoring::compare_candidates(&a.best, &b.best));
        Ok(result)
    }

    // =========================================================================
    //  TRANSIÇÕES
    // =========================================================================

    // Toda alteração de match trava primeiro o embarque e só depois o match:
    // operações concorrentes sobre o mesmo embarque ficam em fila.
    async fn lock_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        match_id: Uuid,
    ) -> Result<(Embarque, VehicleMatch), AppError> {
        let embarque_id = self.repo.find_by_id(&mut **tx, match_id).await?.embarque_id;

        let embarque = self.embarque_repo.lock_by_id(&mut **tx, embarque_id).await?;
        if embarque.status.is_archived() {
            return Err(AppError::Conflict(format!(
                "Embarque {} está {}",
                embarque.id,
                embarque.status.as_str()
            )));
        }

        let current = self.repo.lock_by_id(&mut **tx, match_id).await?;
        Ok((embarque, current))
    }

    async fn move_match<'e, E>(
        &self,
        executor: E,
        match_id: Uuid,
        next: MatchStatus,
    ) -> Result<VehicleMatch, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let (_, current) = self.lock_for_update(&mut tx, match_id).await?;
        if !current.status.can_transition_to(next) {
            return Err(AppError::InvalidTransition {
                from: current.status.as_str().to_string(),
                to: next.as_str().to_string(),
            });
        }

        let updated = self.repo.update_status(&mut *tx, match_id, next).await?;
        tx.commit().await?;
        Ok(updated)
    }

    pub async fn offer<'e, E>(&self, executor: E, match_id: Uuid) -> Result<VehicleMatch, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        self.move_match(executor, match_id, MatchStatus::Offered).await
    }

    pub async fn reject<'e, E>(&self, executor: E, match_id: Uuid) -> Result<VehicleMatch, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        self.move_match(executor, match_id, MatchStatus::Rejected).await
    }

    /// Aceite da oferta: atribui o motorista e encerra as demais opções.
    pub async fn accept<'e, E>(&self, executor: E, match_id: Uuid) -> Result<VehicleMatch, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let (embarque, current) = self.lock_for_update(&mut tx, match_id).await?;

        // Quem perdeu a corrida encontra o embarque já com outro motorista
        if embarque.driver_id.is_some_and(|d| d != current.driver_id) {
            return Err(AppError::Conflict(format!(
                "Embarque {} já tem motorista",
                embarque.id
            )));
        }
        if !current.status.can_transition_to(MatchStatus::Accepted) {
            return Err(AppError::InvalidTransition {
                from: current.status.as_str().to_string(),
                to: MatchStatus::Accepted.as_str().to_string(),
            });
        }

        let accepted = self.repo.update_status(&mut *tx, match_id, MatchStatus::Accepted).await?;
        self.repo
            .supersede_open(&mut *tx, embarque.id, Some(match_id))
            .await?;

        self.embarque_repo
            .set_driver(&mut *tx, embarque.id, Some(current.driver_id))
            .await?;
        self.driver_repo
            .update_availability(&mut *tx, current.driver_id, AvailabilityStatus::Busy, None)
            .await?;

        if embarque.status.is_pre_confirmation() {
            self.embarque_repo
                .update_status(&mut *tx, embarque.id, EmbarqueStatus::Confirmed)
                .await?;
        }

        tx.commit().await?;

        tracing::info!(
            "✅ Motorista {} aceitou o embarque {}",
            current.driver_id,
            embarque.id
        );
        Ok(accepted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures;
    use sqlx::PgPool;

    async fn histories(state: &crate::config::AppState, pool: &PgPool) -> HashMap<Uuid, DriverHistory> {
        state
            .matching_service
            .driver_repo
            .histories(pool)
            .await
            .unwrap()
            .into_iter()
            .map(|h| (h.driver_id, h))
            .collect()
    }

    // Dois motoristas ofertados para o mesmo embarque; devolve (estado, embarque, [match_a, match_b])
    async fn two_offers(pool: &PgPool) -> (crate::config::AppState, Uuid, [VehicleMatch; 2]) {
        let state = fixtures::state(pool);
        fixtures::driver(&state, "Ana", "Campinas - SP").await;
        fixtures::driver(&state, "Bruno", "Santos - SP").await;
        let embarque = fixtures::embarque(&state, "Campinas - SP").await;

        let suggested = state
            .matching_service
            .compute_suggestions(pool, embarque.id, Utc::now())
            .await
            .unwrap();
        assert_eq!(suggested.len(), 2);

        let a = state.matching_service.offer(pool, suggested[0].id).await.unwrap();
        let b = state.matching_service.offer(pool, suggested[1].id).await.unwrap();
        (state, embarque.id, [a, b])
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn recomputing_replaces_previous_suggestions(pool: PgPool) {
        let state = fixtures::state(&pool);
        fixtures::driver(&state, "Ana", "Campinas - SP").await;
        let embarque = fixtures::embarque(&state, "Campinas - SP").await;

        for _ in 0..2 {
            state
                .matching_service
                .compute_suggestions(&pool, embarque.id, Utc::now())
                .await
                .unwrap();
        }

        let matches = state.matching_service.list_for_embarque(&pool, embarque.id).await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].status, MatchStatus::Suggested);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn accept_assigns_driver_and_closes_other_offers(pool: PgPool) {
        let (state, embarque_id, [winner, loser]) = two_offers(&pool).await;

        let accepted = state.matching_service.accept(&pool, winner.id).await.unwrap();
        assert_eq!(accepted.status, MatchStatus::Accepted);

        let embarque = state.embarque_service.get(&pool, embarque_id).await.unwrap();
        assert_eq!(embarque.driver_id, Some(winner.driver_id));
        assert_eq!(embarque.status, EmbarqueStatus::Confirmed);

        let driver = state
            .matching_service
            .driver_repo
            .find_by_id(&pool, winner.driver_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(driver.availability_status, AvailabilityStatus::Busy);

        let matches = state.matching_service.list_for_embarque(&pool, embarque_id).await.unwrap();
        let other = matches.iter().find(|m| m.id == loser.id).unwrap();
        assert_eq!(other.status, MatchStatus::Superseded);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn closed_offer_does_not_count_as_driver_rejection(pool: PgPool) {
        let (state, _, [winner, loser]) = two_offers(&pool).await;
        state.matching_service.accept(&pool, winner.id).await.unwrap();

        let histories = histories(&state, &pool).await;
        let history = &histories[&loser.driver_id];
        assert_eq!(history.rejected_offers, 0);
        assert_eq!(scoring::history_score(Some(history)), 50.0);

        let winner_history = &histories[&winner.driver_id];
        assert_eq!(winner_history.accepted_offers, 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn explicit_rejection_still_counts(pool: PgPool) {
        let (state, _, [offered, _]) = two_offers(&pool).await;
        state.matching_service.reject(&pool, offered.id).await.unwrap();

        let histories = histories(&state, &pool).await;
        assert_eq!(histories[&offered.driver_id].rejected_offers, 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn concurrent_accepts_leave_a_single_winner(pool: PgPool) {
        let (state, embarque_id, [a, b]) = two_offers(&pool).await;

        let spawn_accept = |match_id: Uuid| {
            let service = state.matching_service.clone();
            let pool = pool.clone();
            tokio::spawn(async move { service.accept(&pool, match_id).await })
        };
        let first = spawn_accept(a.id);
        let second = spawn_accept(b.id);
        let results = [first.await.unwrap(), second.await.unwrap()];

        let winners = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(winners, 1);
        assert!(results
            .iter()
            .any(|r| matches!(r, Err(AppError::Conflict(_)))));

        let embarque = state.embarque_service.get(&pool, embarque_id).await.unwrap();
        assert!(embarque.driver_id == Some(a.driver_id) || embarque.driver_id == Some(b.driver_id));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn cancelled_embarque_cannot_be_offered(pool: PgPool) {
        let state = fixtures::state(&pool);
        fixtures::driver(&state, "Ana", "Campinas - SP").await;
        let embarque = fixtures::embarque(&state, "Campinas - SP").await;

        let suggested = state
            .matching_service
            .compute_suggestions(&pool, embarque.id, Utc::now())
            .await
            .unwrap();
        state
            .embarque_service
            .transition(&pool, embarque.id, EmbarqueStatus::Cancelled)
            .await
            .unwrap();

        let result = state.matching_service.offer(&pool, suggested[0].id).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));

        let matches = state.matching_service.list_for_embarque(&pool, embarque.id).await.unwrap();
        assert!(matches.iter().all(|m| m.status == MatchStatus::Superseded));

        let summary = state.dashboard_service.get_summary(&pool).await.unwrap();
        assert_eq!(summary.open_matches, 0);
    }
}
