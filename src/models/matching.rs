// src/models/matching.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "match_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Suggested,
    Offered,
    Accepted,
    /// Recusado pelo motorista ou pelo despachante.
    Rejected,
    /// Encerrado pelo sistema: outro match foi aceito ou o embarque foi arquivado.
    Superseded,
}

impl MatchStatus {
    pub fn can_transition_to(&self, next: MatchStatus) -> bool {
        matches!(
            (self, next),
            (MatchStatus::Suggested, MatchStatus::Offered)
                | (MatchStatus::Suggested, MatchStatus::Rejected)
                | (MatchStatus::Offered, MatchStatus::Accepted)
                | (MatchStatus::Offered, MatchStatus::Rejected)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Suggested => "suggested",
            MatchStatus::Offered => "offered",
            MatchStatus::Accepted => "accepted",
            MatchStatus::Rejected => "rejected",
            MatchStatus::Superseded => "superseded",
        }
    }
}

/// Faixa da nota de compatibilidade (alta / média / baixa).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "compatibility_level", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CompatibilityLevel {
    Alta,
    Media,
    Baixa,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VehicleMatch {
    pub id: Uuid,
    pub embarque_id: Uuid,
    pub driver_id: Uuid,
    #[schema(example = 87)]
    pub compatibility_score: i16,
    pub compatibility_level: CompatibilityLevel,
    #[schema(value_type = Object)]
    pub factors: Value,
    pub status: MatchStatus,
    pub offered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// As cinco notas parciais (0–100) de um par motorista/embarque.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubScores {
    pub availability: f64,
    pub equipment: f64,
    pub location: f64,
    pub history: f64,
    pub commercial: f64,
}

/// Resultado da avaliação de um motorista para um embarque.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatchCandidate {
    pub driver_id: Uuid,
    pub driver_name: String,
    pub score: u8,
    pub level: CompatibilityLevel,
    pub sub_scores: SubScores,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GlobalMatch {
    pub embarque_id: Uuid,
    pub origin: String,
    pub destination: String,
    pub best: MatchCandidate,
}

#[cfg(test)]
mod tests {
    use super::MatchStatus::{self, *};
    use rstest::rstest;

    #[rstest]
    #[case(Suggested, Offered, true)]
    #[case(Suggested, Rejected, true)]
    #[case(Suggested, Accepted, false)]
    #[case(Offered, Accepted, true)]
    #[case(Offered, Rejected, true)]
    #[case(Accepted, Rejected, false)]
    #[case(Rejected, Offered, false)]
    #[case(Superseded, Offered, false)]
    #[case(Superseded, Accepted, false)]
    fn match_transitions(#[case] from: MatchStatus, #[case] to: MatchStatus, #[case] allowed: bool) {
        assert_eq!(from.can_transition_to(to), allowed);
    }
}
