// src/models/ranking.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Fatores que compõem a nota de compatibilidade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RuleKey {
    Availability,
    Equipment,
    Location,
    History,
    Commercial,
}

impl RuleKey {
    pub const ALL: [RuleKey; 5] = [
        RuleKey::Availability,
        RuleKey::Equipment,
        RuleKey::Location,
        RuleKey::History,
        RuleKey::Commercial,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKey::Availability => "availability",
            RuleKey::Equipment => "equipment",
            RuleKey::Location => "location",
            RuleKey::History => "history",
            RuleKey::Commercial => "commercial",
        }
    }

    pub fn parse(value: &str) -> Option<RuleKey> {
        RuleKey::ALL.into_iter().find(|k| k.as_str() == value)
    }

    pub fn default_weight(&self) -> i32 {
        match self {
            RuleKey::Availability => 30,
            RuleKey::Equipment => 25,
            RuleKey::Location => 20,
            RuleKey::History => 15,
            RuleKey::Commercial => 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RankingRule {
    #[schema(example = "availability")]
    pub rule_key: String,
    #[schema(example = 30)]
    pub weight: i32,
    pub enabled: bool,
    pub updated_at: DateTime<Utc>,
}

/// Vetor de pesos efetivo, já resolvido a partir das regras gravadas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Weights {
    pub availability: f64,
    pub equipment: f64,
    pub location: f64,
    pub history: f64,
    pub commercial: f64,
}

impl Default for Weights {
    fn default() -> Self {
        let w = |k: RuleKey| k.default_weight() as f64;
        Self {
            availability: w(RuleKey::Availability),
            equipment: w(RuleKey::Equipment),
            location: w(RuleKey::Location),
            history: w(RuleKey::History),
            commercial: w(RuleKey::Commercial),
        }
    }
}

impl Weights {
    pub fn zero() -> Self {
        Self { availability: 0.0, equipment: 0.0, location: 0.0, history: 0.0, commercial: 0.0 }
    }

    fn slot(&mut self, key: RuleKey) -> &mut f64 {
        match key {
            RuleKey::Availability => &mut self.availability,
            RuleKey::Equipment => &mut self.equipment,
            RuleKey::Location => &mut self.location,
            RuleKey::History => &mut self.history,
            RuleKey::Commercial => &mut self.commercial,
        }
    }

    /// Regras desabilitadas pesam zero; chaves desconhecidas são ignoradas.
    pub fn from_rules(rules: &[RankingRule]) -> Self {
        let mut weights = Weights::zero();
        for rule in rules {
            if let Some(key) = RuleKey::parse(&rule.rule_key) {
                *weights.slot(key) = if rule.enabled { rule.weight.max(0) as f64 } else { 0.0 };
            }
        }
        weights
    }

    pub fn total(&self) -> f64 {
        self.availability + self.equipment + self.location + self.history + self.commercial
    }
}
