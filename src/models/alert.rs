// src/models/alert.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// A ordem das variantes é a ordem de gravidade (Ord derivado)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "alert_severity", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OperationalAlert {
    pub id: Uuid,
    pub severity: AlertSeverity,
    #[schema(example = "Embarque sem motorista")]
    pub title: String,
    pub description: String,
    pub resolved: bool,
    pub resolved_at: Option<DateTime<Utc>>,
    pub embarque_id: Option<Uuid>,
    #[schema(example = "pickup_without_driver")]
    pub kind: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Alerta ainda não gravado (manual ou detectado pelo monitor).
#[derive(Debug, Clone, PartialEq)]
pub struct NewAlert {
    pub severity: AlertSeverity,
    pub title: String,
    pub description: String,
    pub embarque_id: Option<Uuid>,
    pub kind: Option<String>,
}
