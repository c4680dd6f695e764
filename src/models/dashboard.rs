// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{alert::AlertSeverity, embarque::EmbarqueStatus};

// 1. Contadores do topo do painel
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub embarques_by_status: Vec<StatusCount>,
    pub unresolved_alerts: Vec<SeverityCount>,
    pub available_drivers: i64,
    pub busy_drivers: i64,
    pub open_matches: i64, // sugeridos + ofertados
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub status: EmbarqueStatus,
    pub total: i64,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SeverityCount {
    pub severity: AlertSeverity,
    pub total: i64,
}

// 2. Quadro de embarques (colunas por status)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BoardCard {
    pub embarque_id: Uuid,
    pub origin: String,
    pub destination: String,
    pub cargo_type: Option<String>,
    pub total_value: Option<Decimal>,
    pub pickup_window_start: Option<chrono::DateTime<chrono::Utc>>,
    pub needs_manual_review: bool,
    pub driver_id: Option<Uuid>,
    pub driver_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BoardColumn {
    pub status: EmbarqueStatus,
    pub count: usize,
    pub total_value: Decimal,
    pub cards: Vec<BoardCard>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub columns: Vec<BoardColumn>,
}
