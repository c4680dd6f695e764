// src/models/embarque.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "embarque_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EmbarqueStatus {
    New,
    NeedsAttention,
    Sent,
    WaitingConfirmation,
    Confirmed,
    InTransit,
    Delivered,
    Cancelled,
}

impl EmbarqueStatus {
    /// Ordem das colunas no quadro.
    pub const ALL: [EmbarqueStatus; 8] = [
        EmbarqueStatus::New,
        EmbarqueStatus::NeedsAttention,
        EmbarqueStatus::Sent,
        EmbarqueStatus::WaitingConfirmation,
        EmbarqueStatus::Confirmed,
        EmbarqueStatus::InTransit,
        EmbarqueStatus::Delivered,
        EmbarqueStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmbarqueStatus::New => "new",
            EmbarqueStatus::NeedsAttention => "needs_attention",
            EmbarqueStatus::Sent => "sent",
            EmbarqueStatus::WaitingConfirmation => "waiting_confirmation",
            EmbarqueStatus::Confirmed => "confirmed",
            EmbarqueStatus::InTransit => "in_transit",
            EmbarqueStatus::Delivered => "delivered",
            EmbarqueStatus::Cancelled => "cancelled",
        }
    }

    // Entregue e cancelado saem do quadro ativo
    pub fn is_archived(&self) -> bool {
        matches!(self, EmbarqueStatus::Delivered | EmbarqueStatus::Cancelled)
    }

    /// Status a partir do qual aceitar uma oferta confirma o embarque.
    pub fn is_pre_confirmation(&self) -> bool {
        matches!(
            self,
            EmbarqueStatus::New
                | EmbarqueStatus::NeedsAttention
                | EmbarqueStatus::Sent
                | EmbarqueStatus::WaitingConfirmation
        )
    }

    pub fn can_transition_to(&self, next: EmbarqueStatus) -> bool {
        use EmbarqueStatus::*;
        match self {
            New => matches!(next, NeedsAttention | Sent | Cancelled),
            NeedsAttention => matches!(next, New | Sent | Cancelled),
            Sent => matches!(next, WaitingConfirmation | NeedsAttention | Cancelled),
            WaitingConfirmation => matches!(next, Confirmed | NeedsAttention | Cancelled),
            Confirmed => matches!(next, InTransit | NeedsAttention | Cancelled),
            InTransit => matches!(next, Delivered),
            Delivered | Cancelled => false,
        }
    }
}

// --- Structs ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Embarque {
    pub id: Uuid,
    #[schema(example = "Campinas - SP")]
    pub origin: String,
    #[schema(example = "Curitiba - PR")]
    pub destination: String,
    pub status: EmbarqueStatus,
    #[schema(example = "Carga refrigerada")]
    pub cargo_type: Option<String>,
    #[schema(example = "12500.00")]
    pub total_value: Option<Decimal>,
    pub pickup_window_start: Option<DateTime<Utc>>,
    pub pickup_window_end: Option<DateTime<Utc>>,
    pub delivery_window_start: Option<DateTime<Utc>>,
    pub delivery_window_end: Option<DateTime<Utc>>,
    pub driver_id: Option<Uuid>,
    pub email_content: Option<String>,
    pub needs_manual_review: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Dados já validados para inserir um embarque.
#[derive(Debug, Clone)]
pub struct NewEmbarque {
    pub origin: String,
    pub destination: String,
    pub cargo_type: Option<String>,
    pub total_value: Option<Decimal>,
    pub pickup_window_start: Option<DateTime<Utc>>,
    pub pickup_window_end: Option<DateTime<Utc>>,
    pub delivery_window_start: Option<DateTime<Utc>>,
    pub delivery_window_end: Option<DateTime<Utc>>,
    pub email_content: Option<String>,
    pub needs_manual_review: bool,
}

#[cfg(test)]
mod tests {
    use super::EmbarqueStatus::{self, *};
    use rstest::rstest;

    #[rstest]
    #[case(New, Sent, true)]
    #[case(New, Confirmed, false)]
    #[case(NeedsAttention, New, true)]
    #[case(WaitingConfirmation, Confirmed, true)]
    #[case(Confirmed, InTransit, true)]
    #[case(InTransit, Delivered, true)]
    #[case(InTransit, Cancelled, false)]
    #[case(Delivered, New, false)]
    #[case(Cancelled, New, false)]
    #[case(Sent, Sent, false)]
    fn transitions(#[case] from: EmbarqueStatus, #[case] to: EmbarqueStatus, #[case] allowed: bool) {
        assert_eq!(from.can_transition_to(to), allowed);
    }

    #[test]
    fn archived_statuses_have_no_exit() {
        for from in [Delivered, Cancelled] {
            assert!(from.is_archived());
            assert!(EmbarqueStatus::ALL.iter().all(|to| !from.can_transition_to(*to)));
        }
    }

    #[test]
    fn serializes_as_snake_case() {
        let json = serde_json::to_string(&WaitingConfirmation).unwrap();
        assert_eq!(json, "\"waiting_confirmation\"");
        assert_eq!(WaitingConfirmation.as_str(), "waiting_confirmation");
    }
}
