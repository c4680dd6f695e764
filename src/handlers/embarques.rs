// src/handlers/embarques.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::{
        dashboard::Board,
        embarque::{Embarque, EmbarqueStatus, NewEmbarque},
        matching::VehicleMatch,
    },
};

// =============================================================================
//  1. CADASTRO
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmbarquePayload {
    #[validate(length(min = 1, message = "A origem é obrigatória."))]
    #[schema(example = "Campinas - SP")]
    pub origin: String,

    #[validate(length(min = 1, message = "O destino é obrigatório."))]
    #[schema(example = "Curitiba - PR")]
    pub destination: String,

    #[schema(example = "Carga refrigerada")]
    pub cargo_type: Option<String>,

    #[schema(example = "12500.00")]
    pub total_value: Option<Decimal>,

    pub pickup_window_start: Option<DateTime<Utc>>,
    pub pickup_window_end: Option<DateTime<Utc>>,
    pub delivery_window_start: Option<DateTime<Utc>>,
    pub delivery_window_end: Option<DateTime<Utc>>,

    pub email_content: Option<String>,

    #[serde(default)]
    pub needs_manual_review: bool,
}

impl CreateEmbarquePayload {
    fn into_new(self) -> Result<NewEmbarque, AppError> {
        let origin = self.origin.trim().to_string();
        let destination = self.destination.trim().to_string();
        if origin.is_empty() || destination.is_empty() {
            return Err(AppError::InvalidInput("Origem e destino não podem ser vazios".into()));
        }

        check_window("pickupWindow", self.pickup_window_start, self.pickup_window_end)?;
        check_window("deliveryWindow", self.delivery_window_start, self.delivery_window_end)?;

        if self.total_value.is_some_and(|v| v.is_sign_negative()) {
            return Err(AppError::InvalidInput("totalValue não pode ser negativo".into()));
        }

        Ok(NewEmbarque {
            origin,
            destination,
            cargo_type: self.cargo_type.filter(|c| !c.trim().is_empty()),
            total_value: self.total_value,
            pickup_window_start: self.pickup_window_start,
            pickup_window_end: self.pickup_window_end,
            delivery_window_start: self.delivery_window_start,
            delivery_window_end: self.delivery_window_end,
            email_content: self.email_content,
            needs_manual_review: self.needs_manual_review,
        })
    }
}

fn check_window(
    name: &str,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Result<(), AppError> {
    match (start, end) {
        (Some(s), Some(e)) if e < s => Err(AppError::InvalidInput(format!(
            "{}: o fim não pode ser anterior ao início",
            name
        ))),
        _ => Ok(()),
    }
}

// POST /api/embarques
#[utoipa::path(
    post,
    path = "/api/embarques",
    tag = "Embarques",
    request_body = CreateEmbarquePayload,
    responses(
        (status = 201, description = "Embarque criado na coluna 'new'", body = Embarque),
        (status = 400, description = "Dados inválidos")
    )
)]
pub async fn create_embarque(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<CreateEmbarquePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let input = payload.into_new().map_err(|e| e.to_api_error(&locale))?;

    let embarque = app_state
        .embarque_service
        .create(&app_state.db_pool, input)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(embarque)))
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListEmbarquesQuery {
    pub status: Option<EmbarqueStatus>,
}

// GET /api/embarques
#[utoipa::path(
    get,
    path = "/api/embarques",
    tag = "Embarques",
    params(ListEmbarquesQuery),
    responses(
        (status = 200, description = "Embarques, mais recentes primeiro", body = Vec<Embarque>)
    )
)]
pub async fn list_embarques(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<ListEmbarquesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let embarques = app_state
        .embarque_service
        .list(&app_state.db_pool, query.status)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(embarques)))
}

// GET /api/embarques/{embarque_id}
#[utoipa::path(
    get,
    path = "/api/embarques/{embarque_id}",
    tag = "Embarques",
    params(("embarque_id" = Uuid, Path, description = "ID do Embarque")),
    responses(
        (status = 200, description = "Embarque", body = Embarque),
        (status = 404, description = "Embarque não encontrado")
    )
)]
pub async fn get_embarque(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(embarque_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let embarque = app_state
        .embarque_service
        .get(&app_state.db_pool, embarque_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(embarque)))
}

// =============================================================================
//  2. QUADRO
// =============================================================================

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct BoardQuery {
    /// Inclui as colunas de entregues e cancelados.
    #[serde(default)]
    pub include_archived: bool,
}

// GET /api/embarques/board
#[utoipa::path(
    get,
    path = "/api/embarques/board",
    tag = "Embarques",
    params(BoardQuery),
    responses(
        (status = 200, description = "Colunas do quadro por status", body = Board)
    )
)]
pub async fn get_board(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<BoardQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let board = app_state
        .embarque_service
        .board(&app_state.db_pool, query.include_archived)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(board)))
}

// =============================================================================
//  3. TRANSIÇÃO E ATRIBUIÇÃO
// =============================================================================

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransitionEmbarquePayload {
    #[schema(example = "sent")]
    pub status: EmbarqueStatus,
}

// POST /api/embarques/{embarque_id}/transition
#[utoipa::path(
    post,
    path = "/api/embarques/{embarque_id}/transition",
    tag = "Embarques",
    request_body = TransitionEmbarquePayload,
    params(("embarque_id" = Uuid, Path, description = "ID do Embarque")),
    responses(
        (status = 200, description = "Embarque movido", body = Embarque),
        (status = 404, description = "Embarque não encontrado"),
        (status = 422, description = "Transição inválida")
    )
)]
pub async fn transition_embarque(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(embarque_id): Path<Uuid>,
    Json(payload): Json<TransitionEmbarquePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let embarque = app_state
        .embarque_service
        .transition(&app_state.db_pool, embarque_id, payload.status)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(embarque)))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignDriverPayload {
    pub driver_id: Uuid,
}

// PUT /api/embarques/{embarque_id}/driver
#[utoipa::path(
    put,
    path = "/api/embarques/{embarque_id}/driver",
    tag = "Embarques",
    request_body = AssignDriverPayload,
    params(("embarque_id" = Uuid, Path, description = "ID do Embarque")),
    responses(
        (status = 200, description = "Motorista atribuído", body = Embarque),
        (status = 404, description = "Embarque ou motorista não encontrado"),
        (status = 409, description = "Embarque arquivado")
    )
)]
pub async fn assign_driver(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(embarque_id): Path<Uuid>,
    Json(payload): Json<AssignDriverPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let embarque = app_state
        .embarque_service
        .assign_driver(&app_state.db_pool, embarque_id, payload.driver_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(embarque)))
}

// =============================================================================
//  4. MATCHING DO EMBARQUE
// =============================================================================

// POST /api/embarques/{embarque_id}/matches
#[utoipa::path(
    post,
    path = "/api/embarques/{embarque_id}/matches",
    tag = "Matching",
    params(("embarque_id" = Uuid, Path, description = "ID do Embarque")),
    responses(
        (status = 201, description = "Sugestões recalculadas, melhor nota primeiro", body = Vec<VehicleMatch>),
        (status = 409, description = "Embarque arquivado ou já atribuído")
    )
)]
pub async fn compute_matches(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(embarque_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let matches = app_state
        .matching_service
        .compute_suggestions(&app_state.db_pool, embarque_id, Utc::now())
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(matches)))
}

// GET /api/embarques/{embarque_id}/matches
#[utoipa::path(
    get,
    path = "/api/embarques/{embarque_id}/matches",
    tag = "Matching",
    params(("embarque_id" = Uuid, Path, description = "ID do Embarque")),
    responses(
        (status = 200, description = "Matches gravados do embarque", body = Vec<VehicleMatch>)
    )
)]
pub async fn list_matches(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(embarque_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let matches = app_state
        .matching_service
        .list_for_embarque(&app_state.db_pool, embarque_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(matches)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn payload(origin: &str, destination: &str) -> CreateEmbarquePayload {
        CreateEmbarquePayload {
            origin: origin.into(),
            destination: destination.into(),
            cargo_type: Some("  ".into()),
            total_value: None,
            pickup_window_start: None,
            pickup_window_end: None,
            delivery_window_start: None,
            delivery_window_end: None,
            email_content: None,
            needs_manual_review: false,
        }
    }

    #[test]
    fn trims_and_drops_blank_cargo() {
        let new = payload("  Campinas - SP ", "Curitiba - PR").into_new().unwrap();
        assert_eq!(new.origin, "Campinas - SP");
        assert_eq!(new.cargo_type, None);
    }

    #[test]
    fn whitespace_origin_is_rejected() {
        assert!(payload("   ", "Curitiba - PR").into_new().is_err());
    }

    #[test]
    fn inverted_window_is_rejected() {
        let now = Utc::now();
        let mut p = payload("Campinas - SP", "Curitiba - PR");
        p.pickup_window_start = Some(now);
        p.pickup_window_end = Some(now - Duration::hours(1));
        assert!(matches!(p.into_new(), Err(AppError::InvalidInput(_))));
    }
}
