// src/handlers/matching.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::i18n::Locale,
    models::matching::{GlobalMatch, VehicleMatch},
};

// GET /api/matching/global
#[utoipa::path(
    get,
    path = "/api/matching/global",
    tag = "Matching",
    responses(
        (status = 200, description = "Melhor motorista disponível por embarque sem motorista", body = Vec<GlobalMatch>)
    )
)]
pub async fn global_matches(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let matches = app_state
        .matching_service
        .global_matches(&app_state.db_pool, Utc::now())
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(matches)))
}

// POST /api/matches/{match_id}/offer
#[utoipa::path(
    post,
    path = "/api/matches/{match_id}/offer",
    tag = "Matching",
    params(("match_id" = Uuid, Path, description = "ID do Match")),
    responses(
        (status = 200, description = "Oferta enviada ao motorista", body = VehicleMatch),
        (status = 422, description = "Transição inválida")
    )
)]
pub async fn offer_match(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(match_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let updated = app_state
        .matching_service
        .offer(&app_state.db_pool, match_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(updated)))
}

// POST /api/matches/{match_id}/accept
#[utoipa::path(
    post,
    path = "/api/matches/{match_id}/accept",
    tag = "Matching",
    params(("match_id" = Uuid, Path, description = "ID do Match")),
    responses(
        (status = 200, description = "Oferta aceita; motorista atribuído ao embarque", body = VehicleMatch),
        (status = 409, description = "Embarque arquivado ou com outro motorista"),
        (status = 422, description = "Transição inválida")
    )
)]
pub async fn accept_match(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(match_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let updated = app_state
        .matching_service
        .accept(&app_state.db_pool, match_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(updated)))
}

// POST /api/matches/{match_id}/reject
#[utoipa::path(
    post,
    path = "/api/matches/{match_id}/reject",
    tag = "Matching",
    params(("match_id" = Uuid, Path, description = "ID do Match")),
    responses(
        (status = 200, description = "Match recusado", body = VehicleMatch),
        (status = 422, description = "Transição inválida")
    )
)]
pub async fn reject_match(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(match_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let updated = app_state
        .matching_service
        .reject(&app_state.db_pool, match_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(updated)))
}
