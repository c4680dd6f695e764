// src/handlers/drivers.rs

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    common::{
        csv::Delimiter,
        error::{ApiError, AppError},
        validation::min_trimmed_chars,
    },
    config::AppState,
    middleware::i18n::Locale,
    models::{
        driver::{AvailabilityStatus, Driver, DriverFilter, NewDriver},
        field_config::{DriverView, FieldView},
    },
};

fn name_with_two_chars(value: &str) -> Result<(), ValidationError> {
    min_trimmed_chars(value, 2)
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

// =============================================================================
//  CADASTRO
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDriverPayload {
    #[validate(custom(function = "name_with_two_chars", message = "O nome deve ter no mínimo 2 caracteres."))]
    #[schema(example = "João da Silva")]
    pub name: String,

    #[schema(example = "(19) 99999-0000")]
    pub phone: Option<String>,

    #[validate(length(min = 7, max = 8, message = "Placa inválida."))]
    #[schema(example = "ABC1D23")]
    pub truck_plate: Option<String>,

    #[schema(example = "Baú refrigerado")]
    pub vehicle_type: Option<String>,

    pub availability_status: Option<AvailabilityStatus>,

    #[schema(example = "Campinas - SP")]
    pub current_location: Option<String>,
}

// POST /api/drivers
#[utoipa::path(
    post,
    path = "/api/drivers",
    tag = "Motoristas",
    request_body = CreateDriverPayload,
    responses(
        (status = 201, description = "Motorista cadastrado", body = Driver),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "Placa já cadastrada")
    )
)]
pub async fn create_driver(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<CreateDriverPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let input = NewDriver {
        name: payload.name.trim().to_string(),
        phone: blank_to_none(payload.phone),
        truck_plate: blank_to_none(payload.truck_plate).map(|p| p.to_uppercase()),
        vehicle_type: blank_to_none(payload.vehicle_type),
        availability_status: payload.availability_status.unwrap_or(AvailabilityStatus::Available),
        current_location: blank_to_none(payload.current_location),
    };

    let driver = app_state
        .driver_service
        .create(&app_state.db_pool, input)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(driver)))
}

// GET /api/drivers
#[utoipa::path(
    get,
    path = "/api/drivers",
    tag = "Motoristas",
    params(DriverFilter),
    responses(
        (status = 200, description = "Motoristas filtrados, por nome", body = Vec<Driver>)
    )
)]
pub async fn list_drivers(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(filter): Query<DriverFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let drivers = app_state
        .driver_service
        .list(&app_state.db_pool, &filter)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(drivers)))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAvailabilityPayload {
    pub availability_status: AvailabilityStatus,
    #[schema(example = "Jundiaí - SP")]
    pub current_location: Option<String>,
}

// PUT /api/drivers/{driver_id}/availability
#[utoipa::path(
    put,
    path = "/api/drivers/{driver_id}/availability",
    tag = "Motoristas",
    request_body = UpdateAvailabilityPayload,
    params(("driver_id" = Uuid, Path, description = "ID do Motorista")),
    responses(
        (status = 200, description = "Disponibilidade atualizada", body = Driver),
        (status = 404, description = "Motorista não encontrado")
    )
)]
pub async fn update_availability(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(driver_id): Path<Uuid>,
    Json(payload): Json<UpdateAvailabilityPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let location = blank_to_none(payload.current_location);

    let driver = app_state
        .driver_service
        .update_availability(
            &app_state.db_pool,
            driver_id,
            payload.availability_status,
            location.as_deref(),
        )
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(driver)))
}

// =============================================================================
//  VISÕES E EXPORTAÇÃO
// =============================================================================

async fn driver_views(
    app_state: &AppState,
    locale: &Locale,
    view: FieldView,
    filter: &DriverFilter,
) -> Result<Vec<DriverView>, ApiError> {
    app_state
        .driver_service
        .views(&app_state.db_pool, view, filter)
        .await
        .map_err(|app_err| app_err.to_api_error(locale))
}

// GET /api/drivers/cards
#[utoipa::path(
    get,
    path = "/api/drivers/cards",
    tag = "Motoristas",
    params(DriverFilter),
    responses(
        (status = 200, description = "Campos visíveis no cartão de cada motorista", body = Vec<DriverView>)
    )
)]
pub async fn driver_cards(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(filter): Query<DriverFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let views = driver_views(&app_state, &locale, FieldView::Card, &filter).await?;
    Ok((StatusCode::OK, Json(views)))
}

// GET /api/drivers/table
#[utoipa::path(
    get,
    path = "/api/drivers/table",
    tag = "Motoristas",
    params(DriverFilter),
    responses(
        (status = 200, description = "Campos visíveis na tabela de cada motorista", body = Vec<DriverView>)
    )
)]
pub async fn driver_table(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(filter): Query<DriverFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let views = driver_views(&app_state, &locale, FieldView::Table, &filter).await?;
    Ok((StatusCode::OK, Json(views)))
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ExportQuery {
    pub availability: Option<AvailabilityStatus>,
    pub vehicle_type: Option<String>,
    pub search: Option<String>,
    /// `semicolon` (padrão) ou `comma`.
    #[param(value_type = Option<String>)]
    pub delimiter: Option<Delimiter>,
}

// GET /api/drivers/export
#[utoipa::path(
    get,
    path = "/api/drivers/export",
    tag = "Motoristas",
    params(ExportQuery),
    responses(
        (status = 200, description = "CSV com as colunas visíveis na tabela", content_type = "text/csv", body = String)
    )
)]
pub async fn export_drivers(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<ExportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = DriverFilter {
        availability: query.availability,
        vehicle_type: query.vehicle_type,
        search: query.search,
    };

    let csv = app_state
        .driver_service
        .export(&app_state.db_pool, &filter, query.delimiter.unwrap_or_default())
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"motoristas.csv\""),
        ],
        csv,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(name: &str) -> CreateDriverPayload {
        CreateDriverPayload {
            name: name.to_string(),
            phone: None,
            truck_plate: None,
            vehicle_type: None,
            availability_status: None,
            current_location: None,
        }
    }

    #[test]
    fn name_is_checked_after_trimming() {
        assert!(payload("   ").validate().is_err());
        assert!(payload(" A ").validate().is_err());
        assert!(payload("Ana").validate().is_ok());
    }

    #[test]
    fn blank_optionals_become_none() {
        assert_eq!(blank_to_none(Some("  ".into())), None);
        assert_eq!(blank_to_none(Some(" SP ".into())), Some("SP".to_string()));
    }
}
