// src/handlers/alerts.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        validation::not_blank,
    },
    config::AppState,
    middleware::i18n::Locale,
    models::alert::{AlertSeverity, NewAlert, OperationalAlert},
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListAlertsQuery {
    /// Inclui os alertas já resolvidos.
    #[serde(default)]
    pub include_resolved: bool,
}

// GET /api/alerts
#[utoipa::path(
    get,
    path = "/api/alerts",
    tag = "Alertas",
    params(ListAlertsQuery),
    responses(
        (status = 200, description = "Alertas por gravidade, mais recentes primeiro", body = Vec<OperationalAlert>)
    )
)]
pub async fn list_alerts(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<ListAlertsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let alerts = app_state
        .alert_service
        .list(&app_state.db_pool, query.include_resolved)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(alerts)))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAlertPayload {
    pub severity: AlertSeverity,

    #[validate(custom(function = "not_blank", message = "O título é obrigatório."))]
    #[schema(example = "Caminhão parado na balança")]
    pub title: String,

    #[serde(default)]
    pub description: String,

    pub embarque_id: Option<Uuid>,
}

// POST /api/alerts
#[utoipa::path(
    post,
    path = "/api/alerts",
    tag = "Alertas",
    request_body = CreateAlertPayload,
    responses(
        (status = 201, description = "Alerta registrado", body = OperationalAlert),
        (status = 400, description = "Dados inválidos ou embarque inexistente")
    )
)]
pub async fn create_alert(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<CreateAlertPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    // Alertas manuais não têm `kind`: nunca colidem com os do monitor
    let input = NewAlert {
        severity: payload.severity,
        title: payload.title.trim().to_string(),
        description: payload.description.trim().to_string(),
        embarque_id: payload.embarque_id,
        kind: None,
    };

    let alert = app_state
        .alert_service
        .create(&app_state.db_pool, input)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(alert)))
}

// POST /api/alerts/{alert_id}/resolve
#[utoipa::path(
    post,
    path = "/api/alerts/{alert_id}/resolve",
    tag = "Alertas",
    params(("alert_id" = Uuid, Path, description = "ID do Alerta")),
    responses(
        (status = 200, description = "Alerta resolvido", body = OperationalAlert),
        (status = 404, description = "Alerta não encontrado"),
        (status = 409, description = "Alerta já resolvido")
    )
)]
pub async fn resolve_alert(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(alert_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let alert = app_state
        .alert_service
        .resolve(&app_state.db_pool, alert_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(alert)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(title: &str) -> CreateAlertPayload {
        CreateAlertPayload {
            severity: AlertSeverity::High,
            title: title.to_string(),
            description: String::new(),
            embarque_id: None,
        }
    }

    #[test]
    fn blank_title_is_rejected() {
        assert!(payload("   ").validate().is_err());
        assert!(payload("Caminhão parado").validate().is_ok());
    }
}
