// src/handlers/settings.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        validation::not_blank,
    },
    config::AppState,
    db::field_config_repo::FieldConfigChanges,
    middleware::i18n::Locale,
    models::{
        field_config::{DriverField, DriverFieldConfig},
        ranking::{RankingRule, RuleKey},
    },
    services::settings_service::RuleUpdate,
};

// =============================================================================
//  REGRAS DE RANKING
// =============================================================================

// GET /api/settings/ranking-rules
#[utoipa::path(
    get,
    path = "/api/settings/ranking-rules",
    tag = "Configurações",
    responses(
        (status = 200, description = "Pesos de cada fator da nota", body = Vec<RankingRule>)
    )
)]
pub async fn list_ranking_rules(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let rules = app_state
        .settings_service
        .list_rules(&app_state.db_pool)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(rules)))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RuleUpdatePayload {
    #[schema(example = "location")]
    pub rule_key: String,

    #[validate(range(min = 0, max = 100, message = "O peso deve estar entre 0 e 100."))]
    #[schema(example = 20)]
    pub weight: i32,

    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

fn to_rule_updates(payload: Vec<RuleUpdatePayload>) -> Result<Vec<RuleUpdate>, AppError> {
    payload
        .into_iter()
        .map(|item| {
            item.validate()?;
            let key = RuleKey::parse(item.rule_key.trim()).ok_or_else(|| {
                AppError::InvalidInput(format!("Regra desconhecida: '{}'", item.rule_key))
            })?;
            Ok(RuleUpdate { key, weight: item.weight, enabled: item.enabled })
        })
        .collect()
}

// PUT /api/settings/ranking-rules
#[utoipa::path(
    put,
    path = "/api/settings/ranking-rules",
    tag = "Configurações",
    request_body = Vec<RuleUpdatePayload>,
    responses(
        (status = 200, description = "Regras atualizadas", body = Vec<RankingRule>),
        (status = 400, description = "Regra desconhecida ou peso fora do intervalo")
    )
)]
pub async fn update_ranking_rules(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<Vec<RuleUpdatePayload>>,
) -> Result<impl IntoResponse, ApiError> {
    let updates = to_rule_updates(payload).map_err(|e| e.to_api_error(&locale))?;

    let rules = app_state
        .settings_service
        .update_rules(&app_state.db_pool, &updates)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(rules)))
}

// =============================================================================
//  CAMPOS DO CADASTRO DE MOTORISTAS
// =============================================================================

// GET /api/settings/driver-fields
#[utoipa::path(
    get,
    path = "/api/settings/driver-fields",
    tag = "Configurações",
    responses(
        (status = 200, description = "Configuração dos campos, por posição", body = Vec<DriverFieldConfig>)
    )
)]
pub async fn list_driver_fields(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let configs = app_state
        .settings_service
        .list_fields(&app_state.db_pool)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(configs)))
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFieldPayload {
    #[validate(custom(function = "not_blank", message = "O rótulo não pode ficar vazio."))]
    #[schema(example = "Placa do cavalo")]
    pub label: Option<String>,
    pub visible_in_card: Option<bool>,
    pub visible_in_table: Option<bool>,
    pub position: Option<i32>,
}

impl UpdateFieldPayload {
    fn changes(&self) -> FieldConfigChanges<'_> {
        FieldConfigChanges {
            label: self.label.as_deref().map(str::trim),
            visible_in_card: self.visible_in_card,
            visible_in_table: self.visible_in_table,
            position: self.position,
        }
    }
}

// PUT /api/settings/driver-fields/{field_key}
#[utoipa::path(
    put,
    path = "/api/settings/driver-fields/{field_key}",
    tag = "Configurações",
    request_body = UpdateFieldPayload,
    params(("field_key" = String, Path, description = "Chave do campo (ex.: truck_plate)")),
    responses(
        (status = 200, description = "Campo atualizado", body = DriverFieldConfig),
        (status = 404, description = "Campo desconhecido")
    )
)]
pub async fn update_driver_field(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(field_key): Path<String>,
    Json(payload): Json<UpdateFieldPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let field = DriverField::parse(&field_key)
        .ok_or_else(|| AppError::ResourceNotFound(format!("Campo {}", field_key)).to_api_error(&locale))?;

    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let updated = app_state
        .settings_service
        .update_field(&app_state.db_pool, field, payload.changes())
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(updated)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(key: &str, weight: i32) -> RuleUpdatePayload {
        RuleUpdatePayload { rule_key: key.to_string(), weight, enabled: true }
    }

    #[test]
    fn known_rules_are_accepted() {
        let updates = to_rule_updates(vec![rule("location", 40), rule(" history ", 0)]).unwrap();
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0].key, RuleKey::Location);
        assert_eq!(updates[1].key, RuleKey::History);
    }

    #[test]
    fn unknown_rule_is_invalid_input() {
        let err = to_rule_updates(vec![rule("mood", 10)]).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn weight_out_of_range_fails_validation() {
        let err = to_rule_updates(vec![rule("location", 101)]).unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[test]
    fn empty_label_is_rejected() {
        let payload = UpdateFieldPayload { label: Some(String::new()), ..Default::default() };
        assert!(payload.validate().is_err());

        let spaces = UpdateFieldPayload { label: Some("   ".into()), ..Default::default() };
        assert!(spaces.validate().is_err());

        let padded = UpdateFieldPayload { label: Some("  Placa ".into()), ..Default::default() };
        assert!(padded.validate().is_ok());
        assert_eq!(padded.changes().label, Some("Placa"));

        let ok = UpdateFieldPayload { visible_in_card: Some(true), ..Default::default() };
        assert!(ok.validate().is_ok());
        assert_eq!(ok.changes().visible_in_card, Some(true));
    }
}
