use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::middleware::i18n::Locale;

// Nosso tipo de erro, agora com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Entrada inválida: {0}")]
    InvalidInput(String),

    #[error("Recurso não encontrado: {0}")]
    ResourceNotFound(String),

    #[error("Transição inválida de {from} para {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Embarque sem motorista")]
    DriverRequired,

    #[error("Conflito: {0}")]
    Conflict(String),

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

/// Resposta de erro já pronta para o cliente (status + mensagem traduzida).
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

impl AppError {
    pub fn to_api_error(&self, locale: &Locale) -> ApiError {
        let en = locale.is_english();
        let pick = |pt: &str, en_msg: &str| if en { en_msg.to_string() } else { pt.to_string() };

        match self {
            AppError::ValidationError(errors) => {
                // Retorna todos os detalhes da validação, campo a campo.
                let mut details = serde_json::Map::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<Value> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                                .into()
                        })
                        .collect();
                    details.insert(field.to_string(), Value::Array(messages));
                }
                ApiError {
                    status: StatusCode::BAD_REQUEST,
                    error: pick("Um ou mais campos são inválidos.", "One or more fields are invalid."),
                    details: Some(Value::Object(details)),
                }
            }
            AppError::InvalidInput(msg) => ApiError {
                status: StatusCode::BAD_REQUEST,
                error: pick("Entrada inválida.", "Invalid input."),
                details: Some(json!(msg)),
            },
            AppError::ResourceNotFound(what) => ApiError {
                status: StatusCode::NOT_FOUND,
                error: pick("Recurso não encontrado.", "Resource not found."),
                details: Some(json!(what)),
            },
            AppError::InvalidTransition { from, to } => ApiError {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: if en {
                    format!("Cannot move from '{}' to '{}'.", from, to)
                } else {
                    format!("Não é possível mover de '{}' para '{}'.", from, to)
                },
                details: None,
            },
            AppError::DriverRequired => ApiError {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: pick(
                    "O embarque precisa de um motorista atribuído.",
                    "The shipment needs an assigned driver.",
                ),
                details: None,
            },
            AppError::Conflict(msg) => ApiError {
                status: StatusCode::CONFLICT,
                error: pick("Conflito com o estado atual.", "Conflict with the current state."),
                details: Some(json!(msg)),
            },
            AppError::DatabaseError(sqlx::Error::RowNotFound) => ApiError {
                status: StatusCode::NOT_FOUND,
                error: pick("Recurso não encontrado.", "Resource not found."),
                details: None,
            },
            AppError::DatabaseError(e) if is_unique_violation(e) => ApiError {
                status: StatusCode::CONFLICT,
                error: pick("Registro duplicado.", "Duplicate record."),
                details: None,
            },
            AppError::DatabaseError(e) if is_concurrency_failure(e) => ApiError {
                status: StatusCode::CONFLICT,
                error: pick(
                    "Outra operação alterou o registro ao mesmo tempo; tente de novo.",
                    "Another operation changed the record concurrently; try again.",
                ),
                details: None,
            },
            AppError::DatabaseError(e) if is_foreign_key_violation(e) => ApiError {
                status: StatusCode::BAD_REQUEST,
                error: pick("Referência inexistente.", "Referenced record does not exist."),
                details: None,
            },

            // Todos os outros erros viram 500; o detalhe fica só no log.
            e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                ApiError {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    error: pick("Ocorreu um erro inesperado.", "An unexpected error occurred."),
                    details: None,
                }
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale::default()).into_response()
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error().map(|d| d.is_unique_violation()).unwrap_or(false)
}

// 40P01 deadlock_detected, 40001 serialization_failure
fn is_concurrency_failure(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .and_then(|d| d.code())
        .is_some_and(|code| code == "40P01" || code == "40001")
}

fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    e.as_database_error().map(|d| d.is_foreign_key_violation()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Payload {
        #[validate(length(min = 1, message = "obrigatório"))]
        origin: String,
    }

    #[test]
    fn validation_errors_carry_field_details() {
        let errors = Payload { origin: String::new() }.validate().unwrap_err();
        let api = AppError::from(errors).to_api_error(&Locale::default());
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.details.unwrap()["origin"][0], "obrigatório");
    }

    #[test]
    fn messages_follow_locale() {
        let err = AppError::DriverRequired;
        let pt = err.to_api_error(&Locale("pt".into()));
        let en = err.to_api_error(&Locale("en".into()));
        assert_eq!(pt.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(pt.error.contains("motorista"));
        assert!(en.error.contains("driver"));
    }

    #[test]
    fn row_not_found_is_404() {
        let api = AppError::from(sqlx::Error::RowNotFound).to_api_error(&Locale::default());
        assert_eq!(api.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn internal_errors_hide_details() {
        let api = AppError::from(anyhow::anyhow!("pool exhausted")).to_api_error(&Locale::default());
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(api.details.is_none());
        assert!(!api.error.contains("pool"));
    }
}
