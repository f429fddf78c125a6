// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::{common::i18n::I18nStore, middleware::i18n::Locale};

// Nosso tipo de erro interno. Toda camada (cliente, serviço, handler) fala AppError;
// só na borda HTTP ele vira ApiError, já traduzido.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Sessão expirada ou token ausente")]
    SessionExpired,

    #[error("Papel sem acesso a esta área")]
    Forbidden,

    #[error("Ação '{action}' não permitida no estado '{state}'")]
    ActionNotAllowed { action: String, state: String },

    #[error("{resource} '{id}' não encontrado")]
    NotFound { resource: &'static str, id: String },

    // A solicitação foi aceita, mas a cotização não foi gravada.
    #[error("Solicitação {id} aceita sem cotização: {reason}")]
    PartialQuote { id: String, reason: String },

    #[error("As senhas não coincidem")]
    PasswordMismatch,

    #[error("Confirmação obrigatória")]
    ConfirmationRequired,

    #[error("Nenhum campo para atualizar")]
    NothingToUpdate,

    #[error("Tamanho de página inválido: {0}")]
    InvalidPageSize(usize),

    #[error("Backend respondeu {status}")]
    Backend {
        status: u16,
        message: Option<String>,
        // Erros por campo devolvidos pelo backend ({"errors": {...}})
        details: Option<Value>,
    },

    #[error("Backend indisponível: {0}")]
    BackendUnavailable(String),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return AppError::InternalServerError(anyhow::anyhow!("Resposta do backend ilegível: {}", err));
        }
        AppError::BackendUnavailable(err.to_string())
    }
}

impl AppError {
    pub fn not_found(resource: &'static str, id: &str) -> Self {
        AppError::NotFound { resource, id: id.to_string() }
    }

    /// Converte o erro interno na resposta HTTP traduzida para o idioma do usuário.
    pub fn to_api_error(&self, locale: &Locale, store: &I18nStore) -> ApiError {
        let lang = locale.0.as_str();
        let simple = |status: StatusCode, key: &str| ApiError {
            status,
            error: store.translate(lang, key),
            details: None,
        };

        match self {
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| match &e.message {
                            Some(m) => m.to_string(),
                            None => e.code.to_string(),
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                ApiError {
                    status: StatusCode::BAD_REQUEST,
                    error: store.translate(lang, "error.validation"),
                    details: Some(json!(details)),
                }
            }
            AppError::SessionExpired | AppError::JwtError(_) => {
                simple(StatusCode::UNAUTHORIZED, "error.session_expired")
            }
            AppError::Forbidden => simple(StatusCode::FORBIDDEN, "error.forbidden"),
            AppError::ActionNotAllowed { action, state } => ApiError {
                status: StatusCode::CONFLICT,
                error: store.format(lang, "error.action_not_allowed", &[("action", action.as_str()), ("state", state.as_str())]),
                details: None,
            },
            AppError::NotFound { resource, id } => ApiError {
                status: StatusCode::NOT_FOUND,
                error: store.format(lang, "error.not_found", &[("resource", *resource), ("id", id.as_str())]),
                details: None,
            },
            AppError::PartialQuote { id, .. } => ApiError {
                status: StatusCode::BAD_GATEWAY,
                error: store.format(lang, "error.partial_quote", &[("id", id.as_str())]),
                details: None,
            },
            AppError::PasswordMismatch => simple(StatusCode::BAD_REQUEST, "error.password_mismatch"),
            AppError::ConfirmationRequired => simple(StatusCode::BAD_REQUEST, "error.confirmation_required"),
            AppError::NothingToUpdate => simple(StatusCode::BAD_REQUEST, "error.nothing_to_update"),
            AppError::InvalidPageSize(size) => {
                let size = size.to_string();
                ApiError {
                    status: StatusCode::BAD_REQUEST,
                    error: store.format(lang, "error.invalid_page_size", &[("size", size.as_str())]),
                    details: None,
                }
            }
            AppError::Backend { status, message, details } => {
                let status = *status;
                if status == 401 {
                    return simple(StatusCode::UNAUTHORIZED, "error.session_expired");
                }
                // 4xx do backend são repassados; 5xx viram 502.
                let http_status = match StatusCode::from_u16(status) {
                    Ok(s) if s.is_client_error() => s,
                    _ => StatusCode::BAD_GATEWAY,
                };
                ApiError {
                    status: http_status,
                    error: message
                        .clone()
                        .unwrap_or_else(|| store.translate(lang, "error.backend")),
                    details: details.clone(),
                }
            }
            AppError::BackendUnavailable(reason) => {
                tracing::error!("🔥 Backend inacessível: {}", reason);
                simple(StatusCode::SERVICE_UNAVAILABLE, "error.backend_unavailable")
            }
            AppError::InternalServerError(inner) => {
                tracing::error!("Erro Interno do Servidor: {:?}", inner);
                simple(StatusCode::INTERNAL_SERVER_ERROR, "error.internal")
            }
        }
    }
}

// O erro já traduzido, pronto para a resposta.
#[derive(Debug, Clone)]
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
