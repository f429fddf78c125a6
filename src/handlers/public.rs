// src/handlers/public.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    handlers::ActionResponse,
    middleware::i18n::Locale,
    models::account::{PasswordResetPayload, RegisterPayload},
    services::flash::{FlashKind, FlashMessage},
};

// POST /api/public/register
#[utoipa::path(
    post,
    path = "/api/public/register",
    tag = "Public",
    request_body = RegisterPayload,
    responses(
        (status = 201, description = "Cadastro enviado; aguarda aprovação do admin", body = ActionResponse),
        (status = 400, description = "Dados inválidos (inclui erros por campo do backend)")
    )
)]
pub async fn register(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<RegisterPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    app_state
        .account_service
        .register(payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let flash = FlashMessage {
        kind: FlashKind::Success,
        text: app_state.i18n_store.translate(&locale.0, "flash.register.sent"),
    };
    Ok((StatusCode::CREATED, Json(ActionResponse { flash })))
}

// POST /api/public/password/reset
#[utoipa::path(
    post,
    path = "/api/public/password/reset",
    tag = "Public",
    request_body = PasswordResetPayload,
    responses(
        (status = 200, description = "Senha redefinida", body = ActionResponse),
        (status = 400, description = "Token ou senha inválidos")
    )
)]
pub async fn reset_password(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<PasswordResetPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    app_state
        .account_service
        .reset_password(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let flash = FlashMessage {
        kind: FlashKind::Success,
        text: app_state.i18n_store.translate(&locale.0, "flash.password.reset"),
    };
    Ok((StatusCode::OK, Json(ActionResponse { flash })))
}
