// src/handlers/session.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::dashboard::SessionInfo,
    services::flash::{FlashKind, FlashMessage},
};

#[derive(Debug, Serialize, ToSchema)]
pub struct LogoutResponse {
    pub flash: FlashMessage,
    /// `true` quando o backend não confirmou e a sessão foi encerrada só aqui.
    pub forced: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FlashResponse {
    pub flash: Option<FlashMessage>,
}

// POST /api/session/logout
#[utoipa::path(
    post,
    path = "/api/session/logout",
    tag = "Session",
    responses(
        (status = 200, description = "Sessão encerrada", body = LogoutResponse),
        (status = 401, description = "Sessão expirada")
    ),
    security(("api_jwt" = []))
)]
pub async fn logout(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let forced = app_state
        .account_service
        .logout(&user.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    app_state.flash_store.clear(&user.0.username).await;

    let flash = FlashMessage {
        kind: FlashKind::Success,
        text: app_state.i18n_store.translate(&locale.0, "flash.session.closed"),
    };
    Ok((StatusCode::OK, Json(LogoutResponse { flash, forced })))
}

// GET /api/session/me
#[utoipa::path(
    get,
    path = "/api/session/me",
    tag = "Session",
    responses(
        (status = 200, description = "Usuário, papel e menu de navegação", body = SessionInfo),
        (status = 401, description = "Sessão expirada")
    ),
    security(("api_jwt" = []))
)]
pub async fn me(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
) -> impl IntoResponse {
    let info = app_state
        .account_service
        .session_info(&user.0, &app_state.i18n_store, &locale.0);
    (StatusCode::OK, Json(info))
}

// GET /api/session/flash
#[utoipa::path(
    get,
    path = "/api/session/flash",
    tag = "Session",
    responses(
        (status = 200, description = "Mensagem atual (some após alguns segundos)", body = FlashResponse)
    ),
    security(("api_jwt" = []))
)]
pub async fn current_flash(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> impl IntoResponse {
    let flash = app_state.flash_store.current(&user.0.username).await;
    (StatusCode::OK, Json(FlashResponse { flash }))
}
