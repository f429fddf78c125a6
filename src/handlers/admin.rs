// src/handlers/admin.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        listing::ListQuery,
    },
    config::AppState,
    handlers::{finish_action, ActionResponse},
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{AdminOnly, RequireRole},
    },
    models::{
        account::Account,
        ticket::{TicketFilterPayload, TicketState},
        work_request::{Priority, QuotePayload, RegisterJobPayload},
    },
};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PriorityFilter {
    /// ALTA, MEDIA ou BAJA
    pub priority: Option<Priority>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdvanceTicketPayload {
    #[schema(example = "TRABAJO_EN_PROGRESO")]
    pub next_state: TicketState,
}

// =============================================================================
//  SOLICITUDES DE TRABAJO
// =============================================================================

// GET /api/admin/work-requests
#[utoipa::path(
    get,
    path = "/api/admin/work-requests",
    tag = "Admin",
    params(ListQuery, PriorityFilter),
    responses(
        (status = 200, description = "Solicitações com as ações permitidas por linha"),
        (status = 400, description = "Tamanho de página inválido"),
        (status = 403, description = "Somente admin")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_work_requests(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<AdminOnly>,
    user: AuthenticatedUser,
    Query(filter): Query<PriorityFilter>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = app_state
        .request_service
        .admin_list(&user.0, filter.priority, &query)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(page)))
}

// POST /api/admin/work-requests
#[utoipa::path(
    post,
    path = "/api/admin/work-requests",
    tag = "Admin",
    request_body = RegisterJobPayload,
    responses(
        (status = 200, description = "Trabalho registrado para o cliente", body = ActionResponse),
        (status = 400, description = "Campos obrigatórios ausentes")
    ),
    security(("api_jwt" = []))
)]
pub async fn register_job(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<AdminOnly>,
    user: AuthenticatedUser,
    Json(payload): Json<RegisterJobPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let result = async {
        payload.validate()?;
        let message = app_state
            .request_service
            .admin_register_job(&user.0, &payload)
            .await?;
        Ok::<_, AppError>(
            message.unwrap_or_else(|| app_state.i18n_store.translate(&locale.0, "flash.job.registered")),
        )
    }
    .await;

    finish_action(&app_state, &user.0, &locale, result).await
}

// PUT /api/admin/work-requests/{id}/quote
#[utoipa::path(
    put,
    path = "/api/admin/work-requests/{id}/quote",
    tag = "Admin",
    params(("id" = String, Path, description = "ID da solicitação")),
    request_body = QuotePayload,
    responses(
        (status = 200, description = "Solicitação aceita e cotizada", body = ActionResponse),
        (status = 409, description = "Ação não permitida no estado atual"),
        (status = 502, description = "Aceita, mas a cotização não foi gravada")
    ),
    security(("api_jwt" = []))
)]
pub async fn quote_request(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<AdminOnly>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    Json(payload): Json<QuotePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let result = async {
        payload.validate()?;
        app_state.request_service.admin_quote(&user.0, &id, &payload).await?;
        Ok::<_, AppError>(
            app_state
                .i18n_store
                .format(&locale.0, "flash.request.quoted", &[("id", id.as_str())]),
        )
    }
    .await;

    finish_action(&app_state, &user.0, &locale, result).await
}

// PUT /api/admin/work-requests/{id}/reject
#[utoipa::path(
    put,
    path = "/api/admin/work-requests/{id}/reject",
    tag = "Admin",
    params(("id" = String, Path, description = "ID da solicitação")),
    responses(
        (status = 200, description = "Solicitação rejeitada", body = ActionResponse),
        (status = 409, description = "Somente solicitações PENDIENTE")
    ),
    security(("api_jwt" = []))
)]
pub async fn reject_request(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<AdminOnly>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let result = app_state
        .request_service
        .admin_reject(&user.0, &id)
        .await
        .map(|_| app_state.i18n_store.format(&locale.0, "flash.request.rejected", &[("id", id.as_str())]));

    finish_action(&app_state, &user.0, &locale, result).await
}

// DELETE /api/admin/work-requests/{id}
#[utoipa::path(
    delete,
    path = "/api/admin/work-requests/{id}",
    tag = "Admin",
    params(("id" = String, Path, description = "ID da solicitação")),
    responses(
        (status = 200, description = "Solicitação excluída", body = ActionResponse),
        (status = 404, description = "Solicitação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_request(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<AdminOnly>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let result = app_state
        .request_service
        .admin_delete(&user.0, &id)
        .await
        .map(|_| app_state.i18n_store.translate(&locale.0, "flash.request.deleted"));

    finish_action(&app_state, &user.0, &locale, result).await
}

// =============================================================================
//  USUÁRIOS
// =============================================================================

// GET /api/admin/usernames
#[utoipa::path(
    get,
    path = "/api/admin/usernames",
    tag = "Admin",
    responses((status = 200, description = "Nomes de usuário dos clientes", body = Vec<String>)),
    security(("api_jwt" = []))
)]
pub async fn list_usernames(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<AdminOnly>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let names = app_state
        .account_service
        .usernames(&user.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(names)))
}

// GET /api/admin/pending-users
#[utoipa::path(
    get,
    path = "/api/admin/pending-users",
    tag = "Admin",
    params(ListQuery),
    responses((status = 200, description = "Cadastros aguardando aprovação")),
    security(("api_jwt" = []))
)]
pub async fn list_pending_users(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<AdminOnly>,
    user: AuthenticatedUser,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = app_state
        .account_service
        .pending_users(&user.0, &query)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(page)))
}

// PUT /api/admin/pending-users/{id}/approve
#[utoipa::path(
    put,
    path = "/api/admin/pending-users/{id}/approve",
    tag = "Admin",
    params(("id" = String, Path, description = "ID do usuário")),
    responses(
        (status = 200, description = "Usuário aprovado", body = ActionResponse),
        (status = 409, description = "Usuário já aprovado")
    ),
    security(("api_jwt" = []))
)]
pub async fn approve_user(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<AdminOnly>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let result = app_state
        .account_service
        .approve_user(&user.0, &id)
        .await
        .map(|_| app_state.i18n_store.translate(&locale.0, "flash.user.approved"));

    finish_action(&app_state, &user.0, &locale, result).await
}

// DELETE /api/admin/pending-users/{id}
#[utoipa::path(
    delete,
    path = "/api/admin/pending-users/{id}",
    tag = "Admin",
    params(("id" = String, Path, description = "ID do usuário")),
    responses((status = 200, description = "Usuário excluído", body = ActionResponse)),
    security(("api_jwt" = []))
)]
pub async fn delete_user(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<AdminOnly>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let result = app_state
        .account_service
        .delete_user(&user.0, &id)
        .await
        .map(|_| app_state.i18n_store.translate(&locale.0, "flash.user.deleted"));

    finish_action(&app_state, &user.0, &locale, result).await
}

// =============================================================================
//  TICKETS
// =============================================================================

// GET /api/admin/tickets
#[utoipa::path(
    get,
    path = "/api/admin/tickets",
    tag = "Admin",
    params(ListQuery),
    responses((status = 200, description = "Histórico de tickets")),
    security(("api_jwt" = []))
)]
pub async fn list_tickets(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<AdminOnly>,
    user: AuthenticatedUser,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = app_state
        .ticket_service
        .list(&user.0, &query)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(page)))
}

// POST /api/admin/tickets/filter
#[utoipa::path(
    post,
    path = "/api/admin/tickets/filter",
    tag = "Admin",
    params(ListQuery),
    request_body = TicketFilterPayload,
    responses((status = 200, description = "Tickets filtrados no backend")),
    security(("api_jwt" = []))
)]
pub async fn filter_tickets(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<AdminOnly>,
    user: AuthenticatedUser,
    Query(query): Query<ListQuery>,
    Json(filter): Json<TicketFilterPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let page = app_state
        .ticket_service
        .filter(&user.0, &filter, &query)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    app_state
        .flash_store
        .success(&user.0.username, app_state.i18n_store.translate(&locale.0, "flash.filter.applied"))
        .await;

    Ok((StatusCode::OK, Json(page)))
}

// PUT /api/admin/tickets/{id}/state
#[utoipa::path(
    put,
    path = "/api/admin/tickets/{id}/state",
    tag = "Admin",
    params(("id" = String, Path, description = "ID do ticket")),
    request_body = AdvanceTicketPayload,
    responses(
        (status = 200, description = "Ticket avançou", body = ActionResponse),
        (status = 409, description = "Transição não permitida")
    ),
    security(("api_jwt" = []))
)]
pub async fn advance_ticket(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<AdminOnly>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    Json(payload): Json<AdvanceTicketPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let result = advance(&app_state, &user, &locale, &id, payload.next_state).await;
    finish_action(&app_state, &user.0, &locale, result).await
}

/// Compartilhado com a rota do staff.
pub(crate) async fn advance(
    app_state: &AppState,
    user: &AuthenticatedUser,
    locale: &Locale,
    id: &str,
    next: TicketState,
) -> Result<String, AppError> {
    app_state.ticket_service.advance(&user.0, id, next).await?;
    Ok(app_state.i18n_store.format(
        &locale.0,
        "flash.ticket.advanced",
        &[("id", id), ("state", next.as_str())],
    ))
}

// =============================================================================
//  PERFIL
// =============================================================================

// GET /api/admin/profile
#[utoipa::path(
    get,
    path = "/api/admin/profile",
    tag = "Admin",
    responses((status = 200, description = "Perfil do admin", body = Account)),
    security(("api_jwt" = []))
)]
pub async fn profile(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<AdminOnly>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let account = app_state
        .account_service
        .profile(&user.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(account)))
}
