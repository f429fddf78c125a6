// src/handlers/customer.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        listing::ListQuery,
    },
    config::AppState,
    handlers::{finish_action, staff::PaymentStateFilter, ActionResponse},
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{CustomerOnly, RequireRole},
    },
    models::{
        account::{Account, DeleteAccountPayload, PasswordChangePayload, ProfileUpdatePayload},
        ticket::TicketState,
        work_request::{CreateRequestPayload, EditDescriptionPayload, Priority, RequestState},
    },
};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RequestStateFilter {
    /// PENDIENTE, ACEPTADO ou RECHAZADO
    pub state: Option<RequestState>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct JobsFilter {
    pub priority: Option<Priority>,
    pub state: Option<TicketState>,
}

// =============================================================================
//  SOLICITAR TRABAJO
// =============================================================================

// GET /api/customer/work-requests
#[utoipa::path(
    get,
    path = "/api/customer/work-requests",
    tag = "Customer",
    params(ListQuery, RequestStateFilter),
    responses(
        (status = 200, description = "Solicitações do cliente com as ações permitidas"),
        (status = 403, description = "Somente clientes")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_work_requests(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<CustomerOnly>,
    user: AuthenticatedUser,
    Query(filter): Query<RequestStateFilter>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = app_state
        .request_service
        .customer_list(&user.0, filter.state, &query)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(page)))
}

// POST /api/customer/work-requests
#[utoipa::path(
    post,
    path = "/api/customer/work-requests",
    tag = "Customer",
    request_body = CreateRequestPayload,
    responses(
        (status = 200, description = "Solicitação criada", body = ActionResponse),
        (status = 400, description = "Descrição ou prioridade inválida")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_work_request(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<CustomerOnly>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateRequestPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let result = async {
        payload.validate()?;
        app_state.request_service.customer_create(&user.0, &payload).await?;
        Ok::<_, AppError>(app_state.i18n_store.translate(&locale.0, "flash.request.created"))
    }
    .await;

    finish_action(&app_state, &user.0, &locale, result).await
}

// PUT /api/customer/work-requests/{id}
#[utoipa::path(
    put,
    path = "/api/customer/work-requests/{id}",
    tag = "Customer",
    params(("id" = String, Path, description = "ID da solicitação")),
    request_body = EditDescriptionPayload,
    responses(
        (status = 200, description = "Descrição atualizada", body = ActionResponse),
        (status = 409, description = "Somente solicitações PENDIENTE")
    ),
    security(("api_jwt" = []))
)]
pub async fn edit_work_request(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<CustomerOnly>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    Json(payload): Json<EditDescriptionPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let result = async {
        payload.validate()?;
        app_state
            .request_service
            .customer_edit(&user.0, &id, &payload.descripcion_inicial)
            .await?;
        Ok::<_, AppError>(app_state.i18n_store.translate(&locale.0, "flash.request.updated"))
    }
    .await;

    finish_action(&app_state, &user.0, &locale, result).await
}

// DELETE /api/customer/work-requests/{id}
#[utoipa::path(
    delete,
    path = "/api/customer/work-requests/{id}",
    tag = "Customer",
    params(("id" = String, Path, description = "ID da solicitação")),
    responses(
        (status = 200, description = "Solicitação excluída", body = ActionResponse),
        (status = 409, description = "Solicitação já aceita")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_work_request(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<CustomerOnly>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let result = app_state
        .request_service
        .customer_delete(&user.0, &id)
        .await
        .map(|_| app_state.i18n_store.translate(&locale.0, "flash.request.deleted"));

    finish_action(&app_state, &user.0, &locale, result).await
}

// PUT /api/customer/work-requests/{id}/quote/accept
#[utoipa::path(
    put,
    path = "/api/customer/work-requests/{id}/quote/accept",
    tag = "Customer",
    params(("id" = String, Path, description = "ID da solicitação")),
    responses(
        (status = 200, description = "Cotização aceita; o backend gera o ticket", body = ActionResponse),
        (status = 409, description = "Sem cotização pendente")
    ),
    security(("api_jwt" = []))
)]
pub async fn accept_quote(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<CustomerOnly>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let result = app_state
        .request_service
        .accept_quote(&user.0, &id)
        .await
        .map(|message| {
            message.unwrap_or_else(|| app_state.i18n_store.translate(&locale.0, "flash.quote.accepted"))
        });

    finish_action(&app_state, &user.0, &locale, result).await
}

// PUT /api/customer/work-requests/{id}/quote/reject
#[utoipa::path(
    put,
    path = "/api/customer/work-requests/{id}/quote/reject",
    tag = "Customer",
    params(("id" = String, Path, description = "ID da solicitação")),
    responses(
        (status = 200, description = "Cotização rejeitada", body = ActionResponse),
        (status = 409, description = "Sem cotização pendente")
    ),
    security(("api_jwt" = []))
)]
pub async fn reject_quote(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<CustomerOnly>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let result = app_state
        .request_service
        .reject_quote(&user.0, &id)
        .await
        .map(|message| {
            message.unwrap_or_else(|| app_state.i18n_store.translate(&locale.0, "flash.quote.rejected"))
        });

    finish_action(&app_state, &user.0, &locale, result).await
}

// =============================================================================
//  TRABAJOS E COMPROBANTES
// =============================================================================

// GET /api/customer/jobs
#[utoipa::path(
    get,
    path = "/api/customer/jobs",
    tag = "Customer",
    params(ListQuery, JobsFilter),
    responses((status = 200, description = "Tickets do cliente")),
    security(("api_jwt" = []))
)]
pub async fn list_jobs(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<CustomerOnly>,
    user: AuthenticatedUser,
    Query(filter): Query<JobsFilter>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = app_state
        .ticket_service
        .customer_jobs(&user.0, filter.priority, filter.state, &query)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(page)))
}

// GET /api/customer/invoices
#[utoipa::path(
    get,
    path = "/api/customer/invoices",
    tag = "Customer",
    params(ListQuery, PaymentStateFilter),
    responses((status = 200, description = "Comprovantes do cliente")),
    security(("api_jwt" = []))
)]
pub async fn list_invoices(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<CustomerOnly>,
    user: AuthenticatedUser,
    Query(filter): Query<PaymentStateFilter>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = app_state
        .invoice_service
        .customer_list(&user.0, filter.payment_state, &query)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(page)))
}

// =============================================================================
//  PERFIL
// =============================================================================

// GET /api/customer/profile
#[utoipa::path(
    get,
    path = "/api/customer/profile",
    tag = "Customer",
    responses((status = 200, description = "Dados do cliente", body = Account)),
    security(("api_jwt" = []))
)]
pub async fn profile(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<CustomerOnly>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let account = app_state
        .account_service
        .profile(&user.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(account)))
}

// PUT /api/customer/profile
#[utoipa::path(
    put,
    path = "/api/customer/profile",
    tag = "Customer",
    request_body = ProfileUpdatePayload,
    responses(
        (status = 200, description = "Perfil atualizado", body = ActionResponse),
        (status = 400, description = "Nenhum campo alterado ou campo inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_profile(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<CustomerOnly>,
    user: AuthenticatedUser,
    Json(payload): Json<ProfileUpdatePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let result = async {
        payload.validate()?;
        app_state.account_service.update_profile(&user.0, &payload).await?;
        Ok::<_, AppError>(app_state.i18n_store.translate(&locale.0, "flash.profile.updated"))
    }
    .await;

    finish_action(&app_state, &user.0, &locale, result).await
}

// PUT /api/customer/profile/password
#[utoipa::path(
    put,
    path = "/api/customer/profile/password",
    tag = "Customer",
    request_body = PasswordChangePayload,
    responses(
        (status = 200, description = "Senha alterada", body = ActionResponse),
        (status = 400, description = "Senhas não coincidem ou senha atual incorreta")
    ),
    security(("api_jwt" = []))
)]
pub async fn change_password(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<CustomerOnly>,
    user: AuthenticatedUser,
    Json(payload): Json<PasswordChangePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let result = async {
        payload.validate()?;
        app_state.account_service.change_password(&user.0, &payload).await?;
        Ok::<_, AppError>(app_state.i18n_store.translate(&locale.0, "flash.password.changed"))
    }
    .await;

    finish_action(&app_state, &user.0, &locale, result).await
}

// DELETE /api/customer/profile
#[utoipa::path(
    delete,
    path = "/api/customer/profile",
    tag = "Customer",
    request_body = DeleteAccountPayload,
    responses(
        (status = 200, description = "Conta excluída", body = ActionResponse),
        (status = 400, description = "Senha e confirmação obrigatórias")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_account(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<CustomerOnly>,
    user: AuthenticatedUser,
    Json(payload): Json<DeleteAccountPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let result = app_state
        .account_service
        .delete_account(&user.0, &payload)
        .await
        .map(|_| app_state.i18n_store.translate(&locale.0, "flash.account.deleted"));

    finish_action(&app_state, &user.0, &locale, result).await
}
