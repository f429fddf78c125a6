// src/handlers/staff.rs

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

use crate::{
    common::{
        error::ApiError,
        listing::ListQuery,
    },
    config::AppState,
    handlers::{admin::{self, AdvanceTicketPayload}, finish_action, ActionResponse},
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{RequireRole, StaffOnly},
    },
    models::{
        account::Account,
        invoice::{InvoiceFilterPayload, InvoiceReportPayload, PaymentState},
        ticket::TicketFilterPayload,
    },
};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PaymentStateFilter {
    /// PENDIENTE_PAGO ou VALOR_PAGADO
    pub payment_state: Option<PaymentState>,
}

// =============================================================================
//  ESTADO DE PAGO
// =============================================================================

// GET /api/staff/invoices
#[utoipa::path(
    get,
    path = "/api/staff/invoices",
    tag = "Staff",
    params(ListQuery, PaymentStateFilter),
    responses(
        (status = 200, description = "Facturas com as ações permitidas por linha"),
        (status = 403, description = "Somente staff")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_invoices(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<StaffOnly>,
    user: AuthenticatedUser,
    Query(filter): Query<PaymentStateFilter>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = app_state
        .invoice_service
        .staff_list(&user.0, filter.payment_state, &query)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(page)))
}

// POST /api/staff/invoices/filter
#[utoipa::path(
    post,
    path = "/api/staff/invoices/filter",
    tag = "Staff",
    params(ListQuery),
    request_body = InvoiceFilterPayload,
    responses((status = 200, description = "Facturas filtradas no backend")),
    security(("api_jwt" = []))
)]
pub async fn filter_invoices(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<StaffOnly>,
    user: AuthenticatedUser,
    Query(query): Query<ListQuery>,
    Json(filter): Json<InvoiceFilterPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let page = app_state
        .invoice_service
        .staff_filter(&user.0, &filter, &query)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    app_state
        .flash_store
        .success(&user.0.username, app_state.i18n_store.translate(&locale.0, "flash.filter.applied"))
        .await;

    Ok((StatusCode::OK, Json(page)))
}

// PUT /api/staff/invoices/{id}/payment
#[utoipa::path(
    put,
    path = "/api/staff/invoices/{id}/payment",
    tag = "Staff",
    params(("id" = String, Path, description = "ID da factura")),
    responses(
        (status = 200, description = "Factura marcada como paga", body = ActionResponse),
        (status = 409, description = "Factura já paga")
    ),
    security(("api_jwt" = []))
)]
pub async fn mark_paid(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<StaffOnly>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let result = app_state
        .invoice_service
        .mark_paid(&user.0, &id)
        .await
        .map(|_| app_state.i18n_store.format(&locale.0, "flash.invoice.paid", &[("id", id.as_str())]));

    finish_action(&app_state, &user.0, &locale, result).await
}

// POST /api/staff/invoices/report
#[utoipa::path(
    post,
    path = "/api/staff/invoices/report",
    tag = "Staff",
    request_body = InvoiceReportPayload,
    responses(
        (status = 200, description = "Relatório em PDF", content_type = "application/pdf", body = Vec<u8>),
        (status = 400, description = "Datas obrigatórias ausentes")
    ),
    security(("api_jwt" = []))
)]
pub async fn download_report(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<StaffOnly>,
    user: AuthenticatedUser,
    Json(payload): Json<InvoiceReportPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let result = async {
        payload.validate()?;
        app_state.invoice_service.report(&user.0, &payload).await
    }
    .await;

    match result {
        Ok(pdf) => Ok((
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "application/pdf"),
                (header::CONTENT_DISPOSITION, "attachment; filename=\"facturas.pdf\""),
            ],
            pdf,
        )),
        Err(err) => {
            let api_error = err.to_api_error(&locale, &app_state.i18n_store);
            app_state
                .flash_store
                .error(&user.0.username, api_error.error.clone())
                .await;
            Err(api_error)
        }
    }
}

// =============================================================================
//  TRABAJOS
// =============================================================================

// GET /api/staff/tickets
#[utoipa::path(
    get,
    path = "/api/staff/tickets",
    tag = "Staff",
    params(ListQuery),
    responses((status = 200, description = "Histórico de tickets")),
    security(("api_jwt" = []))
)]
pub async fn list_tickets(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<StaffOnly>,
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

// POST /api/staff/tickets/filter
#[utoipa::path(
    post,
    path = "/api/staff/tickets/filter",
    tag = "Staff",
    params(ListQuery),
    request_body = TicketFilterPayload,
    responses((status = 200, description = "Tickets filtrados no backend")),
    security(("api_jwt" = []))
)]
pub async fn filter_tickets(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<StaffOnly>,
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

// PUT /api/staff/tickets/{id}/state
#[utoipa::path(
    put,
    path = "/api/staff/tickets/{id}/state",
    tag = "Staff",
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
    _guard: RequireRole<StaffOnly>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    Json(payload): Json<AdvanceTicketPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let result = admin::advance(&app_state, &user, &locale, &id, payload.next_state).await;
    finish_action(&app_state, &user.0, &locale, result).await
}

// =============================================================================
//  USUARIOS
// =============================================================================

// GET /api/staff/customers
#[utoipa::path(
    get,
    path = "/api/staff/customers",
    tag = "Staff",
    params(ListQuery),
    responses((status = 200, description = "Diretório de clientes com link de WhatsApp")),
    security(("api_jwt" = []))
)]
pub async fn list_customers(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<StaffOnly>,
    user: AuthenticatedUser,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = app_state
        .account_service
        .customers(&user.0, &query)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(page)))
}

// GET /api/staff/usernames
#[utoipa::path(
    get,
    path = "/api/staff/usernames",
    tag = "Staff",
    responses((status = 200, description = "Nomes de usuário dos clientes", body = Vec<String>)),
    security(("api_jwt" = []))
)]
pub async fn list_usernames(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<StaffOnly>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let names = app_state
        .account_service
        .usernames(&user.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(names)))
}

// GET /api/staff/profile
#[utoipa::path(
    get,
    path = "/api/staff/profile",
    tag = "Staff",
    responses((status = 200, description = "Perfil do staff", body = Account)),
    security(("api_jwt" = []))
)]
pub async fn profile(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<StaffOnly>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let account = app_state
        .account_service
        .profile(&user.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(account)))
}
