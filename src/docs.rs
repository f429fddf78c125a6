// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;
use crate::services;
use crate::workflow;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Público ---
        handlers::public::register,
        handlers::public::reset_password,

        // --- Sessão ---
        handlers::session::logout,
        handlers::session::me,
        handlers::session::current_flash,

        // --- ADMIN ---
        handlers::admin::list_work_requests,
        handlers::admin::register_job,
        handlers::admin::quote_request,
        handlers::admin::reject_request,
        handlers::admin::delete_request,
        handlers::admin::list_usernames,
        handlers::admin::list_pending_users,
        handlers::admin::approve_user,
        handlers::admin::delete_user,
        handlers::admin::list_tickets,
        handlers::admin::filter_tickets,
        handlers::admin::advance_ticket,
        handlers::admin::profile,

        // --- STAFF ---
        handlers::staff::list_invoices,
        handlers::staff::filter_invoices,
        handlers::staff::mark_paid,
        handlers::staff::download_report,
        handlers::staff::list_tickets,
        handlers::staff::filter_tickets,
        handlers::staff::advance_ticket,
        handlers::staff::list_customers,
        handlers::staff::list_usernames,
        handlers::staff::profile,

        // --- CLIENTE ---
        handlers::customer::list_work_requests,
        handlers::customer::create_work_request,
        handlers::customer::edit_work_request,
        handlers::customer::delete_work_request,
        handlers::customer::accept_quote,
        handlers::customer::reject_quote,
        handlers::customer::list_jobs,
        handlers::customer::list_invoices,
        handlers::customer::profile,
        handlers::customer::update_profile,
        handlers::customer::change_password,
        handlers::customer::delete_account,

        // --- Gráficos ---
        handlers::charts::users_chart,
        handlers::charts::users_stream,
        handlers::charts::requests_chart,
        handlers::charts::requests_stream,
        handlers::charts::tickets_chart,
        handlers::charts::tickets_stream,
    ),
    components(
        schemas(
            // --- Contas ---
            models::account::Role,
            models::account::Account,
            models::account::CustomerContact,
            models::account::RegisterPayload,
            models::account::PasswordResetPayload,
            models::account::ProfileUpdatePayload,
            models::account::PasswordChangePayload,
            models::account::DeleteAccountPayload,

            // --- Solicitudes ---
            models::work_request::Priority,
            models::work_request::RequestState,
            models::work_request::QuoteDecision,
            models::work_request::WorkRequest,
            models::work_request::CreateRequestPayload,
            models::work_request::EditDescriptionPayload,
            models::work_request::QuotePayload,
            models::work_request::RegisterJobPayload,

            // --- Tickets ---
            models::ticket::TicketState,
            models::ticket::Ticket,
            models::ticket::TicketFilterPayload,
            handlers::admin::AdvanceTicketPayload,
            services::ticket_service::TicketRow,

            // --- Facturas ---
            models::invoice::PaymentState,
            models::invoice::Invoice,
            models::invoice::InvoiceFilterPayload,
            models::invoice::InvoiceReportPayload,

            // --- Ações por linha ---
            workflow::RequestAction,
            workflow::TicketAction,
            workflow::InvoiceAction,
            workflow::UserAction,

            // --- Painel ---
            models::dashboard::ChartKind,
            models::dashboard::ChartDataset,
            models::dashboard::ChartData,
            models::dashboard::NavEntry,
            models::dashboard::SessionInfo,
            services::flash::FlashKind,
            services::flash::FlashMessage,
            handlers::ActionResponse,
            handlers::session::LogoutResponse,
            handlers::session::FlashResponse,
        )
    ),
    tags(
        (name = "Public", description = "Cadastro e Redefinição de Senha"),
        (name = "Session", description = "Sessão, Menu e Mensagens"),
        (name = "Admin", description = "Solicitações, Usuários e Tickets"),
        (name = "Staff", description = "Pagamentos, Relatórios e Tickets"),
        (name = "Customer", description = "Solicitações, Trabalhos, Comprovantes e Perfil"),
        (name = "Charts", description = "Gráficos do Painel")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_protected_area_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/admin/work-requests/{id}/quote",
            "/api/staff/invoices/report",
            "/api/customer/profile/password",
            "/api/staff/charts/tickets/stream",
        ] {
            assert!(doc.paths.paths.contains_key(path), "{path}");
        }
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("api_jwt"));
    }
}
