// src/services/ticket_service.rs

use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    client::{AdminApi, CustomerApi, StaffApi},
    common::{
        error::AppError,
        listing::{filter_searchable, paginate, ListQuery, Page},
    },
    middleware::auth::SessionUser,
    models::{
        account::Role,
        ticket::{Ticket, TicketFilterPayload, TicketState},
        work_request::Priority,
    },
    workflow::{allowed_ticket_actions, ensure_allowed, next_ticket_states, TicketAction},
};

// Linha de ticket: ações + estados aceitos pelo seletor de "avançar".
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TicketRow {
    #[serde(flatten)]
    pub item: Ticket,
    pub actions: Vec<TicketAction>,
    pub next_states: Vec<TicketState>,
}

impl TicketRow {
    fn new(role: Role, ticket: Ticket) -> Self {
        let actions = allowed_ticket_actions(role, &ticket);
        // Sem ação de avançar, nada para oferecer no seletor
        let next_states = if actions.contains(&TicketAction::Advance) {
            next_ticket_states(ticket.estado)
        } else {
            Vec::new()
        };
        Self { item: ticket, actions, next_states }
    }
}

#[derive(Clone)]
pub struct TicketService {
    admin_api: AdminApi,
    staff_api: StaffApi,
    customer_api: CustomerApi,
}

impl TicketService {
    pub fn new(admin_api: AdminApi, staff_api: StaffApi, customer_api: CustomerApi) -> Self {
        Self { admin_api, staff_api, customer_api }
    }

    fn to_page(role: Role, tickets: Vec<Ticket>, query: &ListQuery) -> Result<Page<TicketRow>, AppError> {
        let per_page = query.page_size()?;
        let tickets = filter_searchable(tickets, query.term());
        Ok(paginate(tickets, query.page(), per_page).map(|ticket| TicketRow::new(role, ticket)))
    }

    async fn fetch_all(&self, user: &SessionUser) -> Result<Vec<Ticket>, AppError> {
        match user.role {
            Role::Admin => self.admin_api.list_tickets(&user.token).await,
            Role::Staff => self.staff_api.list_tickets(&user.token).await,
            Role::Customer => Err(AppError::Forbidden),
        }
    }

    /// Histórico completo (admin ou staff).
    pub async fn list(&self, user: &SessionUser, query: &ListQuery) -> Result<Page<TicketRow>, AppError> {
        let tickets = self.fetch_all(user).await?;
        Self::to_page(user.role, tickets, query)
    }

    /// Filtro feito no backend; busca e paginação continuam locais.
    pub async fn filter(
        &self,
        user: &SessionUser,
        filter: &TicketFilterPayload,
        query: &ListQuery,
    ) -> Result<Page<TicketRow>, AppError> {
        let body = filter.to_backend_body();
        let tickets = match user.role {
            Role::Admin => self.admin_api.filter_tickets(&user.token, &body).await?,
            Role::Staff => self.staff_api.filter_tickets(&user.token, &body).await?,
            Role::Customer => return Err(AppError::Forbidden),
        };
        Self::to_page(user.role, tickets, query)
    }

    pub async fn advance(&self, user: &SessionUser, id: &str, next: TicketState) -> Result<(), AppError> {
        let ticket = self
            .fetch_all(user)
            .await?
            .into_iter()
            .find(|t| t.id == id)
            .ok_or_else(|| AppError::not_found("Ticket", id))?;

        ensure_allowed(
            &allowed_ticket_actions(user.role, &ticket),
            TicketAction::Advance,
            ticket.estado.as_str(),
        )?;

        // Só para frente: voltar ou repetir o estado é recusado sem chamar o backend
        if !ticket.estado.can_advance_to(next) {
            return Err(AppError::ActionNotAllowed {
                action: format!("{} -> {}", TicketAction::Advance, next),
                state: ticket.estado.to_string(),
            });
        }

        match user.role {
            Role::Admin => self.admin_api.set_ticket_state(&user.token, id, next).await?,
            _ => self.staff_api.set_ticket_state(&user.token, id, next).await?,
        };

        tracing::info!("🔧 Ticket {}: {} -> {} ({})", id, ticket.estado, next, user.username);
        Ok(())
    }

    // =========================================================================
    //  CLIENTE: "Trabajos"
    // =========================================================================

    pub async fn customer_jobs(
        &self,
        user: &SessionUser,
        priority: Option<Priority>,
        state: Option<TicketState>,
        query: &ListQuery,
    ) -> Result<Page<Ticket>, AppError> {
        let per_page = query.page_size()?;
        let token = user.token.as_str();

        let tickets = match (state, priority) {
            (Some(state), _) => self.customer_api.tickets_by_state(token, state).await?,
            (None, Some(priority)) => self.customer_api.tickets_by_priority(token, priority).await?,
            // Sem filtro: junta as três prioridades
            (None, None) => {
                let (alta, media, baja) = tokio::try_join!(
                    self.customer_api.tickets_by_priority(token, Priority::Alta),
                    self.customer_api.tickets_by_priority(token, Priority::Media),
                    self.customer_api.tickets_by_priority(token, Priority::Baja),
                )?;
                alta.into_iter().chain(media).chain(baja).collect()
            }
        };

        // Os dois filtros juntos: o backend só aplica um
        let tickets: Vec<Ticket> = tickets
            .into_iter()
            .filter(|t| priority.is_none_or(|p| t.prioridad == Some(p)))
            .collect();

        let tickets = filter_searchable(tickets, query.term());
        Ok(paginate(tickets, query.page(), per_page))
    }
}
