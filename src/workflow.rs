// src/workflow.rs

// Ciclo de vida Solicitud -> Ticket -> Factura.
// O painel só habilita as ações válidas no estado atual de cada linha;
// a regra de verdade continua sendo do backend.

use std::fmt;

use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    common::error::AppError,
    models::{
        account::{Account, Role},
        invoice::Invoice,
        ticket::{Ticket, TicketState},
        work_request::{QuoteDecision, RequestState, WorkRequest},
    },
};

// =============================================================================
//  AÇÕES
// =============================================================================

#[derive(Debug, Clone, Copy, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestAction {
    Quote,
    Reject,
    Delete,
    EditDescription,
    AcceptQuote,
    RejectQuote,
}

#[derive(Debug, Clone, Copy, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketAction {
    Advance,
}

#[derive(Debug, Clone, Copy, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceAction {
    MarkPaid,
}

#[derive(Debug, Clone, Copy, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserAction {
    Approve,
    Delete,
}

impl RequestAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestAction::Quote => "QUOTE",
            RequestAction::Reject => "REJECT",
            RequestAction::Delete => "DELETE",
            RequestAction::EditDescription => "EDIT_DESCRIPTION",
            RequestAction::AcceptQuote => "ACCEPT_QUOTE",
            RequestAction::RejectQuote => "REJECT_QUOTE",
        }
    }
}

impl fmt::Display for RequestAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for TicketAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ADVANCE")
    }
}

impl fmt::Display for InvoiceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MARK_PAID")
    }
}

impl fmt::Display for UserAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UserAction::Approve => "APPROVE",
            UserAction::Delete => "DELETE",
        })
    }
}

// =============================================================================
//  REGRAS POR ESTADO
// =============================================================================

pub fn allowed_request_actions(role: Role, request: &WorkRequest) -> Vec<RequestAction> {
    let state = request.estado;
    let decision = request.cotizacion_aceptada;
    let mut actions = Vec::new();

    match role {
        Role::Admin => {
            // ACEPTADO sem decisão do cliente: recotizar ou corrigir "aceita sem cotização"
            let can_quote = state == RequestState::Pendiente
                || (state == RequestState::Aceptado && decision == QuoteDecision::Pending);
            if can_quote {
                actions.push(RequestAction::Quote);
            }
            if state == RequestState::Pendiente {
                actions.push(RequestAction::Reject);
            }
            actions.push(RequestAction::Delete);
        }
        Role::Customer => {
            if state == RequestState::Pendiente {
                actions.push(RequestAction::EditDescription);
            }
            if matches!(state, RequestState::Pendiente | RequestState::Rechazado) {
                actions.push(RequestAction::Delete);
            }
            if state == RequestState::Aceptado
                && request.has_quote()
                && decision == QuoteDecision::Pending
            {
                actions.push(RequestAction::AcceptQuote);
                actions.push(RequestAction::RejectQuote);
            }
        }
        Role::Staff => {}
    }

    actions
}

pub fn allowed_ticket_actions(role: Role, ticket: &Ticket) -> Vec<TicketAction> {
    match role {
        Role::Admin | Role::Staff if !ticket.estado.is_terminal() => vec![TicketAction::Advance],
        _ => Vec::new(),
    }
}

/// Estados para os quais o ticket ainda pode ir.
pub fn next_ticket_states(state: TicketState) -> Vec<TicketState> {
    [
        TicketState::TrabajoPendiente,
        TicketState::TrabajoEnProgreso,
        TicketState::TrabajoTerminado,
    ]
    .into_iter()
    .filter(|next| state.can_advance_to(*next))
    .collect()
}

pub fn allowed_invoice_actions(role: Role, invoice: &Invoice) -> Vec<InvoiceAction> {
    if role == Role::Staff && invoice.estado_pago.can_mark_paid() {
        vec![InvoiceAction::MarkPaid]
    } else {
        Vec::new()
    }
}

pub fn allowed_user_actions(account: &Account) -> Vec<UserAction> {
    if account.permiso {
        vec![UserAction::Delete]
    } else {
        vec![UserAction::Approve, UserAction::Delete]
    }
}

pub fn ensure_allowed<A>(actions: &[A], action: A, state: &str) -> Result<(), AppError>
where
    A: PartialEq + fmt::Display,
{
    if actions.contains(&action) {
        Ok(())
    } else {
        Err(AppError::ActionNotAllowed {
            action: action.to_string(),
            state: state.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::invoice::PaymentState;
    use rust_decimal::Decimal;

    fn request(estado: RequestState, quote: Option<i64>, decision: QuoteDecision) -> WorkRequest {
        WorkRequest {
            id_solicitud: "1".into(),
            username: "ana".into(),
            descripcion_inicial: "Frenos".into(),
            prioridad: None,
            estado,
            cotizacion: quote.map(Decimal::from),
            cotizacion_aceptada: decision,
            descripcion_trabajo: None,
            fecha_creacion: None,
            pago: None,
        }
    }

    fn ticket(estado: TicketState) -> Ticket {
        Ticket {
            id: "5".into(),
            solicitud_id: None,
            username: "ana".into(),
            estado,
            prioridad: None,
            descripcion_inicial: None,
            descripcion_trabajo: None,
            fecha_creacion: None,
        }
    }

    fn invoice(estado_pago: PaymentState) -> Invoice {
        Invoice {
            factura_id: "F-1".into(),
            ticket_id: None,
            username: "ana".into(),
            cotizacion: None,
            estado_pago,
            estado_ticket: None,
            prioridad: None,
            descripcion_inicial: None,
            descripcion_trabajo: None,
            fecha_creacion: None,
        }
    }

    #[test]
    fn admin_actions_follow_request_state() {
        use RequestAction::*;
        let pending = request(RequestState::Pendiente, None, QuoteDecision::Pending);
        assert_eq!(allowed_request_actions(Role::Admin, &pending), vec![Quote, Reject, Delete]);

        // aceita mas sem cotização: ainda pode cotizar
        let unquoted = request(RequestState::Aceptado, None, QuoteDecision::Pending);
        assert_eq!(allowed_request_actions(Role::Admin, &unquoted), vec![Quote, Delete]);

        let decided = request(RequestState::Aceptado, Some(50), QuoteDecision::Accepted);
        assert_eq!(allowed_request_actions(Role::Admin, &decided), vec![Delete]);

        let rejected = request(RequestState::Rechazado, None, QuoteDecision::Pending);
        assert_eq!(allowed_request_actions(Role::Admin, &rejected), vec![Delete]);
    }

    #[test]
    fn customer_actions_follow_request_state() {
        use RequestAction::*;
        let pending = request(RequestState::Pendiente, None, QuoteDecision::Pending);
        assert_eq!(allowed_request_actions(Role::Customer, &pending), vec![EditDescription, Delete]);

        let quoted = request(RequestState::Aceptado, Some(80), QuoteDecision::Pending);
        assert_eq!(allowed_request_actions(Role::Customer, &quoted), vec![AcceptQuote, RejectQuote]);

        let unquoted = request(RequestState::Aceptado, None, QuoteDecision::Pending);
        assert!(allowed_request_actions(Role::Customer, &unquoted).is_empty());

        let refused = request(RequestState::Aceptado, Some(80), QuoteDecision::Rejected);
        assert!(allowed_request_actions(Role::Customer, &refused).is_empty());

        let rejected = request(RequestState::Rechazado, None, QuoteDecision::Pending);
        assert_eq!(allowed_request_actions(Role::Customer, &rejected), vec![Delete]);
    }

    #[test]
    fn quoted_row_straight_from_backend_is_still_open_for_decision() {
        use RequestAction::*;
        // o backend grava "No Aceptada" ao cotizar, antes de o cliente responder
        let row: WorkRequest = serde_json::from_value(serde_json::json!({
            "idSolicitud": 9,
            "username": "ana",
            "descripcionInicial": "Frenos",
            "estado": "ACEPTADO",
            "cotizacion": 80,
            "cotizacionAceptada": "No Aceptada"
        }))
        .unwrap();
        assert_eq!(row.cotizacion_aceptada, QuoteDecision::Pending);
        assert_eq!(allowed_request_actions(Role::Customer, &row), vec![AcceptQuote, RejectQuote]);
        assert_eq!(allowed_request_actions(Role::Admin, &row), vec![Quote, Delete]);
    }

    #[test]
    fn staff_has_no_request_actions() {
        let pending = request(RequestState::Pendiente, None, QuoteDecision::Pending);
        assert!(allowed_request_actions(Role::Staff, &pending).is_empty());
    }

    #[test]
    fn terminal_states_disable_mutations() {
        assert!(allowed_ticket_actions(Role::Admin, &ticket(TicketState::TrabajoTerminado)).is_empty());
        assert!(allowed_ticket_actions(Role::Staff, &ticket(TicketState::TrabajoTerminado)).is_empty());
        assert_eq!(
            allowed_ticket_actions(Role::Staff, &ticket(TicketState::TrabajoEnProgreso)),
            vec![TicketAction::Advance]
        );
        assert!(allowed_ticket_actions(Role::Customer, &ticket(TicketState::TrabajoPendiente)).is_empty());

        assert!(allowed_invoice_actions(Role::Staff, &invoice(PaymentState::ValorPagado)).is_empty());
        assert_eq!(
            allowed_invoice_actions(Role::Staff, &invoice(PaymentState::PendientePago)),
            vec![InvoiceAction::MarkPaid]
        );
    }

    #[test]
    fn next_states_are_forward_only() {
        assert_eq!(
            next_ticket_states(TicketState::TrabajoPendiente),
            vec![TicketState::TrabajoEnProgreso, TicketState::TrabajoTerminado]
        );
        assert!(next_ticket_states(TicketState::TrabajoTerminado).is_empty());
    }

    #[test]
    fn ensure_allowed_names_action_and_state() {
        let err = ensure_allowed(&[], InvoiceAction::MarkPaid, "VALOR_PAGADO")
            .unwrap_err();
        match err {
            AppError::ActionNotAllowed { action, state } => {
                assert_eq!(action, "MARK_PAID");
                assert_eq!(state, "VALOR_PAGADO");
            }
            other => panic!("erro inesperado: {other:?}"),
        }
    }

    #[test]
    fn approved_users_can_only_be_deleted() {
        let mut account = Account {
            id: Some("3".into()),
            username: "pedro".into(),
            business_name: None,
            email: None,
            phone_number: None,
            role: None,
            permiso: false,
        };
        assert_eq!(allowed_user_actions(&account), vec![UserAction::Approve, UserAction::Delete]);
        account.permiso = true;
        assert_eq!(allowed_user_actions(&account), vec![UserAction::Delete]);
    }
}
