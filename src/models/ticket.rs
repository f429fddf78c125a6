// src/models/ticket.rs

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::common::listing::Searchable;
use crate::models::{wire, work_request::Priority};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketState {
    TrabajoPendiente,
    TrabajoEnProgreso,
    TrabajoTerminado,
}

impl TicketState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketState::TrabajoPendiente => "TRABAJO_PENDIENTE",
            TicketState::TrabajoEnProgreso => "TRABAJO_EN_PROGRESO",
            TicketState::TrabajoTerminado => "TRABAJO_TERMINADO",
        }
    }

    // A ordem das variantes é a ordem do ciclo de vida.
    pub fn can_advance_to(&self, next: TicketState) -> bool {
        next > *self
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TicketState::TrabajoTerminado)
    }
}

impl fmt::Display for TicketState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    #[serde(alias = "ticketId", deserialize_with = "wire::id")]
    pub id: String,

    #[serde(default, deserialize_with = "wire::opt_id")]
    pub solicitud_id: Option<String>,

    #[serde(default)]
    pub username: String,

    pub estado: TicketState,

    #[serde(default)]
    pub prioridad: Option<Priority>,

    #[serde(default)]
    pub descripcion_inicial: Option<String>,

    #[serde(default)]
    pub descripcion_trabajo: Option<String>,

    #[serde(default)]
    pub fecha_creacion: Option<String>,
}

impl Searchable for Ticket {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.id.as_str(), self.username.as_str()]
    }
}

/// Formato de data que os filtros do backend esperam.
pub const BACKEND_DATE_FORMAT: &str = "%Y/%m/%d";

/// Insere o campo só se ele tiver conteúdo.
pub(crate) fn put_if_present(body: &mut Map<String, Value>, key: &str, value: Option<&str>) {
    if let Some(v) = value.map(str::trim).filter(|v| !v.is_empty()) {
        body.insert(key.to_string(), Value::String(v.to_string()));
    }
}

pub(crate) fn put_date(body: &mut Map<String, Value>, key: &str, value: Option<NaiveDate>) {
    if let Some(date) = value {
        body.insert(key.to_string(), Value::String(date.format(BACKEND_DATE_FORMAT).to_string()));
    }
}

// Formulário de filtro de tickets (admin e staff)
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TicketFilterPayload {
    #[schema(example = "2024-11-01")]
    pub fecha_inicio: Option<NaiveDate>,
    pub fecha_fin: Option<NaiveDate>,
    pub username: Option<String>,
    pub prioridad: Option<Priority>,
    pub estado: Option<TicketState>,
}

impl TicketFilterPayload {
    pub fn to_backend_body(&self) -> Value {
        let mut body = Map::new();
        put_date(&mut body, "fechaInicio", self.fecha_inicio);
        put_date(&mut body, "fechaFin", self.fecha_fin);
        put_if_present(&mut body, "username", self.username.as_deref());
        put_if_present(&mut body, "prioridad", self.prioridad.as_ref().map(Priority::as_str));
        put_if_present(&mut body, "estado", self.estado.as_ref().map(TicketState::as_str));
        Value::Object(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_moves_forward_only() {
        use TicketState::*;
        assert!(TrabajoPendiente.can_advance_to(TrabajoEnProgreso));
        assert!(TrabajoPendiente.can_advance_to(TrabajoTerminado));
        assert!(TrabajoEnProgreso.can_advance_to(TrabajoTerminado));
        assert!(!TrabajoEnProgreso.can_advance_to(TrabajoPendiente));
        assert!(!TrabajoEnProgreso.can_advance_to(TrabajoEnProgreso));
        for next in [TrabajoPendiente, TrabajoEnProgreso, TrabajoTerminado] {
            assert!(!TrabajoTerminado.can_advance_to(next));
        }
        assert!(TrabajoTerminado.is_terminal());
    }

    #[test]
    fn filter_body_omits_empty_fields_and_formats_dates() {
        let filter = TicketFilterPayload {
            fecha_inicio: NaiveDate::from_ymd_opt(2024, 11, 1),
            fecha_fin: None,
            username: Some("  ".into()),
            prioridad: Some(Priority::Baja),
            estado: None,
        };
        assert_eq!(
            filter.to_backend_body(),
            serde_json::json!({ "fechaInicio": "2024/11/01", "prioridad": "BAJA" })
        );
    }

    #[test]
    fn accepts_ticket_id_alias() {
        let t: Ticket = serde_json::from_value(serde_json::json!({
            "ticketId": 3, "estado": "TRABAJO_EN_PROGRESO", "username": "ana"
        }))
        .unwrap();
        assert_eq!(t.id, "3");
        assert_eq!(t.estado, TicketState::TrabajoEnProgreso);
    }
}
