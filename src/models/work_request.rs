// src/models/work_request.rs

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::models::wire;

// --- ENUMS ---

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    Alta,
    Media,
    Baja,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Alta, Priority::Media, Priority::Baja];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Alta => "ALTA",
            Priority::Media => "MEDIA",
            Priority::Baja => "BAJA",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum RequestState {
    Pendiente,
    Aceptado,
    Rechazado,
}

impl RequestState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestState::Pendiente => "PENDIENTE",
            RequestState::Aceptado => "ACEPTADO",
            RequestState::Rechazado => "RECHAZADO",
        }
    }
}

impl fmt::Display for RequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resposta do cliente à cotização (`cotizacionAceptada`).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum QuoteDecision {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

impl QuoteDecision {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "ACEPTADA" | "ACEPTADO" | "TRUE" => QuoteDecision::Accepted,
            // "NO ACEPTADA" é o valor inicial do backend: ainda sem resposta
            "RECHAZADA" | "RECHAZADO" | "FALSE" => QuoteDecision::Rejected,
            _ => QuoteDecision::Pending,
        }
    }
}

// --- SOLICITUD ---

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkRequest {
    #[serde(deserialize_with = "wire::id")]
    #[schema(example = "42")]
    pub id_solicitud: String,

    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub descripcion_inicial: String,

    #[serde(default)]
    pub prioridad: Option<Priority>,

    pub estado: RequestState,

    #[serde(default, deserialize_with = "wire::opt_money")]
    #[schema(value_type = Option<f64>, example = 120.5)]
    pub cotizacion: Option<Decimal>,

    #[serde(default, deserialize_with = "wire::quote_decision")]
    pub cotizacion_aceptada: QuoteDecision,

    #[serde(default)]
    pub descripcion_trabajo: Option<String>,

    #[serde(default)]
    pub fecha_creacion: Option<String>,

    // Formato livre, só exibido
    #[serde(default)]
    pub pago: Option<Value>,
}

impl WorkRequest {
    pub fn has_quote(&self) -> bool {
        self.cotizacion.is_some()
    }
}

// =============================================================================
//  PAYLOADS
// =============================================================================

fn validate_positive(val: &Decimal) -> Result<(), ValidationError> {
    if *val <= Decimal::ZERO {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("La cotización debe ser mayor que cero.".into());
        return Err(err);
    }
    Ok(())
}

// Cliente: nova solicitação
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequestPayload {
    #[validate(length(min = 1, max = 500, message = "La descripción es obligatoria."))]
    #[schema(example = "Ruido en los frenos delanteros")]
    pub descripcion_inicial: String,

    pub prioridad: Priority,
}

impl CreateRequestPayload {
    pub fn to_backend_body(&self) -> Value {
        json!({
            "descripcionInicial": self.descripcion_inicial,
            "prioridad": self.prioridad.as_str(),
        })
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditDescriptionPayload {
    #[validate(length(min = 1, max = 500, message = "La descripción es obligatoria."))]
    pub descripcion_inicial: String,
}

// Admin: aceitar + cotizar
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuotePayload {
    #[validate(custom(function = "validate_positive"))]
    #[schema(value_type = f64, example = 85.5)]
    pub cotizacion: Decimal,

    #[validate(length(min = 1, message = "La descripción del trabajo es obligatoria."))]
    pub descripcion_trabajo: String,
}

impl QuotePayload {
    // anadir-cotizacion recebe a cotização como número
    pub fn to_backend_body(&self) -> Value {
        json!({
            "cotizacion": self.cotizacion.round_dp(2),
            "descripcionTrabajo": self.descripcion_trabajo,
        })
    }
}

// Admin: registrar trabalho em nome de um cliente. Todos os campos são obrigatórios.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterJobPayload {
    #[validate(length(min = 1, message = "Seleccione un usuario."))]
    pub username: String,

    #[validate(length(min = 1, message = "La descripción inicial es obligatoria."))]
    pub descripcion_inicial: String,

    pub prioridad: Priority,

    #[validate(custom(function = "validate_positive"))]
    #[schema(value_type = f64)]
    pub cotizacion: Decimal,

    #[validate(length(min = 1, message = "La descripción del trabajo es obligatoria."))]
    pub descripcion_trabajo: String,
}

impl RegisterJobPayload {
    // crear-solicitud recebe a cotização como texto com duas casas
    pub fn to_backend_body(&self) -> Value {
        json!({
            "username": self.username,
            "descripcionInicial": self.descripcion_inicial,
            "prioridad": self.prioridad.as_str(),
            "cotizacion": format!("{:.2}", self.cotizacion),
            "descripcionTrabajo": self.descripcion_trabajo,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_backend_row() {
        let row: WorkRequest = serde_json::from_value(json!({
            "idSolicitud": 7,
            "username": "carlosm",
            "descripcionInicial": "Cambio de aceite",
            "prioridad": "ALTA",
            "estado": "ACEPTADO",
            "cotizacion": 35.5,
            "cotizacionAceptada": null,
            "descripcionTrabajo": "Aceite 10W40",
            "fechaCreacion": "2024-11-03"
        }))
        .unwrap();

        assert_eq!(row.id_solicitud, "7");
        assert_eq!(row.estado, RequestState::Aceptado);
        assert_eq!(row.prioridad, Some(Priority::Alta));
        assert_eq!(row.cotizacion_aceptada, QuoteDecision::Pending);
        assert!(row.has_quote());
    }

    #[test]
    fn register_job_sends_quote_with_two_decimals() {
        let payload = RegisterJobPayload {
            username: "carlosm".into(),
            descripcion_inicial: "Frenos".into(),
            prioridad: Priority::Media,
            cotizacion: Decimal::new(1205, 1),
            descripcion_trabajo: "Cambio de pastillas".into(),
        };
        assert!(payload.validate().is_ok());
        assert_eq!(payload.to_backend_body()["cotizacion"], "120.50");
    }

    #[test]
    fn quote_must_be_positive() {
        let payload = QuotePayload { cotizacion: Decimal::ZERO, descripcion_trabajo: "x".into() };
        assert!(payload.validate().is_err());
        let payload = QuotePayload { cotizacion: Decimal::new(455, 1), descripcion_trabajo: "x".into() };
        assert_eq!(payload.to_backend_body()["cotizacion"], 45.5);
    }

    #[test]
    fn re_serialises_with_backend_names() {
        let row: WorkRequest = serde_json::from_value(json!({
            "idSolicitud": "9",
            "estado": "PENDIENTE"
        }))
        .unwrap();
        let out = serde_json::to_value(&row).unwrap();
        assert_eq!(out["idSolicitud"], "9");
        assert_eq!(out["estado"], "PENDIENTE");
        assert_eq!(out["cotizacionAceptada"], "PENDING");
    }
}
