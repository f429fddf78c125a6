// src/models/invoice.rs

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use validator::Validate;

use crate::common::listing::Searchable;
use crate::models::{
    ticket::{put_date, put_if_present, TicketState},
    wire,
    work_request::Priority,
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentState {
    PendientePago,
    ValorPagado,
}

impl PaymentState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentState::PendientePago => "PENDIENTE_PAGO",
            PaymentState::ValorPagado => "VALOR_PAGADO",
        }
    }

    pub fn can_mark_paid(&self) -> bool {
        matches!(self, PaymentState::PendientePago)
    }
}

impl fmt::Display for PaymentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Factura (visão do staff) ou comprovante (visão do cliente).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    #[serde(alias = "comprobanteId", deserialize_with = "wire::id")]
    pub factura_id: String,

    #[serde(default, deserialize_with = "wire::opt_id")]
    pub ticket_id: Option<String>,

    #[serde(default)]
    pub username: String,

    #[serde(default, deserialize_with = "wire::opt_money")]
    #[schema(value_type = Option<f64>)]
    pub cotizacion: Option<Decimal>,

    pub estado_pago: PaymentState,

    #[serde(default)]
    pub estado_ticket: Option<TicketState>,

    #[serde(default)]
    pub prioridad: Option<Priority>,

    #[serde(default)]
    pub descripcion_inicial: Option<String>,

    #[serde(default)]
    pub descripcion_trabajo: Option<String>,

    #[serde(default)]
    pub fecha_creacion: Option<String>,
}

impl Searchable for Invoice {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.factura_id.as_str(), self.username.as_str()]
    }
}

// listado-con-filtros responde { "facturas": [...] }
#[derive(Debug, Deserialize)]
pub struct InvoiceEnvelope {
    #[serde(default)]
    pub facturas: Vec<Invoice>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceFilterPayload {
    pub fecha_inicio: Option<NaiveDate>,
    pub fecha_fin: Option<NaiveDate>,
    pub username: Option<String>,
    pub estado_pago: Option<PaymentState>,
}

impl InvoiceFilterPayload {
    pub fn to_backend_body(&self) -> Value {
        let mut body = Map::new();
        put_date(&mut body, "fechaInicio", self.fecha_inicio);
        put_date(&mut body, "fechaFin", self.fecha_fin);
        put_if_present(&mut body, "username", self.username.as_deref());
        put_if_present(&mut body, "estadoPago", self.estado_pago.as_ref().map(PaymentState::as_str));
        Value::Object(body)
    }
}

// Relatório em PDF: as duas datas são obrigatórias
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceReportPayload {
    #[validate(required(message = "La fecha de inicio es obligatoria."))]
    pub fecha_inicio: Option<NaiveDate>,

    #[validate(required(message = "La fecha de fin es obligatoria."))]
    pub fecha_fin: Option<NaiveDate>,

    pub username: Option<String>,
    pub estado_pago: Option<PaymentState>,
}

impl InvoiceReportPayload {
    pub fn to_backend_body(&self) -> Value {
        let mut body = Map::new();
        put_date(&mut body, "fechaInicio", self.fecha_inicio);
        put_date(&mut body, "fechaFin", self.fecha_fin);
        put_if_present(&mut body, "username", self.username.as_deref());
        put_if_present(&mut body, "estadoPago", self.estado_pago.as_ref().map(PaymentState::as_str));
        Value::Object(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn comprobante_id_is_accepted_as_invoice_id() {
        let invoice: Invoice = serde_json::from_value(json!({
            "comprobanteId": 12,
            "username": "ana",
            "cotizacion": "45.90",
            "estadoPago": "PENDIENTE_PAGO"
        }))
        .unwrap();
        assert_eq!(invoice.factura_id, "12");
        assert!(invoice.estado_pago.can_mark_paid());
    }

    #[test]
    fn report_requires_both_dates() {
        let report = InvoiceReportPayload {
            fecha_inicio: NaiveDate::from_ymd_opt(2024, 1, 1),
            fecha_fin: None,
            username: None,
            estado_pago: None,
        };
        let errors = report.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("fecha_fin"));
    }

    #[test]
    fn filter_body_uses_backend_date_format() {
        let filter = InvoiceFilterPayload {
            fecha_inicio: NaiveDate::from_ymd_opt(2024, 2, 5),
            fecha_fin: NaiveDate::from_ymd_opt(2024, 3, 5),
            username: None,
            estado_pago: Some(PaymentState::ValorPagado),
        };
        assert_eq!(
            filter.to_backend_body(),
            json!({ "fechaInicio": "2024/02/05", "fechaFin": "2024/03/05", "estadoPago": "VALOR_PAGADO" })
        );
    }
}
