// src/client/staff_api.rs

use std::collections::HashMap;

use reqwest::Method;
use serde_json::Value;

use crate::{
    client::BackendClient,
    common::error::AppError,
    models::{
        account::Account,
        invoice::{Invoice, InvoiceEnvelope},
        ticket::{Ticket, TicketState},
    },
};

/// Endpoints de /api/staff-cds (personal del centro de servicios)
#[derive(Clone)]
pub struct StaffApi {
    backend: BackendClient,
}

impl StaffApi {
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }

    pub async fn list_invoices(&self, token: &str) -> Result<Vec<Invoice>, AppError> {
        self.backend.get_json("/api/staff-cds/listado-facturas", token).await
    }

    pub async fn filter_invoices(&self, token: &str, body: &Value) -> Result<Vec<Invoice>, AppError> {
        let envelope: InvoiceEnvelope = self
            .backend
            .post_json("/api/staff-cds/listado-con-filtros", token, body)
            .await?;
        Ok(envelope.facturas)
    }

    pub async fn mark_paid(&self, token: &str, id: &str) -> Result<Option<String>, AppError> {
        let path = format!("/api/staff-cds/{}/actualizar-pago", id);
        self.backend
            .execute(self.backend.request(Method::PUT, &path, Some(token)))
            .await
    }

    pub async fn download_report(&self, token: &str, body: &Value) -> Result<Vec<u8>, AppError> {
        let builder = self
            .backend
            .request(Method::POST, "/api/staff-cds/descargar-pdf", Some(token))
            .json(body);
        let response = self.backend.send(builder).await?;
        Ok(response.bytes().await?.to_vec())
    }

    pub async fn usernames(&self, token: &str) -> Result<Vec<Value>, AppError> {
        self.backend.get_json("/api/staff-cds/lista-nombres-usuarios", token).await
    }

    pub async fn list_tickets(&self, token: &str) -> Result<Vec<Ticket>, AppError> {
        self.backend.get_json("/api/staff-cds/historial-tickets", token).await
    }

    pub async fn filter_tickets(&self, token: &str, body: &Value) -> Result<Vec<Ticket>, AppError> {
        self.backend.post_json("/api/staff-cds/filtrar-tickets", token, body).await
    }

    pub async fn set_ticket_state(&self, token: &str, id: &str, next: TicketState) -> Result<Option<String>, AppError> {
        let path = format!("/api/staff-cds/{}/estado-ticket", id);
        self.backend
            .execute(
                self.backend
                    .request(Method::PUT, &path, Some(token))
                    .query(&[("nuevoEstado", next.as_str())]),
            )
            .await
    }

    pub async fn customers(&self, token: &str) -> Result<Vec<Account>, AppError> {
        self.backend.get_json("/api/staff-cds/lista-usuarios", token).await
    }

    pub async fn profile(&self, token: &str) -> Result<Account, AppError> {
        self.backend.get_json("/api/staff-cds/informacion-perfil", token).await
    }

    pub async fn ticket_stats(&self, token: &str) -> Result<HashMap<String, Value>, AppError> {
        self.backend.get_json("/api/staff-cds/estadisticas-tickets", token).await
    }
}
