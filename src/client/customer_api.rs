// src/client/customer_api.rs

use reqwest::Method;
use serde_json::{json, Value};

use crate::{
    client::BackendClient,
    common::error::AppError,
    models::{
        account::{Account, PasswordChangeBody},
        invoice::{Invoice, PaymentState},
        ticket::{Ticket, TicketState},
        work_request::{Priority, WorkRequest},
    },
};

/// Endpoints de /api-user (cliente)
#[derive(Clone)]
pub struct CustomerApi {
    backend: BackendClient,
}

impl CustomerApi {
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }

    // --- Solicitudes ---

    pub async fn list_requests(&self, token: &str) -> Result<Vec<WorkRequest>, AppError> {
        self.backend.get_json("/api-user/historial-solicitud", token).await
    }

    pub async fn create_request(&self, token: &str, body: &Value) -> Result<Option<String>, AppError> {
        self.backend
            .execute(
                self.backend
                    .request(Method::POST, "/api-user/crear-solicitud", Some(token))
                    .json(body),
            )
            .await
    }

    pub async fn edit_description(&self, token: &str, id: &str, description: &str) -> Result<Option<String>, AppError> {
        let path = format!("/api-user/modificar-solicitud/{}", id);
        self.backend
            .execute(
                self.backend
                    .request(Method::PUT, &path, Some(token))
                    .json(&json!({ "descripcionInicial": description })),
            )
            .await
    }

    pub async fn delete_request(&self, token: &str, id: &str) -> Result<Option<String>, AppError> {
        let path = format!("/api-user/eliminar-solicitud/{}", id);
        self.backend
            .execute(self.backend.request(Method::DELETE, &path, Some(token)))
            .await
    }

    pub async fn accept_quote(&self, token: &str, id: &str) -> Result<Option<String>, AppError> {
        let path = format!("/api-user/aceptar-cotizacion/{}", id);
        self.backend
            .execute(self.backend.request(Method::PUT, &path, Some(token)).json(&json!({})))
            .await
    }

    pub async fn reject_quote(&self, token: &str, id: &str) -> Result<Option<String>, AppError> {
        let path = format!("/api-user/rechazar-cotizacion/{}", id);
        self.backend
            .execute(self.backend.request(Method::PUT, &path, Some(token)).json(&json!({})))
            .await
    }

    // --- Trabajos (tickets) ---

    pub async fn tickets_by_priority(&self, token: &str, priority: Priority) -> Result<Vec<Ticket>, AppError> {
        let path = format!("/api-user/prioridad-ticket/{}", priority.as_str());
        self.backend.get_json(&path, token).await
    }

    pub async fn tickets_by_state(&self, token: &str, state: TicketState) -> Result<Vec<Ticket>, AppError> {
        let path = format!("/api-user/estado-ticket/{}", state.as_str());
        self.backend.get_json(&path, token).await
    }

    // --- Comprobantes ---

    pub async fn list_invoices(&self, token: &str) -> Result<Vec<Invoice>, AppError> {
        self.backend.get_json("/api-user/historial-facturas", token).await
    }

    pub async fn invoices_by_state(&self, token: &str, state: PaymentState) -> Result<Vec<Invoice>, AppError> {
        self.backend
            .get_json_query("/api-user/filtrar-por-estado", token, &[("estadoPago", state.as_str())])
            .await
    }

    // --- Conta ---

    pub async fn profile(&self, token: &str) -> Result<Account, AppError> {
        self.backend.get_json("/api-user/informacion-usuario", token).await
    }

    // Um campo por chamada: { "email": "..." }
    pub async fn update_field(&self, token: &str, field: &str, value: &str) -> Result<Option<String>, AppError> {
        let mut body = serde_json::Map::new();
        body.insert(field.to_string(), Value::from(value));
        self.backend
            .execute(
                self.backend
                    .request(Method::PUT, "/api-user/actualizar-informacion", Some(token))
                    .json(&Value::Object(body)),
            )
            .await
    }

    pub async fn change_password(&self, token: &str, body: &PasswordChangeBody<'_>) -> Result<Option<String>, AppError> {
        self.backend
            .execute(
                self.backend
                    .request(Method::PUT, "/api-user/cambiar-contrasena", Some(token))
                    .json(body),
            )
            .await
    }

    pub async fn delete_account(&self, token: &str, password: &str) -> Result<Option<String>, AppError> {
        self.backend
            .execute(
                self.backend
                    .request(Method::DELETE, "/api-user/eliminar-cuenta", Some(token))
                    .json(&json!({ "password": password })),
            )
            .await
    }
}
