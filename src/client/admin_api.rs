// src/client/admin_api.rs

use std::collections::HashMap;

use reqwest::Method;
use serde_json::{json, Value};

use crate::{
    client::BackendClient,
    common::error::AppError,
    models::{account::Account, ticket::{Ticket, TicketState}, work_request::WorkRequest},
};

/// Endpoints de /api/admin
#[derive(Clone)]
pub struct AdminApi {
    backend: BackendClient,
}

impl AdminApi {
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }

    // =========================================================================
    //  SOLICITUDES
    // =========================================================================

    pub async fn list_requests(&self, token: &str) -> Result<Vec<WorkRequest>, AppError> {
        self.backend.get_json("/api/admin/historial-solicitudes", token).await
    }

    pub async fn accept_request(&self, token: &str, id: &str) -> Result<Option<String>, AppError> {
        let path = format!("/api/admin/aceptar/{}", id);
        self.backend
            .execute(self.backend.request(Method::PUT, &path, Some(token)).json(&json!({})))
            .await
    }

    pub async fn add_quote(&self, token: &str, id: &str, body: &Value) -> Result<Option<String>, AppError> {
        let path = format!("/api/admin/anadir-cotizacion/{}", id);
        self.backend
            .execute(self.backend.request(Method::PUT, &path, Some(token)).json(body))
            .await
    }

    pub async fn reject_request(&self, token: &str, id: &str) -> Result<Option<String>, AppError> {
        let path = format!("/api/admin/rechazar-solicitud/{}", id);
        self.backend
            .execute(self.backend.request(Method::PUT, &path, Some(token)).json(&json!({})))
            .await
    }

    pub async fn delete_request(&self, token: &str, id: &str) -> Result<Option<String>, AppError> {
        let path = format!("/api/admin/eliminar-solicitud/{}", id);
        self.backend
            .execute(self.backend.request(Method::DELETE, &path, Some(token)))
            .await
    }

    pub async fn create_request(&self, token: &str, body: &Value) -> Result<Option<String>, AppError> {
        self.backend
            .execute(
                self.backend
                    .request(Method::POST, "/api/admin/crear-solicitud", Some(token))
                    .json(body),
            )
            .await
    }

    // =========================================================================
    //  USUÁRIOS
    // =========================================================================

    pub async fn usernames(&self, token: &str) -> Result<Vec<Value>, AppError> {
        self.backend.get_json("/api/admin/lista-nombres-usuarios", token).await
    }

    pub async fn pending_users(&self, token: &str) -> Result<Vec<Account>, AppError> {
        self.backend.get_json("/api/admin/usuarios-pendientes", token).await
    }

    pub async fn approve_user(&self, token: &str, id: &str) -> Result<Option<String>, AppError> {
        let path = format!("/api/admin/usuarios/aprobar/{}", id);
        self.backend
            .execute(self.backend.request(Method::PUT, &path, Some(token)).json(&json!({})))
            .await
    }

    // O backend recebe o id no corpo: { "userId": 12 }
    pub async fn delete_user(&self, token: &str, id: &str) -> Result<Option<String>, AppError> {
        let user_id = id.parse::<i64>().map(Value::from).unwrap_or_else(|_| Value::from(id));
        self.backend
            .execute(
                self.backend
                    .request(Method::POST, "/api/admin/eliminar-usuarios", Some(token))
                    .json(&json!({ "userId": user_id })),
            )
            .await
    }

    // =========================================================================
    //  TICKETS
    // =========================================================================

    pub async fn list_tickets(&self, token: &str) -> Result<Vec<Ticket>, AppError> {
        self.backend.get_json("/api/admin/historial-tickets", token).await
    }

    pub async fn filter_tickets(&self, token: &str, body: &Value) -> Result<Vec<Ticket>, AppError> {
        self.backend.post_json("/api/admin/filtrar-tickets", token, body).await
    }

    pub async fn set_ticket_state(&self, token: &str, id: &str, next: TicketState) -> Result<Option<String>, AppError> {
        let path = format!("/api/admin/{}/estado-ticket", id);
        self.backend
            .execute(
                self.backend
                    .request(Method::PUT, &path, Some(token))
                    .query(&[("nuevoEstado", next.as_str())])
                    .json(&json!({})),
            )
            .await
    }

    // =========================================================================
    //  PERFIL E ESTATÍSTICAS
    // =========================================================================

    pub async fn profile(&self, token: &str) -> Result<Account, AppError> {
        self.backend.get_json("/api/admin/informacion-perfil", token).await
    }

    pub async fn user_stats(&self, token: &str) -> Result<HashMap<String, Value>, AppError> {
        self.backend.get_json("/api/admin/estadisticas-usuarios", token).await
    }

    pub async fn request_stats(&self, token: &str) -> Result<HashMap<String, Value>, AppError> {
        self.backend.get_json("/api/admin/estadisticas-solicitudes", token).await
    }
}
