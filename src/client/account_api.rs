// src/client/account_api.rs

use reqwest::Method;

use crate::{
    client::BackendClient,
    common::error::AppError,
    models::account::{PasswordResetPayload, RegisterBody},
};

/// Endpoints públicos de /api/v1
#[derive(Clone)]
pub struct AccountApi {
    backend: BackendClient,
}

impl AccountApi {
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }

    pub async fn register(&self, body: &RegisterBody) -> Result<Option<String>, AppError> {
        self.backend
            .execute(self.backend.request(Method::POST, "/api/v1/register-user", None).json(body))
            .await
    }

    pub async fn reset_password(&self, body: &PasswordResetPayload) -> Result<Option<String>, AppError> {
        self.backend
            .execute(self.backend.request(Method::POST, "/api/v1/password/reset", None).json(body))
            .await
    }

    pub async fn logout(&self, token: &str) -> Result<Option<String>, AppError> {
        self.backend
            .execute(self.backend.request(Method::POST, "/api/v1/cerrar-sesion", Some(token)))
            .await
    }
}
