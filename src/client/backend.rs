// src/client/backend.rs

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::common::error::AppError;

/// Cliente HTTP do backend TigMotors. Todas as chamadas vão com o token do usuário.
#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("Falha ao montar o cliente HTTP: {}", e))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Envia e converte qualquer status fora de 2xx em `AppError::Backend`.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, AppError> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = backend_message(&body);
        let details = backend_field_errors(&body);
        tracing::warn!("Backend respondeu {}: {}", status, message.as_deref().unwrap_or("-"));

        Err(AppError::Backend {
            status: status.as_u16(),
            message,
            details,
        })
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str, token: &str) -> Result<T, AppError> {
        let response = self.send(self.request(Method::GET, path, Some(token))).await?;
        Ok(response.json::<T>().await?)
    }

    pub async fn get_json_query<T, Q>(&self, path: &str, token: &str, query: &Q) -> Result<T, AppError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let builder = self.request(Method::GET, path, Some(token)).query(query);
        let response = self.send(builder).await?;
        Ok(response.json::<T>().await?)
    }

    pub async fn post_json<T, B>(&self, path: &str, token: &str, body: &B) -> Result<T, AppError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let builder = self.request(Method::POST, path, Some(token)).json(body);
        let response = self.send(builder).await?;
        Ok(response.json::<T>().await?)
    }

    /// Mutação cuja resposta só interessa pelo `message` opcional.
    pub async fn execute(&self, builder: RequestBuilder) -> Result<Option<String>, AppError> {
        let response = self.send(builder).await?;
        let body = response.text().await.unwrap_or_default();
        Ok(backend_message(&body))
    }
}

// Extrai a mensagem de um corpo de resposta: {"message"}, {"error"} ou texto puro.
fn backend_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => ["message", "mensaje", "error"]
            .iter()
            .find_map(|k| map.get(*k).and_then(Value::as_str))
            .map(str::to_string),
        Ok(Value::String(s)) => Some(s),
        Ok(_) => None,
        Err(_) if body.len() <= 300 && !body.starts_with('<') => Some(body.to_string()),
        Err(_) => None,
    }
}

fn backend_field_errors(body: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(body.trim()) {
        Ok(Value::Object(mut map)) => map.remove("errors").filter(Value::is_object),
        _ => None,
    }
}
